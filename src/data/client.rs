//! Spoonacular recipe API client
//!
//! This module wraps the upstream REST endpoints behind typed methods. Every
//! request carries the API key and a timeout; transport failures and non-2xx
//! responses come back as `ApiError`s, never panics.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::transform::{self, RandomResponse, RawRecipe, SearchResponse};
use super::{RecipeDetail, RecipeSummary};
use crate::config::ApiSettings;
use crate::error::ApiError;

/// Base URL for the Spoonacular API
pub const SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com";

/// Timeout for data requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the connectivity probe
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Error body returned by the API on failures
#[derive(Debug, Deserialize)]
struct ApiFailure {
    message: Option<String>,
}

/// Profile sent to `/users/connect`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Client for the Spoonacular recipe API
#[derive(Debug, Clone)]
pub struct RecipeApiClient {
    http: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
    probe_timeout: Duration,
}

impl RecipeApiClient {
    /// Creates a client for the public endpoint with default timeouts
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(SPOONACULAR_BASE_URL, api_key)
    }

    /// Creates a client for a custom base URL (proxies, mock servers)
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Creates a client from loaded settings
    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self::with_base_url(&settings.base_url, &settings.api_key)
            .with_timeouts(
                Duration::from_secs(settings.timeout_secs),
                Duration::from_secs(settings.probe_timeout_secs),
            )
    }

    /// Overrides the data and probe timeouts
    pub fn with_timeouts(mut self, timeout: Duration, probe_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches `count` random recipes, optionally restricted to tags
    ///
    /// A response with zero recipes is an `UpstreamEmptyResult`.
    pub async fn random_recipes(
        &self,
        count: usize,
        tags: &[String],
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let mut params = vec![("number", count.to_string())];
        if !tags.is_empty() {
            params.push(("include-tags", tags.join(",")));
        }

        let response: RandomResponse = self
            .get_json("/recipes/random", &params, self.timeout)
            .await?;
        let recipes = transform::to_summaries(response.recipes.unwrap_or_default());
        debug!(count = recipes.len(), "random recipes received");

        if recipes.is_empty() {
            return Err(ApiError::empty("No recipes returned from API"));
        }
        Ok(recipes)
    }

    /// Fetches the most popular recipes
    ///
    /// A response with zero results is an `UpstreamEmptyResult`.
    pub async fn popular_recipes(&self, count: usize) -> Result<Vec<RecipeSummary>, ApiError> {
        let params = [
            ("number", count.to_string()),
            ("sort", "popularity".to_string()),
            ("addRecipeInformation", "true".to_string()),
        ];

        let recipes = self.complex_search(&params).await?;
        if recipes.is_empty() {
            return Err(ApiError::empty("No popular recipes found"));
        }
        Ok(recipes)
    }

    /// Searches recipes by free-text query; an empty result is not an error
    pub async fn search_recipes(
        &self,
        query: &str,
        count: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let params = [
            ("query", query.to_string()),
            ("number", count.to_string()),
            ("addRecipeInformation", "true".to_string()),
        ];
        self.complex_search(&params).await
    }

    async fn complex_search(
        &self,
        params: &[(&str, String)],
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let response: SearchResponse = self
            .get_json("/recipes/complexSearch", params, self.timeout)
            .await?;
        let recipes = transform::to_summaries(response.results.unwrap_or_default());
        debug!(
            count = recipes.len(),
            total = response.total_results.unwrap_or(0),
            "search results received"
        );
        Ok(recipes)
    }

    /// Fetches full information for one recipe
    pub async fn recipe_information(&self, id: u64) -> Result<RecipeDetail, ApiError> {
        let path = format!("/recipes/{}/information", id);
        let params = [("includeNutrition", "false".to_string())];

        let raw: RawRecipe = self.get_json(&path, &params, self.timeout).await?;
        Ok(transform::to_detail(raw, id))
    }

    /// Fetches recipes similar to the given one
    pub async fn similar_recipes(
        &self,
        id: u64,
        count: usize,
    ) -> Result<Vec<RecipeSummary>, ApiError> {
        let path = format!("/recipes/{}/similar", id);
        let params = [("number", count.to_string())];

        let raw: Vec<RawRecipe> = self.get_json(&path, &params, self.timeout).await?;
        Ok(transform::to_summaries(raw))
    }

    /// Registers a user with the API and returns its raw acknowledgement
    pub async fn connect_user(&self, profile: &UserProfile) -> Result<serde_json::Value, ApiError> {
        let url = format!("{}/users/connect", self.base_url);
        debug!(username = %profile.username, "POST /users/connect");

        let request = self
            .http
            .post(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .json(profile)
            .timeout(self.timeout);
        let ack = self.execute(request).await?;
        info!(username = %profile.username, "user connected");
        Ok(ack)
    }

    /// Checks that the API answers a minimal request within the probe timeout
    pub async fn probe(&self) -> bool {
        let params = [("number", "1".to_string())];
        match self
            .get_json::<serde_json::Value>("/recipes/random", &params, self.probe_timeout)
            .await
        {
            Ok(_) => {
                info!("API probe succeeded");
                true
            }
            Err(e) => {
                warn!(error = %e, "API probe failed");
                false
            }
        }
    }

    /// Issues a GET with the API key and the given parameters
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path, "GET");

        let request = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(params)
            .timeout(timeout);
        self.execute(request).await
    }

    /// Sends a request and decodes a successful JSON body
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "upstream returned an error status");
            return Err(ApiError::upstream(status.as_u16(), api_message(&body)));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::unknown(format!("Malformed response from API: {}", e)))
    }
}

/// Extracts the `message` field from an API error body, if any
fn api_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiFailure>(body)
        .ok()
        .and_then(|failure| failure.message)
}
