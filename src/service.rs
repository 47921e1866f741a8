//! Recipe fetch service: caching, coalescing and fallback policy
//!
//! `RecipeService` is the one entry point the UI talks to. It owns the API client,
//! the batch cache and the request coalescer, and decides what happens when the
//! upstream fails:
//!
//! - random batch: optional one-shot fallback to a popularity search
//! - detail: fall back to the cached summary with empty detail fields
//! - similar: degrade to a tagged `SimilarRecipes::Unavailable`

use std::sync::Arc;

use futures::future::{self, FutureExt};
use tracing::{debug, info, warn};

use crate::cache::{Batch, BatchCache, Coalescer};
use crate::config::{FetchSettings, RandomFallback, Settings};
use crate::data::{RecipeApiClient, RecipeDetail, RecipeSummary};
use crate::error::{Operation, RecipeError};

/// Signature of a coalescable request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestKey {
    /// The random batch; the requested count is not part of the key
    RandomBatch,
    /// A free-text search
    Search { query: String, count: usize },
}

type BatchResult = Result<Batch, RecipeError>;

/// Outcome of a similar-recipes lookup
///
/// Keeps "there are no similar recipes" apart from "the lookup failed".
#[derive(Debug, Clone, PartialEq)]
pub enum SimilarRecipes {
    /// Recipes found, from the cached batch or the network; may be empty
    Found(Vec<RecipeSummary>),
    /// The lookup failed and no cached recipes could stand in
    Unavailable(RecipeError),
}

impl SimilarRecipes {
    /// The recipes to display, empty when unavailable
    pub fn recipes(&self) -> &[RecipeSummary] {
        match self {
            SimilarRecipes::Found(recipes) => recipes,
            SimilarRecipes::Unavailable(_) => &[],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, SimilarRecipes::Unavailable(_))
    }

    pub fn error(&self) -> Option<&RecipeError> {
        match self {
            SimilarRecipes::Found(_) => None,
            SimilarRecipes::Unavailable(err) => Some(err),
        }
    }
}

/// Lifecycle of one operation as seen by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// Nothing requested yet
    Idle,
    /// Request outstanding
    Loading,
    /// Settled with a value
    Ready(T),
    /// Settled with an error
    Failed(RecipeError),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RecipeError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<Result<T, RecipeError>> for LoadState<T> {
    fn from(result: Result<T, RecipeError>) -> Self {
        match result {
            Ok(value) => LoadState::Ready(value),
            Err(err) => LoadState::Failed(err),
        }
    }
}

/// Fetches recipes through the cache, coalescer and fallback policy
#[derive(Debug)]
pub struct RecipeService {
    client: RecipeApiClient,
    cache: Arc<BatchCache>,
    requests: Coalescer<RequestKey, BatchResult>,
    fetch: FetchSettings,
}

impl RecipeService {
    /// Creates a service with a wall-clock cache from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        let client = RecipeApiClient::from_settings(&settings.api);
        let cache = BatchCache::new(settings.cache.ttl());
        Self::with_cache(client, cache, settings.fetch.clone())
    }

    /// Creates a service around an existing client and cache
    pub fn with_cache(client: RecipeApiClient, cache: BatchCache, fetch: FetchSettings) -> Self {
        Self {
            client,
            cache: Arc::new(cache),
            requests: Coalescer::new(),
            fetch,
        }
    }

    pub fn client(&self) -> &RecipeApiClient {
        &self.client
    }

    pub fn cache(&self) -> &BatchCache {
        &self.cache
    }

    pub fn fetch_settings(&self) -> &FetchSettings {
        &self.fetch
    }

    /// Number of requests currently in flight
    pub fn in_flight(&self) -> usize {
        self.requests.in_flight()
    }

    /// Returns the random batch using the configured batch size
    pub async fn get_default_recipes(&self) -> BatchResult {
        self.get_random_recipes(self.fetch.batch_size).await
    }

    /// Returns a batch of random recipes
    ///
    /// A fresh cached batch is returned as-is, whatever `count` is. Otherwise
    /// concurrent callers share a single fetch. On failure the configured
    /// `RandomFallback` decides whether a popularity search is tried; if every
    /// attempt fails the error carries the random-batch cause.
    pub async fn get_random_recipes(&self, count: usize) -> BatchResult {
        if let Some(batch) = self.cache.fresh() {
            debug!(count = batch.len(), "serving cached batch");
            return Ok(batch);
        }

        let client = self.client.clone();
        let cache = Arc::clone(&self.cache);
        let tags = self.fetch.tags.clone();
        let policy = self.fetch.random_fallback;

        self.requests
            .run(RequestKey::RandomBatch, move || {
                // Another caller may have filled the slot since the check above
                if let Some(batch) = cache.fresh() {
                    return future::ready(Ok(batch)).boxed();
                }
                async move { fetch_random_batch(&client, &cache, count, &tags, policy).await }
                    .boxed()
            })
            .await
    }

    /// Returns popularity-sorted recipes; not cached
    pub async fn get_popular_recipes(&self, count: usize) -> Result<Vec<RecipeSummary>, RecipeError> {
        self.client
            .popular_recipes(count)
            .await
            .map_err(|err| RecipeError::new(Operation::PopularRecipes, err))
    }

    /// Searches recipes by free text; identical concurrent searches share one call
    pub async fn search_recipes(&self, query: &str, count: usize) -> BatchResult {
        let query = query.trim().to_string();
        let key = RequestKey::Search {
            query: query.to_lowercase(),
            count,
        };
        let client = self.client.clone();

        self.requests
            .get(key, move || async move {
                info!(%query, "searching recipes");
                client
                    .search_recipes(&query, count)
                    .await
                    .map(Batch::from)
                    .map_err(|err| RecipeError::new(Operation::SearchRecipes, err))
            })
            .await
    }

    /// Returns full details for one recipe
    ///
    /// The network is always tried first. If it fails and the recipe is in the
    /// cached batch (fresh or not), a detail built from that summary is returned
    /// with empty instructions and ingredients.
    pub async fn get_recipe_detail(&self, id: u64) -> Result<RecipeDetail, RecipeError> {
        let fallback = self.cache.find(id);

        match self.client.recipe_information(id).await {
            Ok(detail) => Ok(detail),
            Err(err) => match fallback {
                Some(summary) => {
                    warn!(id, error = %err, "detail fetch failed, using cached summary");
                    Ok(RecipeDetail::from_summary(&summary))
                }
                None => {
                    warn!(id, error = %err, "detail fetch failed");
                    Err(RecipeError::new(Operation::RecipeDetail, err))
                }
            },
        }
    }

    /// Returns recipes similar to `id`
    ///
    /// A fresh batch with enough other recipes answers without a network call.
    /// Failures become `SimilarRecipes::Unavailable` rather than an error.
    pub async fn get_similar_recipes(&self, id: u64) -> SimilarRecipes {
        let wanted = self.fetch.similar_count;

        if let Some(batch) = self.cache.fresh() {
            let others: Vec<RecipeSummary> = batch
                .iter()
                .filter(|recipe| recipe.id != id)
                .take(wanted)
                .cloned()
                .collect();
            if others.len() >= wanted {
                debug!(id, count = others.len(), "similar recipes from cached batch");
                return SimilarRecipes::Found(others);
            }
        }

        match self.client.similar_recipes(id, wanted).await {
            Ok(recipes) => SimilarRecipes::Found(recipes),
            Err(err) => {
                warn!(id, error = %err, "similar recipes unavailable");
                SimilarRecipes::Unavailable(RecipeError::new(Operation::SimilarRecipes, err))
            }
        }
    }

    /// Checks upstream reachability
    pub async fn probe(&self) -> bool {
        self.client.probe().await
    }
}

/// Fetches a random batch, applying the fallback policy, and caches the result
async fn fetch_random_batch(
    client: &RecipeApiClient,
    cache: &BatchCache,
    count: usize,
    tags: &[String],
    policy: RandomFallback,
) -> BatchResult {
    let err = match client.random_recipes(count, tags).await {
        Ok(recipes) => return Ok(store(cache, recipes)),
        Err(err) => err,
    };
    warn!(error = %err, "random recipe fetch failed");

    if policy == RandomFallback::Disabled {
        return Err(RecipeError::new(Operation::RandomRecipes, err));
    }

    info!("trying fallback: popular recipes");
    match client.popular_recipes(count).await {
        Ok(recipes) => Ok(store(cache, recipes)),
        Err(fallback_err) => {
            warn!(error = %fallback_err, "popular recipe fallback failed");
            Err(RecipeError::new(Operation::RandomRecipes, err))
        }
    }
}

fn store(cache: &BatchCache, recipes: Vec<RecipeSummary>) -> Batch {
    let batch = Batch::from(recipes);
    cache.write(Arc::clone(&batch));
    info!(count = batch.len(), "recipe batch refreshed");
    batch
}
