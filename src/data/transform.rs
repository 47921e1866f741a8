//! Mapping from raw Spoonacular payloads to recipe models
//!
//! Every raw field is optional: the upstream contract is versionless and fields
//! come and go, so absence is defaulted here instead of failing deserialization.
//! HTML-bearing fields pass through untouched.

use serde::Deserialize;

use super::{Ingredient, InstructionGroup, InstructionStep, RecipeDetail, RecipeSummary};

/// Base URL for normalized recipe images
pub const IMAGE_BASE_URL: &str = "https://img.spoonacular.com/recipes";

/// Size segment used for every normalized image URL
const IMAGE_SIZE: &str = "556x370";

/// Path substituted when a recipe has no image
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-recipe.jpg";

/// Title used when the payload has none
const UNTITLED: &str = "Untitled recipe";

/// Response body of `/recipes/random`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RandomResponse {
    pub recipes: Option<Vec<RawRecipe>>,
}

/// Response body of `/recipes/complexSearch`
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Option<Vec<RawRecipe>>,
    pub total_results: Option<u64>,
}

/// A recipe as returned by any recipe endpoint
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRecipe {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub image_type: Option<String>,
    pub summary: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub source_url: Option<String>,
    pub instructions: Option<String>,
    pub extended_ingredients: Option<Vec<RawIngredient>>,
    pub analyzed_instructions: Option<Vec<RawInstructionGroup>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RawIngredient {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub original: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RawInstructionGroup {
    pub name: Option<String>,
    pub steps: Option<Vec<RawInstructionStep>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RawInstructionStep {
    pub number: Option<u32>,
    pub step: Option<String>,
}

/// Builds the image URL for a recipe
///
/// A non-empty `image` or `imageType` means the recipe has an image; the URL is
/// then derived from the id alone so that every endpoint yields the same URL.
/// The extension comes from `imageType`, else from the `image` URL, else `jpg`.
pub fn normalize_image_url(id: u64, image: Option<&str>, image_type: Option<&str>) -> String {
    let image = image.map(str::trim).filter(|s| !s.is_empty());
    let image_type = image_type.map(str::trim).filter(|s| !s.is_empty());

    if image.is_none() && image_type.is_none() {
        return PLACEHOLDER_IMAGE.to_string();
    }

    let extension = image_type
        .map(str::to_string)
        .or_else(|| image.and_then(extension_of))
        .unwrap_or_else(|| "jpg".to_string());

    format!("{}/{}-{}.{}", IMAGE_BASE_URL, id, IMAGE_SIZE, extension)
}

/// Extracts a short alphanumeric file extension from a URL or file name
fn extension_of(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let path = match path.split_once("://") {
        Some((_, rest)) => rest.split_once('/')?.1,
        None => path,
    };
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    let valid = !ext.is_empty() && ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

/// Converts a raw id, rejecting missing and negative values
fn recipe_id(raw: Option<i64>) -> Option<u64> {
    raw.and_then(|id| u64::try_from(id).ok())
}

fn title_or_default(title: Option<String>) -> String {
    title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Maps a raw recipe into a summary
///
/// Returns `None` when the payload has no usable id.
pub fn to_summary(raw: RawRecipe) -> Option<RecipeSummary> {
    let id = recipe_id(raw.id)?;
    Some(RecipeSummary {
        id,
        image: normalize_image_url(id, raw.image.as_deref(), raw.image_type.as_deref()),
        title: title_or_default(raw.title),
        summary: raw.summary.unwrap_or_default(),
        ready_in_minutes: raw.ready_in_minutes,
        servings: raw.servings,
        source_url: raw.source_url,
    })
}

/// Maps a list of raw recipes into summaries, dropping entries without an id
pub fn to_summaries(raw: Vec<RawRecipe>) -> Vec<RecipeSummary> {
    raw.into_iter().filter_map(to_summary).collect()
}

/// Maps a raw recipe into a detail record
///
/// `requested_id` stands in for a missing id in the payload.
pub fn to_detail(raw: RawRecipe, requested_id: u64) -> RecipeDetail {
    let id = recipe_id(raw.id).unwrap_or(requested_id);

    let ingredients = raw
        .extended_ingredients
        .unwrap_or_default()
        .into_iter()
        .map(to_ingredient)
        .collect();

    let instruction_groups = raw
        .analyzed_instructions
        .unwrap_or_default()
        .into_iter()
        .map(to_instruction_group)
        .collect();

    RecipeDetail {
        id,
        image: normalize_image_url(id, raw.image.as_deref(), raw.image_type.as_deref()),
        title: title_or_default(raw.title),
        summary: raw.summary.unwrap_or_default(),
        instructions: raw.instructions.unwrap_or_default(),
        ready_in_minutes: raw.ready_in_minutes.unwrap_or(0),
        servings: raw.servings.unwrap_or(0),
        source_url: raw.source_url,
        ingredients,
        instruction_groups,
    }
}

fn to_ingredient(raw: RawIngredient) -> Ingredient {
    let name = raw.name.unwrap_or_default();
    Ingredient {
        id: recipe_id(raw.id).unwrap_or(0),
        original: raw.original.unwrap_or_else(|| name.clone()),
        name,
        amount: raw.amount.unwrap_or(0.0),
        unit: raw.unit.unwrap_or_default(),
    }
}

fn to_instruction_group(raw: RawInstructionGroup) -> InstructionGroup {
    let steps = raw
        .steps
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, step)| InstructionStep {
            number: step.number.unwrap_or(index as u32 + 1),
            step: step.step.unwrap_or_default(),
        })
        .collect();

    InstructionGroup {
        name: raw.name.unwrap_or_default(),
        steps,
    }
}
