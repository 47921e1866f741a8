//! Core data models for Recipe Book
//!
//! This module contains the recipe types handed to the UI, the upstream API
//! client and the transformation from raw API payloads into those types.

pub mod client;
pub mod transform;

pub use client::{RecipeApiClient, UserProfile};

use serde::{Deserialize, Serialize};

/// Summary of a recipe as shown in the recipe list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Upstream recipe identifier
    pub id: u64,
    /// Recipe title
    pub title: String,
    /// Normalized image URL or the placeholder path
    pub image: String,
    /// Summary as raw HTML, possibly empty
    pub summary: String,
    /// Total time in minutes, if known
    pub ready_in_minutes: Option<u32>,
    /// Number of servings, if known
    pub servings: Option<u32>,
    /// Link to the original recipe, if known
    pub source_url: Option<String>,
}

/// A single ingredient line of a detailed recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: u64,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    /// Display string as written in the source recipe
    pub original: String,
}

/// One numbered step of an instruction group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionStep {
    pub number: u32,
    pub step: String,
}

/// A named group of ordered instruction steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionGroup {
    /// Group name, empty for the main group
    pub name: String,
    pub steps: Vec<InstructionStep>,
}

/// Full recipe information as shown in the detail view
///
/// Ready time and servings are required here and default to 0 when the
/// upstream payload leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: u64,
    pub title: String,
    pub image: String,
    /// Summary as raw HTML, possibly empty
    pub summary: String,
    /// Instructions as raw HTML, possibly empty
    pub instructions: String,
    pub ready_in_minutes: u32,
    pub servings: u32,
    pub source_url: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instruction_groups: Vec<InstructionGroup>,
}

impl RecipeDetail {
    /// Builds a detail record from a cached summary with empty detail fields
    ///
    /// Used when the detail request fails but the recipe is still in the batch.
    pub fn from_summary(summary: &RecipeSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title.clone(),
            image: summary.image.clone(),
            summary: summary.summary.clone(),
            instructions: String::new(),
            ready_in_minutes: summary.ready_in_minutes.unwrap_or(0),
            servings: summary.servings.unwrap_or(0),
            source_url: summary.source_url.clone(),
            ingredients: Vec::new(),
            instruction_groups: Vec::new(),
        }
    }

    /// Returns true if neither HTML nor analyzed instructions are present
    pub fn has_no_instructions(&self) -> bool {
        self.instructions.trim().is_empty()
            && self.instruction_groups.iter().all(|g| g.steps.is_empty())
    }
}
