//! Command-line interface parsing for Recipe Book
//!
//! This module handles parsing of CLI arguments using clap: startup category and
//! search text, batch size, an explicit config file, the fallback switch and the
//! connectivity probe.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::config::{RandomFallback, Settings};
use crate::filter::Category;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified category name is not recognized
    #[error("Invalid category: '{0}'. Valid categories: all, quick, family, dessert, healthy")]
    InvalidCategory(String),

    /// The batch size must be at least one
    #[error("Invalid count: {0}. The batch size must be at least 1")]
    InvalidCount(usize),
}

/// Recipe Book - Discover random recipes in your terminal
#[derive(Parser, Debug)]
#[command(name = "recipebook")]
#[command(about = "Browse, filter and search recipes from Spoonacular")]
#[command(version)]
pub struct Cli {
    /// Number of recipes per random batch (overrides fetch.batch_size)
    #[arg(long, value_name = "N")]
    pub count: Option<usize>,

    /// Category tab to open with
    ///
    /// Valid categories: all, quick, family, dessert, healthy
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Text to pre-fill the search box with
    #[arg(long, value_name = "TEXT")]
    pub query: Option<String>,

    /// Config file to load on top of the platform config
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Do not fall back to popular recipes when the random batch fails
    #[arg(long)]
    pub no_fallback: bool,

    /// Check that the recipe API is reachable, then exit
    #[arg(long)]
    pub probe: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupConfig {
    /// Category to select (if specified)
    pub initial_category: Option<Category>,
    /// Search text to pre-fill (if specified)
    pub initial_query: Option<String>,
    /// Batch size override (if specified)
    pub count: Option<usize>,
}

/// Parses a category string argument into a Category enum.
///
/// # Returns
/// * `Ok(Category)` if the string matches a valid category
/// * `Err(CliError::InvalidCategory)` if the string doesn't match
pub fn parse_category_arg(s: &str) -> Result<Category, CliError> {
    Category::from_str(s).ok_or_else(|| CliError::InvalidCategory(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an invalid category or count was specified
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_category = cli.category.as_deref().map(parse_category_arg).transpose()?;

        if cli.count == Some(0) {
            return Err(CliError::InvalidCount(0));
        }

        let initial_query = cli
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        Ok(StartupConfig {
            initial_category,
            initial_query,
            count: cli.count,
        })
    }
}

impl Cli {
    /// Applies flags that override loaded settings
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(count) = self.count {
            settings.fetch.batch_size = count;
        }
        if self.no_fallback {
            settings.fetch.random_fallback = RandomFallback::Disabled;
        }
    }
}
