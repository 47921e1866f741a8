//! Recipe categories, search matching and card badges
//!
//! This module defines the categories shown as tabs above the recipe list and the
//! predicate that decides which recipes a category and search query keep.

use crate::data::RecipeSummary;
use crate::ui::text::strip_html;

/// Recipe categories users can filter by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    /// Every recipe
    #[default]
    All,
    /// Ready in 30 minutes or less
    Quick,
    /// Serves six or more
    Family,
    /// Title mentions dessert, cake or sweet
    Dessert,
    /// Title mentions healthy, salad or veggie
    Healthy,
}

impl Category {
    /// Returns a slice containing all category variants in tab order.
    pub fn all() -> &'static [Category] {
        &[
            Category::All,
            Category::Quick,
            Category::Family,
            Category::Dessert,
            Category::Healthy,
        ]
    }

    /// Returns the tab label for the category.
    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Quick => "Quick",
            Category::Family => "Family",
            Category::Dessert => "Dessert",
            Category::Healthy => "Healthy",
        }
    }

    /// Returns the lowercase name used on the command line and in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Quick => "quick",
            Category::Family => "family",
            Category::Dessert => "dessert",
            Category::Healthy => "healthy",
        }
    }

    /// Parses a category name (case-insensitive).
    ///
    /// Returns `None` if the input doesn't match any category.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Category> {
        match s.to_lowercase().trim() {
            "all" => Some(Category::All),
            "quick" | "fast" => Some(Category::Quick),
            "family" => Some(Category::Family),
            "dessert" | "desserts" | "sweet" => Some(Category::Dessert),
            "healthy" => Some(Category::Healthy),
            _ => None,
        }
    }

    /// Returns the next category in tab order, wrapping at the end.
    pub fn next(&self) -> Category {
        let all = Category::all();
        let index = all.iter().position(|c| c == self).unwrap_or(0);
        all[(index + 1) % all.len()]
    }

    /// Returns true if the recipe belongs to this category.
    pub fn matches(&self, recipe: &RecipeSummary) -> bool {
        match self {
            Category::All => true,
            Category::Quick => matches!(recipe.ready_in_minutes, Some(1..=30)),
            Category::Family => matches!(recipe.servings, Some(s) if s >= 6),
            Category::Dessert => title_mentions(recipe, &["dessert", "cake", "sweet"]),
            Category::Healthy => title_mentions(recipe, &["healthy", "salad", "veggie"]),
        }
    }
}

fn title_mentions(recipe: &RecipeSummary, words: &[&str]) -> bool {
    let title = recipe.title.to_lowercase();
    words.iter().any(|word| title.contains(word))
}

/// Returns true if the query is blank or found in the title or summary text.
pub fn matches_search(recipe: &RecipeSummary, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    recipe.title.to_lowercase().contains(&query)
        || strip_html(&recipe.summary).to_lowercase().contains(&query)
}

/// Returns the recipes kept by both the category and the search query, in order.
pub fn filter_recipes<'a>(
    recipes: &'a [RecipeSummary],
    category: Category,
    query: &str,
) -> Vec<&'a RecipeSummary> {
    recipes
        .iter()
        .filter(|recipe| category.matches(recipe) && matches_search(recipe, query))
        .collect()
}

/// Badge shown on a recipe card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Quick,
    Family,
    Dessert,
    Healthy,
    Recipe,
}

impl Badge {
    /// Picks the badge for a recipe; the first matching rule wins.
    pub fn for_recipe(recipe: &RecipeSummary) -> Badge {
        let title = recipe.title.to_lowercase();
        if matches!(recipe.ready_in_minutes, Some(m) if m <= 30) {
            Badge::Quick
        } else if matches!(recipe.servings, Some(s) if s >= 6) {
            Badge::Family
        } else if title.contains("dessert") {
            Badge::Dessert
        } else if title.contains("healthy") {
            Badge::Healthy
        } else {
            Badge::Recipe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Quick => "\u{26A1} Quick",
            Badge::Family => "\u{1F46A} Family",
            Badge::Dessert => "\u{1F370} Dessert",
            Badge::Healthy => "\u{1F957} Healthy",
            Badge::Recipe => "\u{1F37D} Recipe",
        }
    }
}
