//! UI rendering module for Recipe Book
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod recipe_detail;
pub mod recipe_list;
pub mod text;

pub use help_overlay::render as render_help_overlay;
pub use recipe_detail::render as render_recipe_detail;
pub use recipe_list::render_recipe_list;
