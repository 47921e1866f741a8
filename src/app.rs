//! Application state management for Recipe Book
//!
//! This module contains the main application state, handling keyboard input,
//! the results of background loads, and state transitions between views.

use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::cache::Batch;
use crate::cli::StartupConfig;
use crate::config::FetchSettings;
use crate::data::{RecipeDetail, RecipeSummary};
use crate::filter::{filter_recipes, Category};
use crate::loader::{LoadMessage, LoadRequest};
use crate::service::{LoadState, SimilarRecipes};

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while the first batch is fetched
    Loading,
    /// List view showing the filtered recipes
    RecipeList,
    /// Detail view for a specific recipe
    RecipeDetail(u64),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// The random batch
    pub recipes: LoadState<Batch>,
    /// Results of a submitted search, shown instead of the batch
    pub search_results: LoadState<Batch>,
    /// Query of the submitted search, if one is active
    pub submitted_query: Option<String>,
    /// Details of the recipe open in the detail view
    pub detail: LoadState<RecipeDetail>,
    /// Similar recipes for the recipe open in the detail view
    pub similar: LoadState<SimilarRecipes>,
    /// Index of currently selected recipe in the filtered list
    pub selected_index: usize,
    /// Active category tab
    pub category: Category,
    /// Text typed into the search box
    pub search_query: String,
    /// Whether keystrokes go to the search box
    pub search_mode: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Scroll offset for recipe detail view
    pub detail_scroll_offset: u16,
    /// When the batch on screen was first received
    pub last_refresh: Option<DateTime<Local>>,
    /// The last batch received, to tell a cache hit from new data
    last_batch: Option<Batch>,
    batch_size: usize,
    search_count: usize,
    pending: Vec<LoadRequest>,
}

impl App {
    /// Creates a new App with default fetch sizes, queueing the first batch load
    pub fn new() -> Self {
        Self::with_startup_config(StartupConfig::default(), &FetchSettings::default())
    }

    /// Creates a new App from CLI startup options and fetch settings
    ///
    /// The initial category and search text are applied before the first load.
    pub fn with_startup_config(config: StartupConfig, fetch: &FetchSettings) -> Self {
        let mut app = Self {
            state: AppState::Loading,
            recipes: LoadState::Idle,
            search_results: LoadState::Idle,
            submitted_query: None,
            detail: LoadState::Idle,
            similar: LoadState::Idle,
            selected_index: 0,
            category: config.initial_category.unwrap_or_default(),
            search_query: config.initial_query.unwrap_or_default(),
            search_mode: false,
            show_help: false,
            should_quit: false,
            detail_scroll_offset: 0,
            last_refresh: None,
            last_batch: None,
            batch_size: config.count.unwrap_or(fetch.batch_size),
            search_count: fetch.search_count,
            pending: Vec::new(),
        };
        app.request_batch();
        app
    }

    /// Takes the loads queued since the last call
    pub fn take_requests(&mut self) -> Vec<LoadRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Number of recipes per random batch
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// The recipe sequence the list is built from
    ///
    /// A submitted search replaces the batch until it is cleared.
    pub fn source(&self) -> &LoadState<Batch> {
        if self.submitted_query.is_some() {
            &self.search_results
        } else {
            &self.recipes
        }
    }

    /// Recipes left after the category and search filters, in batch order
    pub fn visible_recipes(&self) -> Vec<&RecipeSummary> {
        let Some(batch) = self.source().value() else {
            return Vec::new();
        };
        // Search results already match the query upstream
        let query = if self.submitted_query.is_some() {
            ""
        } else {
            self.search_query.as_str()
        };
        filter_recipes(batch, self.category, query)
    }

    /// Returns the currently selected recipe, if any
    pub fn selected_recipe(&self) -> Option<&RecipeSummary> {
        self.visible_recipes().get(self.selected_index).copied()
    }

    /// Applies the result of a background load
    ///
    /// Results for a recipe or query that is no longer on screen are dropped.
    pub fn apply(&mut self, message: LoadMessage) {
        match message {
            LoadMessage::BatchLoaded(result) => {
                if let Ok(batch) = &result {
                    // A fresh-cache hit hands back the same batch
                    let unchanged = self
                        .last_batch
                        .as_ref()
                        .is_some_and(|last| Arc::ptr_eq(last, batch));
                    if !unchanged {
                        self.last_refresh = Some(Local::now());
                        self.last_batch = Some(Arc::clone(batch));
                    }
                }
                self.recipes = result.into();
                if self.state == AppState::Loading {
                    self.state = AppState::RecipeList;
                }
                self.clamp_selection();
            }
            LoadMessage::DetailLoaded { id, result } => {
                if self.state == AppState::RecipeDetail(id) {
                    self.detail = result.into();
                }
            }
            LoadMessage::SimilarLoaded { id, similar } => {
                if self.state == AppState::RecipeDetail(id) {
                    self.similar = LoadState::Ready(similar);
                }
            }
            LoadMessage::SearchLoaded { query, result } => {
                if self.submitted_query.as_deref() == Some(query.as_str()) {
                    self.search_results = result.into();
                    self.clamp_selection();
                }
            }
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit the application
    /// - `Up`/`k`, `Down`/`j`: Move selection (list) or scroll (detail)
    /// - `Enter`: Open the selected recipe
    /// - `Esc`: Go back, clear the search, or quit from the list
    /// - `Tab`, `1`-`5`: Switch category
    /// - `/`: Edit the search box; `Enter` there searches upstream
    /// - `r`: Retry or refresh
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        if self.search_mode {
            self.handle_search_key(key_event);
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::RecipeList => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    if self.submitted_query.is_some() || !self.search_query.is_empty() {
                        self.clear_search();
                    } else {
                        self.should_quit = true;
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                }
                KeyCode::Enter => {
                    if let Some(id) = self.selected_recipe().map(|recipe| recipe.id) {
                        self.open_detail(id);
                    }
                }
                KeyCode::Tab => {
                    self.set_category(self.category.next());
                }
                KeyCode::Char(c @ '1'..='5') => {
                    let index = (c as usize) - ('1' as usize);
                    if let Some(&category) = Category::all().get(index) {
                        self.set_category(category);
                    }
                }
                KeyCode::Char('/') => {
                    self.search_mode = true;
                }
                KeyCode::Char('r') => {
                    self.refresh();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::RecipeDetail(id) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    self.close_detail();
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.scroll_down();
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.scroll_up();
                }
                KeyCode::Char('g') => {
                    self.scroll_to_top();
                }
                KeyCode::Char('G') => {
                    self.scroll_to_bottom();
                }
                KeyCode::Char('r') => {
                    if self.detail.error().is_some() {
                        self.open_detail(id);
                    }
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.search_mode = false;
                self.clear_search();
            }
            KeyCode::Enter => {
                self.search_mode = false;
                self.submit_search();
            }
            KeyCode::Backspace => {
                self.search_query.pop();
                self.selected_index = 0;
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.selected_index = 0;
            }
            _ => {}
        }
    }

    /// Runs the typed query upstream; a blank query returns to the batch
    fn submit_search(&mut self) {
        let query = self.search_query.trim().to_string();
        if query.is_empty() {
            self.clear_search();
            return;
        }
        self.submitted_query = Some(query.clone());
        self.search_results = LoadState::Loading;
        self.selected_index = 0;
        self.pending.push(LoadRequest::Search {
            query,
            count: self.search_count,
        });
    }

    /// Drops the search text and any submitted search results
    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.submitted_query = None;
        self.search_results = LoadState::Idle;
        self.selected_index = 0;
    }

    /// Switches category, resetting the selection
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.selected_index = 0;
    }

    /// Reloads whatever the list is built from
    ///
    /// The batch request is answered from cache while it is fresh.
    pub fn refresh(&mut self) {
        match self.submitted_query.clone() {
            Some(query) => {
                self.search_results = LoadState::Loading;
                self.pending.push(LoadRequest::Search {
                    query,
                    count: self.search_count,
                });
            }
            None => self.request_batch(),
        }
    }

    fn request_batch(&mut self) {
        self.recipes = LoadState::Loading;
        self.pending.push(LoadRequest::Batch {
            count: self.batch_size,
        });
    }

    /// Opens the detail view for `id` and queues its loads
    pub fn open_detail(&mut self, id: u64) {
        self.state = AppState::RecipeDetail(id);
        self.detail = LoadState::Loading;
        self.similar = LoadState::Loading;
        self.detail_scroll_offset = 0;
        self.pending.push(LoadRequest::Detail(id));
        self.pending.push(LoadRequest::Similar(id));
    }

    /// Returns to the list, discarding detail state
    pub fn close_detail(&mut self) {
        self.state = AppState::RecipeList;
        self.detail = LoadState::Idle;
        self.similar = LoadState::Idle;
        self.detail_scroll_offset = 0;
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.visible_recipes().len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.visible_recipes().len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_recipes().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Scrolls up in the detail view, stopping at 0
    pub fn scroll_up(&mut self) {
        self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
    }

    /// Scrolls down in the detail view
    ///
    /// The renderer clamps the offset to the content height.
    pub fn scroll_down(&mut self) {
        const MAX_SCROLL: u16 = 500;
        if self.detail_scroll_offset < MAX_SCROLL {
            self.detail_scroll_offset += 1;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.detail_scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.detail_scroll_offset = 500;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, Operation, RecipeError};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn recipe(id: u64, title: &str, minutes: Option<u32>) -> RecipeSummary {
        RecipeSummary {
            id,
            title: title.to_string(),
            image: "/placeholder-recipe.jpg".to_string(),
            summary: String::new(),
            ready_in_minutes: minutes,
            servings: Some(2),
            source_url: None,
        }
    }

    fn sample_batch() -> Batch {
        vec![
            recipe(1, "Garlic Pasta", Some(20)),
            recipe(2, "Beef Stew", Some(120)),
            recipe(3, "Chocolate Cake", Some(60)),
            recipe(4, "Greek Salad", Some(10)),
        ]
        .into()
    }

    /// App with the sample batch loaded and the initial request drained
    fn loaded_app() -> App {
        let mut app = App::new();
        app.take_requests();
        app.apply(LoadMessage::BatchLoaded(Ok(sample_batch())));
        app
    }

    fn timeout_error(operation: Operation) -> RecipeError {
        RecipeError::new(operation, ApiError::NetworkTimeout)
    }

    #[test]
    fn test_initial_state_is_loading_with_batch_requested() {
        let mut app = App::new();
        assert_eq!(app.state, AppState::Loading);
        assert!(app.recipes.is_loading());
        assert_eq!(app.selected_index, 0);
        assert!(!app.should_quit);
        assert_eq!(app.take_requests(), vec![LoadRequest::Batch { count: 8 }]);
        assert!(app.take_requests().is_empty(), "Requests are drained once");
    }

    #[test]
    fn test_batch_loaded_transitions_to_list() {
        let app = loaded_app();
        assert_eq!(app.state, AppState::RecipeList);
        assert_eq!(app.visible_recipes().len(), 4);
        assert!(app.last_refresh.is_some());
    }

    #[test]
    fn test_cached_batch_keeps_refresh_time() {
        let batch = sample_batch();
        let mut app = App::new();
        app.apply(LoadMessage::BatchLoaded(Ok(Arc::clone(&batch))));
        let earlier = Local::now() - chrono::Duration::minutes(4);
        app.last_refresh = Some(earlier);

        app.handle_key(key_event(KeyCode::Char('r')));
        app.apply(LoadMessage::BatchLoaded(Ok(Arc::clone(&batch))));
        assert_eq!(app.last_refresh, Some(earlier), "Same batch from cache");

        app.apply(LoadMessage::BatchLoaded(Ok(sample_batch())));
        assert!(app.last_refresh.unwrap() > earlier, "New batch is stamped");
    }

    #[test]
    fn test_batch_failure_still_shows_list_with_error() {
        let mut app = App::new();
        app.apply(LoadMessage::BatchLoaded(Err(timeout_error(Operation::RandomRecipes))));

        assert_eq!(app.state, AppState::RecipeList);
        assert!(app.recipes.error().is_some());
        assert!(app.visible_recipes().is_empty());
        assert!(app.last_refresh.is_none());
    }

    #[test]
    fn test_r_retries_batch_after_failure() {
        let mut app = App::new();
        app.take_requests();
        app.apply(LoadMessage::BatchLoaded(Err(timeout_error(Operation::RandomRecipes))));

        app.handle_key(key_event(KeyCode::Char('r')));

        assert!(app.recipes.is_loading());
        assert_eq!(app.take_requests(), vec![LoadRequest::Batch { count: 8 }]);
    }

    #[test]
    fn test_navigation_down_and_up() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.selected_index, 1);
        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 2);
        app.handle_key(key_event(KeyCode::Char('k')));
        assert_eq!(app.selected_index, 1);
        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.selected_index, 3, "Should wrap to bottom");
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.selected_index, 0, "Should wrap to top");
    }

    #[test]
    fn test_navigation_on_empty_list_is_noop() {
        let mut app = App::new();
        app.apply(LoadMessage::BatchLoaded(Ok(Vec::<RecipeSummary>::new().into())));
        app.handle_key(key_event(KeyCode::Down));
        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.selected_index, 0);
        app.handle_key(key_event(KeyCode::Enter));
        assert_eq!(app.state, AppState::RecipeList);
    }

    #[test]
    fn test_keys_ignored_during_loading() {
        let mut app = App::new();
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.selected_index, 0);
        app.handle_key(key_event(KeyCode::Enter));
        assert_eq!(app.state, AppState::Loading);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_enter_opens_detail_and_queues_loads() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Down));
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.state, AppState::RecipeDetail(2));
        assert!(app.detail.is_loading());
        assert!(app.similar.is_loading());
        assert_eq!(
            app.take_requests(),
            vec![LoadRequest::Detail(2), LoadRequest::Similar(2)]
        );
    }

    #[test]
    fn test_detail_results_apply_only_to_open_recipe() {
        let mut app = loaded_app();
        app.open_detail(1);

        let stale = RecipeDetail::from_summary(&recipe(9, "Other", None));
        app.apply(LoadMessage::DetailLoaded {
            id: 9,
            result: Ok(stale),
        });
        assert!(app.detail.is_loading(), "Result for another recipe is dropped");

        let detail = RecipeDetail::from_summary(&recipe(1, "Garlic Pasta", Some(20)));
        app.apply(LoadMessage::DetailLoaded {
            id: 1,
            result: Ok(detail.clone()),
        });
        assert_eq!(app.detail.value(), Some(&detail));

        app.apply(LoadMessage::SimilarLoaded {
            id: 1,
            similar: SimilarRecipes::Unavailable(timeout_error(Operation::SimilarRecipes)),
        });
        assert!(app.similar.value().is_some_and(|s| s.is_unavailable()));
    }

    #[test]
    fn test_esc_in_detail_returns_to_list_and_resets() {
        let mut app = loaded_app();
        app.open_detail(1);
        app.detail_scroll_offset = 5;

        app.handle_key(key_event(KeyCode::Esc));

        assert_eq!(app.state, AppState::RecipeList);
        assert_eq!(app.detail, LoadState::Idle);
        assert_eq!(app.detail_scroll_offset, 0);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_r_in_detail_retries_only_after_failure() {
        let mut app = loaded_app();
        app.open_detail(1);
        app.take_requests();

        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.take_requests().is_empty());

        app.apply(LoadMessage::DetailLoaded {
            id: 1,
            result: Err(timeout_error(Operation::RecipeDetail)),
        });
        app.handle_key(key_event(KeyCode::Char('r')));
        assert_eq!(
            app.take_requests(),
            vec![LoadRequest::Detail(1), LoadRequest::Similar(1)]
        );
    }

    #[test]
    fn test_detail_scroll_keys() {
        let mut app = loaded_app();
        app.open_detail(1);

        app.handle_key(key_event(KeyCode::Char('j')));
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.detail_scroll_offset, 2);
        app.handle_key(key_event(KeyCode::Char('k')));
        assert_eq!(app.detail_scroll_offset, 1);
        app.handle_key(key_event(KeyCode::Char('G')));
        assert_eq!(app.detail_scroll_offset, 500);
        app.handle_key(key_event(KeyCode::Char('g')));
        assert_eq!(app.detail_scroll_offset, 0);
        app.scroll_up();
        assert_eq!(app.detail_scroll_offset, 0, "Should not underflow");
        assert!(matches!(app.state, AppState::RecipeDetail(1)));
    }

    #[test]
    fn test_tab_cycles_categories() {
        let mut app = loaded_app();
        app.selected_index = 2;
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.category, Category::Quick);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.visible_recipes().len(), 2);
    }

    #[test]
    fn test_number_keys_select_category() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('4')));
        assert_eq!(app.category, Category::Dessert);
        assert_eq!(app.visible_recipes()[0].title, "Chocolate Cake");

        app.handle_key(key_event(KeyCode::Char('5')));
        assert_eq!(app.category, Category::Healthy);
        app.handle_key(key_event(KeyCode::Char('1')));
        assert_eq!(app.category, Category::All);
    }

    #[test]
    fn test_search_mode_filters_locally() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        assert!(app.search_mode);

        for c in "stew".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        assert_eq!(app.search_query, "stew");
        assert!(!app.should_quit, "q and other keys are typed while searching");
        let visible = app.visible_recipes();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);

        app.handle_key(key_event(KeyCode::Backspace));
        assert_eq!(app.search_query, "ste");
    }

    #[test]
    fn test_search_esc_clears_query() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char('x')));
        app.handle_key(key_event(KeyCode::Esc));

        assert!(!app.search_mode);
        assert!(app.search_query.is_empty());
        assert_eq!(app.visible_recipes().len(), 4);
    }

    #[test]
    fn test_search_enter_submits_upstream_search() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        for c in "tofu".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Enter));

        assert!(!app.search_mode);
        assert_eq!(app.submitted_query.as_deref(), Some("tofu"));
        assert!(app.search_results.is_loading());
        assert_eq!(
            app.take_requests(),
            vec![LoadRequest::Search {
                query: "tofu".to_string(),
                count: 20
            }]
        );

        let results: Batch = vec![recipe(50, "Crispy Baked Bean Curd", Some(40))].into();
        app.apply(LoadMessage::SearchLoaded {
            query: "tofu".to_string(),
            result: Ok(results),
        });
        let visible = app.visible_recipes();
        assert_eq!(visible.len(), 1, "Upstream matches are not re-filtered by text");
        assert_eq!(visible[0].id, 50);

        // Esc in the list drops the search and shows the batch again
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.submitted_query.is_none());
        assert_eq!(app.visible_recipes().len(), 4);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_blank_search_submit_is_not_sent() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char(' ')));
        app.handle_key(key_event(KeyCode::Enter));

        assert!(app.submitted_query.is_none());
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn test_stale_search_results_are_dropped() {
        let mut app = loaded_app();
        app.search_query = "pasta".to_string();
        app.submit_search();
        app.apply(LoadMessage::SearchLoaded {
            query: "soup".to_string(),
            result: Ok(vec![recipe(7, "Soup", None)].into()),
        });
        assert!(app.search_results.is_loading());
    }

    #[test]
    fn test_q_and_esc_quit_from_list() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_q_quits_from_detail() {
        let mut app = loaded_app();
        app.open_detail(1);
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.selected_index, 0, "Keys are ignored while help is shown");

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit, "q closes help before it quits");
    }

    #[test]
    fn test_selection_clamped_when_batch_shrinks() {
        let mut app = loaded_app();
        app.selected_index = 3;
        app.apply(LoadMessage::BatchLoaded(Ok(vec![recipe(1, "Only", None)].into())));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_with_startup_config_applies_cli_options() {
        let config = StartupConfig {
            initial_category: Some(Category::Quick),
            initial_query: Some("salad".to_string()),
            count: Some(3),
        };
        let mut app = App::with_startup_config(config, &FetchSettings::default());

        assert_eq!(app.category, Category::Quick);
        assert_eq!(app.search_query, "salad");
        assert_eq!(app.batch_size(), 3);
        assert_eq!(app.take_requests(), vec![LoadRequest::Batch { count: 3 }]);

        app.apply(LoadMessage::BatchLoaded(Ok(sample_batch())));
        let visible = app.visible_recipes();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Greek Salad");
    }

    #[test]
    fn test_default_creates_same_as_new() {
        let app1 = App::new();
        let app2 = App::default();
        assert_eq!(app1.state, app2.state);
        assert_eq!(app1.selected_index, app2.selected_index);
        assert_eq!(app1.category, app2.category);
    }
}
