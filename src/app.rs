//! Application state management for the storefront
//!
//! This module holds the presentation state (search query, category selection,
//! grid scrolling, help overlay) and maps keyboard input onto it. Catalog data
//! arrives from the fetch hook as `FetchResult` snapshots via `sync`.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::data::{FetchResult, Item};

/// A category shortcut shown under the search bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub icon: &'static str,
}

/// Category shortcuts, in display order
pub const CATEGORIES: [Category; 4] = [
    Category {
        name: "Fruits",
        icon: "\u{1F34E}", // 🍎
    },
    Category {
        name: "Vegetables",
        icon: "\u{1F343}", // 🍃
    },
    Category {
        name: "Bakery",
        icon: "\u{1F35E}", // 🍞
    },
    Category {
        name: "Milk",
        icon: "\u{2615}", // ☕
    },
];

/// Which part of the screen receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Keys navigate the product grid
    Grid,
    /// Keys edit the search query
    Search,
}

/// Main application struct managing presentation state
pub struct App {
    /// Latest state published by the fetch hook
    pub result: FetchResult,
    /// Text typed into the search bar
    pub search_query: String,
    /// Current input focus
    pub focus: Focus,
    /// Index into `CATEGORIES` of the highlighted shortcut
    pub selected_category: usize,
    /// First visible grid row
    pub scroll_offset: usize,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating the user asked for a reload
    pub reload_requested: bool,
    /// When the last run finished
    pub last_refresh: Option<DateTime<Local>>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            result: FetchResult::default(),
            search_query: String::new(),
            focus: Focus::Grid,
            selected_category: 0,
            scroll_offset: 0,
            show_help: false,
            should_quit: false,
            reload_requested: false,
            last_refresh: None,
        }
    }

    /// Applies a new snapshot from the fetch hook
    pub fn sync(&mut self, result: FetchResult) {
        if self.result.loading && !result.loading {
            self.last_refresh = Some(Local::now());
        }
        self.result = result;
        self.clamp_scroll();
    }

    /// Items matching the search query (case-insensitive substring of the name)
    pub fn visible_items(&self) -> Vec<&Item> {
        let query = self.search_query.trim().to_lowercase();
        self.result
            .data
            .iter()
            .filter(|item| {
                query.is_empty()
                    || item
                        .name()
                        .map(|name| name.to_lowercase().contains(&query))
                        .unwrap_or(false)
            })
            .collect()
    }

    /// Number of two-card rows in the grid
    pub fn grid_rows(&self) -> usize {
        self.visible_items().len().div_ceil(2)
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit (anywhere except while typing a search)
    /// - `/`: Focus the search bar; `Enter`/`Esc` leave it
    /// - `Up`/`k`, `Down`/`j`: Scroll the grid
    /// - `g`: Jump to the top of the grid
    /// - `Tab`/`Shift-Tab`: Move the category highlight
    /// - `r`: Reload the catalog
    /// - `Esc`: Clear the search, or quit if it is already empty
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.result.loading {
            // Only quit is allowed during loading
            if key_event.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }

        if self.result.error.is_some() {
            match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('r') => self.reload_requested = true,
                _ => {}
            }
            return;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key_event),
            Focus::Grid => self.handle_grid_key(key_event),
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.scroll_offset = 0;
            }
            KeyCode::Backspace => {
                self.search_query.pop();
                self.scroll_offset = 0;
            }
            KeyCode::Enter | KeyCode::Down => {
                self.focus = Focus::Grid;
            }
            KeyCode::Esc => {
                self.search_query.clear();
                self.focus = Focus::Grid;
                self.scroll_offset = 0;
            }
            _ => {}
        }
    }

    fn handle_grid_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                if self.search_query.is_empty() {
                    self.should_quit = true;
                } else {
                    self.search_query.clear();
                    self.scroll_offset = 0;
                }
            }
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_down();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_up();
            }
            KeyCode::Char('g') => {
                self.scroll_offset = 0;
            }
            KeyCode::Tab => {
                self.selected_category = (self.selected_category + 1) % CATEGORIES.len();
            }
            KeyCode::BackTab => {
                self.selected_category =
                    (self.selected_category + CATEGORIES.len() - 1) % CATEGORIES.len();
            }
            KeyCode::Char('r') => {
                self.reload_requested = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    /// Scrolls the grid up one row, stopping at the top
    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scrolls the grid down one row, stopping at the last row
    pub fn scroll_down(&mut self) {
        if self.scroll_offset + 1 < self.grid_rows() {
            self.scroll_offset += 1;
        }
    }

    fn clamp_scroll(&mut self) {
        let rows = self.grid_rows();
        self.scroll_offset = self.scroll_offset.min(rows.saturating_sub(1));
    }

    /// Clears the reload flag, returning whether it was set
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_items;
    use crossterm::event::KeyModifiers;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded(body: &str) -> FetchResult {
        FetchResult {
            data: parse_items(body).unwrap(),
            loading: false,
            error: None,
        }
    }

    fn app_with_fruit() -> App {
        let mut app = App::new();
        app.sync(loaded(
            r#"[{"id":"1","name":"Mango","price":1.5},
                {"id":"2","name":"Orange","price":0.8},
                {"id":"3","name":"Coconut","price":2.25},
                {"id":"4","name":"Pineapple","price":3.0},
                {"id":"5","name":"Blood Orange","price":1.1}]"#,
        ));
        app
    }

    #[test]
    fn test_new_app_starts_loading() {
        let app = App::new();
        assert!(app.result.loading);
        assert!(app.last_refresh.is_none());
        assert_eq!(app.focus, Focus::Grid);
    }

    #[test]
    fn test_sync_records_refresh_time_when_load_finishes() {
        let mut app = App::new();
        app.sync(loaded("[]"));
        assert!(app.last_refresh.is_some());
    }

    #[test]
    fn test_only_quit_allowed_while_loading() {
        let mut app = App::new();

        app.handle_key(key_event(KeyCode::Char('r')));
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(!app.reload_requested);
        assert!(!app.show_help);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_reload_allowed_from_error_screen() {
        let mut app = App::new();
        app.sync(FetchResult {
            data: Vec::new(),
            loading: false,
            error: Some("No internet and no cached data available".to_string()),
        });

        app.handle_key(key_event(KeyCode::Char('r')));

        assert!(app.take_reload_request());
        assert!(!app.reload_requested);
    }

    #[test]
    fn test_search_filters_by_name_case_insensitively() {
        let mut app = app_with_fruit();

        app.handle_key(key_event(KeyCode::Char('/')));
        for c in "ORANGE".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }

        let names: Vec<_> = app.visible_items().iter().filter_map(|i| i.name()).collect();
        assert_eq!(names, vec!["Orange", "Blood Orange"]);
        assert_eq!(app.focus, Focus::Search);
    }

    #[test]
    fn test_typing_q_in_search_does_not_quit() {
        let mut app = app_with_fruit();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char('q')));

        assert!(!app.should_quit);
        assert_eq!(app.search_query, "q");
    }

    #[test]
    fn test_esc_clears_search_then_quits() {
        let mut app = app_with_fruit();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char('m')));
        app.handle_key(key_event(KeyCode::Enter));
        assert_eq!(app.focus, Focus::Grid);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.search_query.is_empty());
        assert!(!app.should_quit);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_backspace_edits_query() {
        let mut app = app_with_fruit();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char('m')));
        app.handle_key(key_event(KeyCode::Char('x')));
        app.handle_key(key_event(KeyCode::Backspace));

        assert_eq!(app.search_query, "m");
        assert_eq!(app.visible_items().len(), 1);
    }

    #[test]
    fn test_category_selection_wraps() {
        let mut app = app_with_fruit();
        assert_eq!(CATEGORIES[app.selected_category].name, "Fruits");

        app.handle_key(key_event(KeyCode::BackTab));
        assert_eq!(CATEGORIES[app.selected_category].name, "Milk");

        app.handle_key(key_event(KeyCode::Tab));
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(CATEGORIES[app.selected_category].name, "Vegetables");
    }

    #[test]
    fn test_scroll_is_bounded_by_grid_rows() {
        let mut app = app_with_fruit();
        assert_eq!(app.grid_rows(), 3);

        for _ in 0..10 {
            app.handle_key(key_event(KeyCode::Char('j')));
        }
        assert_eq!(app.scroll_offset, 2);

        app.handle_key(key_event(KeyCode::Char('k')));
        assert_eq!(app.scroll_offset, 1);

        app.handle_key(key_event(KeyCode::Char('g')));
        assert_eq!(app.scroll_offset, 0);

        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_sync_clamps_scroll_when_catalog_shrinks() {
        let mut app = app_with_fruit();
        app.scroll_offset = 2;

        app.sync(loaded(r#"[{"id":"1","name":"Mango"}]"#));

        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = app_with_fruit();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.scroll_offset, 0);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }
}
