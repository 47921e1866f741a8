//! Recipe list screen rendering
//!
//! Renders the main list view: a header with category tabs and the search box,
//! the filtered recipes with their badges, and a key hint line with data
//! freshness at the bottom.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::RecipeSummary;
use crate::filter::{Badge, Category};
use crate::service::LoadState;
use crate::ui::text::truncate;

/// Color for a card badge
fn badge_color(badge: Badge) -> Color {
    match badge {
        Badge::Quick => Color::Yellow,
        Badge::Family => Color::Magenta,
        Badge::Dessert => Color::LightRed,
        Badge::Healthy => Color::Green,
        Badge::Recipe => Color::Gray,
    }
}

/// Formats ready time as "25 min", or "--" when unknown
fn format_minutes(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) => format!("{} min", m),
        None => "--".to_string(),
    }
}

/// Formats servings as "4 srv", or "--" when unknown
fn format_servings(servings: Option<u32>) -> String {
    match servings {
        Some(s) => format!("{} srv", s),
        None => "--".to_string(),
    }
}

/// Message shown when no recipe passes the filters
fn empty_message(app: &App) -> String {
    let query = app
        .submitted_query
        .as_deref()
        .unwrap_or(app.search_query.as_str())
        .trim();
    if !query.is_empty() {
        format!("No recipes match \"{}\"", query)
    } else if app.category != Category::All {
        format!("No {} recipes in this batch", app.category.name())
    } else {
        "No recipes found".to_string()
    }
}

/// Renders the recipe list screen
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state containing recipes and selection
pub fn render_recipe_list(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header: title, tabs, search
            Constraint::Min(3),    // Recipe list
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_help(frame, chunks[2], app);
}

/// Renders the title line, category tabs and search box
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let time_str = Local::now().format("%a %b %d, %H:%M").to_string();

    let mut tab_spans = Vec::new();
    for (index, category) in Category::all().iter().enumerate() {
        let style = if *category == app.category {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        tab_spans.push(Span::styled(
            format!(" {} {} ", index + 1, category.label()),
            style,
        ));
        tab_spans.push(Span::raw(" "));
    }

    let search_style = if app.search_mode {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let search_text = if app.search_query.is_empty() && !app.search_mode {
        Span::styled("press / to search", Style::default().fg(Color::DarkGray))
    } else {
        let cursor = if app.search_mode { "_" } else { "" };
        Span::styled(format!("{}{}", app.search_query, cursor), search_style)
    };

    let mut search_line = vec![Span::styled("Search: ", Style::default().fg(Color::Cyan)), search_text];
    if let Some(query) = &app.submitted_query {
        search_line.push(Span::styled(
            format!("   results for \"{}\" (Esc to clear)", query),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "RECIPEBOOK",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(time_str, Style::default().fg(Color::White)),
        ]),
        Line::from(Span::styled(
            "─".repeat((area.width as usize).saturating_sub(2)),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(tab_spans),
        Line::from(search_line),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

/// Builds one list line for a recipe
fn recipe_line(recipe: &RecipeSummary, is_selected: bool, title_width: usize) -> Line<'static> {
    let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸ or space
    let badge = Badge::for_recipe(recipe);

    let name_style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor_style = if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let title = format!(
        "{:<width$}",
        truncate(&recipe.title, title_width),
        width = title_width
    );

    Line::from(vec![
        Span::styled(cursor, cursor_style),
        Span::styled(title, name_style),
        Span::raw(" "),
        Span::styled(
            format!("{:>7}", format_minutes(recipe.ready_in_minutes)),
            Style::default().fg(Color::White),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{:>6}", format_servings(recipe.servings)),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(badge.label(), Style::default().fg(badge_color(badge))),
    ])
}

/// Renders the recipe list content, or the loading, error or empty message
fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.submitted_query {
        Some(_) => " Search Results ".to_string(),
        None => format!(" Recipes: {} ", app.category.label()),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines: Vec<Line> = match app.source() {
        LoadState::Idle | LoadState::Loading => vec![Line::from(Span::styled(
            "Loading recipes...",
            Style::default().fg(Color::Cyan),
        ))],
        LoadState::Failed(err) => vec![
            Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))),
            Line::from(Span::styled(
                "Press r to try again",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        LoadState::Ready(_) => {
            let recipes = app.visible_recipes();
            if recipes.is_empty() {
                vec![Line::from(Span::styled(
                    empty_message(app),
                    Style::default().fg(Color::DarkGray),
                ))]
            } else {
                // cursor(2) + time(8) + servings(7) + gaps and badge(14) + borders(2)
                let title_width = (area.width as usize).saturating_sub(33).max(10);
                let visible_rows = area.height.saturating_sub(2) as usize;
                // Keep the selection on screen
                let first = app
                    .selected_index
                    .saturating_sub(visible_rows.saturating_sub(1));
                recipes
                    .iter()
                    .enumerate()
                    .skip(first)
                    .take(visible_rows.max(1))
                    .map(|(index, recipe)| recipe_line(recipe, index == app.selected_index, title_width))
                    .collect()
            }
        }
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the help text at the bottom of the screen with data freshness
fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    let mut help_spans = vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Navigate  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Open  "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Category  "),
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(" Search  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    if let Some(last_refresh) = app.last_refresh {
        let mins_ago = (Local::now() - last_refresh).num_minutes();
        let freshness_text = if mins_ago < 1 {
            " │ Data: just now".to_string()
        } else {
            format!(" │ Data: {}m ago", mins_ago)
        };
        help_spans.push(Span::styled(
            freshness_text,
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
