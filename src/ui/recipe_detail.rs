//! Recipe detail screen rendering
//!
//! Shows one recipe: time and servings, the summary, ingredients, instructions,
//! the source link and similar recipes. The content scrolls as one block.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::RecipeDetail;
use crate::service::{LoadState, SimilarRecipes};
use crate::ui::text::{html_to_lines, strip_html};

/// Color palette for the detail view
mod colors {
    use ratatui::style::Color;

    pub const PRIMARY: Color = Color::Cyan;
    pub const HEADER: Color = Color::Cyan;
    pub const SECTION: Color = Color::Yellow;
    pub const MUTED: Color = Color::DarkGray;
    pub const ERROR: Color = Color::Red;
}

/// Renders the recipe detail screen
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state; the scroll offset is clamped to the content
/// * `recipe_id` - The ID of the recipe to display
pub fn render(frame: &mut Frame, app: &mut App, recipe_id: u64) {
    let area = frame.area();

    let title = match app.detail.value() {
        Some(detail) => format!(" {} ", detail.title),
        None => app
            .visible_recipes()
            .into_iter()
            .find(|recipe| recipe.id == recipe_id)
            .map(|recipe| format!(" {} ", recipe.title))
            .unwrap_or_else(|| " Recipe ".to_string()),
    };

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            title,
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content area (scrollable)
            Constraint::Length(1), // Help text (fixed)
        ])
        .split(inner_area);

    let lines = match &app.detail {
        LoadState::Idle | LoadState::Loading => vec![Line::from(Span::styled(
            "Loading recipe...",
            Style::default().fg(colors::PRIMARY),
        ))],
        LoadState::Failed(err) => vec![
            Line::from(Span::styled(err.to_string(), Style::default().fg(colors::ERROR))),
            Line::from(Span::styled(
                "Press r to try again, Esc to go back",
                Style::default().fg(colors::MUTED),
            )),
        ],
        LoadState::Ready(detail) => {
            let mut lines = build_detail_lines(detail);
            lines.extend(build_similar_lines(&app.similar));
            lines
        }
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });

    // Clamp scroll offset to the content height after wrapping
    let content_height = u16::try_from(paragraph.line_count(chunks[0].width)).unwrap_or(u16::MAX);
    let max_scroll = content_height.saturating_sub(chunks[0].height);
    if app.detail_scroll_offset > max_scroll {
        app.detail_scroll_offset = max_scroll;
    }

    frame.render_widget(paragraph.scroll((app.detail_scroll_offset, 0)), chunks[0]);

    render_help_text(frame, chunks[1]);
}

fn section_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(colors::SECTION)
            .add_modifier(Modifier::BOLD),
    ))
}

fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(colors::MUTED)))
}

/// Builds the lines for everything except similar recipes
fn build_detail_lines(detail: &RecipeDetail) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let time = if detail.ready_in_minutes > 0 {
        format!("{} min", detail.ready_in_minutes)
    } else {
        "--".to_string()
    };
    let servings = if detail.servings > 0 {
        format!("{} servings", detail.servings)
    } else {
        "--".to_string()
    };
    lines.push(Line::from(vec![
        Span::styled("\u{23F1} ", Style::default().fg(colors::PRIMARY)),
        Span::raw(time),
        Span::raw("   "),
        Span::styled("\u{1F37D} ", Style::default().fg(colors::PRIMARY)),
        Span::raw(servings),
    ]));
    lines.push(Line::from(""));

    let summary = strip_html(&detail.summary);
    if !summary.is_empty() {
        lines.push(Line::from(summary));
        lines.push(Line::from(""));
    }

    lines.push(section_header("Ingredients"));
    if detail.ingredients.is_empty() {
        lines.push(muted("  No ingredients listed."));
    } else {
        for ingredient in &detail.ingredients {
            lines.push(Line::from(format!("  • {}", ingredient.original)));
        }
    }
    lines.push(Line::from(""));

    lines.push(section_header("Instructions"));
    lines.extend(build_instruction_lines(detail));
    lines.push(Line::from(""));

    if let Some(url) = &detail.source_url {
        lines.push(Line::from(vec![
            Span::styled("Source: ", Style::default().fg(colors::SECTION)),
            Span::styled(url.clone(), Style::default().fg(Color::Blue)),
        ]));
        lines.push(Line::from(""));
    }

    lines
}

/// Instruction text, falling back to analyzed steps, then a placeholder
fn build_instruction_lines(detail: &RecipeDetail) -> Vec<Line<'static>> {
    let text_lines = html_to_lines(&detail.instructions);
    if !text_lines.is_empty() {
        return text_lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| Line::from(format!("  {}. {}", i + 1, line)))
            .collect();
    }

    let mut lines = Vec::new();
    for group in &detail.instruction_groups {
        if !group.name.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", group.name),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
        for step in &group.steps {
            lines.push(Line::from(format!("  {}. {}", step.number, step.step)));
        }
    }

    if lines.is_empty() {
        lines.push(muted("  No instructions available."));
    }
    lines
}

fn build_similar_lines(similar: &LoadState<SimilarRecipes>) -> Vec<Line<'static>> {
    let mut lines = vec![section_header("Similar recipes")];
    match similar {
        LoadState::Idle | LoadState::Loading => lines.push(muted("  Loading...")),
        LoadState::Failed(_) | LoadState::Ready(SimilarRecipes::Unavailable(_)) => {
            lines.push(muted("  Similar recipes unavailable"))
        }
        LoadState::Ready(SimilarRecipes::Found(recipes)) if recipes.is_empty() => {
            lines.push(muted("  No similar recipes found"))
        }
        LoadState::Ready(SimilarRecipes::Found(recipes)) => {
            for recipe in recipes {
                let time = recipe
                    .ready_in_minutes
                    .map(|m| format!(" ({} min)", m))
                    .unwrap_or_default();
                lines.push(Line::from(format!("  • {}{}", recipe.title, time)));
            }
        }
    }
    lines
}

/// Renders the fixed help text at the bottom
fn render_help_text(frame: &mut Frame, area: Rect) {
    let help = Line::from(vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Scroll  "),
        Span::styled("g/G", Style::default().fg(Color::Yellow)),
        Span::raw(" Top/Bottom  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Back  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ]);
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(colors::MUTED)),
        area,
    );
}
