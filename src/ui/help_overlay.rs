//! Help overlay listing the key bindings
//!
//! The overlay is built from `KEY_BINDINGS` and sized to fit it.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Key bindings grouped by what they act on, as `(section, [(keys, action)])`
pub const KEY_BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("↑/k ↓/j", "Move selection or scroll"),
            ("Enter", "Open recipe"),
            ("Esc", "Back, or quit from the list"),
            ("g / G", "Top / bottom of a recipe"),
        ],
    ),
    (
        "Browsing",
        &[
            ("Tab", "Next category"),
            ("1-5", "All Quick Family Dessert Healthy"),
            ("r", "Retry or refresh"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Filter the list as you type"),
            ("Enter", "Search all recipes"),
            ("Esc", "Clear the search"),
        ],
    ),
    ("General", &[("?", "Toggle this help"), ("q", "Quit")]),
];

const KEY_COLUMN: usize = 10;
const FOOTER: &str = "Esc or ? to close";

/// Renders the help overlay on top of the current view
pub fn render(frame: &mut Frame) {
    let lines = help_lines();

    let content_width = KEY_BINDINGS
        .iter()
        .flat_map(|(_, bindings)| bindings.iter())
        .map(|(_, action)| KEY_COLUMN + 2 + action.chars().count())
        .max()
        .unwrap_or(0)
        .max(FOOTER.len());
    let width = u16::try_from(content_width + 4).unwrap_or(u16::MAX);
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let overlay_area = centered(width, height, frame.area());

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(Span::styled(
            " Keys ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            format!(" {} ", FOOTER),
            Style::default().fg(Color::DarkGray),
        )))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, (section, bindings)) in KEY_BINDINGS.iter().enumerate() {
        if index > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            format!(" {}", section),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        for (keys, action) in bindings.iter() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<width$}", keys, width = KEY_COLUMN),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(*action),
            ]));
        }
    }
    lines
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
