//! Help overlay listing the storefront's keys

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;

const OVERLAY_WIDTH: u16 = 50;

/// Key groups shown in the overlay, in display order
const KEY_GROUPS: &[(&str, &[(&str, &str)])] = &[
    (
        "Browsing",
        &[
            ("↑/k, ↓/j", "Scroll products"),
            ("g", "Back to top"),
            ("Tab, S-Tab", "Next / previous category"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Search products by name"),
            ("Enter", "Done typing"),
            ("Esc", "Clear search"),
        ],
    ),
    (
        "Other",
        &[
            ("r", "Reload catalog"),
            ("?", "Toggle this help"),
            ("q", "Quit"),
        ],
    ),
];

fn overlay_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
    ];

    for (group, keys) in KEY_GROUPS {
        lines.push(Line::styled(
            *group,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.extend(keys.iter().map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        }));
        lines.push(Line::from(""));
    }

    lines.push(Line::styled(
        "Press Esc or ? to close",
        Style::default().fg(Color::DarkGray),
    ));
    lines
}

/// Draws the overlay on top of whatever is already rendered
pub fn render(frame: &mut Frame) {
    let lines = overlay_lines();
    // Content plus the two border rows
    let height = lines.len() as u16 + 2;
    let area = centered_rect(OVERLAY_WIDTH, height, frame.area());

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Green));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
