//! Storefront screen rendering
//!
//! Renders the single storefront view: a search bar, a row of category
//! shortcuts and a two-column grid of product cards. While the catalog is
//! loading, or when the load failed, a centered status message replaces the
//! whole screen.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::app::{App, Focus, CATEGORIES};
use crate::data::Item;

/// Height of a large card (every third product)
const LARGE_CARD_HEIGHT: u16 = 7;

/// Height of a regular card
const SMALL_CARD_HEIGHT: u16 = 5;

const ACCENT: Color = Color::Green;

/// Every third card, starting with the first, is rendered large
pub fn is_large_card(index: usize) -> bool {
    index % 3 == 0
}

/// Formats a price as dollars with two decimals
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Renders the storefront, or the loading/error screen
pub fn render(frame: &mut Frame, app: &App) {
    if app.result.loading {
        render_status(frame, "Loading...", Style::default().fg(Color::Cyan), None);
        return;
    }

    if let Some(error) = &app.result.error {
        render_status(
            frame,
            &format!("Error: {}", error),
            Style::default().fg(Color::Red),
            Some("r retry  q quit"),
        );
        return;
    }

    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Length(3), // Categories
            Constraint::Min(3),    // Product grid
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_search_bar(frame, app, chunks[0]);
    render_categories(frame, app, chunks[1]);
    render_grid(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

/// Renders a message, with an optional hint below it, centered on screen
fn render_status(frame: &mut Frame, message: &str, style: Style, hint: Option<&str>) {
    let mut lines = vec![Line::from(Span::styled(message.to_string(), style))];
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let area = frame.area();
    let status_area = centered_rect(area.width, lines.len() as u16, area);
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, status_area);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Search;

    let text = if app.search_query.is_empty() && !focused {
        Span::styled("Search for products", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            format!("{}{}", app.search_query, if focused { "_" } else { "" }),
            Style::default().fg(Color::White),
        )
    };

    let border_color = if focused { ACCENT } else { Color::Gray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(3), // Search glyph
            Constraint::Min(1),    // Query
            Constraint::Length(3), // Filter glyph
        ])
        .split(inner);

    let icon_style = Style::default().fg(Color::Gray);
    frame.render_widget(Paragraph::new(Span::styled(" \u{2315}", icon_style)), columns[0]); // ⌕
    frame.render_widget(Paragraph::new(Line::from(text)), columns[1]);
    frame.render_widget(Paragraph::new(Span::styled(" \u{2261}", icon_style)), columns[2]); // ≡
}

fn render_categories(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, CATEGORIES.len() as u32);
            CATEGORIES.len()
        ])
        .split(area);

    for (i, category) in CATEGORIES.iter().enumerate() {
        let selected = i == app.selected_category;
        let (fg, bg) = if selected {
            (Color::White, ACCENT)
        } else {
            (Color::White, Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(bg));

        let mut style = Style::default().fg(fg).bg(bg);
        if selected {
            style = style.add_modifier(Modifier::BOLD);
        }

        let label = Paragraph::new(Span::styled(
            format!(" {} {} ", category.icon, category.name),
            style,
        ))
        .alignment(Alignment::Center)
        .block(block);

        frame.render_widget(label, columns[i]);
    }
}

/// Renders visible product rows starting at the app's scroll offset
fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let items = app.visible_items();

    if items.is_empty() {
        let message = if app.search_query.is_empty() {
            "No products available".to_string()
        } else {
            format!("No products match \"{}\"", app.search_query)
        };
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::Gray)))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let mut y = area.y;
    let bottom = area.y + area.height;

    for (row, pair) in items.chunks(2).enumerate().skip(app.scroll_offset) {
        let first_index = row * 2;
        let row_height = (0..pair.len())
            .map(|offset| {
                if is_large_card(first_index + offset) {
                    LARGE_CARD_HEIGHT
                } else {
                    SMALL_CARD_HEIGHT
                }
            })
            .max()
            .unwrap_or(SMALL_CARD_HEIGHT);

        if y + row_height > bottom {
            break;
        }

        let row_area = Rect::new(area.x, y, area.width, row_height);
        render_row(frame, pair, first_index, row_area);
        y += row_height;
    }
}

/// Renders one row of up to two cards; large cards take twice the width
fn render_row(frame: &mut Frame, pair: &[&Item], first_index: usize, area: Rect) {
    let weights: Vec<u32> = (0..pair.len())
        .map(|offset| if is_large_card(first_index + offset) { 2 } else { 1 })
        .collect();
    let total: u32 = if pair.len() == 1 { 2 } else { weights.iter().sum() };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            weights
                .iter()
                .map(|w| Constraint::Ratio(*w, total))
                .collect::<Vec<_>>(),
        )
        .split(area);

    for (offset, item) in pair.iter().enumerate() {
        let index = first_index + offset;
        let height = if is_large_card(index) {
            LARGE_CARD_HEIGHT
        } else {
            SMALL_CARD_HEIGHT
        };
        let card_area = Rect::new(
            columns[offset].x,
            columns[offset].y,
            columns[offset].width,
            height.min(columns[offset].height),
        );
        render_card(frame, item, card_area);
    }
}

fn render_card(frame: &mut Frame, item: &Item, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Gray));

    let name = item.name().unwrap_or("Unnamed product").to_string();
    let mut lines = vec![Line::from(Span::styled(
        name,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))];

    if let Some(price) = item.price() {
        lines.push(Line::from(Span::styled(
            format_price(price),
            Style::default().fg(Color::Gray),
        )));
    }

    // Push the text towards the bottom of the card, where the image would end
    let inner_height = area.height.saturating_sub(2) as usize;
    let padding = inner_height.saturating_sub(lines.len());
    let mut padded = vec![Line::from(""); padding];
    padded.extend(lines);

    let paragraph = Paragraph::new(padded)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let updated = app
        .last_refresh
        .map(|t| format!("Updated {}", t.format("%H:%M")))
        .unwrap_or_default();

    let count = app.visible_items().len();
    let line = Line::from(vec![
        Span::styled(
            " / search  Tab category  j/k scroll  r reload  ? help  q quit",
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} products", count),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::styled(updated, Style::default().fg(Color::Gray)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{parse_items, FetchResult};
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|frame| render(frame, app)).unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with(body: &str) -> App {
        let mut app = App::new();
        app.sync(FetchResult {
            data: parse_items(body).unwrap(),
            loading: false,
            error: None,
        });
        app
    }

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(1.5), "$1.50");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(12.345), "$12.35");
    }

    #[test]
    fn test_every_third_card_is_large() {
        let large: Vec<usize> = (0..7).filter(|i| is_large_card(*i)).collect();
        assert_eq!(large, vec![0, 3, 6]);
    }

    #[test]
    fn test_loading_screen() {
        let app = App::new();
        let content = render_to_string(&app, 80, 24);
        assert!(content.contains("Loading..."));
        assert!(!content.contains("Search for products"));
    }

    #[test]
    fn test_error_screen_shows_message() {
        let mut app = App::new();
        app.sync(FetchResult {
            data: Vec::new(),
            loading: false,
            error: Some("No internet and no cached data available".to_string()),
        });

        let content = render_to_string(&app, 80, 24);

        assert!(content.contains("Error: No internet and no cached data available"));
    }

    #[test]
    fn test_storefront_renders_search_categories_and_cards() {
        let app = app_with(
            r#"[{"id":"1","name":"Mango","price":1.5},
                {"id":"2","name":"Orange","price":0.8}]"#,
        );

        let content = render_to_string(&app, 100, 30);

        assert!(content.contains("Search for products"));
        for category in CATEGORIES {
            assert!(content.contains(category.name), "missing {}", category.name);
        }
        assert!(content.contains("Mango"));
        assert!(content.contains("$1.50"));
        assert!(content.contains("Orange"));
        assert!(content.contains("$0.80"));
        assert!(content.contains("2 products"));
    }

    #[test]
    fn test_search_hides_non_matching_cards() {
        let mut app = app_with(
            r#"[{"id":"1","name":"Mango","price":1.5},
                {"id":"2","name":"Orange","price":0.8}]"#,
        );
        app.search_query = "man".to_string();

        let content = render_to_string(&app, 100, 30);

        assert!(content.contains("Mango"));
        assert!(!content.contains("Orange"));
    }

    #[test]
    fn test_empty_catalog_message() {
        let app = app_with("[]");
        let content = render_to_string(&app, 80, 24);
        assert!(content.contains("No products available"));
    }

    #[test]
    fn test_card_without_price_renders_name_only() {
        let app = app_with(r#"[{"id":"9","name":"Coconut"}]"#);
        let content = render_to_string(&app, 80, 24);
        assert!(content.contains("Coconut"));
        assert!(!content.contains('$'));
    }
}
