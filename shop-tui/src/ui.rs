//! Terminal rendering of the view fragments
//!
//! Pure projection: walks the node trees the views produced and draws
//! them with ratatui. No state lives here and nothing is mutated.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::dom::Node;

/// Draw the page and, when visible, the modal overlay
pub fn render(frame: &mut Frame, page: &Node, modal: &Node, cursor: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_header(frame, page, chunks[0]);
    render_gallery(frame, page, chunks[1], cursor);
    render_footer(frame, modal, chunks[2]);

    if !modal.hidden() {
        render_modal(frame, modal);
    }
}

fn render_header(frame: &mut Frame, page: &Node, area: Rect) {
    let title = page
        .find("page.title")
        .map(Node::text)
        .unwrap_or("Storefront");
    let counter = page
        .find("page.basket-counter")
        .map(Node::text)
        .unwrap_or("0");

    let line = Line::from(vec![
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            format!("Basket: {}", counter),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    let header = Paragraph::new(line)
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_gallery(frame: &mut Frame, page: &Node, area: Rect, cursor: usize) {
    let empty = Vec::new();
    let cards = page
        .find("page.gallery")
        .map(Node::children)
        .unwrap_or(&empty);

    let items: Vec<ListItem> = cards.iter().map(card_item).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Catalog "))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !cards.is_empty() {
        state.select(Some(cursor.min(cards.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn card_item(card: &Node) -> ListItem<'static> {
    let title = card.find("card.title").map(Node::text).unwrap_or("");
    let category = card.find("card.category").map(Node::text).unwrap_or("");
    let price = card.find("card.price").map(Node::text).unwrap_or("");

    ListItem::new(Line::from(vec![
        Span::raw(title.to_string()),
        Span::styled(
            format!("  [{}]", category),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("  {}", price),
            Style::default().fg(Color::Green),
        ),
    ]))
}

fn render_footer(frame: &mut Frame, modal: &Node, area: Rect) {
    let help = if modal.hidden() {
        "up/down: browse  enter: preview  b: basket  q: quit"
    } else {
        "enter: confirm  tab: next field  esc: close"
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_modal(frame: &mut Frame, modal: &Node) {
    let area = centered_rect(60, 70, frame.size());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    if let Some(content) = modal.find("modal.content") {
        for child in content.children() {
            collect_lines(child, &mut lines);
        }
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, area);
}

/// Flatten a fragment into styled lines, one per leaf with content
fn collect_lines(node: &Node, out: &mut Vec<Line<'static>>) {
    if node.hidden() {
        return;
    }

    match node.tag() {
        "button" => {
            let style = if node.disabled() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Cyan)
            };
            let marker = if node.attr("selected") == Some("true") {
                "[x] "
            } else {
                ""
            };
            out.push(Line::from(Span::styled(
                format!("{}[ {} ]", marker, node.text()),
                style,
            )));
        }
        "input" => {
            let label = node.attr("label").unwrap_or("");
            let style = if node.attr("focused") == Some("true") {
                Style::default().add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default()
            };
            out.push(Line::from(Span::styled(
                format!("{}: {}_", label, node.text()),
                style,
            )));
        }
        "h1" | "h2" => {
            if !node.text().is_empty() {
                out.push(Line::from(Span::styled(
                    node.text().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
            }
        }
        "img" => {} // nothing sensible to draw for an image path
        _ => {
            if !node.text().is_empty() {
                let style = if node.key().map_or(false, |k| k.ends_with(".errors")) {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                out.push(Line::from(Span::styled(node.text().to_string(), style)));
            }
        }
    }

    for child in node.children() {
        collect_lines(child, out);
    }
}

/// A rect centered in `area`, sized as percentages of it
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_lines_skips_hidden_and_empty() {
        let tree = Node::new("div")
            .with_child(Node::new("p").with_text("visible"))
            .with_child({
                let mut hidden = Node::new("p").with_text("gone");
                hidden.set_hidden(true);
                hidden
            })
            .with_child(Node::new("p"));

        let mut lines = Vec::new();
        collect_lines(&tree, &mut lines);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_collect_lines_renders_inputs_with_labels() {
        let input = Node::new("input").with_attr("label", "Email");
        let mut lines = Vec::new();
        collect_lines(&input, &mut lines);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 70, area);
        assert!(inner.width <= area.width);
        assert!(inner.height <= area.height);
        assert!(inner.x >= area.x && inner.y >= area.y);
    }
}
