use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use super::screens::Screen;

const RAIL_WIDTH: u16 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UiLayout {
    pub tabs: Rect,
    pub rail: Rect,
    pub body: Rect,
    pub status: Rect,
}

pub(crate) fn split_layout(area: Rect) -> UiLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(RAIL_WIDTH), Constraint::Min(1)])
        .split(rows[1]);

    UiLayout {
        tabs: rows[0],
        rail: middle[0],
        body: middle[1],
        status: rows[2],
    }
}

pub(crate) struct TabItem {
    pub ordinal: usize,
    pub title: String,
    pub active: bool,
}

pub(crate) struct RailItem {
    pub label: String,
    pub current: bool,
    pub selected: bool,
}

pub(crate) struct ChromeView<'a> {
    pub tabs: Vec<TabItem>,
    pub rail: Vec<RailItem>,
    pub screen: &'a Screen,
    pub status: String,
}

pub(crate) fn draw_chrome(frame: &mut Frame<'_>, layout: UiLayout, view: &ChromeView<'_>) {
    draw_tabs(frame, layout.tabs, &view.tabs);
    draw_rail(frame, layout.rail, &view.rail);
    draw_body(frame, layout.body, view.screen);

    let status = Paragraph::new(view.status.clone()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, layout.status);
}

fn draw_tabs(frame: &mut Frame<'_>, area: Rect, tabs: &[TabItem]) {
    let mut spans = Vec::with_capacity(tabs.len() * 2);
    for tab in tabs {
        let label = format!(" {}:{} ", tab.ordinal, fit_label(&tab.title, 14));
        let style = if tab.active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_rail(frame: &mut Frame<'_>, area: Rect, rail: &[RailItem]) {
    let max = area.width.saturating_sub(4) as usize;
    let lines: Vec<Line<'_>> = rail
        .iter()
        .map(|item| {
            let marker = if item.selected { "▸ " } else { "  " };
            let style = if item.current {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(fit_label(&item.label, max), style),
            ])
        })
        .collect();

    let block = Block::bordered().title("pages");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_body(frame: &mut Frame<'_>, area: Rect, screen: &Screen) {
    let block = Block::bordered().title(screen.heading);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(screen.summary), Line::from("")];
    for (name, value) in screen.fields {
        lines.push(Line::from(vec![
            Span::styled(format!("{name:<20}"), Style::default().fg(Color::Gray)),
            Span::raw(*value),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn fit_label(label: &str, max: usize) -> String {
    let mut width = 0;
    let mut fitted = String::new();
    for ch in label.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max {
            fitted.push('…');
            return fitted;
        }
        width += ch_width;
        fitted.push(ch);
    }
    fitted
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{fit_label, split_layout};

    #[test]
    fn split_layout_reserves_tabs_rail_and_status() {
        let layout = split_layout(Rect::new(0, 0, 120, 40));

        assert_eq!(layout.tabs.height, 1);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.rail.width, 20);
        assert_eq!(layout.body.height, 38);
        assert_eq!(layout.body.width, 100);
    }

    #[test]
    fn fit_label_truncates_by_display_width() {
        assert_eq!(fit_label("users", 10), "users");
        assert_eq!(fit_label("a-very-long-page-name", 8), "a-very-l…");
        assert_eq!(fit_label("五十音順の索引", 6), "五十音…");
    }
}
