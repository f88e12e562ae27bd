use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::surface::TextView;
use crate::theme::GruvboxMaterial;

pub struct TextViewWidget;

impl TextViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, view: &mut TextView, is_focused: bool, animating: bool) {
        let border_style = if is_focused {
            Style::default().fg(GruvboxMaterial::ACCENT)
        } else {
            Style::default().fg(GruvboxMaterial::GREY0)
        };

        let title = if animating {
            format!(" {} ~ ", view.title())
        } else {
            format!(" {} ", view.title())
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(GruvboxMaterial::BG0));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let gutter = gutter_width(view.lines().len());
        let text_area = Rect {
            x: inner.x + gutter.min(inner.width),
            width: inner.width.saturating_sub(gutter),
            ..inner
        };
        // Geometry must be current before the engine measures the view
        view.set_area(text_area);

        let first_row = view.first_row();
        let first_col = view.first_col();
        let cursor_row = view.cursor().row;

        let mut lines: Vec<Line> = Vec::with_capacity(inner.height as usize);
        for (row, content) in view
            .lines()
            .iter()
            .enumerate()
            .skip(first_row)
            .take(inner.height as usize)
        {
            let is_cursor = row == cursor_row;
            let number_style = if is_cursor {
                Style::default().fg(GruvboxMaterial::YELLOW)
            } else {
                Style::default().fg(GruvboxMaterial::GREY0)
            };
            let text_style = if is_cursor && is_focused {
                Style::default()
                    .fg(GruvboxMaterial::FG0)
                    .bg(GruvboxMaterial::BG1)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(GruvboxMaterial::FG0)
            };

            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:>width$} ", row + 1, width = gutter.saturating_sub(1) as usize),
                    number_style,
                ),
                Span::styled(
                    visible_slice(content, first_col, text_area.width as usize),
                    text_style,
                ),
            ]));
        }

        frame.render_widget(Paragraph::new(Text::from(lines)), inner);
    }
}

/// Columns used by line numbers plus one space
fn gutter_width(line_count: usize) -> u16 {
    (line_count.max(1).to_string().len() + 1) as u16
}

/// Cut a line to the columns `[skip, skip + width)`
fn visible_slice(line: &str, skip: usize, width: usize) -> String {
    let mut col = 0;
    let mut out = String::new();
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if col >= skip + width {
            break;
        }
        if col >= skip && col + w <= skip + width {
            out.push(c);
        }
        col += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gutter_width() {
        assert_eq!(gutter_width(0), 2);
        assert_eq!(gutter_width(9), 2);
        assert_eq!(gutter_width(10), 3);
        assert_eq!(gutter_width(1234), 5);
    }

    #[test]
    fn test_visible_slice() {
        assert_eq!(visible_slice("hello world", 0, 5), "hello");
        assert_eq!(visible_slice("hello world", 6, 20), "world");
        assert_eq!(visible_slice("short", 10, 5), "");
        // Wide chars that straddle the edge are dropped
        assert_eq!(visible_slice("a漢字", 0, 2), "a");
    }
}
