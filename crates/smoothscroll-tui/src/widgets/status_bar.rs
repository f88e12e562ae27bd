use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use smoothscroll_core::engine::Axis;

use crate::app::App;
use crate::theme::GruvboxMaterial;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else if let Some(view) = app.workspace.focused() {
            let id = view.id();
            let state = if app.engine.is_animating(id) {
                format!(
                    "SCROLLING dy={:.0} dx={:.0}",
                    app.engine.pending(id, Axis::Y),
                    app.engine.pending(id, Axis::X)
                )
            } else {
                "IDLE".to_string()
            };
            format!(
                " {} | {} | Ln {}/{} | {:?}",
                state,
                if app.workspace.is_linked() { "LINKED" } else { "SINGLE" },
                view.cursor().row + 1,
                view.lines().len(),
                app.engine.config().step_policy,
            )
        } else {
            String::new()
        };

        let status_style = if app.status_message.is_some() {
            Style::default().fg(GruvboxMaterial::RED).bg(GruvboxMaterial::BG2)
        } else {
            Style::default().fg(GruvboxMaterial::FG0).bg(GruvboxMaterial::BG2)
        };

        let help_hint = " q:quit j/k:cursor ^f/^b:page zz:center =:link ";
        let padding_len = area
            .width
            .saturating_sub(status_text.len() as u16 + help_hint.len() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(status_text, status_style),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                help_hint,
                Style::default()
                    .fg(GruvboxMaterial::GREY2)
                    .bg(GruvboxMaterial::BG2),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
