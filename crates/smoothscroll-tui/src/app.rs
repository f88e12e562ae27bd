use std::sync::Arc;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use smoothscroll_core::{
    engine::{Axis, DivisorClass, ScrollRequest, SurfaceId},
    input::{command_request, wheel_request, ScrollCommand},
    AppConfig, ScrollConfig, ScrollEngine,
};
use tracing::{debug, warn};

use crate::event::AppEvent;
use crate::input::{handle_key_event, handle_mouse_event, Action};
use crate::keymap::Keymap;
use crate::surface::TextView;
use crate::widgets::{StatusBarWidget, TextViewWidget};
use crate::workspace::Workspace;

/// Viewer state: panes, the scroll engine and input bookkeeping
pub struct App {
    pub config: Arc<AppConfig>,
    pub engine: ScrollEngine,
    pub workspace: Workspace,
    pub keymap: Keymap,
    /// First key of a doubled sequence ("g" of "gg")
    pub pending_key: Option<char>,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Arc<AppConfig>, workspace: Workspace) -> Self {
        let keymap = Keymap::from_config(&config.keymap);
        let engine = ScrollEngine::new(config.scroll.clone());
        Self {
            config,
            engine,
            workspace,
            keymap,
            pending_key: None,
            status_message: None,
            should_quit: false,
        }
    }

    /// Whether the next frame should come at animation speed
    #[inline]
    pub fn needs_fast_update(&self) -> bool {
        self.engine.needs_update()
    }

    /// Advance every running scroll animation by one frame
    pub fn on_frame(&mut self) -> usize {
        self.engine.pump(&mut self.workspace)
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        let action = match event {
            AppEvent::Key(key) => handle_key_event(key, &self.keymap, self.pending_key),
            AppEvent::Mouse(mouse) => handle_mouse_event(mouse),
            AppEvent::Resize(..) | AppEvent::Tick => return,
        };
        self.dispatch(action);
    }

    pub fn dispatch(&mut self, action: Action) {
        if !matches!(action, Action::None | Action::Wheel { .. }) {
            self.status_message = None;
        }
        self.pending_key = match action {
            Action::Pending(c) => Some(c),
            _ => None,
        };

        match action {
            Action::Quit => {
                self.engine.teardown_all();
                self.should_quit = true;
            }
            Action::CursorUp => self.move_cursor(-1),
            Action::CursorDown => self.move_cursor(1),
            Action::PageUp => self.command(ScrollCommand::PageUp),
            Action::PageDown => self.command(ScrollCommand::PageDown),
            Action::LineUp => self.command(ScrollCommand::LineUp),
            Action::LineDown => self.command(ScrollCommand::LineDown),
            Action::LineLeft => self.command(ScrollCommand::LineLeft),
            Action::LineRight => self.command(ScrollCommand::LineRight),
            Action::JumpToTop => self.jump_to_edge(false),
            Action::JumpToBottom => self.jump_to_edge(true),
            Action::CenterCursor => {
                if let Some(view) = self.workspace.focused() {
                    let id = view.id();
                    let anchor = view.cursor();
                    self.submit_each(&[id], |config, view| {
                        command_request(ScrollCommand::CenterCursor(anchor), config, view)
                    });
                }
            }
            Action::FocusNext => self.workspace.focus_next(),
            Action::ToggleLinked => {
                let linked = self.workspace.toggle_linked();
                debug!(linked, "Toggled linked scrolling");
            }
            Action::ClosePane => {
                if let Some(id) = self.workspace.close_focused() {
                    self.engine.teardown(id);
                }
            }
            Action::Wheel { event, column, row } => {
                let origin = self.workspace.pane_at(column, row);
                let targets = self.workspace.targets(origin);
                let config = self.engine.config().clone();
                let source = origin
                    .and_then(|id| self.pane(id))
                    .or_else(|| self.workspace.focused());
                if let Some(view) = source {
                    let request = wheel_request(event, &config, view);
                    let result = self.engine.fan_out(&mut self.workspace, &targets, request);
                    self.report(result);
                }
            }
            Action::Focus { column, row } => {
                self.workspace.focus_at(column, row);
            }
            Action::Pending(_) | Action::None => {}
        }
    }

    fn pane(&self, id: SurfaceId) -> Option<&TextView> {
        self.workspace.panes().iter().find(|p| p.id() == id)
    }

    /// Move the focused cursor and scroll it into view
    fn move_cursor(&mut self, rows: isize) {
        let Some(view) = self.workspace.focused_mut() else {
            return;
        };
        view.move_cursor(rows);
        let id = view.id();
        let anchor = view.cursor();
        self.submit_each(&[id], |config, view| {
            command_request(ScrollCommand::RevealCursor(anchor), config, view)
        });
    }

    fn command(&mut self, command: ScrollCommand) {
        let targets = self.workspace.targets(None);
        self.submit_each(&targets, |config, view| command_request(command, config, view));
    }

    /// Scroll to the first or last line, moving the focused cursor along
    fn jump_to_edge(&mut self, bottom: bool) {
        if let Some(view) = self.workspace.focused_mut() {
            let rows = if bottom { isize::MAX / 2 } else { -(isize::MAX / 2) };
            view.move_cursor(rows);
        }
        let targets = self.workspace.targets(None);
        self.submit_each(&targets, |_, view| {
            let target = if bottom {
                view.max_scroll(Axis::Y)
            } else {
                0.0
            };
            ScrollRequest::absolute_y(target).with_divisor(DivisorClass::Command)
        });
    }

    /// Build a request per target surface and submit it
    fn submit_each<F>(&mut self, targets: &[SurfaceId], build: F)
    where
        F: Fn(&ScrollConfig, &TextView) -> ScrollRequest,
    {
        let config = self.engine.config().clone();
        for &id in targets {
            let Some(view) = self.pane(id) else {
                debug!(surface = %id, "Scroll target is gone, skipping");
                continue;
            };
            let request = build(&config, view);
            let result = self.engine.submit(&mut self.workspace, id, request);
            self.report(result);
        }
    }

    fn report(&mut self, result: smoothscroll_core::Result<()>) {
        if let Err(e) = result {
            warn!(error = %e, "Scroll request failed");
            self.status_message = Some(e.to_string());
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());

        let count = self.workspace.panes().len().max(1) as u32;
        let pane_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, count); count as usize])
            .split(chunks[0]);

        let focused = self.workspace.focused_index();
        for (i, area) in pane_areas.iter().enumerate() {
            let Some(id) = self.workspace.panes().get(i).map(TextView::id) else {
                break;
            };
            let animating = self.engine.is_animating(id);
            let view = &mut self.workspace.panes_mut()[i];
            TextViewWidget::render(frame, *area, view, i == focused, animating);
        }

        StatusBarWidget::render(frame, chunks[1], self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Action;
    use crate::surface::CellMetrics;
    use ratatui::layout::Rect;
    use smoothscroll_core::engine::Surface;
    use smoothscroll_core::input::WheelEvent;

    fn document(lines: usize) -> String {
        (0..lines).map(|i| format!("line {}\n", i)).collect()
    }

    fn app(panes: usize) -> App {
        let text = document(500);
        let views = (0..panes)
            .map(|i| {
                let mut view = TextView::new(format!("pane {}", i), &text, CellMetrics::default());
                view.set_area(Rect::new(i as u16 * 40, 0, 40, 20));
                view
            })
            .collect();
        App::new(Arc::new(AppConfig::default()), Workspace::new(views))
    }

    fn run_until_idle(app: &mut App) -> usize {
        let mut frames = 0;
        while app.needs_fast_update() {
            app.on_frame();
            frames += 1;
            assert!(frames < 10_000);
        }
        frames
    }

    fn offset(app: &App, index: usize) -> f64 {
        app.workspace.panes()[index].scroll_offset(Axis::Y)
    }

    #[test]
    fn test_page_down_animates_one_page() {
        let mut app = app(1);
        app.dispatch(Action::PageDown);
        assert!(app.needs_fast_update());

        let frames = run_until_idle(&mut app);
        assert!(frames > 5);
        // 20 rows * 16px, minus a sub-divisor residue
        let top = offset(&app, 0);
        assert!(top > 320.0 - 7.0 && top <= 320.0, "top = {}", top);
        assert_eq!(app.workspace.panes()[0].finished_animations(), 1);
    }

    #[test]
    fn test_wheel_targets_pane_under_pointer() {
        let mut app = app(2);
        app.dispatch(Action::Wheel {
            event: WheelEvent::notch_down(),
            column: 50,
            row: 5,
        });
        run_until_idle(&mut app);
        assert_eq!(offset(&app, 0), 0.0);
        assert!(offset(&app, 1) > 0.0);
    }

    #[test]
    fn test_linked_wheel_fans_out() {
        let mut app = app(2);
        app.dispatch(Action::ToggleLinked);
        app.dispatch(Action::Wheel {
            event: WheelEvent::notch_down(),
            column: 5,
            row: 5,
        });
        run_until_idle(&mut app);
        assert!(offset(&app, 0) > 0.0);
        assert_eq!(offset(&app, 0), offset(&app, 1));
    }

    #[test]
    fn test_cursor_down_reveals_cursor() {
        let mut app = app(1);
        for _ in 0..30 {
            app.dispatch(Action::CursorDown);
        }
        run_until_idle(&mut app);
        let view = &app.workspace.panes()[0];
        assert_eq!(view.cursor().row, 30);
        let last_visible = view.first_row() + view.viewport_rows() as usize - 1;
        assert!(view.first_row() <= 30 && 30 <= last_visible);
    }

    #[test]
    fn test_jump_to_bottom_and_top() {
        let mut app = app(1);
        app.dispatch(Action::JumpToBottom);
        run_until_idle(&mut app);
        let max = app.workspace.panes()[0].max_scroll(Axis::Y);
        assert!(offset(&app, 0) > max - 7.0);
        assert_eq!(app.workspace.panes()[0].cursor().row, 499);

        app.dispatch(Action::JumpToTop);
        run_until_idle(&mut app);
        assert!(offset(&app, 0) < 7.0);
        assert_eq!(app.workspace.panes()[0].cursor().row, 0);
    }

    #[test]
    fn test_close_pane_tears_down_animation() {
        let mut app = app(2);
        app.dispatch(Action::FocusNext);
        app.dispatch(Action::PageDown);
        let closing = app.workspace.focused().map(TextView::id).unwrap();
        assert!(app.engine.is_animating(closing));

        app.dispatch(Action::ClosePane);
        assert!(!app.engine.is_animating(closing));
        assert_eq!(app.engine.scheduler().count_for(closing), 0);
        assert!(!app.needs_fast_update());
    }

    #[test]
    fn test_pending_key_sequence() {
        let mut app = app(1);
        app.dispatch(Action::Pending('z'));
        assert_eq!(app.pending_key, Some('z'));
        app.dispatch(Action::CursorDown);
        assert_eq!(app.pending_key, None);
    }

    #[test]
    fn test_quit_stops_animations() {
        let mut app = app(1);
        app.dispatch(Action::PageDown);
        app.dispatch(Action::Quit);
        assert!(app.should_quit);
        assert!(!app.needs_fast_update());
    }
}
