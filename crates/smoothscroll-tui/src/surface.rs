//! Terminal text view implementing the engine's `Surface`
//!
//! Offsets are kept in virtual pixels (`cell_height_px` per row,
//! `cell_width_px` per column) so the engine's integer steps stay smooth
//! relative to the cell grid. The first rendered row is
//! `floor(scroll_top / cell_height)`.

use ratatui::layout::Rect;
use smoothscroll_core::engine::{Anchor, AnchorPosition, Axis, Surface, SurfaceId};
use smoothscroll_core::UiConfig;
use unicode_width::UnicodeWidthStr;

/// Cell geometry and per-surface input settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_height: f64,
    pub cell_width: f64,
    pub sensitivity: f64,
    pub autoscroll_margin: f64,
}

impl CellMetrics {
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            cell_height: ui.cell_height_px.max(1) as f64,
            cell_width: ui.cell_width_px.max(1) as f64,
            sensitivity: ui.scroll_sensitivity as f64,
            autoscroll_margin: ui.autoscroll_margin as f64,
        }
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}

/// A scrollable buffer of lines with a cursor
#[derive(Debug, Clone)]
pub struct TextView {
    id: SurfaceId,
    title: String,
    lines: Vec<String>,
    max_line_width: usize,
    cursor: Anchor,
    scroll_top: f64,
    scroll_left: f64,
    viewport_rows: u16,
    viewport_cols: u16,
    /// Screen area of the text, updated on every render
    area: Rect,
    metrics: CellMetrics,
    dirty: bool,
    finished_animations: usize,
}

impl TextView {
    pub fn new(title: impl Into<String>, text: &str, metrics: CellMetrics) -> Self {
        let lines: Vec<String> = text.lines().map(|l| l.replace('\t', "    ")).collect();
        let lines = if lines.is_empty() { vec![String::new()] } else { lines };
        let max_line_width = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        Self {
            id: SurfaceId::new(),
            title: title.into(),
            lines,
            max_line_width,
            cursor: Anchor::default(),
            scroll_top: 0.0,
            scroll_left: 0.0,
            viewport_rows: 0,
            viewport_cols: 0,
            area: Rect::default(),
            metrics,
            dirty: true,
            finished_animations: 0,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> Anchor {
        self.cursor
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn metrics(&self) -> &CellMetrics {
        &self.metrics
    }

    /// Number of animation runs that have finished on this view
    pub fn finished_animations(&self) -> usize {
        self.finished_animations
    }

    /// First visible row
    pub fn first_row(&self) -> usize {
        (self.scroll_top / self.metrics.cell_height).floor() as usize
    }

    /// First visible column
    pub fn first_col(&self) -> usize {
        (self.scroll_left / self.metrics.cell_width).floor() as usize
    }

    pub fn viewport_rows(&self) -> u16 {
        self.viewport_rows
    }

    /// Update the on-screen area; offsets are re-clamped to the new size
    pub fn set_area(&mut self, area: Rect) {
        if area == self.area {
            return;
        }
        self.area = area;
        self.viewport_rows = area.height;
        self.viewport_cols = area.width;
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll(Axis::Y));
        self.scroll_left = self.scroll_left.clamp(0.0, self.max_scroll(Axis::X));
        self.dirty = true;
    }

    /// Largest offset on an axis
    pub fn max_scroll(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Y => {
                let rows = self.lines.len().saturating_sub(self.viewport_rows as usize);
                rows as f64 * self.metrics.cell_height
            }
            Axis::X => {
                let cols = self.max_line_width.saturating_sub(self.viewport_cols as usize);
                cols as f64 * self.metrics.cell_width
            }
        }
    }

    /// Move the cursor by a number of rows
    pub fn move_cursor(&mut self, rows: isize) {
        let last = self.lines.len().saturating_sub(1) as isize;
        let row = (self.cursor.row as isize + rows).clamp(0, last);
        self.cursor.row = row as usize;
        self.dirty = true;
    }

    /// Whether the view needs to be redrawn; clears the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Pull the cursor back inside the visible rows
    fn keep_cursor_visible(&mut self) {
        if self.viewport_rows == 0 {
            return;
        }
        let first = self.first_row();
        let last = (first + self.viewport_rows as usize)
            .saturating_sub(1)
            .min(self.lines.len().saturating_sub(1));
        let row = self.cursor.row.clamp(first, last.max(first));
        if row != self.cursor.row {
            self.cursor.row = row;
            self.dirty = true;
        }
    }
}

impl Surface for TextView {
    fn scroll_offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.scroll_left,
            Axis::Y => self.scroll_top,
        }
    }

    fn set_scroll_offset(&mut self, axis: Axis, value: f64) -> smoothscroll_core::Result<bool> {
        let clamped = value.clamp(0.0, self.max_scroll(axis));
        let slot = match axis {
            Axis::X => &mut self.scroll_left,
            Axis::Y => &mut self.scroll_top,
        };
        let changed = clamped != *slot;
        *slot = clamped;
        Ok(changed)
    }

    fn request_visual_update(&mut self) {
        self.dirty = true;
    }

    fn measure_anchor(&self, anchor: Anchor) -> AnchorPosition {
        AnchorPosition {
            top: anchor.row as f64 * self.metrics.cell_height,
        }
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_rows as f64 * self.metrics.cell_height
    }

    fn line_height(&self) -> f64 {
        self.metrics.cell_height
    }

    fn autoscroll_margin(&self) -> f64 {
        self.metrics.autoscroll_margin
    }

    fn scroll_sensitivity(&self) -> f64 {
        self.metrics.sensitivity
    }

    fn on_animation_ended(&mut self) {
        self.finished_animations += 1;
        self.keep_cursor_visible();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(lines: usize) -> TextView {
        let text: String = (0..lines).map(|i| format!("line {}\n", i)).collect();
        let mut view = TextView::new("test", &text, CellMetrics::default());
        view.set_area(Rect::new(0, 0, 40, 10));
        view
    }

    #[test]
    fn test_offsets_clamp_to_document() {
        let mut view = view(100);
        assert_eq!(view.max_scroll(Axis::Y), 90.0 * 16.0);

        assert!(view.set_scroll_offset(Axis::Y, 5000.0).unwrap());
        assert_eq!(view.scroll_offset(Axis::Y), 1440.0);
        assert!(!view.set_scroll_offset(Axis::Y, 9000.0).unwrap());

        assert!(view.set_scroll_offset(Axis::Y, -10.0).unwrap());
        assert_eq!(view.scroll_offset(Axis::Y), 0.0);
    }

    #[test]
    fn test_short_lines_cannot_scroll_horizontally() {
        let mut view = view(100);
        assert_eq!(view.max_scroll(Axis::X), 0.0);
        assert!(!view.set_scroll_offset(Axis::X, 80.0).unwrap());
    }

    #[test]
    fn test_first_row_floors_subpixel_offset() {
        let mut view = view(100);
        view.set_scroll_offset(Axis::Y, 47.0).unwrap();
        assert_eq!(view.first_row(), 2);
    }

    #[test]
    fn test_animation_end_keeps_cursor_visible() {
        let mut view = view(100);
        view.set_scroll_offset(Axis::Y, 320.0).unwrap();
        view.on_animation_ended();
        assert_eq!(view.cursor().row, 20);
        assert_eq!(view.finished_animations(), 1);
    }

    #[test]
    fn test_move_cursor_clamps() {
        let mut view = view(5);
        view.move_cursor(-3);
        assert_eq!(view.cursor().row, 0);
        view.move_cursor(50);
        assert_eq!(view.cursor().row, 4);
    }

    #[test]
    fn test_tabs_expand_for_width() {
        let view = TextView::new("t", "\tx", CellMetrics::default());
        assert_eq!(view.lines()[0], "    x");
    }
}
