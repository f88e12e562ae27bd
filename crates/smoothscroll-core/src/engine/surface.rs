//! L4 Atomic Layer: The host-facing capability set
//!
//! The engine never owns a surface. Hosts implement [`Surface`] for their
//! viewport type and expose a set of them through [`SurfaceHost`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a scrollable surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub Uuid);

impl SurfaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal (scroll left)
    X,
    /// Vertical (scroll top)
    Y,
}

/// Logical position in the buffer a jump can target (usually the cursor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    pub row: usize,
    pub column: usize,
}

impl Anchor {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Pixel position of an anchor in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorPosition {
    pub top: f64,
}

/// Capabilities a scrollable viewport offers the engine
pub trait Surface {
    /// Current scroll offset on an axis
    fn scroll_offset(&self, axis: Axis) -> f64;

    /// Commit a new scroll offset
    ///
    /// Returns whether the offset actually changed; `false` means the value
    /// was clamped at a bound. Errors are treated as `false` by the engine.
    fn set_scroll_offset(&mut self, axis: Axis, value: f64) -> crate::Result<bool>;

    /// Ask the host to redraw
    fn request_visual_update(&mut self);

    /// Pixel position of an anchor
    fn measure_anchor(&self, anchor: Anchor) -> AnchorPosition;

    /// Height of the visible area in pixels
    fn viewport_height(&self) -> f64;

    /// Height of one line in pixels
    fn line_height(&self) -> f64;

    /// Lines kept between the cursor and the viewport edge
    fn autoscroll_margin(&self) -> f64;

    /// Wheel sensitivity in percent
    fn scroll_sensitivity(&self) -> f64 {
        100.0
    }

    /// Called once when an animation run finishes
    fn on_animation_ended(&mut self) {}
}

/// Resolves surface identities to live surfaces
pub trait SurfaceHost {
    fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut dyn Surface>;
}
