//! L3 Molecular Layer: Pending delta accumulator
//!
//! Holds the outstanding distance of one surface and folds new requests
//! into it. Nothing here touches the viewport; the driver consumes the
//! pending distance frame by frame.

use super::request::{AnchorJump, AxisRequest, ScrollRequest};
use super::surface::{Axis, Surface};

/// Sign with an explicit zero, unlike `f64::signum`
#[inline]
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Outstanding distance on one axis
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisState {
    pub pending: f64,
}

impl AxisState {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.pending == 0.0
    }

    /// Fold one axis request into the pending distance
    ///
    /// `bonus` is `divisor - 1` when the sign-flip bonus is enabled, else 0.
    pub fn merge(&mut self, request: AxisRequest, current_offset: f64, bonus: f64) {
        match request {
            AxisRequest::Reset(value) => self.pending = value,
            AxisRequest::Relative(delta) => self.assign(self.pending + delta, bonus),
            AxisRequest::Absolute(target) => self.assign(target - current_offset, bonus),
        }
    }

    /// Assign a merged value, adding the bonus when the direction flips
    fn assign(&mut self, merged: f64, bonus: f64) {
        let before = sign(self.pending);
        let after = sign(merged);
        self.pending = if after != 0.0 && after != before {
            merged + bonus * after
        } else {
            merged
        };
    }
}

/// Vertical distance that brings an anchor into view
///
/// Centered jumps scroll the anchor to the middle of the viewport. Other
/// jumps only scroll the part that falls outside the autoscroll margin, so
/// an anchor already comfortably on screen yields zero.
pub fn anchor_delta(jump: &AnchorJump, surface: &dyn Surface) -> f64 {
    let position = surface.measure_anchor(jump.anchor);
    let viewport = surface.viewport_height();
    let line_height = surface.line_height();
    let delta = position.top - surface.scroll_offset(Axis::Y) - viewport / 2.0;

    if jump.centered {
        return delta;
    }

    let margin = (viewport / 2.0 - surface.autoscroll_margin() * line_height).max(0.0);
    if delta > 0.0 {
        (delta - margin + line_height).max(0.0)
    } else {
        (delta + margin).min(0.0)
    }
}

/// Pending state of one surface
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    pub x: AxisState,
    pub y: AxisState,
}

impl Accumulator {
    /// First pending value that is NaN or infinite, if any
    pub fn non_finite(&self) -> Option<f64> {
        [self.x.pending, self.y.pending]
            .into_iter()
            .find(|v| !v.is_finite())
    }

    pub fn axis(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.x.is_idle() && self.y.is_idle()
    }

    pub fn clear(&mut self) {
        self.x.pending = 0.0;
        self.y.pending = 0.0;
    }

    /// Merge a request; both axes are handled independently
    pub fn merge(&mut self, request: &ScrollRequest, surface: &dyn Surface, bonus: f64) {
        if let Some(x) = request.x {
            self.x.merge(x, surface.scroll_offset(Axis::X), bonus);
        }

        let y = match request.anchor {
            Some(jump) => {
                let offset = surface.scroll_offset(Axis::Y);
                Some(AxisRequest::Absolute(offset + anchor_delta(&jump, surface)))
            }
            None => request.y,
        };
        if let Some(y) = y {
            self.y.merge(y, surface.scroll_offset(Axis::Y), bonus);
        }
    }
}
