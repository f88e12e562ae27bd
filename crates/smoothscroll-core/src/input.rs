//! Input normalization
//!
//! Converts raw wheel events and named scroll commands into engine requests.
//! Sensitivity, direction and multipliers are applied here so the engine
//! only ever sees distances in pixels.

use crate::config::ScrollConfig;
use crate::engine::{Anchor, DivisorClass, ScrollRequest, Surface};

/// One wheel notch or trackpad delta
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelEvent {
    /// Wheel delta, positive when rolling away from the user
    pub delta: f64,
    /// Route the scroll to the horizontal axis
    pub shift: bool,
    /// Use the speed multiplier
    pub alt: bool,
}

/// Wheel delta reported for one notch by most platforms
pub const WHEEL_NOTCH: f64 = 120.0;

impl WheelEvent {
    /// One notch toward the top of the document
    pub fn notch_up() -> Self {
        Self {
            delta: WHEEL_NOTCH,
            ..Default::default()
        }
    }

    /// One notch toward the bottom of the document
    pub fn notch_down() -> Self {
        Self {
            delta: -WHEEL_NOTCH,
            ..Default::default()
        }
    }

    pub fn with_modifiers(mut self, shift: bool, alt: bool) -> Self {
        self.shift = shift;
        self.alt = alt;
        self
    }
}

/// Named scroll commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollCommand {
    PageUp,
    PageDown,
    LineUp,
    LineDown,
    LineLeft,
    LineRight,
    /// Scroll just enough to bring the anchor inside the margin
    RevealCursor(Anchor),
    /// Scroll the anchor to the middle of the viewport
    CenterCursor(Anchor),
}

/// Build the request for a wheel event
pub fn wheel_request(event: WheelEvent, config: &ScrollConfig, surface: &dyn Surface) -> ScrollRequest {
    let multiplier = if event.alt {
        config.speed_multiplier
    } else {
        config.normal_multiplier
    };
    let scroll = -(config.wheel_direction as f64) * event.delta * surface.scroll_sensitivity() / 100.0
        * multiplier as f64;

    let request = if event.shift {
        ScrollRequest::relative_x(scroll)
    } else {
        ScrollRequest::relative_y(scroll)
    };
    request.with_divisor(DivisorClass::Wheel)
}

/// Build the request for a scroll command
///
/// Page and line commands replace any pending distance, so repeated presses
/// restart the motion instead of stacking up.
pub fn command_request(
    command: ScrollCommand,
    config: &ScrollConfig,
    surface: &dyn Surface,
) -> ScrollRequest {
    let multiplier = config.command_multiplier as f64;
    let page = surface.viewport_height() * multiplier;
    let lines = surface.line_height() * config.line_count as f64 * multiplier;

    let (request, distance, factor) = match command {
        ScrollCommand::PageUp => (ScrollRequest::reset_y(-page), page, config.page_factor),
        ScrollCommand::PageDown => (ScrollRequest::reset_y(page), page, config.page_factor),
        ScrollCommand::LineUp => (ScrollRequest::reset_y(-lines), lines, config.line_factor),
        ScrollCommand::LineDown => (ScrollRequest::reset_y(lines), lines, config.line_factor),
        ScrollCommand::LineLeft => (ScrollRequest::reset_x(-lines), lines, config.line_factor),
        ScrollCommand::LineRight => (ScrollRequest::reset_x(lines), lines, config.line_factor),
        ScrollCommand::RevealCursor(anchor) => {
            return ScrollRequest::jump_to(anchor, false).with_divisor(DivisorClass::Command);
        }
        ScrollCommand::CenterCursor(anchor) => {
            return ScrollRequest::jump_to(anchor, true).with_divisor(DivisorClass::Command);
        }
    };

    request
        .with_divisor(DivisorClass::Command)
        .with_step_cap((distance * factor as f64 / 100.0).trunc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AnchorPosition, AxisRequest, Axis};

    struct Viewport {
        sensitivity: f64,
    }

    impl Surface for Viewport {
        fn scroll_offset(&self, _axis: Axis) -> f64 {
            0.0
        }
        fn set_scroll_offset(&mut self, _axis: Axis, _value: f64) -> crate::Result<bool> {
            Ok(true)
        }
        fn request_visual_update(&mut self) {}
        fn measure_anchor(&self, anchor: Anchor) -> AnchorPosition {
            AnchorPosition {
                top: anchor.row as f64 * 16.0,
            }
        }
        fn viewport_height(&self) -> f64 {
            600.0
        }
        fn line_height(&self) -> f64 {
            16.0
        }
        fn autoscroll_margin(&self) -> f64 {
            2.0
        }
        fn scroll_sensitivity(&self) -> f64 {
            self.sensitivity
        }
    }

    #[test]
    fn test_wheel_down_scrolls_down() {
        let surface = Viewport { sensitivity: 40.0 };
        let request = wheel_request(WheelEvent::notch_down(), &ScrollConfig::default(), &surface);
        assert_eq!(request.y, Some(AxisRequest::Relative(48.0)));
        assert_eq!(request.x, None);
        assert_eq!(request.divisor, DivisorClass::Wheel);
    }

    #[test]
    fn test_wheel_reverse_direction() {
        let surface = Viewport { sensitivity: 100.0 };
        let config = ScrollConfig {
            wheel_direction: -1,
            ..Default::default()
        };
        let request = wheel_request(WheelEvent::notch_down(), &config, &surface);
        assert_eq!(request.y, Some(AxisRequest::Relative(-120.0)));
    }

    #[test]
    fn test_wheel_modifiers() {
        let surface = Viewport { sensitivity: 100.0 };
        let config = ScrollConfig::default();

        let request = wheel_request(
            WheelEvent::notch_up().with_modifiers(false, true),
            &config,
            &surface,
        );
        assert_eq!(request.y, Some(AxisRequest::Relative(-600.0)));

        let request = wheel_request(
            WheelEvent::notch_down().with_modifiers(true, false),
            &config,
            &surface,
        );
        assert_eq!(request.x, Some(AxisRequest::Relative(120.0)));
        assert_eq!(request.y, None);
    }

    #[test]
    fn test_page_commands() {
        let surface = Viewport { sensitivity: 100.0 };
        let config = ScrollConfig::default();

        let request = command_request(ScrollCommand::PageDown, &config, &surface);
        assert_eq!(request.y, Some(AxisRequest::Reset(600.0)));
        assert_eq!(request.divisor, DivisorClass::Command);
        assert_eq!(request.step_cap, Some(18.0));

        let request = command_request(ScrollCommand::PageUp, &config, &surface);
        assert_eq!(request.y, Some(AxisRequest::Reset(-600.0)));
        assert_eq!(request.step_cap, Some(18.0));
    }

    #[test]
    fn test_line_commands() {
        let surface = Viewport { sensitivity: 100.0 };
        let config = ScrollConfig {
            command_multiplier: 2,
            ..Default::default()
        };

        // 16px * 20 lines * 2
        let request = command_request(ScrollCommand::LineDown, &config, &surface);
        assert_eq!(request.y, Some(AxisRequest::Reset(640.0)));
        assert_eq!(request.step_cap, Some(19.0));

        let request = command_request(ScrollCommand::LineLeft, &config, &surface);
        assert_eq!(request.x, Some(AxisRequest::Reset(-640.0)));
        assert_eq!(request.y, None);
    }

    #[test]
    fn test_cursor_commands() {
        let surface = Viewport { sensitivity: 100.0 };
        let config = ScrollConfig::default();
        let anchor = Anchor::new(40, 3);

        let request = command_request(ScrollCommand::CenterCursor(anchor), &config, &surface);
        let jump = request.anchor.unwrap();
        assert!(jump.centered);
        assert_eq!(jump.anchor, anchor);
        assert_eq!(request.step_cap, None);

        let request = command_request(ScrollCommand::RevealCursor(anchor), &config, &surface);
        assert!(!request.anchor.unwrap().centered);
    }
}
