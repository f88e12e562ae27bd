//! L4 Atomic Layer: Scroll request types
//!
//! A request describes what should happen to each axis' pending distance.
//! Build them with the constructors and `with_*` methods:
//!
//! ```ignore
//! let request = ScrollRequest::relative(0.0, 48.0);
//! let page = ScrollRequest::reset_y(-600.0)
//!     .with_divisor(DivisorClass::Command)
//!     .with_step_cap(18.0);
//! ```

use crate::config::ScrollConfig;

use super::surface::Anchor;

/// How a request changes one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisRequest {
    /// Add to the pending distance
    Relative(f64),
    /// Scroll so the offset ends at this value
    Absolute(f64),
    /// Replace the pending distance with this value exactly
    Reset(f64),
}

/// Named divisor, resolved against the configuration at merge time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DivisorClass {
    #[default]
    Wheel,
    Command,
    Explicit(f64),
}

impl DivisorClass {
    /// Resolve to a numeric divisor, rejecting anything that would overshoot
    pub fn resolve(&self, config: &ScrollConfig) -> crate::Result<f64> {
        let divisor = match self {
            DivisorClass::Wheel => config.wheel_divisor as f64,
            DivisorClass::Command => config.command_divisor as f64,
            DivisorClass::Explicit(value) => *value,
        };
        if !divisor.is_finite() || divisor < 1.0 {
            return Err(crate::Error::InvalidDivisor(divisor));
        }
        Ok(divisor)
    }
}

/// Vertical jump that brings an anchor into view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorJump {
    pub anchor: Anchor,
    /// Center the anchor instead of scrolling only past the margin
    pub centered: bool,
}

/// One scroll request for a surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollRequest {
    pub x: Option<AxisRequest>,
    pub y: Option<AxisRequest>,
    /// Takes precedence over `y` when present
    pub anchor: Option<AnchorJump>,
    pub divisor: DivisorClass,
    /// Per-frame cap for the capped step policy
    pub step_cap: Option<f64>,
}

impl ScrollRequest {
    pub fn relative(dx: f64, dy: f64) -> Self {
        Self {
            x: Some(AxisRequest::Relative(dx)),
            y: Some(AxisRequest::Relative(dy)),
            ..Default::default()
        }
    }

    pub fn relative_x(dx: f64) -> Self {
        Self {
            x: Some(AxisRequest::Relative(dx)),
            ..Default::default()
        }
    }

    pub fn relative_y(dy: f64) -> Self {
        Self {
            y: Some(AxisRequest::Relative(dy)),
            ..Default::default()
        }
    }

    pub fn absolute_y(target: f64) -> Self {
        Self {
            y: Some(AxisRequest::Absolute(target)),
            ..Default::default()
        }
    }

    pub fn reset_x(value: f64) -> Self {
        Self {
            x: Some(AxisRequest::Reset(value)),
            ..Default::default()
        }
    }

    pub fn reset_y(value: f64) -> Self {
        Self {
            y: Some(AxisRequest::Reset(value)),
            ..Default::default()
        }
    }

    pub fn jump_to(anchor: Anchor, centered: bool) -> Self {
        Self {
            anchor: Some(AnchorJump { anchor, centered }),
            ..Default::default()
        }
    }

    pub fn with_divisor(mut self, divisor: DivisorClass) -> Self {
        self.divisor = divisor;
        self
    }

    pub fn with_step_cap(mut self, cap: f64) -> Self {
        self.step_cap = Some(cap);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_divisor_classes() {
        let config = ScrollConfig {
            wheel_divisor: 9,
            command_divisor: 4,
            ..Default::default()
        };
        assert_eq!(DivisorClass::Wheel.resolve(&config).unwrap(), 9.0);
        assert_eq!(DivisorClass::Command.resolve(&config).unwrap(), 4.0);
        assert_eq!(DivisorClass::Explicit(2.5).resolve(&config).unwrap(), 2.5);
    }

    #[test]
    fn test_resolve_rejects_zero_and_fractions() {
        let config = ScrollConfig::default();
        for bad in [0.0, -3.0, 0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                DivisorClass::Explicit(bad).resolve(&config),
                Err(crate::Error::InvalidDivisor(_))
            ));
        }

        let config = ScrollConfig {
            wheel_divisor: 0,
            ..Default::default()
        };
        assert!(DivisorClass::Wheel.resolve(&config).is_err());
    }

    #[test]
    fn test_builders() {
        let request = ScrollRequest::reset_y(-600.0)
            .with_divisor(DivisorClass::Command)
            .with_step_cap(18.0);
        assert_eq!(request.x, None);
        assert_eq!(request.y, Some(AxisRequest::Reset(-600.0)));
        assert_eq!(request.divisor, DivisorClass::Command);
        assert_eq!(request.step_cap, Some(18.0));
    }
}
