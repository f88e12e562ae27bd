//! L4 Atomic Layer: Pure step functions
//!
//! Decides how much of the pending distance a single frame consumes. No
//! step ever overshoots the remaining distance.

use serde::{Deserialize, Serialize};

/// Step size policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPolicy {
    /// `step = trunc(pending / divisor)`
    #[default]
    Divided,
    /// Fixed per-frame cap; the remainder below the cap lands in one frame
    Capped,
}

impl StepPolicy {
    /// Compute the step for one frame
    ///
    /// # Arguments
    /// * `pending` - Signed outstanding distance
    /// * `divisor` - Active divisor, already validated to be >= 1
    /// * `cap` - Per-frame cap; only consulted by `Capped`, `0` disables it
    ///
    /// # Returns
    /// Signed step with `|step| <= |pending|`; `0.0` means the axis is done
    pub fn step(&self, pending: f64, divisor: f64, cap: f64) -> f64 {
        match self {
            StepPolicy::Divided => divided_step(pending, divisor),
            StepPolicy::Capped if cap > 0.0 => capped_step(pending, cap),
            StepPolicy::Capped => divided_step(pending, divisor),
        }
    }
}

/// `trunc(pending / divisor)`
#[inline]
pub fn divided_step(pending: f64, divisor: f64) -> f64 {
    (pending / divisor).trunc()
}

/// Capped step: the full cap while at least a cap away, else everything left
#[inline]
pub fn capped_step(pending: f64, cap: f64) -> f64 {
    if pending.abs() >= cap {
        pending.signum() * cap
    } else {
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run a policy to completion, asserting the no-overshoot and
    /// monotonic properties on every frame. Returns the number of frames.
    fn run_to_zero(policy: StepPolicy, mut pending: f64, divisor: f64, cap: f64) -> usize {
        let mut frames = 0;
        while pending != 0.0 {
            let step = policy.step(pending, divisor, cap);
            if step == 0.0 {
                pending = 0.0;
                break;
            }
            let next = pending - step;
            assert!(
                next == 0.0 || next.signum() == pending.signum(),
                "{:?} overshot: {} - {} = {}",
                policy,
                pending,
                step,
                next
            );
            assert!(next.abs() <= pending.abs());
            pending = next;
            frames += 1;
            assert!(frames < 10_000, "{:?} did not converge", policy);
        }
        frames
    }

    #[test]
    fn test_divided_truncates_toward_zero() {
        assert_eq!(divided_step(100.0, 7.0), 14.0);
        assert_eq!(divided_step(-100.0, 7.0), -14.0);
        assert_eq!(divided_step(6.0, 7.0), 0.0);
        assert_eq!(divided_step(-6.9, 7.0), 0.0);
    }

    #[test]
    fn test_divided_converges() {
        for pending in [1.0, -1.0, 48.0, -48.0, 1000.0, -12345.0, 0.5, 7.0] {
            for divisor in [1.0, 2.0, 7.0, 20.0] {
                run_to_zero(StepPolicy::Divided, pending, divisor, 0.0);
            }
        }
    }

    #[test]
    fn test_capped_respects_cap() {
        assert_eq!(capped_step(500.0, 30.0), 30.0);
        assert_eq!(capped_step(-500.0, 30.0), -30.0);
        assert_eq!(capped_step(30.0, 30.0), 30.0);
        // Inside the cap the whole remainder is taken at once
        assert_eq!(capped_step(21.0, 30.0), 21.0);
        assert_eq!(capped_step(-3.0, 30.0), -3.0);
        assert_eq!(capped_step(0.5, 30.0), 0.5);
    }

    #[test]
    fn test_capped_converges() {
        for pending in [1.0, -2.0, 6.0, 700.0, -700.0, 3.25] {
            run_to_zero(StepPolicy::Capped, pending, 7.0, 25.0);
        }
    }

    #[test]
    fn test_capped_finishes_with_remainder() {
        // 600 = 33 * 18 + 6: no slow tail after the last full step
        assert_eq!(run_to_zero(StepPolicy::Capped, 600.0, 7.0, 18.0), 34);
        assert_eq!(StepPolicy::Capped.step(6.0, 7.0, 18.0), 6.0);
    }

    #[test]
    fn test_capped_without_cap_falls_back_to_divided() {
        assert_eq!(
            StepPolicy::Capped.step(100.0, 7.0, 0.0),
            StepPolicy::Divided.step(100.0, 7.0, 0.0)
        );
    }
}
