//! Smooth scroll animation engine
//!
//! Turns scroll requests into a run of small per-frame offset changes. Each
//! frame consumes `trunc(pending / divisor)` of the outstanding distance, so
//! motion starts fast and eases out without ever overshooting.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `step` - Pure step functions (divided, capped)
//! - `request` - Request and divisor types
//! - `surface` - Host capability traits
//! - `scheduler` - Frame schedule/cancel primitive
//!
//! ## L3 Molecular Layer
//! - `accumulator` - Per-surface pending distance and merge rules
//! - `driver` - Session lifecycle and the per-frame loop
//!
//! # Usage
//!
//! ```ignore
//! use smoothscroll_core::engine::{ScrollEngine, ScrollRequest};
//!
//! let mut engine = ScrollEngine::new(config.scroll.clone());
//!
//! // On input
//! engine.submit(&mut host, surface_id, ScrollRequest::relative_y(48.0))?;
//!
//! // Once per display frame
//! engine.pump(&mut host);
//! ```

// L4 Atomic Layer
pub mod request;
pub mod scheduler;
pub mod step;
pub mod surface;

// L3 Molecular Layer
pub mod accumulator;
pub mod driver;

pub use accumulator::{Accumulator, AxisState};
pub use driver::{AnimationSession, FrameOutcome, ScrollEngine};
pub use request::{AnchorJump, AxisRequest, DivisorClass, ScrollRequest};
pub use scheduler::{FrameHandle, FrameQueue, FrameScheduler};
pub use step::StepPolicy;
pub use surface::{Anchor, AnchorPosition, Axis, Surface, SurfaceHost, SurfaceId};
