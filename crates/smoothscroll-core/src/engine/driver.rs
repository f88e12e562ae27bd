//! L3 Molecular Layer: Animation driver
//!
//! Owns one [`AnimationSession`] per animating surface and advances it one
//! step per frame callback. A surface is Running while its session exists
//! and Idle otherwise; at most one frame callback is in flight per session.

use std::collections::HashMap;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ScrollConfig;

use super::accumulator::Accumulator;
use super::request::ScrollRequest;
use super::scheduler::{FrameHandle, FrameQueue, FrameScheduler};
use super::surface::{Axis, Surface, SurfaceHost, SurfaceId};

/// State of one continuous animation run
#[derive(Debug, Clone)]
pub struct AnimationSession {
    pub pending: Accumulator,
    pub divisor: f64,
    pub step_cap: Option<f64>,
    scheduled: Option<FrameHandle>,
}

impl AnimationSession {
    fn new(divisor: f64) -> Self {
        Self {
            pending: Accumulator::default(),
            divisor,
            step_cap: None,
            scheduled: None,
        }
    }

    /// Handle of the callback currently waiting for a frame
    pub fn scheduled(&self) -> Option<FrameHandle> {
        self.scheduled
    }
}

/// What a single frame callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Handle was stale or the surface is gone; nothing happened
    Ignored,
    /// A step was applied and another frame is scheduled
    Continued,
    /// The session finished and the surface is Idle again
    Finished,
}

/// Smooth scroll engine
///
/// Call [`submit`](Self::submit) for every scroll request and run due frame
/// callbacks through [`run_frame`](Self::run_frame) (or
/// [`pump`](Self::pump) when using a [`FrameQueue`]).
pub struct ScrollEngine<S: FrameScheduler = FrameQueue> {
    config: ScrollConfig,
    config_rx: Option<watch::Receiver<ScrollConfig>>,
    scheduler: S,
    sessions: HashMap<SurfaceId, AnimationSession>,
}

impl ScrollEngine<FrameQueue> {
    /// Create an engine driven by a manual frame queue
    pub fn new(config: ScrollConfig) -> Self {
        Self::with_scheduler(config, FrameQueue::new())
    }

    /// Run every frame callback that is due
    ///
    /// Returns the number of callbacks that advanced a session.
    pub fn pump(&mut self, host: &mut dyn SurfaceHost) -> usize {
        self.refresh_config();
        let due = self.scheduler.take_due();
        let mut advanced = 0;
        for (handle, surface) in due {
            if self.run_frame(host, surface, handle) != FrameOutcome::Ignored {
                advanced += 1;
            }
        }
        advanced
    }
}

impl<S: FrameScheduler> ScrollEngine<S> {
    pub fn with_scheduler(config: ScrollConfig, scheduler: S) -> Self {
        Self {
            config,
            config_rx: None,
            scheduler,
            sessions: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Replace the configuration snapshot
    ///
    /// Running sessions keep their divisor until the next merge.
    pub fn update_config(&mut self, config: ScrollConfig) -> crate::Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Observe configuration changes published on a watch channel
    pub fn watch_config(&mut self, rx: watch::Receiver<ScrollConfig>) {
        self.config_rx = Some(rx);
        self.refresh_config();
    }

    fn refresh_config(&mut self) {
        let Some(rx) = self.config_rx.as_mut() else {
            return;
        };
        if !rx.has_changed().unwrap_or(false) {
            return;
        }
        let config = rx.borrow_and_update().clone();
        match config.validate() {
            Ok(()) => {
                debug!(?config, "Scroll configuration updated");
                self.config = config;
            }
            Err(e) => warn!(error = %e, "Ignoring invalid scroll configuration"),
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Session of a surface, present only while it is animating
    pub fn session(&self, surface: SurfaceId) -> Option<&AnimationSession> {
        self.sessions.get(&surface)
    }

    #[inline]
    pub fn is_animating(&self, surface: SurfaceId) -> bool {
        self.sessions.contains_key(&surface)
    }

    /// Whether any surface needs frames; hosts use this to pick a frame rate
    #[inline]
    pub fn needs_update(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Pending distance of a surface on one axis (0 when Idle)
    pub fn pending(&self, surface: SurfaceId, axis: Axis) -> f64 {
        self.sessions
            .get(&surface)
            .map(|s| s.pending.axis(axis).pending)
            .unwrap_or(0.0)
    }

    /// Merge a request into a surface's pending distance
    ///
    /// Starts the animation when the surface was Idle. An unknown surface is
    /// a silent no-op. An invalid divisor is reported and nothing changes.
    pub fn submit(
        &mut self,
        host: &mut dyn SurfaceHost,
        id: SurfaceId,
        request: ScrollRequest,
    ) -> crate::Result<()> {
        self.refresh_config();

        let divisor = request.divisor.resolve(&self.config).map_err(|e| {
            warn!(surface = %id, error = %e, "Rejecting scroll request");
            e
        })?;
        if let Some(cap) = request.step_cap.filter(|c| !c.is_finite()) {
            warn!(surface = %id, cap, "Rejecting scroll request with non-finite step cap");
            return Err(crate::Error::InvalidDistance(cap));
        }

        let Some(surface) = host.surface_mut(id) else {
            debug!(surface = %id, "No surface for scroll request, ignoring");
            return Ok(());
        };

        let bonus = if self.config.sign_flip_bonus {
            divisor - 1.0
        } else {
            0.0
        };

        // Merge into a copy so a rejected request leaves the session untouched
        let mut merged = self
            .sessions
            .get(&id)
            .map(|s| s.pending)
            .unwrap_or_default();
        merged.merge(&request, &*surface, bonus);
        if let Some(value) = merged.non_finite() {
            warn!(surface = %id, value, "Rejecting non-finite scroll distance");
            return Err(crate::Error::InvalidDistance(value));
        }

        let mut session = self
            .sessions
            .remove(&id)
            .unwrap_or_else(|| AnimationSession::new(divisor));
        session.pending = merged;
        session.divisor = divisor;
        session.step_cap = request.step_cap;

        if session.scheduled.is_none() {
            if session.pending.is_idle() {
                return Ok(());
            }
            session.scheduled = Some(self.scheduler.schedule(id));
            debug!(
                surface = %id,
                divisor,
                pending_x = session.pending.x.pending,
                pending_y = session.pending.y.pending,
                "Scroll animation started"
            );
        }
        self.sessions.insert(id, session);
        Ok(())
    }

    /// Merge the same request into several surfaces
    ///
    /// Each surface keeps its own accumulator. The first error is returned
    /// after every surface has been tried.
    pub fn fan_out(
        &mut self,
        host: &mut dyn SurfaceHost,
        ids: &[SurfaceId],
        request: ScrollRequest,
    ) -> crate::Result<()> {
        let mut first_error = None;
        for &id in ids {
            if let Err(e) = self.submit(host, id, request) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Stop a surface's animation and drop its pending distance
    ///
    /// Any scheduled callback is cancelled; if it fires anyway it is ignored.
    pub fn teardown(&mut self, id: SurfaceId) {
        if let Some(session) = self.sessions.remove(&id) {
            if let Some(handle) = session.scheduled {
                self.scheduler.cancel(handle);
            }
            debug!(surface = %id, "Scroll animation torn down");
        }
    }

    /// Tear down every running session
    pub fn teardown_all(&mut self) {
        let ids: Vec<SurfaceId> = self.sessions.keys().copied().collect();
        for id in ids {
            self.teardown(id);
        }
    }

    /// Advance one surface by one frame
    pub fn run_frame(
        &mut self,
        host: &mut dyn SurfaceHost,
        id: SurfaceId,
        handle: FrameHandle,
    ) -> FrameOutcome {
        match self.sessions.get(&id) {
            Some(session) if session.scheduled == Some(handle) => {}
            _ => return FrameOutcome::Ignored,
        }

        let Some(surface) = host.surface_mut(id) else {
            // Host dropped the surface without tearing it down
            self.sessions.remove(&id);
            info!(surface = %id, "Surface vanished mid-animation, stopping");
            return FrameOutcome::Ignored;
        };

        let Some(mut session) = self.sessions.remove(&id) else {
            return FrameOutcome::Ignored;
        };
        session.scheduled = None;

        let cap = session.step_cap.unwrap_or(self.config.max_step);
        let policy = self.config.step_policy;
        let mut changed = false;

        for axis in [Axis::X, Axis::Y] {
            let state = session.pending.axis_mut(axis);
            if state.is_idle() {
                continue;
            }
            let step = policy.step(state.pending, session.divisor, cap);
            let target = surface.scroll_offset(axis) + step;
            if step == 0.0 || !target.is_finite() {
                state.pending = 0.0;
                continue;
            }
            state.pending -= step;
            match surface.set_scroll_offset(axis, target) {
                Ok(moved) => changed |= moved,
                Err(e) => warn!(surface = %id, ?axis, error = %e, "Failed to set scroll offset"),
            }
        }

        if changed {
            surface.request_visual_update();
        } else {
            session.pending.clear();
        }

        if session.pending.is_idle() {
            surface.on_animation_ended();
            debug!(surface = %id, "Scroll animation finished");
            return FrameOutcome::Finished;
        }

        session.scheduled = Some(self.scheduler.schedule(id));
        self.sessions.insert(id, session);
        FrameOutcome::Continued
    }
}
