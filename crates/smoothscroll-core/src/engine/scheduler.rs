//! L4 Atomic Layer: Frame scheduling primitive
//!
//! The engine only ever asks for "call me back on the next frame" and
//! "forget that callback". [`FrameQueue`] is a manual implementation that
//! the host drains once per display frame.

use std::collections::VecDeque;

use super::surface::SurfaceId;

/// Opaque handle of a scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Schedule/cancel pair the driver runs on
pub trait FrameScheduler {
    /// Request one callback for `surface` on the next frame
    fn schedule(&mut self, surface: SurfaceId) -> FrameHandle;

    /// Drop a pending callback; unknown handles are ignored
    fn cancel(&mut self, handle: FrameHandle);
}

/// FIFO of callbacks due on the next frame
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: VecDeque<(FrameHandle, SurfaceId)>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every callback due this frame
    ///
    /// Callbacks scheduled while the returned batch runs land in the next
    /// frame's batch.
    pub fn take_due(&mut self) -> Vec<(FrameHandle, SurfaceId)> {
        self.pending.drain(..).collect()
    }

    /// Number of callbacks waiting for the next frame
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of callbacks waiting for a given surface
    pub fn count_for(&self, surface: SurfaceId) -> usize {
        self.pending.iter().filter(|(_, s)| *s == surface).count()
    }

    pub fn contains(&self, handle: FrameHandle) -> bool {
        self.pending.iter().any(|(h, _)| *h == handle)
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule(&mut self, surface: SurfaceId) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push_back((handle, surface));
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.pending.retain(|(h, _)| *h != handle);
    }
}
