//! Redraw coalescing: at most one redraw per animation frame.
//!
//! The scheduler owns the dirty flag and the pending frame handle but never
//! calls the browser itself; the caller passes in the function that requests a
//! frame, which keeps the state machine testable off-browser.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

/// Handle returned by `requestAnimationFrame`.
pub type FrameHandle = i32;

/// Whether a frame callback is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    /// No callback pending.
    #[default]
    Idle,
    /// One callback pending under this handle.
    Scheduled(FrameHandle),
}

/// Dirty flag plus the single pending frame it may have requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedrawScheduler {
    state: FrameState,
    dirty: bool,
}

impl RedrawScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record a dirty signal, requesting a frame only when none is pending.
    ///
    /// # Errors
    ///
    /// Propagates the error from `request`. The scheduler then stays idle with
    /// the dirty flag set, so the caller may redraw immediately instead.
    pub fn mark_dirty<E>(&mut self, request: impl FnOnce() -> Result<FrameHandle, E>) -> Result<(), E> {
        self.dirty = true;
        if self.state == FrameState::Idle {
            self.state = FrameState::Scheduled(request()?);
        }
        Ok(())
    }

    /// The frame callback fired. Returns whether a redraw is due.
    pub fn on_frame(&mut self) -> bool {
        self.state = FrameState::Idle;
        std::mem::take(&mut self.dirty)
    }

    /// A full redraw ran outside the frame callback.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Forget the pending frame, returning its handle so it can be cancelled.
    pub fn cancel(&mut self) -> Option<FrameHandle> {
        match std::mem::take(&mut self.state) {
            FrameState::Idle => None,
            FrameState::Scheduled(handle) => Some(handle),
        }
    }
}
