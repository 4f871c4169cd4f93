//! Frame clock seam
//!
//! The simulation loop asks for exactly one frame at a time and may cancel it.
//! The browser host backs this with `requestAnimationFrame`; tests and the
//! native demo use [`ManualScheduler`] and fire frames by hand.

/// Opaque id of a requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

/// Something that can deliver one frame callback later
pub trait FrameScheduler {
    /// Request a single frame; the host calls back with a timestamp in ms.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously requested frame. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Deterministic scheduler: records requests, fires nothing on its own
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u32,
    pending: Option<FrameHandle>,
    requested: u32,
    cancelled: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame currently waiting to be delivered
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Take the pending frame as if the host were about to deliver it
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Total frames requested so far
    pub fn requested(&self) -> u32 {
        self.requested
    }

    /// Total frames cancelled so far
    pub fn cancelled(&self) -> u32 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        self.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}
