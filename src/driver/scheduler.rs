/// Handle for one scheduled frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Host hook that fires a callback roughly once per display refresh.
///
/// Implementations deliver each request at most once. The driver keeps at most one request
/// pending and only requests the next frame from inside the previous one.
pub trait FrameScheduler {
    /// Schedule a frame callback.
    fn request_frame(&mut self) -> FrameRequest;
    /// Drop a scheduled callback. Unknown or already-fired requests are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Headless, manually advanced clock firing at a fixed interval.
#[derive(Clone, Debug)]
pub struct VirtualScheduler {
    interval_ms: f64,
    now_ms: f64,
    next_id: u64,
    pending: Option<FrameRequest>,
    fired: u64,
}

impl VirtualScheduler {
    /// Clock starting at `0` ms; non-finite or non-positive intervals fall back to 16 ms.
    pub fn new(interval_ms: f64) -> Self {
        let interval_ms = if interval_ms.is_finite() && interval_ms > 0.0 {
            interval_ms
        } else {
            16.0
        };
        Self {
            interval_ms,
            now_ms: 0.0,
            next_id: 1,
            pending: None,
            fired: 0,
        }
    }

    /// Advance the clock by one interval and hand out the pending request with its timestamp.
    ///
    /// Returns `None` (and leaves the clock alone) when nothing is scheduled.
    pub fn fire_next(&mut self) -> Option<(FrameRequest, f64)> {
        let request = self.pending.take()?;
        self.now_ms += self.interval_ms;
        self.fired += 1;
        Some((request, self.now_ms))
    }

    /// The request that would fire next.
    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Frame interval in milliseconds.
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Number of callbacks delivered so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl FrameScheduler for VirtualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id);
        self.next_id += 1;
        self.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }
}
