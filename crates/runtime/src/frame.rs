use foundation::time::Time;

/// Deterministic frame metadata.
///
/// One render tick per frame reads camera and geometry state; all mutation
/// happens between ticks (single-writer model). Keeping the timebase pure
/// makes camera smoothing and event traces replayable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}
