/// Minimum interval between passes of a periodic action. Calls arriving
/// inside the window are skipped, not queued.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: u64,
    last_pass: Option<u64>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_pass: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub fn is_ready(&self, now: u64) -> bool {
        self.last_pass
            .map_or(true, |last| now.saturating_sub(last) >= self.interval_ms)
    }

    /// Start a pass if the window has elapsed
    pub fn try_acquire(&mut self, now: u64) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last_pass = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last_pass = None;
    }
}
