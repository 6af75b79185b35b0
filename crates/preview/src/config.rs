/// Tuning knobs for a [`PreviewRenderer`](crate::PreviewRenderer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Log size that triggers eviction once exceeded.
    pub log_threshold: usize,
    /// Log size kept after an eviction.
    pub log_retain: usize,
    /// Capacity of the relay channel between the context and the host.
    pub relay_capacity: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            log_threshold: 100,
            log_retain: 50,
            relay_capacity: 256,
        }
    }
}

impl PreviewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the eviction bounds. `retain` is clamped to at most `threshold`.
    pub fn with_log_bounds(mut self, threshold: usize, retain: usize) -> Self {
        self.log_threshold = threshold;
        self.log_retain = retain.min(threshold);
        self
    }

    /// Sets the relay channel capacity (at least 1).
    pub fn with_relay_capacity(mut self, capacity: usize) -> Self {
        self.relay_capacity = capacity.max(1);
        self
    }
}
