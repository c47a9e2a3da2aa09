// Level countdown timer
// Starts lazily on the first safe reveal and optionally excludes time spent paused

use std::time::{Duration, Instant};

/// Per-level time limit
pub const TIME_LIMIT: Duration = Duration::from_secs(180);

/// Whole seconds left before `limit` elapses since `start`, clamped at zero
pub fn remaining(start: Instant, now: Instant, limit: Duration) -> u64 {
    limit
        .saturating_sub(now.saturating_duration_since(start))
        .as_secs()
}

/// True once strictly more than `limit` has elapsed since `start`
pub fn is_expired(start: Instant, now: Instant, limit: Duration) -> bool {
    now.saturating_duration_since(start) > limit
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTimer {
    limit: Duration,
    freeze_on_pause: bool,            // Exclude paused time from the countdown
    started_at: Option<Instant>,      // Set on the first safe reveal
    paused_at: Option<Instant>,       // Set while paused after the timer started
    paused_total: Duration,           // Accumulated paused time
}

impl LevelTimer {
    pub fn new(limit: Duration, freeze_on_pause: bool) -> Self {
        LevelTimer {
            limit,
            freeze_on_pause,
            started_at: None,
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start counting; later calls keep the original start
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if self.started_at.is_some() && self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if let Some(t0) = self.paused_at.take() {
            self.paused_total += now.saturating_duration_since(t0);
        }
    }

    /// Start and "now" shifted so paused time drops out when freezing is enabled
    fn effective(&self, now: Instant) -> Option<(Instant, Instant)> {
        let start = self.started_at?;
        if !self.freeze_on_pause {
            return Some((start, now));
        }
        let now = self.paused_at.unwrap_or(now);
        Some((start + self.paused_total, now))
    }

    /// Seconds left; the full limit before the first reveal
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        match self.effective(now) {
            Some((start, now)) => remaining(start, now, self.limit),
            None => self.limit.as_secs(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.effective(now)
            .is_some_and(|(start, now)| is_expired(start, now, self.limit))
    }
}
