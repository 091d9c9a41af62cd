use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Converts a session-relative timestamp into an absolute instant.
pub trait RelativeClock: Send + Sync {
    fn absolute(&self, relative: f64) -> SystemTime;
}

impl<F> RelativeClock for F
where
    F: Fn(f64) -> SystemTime + Send + Sync,
{
    fn absolute(&self, relative: f64) -> SystemTime {
        self(relative)
    }
}

/// Relative timestamps are seconds since `origin`, the session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    pub origin: SystemTime,
}

impl SessionClock {
    pub fn new(origin: SystemTime) -> Self {
        SessionClock { origin }
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        SessionClock::new(SystemTime::UNIX_EPOCH)
    }
}

impl RelativeClock for SessionClock {
    // Offsets that are not finite or do not fit in a SystemTime map to the origin.
    fn absolute(&self, relative: f64) -> SystemTime {
        let Ok(offset) = Duration::try_from_secs_f64(relative.abs()) else {
            return self.origin;
        };
        let instant = if relative >= 0.0 {
            self.origin.checked_add(offset)
        } else {
            self.origin.checked_sub(offset)
        };
        instant.unwrap_or(self.origin)
    }
}

/// Milliseconds since the UNIX epoch, negative before it. Sub-millisecond
/// parts are truncated toward the epoch; the result saturates at the `i64` range.
pub fn epoch_millis(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis())
            .map(|ms| -ms)
            .unwrap_or(i64::MIN),
    }
}

/// Inverse of [`epoch_millis`]. `None` if the platform cannot represent the instant.
pub fn from_epoch_millis(ms: i64) -> Option<SystemTime> {
    let offset = Duration::from_millis(ms.unsigned_abs());
    if ms >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    }
}
