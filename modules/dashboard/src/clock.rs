use chrono::{DateTime, Local};

/// Local time format of the results log.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Source of "now" for log timestamps and synthesized payloads.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Milliseconds since the Unix epoch, clamped at zero.
    fn epoch_millis(&self) -> u64 {
        u64::try_from(self.now().timestamp_millis()).unwrap_or(0)
    }

    fn local_time(&self) -> String {
        format_timestamp(&self.now())
    }
}

/// Render a timestamp the way the results log shows it.
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIME_FORMAT).to_string()
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self(at)
    }

    /// `None` when `millis` is outside chrono's representable range.
    pub fn at_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|utc| Self(utc.with_timezone(&Local)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_its_instant() {
        let clock = FixedClock::at_millis(1_700_000_123_456).unwrap();
        assert_eq!(clock.epoch_millis(), 1_700_000_123_456);
        assert_eq!(clock.local_time(), format_timestamp(&clock.now()));
    }

    #[test]
    fn pre_epoch_instants_clamp_to_zero() {
        let clock = FixedClock::at_millis(-5_000).unwrap();
        assert_eq!(clock.epoch_millis(), 0);
    }

    #[test]
    fn timestamp_format_is_hours_minutes_seconds() {
        let s = SystemClock.local_time();
        let parts: Vec<&str> = s.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_digit())));
    }
}
