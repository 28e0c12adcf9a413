use std::{
    fmt,
    str::FromStr,
    time::{Duration, SystemTime},
};

use thiserror::Error;

const HOUR: Duration = Duration::from_secs(60 * 60);

/// How far back a file may have been modified and still count as modified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecencyWindow {
    /// Zero threshold: compare the last modification against creation time.
    #[default]
    Always,
    Hour,
    Week,
    ThirtyDays,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown recency window '{0}' (expected ever, hour, week or 30days)")]
pub struct UnknownWindow(pub String);

impl RecencyWindow {
    pub fn threshold(self) -> Duration {
        match self {
            RecencyWindow::Always => Duration::ZERO,
            RecencyWindow::Hour => HOUR,
            RecencyWindow::Week => HOUR * 168,
            RecencyWindow::ThirtyDays => HOUR * 720,
        }
    }

    /// The instant a file must have been modified after to count as
    /// modified. A zero threshold uses `created` instead of `now`.
    pub fn baseline(self, now: SystemTime, created: SystemTime) -> SystemTime {
        let threshold = self.threshold();
        if threshold.is_zero() {
            created
        } else {
            now.checked_sub(threshold)
                .map_or(SystemTime::UNIX_EPOCH, |t| t.max(SystemTime::UNIX_EPOCH))
        }
    }
}

impl fmt::Display for RecencyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecencyWindow::Always => "ever",
            RecencyWindow::Hour => "hour",
            RecencyWindow::Week => "week",
            RecencyWindow::ThirtyDays => "30days",
        };
        f.write_str(s)
    }
}

impl FromStr for RecencyWindow {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ever" | "always" => Ok(RecencyWindow::Always),
            "hour" | "1h" => Ok(RecencyWindow::Hour),
            "week" | "7d" => Ok(RecencyWindow::Week),
            "30days" | "30d" | "month" => Ok(RecencyWindow::ThirtyDays),
            _ => Err(UnknownWindow(s.to_owned())),
        }
    }
}

/// Source of the current instant used for recency baselines.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub SystemTime);

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> SystemTime {
        self.0
    }
}
