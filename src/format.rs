//! Elapsed-time breakdown and display formatting

use std::fmt;

const MS_PER_DECISECOND: u64 = 100;
const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_HOUR: u64 = 3_600_000;

/// Elapsed time split into display components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeParts {
    /// Unbounded, never wraps
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub deciseconds: u64,
}

/// Break an elapsed millisecond count into hours/minutes/seconds/deciseconds
pub fn format(elapsed_ms: u64) -> TimeParts {
    TimeParts {
        hours: elapsed_ms / MS_PER_HOUR,
        minutes: (elapsed_ms / MS_PER_MINUTE) % 60,
        seconds: (elapsed_ms / MS_PER_SECOND) % 60,
        deciseconds: (elapsed_ms / MS_PER_DECISECOND) % 10,
    }
}

/// Left-pad `n` with zeros to at least `width` digits. Never truncates.
pub fn zero_pad(n: u64, width: usize) -> String {
    format!("{:0width$}", n, width = width)
}

impl TimeParts {
    /// Milliseconds at the start of the decisecond these parts describe
    pub fn to_ms(&self) -> u64 {
        self.hours * MS_PER_HOUR
            + self.minutes * MS_PER_MINUTE
            + self.seconds * MS_PER_SECOND
            + self.deciseconds * MS_PER_DECISECOND
    }

    /// `H:MM:SS`, hours unpadded
    pub fn clock(&self) -> String {
        format!(
            "{}:{}:{}",
            self.hours,
            zero_pad(self.minutes, 2),
            zero_pad(self.seconds, 2)
        )
    }

    /// `H:MM:SS:D`, the layout used for laps
    pub fn lap(&self) -> String {
        format!("{}:{}", self.clock(), self.deciseconds)
    }
}

impl fmt::Display for TimeParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.clock(), self.deciseconds)
    }
}
