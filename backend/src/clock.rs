//! Time source for record timestamps

use chrono::{DateTime, FixedOffset, NaiveDate, SubsecRound, Utc};

/// Supplies timestamps in the configured zone
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Today's calendar date in the configured zone
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock fixed to one UTC offset, at microsecond precision to match
/// what `TIMESTAMPTZ` keeps
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().trunc_subsecs(6).with_timezone(&self.offset)
    }
}

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
