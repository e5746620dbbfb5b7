use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime, Offset, Utc};
use std::sync::{PoisonError, RwLock};

/// Source of "now" for mutations and date-based filtering.
///
/// Calendar-day questions ("is this due today?") are answered in the
/// clock's local offset, instants are always UTC.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn local_offset(&self) -> FixedOffset;

    /// Current calendar day in the local offset.
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.local_offset()).date_naive()
    }

    /// First instant of the calendar day after [`Clock::today`].
    fn start_of_tomorrow(&self) -> DateTime<Utc> {
        let offset = self.local_offset();
        let tomorrow = self.today().succ_opt().unwrap_or(NaiveDate::MAX);
        let local_midnight = tomorrow.and_time(NaiveTime::MIN);
        (local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
    }
}

/// Wall clock in the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_offset(&self) -> FixedOffset {
        Local::now().offset().fix()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
    offset: FixedOffset,
}

impl FixedClock {
    /// Fixed at `now`, with UTC as the local offset.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::with_offset(now, Utc.fix())
    }

    pub fn with_offset(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: RwLock::new(now),
            offset,
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset
    }
}
