use crate::model::timestamp;
use chrono::{DateTime, Utc};

/// Source of the current time for store transitions.
///
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to milliseconds.
///
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        timestamp::now_millis()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}
