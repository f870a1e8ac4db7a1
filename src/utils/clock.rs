//! Time source and timestamp formatting.
//!
//! Replies carry timestamps in two zones: Riyadh (market hours) and the host's
//! local zone (analysis date). Going through [`Clock`] keeps them testable.

use chrono::{DateTime, Local, Utc};
use chrono_tz::Asia::Riyadh;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// `YYYY-MM-DD HH:MM` in Riyadh time.
pub fn riyadh_datetime(now: DateTime<Utc>) -> String {
    now.with_timezone(&Riyadh).format("%Y-%m-%d %H:%M").to_string()
}

/// `HH:MM` in Riyadh time.
pub fn riyadh_time(now: DateTime<Utc>) -> String {
    now.with_timezone(&Riyadh).format("%H:%M").to_string()
}

/// `YYYY-MM-DD` in the host's local time.
pub fn local_date(now: DateTime<Utc>) -> String {
    now.with_timezone(&Local).format("%Y-%m-%d").to_string()
}
