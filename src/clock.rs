//! Where "today" and "now" come from.
//!
//! Everything that needs the current date or a completion timestamp asks a
//! [`Clock`], so tests can pin time with [`FixedClock`].

use std::cell::Cell;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

pub trait Clock {
    /// The current calendar date in the owner's timezone.
    fn today(&self) -> NaiveDate;
    /// The current instant, used for completion timestamps.
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock. Interior mutability lets a test move time while
/// the tracker holds the clock.
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: Cell<NaiveDate>,
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(today: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            today: Cell::new(today),
            now: Cell::new(now),
        }
    }

    /// A clock at noon UTC on `today`.
    pub fn at(today: NaiveDate) -> Self {
        let now = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self::new(today, now)
    }

    /// Moves the current instant forward; the date only changes via `set_today`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
