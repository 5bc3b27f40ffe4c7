use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Clock abstracts access to the current timestamp so the store remains deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Hands out strictly increasing creation stamps even when the wall clock stalls or
/// steps backwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stamper {
    last: Option<DateTime<Utc>>,
}

impl Stamper {
    pub fn next(&mut self, clock: &dyn Clock) -> DateTime<Utc> {
        let now = clock.now();
        let stamp = match self.last {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last = Some(stamp);
        stamp
    }

    /// Moves the floor forward so stamps issued later sort after `seen`.
    pub fn observe(&mut self, seen: DateTime<Utc>) {
        if self.last.is_none_or(|last| seen > last) {
            self.last = Some(seen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stamper_is_strictly_increasing_under_a_frozen_clock() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap());
        let mut stamper = Stamper::default();
        let first = stamper.next(&clock);
        let second = stamper.next(&clock);
        let third = stamper.next(&clock);
        assert!(first < second && second < third);
        assert_eq!(first, clock.now());
    }

    #[test]
    fn observe_raises_the_floor() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap());
        let later = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut stamper = Stamper::default();
        stamper.observe(later);
        assert!(stamper.next(&clock) > later);
    }
}
