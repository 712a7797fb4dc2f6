use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use vega_core::Timestamp;
use vega_ports::Clock;

/// Exchange session calendar
///
/// Knows when the trading session opens in exchange-local time and maps
/// that to UTC instants. Drives the daily baseline capture schedule and
/// the "bars since session open" queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCalendar {
    /// Session open in exchange-local time
    pub open: NaiveTime,
    /// Exchange UTC offset, seconds east
    pub offset_secs: i32,
}

impl Default for SessionCalendar {
    fn default() -> Self {
        Self {
            // NSE cash session, IST
            open: NaiveTime::from_hms_opt(9, 15, 0).expect("valid session open"),
            offset_secs: 5 * 3600 + 30 * 60,
        }
    }
}

impl SessionCalendar {
    pub fn new(open: NaiveTime, offset_secs: i32) -> Self {
        Self { open, offset_secs }
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.offset_secs).expect("valid exchange offset")
    }

    /// The exchange-local trading day containing `now`
    pub fn trading_day(&self, now: Timestamp) -> NaiveDate {
        now.with_timezone(&self.offset()).date_naive()
    }

    /// UTC instant of session open on the given trading day
    pub fn open_on(&self, day: NaiveDate) -> Timestamp {
        let local = day.and_time(self.open);
        Utc.from_utc_datetime(&(local - self.offset()))
    }

    /// UTC instant of session open for the trading day containing `now`
    pub fn session_open_for(&self, now: Timestamp) -> Timestamp {
        self.open_on(self.trading_day(now))
    }

    /// Next session-open instant strictly after `now`, skipping weekends
    pub fn next_open(&self, now: Timestamp) -> Timestamp {
        let mut day = self.trading_day(now);
        if now >= self.open_on(day) {
            day = day + Duration::days(1);
        }
        while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            day = day + Duration::days(1);
        }
        self.open_on(day)
    }
}

/// Production time source: wall-clock UTC instants plus the exchange
/// calendar they should be interpreted against.
///
/// Keeping the calendar on the clock means the service wiring hands one
/// value to everything that needs "now" and "which trading day is it".
pub struct SessionClock {
    calendar: SessionCalendar,
}

impl SessionClock {
    pub fn new(calendar: SessionCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &SessionCalendar {
        &self.calendar
    }

    /// Exchange-local trading day at this instant
    pub fn trading_day(&self) -> NaiveDate {
        self.calendar.trading_day(self.now())
    }

    /// Session-open instant of the current trading day
    pub fn session_open(&self) -> Timestamp {
        self.calendar.session_open_for(self.now())
    }
}

impl Clock for SessionClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar() -> SessionCalendar {
        SessionCalendar::default()
    }

    #[test]
    fn test_open_on_maps_ist_to_utc() {
        // 09:15 IST == 03:45 UTC
        let day = NaiveDate::from_ymd_opt(2024, 8, 5).unwrap();
        let open = calendar().open_on(day);
        assert_eq!(open, Utc.with_ymd_and_hms(2024, 8, 5, 3, 45, 0).unwrap());
    }

    #[test]
    fn test_trading_day_rolls_with_offset() {
        // 22:00 UTC on the 5th is already the 6th in IST
        let late = Utc.with_ymd_and_hms(2024, 8, 5, 22, 0, 0).unwrap();
        assert_eq!(
            calendar().trading_day(late),
            NaiveDate::from_ymd_opt(2024, 8, 6).unwrap()
        );
    }

    #[test]
    fn test_next_open_before_open_is_same_day() {
        // 02:00 UTC Monday, before the 03:45 UTC open
        let now = Utc.with_ymd_and_hms(2024, 8, 5, 2, 0, 0).unwrap();
        let next = calendar().next_open(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 8, 5, 3, 45, 0).unwrap());
    }

    #[test]
    fn test_next_open_after_open_is_next_day() {
        // Mid-session Monday -> Tuesday's open
        let now = Utc.with_ymd_and_hms(2024, 8, 5, 6, 0, 0).unwrap();
        let next = calendar().next_open(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 8, 6, 3, 45, 0).unwrap());
    }

    #[test]
    fn test_session_clock_open_lands_on_calendar_open() {
        // Holds at any wall instant: the derived open, read once and
        // viewed in exchange-local time, is the configured open time
        let clock = SessionClock::new(calendar());
        let open = clock.session_open();
        let local = open.with_timezone(&FixedOffset::east_opt(19800).unwrap());
        assert_eq!(local.time(), clock.calendar().open);
    }

    #[test]
    fn test_next_open_skips_weekend() {
        // Mid-session Friday -> Monday's open
        let now = Utc.with_ymd_and_hms(2024, 8, 9, 6, 0, 0).unwrap();
        assert_eq!(now.weekday(), Weekday::Fri);
        let next = calendar().next_open(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 8, 12, 3, 45, 0).unwrap());
        assert_eq!(next.weekday(), Weekday::Mon);
    }
}
