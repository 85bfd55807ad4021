use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::series::ForecastSeries;

/// Forecasts older than this are not used.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 20;

/// Whether a forecast valid from `start` is too old to use at `now`.
#[must_use]
pub fn is_stale(start: NaiveDateTime, now: NaiveDateTime, max_age: Duration) -> bool {
    now - start > max_age
}

/// A series whose extended hours count from midnight of `day`, the local
/// date of its first sample.
#[derive(Debug, PartialEq, Clone)]
pub struct DatedSeries {
    pub day: NaiveDate,
    pub series: ForecastSeries,
}

impl DatedSeries {
    #[must_use]
    pub const fn new(day: NaiveDate, series: ForecastSeries) -> Self {
        Self { day, series }
    }

    /// `now` in the extended hours of this series.
    #[must_use]
    pub fn hour_offset(&self, now: NaiveDateTime) -> f64 {
        let days = (now.date() - self.day).num_days();
        f64::from(now.hour()) + f64::from(now.minute()) / 60.0 + 24.0 * days as f64
    }
}

/// One downloaded forecast, in local time.
#[derive(Debug, PartialEq, Clone)]
pub struct Forecast {
    /// validity start of the forecast
    pub start: NaiveDateTime,
    /// °F
    pub temperature: DatedSeries,
    /// percent
    pub humidity: DatedSeries,
}

impl Forecast {
    #[must_use]
    pub const fn new(start: NaiveDateTime, temperature: DatedSeries, humidity: DatedSeries) -> Self {
        Self {
            start,
            temperature,
            humidity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    fn dated(day: NaiveDate) -> DatedSeries {
        DatedSeries::new(
            day,
            ForecastSeries::normalize(&[1, 2, 3], &[0.0; 3]).unwrap(),
        )
    }

    #[test]
    fn staleness() {
        let start = at(1, 6, 0);
        let max_age = Duration::hours(DEFAULT_MAX_AGE_HOURS);
        assert!(!is_stale(start, at(2, 2, 0), max_age));
        assert!(!is_stale(start, at(2, 2, 0) - Duration::minutes(1), max_age));
        assert!(is_stale(start, at(2, 2, 1), max_age));
    }

    #[test]
    fn hour_offset_counts_days() {
        let series = dated(at(1, 18, 0).date());
        assert_eq!(series.hour_offset(at(1, 20, 30)), 20.5);
        assert_eq!(series.hour_offset(at(2, 1, 15)), 25.25);
    }

    #[test]
    fn hour_offset_across_month_end() {
        let series = dated(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        assert_eq!(series.hour_offset(at(1, 3, 0)), 27.0);
    }

    #[test]
    fn each_series_counts_from_its_own_day() {
        let before_midnight = dated(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        let after_midnight = dated(at(1, 0, 0).date());
        assert_eq!(before_midnight.hour_offset(at(1, 0, 30)), 24.5);
        assert_eq!(after_midnight.hour_offset(at(1, 0, 30)), 0.5);
    }
}
