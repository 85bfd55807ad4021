use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::series::ForecastSeries;

/// Hours tried when looking for the current sample: the current hour and
/// up to four missing ones before it.
pub const DEFAULT_MAX_SKIP: u32 = 5;

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum LocatorError {
    #[error("no forecast sample in the {max_skip} hours up to hour {hour}")]
    NoSampleWithinSkip { hour: i64, max_skip: u32 },
}

/// Finds the latest sample at or before now, tolerating feeds that skip
/// a few hours.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Copy, Clone)]
pub struct CurrentIndexLocator {
    pub max_skip: u32,
}

impl Default for CurrentIndexLocator {
    fn default() -> Self {
        Self {
            max_skip: DEFAULT_MAX_SKIP,
        }
    }
}

impl CurrentIndexLocator {
    #[must_use]
    pub const fn new(max_skip: u32) -> Self {
        Self { max_skip }
    }

    /// `now_hour` is in the series' extended hours.
    pub fn locate(&self, series: &ForecastSeries, now_hour: f64) -> Result<usize, LocatorError> {
        let hour = now_hour.floor() as i64;
        (0..i64::from(self.max_skip))
            .find_map(|skip| series.position(hour - skip))
            .ok_or(LocatorError::NoSampleWithinSkip {
                hour,
                max_skip: self.max_skip,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(raw: &[u32]) -> ForecastSeries {
        ForecastSeries::normalize(raw, &vec![0.0; raw.len()]).unwrap()
    }

    #[test]
    fn missing_hour_uses_previous_sample() {
        let s = series(&[10, 11, 13, 14]);
        let locator = CurrentIndexLocator::default();
        assert_eq!(locator.locate(&s, 12.0), Ok(1));
        assert_eq!(locator.locate(&s, 12.75), Ok(1));
        assert_eq!(locator.locate(&s, 13.0), Ok(2));
        assert_eq!(locator.locate(&s, 10.5), Ok(0));
    }

    #[test]
    fn skip_bound() {
        let s = series(&[4, 10, 11]);
        let locator = CurrentIndexLocator::default();
        assert_eq!(locator.locate(&s, 8.9), Ok(0));
        assert_eq!(
            locator.locate(&s, 9.0),
            Err(LocatorError::NoSampleWithinSkip {
                hour: 9,
                max_skip: 5
            })
        );
        assert_eq!(CurrentIndexLocator::new(6).locate(&s, 9.0), Ok(0));
    }

    #[test]
    fn before_the_first_sample() {
        let s = series(&[10, 11, 12]);
        assert!(CurrentIndexLocator::default().locate(&s, 9.5).is_err());
    }

    #[test]
    fn after_midnight() {
        let s = series(&[22, 23, 1, 2]);
        let locator = CurrentIndexLocator::default();
        assert_eq!(locator.locate(&s, 24.5), Ok(1));
        assert_eq!(locator.locate(&s, 25.0), Ok(2));
    }

    #[test]
    fn duplicates_resolve_to_the_first() {
        let s = series(&[7, 8, 8, 9]);
        assert_eq!(CurrentIndexLocator::default().locate(&s, 8.5), Ok(1));
    }
}
