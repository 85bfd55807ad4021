use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Samples needed for a current value plus a two sample lookahead.
pub const MIN_SAMPLES: usize = 3;

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum SeriesError {
    #[error("{hours} hours for {values} values")]
    LengthMismatch { hours: usize, values: usize },

    #[error("hour of day {hour} at position {index} is not in 0..=23")]
    HourOutOfRange { index: usize, hour: u32 },

    #[error("forecast series has {0} samples, at least {min} are needed", min = MIN_SAMPLES)]
    TooShort(usize),
}

/// A forecast value and its extended hour: hours since midnight of the day
/// the series starts on, growing past 24 across days.
#[derive(Deserialize, Serialize, Debug, PartialEq, Copy, Clone)]
pub struct Sample {
    pub hour: i64,
    pub value: f64,
}

/// Forecast samples with non-decreasing extended hours.
#[derive(Debug, PartialEq, Clone)]
pub struct ForecastSeries {
    samples: Vec<Sample>,
}

impl ForecastSeries {
    /// Builds a series from hours of day in feed order. Every time the hour
    /// of day goes backwards a day has passed, so 24 more hours are added to
    /// that sample and every later one.
    pub fn normalize(raw_hours: &[u32], values: &[f64]) -> Result<Self, SeriesError> {
        if raw_hours.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                hours: raw_hours.len(),
                values: values.len(),
            });
        }
        if let Some((index, &hour)) = raw_hours.iter().enumerate().find(|(_, h)| **h > 23) {
            return Err(SeriesError::HourOutOfRange { index, hour });
        }
        if raw_hours.len() < MIN_SAMPLES {
            return Err(SeriesError::TooShort(raw_hours.len()));
        }

        let mut wraps = 0;
        let mut previous = None;
        let samples = raw_hours
            .iter()
            .zip(values)
            .map(|(&hour, &value)| {
                if matches!(previous, Some(p) if hour < p) {
                    wraps += 1;
                }
                previous = Some(hour);
                Sample {
                    hour: i64::from(hour) + 24 * wraps,
                    value,
                }
            })
            .collect();
        Ok(Self { samples })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Index of the first sample at extended hour `hour`.
    #[must_use]
    pub fn position(&self, hour: i64) -> Option<usize> {
        self.samples.iter().position(|s| s.hour == hour)
    }

    pub fn hours(&self) -> impl Iterator<Item = i64> + '_ {
        self.samples.iter().map(|s| s.hour)
    }
}
