//! Short horizon trend of the vent temperature.
//!
//! The next temperature sample is taken as is; humidity is extrapolated
//! along its own series to the same horizon. If the vent is about to get
//! colder there is less reason to run now, which raises the smart value
//! added to the vent temperature in the "not cold enough" rule.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::output::{OutputModel, VentOutput};
use crate::series::ForecastSeries;

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum LookaheadError {
    #[error("sample {index} needs two later samples, series has {len}")]
    NoLookahead { index: usize, len: usize },

    #[error("samples {index} and {} are a whole number of days apart", .index + 2)]
    ZeroStep { index: usize },
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Copy, Clone)]
pub struct SmartParams {
    /// 0 ignores the forecast; much more than 1 keeps the cooler off
    /// whenever the vent will soon be colder.
    pub multiplier: f64,
    /// °F, also the floor of the smart value
    pub min_smart_value: f64,
}

impl Default for SmartParams {
    fn default() -> Self {
        Self {
            multiplier: 3.0,
            min_smart_value: 2.0,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Copy, Clone)]
pub struct Lookahead {
    pub step_hours: f64,
    pub temperature_soon: f64,
    pub humidity_soon: f64,
    pub vent_soon: VentOutput,
    pub smart_value: f64,
}

/// Hours from sample `index` to the middle of the following interval.
pub fn step_hours(series: &ForecastSeries, index: usize) -> Result<f64, LookaheadError> {
    let (Some(now), Some(later)) = (series.get(index), series.get(index + 2)) else {
        return Err(LookaheadError::NoLookahead {
            index,
            len: series.len(),
        });
    };
    match (later.hour - now.hour).rem_euclid(24) {
        0 => Err(LookaheadError::ZeroStep { index }),
        span => Ok(span as f64 / 2.0),
    }
}

fn value(series: &ForecastSeries, index: usize) -> Result<f64, LookaheadError> {
    series
        .get(index)
        .map(|s| s.value)
        .ok_or(LookaheadError::NoLookahead {
            index,
            len: series.len(),
        })
}

pub struct LookaheadPredictor<'a> {
    model: &'a OutputModel,
    params: SmartParams,
}

impl<'a> LookaheadPredictor<'a> {
    #[must_use]
    pub const fn new(model: &'a OutputModel, params: SmartParams) -> Self {
        Self { model, params }
    }

    pub fn predict(
        &self,
        temperature: &ForecastSeries,
        index_t: usize,
        humidity: &ForecastSeries,
        index_rh: usize,
        vent_now: &VentOutput,
    ) -> Result<Lookahead, LookaheadError> {
        let step = step_hours(temperature, index_t)?;
        let step_rh = step_hours(humidity, index_rh)?;

        let temperature_soon = value(temperature, index_t + 1)?;
        let rh_now = value(humidity, index_rh)?;
        let rh_slope = (value(humidity, index_rh + 1)? - rh_now) / step_rh;
        let humidity_soon = rh_now + step * rh_slope;

        let vent_soon = self.model.compute(temperature_soon, humidity_soon);
        let smart_value = self.smart_value(vent_now.temperature, vent_soon.temperature, step);
        tracing::debug!(
            "lookahead {step}h: {temperature_soon:.1}°F {humidity_soon:.1}% -> vent {:.1}°F, smart {smart_value:.2}",
            vent_soon.temperature
        );

        Ok(Lookahead {
            step_hours: step,
            temperature_soon,
            humidity_soon,
            vent_soon,
            smart_value,
        })
    }

    #[must_use]
    pub fn smart_value(&self, vent_now: f64, vent_soon: f64, step_hours: f64) -> f64 {
        let SmartParams {
            multiplier,
            min_smart_value,
        } = self.params;
        (min_smart_value + multiplier * (vent_now - vent_soon) / step_hours).max(min_smart_value)
    }
}
