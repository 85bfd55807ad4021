use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::decision::ForecastReading;
use crate::forecast::Forecast;
use crate::locator::CurrentIndexLocator;
use crate::lookahead::{Lookahead, LookaheadPredictor, SmartParams};
use crate::output::{OutputModel, VentOutput};
use crate::Error;

/// Everything the forecast says about now and the next hours.
#[derive(Deserialize, Serialize, Debug, PartialEq, Copy, Clone)]
pub struct Assessment {
    /// now in the extended hours of each series
    pub hour_offset_t: f64,
    pub hour_offset_rh: f64,
    pub index_t: usize,
    pub index_rh: usize,
    /// °F
    pub outdoor_temperature: f64,
    /// percent
    pub outdoor_humidity: f64,
    pub vent_now: VentOutput,
    pub lookahead: Lookahead,
}

impl Assessment {
    /// False when the outdoor temperature is too low for the chart.
    #[must_use]
    pub fn is_trusted(&self) -> bool {
        OutputModel::is_trusted(self.outdoor_temperature)
    }

    #[must_use]
    pub const fn reading(&self) -> ForecastReading {
        ForecastReading {
            vent_now: self.vent_now,
            smart_value: self.lookahead.smart_value,
        }
    }
}

/// Forecast values are taken as valid for their whole interval, so the
/// current sample is used as is.
pub fn assess(
    forecast: &Forecast,
    now: NaiveDateTime,
    model: &OutputModel,
    locator: &CurrentIndexLocator,
    params: SmartParams,
) -> Result<Assessment, Error> {
    let temperature = &forecast.temperature.series;
    let humidity = &forecast.humidity.series;
    let hour_offset_t = forecast.temperature.hour_offset(now);
    let hour_offset_rh = forecast.humidity.hour_offset(now);
    let index_t = locator.locate(temperature, hour_offset_t)?;
    let index_rh = locator.locate(humidity, hour_offset_rh)?;
    tracing::debug!(
        "temperature index {index_t} at hour {hour_offset_t:.2}, \
         humidity index {index_rh} at hour {hour_offset_rh:.2}"
    );

    let outdoor_temperature = temperature.samples()[index_t].value;
    let outdoor_humidity = humidity.samples()[index_rh].value;
    let vent_now = model.compute(outdoor_temperature, outdoor_humidity);

    let lookahead = LookaheadPredictor::new(model, params).predict(
        temperature,
        index_t,
        humidity,
        index_rh,
        &vent_now,
    )?;

    Ok(Assessment {
        hour_offset_t,
        hour_offset_rh,
        index_t,
        index_rh,
        outdoor_temperature,
        outdoor_humidity,
        vent_now,
        lookahead,
    })
}
