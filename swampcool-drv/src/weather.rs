//! weather.gov gridpoint documents.
//!
//! Only the validity start and the temperature and relative humidity layers
//! are read. Timestamps are `<RFC 3339 instant>/<ISO 8601 duration>` and
//! assumed to fall on the hour.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, Offset, Timelike};
use serde::Deserialize;
use swampcool_lib::forecast::is_stale;
use swampcool_lib::output::celsius_to_fahrenheit;
use swampcool_lib::{DatedSeries, Forecast, ForecastSeries};

use crate::err::SwampError;

#[derive(Deserialize, Debug)]
pub struct GridDocument {
    pub properties: GridProperties,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    pub valid_times: String,
    pub temperature: Layer,
    pub relative_humidity: Layer,
}

#[derive(Deserialize, Debug)]
pub struct Layer {
    pub values: Vec<Record>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub valid_time: String,
    pub value: Option<f64>,
}

/// Answer of the `points` endpoint, which names the grid of a location.
#[derive(Deserialize, Debug)]
pub struct PointDocument {
    pub properties: PointProperties,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PointProperties {
    pub forecast_grid_data: String,
}

/// UTC offset of this machine right now.
#[must_use]
pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

fn instant(interval: &str) -> Result<DateTime<FixedOffset>, SwampError> {
    let start = interval.split('/').next().unwrap_or(interval);
    DateTime::parse_from_rfc3339(start).map_err(|e| SwampError::Timestamp(interval.to_string(), e))
}

fn layer(
    name: &str,
    layer: &Layer,
    offset: &FixedOffset,
    convert: impl Fn(f64) -> f64,
) -> Result<DatedSeries, SwampError> {
    let mut day = None;
    let mut hours = Vec::with_capacity(layer.values.len());
    let mut values = Vec::with_capacity(layer.values.len());
    for record in &layer.values {
        let Some(value) = record.value else {
            tracing::debug!("{name}: no value at {}", record.valid_time);
            continue;
        };
        let local = instant(&record.valid_time)?.with_timezone(offset);
        day.get_or_insert(local.date_naive());
        hours.push(local.hour());
        values.push(convert(value));
    }
    tracing::debug!("{name}: {} samples from {day:?}", hours.len());
    let series = ForecastSeries::normalize(&hours, &values)?;
    // a series of at least one sample has a first day
    let day = day.ok_or_else(|| SwampError::Document(format!("{name} layer has no values")))?;
    Ok(DatedSeries::new(day, series))
}

impl GridDocument {
    pub fn parse(body: &str) -> Result<Self, SwampError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Validity start, in local time.
    pub fn start(&self, offset: FixedOffset) -> Result<NaiveDateTime, SwampError> {
        Ok(instant(&self.properties.valid_times)?
            .with_timezone(&offset)
            .naive_local())
    }

    /// The forecast if it is no older than `max_age` at `now`. Age is checked
    /// before the layers are read.
    pub fn fresh_forecast(
        &self,
        offset: FixedOffset,
        now: NaiveDateTime,
        max_age: Duration,
    ) -> Result<Forecast, SwampError> {
        let start = self.start(offset)?;
        tracing::info!("forecast from {start}");
        if is_stale(start, now, max_age) {
            return Err(SwampError::Stale((now - start).num_hours()));
        }
        self.forecast(offset)
    }

    /// Temperatures in °F, hours of day at `offset`.
    pub fn forecast(&self, offset: FixedOffset) -> Result<Forecast, SwampError> {
        let props = &self.properties;
        if props.temperature.values.is_empty() || props.relative_humidity.values.is_empty() {
            return Err(SwampError::Document(
                "temperature or humidity layer is empty".to_string(),
            ));
        }
        Ok(Forecast::new(
            self.start(offset)?,
            layer(
                "temperature",
                &props.temperature,
                &offset,
                celsius_to_fahrenheit,
            )?,
            layer("humidity", &props.relative_humidity, &offset, |rh| rh)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swampcool_lib::{
        assess, CurrentIndexLocator, Error, OutputModel, SeriesError, SmartParams,
    };

    const DOC: &str = r#"{
        "properties": {
            "validTimes": "2024-06-01T18:00:00+00:00/P7DT7H",
            "temperature": {
                "uom": "wmoUnit:degC",
                "values": [
                    { "validTime": "2024-06-01T18:00:00+00:00/PT1H", "value": 35.0 },
                    { "validTime": "2024-06-01T19:00:00+00:00/PT2H", "value": 36.1 },
                    { "validTime": "2024-06-01T21:00:00+00:00/PT1H", "value": null },
                    { "validTime": "2024-06-02T05:00:00+00:00/PT1H", "value": 30.0 },
                    { "validTime": "2024-06-02T06:00:00+00:00/PT1H", "value": 28.0 }
                ]
            },
            "relativeHumidity": {
                "uom": "wmoUnit:percent",
                "values": [
                    { "validTime": "2024-06-01T18:00:00+00:00/PT3H", "value": 9 },
                    { "validTime": "2024-06-01T21:00:00+00:00/PT3H", "value": 11 },
                    { "validTime": "2024-06-02T00:00:00+00:00/PT6H", "value": 15 }
                ]
            }
        }
    }"#;

    fn mdt() -> FixedOffset {
        FixedOffset::west_opt(6 * 3600).unwrap()
    }

    #[test]
    fn local_hours_and_units() {
        let forecast = GridDocument::parse(DOC).unwrap().forecast(mdt()).unwrap();
        assert_eq!(
            forecast.start,
            NaiveDateTime::parse_from_str("2024-06-01 12:00", "%Y-%m-%d %H:%M").unwrap()
        );
        let temps = forecast.temperature.series.samples();
        assert_eq!(
            forecast.temperature.series.hours().collect::<Vec<_>>(),
            vec![12, 13, 23, 24]
        );
        assert!((temps[0].value - 95.0).abs() < 1e-9);
        assert!((temps[3].value - 82.4).abs() < 1e-9);
        assert_eq!(
            forecast.humidity.series.hours().collect::<Vec<_>>(),
            vec![12, 15, 18]
        );
        assert_eq!(forecast.humidity.series.samples()[1].value, 11.0);
        assert_eq!(forecast.temperature.day, forecast.start.date());
    }

    #[test]
    fn utc_feed_without_offset() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let forecast = GridDocument::parse(DOC).unwrap().forecast(utc).unwrap();
        assert_eq!(
            forecast.temperature.series.hours().collect::<Vec<_>>(),
            vec![18, 19, 29, 30]
        );
    }

    #[test]
    fn too_few_usable_records() {
        let doc = DOC.replace("\"value\": 30.0", "\"value\": null");
        let doc = doc.replace("\"value\": 28.0", "\"value\": null");
        let err = GridDocument::parse(&doc).unwrap().forecast(mdt()).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            SwampError::Core(Error::Series(SeriesError::TooShort(2)))
        ));
    }

    // validity starts 23:00 MDT on May 31; the temperature layer's first
    // record has no value, so its first sample is already June 1
    const LATE_EVENING: &str = r#"{
        "properties": {
            "validTimes": "2024-06-01T05:00:00+00:00/P7D",
            "temperature": {
                "values": [
                    { "validTime": "2024-06-01T05:00:00+00:00/PT1H", "value": null },
                    { "validTime": "2024-06-01T06:00:00+00:00/PT1H", "value": 30.0 },
                    { "validTime": "2024-06-01T07:00:00+00:00/PT1H", "value": 29.0 },
                    { "validTime": "2024-06-01T08:00:00+00:00/PT1H", "value": 28.0 },
                    { "validTime": "2024-06-01T09:00:00+00:00/PT1H", "value": 27.0 }
                ]
            },
            "relativeHumidity": {
                "values": [
                    { "validTime": "2024-06-01T05:00:00+00:00/PT1H", "value": 20 },
                    { "validTime": "2024-06-01T06:00:00+00:00/PT1H", "value": 21 },
                    { "validTime": "2024-06-01T07:00:00+00:00/PT1H", "value": 22 },
                    { "validTime": "2024-06-01T08:00:00+00:00/PT1H", "value": 23 },
                    { "validTime": "2024-06-01T09:00:00+00:00/PT1H", "value": 24 }
                ]
            }
        }
    }"#;

    fn local(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn layers_count_hours_from_their_first_value() {
        let forecast = GridDocument::parse(LATE_EVENING)
            .unwrap()
            .forecast(mdt())
            .unwrap();
        assert_eq!(forecast.start, local("2024-05-31 23:00"));
        assert_eq!(
            forecast.temperature.series.hours().collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
        assert_eq!(
            forecast.humidity.series.hours().collect::<Vec<_>>(),
            vec![23, 24, 25, 26, 27]
        );

        let a = assess(
            &forecast,
            local("2024-06-01 00:30"),
            &OutputModel::default(),
            &CurrentIndexLocator::default(),
            SmartParams::default(),
        )
        .unwrap();
        assert_eq!((a.index_t, a.index_rh), (0, 1));
        assert!((a.outdoor_temperature - 86.0).abs() < 1e-9);
        assert_eq!(a.outdoor_humidity, 21.0);
    }

    #[test]
    fn stale_forecast_is_refused() {
        let doc = GridDocument::parse(DOC).unwrap();
        let max_age = Duration::hours(20);
        let err = doc
            .fresh_forecast(mdt(), local("2024-06-02 09:00"), max_age)
            .unwrap_err();
        assert!(matches!(err, SwampError::Stale(21)));
        assert!(!err.is_fatal());
        assert!(doc
            .fresh_forecast(mdt(), local("2024-06-01 13:00"), max_age)
            .is_ok());
    }

    #[test]
    fn stale_is_checked_before_the_layers() {
        let doc = DOC.replace("\"value\": 30.0", "\"value\": null");
        let doc = doc.replace("\"value\": 28.0", "\"value\": null");
        let doc = GridDocument::parse(&doc).unwrap();
        let err = doc
            .fresh_forecast(mdt(), local("2024-06-03 12:00"), Duration::hours(20))
            .unwrap_err();
        assert!(matches!(err, SwampError::Stale(48)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn bad_timestamp() {
        let doc = DOC.replace("2024-06-01T18:00:00+00:00/P7DT7H", "yesterday");
        let err = GridDocument::parse(&doc).unwrap().forecast(mdt()).unwrap_err();
        assert!(matches!(err, SwampError::Timestamp(..)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn not_a_grid() {
        assert!(matches!(
            GridDocument::parse(r#"{"properties": {}}"#),
            Err(SwampError::Json(_))
        ));
    }

    #[test]
    fn point_names_its_grid() {
        let point: PointDocument = serde_json::from_str(
            r#"{"properties": {"forecastGridData": "https://api.weather.gov/gridpoints/ABQ/101,119"}}"#,
        )
        .unwrap();
        assert_eq!(
            point.properties.forecast_grid_data,
            "https://api.weather.gov/gridpoints/ABQ/101,119"
        );
    }
}
