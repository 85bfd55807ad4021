//! Should the swamp cooler run?
//!
//! Outdoor conditions from an hourly forecast go through an evaporative
//! cooler chart to get the vent temperature and humidity, now and a little
//! later. Those, the indoor temperature and the clock feed four independent
//! reasons not to run the cooler.

use thiserror::Error;

pub mod assess;
pub mod decision;
pub mod forecast;
pub mod locator;
pub mod lookahead;
pub mod output;
pub mod series;

pub use assess::{assess, Assessment};
pub use decision::{
    DecisionEngine, DecisionInputs, ForecastReading, Recommendation, StopFlags, Thresholds,
    TimeWindow,
};
pub use forecast::{DatedSeries, Forecast};
pub use locator::{CurrentIndexLocator, LocatorError};
pub use lookahead::{Lookahead, LookaheadError, LookaheadPredictor, SmartParams};
pub use output::{Cell, OutputModel, OutputTable, TableError, VentOutput};
pub use series::{ForecastSeries, Sample, SeriesError};

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("output table: {0}")]
    Table(#[from] TableError),

    #[error("forecast series: {0}")]
    Series(#[from] SeriesError),

    #[error("current sample: {0}")]
    Locator(#[from] LocatorError),

    #[error("lookahead: {0}")]
    Lookahead(#[from] LookaheadError),
}
