use chrono::NaiveTime;
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

use crate::output::VentOutput;

/// Time of day interval, exclusive at both ends. Wraps past midnight when
/// `start` is after `end`; empty when they are equal.
#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Copy, Clone)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    #[must_use]
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        match self.start.cmp(&self.end) {
            Ordering::Less => self.start < time && time < self.end,
            Ordering::Greater => time > self.start || time < self.end,
            Ordering::Equal => false,
        }
    }
}

/// Time of day from constant hours and minutes.
pub(crate) fn clock(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("hour < 24 and minute < 60")
}

/// Comfort and schedule settings, temperatures in °F.
#[derive(Deserialize, Serialize, Debug, PartialEq, Copy, Clone)]
pub struct Thresholds {
    /// indoor temperature to cool down to
    pub target: f64,
    /// indoor temperature to cool down to inside the `early` window
    pub min: f64,
    /// highest acceptable vent relative humidity
    pub rh_max: f64,
    /// utility peak hours
    pub peak: TimeWindow,
    /// early morning window where the house may be cooled below `target`
    pub early: TimeWindow,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            target: 75.0,
            min: 67.0,
            rh_max: 90.0,
            peak: TimeWindow::new(clock(9, 0), clock(18, 30)),
            early: TimeWindow::new(clock(5, 0), clock(7, 0)),
        }
    }
}

/// What the forecast contributes to a decision.
#[derive(Deserialize, Serialize, Debug, PartialEq, Copy, Clone)]
pub struct ForecastReading {
    pub vent_now: VentOutput,
    pub smart_value: f64,
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct DecisionInputs {
    pub now: NaiveTime,
    /// thermometer reading inside the house, °F
    pub indoor: f64,
    /// `None` when no usable forecast was fetched
    pub forecast: Option<ForecastReading>,
}

/// Reasons not to run the cooler.
#[derive(Deserialize, Serialize, Debug, Default, Eq, PartialEq, Copy, Clone)]
pub struct StopFlags {
    pub peak_hours: bool,
    pub cool_enough: bool,
    pub output_too_warm: bool,
    pub too_humid: bool,
}

impl StopFlags {
    #[must_use]
    pub const fn as_array(&self) -> [bool; 4] {
        [
            self.peak_hours,
            self.cool_enough,
            self.output_too_warm,
            self.too_humid,
        ]
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.as_array().into_iter().any(|stop| stop)
    }

    #[must_use]
    pub fn recommendation(&self) -> Recommendation {
        if self.any() {
            Recommendation::DoNotRun
        } else {
            Recommendation::Run
        }
    }
}

impl From<StopFlags> for [bool; 4] {
    fn from(flags: StopFlags) -> Self {
        flags.as_array()
    }
}

#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Copy, Clone)]
pub enum Recommendation {
    Run,
    DoNotRun,
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct DecisionEngine {
    thresholds: Thresholds,
}

impl DecisionEngine {
    #[must_use]
    pub const fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    #[must_use]
    pub fn decide(&self, inputs: &DecisionInputs) -> StopFlags {
        let t = &self.thresholds;
        let floor = if t.early.contains(inputs.now) {
            t.min
        } else {
            t.target
        };
        let flags = StopFlags {
            peak_hours: t.peak.contains(inputs.now),
            cool_enough: inputs.indoor < floor,
            output_too_warm: inputs
                .forecast
                .is_some_and(|f| f.vent_now.temperature + f.smart_value >= inputs.indoor),
            too_humid: inputs
                .forecast
                .is_some_and(|f| f.vent_now.humidity > t.rh_max),
        };
        tracing::debug!("{:?} -> {:?}", inputs, flags);
        flags
    }
}
