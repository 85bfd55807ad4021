//! Cooler vent conditions from outdoor conditions.
//!
//! Vent temperature comes from an empirical chart (outdoor °F rows, outdoor
//! relative humidity columns) read by bilinear interpolation inside a chart
//! cell, and linear extrapolation from the edge cells outside the chart.
//! Vent humidity comes from an energy balance: the sensible heat the air
//! loses is spent evaporating water into it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Below this outdoor temperature (°F) the chart is extrapolated too far to be trusted.
pub const TRUSTED_MIN_F: f64 = 70.0;

// Tetens equation, saturation vapor density in g/m³
const TETENS_A: f64 = 17.27;
const TETENS_B: f64 = 237.3;
const TETENS_C: f64 = 4.58;

// g/m³, temperature dependence ignored
const AIR_DENSITY: f64 = 1146.0;
// J/(g K)
const AIR_SPECIFIC_HEAT: f64 = 1.0;
// J/g
const WATER_LATENT_HEAT: f64 = 2260.0;

const CHART_TEMPERATURES: [f64; 11] = [
    75.0, 80.0, 85.0, 90.0, 95.0, 100.0, 105.0, 110.0, 115.0, 120.0, 125.0,
];

const CHART_HUMIDITIES: [f64; 17] = [
    2.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0,
    80.0,
];

// Published evaporative cooler chart. Each row lists the reachable cells;
// the remaining columns of a row cannot occur (too hot and too humid).
const CHART_ROWS: [&[f64]; 11] = [
    &[54., 55., 57., 58., 59., 61., 62., 63., 64., 65., 66., 67., 68., 69., 70., 71., 72.],
    &[57., 58., 60., 62., 63., 64., 66., 67., 68., 69., 71., 72., 73., 74., 75., 76., 77.],
    &[61., 62., 63., 65., 67., 68., 70., 71., 72., 73., 74., 75., 76., 77., 79., 81.],
    &[64., 65., 67., 69., 70., 72., 74., 76., 77., 78., 79., 81., 82., 83., 84., 86.],
    &[67., 68., 70., 72., 74., 76., 78., 79., 81., 82., 84., 85., 87.],
    &[69., 71., 73., 76., 78., 80., 82., 83., 85., 87., 88.],
    &[72., 74., 77., 79., 81., 84., 86., 88., 89.],
    &[75., 77., 80., 83., 85., 87., 90., 92.],
    &[78., 80., 83., 86., 89., 91., 94.],
    &[81., 83., 86., 90., 93., 95.],
    &[83., 86., 90., 93., 96.],
];

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TableError {
    #[error("{axis} axis needs at least 2 buckets, got {len}")]
    TooFewBuckets { axis: &'static str, len: usize },

    #[error("{axis} buckets are not strictly increasing")]
    Unsorted { axis: &'static str },

    #[error("row {row} has {len} cells, expected {expected}")]
    RowLength {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("{rows} rows for {expected} temperature buckets")]
    RowCount { rows: usize, expected: usize },

    #[error("row {0} has no reachable cell")]
    EmptyRow(usize),
}

/// One chart cell.
#[derive(Deserialize, Serialize, Debug, PartialEq, Copy, Clone)]
pub enum Cell {
    Known(f64),
    /// Outdoor combination that cannot physically occur.
    Unreachable,
}

impl Cell {
    #[must_use]
    pub const fn known(self) -> Option<f64> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unreachable => None,
        }
    }
}

/// Immutable vent temperature grid.
#[derive(Debug, PartialEq, Clone)]
pub struct OutputTable {
    temperatures: Vec<f64>,
    humidities: Vec<f64>,
    cells: Vec<Vec<Cell>>,
    filled: Vec<Vec<f64>>,
}

fn check_axis(axis: &'static str, buckets: &[f64]) -> Result<(), TableError> {
    if buckets.len() < 2 {
        return Err(TableError::TooFewBuckets {
            axis,
            len: buckets.len(),
        });
    }
    if !buckets.windows(2).all(|w| w[0] < w[1]) {
        return Err(TableError::Unsorted { axis });
    }
    Ok(())
}

impl OutputTable {
    /// Builds a table from temperature buckets (rows), humidity buckets
    /// (columns) and the row-major cells.
    pub fn new(
        temperatures: Vec<f64>,
        humidities: Vec<f64>,
        cells: Vec<Vec<Cell>>,
    ) -> Result<Self, TableError> {
        check_axis("temperature", &temperatures)?;
        check_axis("humidity", &humidities)?;
        if cells.len() != temperatures.len() {
            return Err(TableError::RowCount {
                rows: cells.len(),
                expected: temperatures.len(),
            });
        }
        for (row, cells) in cells.iter().enumerate() {
            if cells.len() != humidities.len() {
                return Err(TableError::RowLength {
                    row,
                    len: cells.len(),
                    expected: humidities.len(),
                });
            }
            if cells.iter().all(|c| c.known().is_none()) {
                return Err(TableError::EmptyRow(row));
            }
        }
        let filled = fill(&humidities, &cells);
        Ok(Self {
            temperatures,
            humidities,
            cells,
            filled,
        })
    }

    #[must_use]
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    #[must_use]
    pub fn humidities(&self) -> &[f64] {
        &self.humidities
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }
}

impl Default for OutputTable {
    fn default() -> Self {
        let cells: Vec<Vec<Cell>> = CHART_ROWS
            .iter()
            .map(|known| {
                let mut row: Vec<Cell> = known.iter().copied().map(Cell::Known).collect();
                row.resize(CHART_HUMIDITIES.len(), Cell::Unreachable);
                row
            })
            .collect();
        let filled = fill(&CHART_HUMIDITIES, &cells);
        Self {
            temperatures: CHART_TEMPERATURES.to_vec(),
            humidities: CHART_HUMIDITIES.to_vec(),
            cells,
            filled,
        }
    }
}

/// Largest bucket index at or below `query`, 0 when below every bucket.
fn bucket(buckets: &[f64], query: f64) -> usize {
    buckets.iter().rposition(|&b| b <= query).unwrap_or(0)
}

/// Lower index of the bucket pair around `query`, and where `query` sits
/// between the two: 0 on the lower bucket, 1 on the upper one, outside
/// [0, 1] beyond the first or last bucket.
fn bracket(buckets: &[f64], query: f64) -> (usize, f64) {
    let lo = bucket(buckets, query).min(buckets.len() - 2);
    (lo, (query - buckets[lo]) / (buckets[lo + 1] - buckets[lo]))
}

/// Stand-ins for unreachable cells so interpolation never reads a sentinel.
/// Each continues its row at the slope of the last two known cells before
/// it, and is never below the cell above it: the grid keeps increasing
/// along both axes.
fn fill(humidities: &[f64], cells: &[Vec<Cell>]) -> Vec<Vec<f64>> {
    let mut filled: Vec<Vec<f64>> = Vec::with_capacity(cells.len());
    for row in cells {
        let mut values: Vec<f64> = Vec::with_capacity(row.len());
        let mut last_known: Option<(usize, f64)> = None;
        let mut slope = 0.0;
        for (col, &cell) in row.iter().enumerate() {
            let value = match cell {
                Cell::Known(value) => {
                    if let Some((prev_col, prev)) = last_known {
                        slope = (value - prev) / (humidities[col] - humidities[prev_col]);
                    }
                    last_known = Some((col, value));
                    value
                }
                Cell::Unreachable => {
                    let along_row = values
                        .last()
                        .map(|left| left + slope * (humidities[col] - humidities[col - 1]));
                    let above = filled.last().map(|up| up[col]);
                    match (along_row, above) {
                        (Some(a), Some(b)) => a.max(b),
                        (Some(v), None) | (None, Some(v)) => v,
                        (None, None) => row.iter().find_map(|c| c.known()).unwrap_or_default(),
                    }
                }
            };
            values.push(value);
        }
        filled.push(values);
    }
    filled
}

#[must_use]
pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) / 1.8
}

#[must_use]
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 1.8 + 32.0
}

/// Saturation vapor density in g/m³ at `celsius`.
#[must_use]
pub fn saturation_vapor_density(celsius: f64) -> f64 {
    TETENS_C * (TETENS_A * celsius / (celsius + TETENS_B)).exp()
}

/// Vent relative humidity once air at `outdoor_f`/`outdoor_rh` is cooled to
/// `vent_f` by evaporation, clamped to [0, 100].
#[must_use]
pub fn vent_humidity(outdoor_f: f64, outdoor_rh: f64, vent_f: f64) -> f64 {
    humidity_balance(outdoor_f, outdoor_rh, vent_f).clamp(0.0, 100.0)
}

fn humidity_balance(outdoor_f: f64, outdoor_rh: f64, vent_f: f64) -> f64 {
    let outdoor_c = fahrenheit_to_celsius(outdoor_f);
    let vent_c = fahrenheit_to_celsius(vent_f);
    let water_before = outdoor_rh / 100.0 * saturation_vapor_density(outdoor_c);
    let water_added = AIR_DENSITY * AIR_SPECIFIC_HEAT * (outdoor_c - vent_c) / WATER_LATENT_HEAT;
    100.0 * (water_before + water_added) / saturation_vapor_density(vent_c)
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Copy, Clone)]
pub struct VentOutput {
    /// °F
    pub temperature: f64,
    /// percent, [0, 100]
    pub humidity: f64,
    /// false when the outdoor conditions fall in the chart's unreachable region
    pub reachable: bool,
}

#[derive(Debug, Default, PartialEq, Clone)]
pub struct OutputModel {
    table: OutputTable,
}

impl OutputModel {
    #[must_use]
    pub const fn new(table: OutputTable) -> Self {
        Self { table }
    }

    #[must_use]
    pub const fn table(&self) -> &OutputTable {
        &self.table
    }

    #[must_use]
    pub fn is_trusted(outdoor_f: f64) -> bool {
        outdoor_f >= TRUSTED_MIN_F
    }

    /// Vent conditions for outdoor temperature `outdoor_f` (°F) and relative
    /// humidity `outdoor_rh` (percent).
    #[must_use]
    pub fn compute(&self, outdoor_f: f64, outdoor_rh: f64) -> VentOutput {
        let table = &self.table;
        let (r, u) = bracket(table.temperatures(), outdoor_f);
        let (c, v) = bracket(table.humidities(), outdoor_rh);
        let at = |row: usize, col: usize| table.filled[row][col];
        let temperature = (1.0 - u) * ((1.0 - v) * at(r, c) + v * at(r, c + 1))
            + u * ((1.0 - v) * at(r + 1, c) + v * at(r + 1, c + 1));

        let reachable = table
            .cell(
                bucket(table.temperatures(), outdoor_f),
                bucket(table.humidities(), outdoor_rh),
            )
            .known()
            .is_some();

        VentOutput {
            temperature,
            humidity: vent_humidity(outdoor_f, outdoor_rh, temperature),
            reachable,
        }
    }
}
