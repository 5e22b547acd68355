//! Clipped-normal noise applied to aggregated rows.
//!
//! Each row draws one fraction, clamps it into `[-1, 1]`, and shifts its
//! count by that fraction of the group standard deviation:
//!
//! ```text
//! mock_value = round_half_even(|count + sd * fraction|)
//! ```
//!
//! Draws come from a [`FractionSource`], so callers can plug in a seeded
//! generator or a fixed sequence for reproducible output.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    aggregate::SD_COLUMN,
    data::{Table, Value},
    error::MockError,
};

pub const FRACTION_COLUMN: &str = "fraction";
pub const MOCK_VALUE_COLUMN: &str = "mock_value";

pub trait FractionSource {
    /// One raw draw, before clipping.
    fn next_fraction(&mut self) -> f64;
}

pub struct NormalFractions<R> {
    normal: Normal<f64>,
    rng: R,
}

impl<R: Rng> NormalFractions<R> {
    pub fn new(mu: f64, sigma: f64, rng: R) -> Result<Self, MockError> {
        if !mu.is_finite() {
            return Err(MockError::InvalidNoise(format!("mu must be finite, got {mu}")));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(MockError::InvalidNoise(format!(
                "sigma must be finite and non-negative, got {sigma}"
            )));
        }
        let normal =
            Normal::new(mu, sigma).map_err(|err| MockError::InvalidNoise(err.to_string()))?;
        Ok(Self { normal, rng })
    }
}

impl<R: Rng> FractionSource for NormalFractions<R> {
    fn next_fraction(&mut self) -> f64 {
        self.normal.sample(&mut self.rng)
    }
}

/// Replays a fixed sequence of draws, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct FixedFractions {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedFractions {
    pub fn new(values: Vec<f64>) -> Result<Self, MockError> {
        if values.is_empty() {
            return Err(MockError::InvalidNoise(
                "fixed fraction sequence cannot be empty".to_string(),
            ));
        }
        Ok(Self { values, cursor: 0 })
    }

    pub fn constant(value: f64) -> Self {
        Self {
            values: vec![value],
            cursor: 0,
        }
    }
}

impl FractionSource for FixedFractions {
    fn next_fraction(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

pub fn clip_fraction(draw: f64) -> f64 {
    draw.clamp(-1.0, 1.0)
}

/// NaN in either `count` or `sd` comes straight through.
pub fn mock_value(count: f64, sd: f64, fraction: f64) -> f64 {
    (count + sd * fraction).abs().round_ties_even()
}

/// Writes `fraction` and `mock_value` onto an aggregated table, replacing
/// any columns already carrying those names.
///
/// Exactly one draw is taken per row, in row order.
pub fn inject<S>(mut table: Table, count_column: &str, source: &mut S) -> Result<Table, MockError>
where
    S: FractionSource + ?Sized,
{
    let count_idx = table.require_column(count_column)?;
    let sd_idx = table.require_column(SD_COLUMN)?;

    let mut fractions = Vec::with_capacity(table.len());
    let mut mock_values = Vec::with_capacity(table.len());
    for row in &table.rows {
        let fraction = clip_fraction(source.next_fraction());
        let count = row[count_idx].as_f64().unwrap_or(f64::NAN);
        let sd = row[sd_idx].as_f64().unwrap_or(f64::NAN);
        fractions.push(Value::Number(fraction));
        mock_values.push(Value::Number(mock_value(count, sd, fraction)));
    }

    table.set_column(FRACTION_COLUMN, fractions);
    table.set_column(MOCK_VALUE_COLUMN, mock_values);
    Ok(table)
}

/// [`inject`] with draws from Normal(`mu`, `sigma`) over `rng`.
pub fn inject_normal<R>(
    table: Table,
    count_column: &str,
    mu: f64,
    sigma: f64,
    rng: &mut R,
) -> Result<Table, MockError>
where
    R: Rng + ?Sized,
{
    let mut source = NormalFractions::new(mu, sigma, rng)?;
    inject(table, count_column, &mut source)
}
