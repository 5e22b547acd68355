//! In-memory table shared by every pipeline stage.
//!
//! A [`Table`] is a header list plus rows of [`Value`] cells. Input files
//! arrive as text cells; the aggregation step types the count column and
//! appends numeric statistics, and the noise step appends the fraction and
//! mock value columns.

use std::fmt;

use crate::error::MockError;

const MISSING_MARKERS: &[&str] = &["na", "nan", "null", "none", "n/a"];

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Missing,
}

impl Value {
    pub fn from_raw(raw: &str) -> Self {
        if raw.is_empty() {
            Value::Missing
        } else {
            Value::Text(raw.to_string())
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(f) => format_number(*f),
            Value::Missing => String::new(),
        }
    }

    /// Numeric view of the cell. Text cells are parsed; missing cells and
    /// unparseable text yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(f) => Some(*f),
            Value::Text(s) => parse_number(s).ok().flatten(),
            Value::Missing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Parses a measure cell. Blank cells and the usual missing markers map to
/// `Ok(None)`; anything that is not a number is an error carrying the
/// trimmed text back to the caller.
pub fn parse_number(raw: &str) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| trimmed.to_string())
}

pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Builds a table from decoded text records. Short records are padded
    /// with missing cells so every row matches the header width.
    pub fn from_records<I>(headers: Vec<String>, records: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let width = headers.len();
        let rows = records
            .into_iter()
            .map(|record| {
                let mut row = record
                    .iter()
                    .take(width)
                    .map(|cell| Value::from_raw(cell))
                    .collect::<Vec<_>>();
                row.resize(width, Value::Missing);
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, MockError> {
        self.column_index(name)
            .ok_or_else(|| MockError::MissingColumn(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Appends a column. `values` must hold one cell per row.
    pub fn push_column(&mut self, name: &str, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Writes a column, replacing the cells of an existing column of the same
    /// name or appending a new one.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) {
        match self.column_index(name) {
            Some(idx) => {
                debug_assert_eq!(values.len(), self.rows.len());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => self.push_column(name, values),
        }
    }

    /// Returns a new table holding only `columns`, in the given order.
    pub fn select(&self, columns: &[&str]) -> Result<Table, MockError> {
        let indices = columns
            .iter()
            .map(|name| self.require_column(name))
            .collect::<Result<Vec<_>, _>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|idx| row[*idx].clone()).collect())
            .collect();
        Ok(Table {
            headers: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Value::as_display).collect())
            .collect()
    }
}
