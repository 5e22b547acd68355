use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, warn};

use crate::{
    data::{Table, Value, parse_number},
    error::MockError,
    noise::{FRACTION_COLUMN, MOCK_VALUE_COLUMN},
    roles::ColumnRoles,
};

pub const MEAN_COLUMN: &str = "mean";
pub const SD_COLUMN: &str = "sd";

/// Column names the pipeline writes. An input header with one of these
/// names would shadow or be shadowed by the generated column.
pub const GENERATED_COLUMNS: [&str; 4] =
    [MEAN_COLUMN, SD_COLUMN, FRACTION_COLUMN, MOCK_VALUE_COLUMN];

/// Count-column statistics for one group of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub key: Vec<String>,
    /// Rows carrying a numeric count. Missing counts are not included.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN when fewer than two values exist.
    pub sd: f64,
}

impl GroupStats {
    pub fn is_degenerate(&self) -> bool {
        self.count < 2
    }
}

/// Checks that every column a role points at is present in the headers.
pub fn check_schema(table: &Table, roles: &ColumnRoles) -> Result<(), MockError> {
    for (role, column) in roles.required_columns() {
        if table.column_index(column).is_none() {
            return Err(MockError::Schema {
                role,
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Rejects input headers that clash with a column the pipeline generates.
pub fn check_generated_columns(table: &Table) -> Result<(), MockError> {
    match GENERATED_COLUMNS
        .iter()
        .find(|name| table.column_index(name).is_some())
    {
        Some(name) => Err(MockError::GeneratedColumn(name.to_string())),
        None => Ok(()),
    }
}

/// Per-group statistics of the count column, sorted by group key.
pub fn group_stats(table: &Table, roles: &ColumnRoles) -> Result<Vec<GroupStats>, MockError> {
    let grouping = Grouping::build(table, roles)?;
    Ok(grouping
        .stats
        .into_iter()
        .sorted_by(|a, b| a.key.cmp(&b.key))
        .collect())
}

/// Joins each row with its group's mean and standard deviation.
///
/// The result keeps input row order and row count. Columns are laid out as
/// the group key columns, `mean`, `sd`, then the remaining input columns in
/// their original order. Count cells are typed as numbers on the way.
///
/// Inputs that already carry a `mean`, `sd`, `fraction` or `mock_value`
/// column are rejected with [`MockError::GeneratedColumn`].
pub fn aggregate(table: &Table, roles: &ColumnRoles) -> Result<Table, MockError> {
    check_generated_columns(table)?;
    let grouping = Grouping::build(table, roles)?;

    let degenerate = grouping.stats.iter().filter(|s| s.is_degenerate()).count();
    if degenerate > 0 {
        warn!(
            "{} of {} group(s) have fewer than two '{}' values; their sd and mock values will be NaN",
            degenerate,
            grouping.stats.len(),
            roles.count()
        );
    }

    let key_indices = grouping.key_indices;
    let rest_indices = (0..table.headers.len())
        .filter(|idx| !key_indices.contains(idx))
        .collect::<Vec<_>>();
    let count_idx = table.require_column(roles.count())?;

    let mut headers = key_indices
        .iter()
        .map(|idx| table.headers[*idx].clone())
        .collect::<Vec<_>>();
    headers.push(MEAN_COLUMN.to_string());
    headers.push(SD_COLUMN.to_string());
    headers.extend(rest_indices.iter().map(|idx| table.headers[*idx].clone()));

    let mut joined = Table::new(headers);
    joined.rows.reserve(table.len());
    for ((row, group), count) in table
        .rows
        .iter()
        .zip(&grouping.row_groups)
        .zip(grouping.counts)
    {
        let stats = &grouping.stats[*group];
        let mut out = Vec::with_capacity(row.len() + 2);
        out.extend(key_indices.iter().map(|idx| row[*idx].clone()));
        out.push(Value::Number(stats.mean));
        out.push(Value::Number(stats.sd));
        out.extend(rest_indices.iter().map(|idx| {
            if *idx == count_idx {
                count.map_or(Value::Missing, Value::Number)
            } else {
                row[*idx].clone()
            }
        }));
        joined.rows.push(out);
    }

    debug!(
        "Aggregated {} row(s) into {} group(s) by {:?}",
        joined.len(),
        grouping.stats.len(),
        roles.group_columns()
    );
    Ok(joined)
}

/// Row-to-group assignment plus the finished statistics, in first-seen
/// group order.
struct Grouping {
    key_indices: Vec<usize>,
    stats: Vec<GroupStats>,
    /// Index into `stats` for every input row.
    row_groups: Vec<usize>,
    counts: Vec<Option<f64>>,
}

impl Grouping {
    fn build(table: &Table, roles: &ColumnRoles) -> Result<Self, MockError> {
        check_schema(table, roles)?;
        let counts = parse_counts(table, roles.count())?;
        let key_indices = roles
            .group_columns()
            .into_iter()
            .map(|name| table.require_column(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut positions: HashMap<Vec<String>, usize> = HashMap::new();
        let mut accumulators: Vec<GroupAccumulator> = Vec::new();
        let mut row_groups = Vec::with_capacity(table.len());

        for (row, count) in table.rows.iter().zip(&counts) {
            let key = key_indices
                .iter()
                .map(|idx| row[*idx].as_display())
                .collect::<Vec<_>>();
            let position = match positions.get(&key) {
                Some(position) => *position,
                None => {
                    accumulators.push(GroupAccumulator::new(key.clone()));
                    positions.insert(key, accumulators.len() - 1);
                    accumulators.len() - 1
                }
            };
            if let Some(value) = count {
                accumulators[position].values.push(*value);
            }
            row_groups.push(position);
        }

        let stats = accumulators
            .into_iter()
            .map(GroupAccumulator::finish)
            .collect();

        Ok(Self {
            key_indices,
            stats,
            row_groups,
            counts,
        })
    }
}

struct GroupAccumulator {
    key: Vec<String>,
    values: Vec<f64>,
}

impl GroupAccumulator {
    fn new(key: Vec<String>) -> Self {
        Self {
            key,
            values: Vec::new(),
        }
    }

    fn finish(self) -> GroupStats {
        let (mean, sd) = sample_mean_sd(&self.values);
        GroupStats {
            key: self.key,
            count: self.values.len(),
            mean,
            sd,
        }
    }
}

fn parse_counts(table: &Table, column: &str) -> Result<Vec<Option<f64>>, MockError> {
    let idx = table.require_column(column)?;
    table
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| match &row[idx] {
            Value::Number(f) if f.is_nan() => Ok(None),
            Value::Number(f) => Ok(Some(*f)),
            Value::Missing => Ok(None),
            Value::Text(raw) => parse_number(raw).map_err(|value| MockError::DataType {
                column: column.to_string(),
                row: row_idx + 1,
                value,
            }),
        })
        .collect()
}

/// Mean and Bessel-corrected standard deviation.
fn sample_mean_sd(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, f64::NAN);
    }
    let squares = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    (mean, (squares / (n - 1.0)).sqrt())
}
