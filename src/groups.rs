use anyhow::{Context, Result};
use log::info;

use crate::{
    aggregate::{self, GroupStats, MEAN_COLUMN, SD_COLUMN},
    cli::GroupsArgs,
    data::format_number,
    io_utils, mock, table,
};

pub fn execute(args: &GroupsArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let roles = mock::resolve_roles(&args.roles)?;
    let input = io_utils::read_table(&args.input, delimiter, encoding, None)?;

    let stats = aggregate::group_stats(&input, &roles)
        .with_context(|| format!("Grouping {:?}", args.input))?;

    let mut headers = roles
        .group_columns()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    headers.extend(["count", MEAN_COLUMN, SD_COLUMN].map(str::to_string));
    let rows = stats.iter().map(render_row).collect::<Vec<_>>();
    print!("{}", table::render_rows(&headers, &rows));

    let degenerate = stats.iter().filter(|s| s.is_degenerate()).count();
    info!(
        "Computed statistics for {} group(s) over {} row(s); {} with undefined sd",
        stats.len(),
        input.len(),
        degenerate
    );
    Ok(())
}

fn render_row(stats: &GroupStats) -> Vec<String> {
    let mut row = stats.key.clone();
    row.push(stats.count.to_string());
    row.push(format_stat(stats.mean));
    row.push(format_stat(stats.sd));
    row
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.fract() == 0.0 {
        format_number(value)
    } else {
        format!("{value:.4}")
    }
}
