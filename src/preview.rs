use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, io_utils, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let preview = io_utils::read_table(&args.input, delimiter, encoding, Some(args.rows))?;

    table::print_table(&preview);
    info!("Displayed {} row(s) from {:?}", preview.len(), args.input);
    Ok(())
}
