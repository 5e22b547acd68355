pub mod aggregate;
pub mod cli;
pub mod data;
pub mod error;
pub mod groups;
pub mod io_utils;
pub mod mock;
pub mod noise;
pub mod preview;
pub mod project;
pub mod roles;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::{
    data::{Table, Value},
    error::MockError,
    mock::MockDataset,
    roles::{ColumnRoles, GroupingVariant, RoleMapping},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("count_mock", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Mock(args) => mock::execute(&args),
        Commands::Groups(args) => groups::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}
