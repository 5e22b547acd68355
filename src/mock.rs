//! Mock dataset pipeline and the `mock` command.
//!
//! [`MockDataset`] loads (or is handed) a count table, aggregates it once,
//! and then produces any number of independent mock tables from the cached
//! aggregate. Each call to [`MockDataset::create_mock`] draws fresh noise.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    aggregate,
    cli::{MockArgs, RoleArgs},
    data::Table,
    error::MockError,
    io_utils,
    noise::{self, FractionSource},
    project,
    roles::{ColumnRoles, Role, RoleMapping},
    table,
};

const ABSENT_ROLE: &str = "none";

#[derive(Debug, Clone)]
pub struct MockDataset {
    path: PathBuf,
    outputs_path: PathBuf,
    roles: ColumnRoles,
    aggregated: Table,
}

impl MockDataset {
    /// Reads `path` and aggregates it. `roles` falls back to
    /// [`ColumnRoles::default`], `outputs_path` to `<path>/out`.
    pub fn open(
        path: &Path,
        outputs_path: Option<PathBuf>,
        roles: Option<ColumnRoles>,
        delimiter: u8,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        let table = io_utils::read_table(path, delimiter, encoding, None)
            .with_context(|| format!("Loading {path:?}"))?;
        let dataset = Self::from_table(path, table, outputs_path, roles)
            .with_context(|| format!("Aggregating {path:?}"))?;
        Ok(dataset)
    }

    pub fn from_table(
        path: impl Into<PathBuf>,
        table: Table,
        outputs_path: Option<PathBuf>,
        roles: Option<ColumnRoles>,
    ) -> Result<Self, MockError> {
        let path = path.into();
        let outputs_path = outputs_path.unwrap_or_else(|| default_outputs_path(&path));
        let roles = roles.unwrap_or_default();
        let aggregated = aggregate::aggregate(&table, &roles)?;
        Ok(Self {
            path,
            outputs_path,
            roles,
            aggregated,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn outputs_path(&self) -> &Path {
        &self.outputs_path
    }

    pub fn roles(&self) -> &ColumnRoles {
        &self.roles
    }

    pub fn aggregated(&self) -> &Table {
        &self.aggregated
    }

    /// Noise drawn from Normal(`mu`, `sigma`), then projected.
    pub fn create_mock<R>(
        &self,
        mu: f64,
        sigma: f64,
        clean: bool,
        rng: &mut R,
    ) -> Result<Table, MockError>
    where
        R: Rng + ?Sized,
    {
        let mut source = noise::NormalFractions::new(mu, sigma, rng)?;
        self.create_mock_with(&mut source, clean)
    }

    pub fn create_mock_with<S>(&self, source: &mut S, clean: bool) -> Result<Table, MockError>
    where
        S: FractionSource + ?Sized,
    {
        let noised = noise::inject(self.aggregated.clone(), self.roles.count(), source)?;
        project::project(noised, &self.roles, clean)
    }
}

pub fn default_outputs_path(path: &Path) -> PathBuf {
    path.join("out")
}

/// Builds the role config from an optional roles file overlaid with the
/// per-role flags. Without either, the default preset applies.
pub fn resolve_roles(args: &RoleArgs) -> Result<ColumnRoles> {
    let overrides = [
        (Role::Date, &args.date),
        (Role::Hour, &args.hour),
        (Role::Region1, &args.region1),
        (Role::Region2, &args.region2),
        (Role::Count, &args.count),
    ];
    if args.roles.is_none() && overrides.iter().all(|(_, value)| value.is_none()) {
        return Ok(ColumnRoles::default());
    }

    let mut mapping = match &args.roles {
        Some(path) => RoleMapping::load(path)?,
        None => RoleMapping::from(ColumnRoles::default()),
    };
    for (role, value) in overrides {
        if let Some(value) = value {
            *mapping.slot_mut(role) = if value.trim().eq_ignore_ascii_case(ABSENT_ROLE) {
                None
            } else {
                Some(value.clone())
            };
        }
    }
    let roles = ColumnRoles::from_mapping(mapping).context("Resolving column roles")?;
    Ok(roles)
}

pub fn execute(args: &MockArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let roles = resolve_roles(&args.roles)?;
    debug!("Resolved roles {:?} ({:?})", roles, roles.variant());

    let dataset = MockDataset::open(
        &args.input,
        args.outputs_path.clone(),
        Some(roles),
        delimiter,
        encoding,
    )?;
    info!(
        "Aggregated {} row(s) from {:?}; outputs path {:?}",
        dataset.aggregated().len(),
        dataset.path(),
        dataset.outputs_path()
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mock = dataset
        .create_mock(args.mu, args.sigma, !args.unclean, &mut rng)
        .context("Generating mock values")?;

    if args.table {
        table::print_table(&mock);
    } else {
        let output_delimiter = io_utils::resolve_output_delimiter(
            args.output.as_deref(),
            args.output_delimiter,
            delimiter,
        );
        io_utils::write_table(args.output.as_deref(), &mock, output_delimiter)?;
    }

    let destination = args
        .output
        .as_ref()
        .filter(|_| !args.table)
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    info!(
        "Wrote {} mock row(s) with {} column(s) -> {}",
        mock.len(),
        mock.headers.len(),
        destination
    );
    Ok(())
}
