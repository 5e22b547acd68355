#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

use count_mock::{ColumnRoles, Table};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Builds a text table the way the CSV reader would.
pub fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
    Table::from_records(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect::<Vec<_>>(),
    )
}

pub fn roles(
    date: Option<&str>,
    hour: Option<&str>,
    region1: &str,
    region2: Option<&str>,
    count: &str,
) -> ColumnRoles {
    ColumnRoles::new(date, hour, region1, region2, count).expect("valid roles")
}

/// Region1 + Date + Hour + Count, grouped by (pcod, date).
pub fn hourly_roles() -> ColumnRoles {
    roles(Some("date"), Some("hour"), "pcod", None, "value")
}

/// Region1 + Date + Count, grouped by pcod alone.
pub fn daily_roles() -> ColumnRoles {
    roles(Some("date"), None, "pcod", None, "value")
}

/// Origin/destination counts, grouped by (pcod_from, pcod_to).
pub fn od_roles() -> ColumnRoles {
    roles(Some("date"), None, "pcod_from", Some("pcod_to"), "value")
}
