//! Column role configuration.
//!
//! Five fixed roles map onto concrete input columns. Region1 and Count are
//! mandatory; Date, Hour and Region2 may be absent. Which optional roles are
//! present decides the [`GroupingVariant`], which both the aggregation and
//! the output projection consume.

use std::{fmt, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::MockError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Date,
    Hour,
    Region1,
    Region2,
    Count,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Date => "Date",
            Role::Hour => "Hour",
            Role::Region1 => "Region1",
            Role::Region2 => "Region2",
            Role::Count => "Count",
        };
        f.write_str(name)
    }
}

/// Which key-set partitions the input rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingVariant {
    /// Region1 only.
    OneKey,
    /// Region1 and Date; selected by the presence of an Hour column.
    KeyPlusDate,
    /// Region1 and Region2.
    TwoKeys,
}

/// Loose role mapping as written by hand or read from a roles file. Every
/// slot is optional here; [`ColumnRoles::from_mapping`] enforces the rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleMapping {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub hour: Option<String>,
    #[serde(default)]
    pub region1: Option<String>,
    #[serde(default)]
    pub region2: Option<String>,
    #[serde(default)]
    pub count: Option<String>,
}

impl RoleMapping {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening roles file {path:?}"))?;
        let reader = BufReader::new(file);
        let mapping = serde_json::from_reader(reader).context("Parsing roles JSON")?;
        Ok(mapping)
    }

    pub fn slot_mut(&mut self, role: Role) -> &mut Option<String> {
        match role {
            Role::Date => &mut self.date,
            Role::Hour => &mut self.hour,
            Role::Region1 => &mut self.region1,
            Role::Region2 => &mut self.region2,
            Role::Count => &mut self.count,
        }
    }
}

impl From<ColumnRoles> for RoleMapping {
    fn from(roles: ColumnRoles) -> Self {
        Self {
            date: roles.date,
            hour: roles.hour,
            region1: Some(roles.region1),
            region2: roles.region2,
            count: Some(roles.count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoleMapping", into = "RoleMapping")]
pub struct ColumnRoles {
    date: Option<String>,
    hour: Option<String>,
    region1: String,
    region2: Option<String>,
    count: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            date: Some("date".to_string()),
            hour: Some("hour".to_string()),
            region1: "pcod".to_string(),
            region2: None,
            count: "value".to_string(),
        }
    }
}

impl TryFrom<RoleMapping> for ColumnRoles {
    type Error = MockError;

    fn try_from(mapping: RoleMapping) -> Result<Self, Self::Error> {
        Self::from_mapping(mapping)
    }
}

impl ColumnRoles {
    pub fn new(
        date: Option<&str>,
        hour: Option<&str>,
        region1: &str,
        region2: Option<&str>,
        count: &str,
    ) -> Result<Self, MockError> {
        Self::from_mapping(RoleMapping {
            date: date.map(str::to_string),
            hour: hour.map(str::to_string),
            region1: Some(region1.to_string()),
            region2: region2.map(str::to_string),
            count: Some(count.to_string()),
        })
    }

    pub fn from_mapping(mapping: RoleMapping) -> Result<Self, MockError> {
        let region1 = normalize(mapping.region1).ok_or_else(|| {
            MockError::Configuration("Region1 role must name a column".to_string())
        })?;
        let count = normalize(mapping.count).ok_or_else(|| {
            MockError::Configuration("Count role must name a column".to_string())
        })?;
        let roles = Self {
            date: normalize(mapping.date),
            hour: normalize(mapping.hour),
            region1,
            region2: normalize(mapping.region2),
            count,
        };
        if roles.variant() == GroupingVariant::KeyPlusDate && roles.date.is_none() {
            return Err(MockError::Configuration(
                "Hour role groups by Region1 and Date, so a Date column is required".to_string(),
            ));
        }
        Ok(roles)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mapping = RoleMapping::load(path)?;
        Self::from_mapping(mapping).with_context(|| format!("Validating roles in {path:?}"))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating roles file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing roles JSON")
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn hour(&self) -> Option<&str> {
        self.hour.as_deref()
    }

    pub fn region1(&self) -> &str {
        &self.region1
    }

    pub fn region2(&self) -> Option<&str> {
        self.region2.as_deref()
    }

    pub fn count(&self) -> &str {
        &self.count
    }

    pub fn variant(&self) -> GroupingVariant {
        if self.region2.is_some() {
            GroupingVariant::TwoKeys
        } else if self.hour.is_some() {
            GroupingVariant::KeyPlusDate
        } else {
            GroupingVariant::OneKey
        }
    }

    /// Key columns of the active variant, in key order.
    pub fn group_columns(&self) -> Vec<&str> {
        let mut columns = vec![self.region1.as_str()];
        match self.variant() {
            GroupingVariant::TwoKeys => columns.extend(self.region2()),
            GroupingVariant::KeyPlusDate => columns.extend(self.date()),
            GroupingVariant::OneKey => {}
        }
        columns
    }

    /// Every configured role with its column, in role order.
    pub fn required_columns(&self) -> Vec<(Role, &str)> {
        [
            (Role::Date, self.date()),
            (Role::Hour, self.hour()),
            (Role::Region1, Some(self.region1())),
            (Role::Region2, self.region2()),
            (Role::Count, Some(self.count())),
        ]
        .into_iter()
        .filter_map(|(role, column)| column.map(|c| (role, c)))
        .collect()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
