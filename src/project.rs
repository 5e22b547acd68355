use crate::{
    data::Table,
    error::MockError,
    noise::MOCK_VALUE_COLUMN,
    roles::{ColumnRoles, GroupingVariant},
};

/// Columns kept by a clean projection for the active grouping variant.
///
/// Hour is never a grouping key but still gates its own output column for
/// the region-and-date variant. An absent Date role is left out.
pub fn clean_columns(roles: &ColumnRoles) -> Vec<&str> {
    let mut columns = vec![roles.region1()];
    match roles.variant() {
        GroupingVariant::TwoKeys => {
            columns.extend(roles.region2());
            columns.extend(roles.date());
        }
        GroupingVariant::KeyPlusDate => {
            columns.extend(roles.date());
            columns.extend(roles.hour());
        }
        GroupingVariant::OneKey => columns.extend(roles.date()),
    }
    columns.push(MOCK_VALUE_COLUMN);
    columns
}

/// Restricts a mock table to the clean column set, or hands it back whole.
pub fn project(table: Table, roles: &ColumnRoles, clean: bool) -> Result<Table, MockError> {
    if !clean {
        return Ok(table);
    }
    table.select(&clean_columns(roles))
}
