mod common;

use common::{daily_roles, hourly_roles, od_roles, roles, table};
use count_mock::{
    ColumnRoles, MockError, Table,
    aggregate::aggregate,
    noise::{FixedFractions, inject},
    project::{clean_columns, project},
};

fn mocked(input: &Table, roles: &ColumnRoles) -> Table {
    let joined = aggregate(input, roles).expect("aggregate");
    inject(joined, roles.count(), &mut FixedFractions::constant(0.0)).expect("inject")
}

#[test]
fn clean_projection_for_region_and_date_includes_hour() {
    let input = table(
        &["pcod", "date", "hour", "value", "extra"],
        &[&["A", "d1", "0", "1", "x"], &["A", "d1", "1", "3", "y"]],
    );
    let roles = hourly_roles();

    let out = project(mocked(&input, &roles), &roles, true).expect("project");

    assert_eq!(out.headers, vec!["pcod", "date", "hour", "mock_value"]);
    assert_eq!(out.len(), 2);
}

#[test]
fn clean_projection_for_region_only_includes_date() {
    let input = table(
        &["pcod", "date", "value"],
        &[&["A", "d1", "1"], &["A", "d2", "3"]],
    );
    let roles = daily_roles();

    let out = project(mocked(&input, &roles), &roles, true).expect("project");

    assert_eq!(out.headers, vec!["pcod", "date", "mock_value"]);
}

#[test]
fn clean_projection_for_two_regions_includes_both_and_date() {
    let input = table(
        &["pcod_from", "pcod_to", "date", "value"],
        &[&["A", "B", "d1", "1"], &["A", "B", "d2", "3"]],
    );
    let roles = od_roles();

    let out = project(mocked(&input, &roles), &roles, true).expect("project");

    assert_eq!(out.headers, vec!["pcod_from", "pcod_to", "date", "mock_value"]);
}

#[test]
fn two_region_projection_drops_hour_even_when_configured() {
    let roles = roles(
        Some("date"),
        Some("hour"),
        "pcod_from",
        Some("pcod_to"),
        "value",
    );
    assert_eq!(
        clean_columns(&roles),
        vec!["pcod_from", "pcod_to", "date", "mock_value"]
    );
}

#[test]
fn absent_date_is_left_out_of_clean_projection() {
    let roles = roles(None, None, "pcod", None, "value");
    assert_eq!(clean_columns(&roles), vec!["pcod", "mock_value"]);
}

#[test]
fn unclean_projection_returns_every_working_column() {
    let input = table(
        &["pcod", "date", "value", "extra"],
        &[&["A", "d1", "1", "x"], &["A", "d2", "3", "y"]],
    );
    let roles = daily_roles();

    let out = project(mocked(&input, &roles), &roles, false).expect("project");

    assert_eq!(
        out.headers,
        vec!["pcod", "mean", "sd", "date", "value", "extra", "fraction", "mock_value"]
    );
}

#[test]
fn clean_projection_requires_mock_values() {
    let input = table(&["pcod", "date", "value"], &[&["A", "d1", "1"]]);
    let err = project(input, &daily_roles(), true).expect_err("no mock_value");
    assert_eq!(err, MockError::MissingColumn("mock_value".to_string()));
}
