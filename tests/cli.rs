mod common;

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

use common::TestWorkspace;

const COUNTS: &str = "pcod,date,hour,value\n\
A,2020-01-01,0,10\n\
A,2020-01-01,1,20\n\
B,2020-01-01,0,5\n";

fn count_mock() -> Command {
    Command::cargo_bin("count-mock").expect("binary exists")
}

#[test]
fn mock_with_zero_sigma_keeps_counts_and_blanks_single_row_groups() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("counts.csv", COUNTS);

    count_mock()
        .args([
            "mock",
            "-i",
            input.to_str().unwrap(),
            "--mu",
            "0",
            "--sigma",
            "0",
            "--seed",
            "3",
        ])
        .assert()
        .success()
        .stdout(contains("pcod,date,hour,mock_value"))
        .stdout(contains("A,2020-01-01,0,10"))
        .stdout(contains("A,2020-01-01,1,20"))
        .stdout(contains("B,2020-01-01,0,\n"));
}

#[test]
fn mock_writes_unclean_output_to_file() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("counts.csv", COUNTS);
    let output = workspace.path().join("mock.csv");

    count_mock()
        .args([
            "mock",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--hour",
            "none",
            "--mu",
            "0.05",
            "--sigma",
            "0.01",
            "--seed",
            "11",
            "--unclean",
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read output");
    let header = contents.lines().next().expect("header line");
    assert_eq!(header, "pcod,mean,sd,date,hour,value,fraction,mock_value");
    assert_eq!(contents.lines().count(), 4);
}

#[test]
fn mock_output_is_reproducible_with_seed() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("counts.csv", COUNTS);

    let run = || {
        count_mock()
            .args([
                "mock",
                "-i",
                input.to_str().unwrap(),
                "--mu",
                "0.1",
                "--sigma",
                "0.4",
                "--seed",
                "99",
            ])
            .output()
            .expect("run")
            .stdout
    };

    assert_eq!(run(), run());
}

#[test]
fn mock_with_roles_file_and_tsv_input() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "trips.tsv",
        "pcod_from\tpcod_to\tdate\tvalue\nA\tB\t2020-01-01\t4\nA\tB\t2020-01-02\t8\n",
    );
    let roles = workspace.write(
        "roles.json",
        r#"{"date": "date", "region1": "pcod_from", "region2": "pcod_to", "count": "value"}"#,
    );

    count_mock()
        .args([
            "mock",
            "-i",
            input.to_str().unwrap(),
            "--roles",
            roles.to_str().unwrap(),
            "--mu",
            "0",
            "--sigma",
            "0",
        ])
        .assert()
        .success()
        .stdout(contains("pcod_from\tpcod_to\tdate\tmock_value"))
        .stdout(contains("A\tB\t2020-01-02\t8"));
}

#[test]
fn mock_reports_non_numeric_counts() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("counts.csv", "pcod,date,hour,value\nA,2020-01-01,0,many\n");

    count_mock()
        .args([
            "mock",
            "-i",
            input.to_str().unwrap(),
            "--mu",
            "0",
            "--sigma",
            "1",
        ])
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("'many' is not numeric")));
}

#[test]
fn mock_warns_about_single_row_groups() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("counts.csv", COUNTS);

    count_mock()
        .env_remove("RUST_LOG")
        .args([
            "mock",
            "-i",
            input.to_str().unwrap(),
            "--mu",
            "0",
            "--sigma",
            "0",
        ])
        .assert()
        .success()
        .stderr(contains("1 of 2 group(s) have fewer than two 'value' values"));
}

#[test]
fn mock_rejects_negative_sigma_as_invalid_noise() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("counts.csv", COUNTS);

    count_mock()
        .args([
            "mock",
            "-i",
            input.to_str().unwrap(),
            "--mu",
            "0",
            "--sigma",
            "-0.1",
        ])
        .assert()
        .failure()
        .stderr(contains("sigma must be finite and non-negative"));
}

#[test]
fn mock_rejects_input_with_generated_column_names() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "counts.csv",
        "pcod,date,hour,value,mock_value\nA,2020-01-01,0,10,999\nA,2020-01-01,1,20,999\n",
    );

    count_mock()
        .args([
            "mock",
            "-i",
            input.to_str().unwrap(),
            "--mu",
            "0",
            "--sigma",
            "0",
        ])
        .assert()
        .failure()
        .stderr(contains("'mock_value' clashes with a generated column"))
        .stdout(contains("999").not());
}

#[test]
fn mock_rejects_absent_region1() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("counts.csv", COUNTS);

    count_mock()
        .args([
            "mock",
            "-i",
            input.to_str().unwrap(),
            "--region1",
            "none",
            "--mu",
            "0",
            "--sigma",
            "1",
        ])
        .assert()
        .failure()
        .stderr(contains("Region1 role must name a column"));
}

#[test]
fn groups_prints_statistics_per_group() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("counts.csv", COUNTS);

    count_mock()
        .args(["groups", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("pcod  date        count  mean  sd"))
        .stdout(contains("A     2020-01-01  2      15    7.0711"))
        .stdout(contains("B     2020-01-01  1      5     NaN"));
}

#[test]
fn preview_limits_rows() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("counts.csv", COUNTS);

    count_mock()
        .args(["preview", "-i", input.to_str().unwrap(), "--rows", "1"])
        .assert()
        .success()
        .stdout(contains("A     2020-01-01  0     10"))
        .stdout(contains("B     2020-01-01").not());
}
