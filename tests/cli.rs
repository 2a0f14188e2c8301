mod common;

use std::fs;

use assert_cmd::Command;
use common::{ALIAS_HEADER, TestWorkspace, linear_body, read_first_sheet};
use predicates::str::contains;
use revenue_forecast::ingest::ingest;

fn cli() -> Command {
    Command::cargo_bin("revenue-forecast").expect("binary exists")
}

#[test]
fn generate_writes_report_and_prints_path() {
    let ws = TestWorkspace::new();
    let input = ws.write_export("vendas.csv", ALIAS_HEADER, &linear_body(5, 1000.0, 100.0, 600.0, 50.0));
    let output = ws.path().join("report.xlsx");

    cli()
        .args([
            "generate",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("report.xlsx"));

    let (sheet, _) = read_first_sheet(&output);
    assert_eq!(sheet, "Forecast Report");
}

#[test]
fn generate_applies_style_file() {
    let ws = TestWorkspace::new();
    let input = ws.write_export("vendas.csv", ALIAS_HEADER, &linear_body(5, 1000.0, 100.0, 600.0, 50.0));
    let style = ws.write(
        "style.yaml",
        "labels:\n  sheet_name: Relatório IA\n  history: Histórico\n  forecast: Previsão\n",
    );
    let output = ws.path().join("report.xlsx");

    cli()
        .args([
            "generate",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--style",
            style.to_str().unwrap(),
        ])
        .assert()
        .success();

    let (sheet, _) = read_first_sheet(&output);
    assert_eq!(sheet, "Relatório IA");
}

#[test]
fn generate_reports_missing_columns() {
    let ws = TestWorkspace::new();
    let input = ws.write_export(
        "partial.csv",
        "mes_sequencial,faturamento",
        &linear_body(3, 1000.0, 100.0, 600.0, 50.0),
    );

    cli()
        .args(["generate", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("custos_totais, total_vendas"));
}

#[test]
fn generate_reports_missing_input() {
    let ws = TestWorkspace::new();
    let missing = ws.path().join("ghost.xlsx");

    cli()
        .args(["generate", "-i", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Input file not found"));
}

#[test]
fn preview_prints_history_and_forecast_table() {
    let ws = TestWorkspace::new();
    let input = ws.write_export("vendas.csv", ALIAS_HEADER, &linear_body(3, 900.0, 100.0, 550.0, 50.0));

    cli()
        .args(["preview", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Period"))
        .stdout(contains("1300.00"))
        .stdout(contains("Forecast"));
}

#[test]
fn preview_json_lists_every_row() {
    let ws = TestWorkspace::new();
    let input = ws.write_export("vendas.csv", ALIAS_HEADER, &linear_body(3, 900.0, 100.0, 550.0, 50.0));

    let assert = cli()
        .args(["preview", "-i", input.to_str().unwrap(), "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("json");
    let rows = value["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["kind"], "History");
    assert_eq!(rows[5]["kind"], "Forecast");
    assert_eq!(rows[5]["index"], 6.0);
}

#[test]
fn template_round_trips_through_ingest() {
    let ws = TestWorkspace::new();
    let template = ws.path().join("modelo.csv");

    cli()
        .args(["template", "-o", template.to_str().unwrap()])
        .assert()
        .success();

    let mut contents = fs::read_to_string(&template).expect("read template");
    assert_eq!(contents.lines().nth(2), Some(ALIAS_HEADER));
    contents.push_str("1,1000,600,10\n2,1100,650,11\n");
    fs::write(&template, contents).expect("fill template");
    assert_eq!(ingest(&template).expect("ingest").len(), 2);
}

#[test]
fn generate_rejects_unknown_encoding_label() {
    let ws = TestWorkspace::new();
    let input = ws.write_export("vendas.csv", ALIAS_HEADER, &linear_body(3, 900.0, 100.0, 550.0, 50.0));

    cli()
        .args([
            "generate",
            "-i",
            input.to_str().unwrap(),
            "--input-encoding",
            "klingon",
        ])
        .assert()
        .failure()
        .stderr(contains("Unknown encoding 'klingon'"));
    assert!(!ws.path().join("temp").exists());
}
