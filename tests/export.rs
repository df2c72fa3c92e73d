use std::fs;
use std::path::PathBuf;

use pitch_forecast::export::{read_csv, write_csv, write_xlsx};
use pitch_forecast::league_stats::{build_report, save_report};
use pitch_forecast::match_repository::{LoadOptions, load};
use pitch_forecast::train_baselines;

fn fixture_dir(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("pitch_forecast_export_{}_{name}", std::process::id()));
    path
}

#[test]
fn csv_export_reloads_identically() {
    let matches = load(&[fixture_dir("matches")], LoadOptions::default()).matches;
    assert_eq!(matches.len(), 4);

    let path = temp_path("matches.csv");
    let rows = write_csv(&path, &matches).expect("csv written");
    assert_eq!(rows, 4);

    let bytes = fs::read(&path).expect("csv readable");
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes[3..].to_vec()).expect("utf-8 body");
    assert!(text.starts_with("match_id,league,date,home_team,away_team,home_goals"));
    assert!(text.contains("山东泰山"));

    let reloaded = read_csv(&path).expect("csv reloads");
    assert_eq!(reloaded, matches);
    let _ = fs::remove_file(&path);
}

#[test]
fn xlsx_export_writes_workbook() {
    let matches = load(&[fixture_dir("matches")], LoadOptions::default()).matches;
    let baselines = train_baselines(&matches);
    let path = temp_path("matches.xlsx");
    write_xlsx(&path, &matches, Some(&baselines)).expect("workbook written");

    let bytes = fs::read(&path).expect("workbook readable");
    // xlsx is a zip container
    assert!(bytes.starts_with(b"PK"));
    let _ = fs::remove_file(&path);
}

#[test]
fn league_stats_report_is_saved() {
    let matches = load(&[fixture_dir("matches")], LoadOptions::default()).matches;
    let report = build_report(&matches);
    assert_eq!(report.leagues.len(), 1);
    let csl = &report.leagues["中超"];
    assert_eq!(csl.basic_info.total_matches, 4);
    assert_eq!(csl.basic_info.date_range.earliest, "2023-04-15");
    assert_eq!(csl.basic_info.date_range.latest, "2023-05-06");
    // 2-1, 1-1, 0-3, 1-2
    assert_eq!(csl.scoring_stats.total_goals, 11);
    assert_eq!(csl.scoring_stats.home_win_rate, 25.0);
    assert_eq!(csl.scoring_stats.away_win_rate, 50.0);
    assert_eq!(csl.scoring_stats.draw_rate, 25.0);

    let path = temp_path("league_stats.json");
    save_report(&path, &report).expect("report saved");
    let raw = fs::read_to_string(&path).expect("report readable");
    assert!(raw.contains("generated_at"));
    assert!(raw.contains("\"中超\""));
    let _ = fs::remove_file(&path);
}
