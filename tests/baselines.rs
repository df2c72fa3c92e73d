use std::fs;
use std::path::PathBuf;

use pitch_forecast::league_baseline::{
    BaselineMap, RED_CARD_PENALTY, load_baselines, resolve_baseline, save_baselines, train_baselines,
};
use pitch_forecast::league_stats::build_report;
use pitch_forecast::match_record::MatchRecord;
use pitch_forecast::match_repository::parse_match_json;

fn league_match(league: &str, idx: u32, goals: (u32, u32)) -> MatchRecord {
    MatchRecord {
        match_id: format!("{league}-{idx}"),
        league: league.to_string(),
        date: format!("2023-03-{:02}", idx + 1),
        home_team: format!("H{idx}"),
        away_team: format!("A{idx}"),
        home_goals: goals.0,
        away_goals: goals.1,
        home_corners: 6,
        away_corners: 4,
        home_yellow_cards: 2,
        away_yellow_cards: 3,
        home_fouls: 10,
        away_fouls: 15,
        ..MatchRecord::default()
    }
}

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("pitch_forecast_{}_{name}", std::process::id()));
    path
}

#[test]
fn trains_leagues_with_enough_matches_only() {
    let mut records: Vec<MatchRecord> = (0..12).map(|i| league_match("英超", i, (2, 1))).collect();
    records.extend((0..9).map(|i| league_match("法甲", i, (1, 1))));

    let trained = train_baselines(&records);
    assert_eq!(trained.len(), 1);
    assert!(!trained.contains_key("法甲"));

    let epl = &trained["英超"];
    assert_eq!(epl.league, "英超");
    assert_eq!(epl.sample_size, 12);
    assert!((epl.goal_baseline - 3.0).abs() < 1e-9);
    assert!((epl.corner_baseline - 10.0).abs() < 1e-9);
    assert!((epl.yellow_card_baseline - 5.0).abs() < 1e-9);
    assert!((epl.home_advantage - 2.0).abs() < 1e-6);
    assert!((epl.foul_to_yellow - 0.2).abs() < 1e-6);
    assert_eq!(epl.red_card_penalty, RED_CARD_PENALTY);
}

#[test]
fn goalless_away_sides_do_not_divide_by_zero() {
    let records: Vec<MatchRecord> = (0..10).map(|i| league_match("德甲", i, (1, 0))).collect();
    let trained = train_baselines(&records);
    let b = &trained["德甲"];
    assert!(b.home_advantage.is_finite());
    assert!(b.home_advantage > 1e6);
}

#[test]
fn resolution_prefers_trained_then_builtin() {
    let records: Vec<MatchRecord> = (0..10).map(|i| league_match("西甲", i, (3, 1))).collect();
    let trained = train_baselines(&records);

    assert_eq!(resolve_baseline("西甲", &trained).sample_size, 10);
    assert_eq!(resolve_baseline("意甲", &trained).goal_baseline, 2.5);
    assert_eq!(resolve_baseline("荷甲", &trained).league, "中超");
}

#[test]
fn baselines_round_trip_through_json() {
    let mut records: Vec<MatchRecord> = (0..11).map(|i| league_match("中超", i, (i % 4, i % 3))).collect();
    records.extend((0..13).map(|i| league_match("意甲", i, (i % 2, 1))));
    let trained = train_baselines(&records);
    assert_eq!(trained.len(), 2);

    let path = temp_path("baselines.json");
    save_baselines(&path, &trained).expect("save should succeed");
    let raw = fs::read_to_string(&path).expect("saved file readable");
    assert!(raw.contains("\"中超\""), "keys are stored unescaped");
    assert!(!raw.contains("\"league\""), "league lives in the key only");

    let loaded: BaselineMap = load_baselines(&path).expect("load should succeed");
    assert_eq!(loaded, trained);
    let _ = fs::remove_file(&path);
}

#[test]
fn loading_missing_file_reports_path() {
    let err = load_baselines(&temp_path("missing.json")).expect_err("file does not exist");
    assert!(format!("{err:#}").contains("missing.json"));
}

#[test]
fn oversized_counts_do_not_overflow_training() {
    let json = (0..10)
        .map(|i| {
            format!(
                r#"{{"比赛id":"{i}","联赛名":"中超","日期":"2023-07-{:02}","主队":"H","客队":"A","赛果":"1-0","角球":"4000000000/4000000000","犯规":"4000000000/4000000000","黄牌":"3/2"}}"#,
                i + 1
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    let records = parse_match_json(&format!("[{json}]")).expect("fixture json parses");
    assert_eq!(records[0].home_corners, 4_000_000_000);
    assert_eq!(records[0].total_corners(), 8_000_000_000);

    let trained = train_baselines(&records);
    let b = &trained["中超"];
    assert_eq!(b.corner_baseline, 8.0e9);
    assert!(b.foul_to_yellow > 0.0 && b.foul_to_yellow < 1e-8);

    let report = build_report(&records);
    assert_eq!(report.leagues["中超"].set_piece_stats.total_corners, 80_000_000_000);
}
