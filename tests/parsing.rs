use std::path::PathBuf;

use pitch_forecast::match_repository::{LoadOptions, decode_text, load, load_file, parse_match_json, TextEncoding};
use pitch_forecast::record_parser::{parse_divided, parse_percentage, parse_score};

fn fixture_dir(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn divided_pairs_parse_literally() {
    for (a, b) in [(0u32, 0u32), (7, 5), (14, 9), (3, 21)] {
        assert_eq!(parse_divided(Some(&format!("{a}/{b}"))), (a, b));
    }
    assert_eq!(parse_divided(Some("-")), (0, 0));
    assert_eq!(parse_divided(Some("")), (0, 0));
    assert_eq!(parse_divided(None), (0, 0));
    assert_eq!(parse_divided(Some("11/-")), (11, 0));
    assert_eq!(parse_divided(Some("-/4")), (0, 4));
}

#[test]
fn single_percentage_is_completed() {
    assert_eq!(parse_percentage(Some("48%")), (48.0, 52.0));
    assert_eq!(parse_percentage(Some("55%/45%")), (55.0, 45.0));
    assert_eq!(parse_percentage(Some("80%/76%")), (80.0, 76.0));
    assert_eq!(parse_percentage(Some("n/a")), (0.0, 0.0));
    assert_eq!(parse_percentage(None), (0.0, 0.0));
}

#[test]
fn percentages_are_capped_at_one_hundred() {
    assert_eq!(parse_percentage(Some("150%")), (100.0, 0.0));
    assert_eq!(parse_percentage(Some("120%/30%")), (100.0, 30.0));
    assert_eq!(parse_percentage(Some("100%/100.5%")), (100.0, 100.0));
}

#[test]
fn scores_accept_labels() {
    assert_eq!(parse_score(Some("2-1")), (2, 1));
    assert_eq!(parse_score(Some("比分：1-1")), (1, 1));
    assert_eq!(parse_score(Some("Score: 0 - 3")), (0, 3));
    assert_eq!(parse_score(Some("-")), (0, 0));
}

#[test]
fn match_json_accepts_object_array_and_null() {
    let one = parse_match_json(r#"{"主队":"A","客队":"B","赛果":"3-0"}"#).expect("object parses");
    assert_eq!(one.len(), 1);
    assert_eq!((one[0].home_goals, one[0].away_goals), (3, 0));

    let many = parse_match_json(r#"[{"home":"A","away":"B"},{"home":"C","away":"D"}, 5]"#)
        .expect("array parses");
    assert_eq!(many.len(), 2);
    assert_eq!(many[1].home_team, "C");

    assert!(parse_match_json("null").expect("null parses").is_empty());
    assert!(parse_match_json("{not json").is_err());
}

#[test]
fn canonicalizes_utf8_fixture() {
    let rows = load_file(&fixture_dir("matches").join("2023_round01.json")).expect("fixture loads");
    assert_eq!(rows.len(), 3);

    let first = &rows[0];
    assert_eq!(first.match_id, "1001");
    assert_eq!(first.league, "中超");
    assert_eq!((first.home_goals, first.away_goals), (2, 1));
    assert_eq!((first.home_shots, first.away_shots), (14, 9));
    assert_eq!((first.home_pass_success, first.away_pass_success), (82.0, 18.0));
    assert_eq!((first.home_red_cards, first.away_red_cards), (0, 1));

    let second = &rows[1];
    assert_eq!((second.home_shots, second.away_shots), (11, 0));
    assert_eq!((second.home_possession, second.away_possession), (48.0, 52.0));
    assert_eq!((second.home_fouls, second.away_fouls), (0, 0));

    // numeric ids are stringified
    assert_eq!(rows[2].match_id, "1003");
}

#[test]
fn gbk_bytes_are_decoded() {
    let (text, enc) = decode_text(&[0xD6, 0xD0, 0xB3, 0xAC]).expect("gbk decodes");
    assert_eq!(text, "中超");
    assert_eq!(enc, TextEncoding::Gbk);
    assert!(decode_text(&[0xFF, 0xFF]).is_err());
}

#[test]
fn directory_load_skips_broken_files() {
    let dirs = vec![fixture_dir("matches"), fixture_dir("does_not_exist")];
    let summary = load(&dirs, LoadOptions::default());

    assert_eq!(summary.directories_total, 2);
    assert_eq!(summary.files_total, 3);
    assert_eq!(summary.files_loaded, 2);
    assert_eq!(summary.matches.len(), 4);
    assert_eq!(summary.errors.len(), 2);
    assert!(summary.is_partial());
    assert!(summary.errors.iter().any(|e| e.contains("2023_round03_broken.json")));

    let gbk = &summary.matches[3];
    assert_eq!(gbk.home_team, "成都蓉城");
    assert_eq!(gbk.away_team, "山东泰山");
    assert_eq!((gbk.home_goals, gbk.away_goals), (1, 2));
}

#[test]
fn parallel_load_keeps_order() {
    let dirs = vec![fixture_dir("matches")];
    let sequential = load(&dirs, LoadOptions { parallel: false });
    let parallel = load(&dirs, LoadOptions { parallel: true });
    assert_eq!(sequential.matches, parallel.matches);
    assert_eq!(sequential.errors, parallel.errors);
}
