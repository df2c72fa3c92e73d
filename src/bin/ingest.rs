use std::path::PathBuf;

use anyhow::{Result, bail};

use pitch_forecast::config::{self, ForecastConfig, parse_dirs};
use pitch_forecast::export;
use pitch_forecast::league_stats;
use pitch_forecast::match_repository::sort_by_date;
use pitch_forecast::session::Session;

fn main() -> Result<()> {
    config::init_logging();
    let mut cfg = ForecastConfig::from_env();
    if let Some(raw) = arg_value("--dirs") {
        let dirs = parse_dirs(&raw);
        if !dirs.is_empty() {
            cfg.data_dirs = dirs;
        }
    }
    if has_flag("--parallel") {
        cfg.parallel_load = true;
    }
    let export_path = arg_value("--out").map(PathBuf::from).unwrap_or_else(|| cfg.export_path.clone());
    let xlsx_path = arg_value("--xlsx").map(PathBuf::from);
    let stats_path = arg_value("--stats").map(PathBuf::from);

    let mut session = Session::new(cfg.model);
    let summary = session.load(&cfg);

    println!("Match ingest complete");
    println!("Directories: {}", summary.directories_total);
    println!("Files: {}/{}", summary.files_loaded, summary.files_total);
    println!("Matches: {}", session.matches().len());
    if !summary.errors.is_empty() {
        println!("Errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(8) {
            println!(" - {err}");
        }
    }
    if session.matches().is_empty() {
        bail!("no matches loaded from {:?}", cfg.data_dirs);
    }

    let mut matches = session.matches().to_vec();
    sort_by_date(&mut matches);

    let rows = export::write_csv(&export_path, &matches)?;
    println!("CSV: {} ({rows} rows)", export_path.display());

    if let Some(path) = xlsx_path {
        let baselines = session.train().clone();
        export::write_xlsx(&path, &matches, Some(&baselines))?;
        println!("XLSX: {}", path.display());
    }

    if let Some(path) = stats_path {
        let report = league_stats::build_report(&matches);
        league_stats::save_report(&path, &report)?;
        println!("League stats: {} ({} leagues)", path.display(), report.leagues.len());
        for (league, stats) in &report.leagues {
            println!(
                "  {league}: matches={} goals/match={:.2} corners/match={:.2} yellows/match={:.2}",
                stats.basic_info.total_matches,
                stats.scoring_stats.average_goals_per_match,
                stats.set_piece_stats.average_corners_per_match,
                stats.disciplinary_stats.average_yellow_cards_per_match
            );
        }
    }

    Ok(())
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}

fn arg_value(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
