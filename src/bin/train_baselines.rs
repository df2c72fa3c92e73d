use std::path::PathBuf;

use anyhow::{Result, bail};

use pitch_forecast::config::{self, ForecastConfig, parse_dirs};
use pitch_forecast::league_baseline::MIN_LEAGUE_SAMPLES;
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
    let out = arg_value("--out").map(PathBuf::from).unwrap_or_else(|| cfg.baselines_path.clone());

    let mut session = Session::new(cfg.model);
    let summary = session.load(&cfg);
    if session.matches().is_empty() {
        bail!(
            "no matches loaded ({} errors across {} files)",
            summary.errors.len(),
            summary.files_total
        );
    }

    let loaded = session.matches().len();
    let trained = session.train();
    println!("League baseline training complete");
    println!("Matches: {loaded}");
    println!(
        "Matches in trained leagues: {}",
        trained.values().map(|b| b.sample_size).sum::<usize>()
    );
    println!("Leagues trained: {} (min {MIN_LEAGUE_SAMPLES} matches each)", trained.len());
    for (league, b) in trained {
        println!(
            "  {league}: n={} goals={:.2} corners={:.2} yellows={:.2} home_adv={:.3} foul_to_yellow={:.3}",
            b.sample_size,
            b.goal_baseline,
            b.corner_baseline,
            b.yellow_card_baseline,
            b.home_advantage,
            b.foul_to_yellow
        );
    }

    session.save_baselines(&out)?;
    println!("Saved: {}", out.display());
    Ok(())
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
