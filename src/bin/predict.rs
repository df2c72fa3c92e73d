use std::path::PathBuf;

use anyhow::{Context, Result};

use pitch_forecast::config::{self, ForecastConfig, parse_dirs};
use pitch_forecast::league_baseline::DEFAULT_LEAGUE;
use pitch_forecast::session::Session;

fn main() -> Result<()> {
    config::init_logging();
    let home = arg_value("--home").context("missing --home=<team>")?;
    let away = arg_value("--away").context("missing --away=<team>")?;
    let league = arg_value("--league").unwrap_or_else(|| DEFAULT_LEAGUE.to_string());

    let mut cfg = ForecastConfig::from_env();
    if let Some(raw) = arg_value("--dirs") {
        let dirs = parse_dirs(&raw);
        if !dirs.is_empty() {
            cfg.data_dirs = dirs;
        }
    }
    let baselines_path = arg_value("--baselines")
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.baselines_path.clone());

    let mut session = Session::new(cfg.model);
    let summary = session.load(&cfg);
    if baselines_path.exists() {
        session.load_baselines(&baselines_path)?;
    } else {
        session.train();
    }

    let home_form = session.team_form(&home);
    let away_form = session.team_form(&away);
    let baseline = session.baseline_for(&league);
    let result = session.predict_match(&home, &away, &league);

    println!("{home} vs {away} ({league})");
    println!(
        "History: {} matches from {}/{} files",
        session.matches().len(),
        summary.files_loaded,
        summary.files_total
    );
    println!(
        "Form: {home} {} matches{}, {away} {} matches{}",
        home_form.stats().matches,
        if home_form.is_default() { " (default profile)" } else { "" },
        away_form.stats().matches,
        if away_form.is_default() { " (default profile)" } else { "" },
    );
    println!(
        "Baseline: {} goals={:.2} corners={:.2} yellows={:.2} home_adv={:.3}",
        baseline.league,
        baseline.goal_baseline,
        baseline.corner_baseline,
        baseline.yellow_card_baseline,
        baseline.home_advantage
    );
    println!("{result}");

    if has_flag("--json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
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
