use anyhow::Result;

use pitch_forecast::config::{self, ForecastConfig, parse_dirs};
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
    if let Some(k) = arg_value("--k").and_then(|v| v.parse::<usize>().ok()) {
        cfg.k_folds = k;
    }
    if let Some(seed) = arg_value("--seed").and_then(|v| v.parse::<u64>().ok()) {
        cfg.seed = Some(seed);
    }

    let mut session = Session::new(cfg.model);
    let summary = session.load(&cfg);
    println!(
        "Loaded {} matches from {}/{} files",
        session.matches().len(),
        summary.files_loaded,
        summary.files_total
    );

    let report = session.cross_validate(cfg.k_folds, cfg.seed)?;

    println!("Cross validation ({} folds)", report.k_folds);
    for fold in &report.folds {
        println!(
            "fold {}: train={} test={} leagues={} mae={:.3} rmse={:.3} direction={:.1}%",
            fold.fold,
            fold.train_size,
            fold.test_size,
            fold.leagues_trained,
            fold.metrics.mae,
            fold.metrics.rmse,
            fold.metrics.direction_accuracy * 100.0
        );
    }
    println!("MAE:  {:.3} ± {:.3}", report.mean_mae, report.std_mae);
    println!("RMSE: {:.3}", report.mean_rmse);
    println!("Direction accuracy: {:.1}%", report.mean_direction_accuracy * 100.0);

    if let Some(path) = arg_value("--report") {
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        println!("Report: {path}");
    }
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
