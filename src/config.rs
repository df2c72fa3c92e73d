use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::predictor::PredictionLimits;
use crate::team_form::{DEFAULT_MIN_MATCHES, DEFAULT_WINDOW};

const DEFAULT_DATA_DIRS: &[&str] = &["data/raw/2021", "data/raw/2023"];
const DEFAULT_BASELINES_PATH: &str = "trained_baselines.json";
const DEFAULT_EXPORT_PATH: &str = "processed_matches.csv";
const DEFAULT_K_FOLDS: usize = 5;

/// Knobs shared by prediction and evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSettings {
    pub window: usize,
    pub min_required: usize,
    pub limits: PredictionLimits,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            min_required: DEFAULT_MIN_MATCHES,
            limits: PredictionLimits::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub data_dirs: Vec<PathBuf>,
    pub baselines_path: PathBuf,
    pub export_path: PathBuf,
    pub k_folds: usize,
    pub seed: Option<u64>,
    pub parallel_load: bool,
    pub model: ModelSettings,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ForecastConfig {
    /// Reads `.env.local` / `.env` if present, then the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dirs = lookup("FORECAST_DATA_DIRS")
            .map(|raw| parse_dirs(&raw))
            .filter(|dirs| !dirs.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIRS.iter().map(PathBuf::from).collect());

        let window = parse_usize(lookup("FORECAST_WINDOW"))
            .unwrap_or(DEFAULT_WINDOW)
            .clamp(1, 50);
        let min_required = parse_usize(lookup("FORECAST_MIN_MATCHES"))
            .unwrap_or(DEFAULT_MIN_MATCHES)
            .clamp(1, window);
        let k_folds = parse_usize(lookup("FORECAST_K_FOLDS"))
            .unwrap_or(DEFAULT_K_FOLDS)
            .clamp(2, 20);
        let seed = lookup("FORECAST_SEED").and_then(|v| v.trim().parse::<u64>().ok());
        let parallel_load = lookup("FORECAST_PARALLEL_LOAD")
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        Self {
            data_dirs,
            baselines_path: non_empty_path(lookup("FORECAST_BASELINES_PATH"))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BASELINES_PATH)),
            export_path: non_empty_path(lookup("FORECAST_EXPORT_PATH"))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH)),
            k_folds,
            seed,
            parallel_load,
            model: ModelSettings {
                window,
                min_required,
                limits: PredictionLimits::default(),
            },
        }
    }
}

/// Installs the fmt subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn parse_dirs(raw: &str) -> Vec<PathBuf> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn parse_usize(raw: Option<String>) -> Option<usize> {
    raw?.trim().parse::<usize>().ok()
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_empty_path(raw: Option<String>) -> Option<PathBuf> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}
