pub mod config;
pub mod evaluation;
pub mod export;
pub mod league_baseline;
pub mod league_stats;
pub mod match_record;
pub mod match_repository;
pub mod predictor;
pub mod record_parser;
pub mod session;
pub mod team_form;

use std::path::PathBuf;

use crate::config::ModelSettings;
use crate::league_baseline::BaselineMap;
use crate::match_record::MatchRecord;
use crate::match_repository::LoadOptions;
use crate::predictor::PredictionResult;
use crate::session::Session;

/// Forecasts one fixture from historical records with the built-in league
/// baselines and default model settings.
pub fn predict_match(
    home_team: &str,
    away_team: &str,
    league: &str,
    historical_records: &[MatchRecord],
) -> PredictionResult {
    let mut session = Session::with_matches(ModelSettings::default(), historical_records.to_vec());
    session.predict_match(home_team, away_team, league)
}

pub fn train_baselines(records: &[MatchRecord]) -> BaselineMap {
    league_baseline::train_baselines(records)
}

/// Sequential load; per-file failures are logged and skipped.
pub fn load_matches(directories: &[PathBuf]) -> Vec<MatchRecord> {
    match_repository::load(directories, LoadOptions::default()).matches
}
