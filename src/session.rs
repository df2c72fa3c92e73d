use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{ForecastConfig, ModelSettings};
use crate::evaluation::{CrossValidationReport, cross_validate};
use crate::league_baseline::{
    BaselineMap, LeagueBaseline, load_baselines, resolve_baseline, save_baselines, train_baselines,
};
use crate::match_record::MatchRecord;
use crate::match_repository::{self, LoadOptions, LoadSummary};
use crate::predictor::{MatchContext, PredictionResult, predict};
use crate::team_form::{FormCache, TeamForm};

/// A fixture to forecast: the two teams, their league and, when known, the
/// in-match context. Missing context means an even fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub context: Option<MatchContext>,
}

impl Fixture {
    pub fn new(home_team: &str, away_team: &str, league: &str) -> Self {
        Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            league: league.to_string(),
            context: None,
        }
    }
}

/// Owns the loaded matches together with everything derived from them.
/// Replacing the matches invalidates the form cache.
#[derive(Debug, Default)]
pub struct Session {
    settings: ModelSettings,
    matches: Vec<MatchRecord>,
    baselines: BaselineMap,
    forms: FormCache,
}

impl Session {
    pub fn new(settings: ModelSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn with_matches(settings: ModelSettings, matches: Vec<MatchRecord>) -> Self {
        let mut session = Self::new(settings);
        session.set_matches(matches);
        session
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn baselines(&self) -> &BaselineMap {
        &self.baselines
    }

    pub fn cached_forms(&self) -> usize {
        self.forms.len()
    }

    pub fn set_matches(&mut self, matches: Vec<MatchRecord>) {
        self.matches = matches;
        self.forms.clear();
    }

    /// Loads the configured directories, replacing any matches held so far.
    /// The records move into the session; the returned summary keeps the counts.
    pub fn load(&mut self, config: &ForecastConfig) -> LoadSummary {
        let mut summary = match_repository::load(
            &config.data_dirs,
            LoadOptions {
                parallel: config.parallel_load,
            },
        );
        self.set_matches(std::mem::take(&mut summary.matches));
        summary
    }

    pub fn train(&mut self) -> &BaselineMap {
        self.baselines = train_baselines(&self.matches);
        &self.baselines
    }

    pub fn save_baselines(&self, path: &Path) -> Result<()> {
        save_baselines(path, &self.baselines)
            .with_context(|| format!("save baselines to {}", path.display()))
    }

    pub fn load_baselines(&mut self, path: &Path) -> Result<usize> {
        self.baselines = load_baselines(path)?;
        tracing::info!(path = %path.display(), leagues = self.baselines.len(), "loaded league baselines");
        Ok(self.baselines.len())
    }

    pub fn baseline_for(&self, league: &str) -> LeagueBaseline {
        resolve_baseline(league, &self.baselines)
    }

    pub fn team_form(&mut self, team: &str) -> TeamForm {
        self.forms.get_or_compute(
            &self.matches,
            team,
            self.settings.window,
            self.settings.min_required,
        )
    }

    pub fn predict_match(&mut self, home_team: &str, away_team: &str, league: &str) -> PredictionResult {
        self.predict_fixture(&Fixture::new(home_team, away_team, league))
    }

    pub fn predict_fixture(&mut self, fixture: &Fixture) -> PredictionResult {
        let home = self.team_form(&fixture.home_team);
        let away = self.team_form(&fixture.away_team);
        if home.is_default() || away.is_default() {
            tracing::debug!(
                home = %fixture.home_team,
                away = %fixture.away_team,
                "prediction uses default team profile"
            );
        }
        let ctx = fixture.context.unwrap_or_else(MatchContext::neutral);
        let baseline = self.baseline_for(&fixture.league);
        predict(&ctx, home.stats(), away.stats(), &baseline, &self.settings.limits)
    }

    pub fn predict_batch(&mut self, fixtures: &[Fixture]) -> Vec<PredictionResult> {
        fixtures.iter().map(|f| self.predict_fixture(f)).collect()
    }

    pub fn cross_validate(&self, k_folds: usize, seed: Option<u64>) -> Result<CrossValidationReport> {
        cross_validate(&self.matches, k_folds, seed, &self.settings)
    }
}
