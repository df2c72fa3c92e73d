use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::match_record::MatchRecord;

pub const DEFAULT_LEAGUE: &str = "中超";
pub const MIN_LEAGUE_SAMPLES: usize = 10;
pub const RED_CARD_PENALTY: f64 = 2.0;
const EPS: f64 = 1e-8;

/// (goals, corners, yellow cards, home advantage, foul->yellow)
type BaselineRow = [f64; 5];

const DEFAULT_ROW: BaselineRow = [2.6, 9.5, 4.2, 1.15, 0.18];

const BUILTIN: &[(&str, BaselineRow)] = &[
    (DEFAULT_LEAGUE, DEFAULT_ROW),
    ("意甲", [2.5, 8.5, 5.5, 1.18, 0.25]),
    ("英超", [2.8, 10.5, 5.0, 1.15, 0.22]),
    ("西甲", [2.7, 9.5, 4.8, 1.20, 0.18]),
    ("德甲", [3.0, 9.8, 4.2, 1.10, 0.15]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueBaseline {
    /// Not persisted: the league is the key of the stored map.
    #[serde(skip)]
    pub league: String,
    pub goal_baseline: f64,
    pub corner_baseline: f64,
    pub yellow_card_baseline: f64,
    pub home_advantage: f64,
    pub foul_to_yellow: f64,
    pub red_card_penalty: f64,
    pub sample_size: usize,
}

pub type BaselineMap = BTreeMap<String, LeagueBaseline>;

impl LeagueBaseline {
    pub fn builtin(league: &str) -> Option<Self> {
        let (name, row) = BUILTIN.iter().find(|(name, _)| *name == league)?;
        Some(Self::from_row(name, row))
    }

    pub fn fallback() -> Self {
        Self::from_row(DEFAULT_LEAGUE, &DEFAULT_ROW)
    }

    fn from_row(league: &str, row: &BaselineRow) -> Self {
        Self {
            league: league.to_string(),
            goal_baseline: row[0],
            corner_baseline: row[1],
            yellow_card_baseline: row[2],
            home_advantage: row[3],
            foul_to_yellow: row[4],
            red_card_penalty: RED_CARD_PENALTY,
            sample_size: 0,
        }
    }
}

pub fn builtin_baselines() -> BaselineMap {
    BUILTIN
        .iter()
        .filter_map(|(name, _)| LeagueBaseline::builtin(name).map(|b| (name.to_string(), b)))
        .collect()
}

/// Trained entry first, then the built-in table, then the default league.
pub fn resolve_baseline(league: &str, trained: &BaselineMap) -> LeagueBaseline {
    if let Some(b) = trained.get(league) {
        return b.clone();
    }
    LeagueBaseline::builtin(league).unwrap_or_else(LeagueBaseline::fallback)
}

pub fn train_baselines(records: &[MatchRecord]) -> BaselineMap {
    let mut by_league: BTreeMap<&str, Vec<&MatchRecord>> = BTreeMap::new();
    for m in records {
        by_league.entry(m.league.as_str()).or_default().push(m);
    }

    let mut out = BaselineMap::new();
    for (league, matches) in by_league {
        if matches.len() < MIN_LEAGUE_SAMPLES {
            tracing::debug!(league, samples = matches.len(), "league below sample minimum");
            continue;
        }
        let baseline = compute_league_baseline(league, &matches);
        tracing::info!(
            league,
            samples = baseline.sample_size,
            goals = baseline.goal_baseline,
            corners = baseline.corner_baseline,
            yellow = baseline.yellow_card_baseline,
            home_adv = baseline.home_advantage,
            foul_to_yellow = baseline.foul_to_yellow,
            "trained league baseline"
        );
        out.insert(league.to_string(), baseline);
    }
    out
}

fn compute_league_baseline(league: &str, matches: &[&MatchRecord]) -> LeagueBaseline {
    let n = matches.len() as f64;
    let mean = |f: fn(&MatchRecord) -> u64| matches.iter().map(|m| f(*m) as f64).sum::<f64>() / n;

    let total_goals = mean(MatchRecord::total_goals);
    let total_corners = mean(MatchRecord::total_corners);
    let total_yellow = mean(MatchRecord::total_yellow_cards);
    let total_fouls = mean(MatchRecord::total_fouls);
    let home_goals = mean(|m| u64::from(m.home_goals));
    let away_goals = mean(|m| u64::from(m.away_goals));

    LeagueBaseline {
        league: league.to_string(),
        goal_baseline: total_goals,
        corner_baseline: total_corners,
        yellow_card_baseline: total_yellow,
        home_advantage: home_goals / (away_goals + EPS),
        foul_to_yellow: total_yellow / (total_fouls + EPS),
        red_card_penalty: RED_CARD_PENALTY,
        sample_size: matches.len(),
    }
}

pub fn save_baselines(path: &Path, baselines: &BaselineMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(baselines).context("serialize league baselines")?;
    fs::write(&tmp, json).context("write league baselines")?;
    fs::rename(&tmp, path).context("swap league baselines")?;
    Ok(())
}

pub fn load_baselines(path: &Path) -> Result<BaselineMap> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read baselines {}", path.display()))?;
    let mut map: BaselineMap =
        serde_json::from_str(raw.trim_start_matches('\u{feff}')).context("invalid baselines json")?;
    for (league, b) in map.iter_mut() {
        b.league = league.clone();
    }
    Ok(map)
}
