use std::fmt;

use serde::{Deserialize, Serialize};

use crate::league_baseline::LeagueBaseline;
use crate::match_record::MatchRecord;
use crate::team_form::TeamStats;

const REFERENCE_GOALS: f64 = 2.5;
const REFERENCE_CORNERS: f64 = 9.0;
const REFERENCE_YELLOW_CARDS: f64 = 4.5;

const CORNER_POSSESSION_WEIGHT: f64 = 0.1;
const CORNER_SHOT_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionLimits {
    pub goals_per_side: (f64, f64),
    pub corners_total: (f64, f64),
    pub yellow_cards_total: (f64, f64),
}

impl Default for PredictionLimits {
    fn default() -> Self {
        Self {
            goals_per_side: (0.0, 5.0),
            corners_total: (0.0, 20.0),
            yellow_cards_total: (0.0, 10.0),
        }
    }
}

/// Match-level inputs read by the corner and card heuristics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchContext {
    pub home_possession: f64,
    pub away_possession: f64,
    pub home_shots: f64,
    pub away_shots: f64,
    pub home_fouls: f64,
    pub away_fouls: f64,
}

impl MatchContext {
    /// Even fixture used when only the two team names are known.
    pub fn neutral() -> Self {
        Self {
            home_possession: 50.0,
            away_possession: 50.0,
            home_shots: 10.0,
            away_shots: 10.0,
            home_fouls: 12.0,
            away_fouls: 12.0,
        }
    }
}

impl From<&MatchRecord> for MatchContext {
    fn from(m: &MatchRecord) -> Self {
        Self {
            home_possession: m.home_possession,
            away_possession: m.away_possession,
            home_shots: m.home_shots as f64,
            away_shots: m.away_shots as f64,
            home_fouls: m.home_fouls as f64,
            away_fouls: m.away_fouls as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub home_goals: f64,
    pub away_goals: f64,
    pub total_goals: f64,
    pub home_corners: f64,
    pub away_corners: f64,
    pub total_corners: f64,
    pub home_yellow_cards: f64,
    pub away_yellow_cards: f64,
    pub total_yellow_cards: f64,
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Home goals:    {:.1}", self.home_goals)?;
        writeln!(f, "Away goals:    {:.1}", self.away_goals)?;
        writeln!(f, "Total goals:   {:.1}", self.total_goals)?;
        writeln!(f, "Home corners:  {:.1}", self.home_corners)?;
        writeln!(f, "Away corners:  {:.1}", self.away_corners)?;
        writeln!(f, "Total corners: {:.1}", self.total_corners)?;
        writeln!(f, "Home yellows:  {:.1}", self.home_yellow_cards)?;
        writeln!(f, "Away yellows:  {:.1}", self.away_yellow_cards)?;
        write!(f, "Total yellows: {:.1}", self.total_yellow_cards)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidedTotal {
    pub home: f64,
    pub away: f64,
    pub total: f64,
}

pub fn predict(
    ctx: &MatchContext,
    home: &TeamStats,
    away: &TeamStats,
    baseline: &LeagueBaseline,
    limits: &PredictionLimits,
) -> PredictionResult {
    let (home_goals, away_goals) = predict_side_goals(home, away, baseline, limits);
    let total_goals = predict_total_goals(home_goals, away_goals, baseline, limits);
    let corners = predict_corners(ctx, home, away, baseline, limits);
    let yellow = predict_yellow_cards(ctx, home, away, baseline, limits);

    PredictionResult {
        home_goals,
        away_goals,
        total_goals,
        home_corners: corners.home,
        away_corners: corners.away,
        total_corners: corners.total,
        home_yellow_cards: yellow.home,
        away_yellow_cards: yellow.away,
        total_yellow_cards: yellow.total,
    }
}

pub fn batch_predict<'a>(
    fixtures: impl IntoIterator<Item = (&'a MatchContext, &'a TeamStats, &'a TeamStats)>,
    baseline: &LeagueBaseline,
    limits: &PredictionLimits,
) -> Vec<PredictionResult> {
    fixtures
        .into_iter()
        .map(|(ctx, home, away)| predict(ctx, home, away, baseline, limits))
        .collect()
}

/// Each side blends its own scoring and conceding averages; only the home
/// side gets the league's home-advantage multiplier.
pub fn predict_side_goals(
    home: &TeamStats,
    away: &TeamStats,
    baseline: &LeagueBaseline,
    limits: &PredictionLimits,
) -> (f64, f64) {
    let (lo, hi) = limits.goals_per_side;
    let home_raw = (home.avg_goals_scored + home.avg_goals_conceded) / 2.0 * baseline.home_advantage;
    let away_raw = (away.avg_goals_scored + away.avg_goals_conceded) / 2.0;
    (
        round1(home_raw.clamp(lo, hi)),
        round1(away_raw.clamp(lo, hi)),
    )
}

pub fn predict_total_goals(
    home_goals: f64,
    away_goals: f64,
    baseline: &LeagueBaseline,
    limits: &PredictionLimits,
) -> f64 {
    let (lo, hi) = limits.goals_per_side;
    let adjusted = (home_goals + away_goals) * (baseline.goal_baseline / REFERENCE_GOALS);
    round1(adjusted.clamp(lo * 2.0, hi * 2.0))
}

pub fn predict_corners(
    ctx: &MatchContext,
    home: &TeamStats,
    away: &TeamStats,
    baseline: &LeagueBaseline,
    limits: &PredictionLimits,
) -> SidedTotal {
    let possession_diff = ctx.home_possession - ctx.away_possession;
    let shot_factor = (ctx.home_shots + ctx.away_shots) / 4.0;

    let home_raw = (home.avg_corners
        + possession_diff * CORNER_POSSESSION_WEIGHT
        + shot_factor * CORNER_SHOT_WEIGHT)
        .max(0.0);
    let away_raw = (away.avg_corners - possession_diff * CORNER_POSSESSION_WEIGHT
        + shot_factor * CORNER_SHOT_WEIGHT)
        .max(0.0);

    rescale_and_split(
        home_raw,
        away_raw,
        baseline.corner_baseline / REFERENCE_CORNERS,
        limits.corners_total,
    )
}

/// Team yellow average, fouls converted at the league rate, reds counted as
/// `red_card_penalty` yellows.
pub fn predict_yellow_cards(
    ctx: &MatchContext,
    home: &TeamStats,
    away: &TeamStats,
    baseline: &LeagueBaseline,
    limits: &PredictionLimits,
) -> SidedTotal {
    let home_raw = home.avg_yellow_cards
        + ctx.home_fouls * baseline.foul_to_yellow
        + home.avg_red_cards * baseline.red_card_penalty;
    let away_raw = away.avg_yellow_cards
        + ctx.away_fouls * baseline.foul_to_yellow
        + away.avg_red_cards * baseline.red_card_penalty;

    rescale_and_split(
        home_raw.max(0.0),
        away_raw.max(0.0),
        baseline.yellow_card_baseline / REFERENCE_YELLOW_CARDS,
        limits.yellow_cards_total,
    )
}

/// The league ratio sets the clamped total; the raw estimates only decide the
/// split. Order matters: rescale, clamp, then redistribute.
fn rescale_and_split(home_raw: f64, away_raw: f64, ratio: f64, (lo, hi): (f64, f64)) -> SidedTotal {
    let raw_total = home_raw + away_raw;
    let total = (raw_total * ratio).clamp(lo, hi);
    let (home, away) = if raw_total > 0.0 {
        (total * home_raw / raw_total, total * away_raw / raw_total)
    } else {
        (total / 2.0, total / 2.0)
    };
    SidedTotal {
        home: round1(home),
        away: round1(away),
        total: round1(total),
    }
}

/// One decimal, ties to even.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round_ties_even() / 10.0
}
