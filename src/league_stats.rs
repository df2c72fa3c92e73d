use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::match_record::{MatchRecord, Outcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub earliest: String,
    pub latest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub league_name: String,
    pub total_matches: usize,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringStats {
    pub total_goals: u64,
    pub average_goals_per_match: f64,
    pub home_win_rate: f64,
    pub away_win_rate: f64,
    pub draw_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackingStats {
    pub total_shots: u64,
    pub total_shots_on_target: u64,
    pub average_shots_per_match: f64,
    pub average_shots_on_target_per_match: f64,
    pub shot_accuracy_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisciplinaryStats {
    pub total_yellow_cards: u64,
    pub total_red_cards: u64,
    pub average_yellow_cards_per_match: f64,
    pub average_red_cards_per_match: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPieceStats {
    pub total_corners: u64,
    pub average_corners_per_match: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossessionStats {
    pub average_home_possession: f64,
    pub average_away_possession: f64,
}

/// Descriptive summary for one league. Rates are percentages with one
/// decimal, per-match averages carry two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueStats {
    pub basic_info: BasicInfo,
    pub scoring_stats: ScoringStats,
    pub attacking_stats: AttackingStats,
    pub disciplinary_stats: DisciplinaryStats,
    pub set_piece_stats: SetPieceStats,
    pub possession_stats: PossessionStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueStatsReport {
    pub generated_at: String,
    pub leagues: BTreeMap<String, LeagueStats>,
}

pub fn build_report(records: &[MatchRecord]) -> LeagueStatsReport {
    let mut by_league: BTreeMap<&str, Vec<&MatchRecord>> = BTreeMap::new();
    for m in records {
        by_league.entry(m.league.as_str()).or_default().push(m);
    }

    let leagues = by_league
        .into_iter()
        .map(|(league, matches)| (league.to_string(), league_stats(league, &matches)))
        .collect();

    LeagueStatsReport {
        generated_at: Utc::now().to_rfc3339(),
        leagues,
    }
}

pub fn league_stats(league: &str, matches: &[&MatchRecord]) -> LeagueStats {
    let n = matches.len();
    let total = |f: fn(&MatchRecord) -> u64| matches.iter().map(|m| f(m)).fold(0u64, u64::saturating_add);
    let per_match = |sum: u64| if n == 0 { 0.0 } else { round_to(sum as f64 / n as f64, 2) };
    let rate = |count: usize| if n == 0 { 0.0 } else { round_to(count as f64 * 100.0 / n as f64, 1) };
    let outcomes = |want: Outcome| matches.iter().filter(|m| m.outcome() == want).count();

    let total_goals = total(|m| m.total_goals());
    let total_shots = total(|m| u64::from(m.home_shots) + u64::from(m.away_shots));
    let total_on_target = total(|m| u64::from(m.home_shots_on_target) + u64::from(m.away_shots_on_target));
    let total_yellow = total(|m| m.total_yellow_cards());
    let total_red = total(|m| u64::from(m.home_red_cards) + u64::from(m.away_red_cards));
    let total_corners = total(|m| m.total_corners());

    let avg_shots = per_match(total_shots);
    let avg_on_target = per_match(total_on_target);
    let shot_accuracy = if avg_shots > 0.0 {
        round_to(avg_on_target / avg_shots * 100.0, 1)
    } else {
        0.0
    };

    let mean_possession = |f: fn(&MatchRecord) -> f64| {
        if n == 0 {
            0.0
        } else {
            round_to(matches.iter().map(|m| f(m)).sum::<f64>() / n as f64, 1)
        }
    };

    LeagueStats {
        basic_info: BasicInfo {
            league_name: league.to_string(),
            total_matches: n,
            date_range: DateRange {
                earliest: matches.iter().map(|m| m.date.as_str()).min().unwrap_or("").to_string(),
                latest: matches.iter().map(|m| m.date.as_str()).max().unwrap_or("").to_string(),
            },
        },
        scoring_stats: ScoringStats {
            total_goals,
            average_goals_per_match: per_match(total_goals),
            home_win_rate: rate(outcomes(Outcome::Home)),
            away_win_rate: rate(outcomes(Outcome::Away)),
            draw_rate: rate(outcomes(Outcome::Draw)),
        },
        attacking_stats: AttackingStats {
            total_shots,
            total_shots_on_target: total_on_target,
            average_shots_per_match: avg_shots,
            average_shots_on_target_per_match: avg_on_target,
            shot_accuracy_rate: shot_accuracy,
        },
        disciplinary_stats: DisciplinaryStats {
            total_yellow_cards: total_yellow,
            total_red_cards: total_red,
            average_yellow_cards_per_match: per_match(total_yellow),
            average_red_cards_per_match: per_match(total_red),
        },
        set_piece_stats: SetPieceStats {
            total_corners,
            average_corners_per_match: per_match(total_corners),
        },
        possession_stats: PossessionStats {
            average_home_possession: mean_possession(|m| m.home_possession),
            average_away_possession: mean_possession(|m| m.away_possession),
        },
    }
}

pub fn save_report(path: &Path, report: &LeagueStatsReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(report).context("serialize league stats")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), leagues = report.leagues.len(), "saved league stats");
    Ok(())
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::{build_report, round_to};
    use crate::match_record::MatchRecord;

    fn fixture(league: &str, date: &str, goals: (u32, u32), shots: (u32, u32), on_target: (u32, u32)) -> MatchRecord {
        MatchRecord {
            league: league.to_string(),
            date: date.to_string(),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            home_goals: goals.0,
            away_goals: goals.1,
            home_shots: shots.0,
            away_shots: shots.1,
            home_shots_on_target: on_target.0,
            away_shots_on_target: on_target.1,
            home_possession: 55.0,
            away_possession: 45.0,
            home_corners: 5,
            away_corners: 4,
            ..MatchRecord::default()
        }
    }

    #[test]
    fn report_groups_by_league_and_computes_rates() {
        let records = vec![
            fixture("英超", "2023-08-12", (2, 1), (12, 8), (5, 3)),
            fixture("英超", "2023-08-19", (0, 0), (10, 10), (3, 3)),
            fixture("英超", "2023-08-05", (1, 3), (9, 11), (4, 6)),
            fixture("意甲", "2023-09-01", (1, 0), (7, 6), (2, 1)),
        ];
        let report = build_report(&records);
        assert_eq!(report.leagues.len(), 2);

        let epl = &report.leagues["英超"];
        assert_eq!(epl.basic_info.total_matches, 3);
        assert_eq!(epl.basic_info.date_range.earliest, "2023-08-05");
        assert_eq!(epl.basic_info.date_range.latest, "2023-08-19");
        assert_eq!(epl.scoring_stats.total_goals, 7);
        assert_eq!(epl.scoring_stats.average_goals_per_match, 2.33);
        assert_eq!(epl.scoring_stats.home_win_rate, 33.3);
        assert_eq!(epl.scoring_stats.draw_rate, 33.3);
        assert_eq!(epl.attacking_stats.total_shots, 60);
        assert_eq!(epl.attacking_stats.shot_accuracy_rate, 40.0);
        assert_eq!(epl.set_piece_stats.average_corners_per_match, 9.0);
        assert_eq!(epl.possession_stats.average_home_possession, 55.0);
    }

    #[test]
    fn rounding_helper_handles_precision() {
        assert_eq!(round_to(2.345, 1), 2.3);
        assert_eq!(round_to(7.0 / 3.0, 2), 2.33);
        assert_eq!(round_to(2.25, 1), 2.2);
        assert_eq!(round_to(2.75, 1), 2.8);
    }
}
