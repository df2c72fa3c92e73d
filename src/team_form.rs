use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::match_record::{MatchRecord, SideLine};

pub const DEFAULT_WINDOW: usize = 10;
pub const DEFAULT_MIN_MATCHES: usize = 3;

/// Trailing-window averages for one team, always from the team's own side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team_name: String,
    pub avg_goals_scored: f64,
    pub avg_goals_conceded: f64,
    pub avg_shots: f64,
    pub avg_shots_on_target: f64,
    pub avg_possession: f64,
    pub avg_pass_success: f64,
    pub avg_fouls: f64,
    pub avg_corners: f64,
    pub avg_yellow_cards: f64,
    pub avg_red_cards: f64,
    pub matches: usize,
}

impl TeamStats {
    /// Profile used when a team has too little history to average.
    pub fn default_profile(team_name: &str, matches: usize) -> Self {
        Self {
            team_name: team_name.to_string(),
            avg_goals_scored: 1.0,
            avg_goals_conceded: 1.0,
            avg_shots: 10.0,
            avg_shots_on_target: 3.0,
            avg_possession: 50.0,
            avg_pass_success: 80.0,
            avg_fouls: 12.0,
            avg_corners: 5.0,
            avg_yellow_cards: 2.0,
            avg_red_cards: 0.1,
            matches,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TeamForm {
    Measured(TeamStats),
    /// Fewer than `min_required` matches were found; `matches` holds the count seen.
    Default(TeamStats),
}

impl TeamForm {
    pub fn stats(&self) -> &TeamStats {
        match self {
            TeamForm::Measured(s) | TeamForm::Default(s) => s,
        }
    }

    pub fn into_stats(self) -> TeamStats {
        match self {
            TeamForm::Measured(s) | TeamForm::Default(s) => s,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, TeamForm::Default(_))
    }
}

pub fn compute_team_form(
    records: &[MatchRecord],
    team: &str,
    window: usize,
    min_required: usize,
) -> TeamForm {
    let mut lines: Vec<(&str, SideLine)> = records
        .iter()
        .filter_map(|m| m.side_of(team).map(|side| (m.date.as_str(), m.side_line(side))))
        .collect();
    // Stable: equal dates keep their input order.
    lines.sort_by(|a, b| b.0.cmp(a.0));
    lines.truncate(window);

    let n = lines.len();
    if n < min_required || n == 0 {
        return TeamForm::Default(TeamStats::default_profile(team, n));
    }

    let mean = |f: fn(&SideLine) -> f64| lines.iter().map(|(_, l)| f(l)).sum::<f64>() / n as f64;
    TeamForm::Measured(TeamStats {
        team_name: team.to_string(),
        avg_goals_scored: mean(|l| l.goals_for as f64),
        avg_goals_conceded: mean(|l| l.goals_against as f64),
        avg_shots: mean(|l| l.shots as f64),
        avg_shots_on_target: mean(|l| l.shots_on_target as f64),
        avg_possession: mean(|l| l.possession),
        avg_pass_success: mean(|l| l.pass_success),
        avg_fouls: mean(|l| l.fouls as f64),
        avg_corners: mean(|l| l.corners as f64),
        avg_yellow_cards: mean(|l| l.yellow_cards as f64),
        avg_red_cards: mean(|l| l.red_cards as f64),
        matches: n,
    })
}

/// Memoizes team forms for one fixed record set. Owned by whoever owns the
/// records; drop it whenever the records change.
#[derive(Debug, Default)]
pub struct FormCache {
    entries: HashMap<(String, usize, usize), TeamForm>,
}

impl FormCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(
        &mut self,
        records: &[MatchRecord],
        team: &str,
        window: usize,
        min_required: usize,
    ) -> TeamForm {
        let key = (team.to_string(), window, min_required);
        if let Some(hit) = self.entries.get(&key) {
            tracing::trace!(team, window, "team form cache hit");
            return hit.clone();
        }
        let form = compute_team_form(records, team, window, min_required);
        self.entries.insert(key, form.clone());
        form
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
