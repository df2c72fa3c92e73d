use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record_parser::{parse_divided, parse_percentage, parse_score};

/// Canonical field names and the source labels each one is read from.
/// The first label is the one used by the upstream scraper dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawField {
    MatchId,
    League,
    Date,
    HomeTeam,
    AwayTeam,
    Score,
    Shots,
    ShotsOnTarget,
    Possession,
    PassSuccess,
    Fouls,
    YellowCards,
    Corners,
    RedCards,
}

impl RawField {
    pub const ALL: [RawField; 14] = [
        RawField::MatchId,
        RawField::League,
        RawField::Date,
        RawField::HomeTeam,
        RawField::AwayTeam,
        RawField::Score,
        RawField::Shots,
        RawField::ShotsOnTarget,
        RawField::Possession,
        RawField::PassSuccess,
        RawField::Fouls,
        RawField::YellowCards,
        RawField::Corners,
        RawField::RedCards,
    ];

    pub fn labels(self) -> &'static [&'static str] {
        match self {
            RawField::MatchId => &["比赛id", "match_id", "id"],
            RawField::League => &["联赛名", "league", "league_name"],
            RawField::Date => &["日期", "date"],
            RawField::HomeTeam => &["主队", "home_team", "home"],
            RawField::AwayTeam => &["客队", "away_team", "away"],
            RawField::Score => &["赛果", "比分", "score", "full_time_score"],
            RawField::Shots => &["射门", "shots"],
            RawField::ShotsOnTarget => &["射正", "shots_on_target"],
            RawField::Possession => &["控球率", "possession"],
            RawField::PassSuccess => &["传球成功率", "pass_success"],
            RawField::Fouls => &["犯规", "fouls"],
            RawField::YellowCards => &["黄牌", "yellow_cards"],
            RawField::Corners => &["角球", "corners"],
            RawField::RedCards => &["红牌", "red_cards"],
        }
    }
}

/// One match object as it comes out of a source file: label -> free-form string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMatchRecord {
    fields: HashMap<String, String>,
}

impl RawMatchRecord {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Builds a raw record from a JSON object. Returns `None` for non-objects and
    /// for objects without any usable scalar field.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let mut fields = HashMap::with_capacity(obj.len());
        for (key, v) in obj {
            let text = match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => continue,
            };
            fields.insert(key.clone(), text);
        }
        if fields.is_empty() {
            return None;
        }
        Some(Self { fields })
    }

    pub fn get(&self, field: RawField) -> Option<&str> {
        field
            .labels()
            .iter()
            .find_map(|label| self.fields.get(*label))
            .map(|s| s.as_str())
    }

    fn text(&self, field: RawField) -> String {
        self.get(field).unwrap_or_default().trim().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

pub fn classify_outcome(home_goals: f64, away_goals: f64) -> Outcome {
    if home_goals > away_goals {
        Outcome::Home
    } else if home_goals < away_goals {
        Outcome::Away
    } else {
        Outcome::Draw
    }
}

/// Canonical per-match statistics. Counts are non-negative integers and
/// percentages stay within `[0, 100]` (or `0/0` when the source had nothing usable).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub league: String,
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub home_shots: u32,
    pub away_shots: u32,
    pub home_shots_on_target: u32,
    pub away_shots_on_target: u32,
    pub home_possession: f64,
    pub away_possession: f64,
    pub home_pass_success: f64,
    pub away_pass_success: f64,
    pub home_fouls: u32,
    pub away_fouls: u32,
    pub home_yellow_cards: u32,
    pub away_yellow_cards: u32,
    pub home_corners: u32,
    pub away_corners: u32,
    pub home_red_cards: u32,
    pub away_red_cards: u32,
}

/// Everything one side produced in a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideLine {
    pub goals_for: u32,
    pub goals_against: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    pub possession: f64,
    pub pass_success: f64,
    pub fouls: u32,
    pub corners: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

impl MatchRecord {
    pub fn from_raw(raw: &RawMatchRecord) -> Self {
        let (home_goals, away_goals) = parse_score(raw.get(RawField::Score));
        let (home_shots, away_shots) = parse_divided(raw.get(RawField::Shots));
        let (home_shots_on_target, away_shots_on_target) =
            parse_divided(raw.get(RawField::ShotsOnTarget));
        let (home_possession, away_possession) = parse_percentage(raw.get(RawField::Possession));
        let (home_pass_success, away_pass_success) =
            parse_percentage(raw.get(RawField::PassSuccess));
        let (home_fouls, away_fouls) = parse_divided(raw.get(RawField::Fouls));
        let (home_yellow_cards, away_yellow_cards) = parse_divided(raw.get(RawField::YellowCards));
        let (home_corners, away_corners) = parse_divided(raw.get(RawField::Corners));
        let (home_red_cards, away_red_cards) = parse_divided(raw.get(RawField::RedCards));

        Self {
            match_id: raw.text(RawField::MatchId),
            league: raw.text(RawField::League),
            date: raw.text(RawField::Date),
            home_team: raw.text(RawField::HomeTeam),
            away_team: raw.text(RawField::AwayTeam),
            home_goals,
            away_goals,
            home_shots,
            away_shots,
            home_shots_on_target,
            away_shots_on_target,
            home_possession,
            away_possession,
            home_pass_success,
            away_pass_success,
            home_fouls,
            away_fouls,
            home_yellow_cards,
            away_yellow_cards,
            home_corners,
            away_corners,
            home_red_cards,
            away_red_cards,
        }
    }

    pub fn side_of(&self, team: &str) -> Option<Side> {
        if self.home_team == team {
            Some(Side::Home)
        } else if self.away_team == team {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn side_line(&self, side: Side) -> SideLine {
        match side {
            Side::Home => SideLine {
                goals_for: self.home_goals,
                goals_against: self.away_goals,
                shots: self.home_shots,
                shots_on_target: self.home_shots_on_target,
                possession: self.home_possession,
                pass_success: self.home_pass_success,
                fouls: self.home_fouls,
                corners: self.home_corners,
                yellow_cards: self.home_yellow_cards,
                red_cards: self.home_red_cards,
            },
            Side::Away => SideLine {
                goals_for: self.away_goals,
                goals_against: self.home_goals,
                shots: self.away_shots,
                shots_on_target: self.away_shots_on_target,
                possession: self.away_possession,
                pass_success: self.away_pass_success,
                fouls: self.away_fouls,
                corners: self.away_corners,
                yellow_cards: self.away_yellow_cards,
                red_cards: self.away_red_cards,
            },
        }
    }

    pub fn outcome(&self) -> Outcome {
        classify_outcome(self.home_goals as f64, self.away_goals as f64)
    }

    /// Match totals widen to `u64`; a side count can be anything up to `u32::MAX`.
    pub fn total_goals(&self) -> u64 {
        u64::from(self.home_goals) + u64::from(self.away_goals)
    }

    pub fn total_corners(&self) -> u64 {
        u64::from(self.home_corners) + u64::from(self.away_corners)
    }

    pub fn total_yellow_cards(&self) -> u64 {
        u64::from(self.home_yellow_cards) + u64::from(self.away_yellow_cards)
    }

    pub fn total_fouls(&self) -> u64 {
        u64::from(self.home_fouls) + u64::from(self.away_fouls)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{MatchRecord, Outcome, RawField, RawMatchRecord, Side};

    #[test]
    fn maps_source_labels_into_canonical_fields() {
        let raw = RawMatchRecord::from_json(&json!({
            "比赛id": 2231,
            "联赛名": "中超",
            "日期": "2023-05-03",
            "主队": "成都蓉城",
            "客队": "北京国安",
            "赛果": "2-1",
            "射门": "14/9",
            "射正": "6/-",
            "控球率": "58%",
            "犯规": "11/15",
            "黄牌": "2/3",
            "角球": "7/4",
            "红牌": "-",
            "球场": null
        }))
        .expect("object parses");

        let m = MatchRecord::from_raw(&raw);
        assert_eq!(m.match_id, "2231");
        assert_eq!(m.home_team, "成都蓉城");
        assert_eq!((m.home_goals, m.away_goals), (2, 1));
        assert_eq!((m.home_shots_on_target, m.away_shots_on_target), (6, 0));
        assert!((m.away_possession - 42.0).abs() < 1e-9);
        assert_eq!((m.home_pass_success, m.away_pass_success), (0.0, 0.0));
        assert_eq!((m.home_red_cards, m.away_red_cards), (0, 0));
        assert_eq!(m.outcome(), Outcome::Home);
        assert_eq!(m.side_of("北京国安"), Some(Side::Away));
        assert_eq!(m.side_line(Side::Away).goals_against, 2);
    }

    #[test]
    fn english_aliases_and_score_fallback_label() {
        let raw = RawMatchRecord::from_json(&json!({
            "match_id": "x1",
            "league": "英超",
            "比分": "比分:0-0",
            "corners": "3/3"
        }))
        .expect("object parses");
        assert_eq!(raw.get(RawField::Score), Some("比分:0-0"));
        let m = MatchRecord::from_raw(&raw);
        assert_eq!(m.league, "英超");
        assert_eq!(m.total_corners(), 6);
        assert_eq!(m.outcome(), Outcome::Draw);
    }

    #[test]
    fn empty_objects_are_not_records() {
        assert!(RawMatchRecord::from_json(&json!({})).is_none());
        assert!(RawMatchRecord::from_json(&json!({"a": null})).is_none());
        assert!(RawMatchRecord::from_json(&json!([1, 2])).is_none());
    }
}
