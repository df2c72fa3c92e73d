use once_cell::sync::Lazy;
use regex::Regex;

static PERCENT_RE: Lazy<Regex> = Lazy::new(|| compile(r"(\d+(?:\.\d+)?)%"));
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| compile(r"\d+(?:\.\d+)?"));
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| compile(r"\d+"));

const SCORE_LABELS: &[&str] = &["比分:", "比分：", "Score:", "score:"];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex pattern")
}

/// `"55%/45%"` -> `(55.0, 45.0)`; a single token is completed to 100.
pub fn parse_percentage(raw: Option<&str>) -> (f64, f64) {
    let Some(raw) = non_empty(raw) else {
        return (0.0, 0.0);
    };
    let values: Vec<f64> = PERCENT_RE
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .map(|v| v.min(100.0))
        .take(2)
        .collect();
    match values.as_slice() {
        [home, away, ..] => (*home, *away),
        [home] => (*home, 100.0 - *home),
        [] => (0.0, 0.0),
    }
}

/// `"7/5"` -> `(7, 5)`. Decimal tokens are truncated and a bare `-` side counts as zero.
pub fn parse_divided(raw: Option<&str>) -> (u32, u32) {
    let Some(raw) = non_empty(raw) else {
        return (0, 0);
    };
    let cleaned = raw
        .split('/')
        .map(|part| if part.trim() == "-" { "0" } else { part })
        .collect::<Vec<_>>()
        .join("/");
    let values: Vec<u32> = NUMBER_RE
        .find_iter(&cleaned)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .map(truncate_count)
        .take(2)
        .collect();
    pair_or_zero(&values)
}

/// `"比分:2-0"` -> `(2, 0)`.
pub fn parse_score(raw: Option<&str>) -> (u32, u32) {
    let Some(raw) = non_empty(raw) else {
        return (0, 0);
    };
    let mut clean = raw;
    for label in SCORE_LABELS {
        if let Some(rest) = clean.strip_prefix(label) {
            clean = rest;
            break;
        }
    }
    let values: Vec<u32> = INTEGER_RE
        .find_iter(clean)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .take(2)
        .collect();
    pair_or_zero(&values)
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == "-" {
        return None;
    }
    Some(raw)
}

fn pair_or_zero(values: &[u32]) -> (u32, u32) {
    match values {
        [home, away, ..] => (*home, *away),
        [home] => (*home, 0),
        [] => (0, 0),
    }
}

fn truncate_count(v: f64) -> u32 {
    if v.is_finite() && v >= 0.0 {
        v.trunc().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_divided, parse_percentage, parse_score};

    #[test]
    fn divided_values_keep_first_two_tokens() {
        assert_eq!(parse_divided(Some("7/5")), (7, 5));
        assert_eq!(parse_divided(Some("12.9/3.2/4")), (12, 3));
        assert_eq!(parse_divided(Some("4")), (4, 0));
        assert_eq!(parse_divided(Some("-/3")), (0, 3));
        assert_eq!(parse_divided(Some("n/a")), (0, 0));
    }

    #[test]
    fn empty_inputs_are_zero_pairs() {
        for raw in [None, Some(""), Some("-"), Some("   ")] {
            assert_eq!(parse_divided(raw), (0, 0));
            assert_eq!(parse_score(raw), (0, 0));
            assert_eq!(parse_percentage(raw), (0.0, 0.0));
        }
    }

    #[test]
    fn percentage_complements_single_token() {
        assert_eq!(parse_percentage(Some("55%/45%")), (55.0, 45.0));
        assert_eq!(parse_percentage(Some("60%/50%")), (60.0, 50.0));
        let (h, a) = parse_percentage(Some("62.5%"));
        assert!((h - 62.5).abs() < 1e-12);
        assert!((h + a - 100.0).abs() < 1e-12);
        assert_eq!(parse_percentage(Some("55/45")), (0.0, 0.0));
    }

    #[test]
    fn score_strips_label() {
        assert_eq!(parse_score(Some("2-0")), (2, 0));
        assert_eq!(parse_score(Some("比分:3-1")), (3, 1));
        assert_eq!(parse_score(Some("Score: 1 - 1")), (1, 1));
        assert_eq!(parse_score(Some("FT 4")), (4, 0));
    }
}
