use std::ops::Range;

use anyhow::{Result, bail, ensure};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::config::ModelSettings;
use crate::league_baseline::{resolve_baseline, train_baselines};
use crate::match_record::{MatchRecord, classify_outcome};
use crate::predictor::{MatchContext, predict};
use crate::team_form::FormCache;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalMetrics {
    pub samples: usize,
    /// Pooled over home and away goals.
    pub mae: f64,
    pub rmse: f64,
    /// Share of matches where the predicted home/draw/away outcome was right.
    pub direction_accuracy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoldReport {
    pub fold: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub leagues_trained: usize,
    pub metrics: GoalMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrossValidationReport {
    pub k_folds: usize,
    pub folds: Vec<FoldReport>,
    pub mean_mae: f64,
    pub std_mae: f64,
    pub mean_rmse: f64,
    pub mean_direction_accuracy: f64,
}

/// `predicted` and `actual` are `(home, away)` goal pairs and must line up one to one.
pub fn evaluate_predictions(predicted: &[(f64, f64)], actual: &[(u32, u32)]) -> Result<GoalMetrics> {
    ensure!(
        predicted.len() == actual.len(),
        "prediction count ({}) does not match actual result count ({})",
        predicted.len(),
        actual.len()
    );
    ensure!(!predicted.is_empty(), "no predictions to evaluate");

    let mut abs_sum = 0.0_f64;
    let mut sq_sum = 0.0_f64;
    let mut correct = 0usize;

    for (&(ph, pa), &(ah, aa)) in predicted.iter().zip(actual) {
        let (ah, aa) = (ah as f64, aa as f64);
        abs_sum += (ph - ah).abs() + (pa - aa).abs();
        sq_sum += (ph - ah).powi(2) + (pa - aa).powi(2);
        if classify_outcome(ph, pa) == classify_outcome(ah, aa) {
            correct += 1;
        }
    }

    let n = predicted.len() as f64;
    Ok(GoalMetrics {
        samples: predicted.len(),
        mae: abs_sum / (2.0 * n),
        rmse: (sq_sum / (2.0 * n)).sqrt(),
        direction_accuracy: correct as f64 / n,
    })
}

/// Contiguous folds of `n / k`; the last fold takes the remainder.
pub fn fold_bounds(n: usize, k: usize) -> Vec<Range<usize>> {
    if k == 0 {
        return Vec::new();
    }
    let size = n / k;
    (0..k)
        .map(|fold| {
            let start = fold * size;
            let end = if fold + 1 == k { n } else { start + size };
            start..end
        })
        .collect()
}

/// Shuffles once (seeded when `seed` is set), then for each fold trains
/// baselines and team form on the other folds and predicts the held-out matches.
pub fn cross_validate(
    records: &[MatchRecord],
    k_folds: usize,
    seed: Option<u64>,
    settings: &ModelSettings,
) -> Result<CrossValidationReport> {
    if k_folds < 2 {
        bail!("cross validation needs at least 2 folds, got {k_folds}");
    }
    ensure!(
        records.len() >= k_folds,
        "cross validation needs at least {k_folds} matches, got {}",
        records.len()
    );

    let mut shuffled = records.to_vec();
    match seed {
        Some(seed) => shuffled.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => shuffled.shuffle(&mut rand::thread_rng()),
    }

    let mut folds = Vec::with_capacity(k_folds);
    for (fold, range) in fold_bounds(shuffled.len(), k_folds).into_iter().enumerate() {
        let test = &shuffled[range.clone()];
        let train: Vec<MatchRecord> = shuffled[..range.start]
            .iter()
            .chain(&shuffled[range.end..])
            .cloned()
            .collect();

        let baselines = train_baselines(&train);
        let mut cache = FormCache::new();
        let mut predicted = Vec::with_capacity(test.len());
        let mut actual = Vec::with_capacity(test.len());

        for m in test {
            let home = cache.get_or_compute(&train, &m.home_team, settings.window, settings.min_required);
            let away = cache.get_or_compute(&train, &m.away_team, settings.window, settings.min_required);
            let baseline = resolve_baseline(&m.league, &baselines);
            let result = predict(
                &MatchContext::from(m),
                home.stats(),
                away.stats(),
                &baseline,
                &settings.limits,
            );
            predicted.push((result.home_goals, result.away_goals));
            actual.push((m.home_goals, m.away_goals));
        }

        let metrics = evaluate_predictions(&predicted, &actual)?;
        tracing::info!(
            fold = fold + 1,
            mae = metrics.mae,
            rmse = metrics.rmse,
            accuracy = metrics.direction_accuracy,
            "cross validation fold"
        );
        folds.push(FoldReport {
            fold: fold + 1,
            train_size: train.len(),
            test_size: test.len(),
            leagues_trained: baselines.len(),
            metrics,
        });
    }

    let maes: Vec<f64> = folds.iter().map(|f| f.metrics.mae).collect();
    let mean_mae = mean(&maes);
    let std_mae = (maes.iter().map(|v| (v - mean_mae).powi(2)).sum::<f64>() / maes.len() as f64).sqrt();
    let mean_rmse = mean(&folds.iter().map(|f| f.metrics.rmse).collect::<Vec<_>>());
    let mean_direction_accuracy =
        mean(&folds.iter().map(|f| f.metrics.direction_accuracy).collect::<Vec<_>>());

    Ok(CrossValidationReport {
        k_folds,
        folds,
        mean_mae,
        std_mae,
        mean_rmse,
        mean_direction_accuracy,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::{evaluate_predictions, fold_bounds};

    #[test]
    fn folds_cover_every_index_once() {
        let folds = fold_bounds(23, 4);
        assert_eq!(folds.len(), 4);
        assert_eq!(folds[0], 0..5);
        assert_eq!(folds[3], 15..23);
        assert_eq!(folds.iter().map(|r| r.len()).sum::<usize>(), 23);
        assert!(fold_bounds(10, 0).is_empty());
    }

    #[test]
    fn metrics_pool_home_and_away_errors() {
        let m = evaluate_predictions(&[(2.0, 1.0), (1.0, 1.0)], &[(1, 1), (1, 1)]).expect("same length");
        assert_eq!(m.samples, 2);
        assert!((m.mae - 0.25).abs() < 1e-12);
        assert!((m.rmse - 0.5).abs() < 1e-12);
        assert!((m.direction_accuracy - 0.5).abs() < 1e-12);
    }

    #[test]
    fn mismatched_lengths_fail_fast() {
        let err = evaluate_predictions(&[(1.0, 0.0)], &[]).expect_err("length mismatch");
        assert!(err.to_string().contains("does not match"));
    }
}
