//! Batch Processor
//!
//! Runs one strategy over a sequence of observations, one result per input in
//! input order (downstream persistence correlates results by index), and
//! folds results into per-level counts and score statistics.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::core::strategy::{Assessment, LevelScale, RiskStrategy};
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::Observation;
use crate::utils::constants::BATCH_PROGRESS_INTERVAL;

/// Number of results at one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub level: &'static str,
    pub count: usize,
}

/// Distribution statistics over a batch of results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    /// Every level of the scale, lowest first, zero-filled
    pub level_counts: Vec<LevelCount>,
    /// `None` when `total == 0`
    pub average_score: Option<f64>,
    pub max_score: Option<f64>,
    pub min_score: Option<f64>,
}

impl BatchSummary {
    /// Summarize results of one strategy. An empty slice yields zero counts
    /// and no statistics.
    pub fn from_results<A: Assessment>(results: &[A]) -> Self {
        let mut counts = [0usize; 5];
        let mut sum = 0.0;
        let mut max_score: Option<f64> = None;
        let mut min_score: Option<f64> = None;

        for result in results {
            let score = result.score();
            counts[result.level().ordinal()] += 1;
            sum += score;
            max_score = Some(max_score.map_or(score, |m| m.max(score)));
            min_score = Some(min_score.map_or(score, |m| m.min(score)));
        }

        let level_counts = A::Level::ALL
            .iter()
            .zip(counts)
            .map(|(level, count)| LevelCount {
                level: level.label(),
                count,
            })
            .collect();

        let total = results.len();
        let average_score = (total > 0).then(|| sum / total as f64);

        Self {
            total,
            level_counts,
            average_score,
            max_score,
            min_score,
        }
    }

    /// Count for a level label; 0 for unknown labels
    pub fn count(&self, level: &str) -> usize {
        self.level_counts
            .iter()
            .find(|c| c.level == level)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// Share of results at a level, in percent; 0 on an empty batch
    pub fn percentage(&self, level: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(level) as f64 * 100.0 / self.total as f64
    }

    /// Multi-line text block for logs and demos
    pub fn report(&self) -> String {
        let mut output = format!("Total points: {}\n", self.total);
        for c in &self.level_counts {
            output.push_str(&format!(
                "  {:<9} {:>7} ({:.1}%)\n",
                c.level,
                c.count,
                self.percentage(c.level)
            ));
        }
        match self.average_score {
            Some(avg) => output.push_str(&format!("Average score: {:.3}\n", avg)),
            None => output.push_str("Average score: n/a\n"),
        }
        output
    }
}

/// Drives a strategy over observation sequences
#[derive(Debug, Clone)]
pub struct BatchProcessor<S: RiskStrategy> {
    strategy: S,
}

impl<S: RiskStrategy> BatchProcessor<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Classify and score one observation
    pub fn process_point(&self, observation: &Observation) -> AppResult<S::Output> {
        self.strategy.assess(observation)
    }

    /// Score every observation in order. Stops at the first invalid one; the
    /// error message carries its index.
    pub fn process(&self, observations: &[Observation]) -> AppResult<Vec<S::Output>> {
        let start = Instant::now();
        let total = observations.len();
        info!("⚙️ Processing {} points with {}", total, self.strategy.name());

        let mut results = Vec::with_capacity(total);
        for (i, observation) in observations.iter().enumerate() {
            results.push(score_indexed(&self.strategy, i, observation)?);

            if (i + 1) % BATCH_PROGRESS_INTERVAL == 0 {
                info!("Processed {}/{} points", i + 1, total);
            }
        }

        info!(
            "✅ Processed {} points in {}ms",
            total,
            start.elapsed().as_millis()
        );
        Ok(results)
    }

    /// Same contract as [`process`](Self::process), fanned out over up to
    /// `workers` scoped threads on contiguous chunks. Output order matches
    /// input order. On failure the error of the lowest failing index is
    /// returned.
    pub fn process_parallel(&self, observations: &[Observation], workers: usize) -> AppResult<Vec<S::Output>> {
        let workers = workers.max(1);
        if workers == 1 || observations.len() < 2 {
            return self.process(observations);
        }

        let start = Instant::now();
        let chunk_size = observations.len().div_ceil(workers);
        info!(
            "⚙️ Processing {} points with {} on {} workers",
            observations.len(),
            self.strategy.name(),
            workers
        );

        let strategy = &self.strategy;
        let chunk_results: Vec<AppResult<Vec<S::Output>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = observations
                .chunks(chunk_size)
                .enumerate()
                .map(|(chunk_idx, chunk)| {
                    let offset = chunk_idx * chunk_size;
                    scope.spawn(move || {
                        let out = chunk
                            .iter()
                            .enumerate()
                            .map(|(i, obs)| score_indexed(strategy, offset + i, obs))
                            .collect::<AppResult<Vec<_>>>();
                        debug!("chunk {} done ({} points)", chunk_idx, chunk.len());
                        out
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .unwrap_or_else(|_| Err(AppError::new(ErrorCode::Unknown, "batch worker panicked")))
                })
                .collect()
        });

        let mut results = Vec::with_capacity(observations.len());
        for chunk in chunk_results {
            results.extend(chunk?);
        }

        info!(
            "✅ Processed {} points in {}ms",
            results.len(),
            start.elapsed().as_millis()
        );
        Ok(results)
    }

    /// Per-level counts and score statistics of `results`
    pub fn summarize(&self, results: &[S::Output]) -> BatchSummary {
        BatchSummary::from_results(results)
    }
}

fn score_indexed<S: RiskStrategy>(strategy: &S, index: usize, observation: &Observation) -> AppResult<S::Output> {
    strategy
        .assess(observation)
        .map_err(|e| e.context(format!("observation #{}", index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::threat_score::ThreatCalculator;
    use crate::core::zone_risk::ZoneRiskModel;
    use crate::models::types::{RiskResult, ThreatScore};
    use chrono::NaiveDate;

    fn observations() -> Vec<Observation> {
        let noon = NaiveDate::from_ymd_opt(2024, 1, 10)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        let midnight = NaiveDate::from_ymd_opt(2024, 1, 10)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        vec![
            Observation::new(21.1458, 79.0882, 45.0).with_timestamp(noon),
            Observation::new(21.0976, 78.9772, 0.0)
                .with_timestamp(midnight)
                .with_stopped_seconds(600),
            Observation::new(21.0950, 79.1200, 20.0).with_timestamp(noon),
            Observation::new(21.1850, 79.2300, 5.0)
                .with_timestamp(midnight)
                .with_stopped_seconds(180),
        ]
    }

    #[test]
    fn test_process_preserves_order() {
        let processor = BatchProcessor::new(ZoneRiskModel::default());
        let results = processor.process(&observations()).unwrap();
        let zones: Vec<&str> = results.iter().map(|r| r.zone_name.as_str()).collect();
        assert_eq!(zones, vec!["Sitabuldi", "MIDC Industrial", "Manewada", "Outer Ring Road"]);
    }

    #[test]
    fn test_process_empty() {
        let processor = BatchProcessor::new(ZoneRiskModel::default());
        assert!(processor.process(&[]).unwrap().is_empty());
        assert!(processor.process_parallel(&[], 4).unwrap().is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let processor = BatchProcessor::new(ZoneRiskModel::default());
        let mut obs = observations();
        for _ in 0..4 {
            obs.extend(observations());
        }
        let sequential = processor.process(&obs).unwrap();
        for workers in [1, 2, 3, 7, 64] {
            let parallel = processor.process_parallel(&obs, workers).unwrap();
            assert_eq!(parallel, sequential, "workers = {}", workers);
        }
    }

    #[test]
    fn test_process_reports_failing_index() {
        let processor = BatchProcessor::new(ThreatCalculator::new());
        let mut obs = observations();
        obs.insert(2, Observation::new(f64::NAN, 79.0, 10.0));

        let err = processor.process(&obs).unwrap_err();
        assert_eq!(err.code, ErrorCode::InputInvalidCoordinate);
        assert!(err.message.starts_with("observation #2"), "{}", err.message);

        let err = processor.process_parallel(&obs, 3).unwrap_err();
        assert!(err.message.starts_with("observation #2"), "{}", err.message);
    }

    #[test]
    fn test_summary_counts() {
        let processor = BatchProcessor::new(ZoneRiskModel::default());
        let results = processor.process(&observations()).unwrap();
        let summary = processor.summarize(&results);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.level_counts.len(), 5);
        let counted: usize = summary.level_counts.iter().map(|c| c.count).sum();
        assert_eq!(counted, 4);
        assert_eq!(summary.count("CRITICAL"), 2);

        let avg = summary.average_score.unwrap();
        let expected = results.iter().map(|r| r.score).sum::<f64>() / 4.0;
        assert!((avg - expected).abs() < 1e-12);
        assert!(summary.max_score.unwrap() >= summary.min_score.unwrap());
        assert!((summary.percentage("CRITICAL") - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary_is_defined() {
        let summary = BatchSummary::from_results::<RiskResult>(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.level_counts.iter().all(|c| c.count == 0));
        assert_eq!(summary.level_counts[0].level, "SAFE");
        assert_eq!(summary.average_score, None);
        assert_eq!(summary.max_score, None);
        assert_eq!(summary.percentage("SAFE"), 0.0);
        assert!(summary.report().contains("n/a"));

        let summary = BatchSummary::from_results::<ThreatScore>(&[]);
        assert_eq!(summary.level_counts[0].level, "MINIMAL");
    }
}
