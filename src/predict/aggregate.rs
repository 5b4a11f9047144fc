//! Clip-level aggregation of per-frame classifier probabilities.

use ndarray::{Array2, Axis};
use serde::Serialize;

use super::vocabulary::ClassVocabulary;

/// Fixed output scaling: summed probability × 100 / 24.
///
/// The divisor is tied to the training-time normalization of the shipped
/// model and must not drift; downstream consumers compare scores produced
/// under the same constant.
const SCORE_DIVISOR: f32 = 24.0;

/// One ranked class with its reported confidence score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassScore {
    pub label: String,
    pub score: f32,
}

/// Final clip verdict: the winning class plus the ranked score list.
///
/// `results` is ordered by descending score; the order is a property of the
/// type, not a convention the caller has to re-derive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPrediction {
    pub top_prediction: String,
    pub results: Vec<ClassScore>,
}

/// Folds one clip's per-frame probability rows into a [`RankedPrediction`].
///
/// Every frame votes with its whole probability mass: scores are column sums
/// over the batch, so longer clips produce larger raw sums. Only the relative
/// ordering within one clip is meaningful.
#[derive(Debug, Clone)]
pub struct PredictionAggregator {
    vocabulary: ClassVocabulary,
    top_k: usize,
}

impl PredictionAggregator {
    /// Aggregator reporting all classes of `vocabulary`.
    pub fn new(vocabulary: ClassVocabulary) -> Self {
        let top_k = vocabulary.len();
        Self { vocabulary, top_k }
    }

    /// Restrict the ranked output to the best `top_k` classes.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.clamp(1, self.vocabulary.len());
        self
    }

    pub fn vocabulary(&self) -> &ClassVocabulary {
        &self.vocabulary
    }

    /// Aggregate a `(frames, classes)` probability batch for one clip.
    ///
    /// Ties resolve toward the lower class index, both for the winner and
    /// within the ranking (the sort is stable over ascending indices). An
    /// empty batch cannot be ranked and must be rejected by the caller
    /// before classification; it is an error here.
    pub fn aggregate(&self, batch: &Array2<f32>) -> Result<RankedPrediction, String> {
        if batch.nrows() == 0 {
            return Err("cannot aggregate an empty prediction batch".to_string());
        }
        if batch.ncols() != self.vocabulary.len() {
            return Err(format!(
                "prediction batch has {} classes, vocabulary has {}",
                batch.ncols(),
                self.vocabulary.len()
            ));
        }

        let summed = batch.sum_axis(Axis(0));
        let mut order: Vec<usize> = (0..summed.len()).collect();
        order.sort_by(|&a, &b| {
            summed[b]
                .partial_cmp(&summed[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let top_index = order[0];
        let top_prediction = self
            .vocabulary
            .label(top_index)
            .ok_or_else(|| format!("class index {top_index} outside vocabulary"))?
            .to_string();

        let mut results = Vec::with_capacity(self.top_k);
        for &idx in order.iter().take(self.top_k) {
            let label = self
                .vocabulary
                .label(idx)
                .ok_or_else(|| format!("class index {idx} outside vocabulary"))?
                .to_string();
            results.push(ClassScore {
                label,
                score: summed[idx] * 100.0 / SCORE_DIVISOR,
            });
        }

        Ok(RankedPrediction {
            top_prediction,
            results,
        })
    }
}
