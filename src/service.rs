//! Clip classification orchestration: frames → classifier → ranked verdict.

use serde::Serialize;

use crate::acquire::AcquiredClip;
use crate::analysis::pipeline::{FramePipeline, stack_frames};
use crate::analysis::spectrogram::MEL_BANDS;
use crate::classify::FrameClassifier;
use crate::config::PipelineSettings;
use crate::predict::{ClassVocabulary, PredictionAggregator, RankedPrediction};

/// Classification failures surfaced to the presentation layer.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The waveform is too short to fill a single analysis window.
    #[error("Clip is too short to analyze")]
    ClipTooShort,
    /// The external classifier failed to produce predictions.
    #[error("Classifier inference failed: {0}")]
    Classifier(String),
    /// An internal invariant broke; a defect, not a user error.
    #[error("Internal pipeline error: {0}")]
    Internal(String),
}

/// One clip's final result, ready for wire encoding.
#[derive(Debug, Clone, Serialize)]
pub struct ClipVerdict {
    pub title: String,
    #[serde(flatten)]
    pub prediction: RankedPrediction,
}

/// Ties the frame pipeline, an external classifier and the aggregator
/// together for single-clip inference.
pub struct ClipClassifier<C: FrameClassifier> {
    pipeline: FramePipeline,
    classifier: C,
    aggregator: PredictionAggregator,
}

impl<C: FrameClassifier> ClipClassifier<C> {
    pub fn new(
        settings: &PipelineSettings,
        vocabulary: ClassVocabulary,
        classifier: C,
    ) -> Self {
        Self {
            pipeline: FramePipeline::new(settings),
            classifier,
            aggregator: PredictionAggregator::new(vocabulary),
        }
    }

    pub fn pipeline(&self) -> &FramePipeline {
        &self.pipeline
    }

    /// Classify an acquired clip, carrying its title into the verdict.
    pub fn classify(&self, clip: &AcquiredClip) -> Result<ClipVerdict, ClassifyError> {
        let prediction = self.classify_waveform(&clip.mono, clip.sample_rate)?;
        Ok(ClipVerdict {
            title: clip.title.clone(),
            prediction,
        })
    }

    /// Classify a bare waveform.
    ///
    /// Emptiness is checked before the classifier ever runs: a clip that
    /// produces zero frames is a user-facing "too short" condition, while
    /// any shape disagreement after that point is an internal defect.
    pub fn classify_waveform(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<RankedPrediction, ClassifyError> {
        let frames = self
            .pipeline
            .frames(samples, sample_rate)
            .map_err(ClassifyError::Internal)?;
        if frames.is_empty() {
            return Err(ClassifyError::ClipTooShort);
        }
        let max_length = self.pipeline.max_length();
        for (idx, frame) in frames.iter().enumerate() {
            if frame.dim() != (MEL_BANDS, max_length) {
                return Err(ClassifyError::Internal(format!(
                    "frame {idx} has shape {:?}, expected ({MEL_BANDS}, {max_length})",
                    frame.dim()
                )));
            }
        }

        let batch = stack_frames(&frames, max_length).map_err(ClassifyError::Internal)?;
        tracing::debug!(
            frames = frames.len(),
            samples = samples.len(),
            sample_rate,
            "running classifier batch"
        );
        let predictions = self
            .classifier
            .predict(&batch)
            .map_err(ClassifyError::Classifier)?;

        if predictions.nrows() != frames.len() {
            return Err(ClassifyError::Internal(format!(
                "classifier returned {} rows for {} frames",
                predictions.nrows(),
                frames.len()
            )));
        }
        if predictions.ncols() != self.aggregator.vocabulary().len() {
            return Err(ClassifyError::Internal(format!(
                "classifier returned {} classes, vocabulary has {}",
                predictions.ncols(),
                self.aggregator.vocabulary().len()
            )));
        }

        self.aggregator
            .aggregate(&predictions)
            .map_err(ClassifyError::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    /// Returns the same probability row for every frame.
    struct ConstantClassifier {
        row: Vec<f32>,
    }

    impl FrameClassifier for ConstantClassifier {
        fn predict(&self, frames: &Array3<f32>) -> Result<Array2<f32>, String> {
            let mut out = Array2::<f32>::zeros((frames.dim().0, self.row.len()));
            for mut row in out.rows_mut() {
                for (dst, &src) in row.iter_mut().zip(self.row.iter()) {
                    *dst = src;
                }
            }
            Ok(out)
        }
    }

    struct FailingClassifier;

    impl FrameClassifier for FailingClassifier {
        fn predict(&self, _frames: &Array3<f32>) -> Result<Array2<f32>, String> {
            Err("backend unavailable".to_string())
        }
    }

    struct WrongShapeClassifier;

    impl FrameClassifier for WrongShapeClassifier {
        fn predict(&self, frames: &Array3<f32>) -> Result<Array2<f32>, String> {
            Ok(Array2::<f32>::zeros((frames.dim().0 + 1, 10)))
        }
    }

    fn vocab() -> ClassVocabulary {
        ClassVocabulary::new(PipelineSettings::default().vocabulary).unwrap()
    }

    fn tone(len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (n as f32 * 0.03).sin() * 0.4)
            .collect()
    }

    #[test]
    fn one_hot_classifier_wins_its_class() {
        let mut row = vec![0.0_f32; 10];
        row[5] = 1.0; // jazz
        let classifier = ClipClassifier::new(
            &PipelineSettings::default(),
            vocab(),
            ConstantClassifier { row },
        );
        let ranked = classifier.classify_waveform(&tone(60_000), 22_050).unwrap();
        assert_eq!(ranked.top_prediction, "jazz");
        assert_eq!(ranked.results[0].label, "jazz");
        // Every frame votes 1.0 for jazz: score = frames * 100 / 24.
        let frames = classifier.pipeline().plan(60_000).ranges.len() as f32;
        assert!((ranked.results[0].score - frames * 100.0 / 24.0).abs() < 1e-3);
    }

    #[test]
    fn uniform_classifier_ties_to_the_first_class() {
        let classifier = ClipClassifier::new(
            &PipelineSettings::default(),
            vocab(),
            ConstantClassifier {
                row: vec![0.1_f32; 10],
            },
        );
        let ranked = classifier.classify_waveform(&tone(40_000), 22_050).unwrap();
        assert_eq!(ranked.top_prediction, "blues");
    }

    #[test]
    fn short_clip_is_rejected_before_inference() {
        let classifier = ClipClassifier::new(
            &PipelineSettings::default(),
            vocab(),
            FailingClassifier,
        );
        // Ten samples cannot fill a window; the failing classifier would
        // surface as Classifier(_) if it were ever invoked.
        let err = classifier.classify_waveform(&tone(10), 22_050).unwrap_err();
        assert!(matches!(err, ClassifyError::ClipTooShort));
    }

    #[test]
    fn classifier_failure_is_its_own_variant() {
        let classifier = ClipClassifier::new(
            &PipelineSettings::default(),
            vocab(),
            FailingClassifier,
        );
        let err = classifier.classify_waveform(&tone(40_000), 22_050).unwrap_err();
        assert!(matches!(err, ClassifyError::Classifier(_)));
    }

    #[test]
    fn row_count_mismatch_is_internal() {
        let classifier = ClipClassifier::new(
            &PipelineSettings::default(),
            vocab(),
            WrongShapeClassifier,
        );
        let err = classifier.classify_waveform(&tone(40_000), 22_050).unwrap_err();
        assert!(matches!(err, ClassifyError::Internal(_)));
    }

    #[test]
    fn verdict_carries_the_clip_title() {
        let classifier = ClipClassifier::new(
            &PipelineSettings::default(),
            vocab(),
            ConstantClassifier {
                row: vec![0.1_f32; 10],
            },
        );
        let clip = AcquiredClip {
            mono: tone(40_000),
            sample_rate: 22_050,
            title: "demo track".to_string(),
        };
        let verdict = classifier.classify(&clip).unwrap();
        assert_eq!(verdict.title, "demo track");
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["title"], "demo track");
        assert!(json["top_prediction"].is_string());
        assert!(json["results"].is_array());
    }
}
