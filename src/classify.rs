//! Seam to the external trained classifier.

use ndarray::{Array2, Array3};

/// Batch inference over fixed-shape spectrogram frames.
///
/// Input is a `(frames, mel_bins, max_length)` tensor from the frame
/// pipeline; output must be a `(frames, classes)` matrix where every row is
/// that frame's class probability distribution. Rows are assumed to sum to 1
/// and are not re-validated here. Implementations wrap whatever runtime hosts
/// the trained model; this crate ships none.
pub trait FrameClassifier {
    fn predict(&self, frames: &Array3<f32>) -> Result<Array2<f32>, String>;
}
