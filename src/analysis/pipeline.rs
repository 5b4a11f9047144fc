//! Waveform → ordered fixed-shape frame sequence.

use ndarray::{Array3, Axis};

use crate::config::PipelineSettings;

use super::normalize::fit_time_axis;
use super::segment::{SegmentPlan, Segmenter};
use super::spectrogram::{MEL_BANDS, SpectrogramBuilder};

pub use ndarray::Array2;

/// Segments a waveform and turns every chunk into one normalized frame.
///
/// The same transform serves single-clip inference and bulk corpus
/// preparation; each call is a pure function of its inputs, so repeated runs
/// over one waveform produce bit-identical frames.
#[derive(Debug, Clone)]
pub struct FramePipeline {
    segmenter: Segmenter,
    max_length: usize,
}

impl FramePipeline {
    pub fn new(settings: &PipelineSettings) -> Self {
        Self {
            segmenter: Segmenter::new(settings.window, settings.overlap),
            max_length: settings.max_length,
        }
    }

    /// Time-axis length every emitted frame is normalized to.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Segmentation geometry for a waveform of `total_samples` samples.
    pub fn plan(&self, total_samples: usize) -> SegmentPlan {
        self.segmenter.plan(total_samples)
    }

    /// Produce the ordered `(MEL_BANDS, max_length)` frames for one waveform.
    ///
    /// A waveform too short to fit one full segment yields an empty list;
    /// rejecting that is the caller's concern, not this layer's.
    pub fn frames(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<Array2<f32>>, String> {
        let plan = self.segmenter.plan(samples.len());
        if plan.ranges.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = SpectrogramBuilder::new(sample_rate)?;
        let mut frames = Vec::with_capacity(plan.ranges.len());
        for &(start, end) in &plan.ranges {
            let spectrogram = builder.build(&samples[start..end])?;
            frames.push(fit_time_axis(spectrogram, self.max_length));
        }
        Ok(frames)
    }

    /// Corpus variant: frames plus one repeated label per emitted frame.
    ///
    /// A clip decomposes into many frames that all inherit its label, so the
    /// label sequence parallels the frame sequence, not the clip list.
    pub fn labeled_frames(
        &self,
        samples: &[f32],
        sample_rate: u32,
        label: &str,
    ) -> Result<(Vec<Array2<f32>>, Vec<String>), String> {
        let frames = self.frames(samples, sample_rate)?;
        let labels = vec![label.to_string(); frames.len()];
        Ok((frames, labels))
    }

    /// Stack one clip's frames into the classifier batch tensor.
    pub fn frame_batch(&self, samples: &[f32], sample_rate: u32) -> Result<Array3<f32>, String> {
        let frames = self.frames(samples, sample_rate)?;
        stack_frames(&frames, self.max_length)
    }
}

/// Stack `(MEL_BANDS, max_length)` frames into `(n, MEL_BANDS, max_length)`.
pub fn stack_frames(frames: &[Array2<f32>], max_length: usize) -> Result<Array3<f32>, String> {
    let mut batch = Array3::<f32>::zeros((frames.len(), MEL_BANDS, max_length));
    for (row, frame) in frames.iter().enumerate() {
        if frame.dim() != (MEL_BANDS, max_length) {
            return Err(format!(
                "frame {row} has shape {:?}, expected ({MEL_BANDS}, {max_length})",
                frame.dim()
            ));
        }
        batch.index_axis_mut(Axis(0), row).assign(frame);
    }
    Ok(batch)
}
