//! Ratio-windowed segmentation of a waveform into fixed-length chunks.

/// Geometry of one segmentation pass over a waveform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPlan {
    /// Fixed segment length in samples.
    pub chunk: usize,
    /// Stride between consecutive segment starts in samples.
    pub stride: usize,
    /// Half-open sample ranges, one per full-length segment, in temporal order.
    pub ranges: Vec<(usize, usize)>,
}

impl SegmentPlan {
    fn empty(chunk: usize, stride: usize) -> Self {
        Self {
            chunk,
            stride,
            ranges: Vec::new(),
        }
    }
}

/// Splits a waveform into overlapping segments of `window * total` samples.
///
/// `window` is the fraction of the whole waveform covered by one segment and
/// `overlap` the fraction of a segment shared with its successor. Both ratios
/// are kept as `f64`: the chunk and stride are truncated products and the
/// f32 representations of the defaults land one sample short.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segmenter {
    window: f64,
    overlap: f64,
}

impl Segmenter {
    pub fn new(window: f64, overlap: f64) -> Self {
        Self { window, overlap }
    }

    /// Plan segment ranges for a waveform of `total_samples` samples.
    ///
    /// Candidate starts are `0, stride, 2*stride, …` below
    /// `total - chunk + stride`; candidates that would run past the waveform
    /// are dropped rather than padded, so every returned range spans exactly
    /// `chunk` samples. A degenerate geometry (`chunk == 0` or `stride == 0`)
    /// yields an empty plan.
    pub fn plan(&self, total_samples: usize) -> SegmentPlan {
        let chunk = (total_samples as f64 * self.window) as usize;
        let stride = (chunk as f64 * (1.0 - self.overlap)) as usize;
        if chunk == 0 || stride == 0 || chunk > total_samples {
            return SegmentPlan::empty(chunk, stride);
        }
        let limit = total_samples - chunk + stride;
        let mut ranges = Vec::new();
        let mut start = 0usize;
        while start < limit {
            let end = start + chunk;
            if end <= total_samples {
                ranges.push((start, end));
            }
            start += stride;
        }
        SegmentPlan {
            chunk,
            stride,
            ranges,
        }
    }
}
