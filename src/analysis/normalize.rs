//! Time-axis shape normalization for classifier input frames.

use ndarray::{Array2, s};

/// Force a spectrogram frame to exactly `max_length` time steps.
///
/// Shorter frames gain zero columns on the right edge; longer frames keep the
/// earliest `max_length` columns and drop the tail. The mel axis is never
/// touched. Truncation loses late-time detail and padding injects artificial
/// silence; both are accepted so every frame matches the classifier's fixed
/// input shape.
pub fn fit_time_axis(frame: Array2<f32>, max_length: usize) -> Array2<f32> {
    let (bands, steps) = frame.dim();
    if steps == max_length {
        return frame;
    }
    if steps > max_length {
        return frame.slice(s![.., ..max_length]).to_owned();
    }
    let mut padded = Array2::<f32>::zeros((bands, max_length));
    padded.slice_mut(s![.., ..steps]).assign(&frame);
    padded
}
