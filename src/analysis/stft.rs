//! Hann-windowed short-time power spectra for the spectrogram frontend.

use super::fft::{Complex32, FftPlan, hann_window};

/// Reusable STFT state: window, FFT plan and scratch buffers.
pub(crate) struct StftAnalyzer {
    n_fft: usize,
    hop: usize,
    window: Vec<f32>,
    plan: FftPlan,
    fft_buf: Vec<Complex32>,
}

impl StftAnalyzer {
    pub(crate) fn new(n_fft: usize, hop: usize) -> Result<Self, String> {
        let n_fft = n_fft.max(1);
        let hop = hop.max(1);
        Ok(Self {
            n_fft,
            hop,
            window: hann_window(n_fft),
            plan: FftPlan::new(n_fft)?,
            fft_buf: vec![Complex32::default(); n_fft],
        })
    }

    pub(crate) fn spectrum_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Number of analysis frames for a segment of `sample_len` samples.
    ///
    /// Frame starts are `0, hop, 2*hop, …` up to and including `sample_len`,
    /// so the count is `sample_len / hop + 1` regardless of how the final
    /// window straddles the segment end.
    pub(crate) fn frame_count(&self, sample_len: usize) -> usize {
        sample_len / self.hop + 1
    }

    /// Compute the power spectrum of the frame starting at `start`, writing
    /// `spectrum_bins()` values into `out`. Samples past the segment end are
    /// treated as zeros.
    pub(crate) fn power_frame_into(
        &mut self,
        samples: &[f32],
        start: usize,
        out: &mut [f32],
    ) -> Result<(), String> {
        for (i, cell) in self.fft_buf.iter_mut().enumerate() {
            let src = samples.get(start + i).copied().unwrap_or(0.0);
            let win = self.window.get(i).copied().unwrap_or(1.0);
            *cell = Complex32::new(sanitize(src) * win, 0.0);
        }
        self.plan.forward(&mut self.fft_buf)?;
        let bins = self.spectrum_bins();
        for bin in 0..bins {
            let c = self.fft_buf[bin];
            if let Some(slot) = out.get_mut(bin) {
                *slot = (c.re * c.re + c.im * c.im).max(0.0);
            }
        }
        Ok(())
    }

    pub(crate) fn hop(&self) -> usize {
        self.hop
    }
}

fn sanitize(sample: f32) -> f32 {
    if !sample.is_finite() {
        return 0.0;
    }
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped != 0.0 && clamped.abs() < f32::MIN_POSITIVE {
        0.0
    } else {
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_follows_hop_convention() {
        let stft = StftAnalyzer::new(2048, 512).unwrap();
        assert_eq!(stft.frame_count(0), 1);
        assert_eq!(stft.frame_count(511), 1);
        assert_eq!(stft.frame_count(512), 2);
        assert_eq!(stft.frame_count(6_000), 12);
    }

    #[test]
    fn power_frame_is_finite_and_nonnegative() {
        let mut stft = StftAnalyzer::new(512, 160).unwrap();
        let samples: Vec<f32> = (0..1_000).map(|n| (n as f32 * 0.05).sin()).collect();
        let mut out = vec![0.0_f32; stft.spectrum_bins()];
        stft.power_frame_into(&samples, 0, &mut out).unwrap();
        assert!(out.iter().all(|v| v.is_finite() && *v >= 0.0));
        assert!(out.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn frame_past_segment_end_is_zero_padded() {
        let mut stft = StftAnalyzer::new(512, 160).unwrap();
        let samples = vec![0.5_f32; 100];
        let mut out = vec![0.0_f32; stft.spectrum_bins()];
        // Start beyond the last sample: the whole window reads as silence.
        stft.power_frame_into(&samples, 100, &mut out).unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn non_finite_samples_are_silenced() {
        let mut stft = StftAnalyzer::new(512, 160).unwrap();
        let samples = vec![f32::NAN; 512];
        let mut out = vec![0.0_f32; stft.spectrum_bins()];
        stft.power_frame_into(&samples, 0, &mut out).unwrap();
        assert!(out.iter().all(|v| v.is_finite()));
    }
}
