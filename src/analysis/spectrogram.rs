//! Mel-scaled, decibel-valued spectrogram frames for one waveform segment.

use ndarray::Array2;

use super::mel::MelFilterBank;
use super::stft::StftAnalyzer;

/// FFT window size in samples. Fixed by the trained classifier's features.
pub const STFT_N_FFT: usize = 2048;
/// Stride between short-time analysis frames inside one segment.
pub const STFT_HOP: usize = 512;
/// Mel frequency bins per spectrogram column.
pub const MEL_BANDS: usize = 128;

/// Numerical floor applied before taking log power.
const DB_AMIN: f32 = 1e-10;
/// Dynamic range kept below the per-frame peak, in dB.
const DB_TOP: f32 = 80.0;

/// Converts one segment into a `(MEL_BANDS, time_steps)` decibel frame.
///
/// Decibels are referenced to the maximum mel power within the frame itself,
/// so the peak column is 0 dB and everything else is negative down to
/// `-DB_TOP`. Absolute levels are only comparable within one frame.
pub struct SpectrogramBuilder {
    stft: StftAnalyzer,
    mel_bank: MelFilterBank,
    power_buf: Vec<f32>,
    mel_buf: Vec<f32>,
}

impl SpectrogramBuilder {
    pub fn new(sample_rate: u32) -> Result<Self, String> {
        let stft = StftAnalyzer::new(STFT_N_FFT, STFT_HOP)?;
        let mel_bank = MelFilterBank::new(sample_rate, STFT_N_FFT, MEL_BANDS);
        let power_buf = vec![0.0_f32; stft.spectrum_bins()];
        Ok(Self {
            stft,
            mel_bank,
            power_buf,
            mel_buf: vec![0.0_f32; MEL_BANDS],
        })
    }

    /// Build the dB-scaled mel spectrogram of `segment`.
    ///
    /// The time-step count is `segment.len() / STFT_HOP + 1`, deterministic
    /// for a fixed segment length.
    pub fn build(&mut self, segment: &[f32]) -> Result<Array2<f32>, String> {
        let steps = self.stft.frame_count(segment.len());
        let mut mel = Array2::<f32>::zeros((self.mel_bank.bands(), steps));
        let hop = self.stft.hop();
        for step in 0..steps {
            self.stft
                .power_frame_into(segment, step * hop, &mut self.power_buf)?;
            self.mel_bank.apply_into(&self.power_buf, &mut self.mel_buf);
            let mut column = mel.column_mut(step);
            for (dst, &src) in column.iter_mut().zip(self.mel_buf.iter()) {
                *dst = src;
            }
        }
        power_to_db_in_place(&mut mel);
        Ok(mel)
    }
}

/// In-place conversion of mel power to decibels referenced to the frame max.
///
/// Values are floored at `DB_AMIN` before the log, referenced to the frame's
/// own peak power, then clamped to at most `DB_TOP` below that peak.
fn power_to_db_in_place(mel: &mut Array2<f32>) {
    let reference = mel.iter().copied().fold(0.0_f32, f32::max).max(DB_AMIN);
    let ref_db = 10.0 * reference.log10();
    let mut peak_db = f32::NEG_INFINITY;
    for value in mel.iter_mut() {
        let db = 10.0 * value.max(DB_AMIN).log10() - ref_db;
        *value = db;
        peak_db = peak_db.max(db);
    }
    let floor_db = peak_db - DB_TOP;
    for value in mel.iter_mut() {
        *value = value.max(floor_db);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(len: usize, sample_rate: u32, freq: f32) -> Vec<f32> {
        (0..len)
            .map(|n| {
                (2.0 * std::f32::consts::PI * freq * n as f32 / sample_rate as f32).sin() * 0.5
            })
            .collect()
    }

    #[test]
    fn output_shape_is_mel_bands_by_hop_count() {
        let mut builder = SpectrogramBuilder::new(22_050).unwrap();
        let frame = builder.build(&tone(6_000, 22_050, 440.0)).unwrap();
        assert_eq!(frame.dim(), (MEL_BANDS, 12));
    }

    #[test]
    fn peak_value_is_zero_db() {
        let mut builder = SpectrogramBuilder::new(22_050).unwrap();
        let frame = builder.build(&tone(6_000, 22_050, 440.0)).unwrap();
        let max = frame.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!((max - 0.0).abs() < 1e-4, "per-frame peak must sit at 0 dB, got {max}");
    }

    #[test]
    fn dynamic_range_is_bounded_by_top_db() {
        let mut builder = SpectrogramBuilder::new(22_050).unwrap();
        let frame = builder.build(&tone(6_000, 22_050, 440.0)).unwrap();
        let min = frame.iter().copied().fold(f32::INFINITY, f32::min);
        assert!(min >= -80.0 - 1e-4);
    }

    #[test]
    fn silent_segment_is_all_zero_db() {
        let mut builder = SpectrogramBuilder::new(22_050).unwrap();
        let silence = vec![0.0_f32; 4_096];
        let frame = builder.build(&silence).unwrap();
        assert!(frame.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn rebuilding_the_same_segment_is_bit_identical() {
        let samples = tone(6_000, 22_050, 523.25);
        let mut builder = SpectrogramBuilder::new(22_050).unwrap();
        let a = builder.build(&samples).unwrap();
        let b = builder.build(&samples).unwrap();
        assert_eq!(a, b);
    }
}
