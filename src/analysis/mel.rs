//! Triangular mel filter bank applied to power spectra.

/// Sparse triangular filters mapping FFT power bins onto mel bands.
pub(crate) struct MelFilterBank {
    filters: Vec<Vec<(usize, f32)>>,
}

impl MelFilterBank {
    /// Build a bank spanning 0 Hz to Nyquist with `mel_bands` filters.
    pub(crate) fn new(sample_rate: u32, fft_len: usize, mel_bands: usize) -> Self {
        let nyquist = sample_rate.max(1) as f32 * 0.5;
        let bins = band_edge_bins(sample_rate, fft_len, mel_bands, 0.0, nyquist);
        let filters = build_filters(&bins, mel_bands);
        Self { filters }
    }

    pub(crate) fn bands(&self) -> usize {
        self.filters.len()
    }

    /// Apply the bank to one power spectrum, writing one value per band.
    pub(crate) fn apply_into(&self, power: &[f32], out: &mut [f32]) {
        for (idx, filter) in self.filters.iter().enumerate() {
            let mut sum = 0.0_f64;
            for &(bin, weight) in filter {
                let p = power.get(bin).copied().unwrap_or(0.0).max(0.0) as f64;
                sum += p * weight as f64;
            }
            if let Some(slot) = out.get_mut(idx) {
                *slot = sum as f32;
            }
        }
    }
}

/// FFT bin indices of the `mel_bands + 2` band edges, equally spaced in mel.
fn band_edge_bins(
    sample_rate: u32,
    fft_len: usize,
    mel_bands: usize,
    f_min: f32,
    f_max: f32,
) -> Vec<usize> {
    let nyquist = sample_rate.max(1) as f32 * 0.5;
    let f_max = f_max.min(nyquist).max(f_min);
    let mel_min = hz_to_mel(f_min);
    let mel_max = hz_to_mel(f_max);
    let mut edges = Vec::with_capacity(mel_bands + 2);
    for i in 0..(mel_bands + 2) {
        let t = i as f32 / (mel_bands + 1) as f32;
        edges.push(mel_to_hz(mel_min + (mel_max - mel_min) * t));
    }
    edges
        .into_iter()
        .map(|hz| freq_to_bin(hz, sample_rate, fft_len))
        .collect()
}

fn build_filters(bins: &[usize], mel_bands: usize) -> Vec<Vec<(usize, f32)>> {
    let mut filters = Vec::with_capacity(mel_bands);
    for m in 0..mel_bands {
        let left = bins[m];
        let center = bins[m + 1];
        let right = bins[m + 2].max(center + 1);
        filters.push(build_tri_filter(left, center, right));
    }
    filters
}

fn build_tri_filter(left: usize, center: usize, right: usize) -> Vec<(usize, f32)> {
    let mut weights = Vec::new();
    if right <= left {
        return weights;
    }
    for bin in left..=right {
        let w = if bin < center {
            if center == left {
                0.0
            } else {
                (bin as f32 - left as f32) / (center as f32 - left as f32)
            }
        } else if right == center {
            0.0
        } else {
            (right as f32 - bin as f32) / (right as f32 - center as f32)
        };
        if w > 0.0 {
            weights.push((bin, w));
        }
    }
    weights
}

fn freq_to_bin(freq_hz: f32, sample_rate: u32, fft_len: usize) -> usize {
    let nyquist = sample_rate.max(1) as f32 * 0.5;
    let freq = freq_hz.clamp(0.0, nyquist);
    (((freq * fft_len as f32) / sample_rate.max(1) as f32).floor() as usize).min(fft_len / 2)
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0_f32 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0_f32 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}
