use std::f32::consts::PI;

/// Minimal complex sample used by the in-crate FFT.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Complex32 {
    pub(crate) re: f32,
    pub(crate) im: f32,
}

impl Complex32 {
    pub(crate) fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    fn mul(self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }

    fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }

    fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }
}

/// Hann window of the given length.
pub(crate) fn hann_window(length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0_f32; length.max(1)];
    }
    let denom = (length - 1) as f32;
    (0..length)
        .map(|n| 0.5_f32 * (1.0 - (2.0 * PI * n as f32 / denom).cos()))
        .collect()
}

/// Precomputed radix-2 FFT: bit-reversal swaps plus per-stage twiddle tables.
///
/// The spectral frontend runs one transform per analysis hop, so a plan is
/// built once per clip and reused for every frame.
pub(crate) struct FftPlan {
    len: usize,
    bit_swaps: Vec<(usize, usize)>,
    twiddles: Vec<Vec<Complex32>>,
}

impl FftPlan {
    pub(crate) fn new(len: usize) -> Result<Self, String> {
        if len == 0 || !len.is_power_of_two() {
            return Err(format!("FFT length must be power-of-two, got {len}"));
        }
        Ok(Self {
            len,
            bit_swaps: build_bit_swaps(len),
            twiddles: build_twiddle_tables(len),
        })
    }

    /// Run the forward transform in place.
    pub(crate) fn forward(&self, buffer: &mut [Complex32]) -> Result<(), String> {
        if buffer.len() != self.len {
            return Err(format!(
                "FFT length mismatch: buffer {} plan {}",
                buffer.len(),
                self.len
            ));
        }
        for &(i, j) in &self.bit_swaps {
            buffer.swap(i, j);
        }
        for stage in &self.twiddles {
            apply_stage(buffer, stage);
        }
        Ok(())
    }
}

fn build_bit_swaps(len: usize) -> Vec<(usize, usize)> {
    let mut swaps = Vec::new();
    let mut j = 0usize;
    for i in 1..len {
        let mut bit = len >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            swaps.push((i, j));
        }
    }
    swaps
}

fn build_twiddle_tables(len: usize) -> Vec<Vec<Complex32>> {
    let mut tables = Vec::new();
    let mut step = 2usize;
    while step <= len {
        let half = step / 2;
        let angle = -2.0_f32 * PI / step as f32;
        let mut stage = Vec::with_capacity(half);
        for i in 0..half {
            let theta = angle * i as f32;
            let (sin, cos) = theta.sin_cos();
            stage.push(Complex32::new(cos, sin));
        }
        tables.push(stage);
        step *= 2;
    }
    tables
}

fn apply_stage(buffer: &mut [Complex32], twiddles: &[Complex32]) {
    let half = twiddles.len();
    let step = half * 2;
    for start in (0..buffer.len()).step_by(step) {
        for i in 0..half {
            let u = buffer[start + i];
            let v = buffer[start + i + half].mul(twiddles[i]);
            buffer[start + i] = u.add(v);
            buffer[start + i + half] = u.sub(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_window_is_symmetric_and_zero_at_edges() {
        let w = hann_window(8);
        assert!(w[0].abs() < 1e-6);
        assert!(w[7].abs() < 1e-6);
        assert!((w[1] - w[6]).abs() < 1e-6);
    }

    #[test]
    fn plan_rejects_non_power_of_two_lengths() {
        assert!(FftPlan::new(0).is_err());
        assert!(FftPlan::new(1000).is_err());
        assert!(FftPlan::new(2048).is_ok());
    }

    #[test]
    fn constant_signal_concentrates_in_dc_bin() {
        let plan = FftPlan::new(8).unwrap();
        let mut buf = vec![Complex32::new(1.0, 0.0); 8];
        plan.forward(&mut buf).unwrap();
        assert!((buf[0].re - 8.0).abs() < 1e-4);
        for bin in 1..8 {
            assert!(buf[bin].re.abs() < 1e-4);
            assert!(buf[bin].im.abs() < 1e-4);
        }
    }

    #[test]
    fn single_tone_peaks_at_its_bin() {
        let plan = FftPlan::new(32).unwrap();
        let mut buf: Vec<Complex32> = (0..32)
            .map(|n| Complex32::new((2.0 * PI * 4.0 * n as f32 / 32.0).cos(), 0.0))
            .collect();
        plan.forward(&mut buf).unwrap();
        let magnitudes: Vec<f32> = buf
            .iter()
            .take(16)
            .map(|c| (c.re * c.re + c.im * c.im).sqrt())
            .collect();
        let peak = magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(idx, _)| idx)
            .unwrap();
        assert_eq!(peak, 4);
    }
}
