pub mod wav;

/// Deterministic test tone: a quiet 440 Hz sine.
pub fn tone(len: usize, sample_rate: u32) -> Vec<f32> {
    (0..len)
        .map(|n| {
            (2.0 * std::f32::consts::PI * 440.0 * n as f32 / sample_rate as f32).sin() * 0.4
        })
        .collect()
}
