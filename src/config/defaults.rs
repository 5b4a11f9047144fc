pub(super) fn window_ratio() -> f64 {
    0.06
}

pub(super) fn overlap_ratio() -> f64 {
    0.3
}

pub(super) fn max_length() -> usize {
    78
}

pub(super) fn analysis_sample_rate() -> u32 {
    22_050
}

pub(super) fn max_clip_seconds() -> f32 {
    600.0
}

pub(super) fn class_vocabulary() -> Vec<String> {
    [
        "blues",
        "classical",
        "country",
        "disco",
        "hiphop",
        "jazz",
        "metal",
        "pop",
        "reggae",
        "rock",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
