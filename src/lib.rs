//! Fixed-shape mel-spectrogram frames and clip-level prediction aggregation
//! for genre classification.
/// Acquisition boundary and local-file clip source.
pub mod acquire;
/// Feature extraction pipeline.
pub mod analysis;
/// Application directory helpers.
pub mod app_dirs;
/// External classifier seam.
pub mod classify;
/// Settings types and TOML loading.
pub mod config;
/// Bulk corpus preparation.
pub mod corpus;
/// Tracing setup.
pub mod logging;
/// Vocabulary and score aggregation.
pub mod predict;
/// Clip classification orchestration.
pub mod service;

mod audio;
mod audio_decode;
