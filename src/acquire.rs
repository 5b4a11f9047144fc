//! Acquisition boundary: turning a source identifier into an analysis-ready
//! mono waveform.
//!
//! Network/video acquisition lives outside this crate; [`ClipSource`] is its
//! seam. The in-tree [`FileClipSource`] covers local files and enforces the
//! same contract a remote source must: reject unsupported and over-long
//! material with distinct variants before heavy processing begins.

use std::path::{Path, PathBuf};

use crate::audio::{downmix_to_mono, resample_linear};
use crate::audio_decode;
use crate::config::PipelineSettings;

/// File extensions the local source will attempt to decode.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "flac", "ogg", "m4a", "mp4", "aac", "aiff", "aif",
];

/// Distinct acquisition failures, matched exhaustively by callers.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    /// The source is not something this acquirer can handle at all.
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),
    /// The clip is longer than the configured ceiling.
    #[error("Clip duration {actual_seconds:.1}s exceeds the {limit_seconds:.0}s limit")]
    DurationExceeded {
        actual_seconds: f32,
        limit_seconds: f32,
    },
    /// The source looked acceptable but could not be decoded.
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

/// A decoded clip ready for the frame pipeline.
#[derive(Debug, Clone)]
pub struct AcquiredClip {
    /// Mono samples at [`AcquiredClip::sample_rate`].
    pub mono: Vec<f32>,
    pub sample_rate: u32,
    /// Human-readable title for presentation use.
    pub title: String,
}

/// Anything that can resolve a source identifier into a waveform.
pub trait ClipSource {
    fn fetch(&self, source: &str) -> Result<AcquiredClip, AcquireError>;
}

/// Local-file acquisition with an up-front duration cap.
///
/// The declared duration is checked from container metadata before the full
/// decode; containers that do not declare one are decoded with a hard cap and
/// re-checked, so an over-long clip never reaches analysis either way.
#[derive(Debug, Clone)]
pub struct FileClipSource {
    analysis_sample_rate: u32,
    max_clip_seconds: f32,
}

impl FileClipSource {
    pub fn new(settings: &PipelineSettings) -> Self {
        Self {
            analysis_sample_rate: settings.analysis_sample_rate,
            max_clip_seconds: settings.max_clip_seconds,
        }
    }

    fn check_declared_duration(&self, path: &Path) -> Result<(), AcquireError> {
        let declared = if has_extension(path, "wav") {
            wav_duration_seconds(path)
        } else {
            audio_decode::probe_duration_seconds(path).unwrap_or(None)
        };
        match declared {
            Some(seconds) if seconds > self.max_clip_seconds => {
                Err(AcquireError::DurationExceeded {
                    actual_seconds: seconds,
                    limit_seconds: self.max_clip_seconds,
                })
            }
            _ => Ok(()),
        }
    }
}

impl ClipSource for FileClipSource {
    fn fetch(&self, source: &str) -> Result<AcquiredClip, AcquireError> {
        let path = Path::new(source);
        if !is_supported(path) {
            return Err(AcquireError::UnsupportedSource(source.to_string()));
        }
        self.check_declared_duration(path)?;

        // Decode at most one second past the ceiling: enough to notice an
        // undeclared over-long stream without materializing all of it.
        let decoded = audio_decode::decode_audio(path, Some(self.max_clip_seconds + 1.0))
            .map_err(|reason| AcquireError::Decode {
                path: path.to_path_buf(),
                reason,
            })?;
        let decoded_seconds = decoded.samples.len() as f32
            / decoded.channels.max(1) as f32
            / decoded.sample_rate.max(1) as f32;
        if decoded_seconds > self.max_clip_seconds {
            return Err(AcquireError::DurationExceeded {
                actual_seconds: decoded_seconds,
                limit_seconds: self.max_clip_seconds,
            });
        }

        let mono = downmix_to_mono(&decoded.samples, decoded.channels);
        let mono = resample_linear(&mono, decoded.sample_rate, self.analysis_sample_rate);
        Ok(AcquiredClip {
            mono,
            sample_rate: self.analysis_sample_rate,
            title: clip_title(path),
        })
    }
}

/// Decode a local file to mono at `target_rate` with no duration ceiling.
///
/// Corpus preparation path: bulk training material is trusted input and is
/// not subject to the acquisition cap.
pub(crate) fn load_mono(path: &Path, target_rate: u32) -> Result<Vec<f32>, String> {
    let decoded = audio_decode::decode_audio(path, None)?;
    let mono = downmix_to_mono(&decoded.samples, decoded.channels);
    Ok(resample_linear(&mono, decoded.sample_rate, target_rate))
}

pub(crate) fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// Fast WAV duration read from the header, no sample decode.
fn wav_duration_seconds(path: &Path) -> Option<f32> {
    let reader = hound::WavReader::open(path).ok()?;
    let spec = reader.spec();
    let total_samples = reader.len() as f32;
    Some(total_samples / spec.channels.max(1) as f32 / spec.sample_rate.max(1) as f32)
}

fn clip_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("clip")
        .to_string()
}
