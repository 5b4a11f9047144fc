//! Pipeline settings loaded from a TOML file with per-field defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app_dirs;

mod defaults;

/// Name of the settings file inside the application directory.
pub const CONFIG_FILE_NAME: &str = "genrescope.toml";

/// Errors that can occur while loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No application directory could be resolved.
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
    /// Failed to read the settings file.
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Settings file is not valid TOML.
    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Settings parsed but describe an unusable pipeline.
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Tunable parameters of the frame pipeline and its acquisition boundary.
///
/// The spectral constants (FFT size, hop, mel bins) are deliberately not
/// here: they are fixed by the trained classifier's input features and live
/// as crate constants in [`crate::analysis::spectrogram`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Fraction of total waveform duration covered by one segment.
    #[serde(default = "defaults::window_ratio")]
    pub window: f64,
    /// Fraction of a segment shared with its successor.
    #[serde(default = "defaults::overlap_ratio")]
    pub overlap: f64,
    /// Time steps every classifier frame is normalized to.
    #[serde(default = "defaults::max_length")]
    pub max_length: usize,
    /// Sample rate waveforms are resampled to before analysis.
    #[serde(default = "defaults::analysis_sample_rate")]
    pub analysis_sample_rate: u32,
    /// Clips longer than this many seconds are rejected before decode.
    #[serde(default = "defaults::max_clip_seconds")]
    pub max_clip_seconds: f32,
    /// Ordered class vocabulary; the order drives ranking tie-breaks.
    #[serde(default = "defaults::class_vocabulary")]
    pub vocabulary: Vec<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            window: defaults::window_ratio(),
            overlap: defaults::overlap_ratio(),
            max_length: defaults::max_length(),
            analysis_sample_rate: defaults::analysis_sample_rate(),
            max_clip_seconds: defaults::max_clip_seconds(),
            vocabulary: defaults::class_vocabulary(),
        }
    }
}

impl PipelineSettings {
    /// Reject geometries the pipeline cannot run on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.window > 0.0 && self.window < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "window must be in (0, 1), got {}",
                self.window
            )));
        }
        if !(self.overlap >= 0.0 && self.overlap < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "overlap must be in [0, 1), got {}",
                self.overlap
            )));
        }
        if self.max_length == 0 {
            return Err(ConfigError::Invalid("max_length must be positive".into()));
        }
        if self.analysis_sample_rate == 0 {
            return Err(ConfigError::Invalid(
                "analysis_sample_rate must be positive".into(),
            ));
        }
        if !(self.max_clip_seconds > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_clip_seconds must be positive, got {}",
                self.max_clip_seconds
            )));
        }
        if self.vocabulary.is_empty() {
            return Err(ConfigError::Invalid("vocabulary must not be empty".into()));
        }
        Ok(())
    }
}

/// Resolve the settings file path inside the application directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from the default location, falling back to defaults when
/// the file does not exist.
pub fn load_or_default() -> Result<PipelineSettings, ConfigError> {
    load_from(&config_path()?)
}

/// Load settings from an explicit path; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<PipelineSettings, ConfigError> {
    if !path.exists() {
        return Ok(PipelineSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: PipelineSettings =
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    settings.validate()?;
    Ok(settings)
}
