//! Application directory helpers anchored to a single `.genrescope` folder.
//!
//! Config and log files live under the OS config directory by default; a
//! `GENRESCOPE_CONFIG_HOME` override redirects everything for tests and
//! portable setups.

use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

/// Name of the application directory under the OS config root.
pub const APP_DIR_NAME: &str = ".genrescope";

/// Environment variable overriding the base directory.
pub const CONFIG_HOME_ENV: &str = "GENRESCOPE_CONFIG_HOME";

/// Errors that can occur while resolving or preparing application directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// No suitable base config directory could be resolved.
    #[error("No suitable base config directory available for application files")]
    NoBaseDir,
    /// Failed to create the application directory.
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Return the root `.genrescope` directory, creating it if needed.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = config_base_dir().ok_or(AppDirError::NoBaseDir)?;
    let path = base.join(APP_DIR_NAME);
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Return the logs directory inside the `.genrescope` root, creating it if needed.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    let path = app_root_dir()?.join("logs");
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn config_base_dir() -> Option<PathBuf> {
    if let Some(overridden) = std::env::var_os(CONFIG_HOME_ENV) {
        if !overridden.is_empty() {
            return Some(PathBuf::from(overridden));
        }
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_root_lives_under_the_env_override() {
        let dir = tempfile::tempdir().unwrap();
        // SAFETY: test-only env mutation; no other thread in this test binary
        // reads the override concurrently.
        unsafe { std::env::set_var(CONFIG_HOME_ENV, dir.path()) };
        let root = app_root_dir().unwrap();
        assert!(root.starts_with(dir.path()));
        assert!(root.ends_with(APP_DIR_NAME));
        assert!(root.is_dir());
        let logs = logs_dir().unwrap();
        assert!(logs.starts_with(&root));
        unsafe { std::env::remove_var(CONFIG_HOME_ENV) };
    }
}
