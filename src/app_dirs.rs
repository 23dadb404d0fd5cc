//! Where inkmark keeps `inkmark.toml`, its JSON documents and its logs.
//!
//! Layout under the base directory (the OS config dir unless redirected):
//!
//! ```text
//! .inkmark/
//!   inkmark.toml
//!   data/<key>.json
//!   logs/inkmark_<timestamp>.log
//! ```

use std::{
    path::PathBuf,
    sync::{LazyLock, Mutex},
};

use directories::BaseDirs;
use thiserror::Error;

/// Folder created inside the base directory.
pub const APP_DIR_NAME: &str = ".inkmark";
/// Environment variable naming a base directory to use instead of the OS one.
pub const CONFIG_HOME_ENV: &str = "INKMARK_CONFIG_HOME";

static BASE_OVERRIDE: LazyLock<Mutex<Option<PathBuf>>> = LazyLock::new(|| Mutex::new(None));

/// Errors raised while locating or creating the inkmark folders.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// Neither an override nor an OS config directory is available.
    #[error("Cannot locate a base directory for inkmark data")]
    NoBaseDir,
    /// A folder could not be created.
    #[error("Cannot create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// `.inkmark` under the base directory. Created on demand, like every helper here.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = base_dir().ok_or(AppDirError::NoBaseDir)?;
    ensure_dir(base.join(APP_DIR_NAME))
}

/// Per-launch log files.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    subdir(LOGS_SUBDIR)
}

/// Documents written by `FileKeyValueStore`.
pub fn data_dir() -> Result<PathBuf, AppDirError> {
    subdir(DATA_SUBDIR)
}

const LOGS_SUBDIR: &str = "logs";
const DATA_SUBDIR: &str = "data";

fn subdir(name: &str) -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join(name))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    match std::fs::create_dir_all(&path) {
        Ok(()) => Ok(path),
        Err(source) => Err(AppDirError::CreateDir { path, source }),
    }
}

/// Test override, then `INKMARK_CONFIG_HOME` (ignored when empty), then the OS.
fn base_dir() -> Option<PathBuf> {
    let overridden = BASE_OVERRIDE.lock().ok().and_then(|guard| guard.clone());
    overridden
        .or_else(|| {
            std::env::var_os(CONFIG_HOME_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()))
}

#[cfg(test)]
fn replace_base_override(path: Option<PathBuf>) {
    let mut guard = BASE_OVERRIDE
        .lock()
        .unwrap_or_else(|err| err.into_inner());
    *guard = path;
}


#[cfg(test)]
mod tests {
    use super::test_support::OverrideGuard;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn uses_override_for_root_dir() {
        let base = tempdir().unwrap();
        let _guard = OverrideGuard::set(base.path().to_path_buf());
        let root = app_root_dir().unwrap();
        assert_eq!(root, base.path().join(APP_DIR_NAME));
        assert!(root.is_dir());
    }

    #[test]
    fn data_and_logs_dirs_nest_under_root() {
        let base = tempdir().unwrap();
        let _guard = OverrideGuard::set(base.path().to_path_buf());
        let root = base.path().join(APP_DIR_NAME);
        assert_eq!(data_dir().unwrap(), root.join("data"));
        assert_eq!(logs_dir().unwrap(), root.join("logs"));
        assert!(root.join("data").is_dir());
    }

    #[test]
    fn missing_base_is_created_on_demand() {
        let base = tempdir().unwrap();
        let nested = base.path().join("not").join("yet");
        let _guard = OverrideGuard::set(nested.clone());
        assert_eq!(app_root_dir().unwrap(), nested.join(APP_DIR_NAME));
        assert!(nested.is_dir());
    }
}
