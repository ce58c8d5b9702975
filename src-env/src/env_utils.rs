//! Environment variable utilities
//!
//! `DIFFEVO_DIR` points to the project root. When it is not set the current
//! working directory is used instead.

use crate::constants::{DATA_GENERATED, DIFFEVO_DIR, RECORDS};
use std::env;
use std::path::{Path, PathBuf};

/// Error type for environment variable issues
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("DIFFEVO_DIR points to a non-existent directory: {0}")]
    DiffevoDirNotFound(PathBuf),

    #[error("DIFFEVO_DIR is not set and the current directory is unavailable: {0}")]
    CurrentDirUnavailable(std::io::Error),

    #[error("Failed to create {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn resolve_root(value: Option<String>) -> Result<PathBuf, EnvError> {
    match value {
        Some(dir) if !dir.is_empty() => {
            let path = PathBuf::from(dir);
            if !path.is_dir() {
                return Err(EnvError::DiffevoDirNotFound(path));
            }
            Ok(path)
        }
        _ => env::current_dir().map_err(EnvError::CurrentDirUnavailable),
    }
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, EnvError> {
    if !path.exists() {
        std::fs::create_dir_all(&path)
            .map_err(|source| EnvError::DirectoryCreationFailed { path: path.clone(), source })?;
    }
    Ok(path)
}

/// Project root: `DIFFEVO_DIR`, or the current directory when unset
///
/// # Example
///
/// ```no_run
/// use diffevo_env::env_utils::get_diffevo_dir;
///
/// let root = get_diffevo_dir()?;
/// println!("project directory: {}", root.display());
/// # Ok::<(), diffevo_env::env_utils::EnvError>(())
/// ```
pub fn get_diffevo_dir() -> Result<PathBuf, EnvError> {
    resolve_root(env::var(DIFFEVO_DIR).ok())
}

/// `data_generated` under `root`, created if necessary
pub fn data_generated_in(root: &Path) -> Result<PathBuf, EnvError> {
    ensure_dir(root.join(DATA_GENERATED))
}

/// Path to the data_generated directory, creating it if necessary
pub fn get_data_generated_dir() -> Result<PathBuf, EnvError> {
    data_generated_in(&get_diffevo_dir()?)
}

/// `data_generated/records` under `root`, created if necessary
pub fn records_dir_in(root: &Path) -> Result<PathBuf, EnvError> {
    ensure_dir(data_generated_in(root)?.join(RECORDS))
}

/// Path to data_generated/records, creating it if necessary
pub fn get_records_dir() -> Result<PathBuf, EnvError> {
    records_dir_in(&get_diffevo_dir()?)
}

/// `explicit` when given (created if necessary), otherwise the data_generated directory
pub fn output_dir_or_default(explicit: Option<&Path>) -> Result<PathBuf, EnvError> {
    match explicit {
        Some(dir) => ensure_dir(dir.to_path_buf()),
        None => get_data_generated_dir(),
    }
}
