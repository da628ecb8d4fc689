//! # Config Loader
//!
//! Locates configuration files on disk and returns their raw contents.
//! Parsing is left to the caller.
//!
//! ```no_run
//! use config_loader::{find_config_file, load_config_file};
//!
//! let path = find_config_file("payloader.json")?;
//! let content = load_config_file(&path)?;
//! # Ok::<(), config_loader::ConfigError>(())
//! ```

pub mod error;

pub use error::{ConfigError, Result};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "PAYLOADER_CONFIG";

/// Reads the whole configuration file at `path`.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
}

/// Finds `filename` in the usual places.
///
/// Search order:
/// 1. `PAYLOADER_CONFIG` environment variable (if set and the file exists)
/// 2. `./config/{filename}`
/// 3. `./{filename}`
pub fn find_config_file(filename: &str) -> Result<PathBuf> {
    let env_path = env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
    find_in(env_path, Path::new("."), filename)
}

/// Finds and reads `filename` in one step.
pub fn find_and_load(filename: &str) -> Result<String> {
    let path = find_config_file(filename)?;
    load_config_file(path)
}

fn find_in(env_path: Option<PathBuf>, base: &Path, filename: &str) -> Result<PathBuf> {
    if let Some(path) = env_path
        && path.exists()
    {
        return Ok(path);
    }

    let candidates = [base.join("config").join(filename), base.join(filename)];
    candidates
        .into_iter()
        .find(|candidate| candidate.exists())
        .ok_or_else(|| {
            ConfigError::FileNotFound(format!(
                "'{}' (searched: ${}, ./config/{}, ./{})",
                filename, CONFIG_PATH_ENV, filename, filename
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_config_file("/path/that/does/not/exist.json");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("payloader.json");
        fs::write(&path, "{}").unwrap();

        assert_eq!(load_config_file(&path).unwrap(), "{}");
    }

    #[test]
    fn test_find_prefers_config_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        fs::write(dir.path().join("config").join("p.json"), "a").unwrap();
        fs::write(dir.path().join("p.json"), "b").unwrap();

        let found = find_in(None, dir.path(), "p.json").unwrap();
        assert_eq!(found, dir.path().join("config").join("p.json"));
    }

    #[test]
    fn test_find_uses_env_override() {
        let dir = tempdir().unwrap();
        let custom = dir.path().join("custom.json");
        fs::write(&custom, "{}").unwrap();

        let found = find_in(Some(custom.clone()), dir.path(), "p.json").unwrap();
        assert_eq!(found, custom);
    }

    #[test]
    fn test_find_nonexistent_file() {
        let dir = tempdir().unwrap();
        let result = find_in(None, dir.path(), "missing_12345.json");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
