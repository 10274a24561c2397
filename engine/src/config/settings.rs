// Engine settings, loaded from a JSON file when present
use crate::error::EngineError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the CSV datasets.
    pub database_dir: PathBuf,
    /// UGs pre-selected when a page first renders.
    pub default_ugs: Vec<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_dir: PathBuf::from("./database"),
            // 410512 is the unit every page pre-selects.
            default_ugs: vec![410512],
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file. A missing file falls back to the
    /// defaults; a present but malformed file is a configuration error.
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Settings file not found, using defaults");
            return Ok(Settings::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| EngineError::ConfigError(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.database_dir, PathBuf::from("./database"));
        assert_eq!(s.default_ugs, vec![410512]);
    }

    #[test]
    fn test_from_file_missing_uses_defaults() {
        let s = Settings::from_file(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(s.default_ugs, vec![410512]);
    }

    #[test]
    fn test_from_file_partial_json() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{ "default_ugs": [100, 200] }}"#).unwrap();
        let s = Settings::from_file(f.path()).unwrap();
        assert_eq!(s.default_ugs, vec![100, 200]);
        assert_eq!(s.database_dir, PathBuf::from("./database"));
    }

    #[test]
    fn test_from_file_malformed_is_config_error() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        let err = Settings::from_file(f.path()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }
}
