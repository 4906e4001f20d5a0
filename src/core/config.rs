use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::transforms::TransformSpec;
use crate::utils::io;

/// File looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE: &str = "rescribe.json";

/// Root configuration structure for rescribe.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescribeConfig {
    #[serde(default = "default_dir")]
    pub dir: String,

    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Glob patterns matched against file names; matching files are skipped.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Transforms applied when `run` is given no names.
    #[serde(default = "default_transforms")]
    pub transforms: Vec<String>,

    #[serde(default)]
    pub custom: Vec<TransformSpec>,
}

impl Default for RescribeConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            suffix: default_suffix(),
            exclude: Vec::new(),
            transforms: default_transforms(),
            custom: Vec::new(),
        }
    }
}

fn default_dir() -> String {
    "src/test".to_string()
}

fn default_suffix() -> String {
    ".integration.test.ts".to_string()
}

fn default_transforms() -> Vec<String> {
    vec!["add-derivation".to_string()]
}

impl RescribeConfig {
    /// Load from `explicit`, else `./rescribe.json` if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let local = PathBuf::from(CONFIG_FILE);
                if !local.is_file() {
                    return Ok(Self::default());
                }
                local
            }
        };

        let config = Self::from_file(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = io::read_file(path, "read config")?;
        serde_json::from_str(&content)
            .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
    }

    pub fn validate(&self) -> Result<()> {
        if self.suffix.is_empty() {
            return Err(Error::config_invalid_value(
                "suffix",
                Some(String::new()),
                "Suffix must not be empty",
            ));
        }
        if self.dir.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "dir",
                Some(self.dir.clone()),
                "Directory must not be empty",
            ));
        }
        for pattern in &self.exclude {
            if pattern.is_empty() {
                return Err(Error::config_invalid_value(
                    "exclude",
                    Some(String::new()),
                    "Exclude patterns must not be empty",
                ));
            }
        }
        Ok(())
    }

    /// Apply command-line overrides and re-validate.
    pub fn with_overrides(mut self, dir: Option<String>, suffix: Option<String>) -> Result<Self> {
        if let Some(dir) = dir {
            self.dir = dir;
        }
        if let Some(suffix) = suffix {
            self.suffix = suffix;
        }
        self.validate()?;
        Ok(self)
    }

    /// Target directory with a leading `~` expanded.
    pub fn resolved_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.dir).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_object_yields_defaults() {
        let config: RescribeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RescribeConfig::default());
        assert_eq!(config.dir, "src/test");
        assert_eq!(config.suffix, ".integration.test.ts");
        assert_eq!(config.transforms, vec!["add-derivation"]);
    }

    #[test]
    fn from_file_reads_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{ "dir": "tests/api", "exclude": ["legacy.*"], "transforms": ["fix-tests"] }"#,
        )
        .unwrap();

        let config = RescribeConfig::load(Some(&path)).unwrap();
        assert_eq!(config.dir, "tests/api");
        assert_eq!(config.suffix, ".integration.test.ts");
        assert_eq!(config.exclude, vec!["legacy.*"]);
        assert_eq!(config.transforms, vec!["fix-tests"]);
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ \"dir\": ").unwrap();

        let err = RescribeConfig::load(Some(&path)).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn empty_suffix_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "suffix": "" }"#).unwrap();

        let err = RescribeConfig::load(Some(&path)).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }

    #[test]
    fn missing_explicit_config_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = RescribeConfig::load(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = RescribeConfig::default()
            .with_overrides(Some("tests/e2e".to_string()), Some(".test.ts".to_string()))
            .unwrap();
        assert_eq!(config.dir, "tests/e2e");
        assert_eq!(config.suffix, ".test.ts");

        assert!(RescribeConfig::default()
            .with_overrides(None, Some(String::new()))
            .is_err());
    }

    #[test]
    fn resolved_dir_expands_tilde() {
        let config = RescribeConfig {
            dir: "~/tests".to_string(),
            ..RescribeConfig::default()
        };
        let resolved = config.resolved_dir();
        assert!(!resolved.to_string_lossy().starts_with('~') || std::env::var("HOME").is_err());
        assert!(resolved.ends_with("tests"));
    }

    #[test]
    fn custom_transforms_deserialize() {
        let config: RescribeConfig = serde_json::from_str(
            r#"{ "custom": [ { "name": "drop-only", "passes": [
                { "type": "content", "pattern": "\\.only\\(", "replace": "(" }
            ] } ] }"#,
        )
        .unwrap();
        assert_eq!(config.custom.len(), 1);
        assert_eq!(config.custom[0].name, "drop-only");
    }
}
