use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, TintError};
use crate::helper::resolve_full_path;

pub const DEFAULT_INPUT_DIR: &str = "input";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_OVERLAY_SUFFIX: &str = "_overlay.png";
pub const DEFAULT_BASE_EXTENSION: &str = ".png";

/// Where to read pairs from, where to write results, and how pairs are named
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub overlay_suffix: String,
    pub base_extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            overlay_suffix: DEFAULT_OVERLAY_SUFFIX.to_string(),
            base_extension: DEFAULT_BASE_EXTENSION.to_string(),
        }
    }
}

/// On-disk shape of the config file. Every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub overlay_suffix: Option<String>,
    pub base_extension: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| TintError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_reader(file).map_err(|e| TintError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Values given on the command line, which win over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub overlay_suffix: Option<String>,
}

impl BatchConfig {
    /// Layer defaults, file values and overrides, then resolve both directories.
    pub fn build(file: Option<ConfigFile>, overrides: Overrides) -> Result<Self> {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let config = Self {
            input_dir: overrides
                .input_dir
                .or(file.input_dir)
                .unwrap_or(defaults.input_dir),
            output_dir: overrides
                .output_dir
                .or(file.output_dir)
                .unwrap_or(defaults.output_dir),
            overlay_suffix: overrides
                .overlay_suffix
                .or(file.overlay_suffix)
                .unwrap_or(defaults.overlay_suffix),
            base_extension: file.base_extension.unwrap_or(defaults.base_extension),
        };

        config.validate()?;

        Ok(Self {
            input_dir: resolve_full_path(&config.input_dir),
            output_dir: resolve_full_path(&config.output_dir),
            ..config
        })
    }

    fn validate(&self) -> Result<()> {
        let bad = |message: &str| TintError::Settings(message.to_string());

        if self.overlay_suffix.is_empty() {
            return Err(bad("overlay suffix must not be empty"));
        }
        if self.overlay_suffix.contains(['/', '\\']) || self.base_extension.contains(['/', '\\']) {
            return Err(bad("suffix and extension must not contain path separators"));
        }
        if self.overlay_suffix == self.base_extension {
            return Err(bad("overlay suffix and base extension must differ"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = BatchConfig::build(None, Overrides::default()).unwrap();
        assert!(config.input_dir.is_absolute());
        assert!(config.input_dir.ends_with("input"));
        assert!(config.output_dir.ends_with("output"));
        assert_eq!(config.overlay_suffix, "_overlay.png");
        assert_eq!(config.base_extension, ".png");
    }

    #[test]
    fn test_file_then_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tint.json");
        let body = serde_json::json!({
            "input_dir": dir.path().join("sources"),
            "output_dir": "from_file",
            "overlay_suffix": "_mask.png",
        });
        std::fs::write(&path, body.to_string()).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        let overrides = Overrides {
            output_dir: Some(dir.path().join("cli_out")),
            ..Overrides::default()
        };
        let config = BatchConfig::build(Some(loaded), overrides).unwrap();

        assert_eq!(config.input_dir, dir.path().join("sources"));
        assert_eq!(config.output_dir, dir.path().join("cli_out"));
        assert_eq!(config.overlay_suffix, "_mask.png");
        assert_eq!(config.base_extension, ".png");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tint.json");
        std::fs::write(&path, r#"{"input": "typo"}"#).unwrap();

        let err = ConfigFile::load(&path).unwrap_err();
        assert!(matches!(err, TintError::Config { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = ConfigFile::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, TintError::Io { .. }));
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let overrides = Overrides {
            overlay_suffix: Some(String::new()),
            ..Overrides::default()
        };
        let err = BatchConfig::build(None, overrides).unwrap_err();
        assert!(matches!(err, TintError::Settings(_)));
    }

    #[test]
    fn test_suffix_equal_to_extension_rejected() {
        let overrides = Overrides {
            overlay_suffix: Some(".png".to_string()),
            ..Overrides::default()
        };
        assert!(BatchConfig::build(None, overrides).is_err());
    }
}
