//! Configuration for the polyschema CLI.
//!
//! Loads config from:
//! 1. Global: `<config dir>/polyschema/config.toml`
//! 2. Per-project: `.polyschema/config.toml` (overrides global, field by field)
//!
//! Example config.toml:
//! ```toml
//! [convert]
//! from = "sql"
//! to = "java"
//!
//! [log]
//! level = "info"
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default domains for `convert` and `inspect`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// An `EnvFilter` directive such as `info` or `polyschema=debug`.
    pub level: Option<String>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolyschemaConfig {
    pub convert: ConvertConfig,
    pub log: LogConfig,
}

impl PolyschemaConfig {
    /// Load the global config, then the project config under `root` on top.
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        Self::load_from(&Self::project_config_path(root), Self::global_config_path().as_deref())
    }

    fn load_from(project: &Path, global: Option<&Path>) -> anyhow::Result<Self> {
        let global = match global {
            Some(path) => Self::load_file(path)?,
            None => None,
        };
        let project = Self::load_file(project)?;
        Ok(project.unwrap_or_default().merge(global.unwrap_or_default()))
    }

    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(".polyschema").join("config.toml")
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("polyschema").join("config.toml"))
    }

    /// A missing file is `None`; an unreadable or malformed one is an error.
    fn load_file(path: &Path) -> anyhow::Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
        };
        let config = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Some(config))
    }

    /// Fill fields unset in `self` from `fallback`.
    fn merge(self, fallback: Self) -> Self {
        Self {
            convert: ConvertConfig {
                from: self.convert.from.or(fallback.convert.from),
                to: self.convert.to.or(fallback.convert.to),
            },
            log: LogConfig {
                level: self.log.level.or(fallback.log.level),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, text: &str) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn missing_files_give_defaults() {
        let dir = TempDir::new().unwrap();
        let config = PolyschemaConfig::load_from(&dir.path().join("nope.toml"), None).unwrap();
        assert_eq!(config, PolyschemaConfig::default());
    }

    #[test]
    fn project_overrides_global_per_field() {
        let dir = TempDir::new().unwrap();
        let global = write(
            &dir.path().join("global"),
            "[convert]\nfrom = \"sql\"\nto = \"java\"\n\n[log]\nlevel = \"info\"\n",
        );
        let project = write(&dir.path().join(".polyschema"), "[convert]\nto = \"csharp\"\n");

        let config = PolyschemaConfig::load_from(&project, Some(&global)).unwrap();
        assert_eq!(config.convert.from.as_deref(), Some("sql"));
        assert_eq!(config.convert.to.as_deref(), Some("csharp"));
        assert_eq!(config.log.level.as_deref(), Some("info"));
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let project = write(dir.path(), "[convert]\nfrom = 3\n");
        let err = PolyschemaConfig::load_from(&project, None).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn project_path_layout() {
        let path = PolyschemaConfig::project_config_path(Path::new("/work"));
        assert_eq!(path, Path::new("/work/.polyschema/config.toml"));
    }
}
