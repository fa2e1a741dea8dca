//! Task files - which resource, which state, which config
//!
//! A task file holds a list of `[[tasks]]`, each tagged with the resource it
//! configures:
//!
//! ```toml
//! [[tasks]]
//! resource = "interfaces"
//! state = "merged"
//!
//! [[tasks.config]]
//! name = "GE0/0/1"
//! mtu = 9000
//! ```

use anyhow::{Context, Result};
use reconcile::Policy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vrpkit::ResourceName;
use vrpkit::resources::{
    BannerConfig, BannerKind, BannerState, InterfaceConfig, LldpGlobalConfig, LldpInterfaceConfig,
};
use vrpkit::schema::{Validate, validate_all};

/// One resource-module invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resource", rename_all = "snake_case")]
pub enum Task {
    Interfaces {
        #[serde(default)]
        state: Policy,
        #[serde(default)]
        config: Vec<InterfaceConfig>,
    },
    LldpInterfaces {
        #[serde(default)]
        state: Policy,
        #[serde(default)]
        config: Vec<LldpInterfaceConfig>,
    },
    LldpGlobal {
        #[serde(default)]
        state: Policy,
        #[serde(default)]
        config: Option<LldpGlobalConfig>,
    },
    Banner {
        banner: BannerKind,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        state: BannerState,
    },
}

impl Task {
    pub fn resource(&self) -> ResourceName {
        match self {
            Self::Interfaces { .. } => ResourceName::Interfaces,
            Self::LldpInterfaces { .. } => ResourceName::LldpInterfaces,
            Self::LldpGlobal { .. } => ResourceName::LldpGlobal,
            Self::Banner { .. } => ResourceName::Banner,
        }
    }

    /// Reconciliation policy the task runs under
    pub fn policy(&self) -> Policy {
        match self {
            Self::Interfaces { state, .. }
            | Self::LldpInterfaces { state, .. }
            | Self::LldpGlobal { state, .. } => *state,
            Self::Banner { state, .. } => (*state).into(),
        }
    }

    /// Schema validation of the desired configuration
    pub fn validate(&self) -> vrpkit::Result<()> {
        match self {
            Self::Interfaces { config, .. } => validate_all(config, |c| c.name.as_str()),
            Self::LldpInterfaces { config, .. } => validate_all(config, |c| c.name.as_str()),
            Self::LldpGlobal { config, .. } => config.as_ref().map_or(Ok(()), Validate::validate),
            Self::Banner { banner, text, .. } => BannerConfig {
                banner: *banner,
                text: text.clone(),
            }
            .validate(),
        }
    }
}

/// Contents of a task file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFile {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Supported task file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Formats in lookup preference order
    pub const PREFERENCE: [ConfigFormat; 2] = [ConfigFormat::Toml, ConfigFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }

    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::PREFERENCE
            .into_iter()
            .find(|f| f.extension() == ext)
    }
}

impl TaskFile {
    /// Parse task file content
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Toml => toml::from_str(content).context("Invalid TOML task file"),
            ConfigFormat::Json => serde_json::from_str(content).context("Invalid JSON task file"),
        }
    }

    /// Load a task file; `~` is expanded and the format follows the extension
    pub fn load(path: &str) -> Result<Self> {
        let path = expand(path);
        let format = ConfigFormat::from_path(&path)
            .with_context(|| format!("Unsupported task file extension: {}", path.display()))?;
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;

        let file = Self::parse(&content, format)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        log::debug!("Loaded {} tasks from {}", file.tasks.len(), path.display());
        Ok(file)
    }

    /// Find `<stem>.toml` or `<stem>.json` in `dir`, TOML first
    pub fn find(dir: &str, stem: &str) -> Option<PathBuf> {
        let dir = expand(dir);
        ConfigFormat::PREFERENCE
            .into_iter()
            .map(|f| dir.join(format!("{stem}.{}", f.extension())))
            .find(|p| p.is_file())
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vrpkit::resources::Duplex;

    const TOML_TASKS: &str = r#"
[[tasks]]
resource = "interfaces"
state = "replaced"

[[tasks.config]]
name = "GE0/0/1"
description = "uplink"
speed = 1000
duplex = "full"

[[tasks]]
resource = "lldp_global"
state = "deleted"

[[tasks]]
resource = "banner"
banner = "login"
text = "authorized access only"
"#;

    #[test]
    fn test_parse_toml() {
        let file = TaskFile::parse(TOML_TASKS, ConfigFormat::Toml).unwrap();
        assert_eq!(file.tasks.len(), 3);

        let Task::Interfaces { state, config } = &file.tasks[0] else {
            panic!("expected interfaces task");
        };
        assert_eq!(*state, Policy::Replaced);
        assert_eq!(config[0].speed.as_deref(), Some("1000"));
        assert_eq!(config[0].duplex, Some(Duplex::Full));
        assert_eq!(config[0].enabled, Some(true));

        assert_eq!(
            file.tasks[1],
            Task::LldpGlobal {
                state: Policy::Deleted,
                config: None
            }
        );
        assert_eq!(file.tasks[2].policy(), Policy::Merged);
        assert_eq!(file.tasks[2].resource(), ResourceName::Banner);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"tasks": [{"resource": "lldp_interfaces", "state": "overridden",
            "config": [{"name": "GE0/0/2", "enabled": false}]}]}"#;
        let file = TaskFile::parse(json, ConfigFormat::Json).unwrap();
        assert_eq!(file.tasks[0].policy(), Policy::Overridden);
        assert_eq!(file.tasks[0].resource(), ResourceName::LldpInterfaces);
    }

    #[test]
    fn test_unknown_state_rejected() {
        let json = r#"{"tasks": [{"resource": "interfaces", "state": "gathered"}]}"#;
        assert!(TaskFile::parse(json, ConfigFormat::Json).is_err());
    }

    #[test]
    fn test_validate_duplicates() {
        let task = Task::Interfaces {
            state: Policy::Merged,
            config: vec![
                InterfaceConfig::named("GE0/0/1"),
                InterfaceConfig::named("GE0/0/1"),
            ],
        };
        assert!(task.validate().is_err());
    }

    #[test]
    fn test_load_and_find_prefers_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("site.json"), r#"{"tasks": []}"#).unwrap();
        fs::write(dir.path().join("site.toml"), TOML_TASKS).unwrap();

        let root = dir.path().to_str().unwrap();
        let found = TaskFile::find(root, "site").unwrap();
        assert_eq!(found.extension().unwrap(), "toml");

        let file = TaskFile::load(found.to_str().unwrap()).unwrap();
        assert_eq!(file.tasks.len(), 3);
        assert!(TaskFile::find(root, "missing").is_none());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.yaml");
        fs::write(&path, "tasks: []").unwrap();
        let err = TaskFile::load(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Unsupported task file extension"));
    }
}
