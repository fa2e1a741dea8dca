//! Backend abstraction for talking to a device.
//!
//! Reading and writing are separate traits: a [`FactsProvider`] returns the
//! parsed running configuration, a [`CommandSink`] applies command lines.
//! Implementations:
//! - [`cli::CliBackend`]: any [`cli::Transport`] plus a running-config parser
//! - [`memory::MemoryDevice`]: an in-memory device model for tests and dry runs

pub mod cli;
pub mod memory;

use crate::error::Result;
use crate::resources::banner::BannerConfig;
use crate::resources::interfaces::InterfaceConfig;
use crate::resources::lldp_global::LldpGlobalConfig;
use crate::resources::lldp_interfaces::LldpInterfaceConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource types a backend can gather facts for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceName {
    Interfaces,
    LldpInterfaces,
    LldpGlobal,
    Banner,
}

impl ResourceName {
    pub const ALL: [ResourceName; 4] = [
        ResourceName::Interfaces,
        ResourceName::LldpInterfaces,
        ResourceName::LldpGlobal,
        ResourceName::Banner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interfaces => "interfaces",
            Self::LldpInterfaces => "lldp_interfaces",
            Self::LldpGlobal => "lldp_global",
            Self::Banner => "banner",
        }
    }

    /// Filter appended to `display current-configuration` for this resource
    pub fn config_flags(self) -> Vec<String> {
        let flags: &[&str] = match self {
            Self::Interfaces | Self::LldpInterfaces => &["interface"],
            Self::LldpGlobal => &["| include lldp"],
            Self::Banner => &["| begin header"],
        };
        flags.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured device configuration, one section per resource type
///
/// A provider only has to fill the section that was asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facts {
    #[serde(default)]
    pub interfaces: Vec<InterfaceConfig>,
    #[serde(default)]
    pub lldp_interfaces: Vec<LldpInterfaceConfig>,
    #[serde(default)]
    pub lldp_global: LldpGlobalConfig,
    #[serde(default)]
    pub banners: Vec<BannerConfig>,
}

impl Facts {
    /// One section as JSON, for before/after reporting
    pub fn section(&self, resource: ResourceName) -> Result<serde_json::Value> {
        let value = match resource {
            ResourceName::Interfaces => serde_json::to_value(&self.interfaces)?,
            ResourceName::LldpInterfaces => serde_json::to_value(&self.lldp_interfaces)?,
            ResourceName::LldpGlobal => serde_json::to_value(&self.lldp_global)?,
            ResourceName::Banner => serde_json::to_value(&self.banners)?,
        };
        Ok(value)
    }

    /// Replace one section with the same section of `other`
    pub fn merge_section(&mut self, resource: ResourceName, other: Facts) {
        match resource {
            ResourceName::Interfaces => self.interfaces = other.interfaces,
            ResourceName::LldpInterfaces => self.lldp_interfaces = other.lldp_interfaces,
            ResourceName::LldpGlobal => self.lldp_global = other.lldp_global,
            ResourceName::Banner => self.banners = other.banners,
        }
    }
}

/// Source of parsed running configuration
pub trait FactsProvider {
    /// Gather the facts section for `resource`
    fn gather(&mut self, resource: ResourceName) -> Result<Facts>;

    /// Drop any cached running configuration so the next gather re-reads
    /// the device
    fn invalidate(&mut self) {}
}

/// Destination for configuration commands
pub trait CommandSink {
    /// Apply `commands` in order, stopping at the first rejected line
    ///
    /// Lines before the rejected one stay applied.
    fn edit_config(&mut self, commands: &[String]) -> Result<()>;
}

/// Everything a task run needs from a device
pub trait Backend: FactsProvider + CommandSink {}

impl<T: FactsProvider + CommandSink> Backend for T {}
