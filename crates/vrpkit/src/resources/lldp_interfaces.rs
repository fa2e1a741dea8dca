//! Per-interface LLDP enablement
//!
//! LLDP runs on every port by default; the only configuration a port
//! carries is `undo lldp enable`.

use crate::error::Result;
use crate::schema::{Validate, require_name};
use reconcile::{Attribute, ConfigurationSet, DiffSet, Instance, Resource, Scope, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LldpInterfaceConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl LldpInterfaceConfig {
    pub fn new(name: impl Into<String>, enabled: Option<bool>) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }

    pub fn to_instance(&self) -> Instance<LldpInterfaceAttr> {
        Instance::identity_only(self.name.trim()).with_opt(LldpInterfaceAttr::Enabled, self.enabled)
    }
}

impl Validate for LldpInterfaceConfig {
    const RESOURCE: &'static str = "lldp_interfaces";

    fn validate(&self) -> Result<()> {
        require_name(Self::RESOURCE, "name", &self.name)
    }
}

pub fn instances(configs: &[LldpInterfaceConfig]) -> ConfigurationSet<LldpInterfaceAttr> {
    configs.iter().map(LldpInterfaceConfig::to_instance).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LldpInterfaceAttr {
    Enabled,
}

impl Attribute for LldpInterfaceAttr {
    fn all() -> &'static [Self] {
        &[Self::Enabled]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
        }
    }
}

/// Command emitter for per-interface LLDP
#[derive(Debug, Clone, Copy, Default)]
pub struct LldpInterfaces;

impl Resource for LldpInterfaces {
    type Attr = LldpInterfaceAttr;

    fn resource_type(&self) -> &'static str {
        "lldp_interfaces"
    }

    fn scope(&self, identity: &str) -> Option<Scope> {
        Some(Scope::new(format!("interface {identity}"), "quit"))
    }

    fn set_commands(
        &self,
        _identity: &str,
        diff: &DiffSet<LldpInterfaceAttr>,
        _want: &Instance<LldpInterfaceAttr>,
        _have: &Instance<LldpInterfaceAttr>,
    ) -> Vec<String> {
        match diff
            .new_value(LldpInterfaceAttr::Enabled)
            .and_then(Value::as_bool)
        {
            Some(true) => vec!["lldp enable".to_string()],
            Some(false) => vec!["undo lldp enable".to_string()],
            None => Vec::new(),
        }
    }

    fn clear_commands(
        &self,
        _identity: &str,
        _stale: &DiffSet<LldpInterfaceAttr>,
        have: &Instance<LldpInterfaceAttr>,
    ) -> Vec<String> {
        if have.is_false(LldpInterfaceAttr::Enabled) {
            vec!["lldp enable".to_string()]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconcile::{Options, Policy, reconcile};

    fn run(
        want: &[LldpInterfaceConfig],
        have: &[LldpInterfaceConfig],
        policy: Policy,
    ) -> Vec<String> {
        reconcile(
            &LldpInterfaces,
            &instances(want),
            &instances(have),
            policy,
            &Options::default(),
        )
        .unwrap()
        .lines()
    }

    #[test]
    fn test_merged_disables() {
        let lines = run(
            &[LldpInterfaceConfig::new("0/0/1", Some(false))],
            &[LldpInterfaceConfig::new("GigabitEthernet0/0/1", Some(true))],
            Policy::Merged,
        );
        assert_eq!(
            lines,
            vec!["interface GigabitEthernet0/0/1", "undo lldp enable", "quit"]
        );
    }

    #[test]
    fn test_deleted_restores_default() {
        let have = [
            LldpInterfaceConfig::new("GigabitEthernet0/0/1", Some(false)),
            LldpInterfaceConfig::new("GigabitEthernet0/0/2", Some(true)),
        ];
        assert_eq!(
            run(&[], &have, Policy::Deleted),
            vec!["interface GigabitEthernet0/0/1", "lldp enable", "quit"]
        );
    }

    #[test]
    fn test_overridden() {
        let want = [LldpInterfaceConfig::new("GigabitEthernet0/0/2", Some(false))];
        let have = [
            LldpInterfaceConfig::new("GigabitEthernet0/0/1", Some(false)),
            LldpInterfaceConfig::new("GigabitEthernet0/0/2", Some(true)),
        ];
        assert_eq!(
            run(&want, &have, Policy::Overridden),
            vec![
                "interface GigabitEthernet0/0/1",
                "lldp enable",
                "quit",
                "interface GigabitEthernet0/0/2",
                "undo lldp enable",
                "quit",
            ]
        );
    }

    #[test]
    fn test_already_enabled_is_noop() {
        let cfg = [LldpInterfaceConfig::new("GigabitEthernet0/0/1", Some(true))];
        assert!(run(&cfg, &cfg, Policy::Replaced).is_empty());
    }
}
