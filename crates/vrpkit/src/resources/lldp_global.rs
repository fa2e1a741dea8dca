//! Global LLDP settings
//!
//! A singleton: facts always carry exactly one instance, addressed by
//! [`IDENTITY`], and commands are issued at the top level of system view.
//! `overridden` has nothing extra to reset for a singleton and is refused.

use crate::error::{Error, Result};
use crate::schema::Validate;
use reconcile::{Attribute, ConfigurationSet, DiffSet, Instance, Policy, Resource, Scope, Value};
use serde::{Deserialize, Serialize};

/// Identity of the one global LLDP instance
pub const IDENTITY: &str = "lldp";

const HOLDTIME_RANGE: std::ops::RangeInclusive<u32> = 2..=10;
const TIMER_RANGE: std::ops::RangeInclusive<u32> = 5..=32768;
const REINIT_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LldpGlobalConfig {
    /// Hold multiplier for the TTL advertised in LLDP packets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holdtime: Option<u32>,
    /// Delay before LLDP re-initializes on a port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reinit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Transmission interval in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<u32>,
}

impl LldpGlobalConfig {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn to_instance(&self) -> Instance<LldpGlobalAttr> {
        Instance::identity_only(IDENTITY)
            .with_opt(LldpGlobalAttr::Enabled, self.enabled)
            .with_opt(LldpGlobalAttr::Holdtime, self.holdtime)
            .with_opt(LldpGlobalAttr::Timer, self.timer)
            .with_opt(LldpGlobalAttr::Reinit, self.reinit)
    }
}

impl Validate for LldpGlobalConfig {
    const RESOURCE: &'static str = "lldp_global";

    fn validate(&self) -> Result<()> {
        let checks = [
            ("holdtime", self.holdtime, HOLDTIME_RANGE),
            ("timer", self.timer, TIMER_RANGE),
            ("reinit", self.reinit, REINIT_RANGE),
        ];
        for (field, value, range) in checks {
            if let Some(v) = value
                && !range.contains(&v)
            {
                return Err(Error::validation(
                    Self::RESOURCE,
                    format!("{field} {v} is outside {}..={}", range.start(), range.end()),
                ));
            }
        }
        Ok(())
    }
}

/// Desired state as an engine set: empty when no config was given
pub fn want_set(config: Option<&LldpGlobalConfig>) -> ConfigurationSet<LldpGlobalAttr> {
    config
        .filter(|c| !c.is_empty())
        .map(LldpGlobalConfig::to_instance)
        .into_iter()
        .collect()
}

/// Observed state as an engine set: always the single instance
pub fn have_set(config: &LldpGlobalConfig) -> ConfigurationSet<LldpGlobalAttr> {
    vec![config.to_instance()].into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LldpGlobalAttr {
    Enabled,
    Holdtime,
    Timer,
    Reinit,
}

impl Attribute for LldpGlobalAttr {
    fn all() -> &'static [Self] {
        &[Self::Enabled, Self::Holdtime, Self::Timer, Self::Reinit]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Holdtime => "holdtime",
            Self::Timer => "timer",
            Self::Reinit => "reinit",
        }
    }
}

/// Command emitter for global LLDP settings
#[derive(Debug, Clone, Copy, Default)]
pub struct LldpGlobal;

impl LldpGlobal {
    fn keyword(attr: LldpGlobalAttr) -> Option<&'static str> {
        match attr {
            LldpGlobalAttr::Enabled => None,
            LldpGlobalAttr::Holdtime => Some("lldp message-transmission hold-multiplier"),
            LldpGlobalAttr::Timer => Some("lldp message-transmission interval"),
            LldpGlobalAttr::Reinit => Some("lldp restart-delay"),
        }
    }
}

impl Resource for LldpGlobal {
    type Attr = LldpGlobalAttr;

    fn resource_type(&self) -> &'static str {
        "lldp_global"
    }

    fn scope(&self, _identity: &str) -> Option<Scope> {
        None
    }

    fn supports(&self, policy: Policy) -> bool {
        policy != Policy::Overridden
    }

    fn set_commands(
        &self,
        _identity: &str,
        diff: &DiffSet<LldpGlobalAttr>,
        _want: &Instance<LldpGlobalAttr>,
        _have: &Instance<LldpGlobalAttr>,
    ) -> Vec<String> {
        let mut commands = Vec::new();
        match diff
            .new_value(LldpGlobalAttr::Enabled)
            .and_then(Value::as_bool)
        {
            Some(true) => commands.push("lldp enable".to_string()),
            Some(false) => commands.push("undo lldp enable".to_string()),
            None => {}
        }
        for entry in diff.iter() {
            if let Some(keyword) = Self::keyword(entry.attr)
                && let Some(value) = entry.change.new_value()
                && value.is_truthy()
            {
                commands.push(format!("{keyword} {value}"));
            }
        }
        commands
    }

    fn clear_commands(
        &self,
        _identity: &str,
        stale: &DiffSet<LldpGlobalAttr>,
        _have: &Instance<LldpGlobalAttr>,
    ) -> Vec<String> {
        let mut commands: Vec<String> = stale
            .iter()
            .filter_map(|entry| Self::keyword(entry.attr))
            .map(|keyword| format!("undo {keyword}"))
            .collect();
        if stale
            .old_value(LldpGlobalAttr::Enabled)
            .and_then(Value::as_bool)
            == Some(true)
        {
            commands.push("undo lldp enable".to_string());
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconcile::{Options, reconcile};

    fn run(
        want: Option<&LldpGlobalConfig>,
        have: &LldpGlobalConfig,
        policy: Policy,
    ) -> reconcile::Result<Vec<String>> {
        reconcile(
            &LldpGlobal,
            &want_set(want),
            &have_set(have),
            policy,
            &Options::default(),
        )
        .map(|list| list.lines())
    }

    fn configured() -> LldpGlobalConfig {
        LldpGlobalConfig {
            enabled: Some(true),
            holdtime: Some(4),
            timer: Some(30),
            reinit: None,
        }
    }

    #[test]
    fn test_merged_from_disabled() {
        let want = LldpGlobalConfig {
            enabled: Some(true),
            holdtime: Some(2),
            timer: Some(10),
            reinit: None,
        };
        let lines = run(Some(&want), &LldpGlobalConfig::default(), Policy::Merged).unwrap();
        assert_eq!(
            lines,
            vec![
                "lldp enable",
                "lldp message-transmission hold-multiplier 2",
                "lldp message-transmission interval 10",
            ]
        );
    }

    #[test]
    fn test_merged_idempotent() {
        let have = configured();
        assert!(run(Some(&have), &have, Policy::Merged).unwrap().is_empty());
    }

    #[test]
    fn test_replaced_clears_unmentioned() {
        let want = LldpGlobalConfig {
            enabled: Some(true),
            reinit: Some(3),
            ..Default::default()
        };
        let lines = run(Some(&want), &configured(), Policy::Replaced).unwrap();
        assert_eq!(
            lines,
            vec![
                "undo lldp message-transmission hold-multiplier",
                "undo lldp message-transmission interval",
                "lldp restart-delay 3",
            ]
        );
    }

    #[test]
    fn test_deleted_without_config() {
        let lines = run(None, &configured(), Policy::Deleted).unwrap();
        assert_eq!(
            lines,
            vec![
                "undo lldp message-transmission hold-multiplier",
                "undo lldp message-transmission interval",
                "undo lldp enable",
            ]
        );
    }

    #[test]
    fn test_overridden_unsupported() {
        let err = run(Some(&configured()), &configured(), Policy::Overridden).unwrap_err();
        assert!(matches!(err, reconcile::Error::UnsupportedPolicy { .. }));
    }

    #[test]
    fn test_merged_requires_config() {
        let empty = LldpGlobalConfig::default();
        let err = run(Some(&empty), &configured(), Policy::Merged).unwrap_err();
        assert!(matches!(err, reconcile::Error::EmptyWant { .. }));
    }

    #[test]
    fn test_validation_ranges() {
        let bad = LldpGlobalConfig {
            holdtime: Some(1),
            ..Default::default()
        };
        assert_eq!(
            bad.validate().unwrap_err().to_string(),
            "invalid lldp_global config: holdtime 1 is outside 2..=10"
        );
        assert!(configured().validate().is_ok());
    }
}
