//! Physical/logical interface attributes
//!
//! Commands live under `interface <name>` and the block is closed with
//! `quit`. Speed, duplex and negotiation only apply to gigabit-class ports.

use crate::error::{Error, Result};
use crate::interface_name;
use crate::schema::{Validate, default_true, opt_string_or_number, require_name};
use reconcile::{Attribute, ConfigurationSet, DiffSet, Instance, Resource, Scope, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Speed that cannot be combined with half duplex
const GIGABIT_SPEED: &str = "1000";

const MAX_MTU: u32 = 12288;

/// Duplex mode of an Ethernet port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Duplex {
    Full,
    Half,
}

impl Duplex {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
        }
    }
}

impl fmt::Display for Duplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired or observed configuration of one interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplex: Option<Duplex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negotiation: Option<bool>,
}

impl InterfaceConfig {
    /// An interface with nothing but its name (and no `enabled` opinion)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            enabled: None,
            speed: None,
            mtu: None,
            duplex: None,
            negotiation: None,
        }
    }

    /// Engine view of this entry
    pub fn to_instance(&self) -> Instance<InterfaceAttr> {
        Instance::identity_only(self.name.trim())
            .with_opt(InterfaceAttr::Description, self.description.as_deref())
            .with_opt(InterfaceAttr::Enabled, self.enabled)
            .with_opt(InterfaceAttr::Speed, self.speed.as_deref())
            .with_opt(InterfaceAttr::Mtu, self.mtu)
            .with_opt(InterfaceAttr::Duplex, self.duplex.map(Duplex::as_str))
            .with_opt(InterfaceAttr::Negotiation, self.negotiation)
    }
}

impl Validate for InterfaceConfig {
    const RESOURCE: &'static str = "interfaces";

    fn validate(&self) -> Result<()> {
        require_name(Self::RESOURCE, "name", &self.name)?;
        if let Some(mtu) = self.mtu
            && !(1..=MAX_MTU).contains(&mtu)
        {
            return Err(Error::validation(
                Self::RESOURCE,
                format!("{}: mtu {mtu} is outside 1..={MAX_MTU}", self.name),
            ));
        }
        if let Some(speed) = &self.speed
            && (speed.trim().is_empty() || !speed.trim().chars().all(|c| c.is_ascii_digit()))
        {
            return Err(Error::validation(
                Self::RESOURCE,
                format!("{}: speed '{speed}' is not a number", self.name),
            ));
        }
        Ok(())
    }
}

/// Engine view of a list of entries
pub fn instances(configs: &[InterfaceConfig]) -> ConfigurationSet<InterfaceAttr> {
    configs.iter().map(InterfaceConfig::to_instance).collect()
}

/// Interface attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InterfaceAttr {
    Description,
    Enabled,
    Speed,
    Mtu,
    Duplex,
    Negotiation,
}

impl Attribute for InterfaceAttr {
    fn all() -> &'static [Self] {
        &[
            Self::Description,
            Self::Enabled,
            Self::Speed,
            Self::Mtu,
            Self::Duplex,
            Self::Negotiation,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Enabled => "enabled",
            Self::Speed => "speed",
            Self::Mtu => "mtu",
            Self::Duplex => "duplex",
            Self::Negotiation => "negotiation",
        }
    }
}

/// Command emitter for interfaces
#[derive(Debug, Clone, Copy, Default)]
pub struct Interfaces;

impl Resource for Interfaces {
    type Attr = InterfaceAttr;

    fn resource_type(&self) -> &'static str {
        "interfaces"
    }

    fn scope(&self, identity: &str) -> Option<Scope> {
        Some(Scope::new(format!("interface {identity}"), "quit"))
    }

    /// A fixed speed or duplex on a gigabit port means negotiation off
    fn effective_want(
        &self,
        identity: &str,
        want: &Instance<InterfaceAttr>,
    ) -> Instance<InterfaceAttr> {
        let mut want = want.clone();
        let pinned = want.get(InterfaceAttr::Speed).is_some()
            || want.get(InterfaceAttr::Duplex).is_some();
        if interface_name::is_gigabit(identity)
            && pinned
            && want.get(InterfaceAttr::Negotiation).is_none()
        {
            want.set(InterfaceAttr::Negotiation, false);
        }
        want
    }

    fn set_commands(
        &self,
        identity: &str,
        diff: &DiffSet<InterfaceAttr>,
        _want: &Instance<InterfaceAttr>,
        have: &Instance<InterfaceAttr>,
    ) -> Vec<String> {
        let mut commands = Vec::new();
        let truthy = |attr| diff.new_value(attr).filter(|v| v.is_truthy());

        if let Some(v) = truthy(InterfaceAttr::Description) {
            commands.push(format!("description {v}"));
        }
        if let Some(v) = truthy(InterfaceAttr::Mtu) {
            commands.push(format!("jumboframe enable {v}"));
        }
        match diff.new_value(InterfaceAttr::Enabled).and_then(Value::as_bool) {
            Some(true) => commands.push("undo shutdown".to_string()),
            Some(false) => commands.push("shutdown".to_string()),
            None => {}
        }

        let negotiating = diff.sets(InterfaceAttr::Negotiation);
        if negotiating {
            commands.push("negotiation auto".to_string());
        }

        if interface_name::is_gigabit(identity) && !negotiating {
            if diff.contains(InterfaceAttr::Speed) || diff.contains(InterfaceAttr::Duplex) {
                commands.push("undo negotiation auto".to_string());
            }

            let half = have
                .get(InterfaceAttr::Duplex)
                .and_then(Value::as_str)
                .is_some_and(|d| d == Duplex::Half.as_str());
            if let Some(speed) = truthy(InterfaceAttr::Speed) {
                if half && speed.as_str() == Some(GIGABIT_SPEED) {
                    commands.push(format!("duplex {}", Duplex::Full));
                }
                commands.push(format!("speed {speed}"));
            }
            if let Some(duplex) = truthy(InterfaceAttr::Duplex) {
                commands.push(format!("duplex {duplex}"));
            }
        }

        commands
    }

    fn clear_commands(
        &self,
        identity: &str,
        stale: &DiffSet<InterfaceAttr>,
        have: &Instance<InterfaceAttr>,
    ) -> Vec<String> {
        let mut commands = Vec::new();

        if stale.drops(InterfaceAttr::Description) {
            commands.push("undo description".to_string());
        }
        if have.is_false(InterfaceAttr::Enabled) {
            commands.push("undo shutdown".to_string());
        }
        if stale.drops(InterfaceAttr::Mtu) {
            commands.push("undo jumboframe enable".to_string());
        }

        if interface_name::is_gigabit(identity) {
            let negotiating = have
                .get(InterfaceAttr::Negotiation)
                .is_some_and(Value::is_truthy);
            if stale.drops(InterfaceAttr::Speed) && !negotiating {
                commands.push("undo speed".to_string());
            }
            if stale.drops(InterfaceAttr::Duplex) && !negotiating {
                commands.push("undo duplex".to_string());
            }
            if have.is_false(InterfaceAttr::Negotiation) {
                commands.push("undo speed".to_string());
                commands.push("undo duplex".to_string());
                commands.push("negotiation auto".to_string());
            }
        }

        commands
    }
}
