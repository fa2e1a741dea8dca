//! In-memory device model
//!
//! Interprets the command subset the resources emit against a [`Facts`]
//! snapshot. Unknown commands and interfaces are rejected the way a real
//! device rejects them, leaving earlier commands applied.

use super::{CommandSink, Facts, FactsProvider, ResourceName};
use crate::error::{Error, Result};
use crate::resources::banner::{BannerConfig, BannerKind};
use crate::resources::interfaces::{Duplex, InterfaceConfig};
use crate::resources::lldp_interfaces::LldpInterfaceConfig;

const UNRECOGNIZED: &str = "Unrecognized command found at '^' position.";

/// A device held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryDevice {
    facts: Facts,
    applied: Vec<String>,
    reject: Option<String>,
    gathers: usize,
}

impl MemoryDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facts(facts: Facts) -> Self {
        Self {
            facts,
            ..Self::default()
        }
    }

    pub fn facts(&self) -> &Facts {
        &self.facts
    }

    pub fn facts_mut(&mut self) -> &mut Facts {
        &mut self.facts
    }

    /// Every command accepted so far, in order
    pub fn applied(&self) -> &[String] {
        &self.applied
    }

    /// Number of gather calls served
    pub fn gathers(&self) -> usize {
        self.gathers
    }

    /// Make the device refuse any command starting with `prefix`
    pub fn reject_commands(mut self, prefix: impl Into<String>) -> Self {
        self.reject = Some(prefix.into());
        self
    }

    fn interface_mut(&mut self, name: &str) -> Option<&mut InterfaceConfig> {
        self.facts.interfaces.iter_mut().find(|i| i.name == name)
    }

    fn knows_interface(&self, name: &str) -> bool {
        self.facts.interfaces.iter().any(|i| i.name == name)
            || self.facts.lldp_interfaces.iter().any(|i| i.name == name)
    }

    fn set_interface_lldp(&mut self, name: &str, enabled: bool) {
        let lldp = &mut self.facts.lldp_interfaces;
        match lldp.iter_mut().find(|i| i.name == name) {
            Some(entry) => entry.enabled = Some(enabled),
            None => lldp.push(LldpInterfaceConfig::new(name, Some(enabled))),
        }
    }

    fn set_banner(&mut self, kind: BannerKind, text: Option<String>) {
        let banners = &mut self.facts.banners;
        banners.retain(|b| b.banner != kind);
        if text.is_some() {
            banners.push(BannerConfig { banner: kind, text });
        }
    }

    /// Apply one line; `context` is the interface view currently entered
    fn apply(&mut self, context: &mut Option<String>, line: &str) -> Result<()> {
        if let Some(prefix) = &self.reject
            && line.starts_with(prefix.as_str())
        {
            return Err(Error::rejected(line, "Error: The command is not supported."));
        }

        match context.clone() {
            Some(name) => self.apply_interface(context, &name, line),
            None => self.apply_system(context, line),
        }
    }

    fn apply_system(&mut self, context: &mut Option<String>, line: &str) -> Result<()> {
        let global = &mut self.facts.lldp_global;

        if let Some(name) = line.strip_prefix("interface ") {
            let name = name.trim();
            if !self.knows_interface(name) {
                return Err(Error::rejected(line, "Error: Wrong parameter found at '^' position."));
            }
            *context = Some(name.to_string());
        } else if line == "lldp enable" {
            global.enabled = Some(true);
        } else if line == "undo lldp enable" {
            global.enabled = Some(false);
        } else if let Some(n) = line.strip_prefix("lldp message-transmission hold-multiplier ") {
            global.holdtime = Some(parse_number(line, n)?);
        } else if line == "undo lldp message-transmission hold-multiplier" {
            global.holdtime = None;
        } else if let Some(n) = line.strip_prefix("lldp message-transmission interval ") {
            global.timer = Some(parse_number(line, n)?);
        } else if line == "undo lldp message-transmission interval" {
            global.timer = None;
        } else if let Some(n) = line.strip_prefix("lldp restart-delay ") {
            global.reinit = Some(parse_number(line, n)?);
        } else if line == "undo lldp restart-delay" {
            global.reinit = None;
        } else if let Some(rest) = line.strip_prefix("undo header ") {
            self.set_banner(parse_banner_kind(line, rest)?, None);
        } else if let Some(rest) = line.strip_prefix("header ") {
            let (kind, text) = rest
                .split_once(" information ")
                .ok_or_else(|| Error::rejected(line, UNRECOGNIZED))?;
            let kind = parse_banner_kind(line, kind)?;
            let text = text.trim().trim_matches('"').trim().to_string();
            self.set_banner(kind, (!text.is_empty()).then_some(text));
        } else {
            return Err(Error::rejected(line, UNRECOGNIZED));
        }
        Ok(())
    }

    fn apply_interface(&mut self, context: &mut Option<String>, name: &str, line: &str) -> Result<()> {
        match line {
            "quit" => {
                *context = None;
                return Ok(());
            }
            "lldp enable" => {
                self.set_interface_lldp(name, true);
                return Ok(());
            }
            "undo lldp enable" => {
                self.set_interface_lldp(name, false);
                return Ok(());
            }
            _ => {}
        }

        let iface = self
            .interface_mut(name)
            .ok_or_else(|| Error::rejected(line, UNRECOGNIZED))?;

        if let Some(text) = line.strip_prefix("description ") {
            iface.description = Some(text.to_string());
        } else if let Some(n) = line.strip_prefix("jumboframe enable ") {
            iface.mtu = Some(parse_number(line, n)?);
        } else if let Some(speed) = line.strip_prefix("speed ") {
            parse_number(line, speed)?;
            iface.speed = Some(speed.trim().to_string());
        } else if let Some(duplex) = line.strip_prefix("duplex ") {
            iface.duplex = Some(match duplex.trim() {
                "full" => Duplex::Full,
                "half" => Duplex::Half,
                _ => return Err(Error::rejected(line, UNRECOGNIZED)),
            });
        } else {
            match line {
                "undo description" => iface.description = None,
                "undo jumboframe enable" => iface.mtu = None,
                "shutdown" => iface.enabled = Some(false),
                "undo shutdown" => iface.enabled = Some(true),
                "negotiation auto" => iface.negotiation = Some(true),
                "undo negotiation auto" => iface.negotiation = Some(false),
                "undo speed" => iface.speed = None,
                "undo duplex" => iface.duplex = None,
                _ => return Err(Error::rejected(line, UNRECOGNIZED)),
            }
        }
        Ok(())
    }
}

fn parse_number(line: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::rejected(line, "Error: Wrong parameter found at '^' position."))
}

fn parse_banner_kind(line: &str, value: &str) -> Result<BannerKind> {
    match value.trim() {
        "login" => Ok(BannerKind::Login),
        "shell" => Ok(BannerKind::Shell),
        _ => Err(Error::rejected(line, UNRECOGNIZED)),
    }
}

impl FactsProvider for MemoryDevice {
    fn gather(&mut self, resource: ResourceName) -> Result<Facts> {
        self.gathers += 1;
        let mut facts = Facts::default();
        facts.merge_section(resource, self.facts.clone());
        Ok(facts)
    }
}

impl CommandSink for MemoryDevice {
    fn edit_config(&mut self, commands: &[String]) -> Result<()> {
        let mut context = None;
        for line in commands {
            self.apply(&mut context, line)?;
            log::trace!("Applied '{line}'");
            self.applied.push(line.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn device() -> MemoryDevice {
        MemoryDevice::with_facts(Facts {
            interfaces: vec![InterfaceConfig::named("GE0/0/1")],
            ..Default::default()
        })
    }

    #[test]
    fn test_interface_commands() {
        let mut device = device();
        device
            .edit_config(&lines(&[
                "interface GE0/0/1",
                "description uplink",
                "jumboframe enable 9000",
                "shutdown",
                "undo negotiation auto",
                "speed 100",
                "duplex half",
                "undo lldp enable",
                "quit",
            ]))
            .unwrap();

        let iface = &device.facts().interfaces[0];
        assert_eq!(iface.description.as_deref(), Some("uplink"));
        assert_eq!(iface.mtu, Some(9000));
        assert_eq!(iface.enabled, Some(false));
        assert_eq!(iface.negotiation, Some(false));
        assert_eq!(iface.speed.as_deref(), Some("100"));
        assert_eq!(iface.duplex, Some(Duplex::Half));
        assert_eq!(device.facts().lldp_interfaces[0].enabled, Some(false));
        assert_eq!(device.applied().len(), 9);
    }

    #[test]
    fn test_global_commands() {
        let mut device = MemoryDevice::new();
        device
            .edit_config(&lines(&[
                "lldp enable",
                "lldp message-transmission interval 10",
                "lldp restart-delay 3",
                "header shell information \"\nwelcome\"",
            ]))
            .unwrap();

        let global = &device.facts().lldp_global;
        assert_eq!(global.enabled, Some(true));
        assert_eq!(global.timer, Some(10));
        assert_eq!(global.reinit, Some(3));
        assert_eq!(device.facts().banners[0].text.as_deref(), Some("welcome"));

        device.edit_config(&lines(&["undo header shell"])).unwrap();
        assert!(device.facts().banners.is_empty());
    }

    #[test]
    fn test_unknown_interface_rejected() {
        let mut device = device();
        let err = device
            .edit_config(&lines(&["interface GE0/0/9", "shutdown", "quit"]))
            .unwrap_err();
        assert!(matches!(err, Error::CommandRejected { ref command, .. } if command == "interface GE0/0/9"));
        assert!(device.applied().is_empty());
    }

    #[test]
    fn test_rejection_stops_but_keeps_earlier_lines() {
        let mut device = device().reject_commands("speed");
        let err = device
            .edit_config(&lines(&["interface GE0/0/1", "description a", "speed 10", "quit"]))
            .unwrap_err();
        assert!(matches!(err, Error::CommandRejected { .. }));
        assert_eq!(device.applied(), &lines(&["interface GE0/0/1", "description a"])[..]);
        assert_eq!(device.facts().interfaces[0].description.as_deref(), Some("a"));
    }

    #[test]
    fn test_gather_returns_requested_section() {
        let mut device = device();
        device.facts_mut().lldp_global.enabled = Some(true);
        let facts = device.gather(ResourceName::Interfaces).unwrap();
        assert_eq!(facts.interfaces.len(), 1);
        assert_eq!(facts.lldp_global.enabled, None);
        assert_eq!(device.gathers(), 1);
    }
}
