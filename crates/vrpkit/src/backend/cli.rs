//! CLI backend - running configuration over an arbitrary transport
//!
//! The transport executes `display current-configuration <flags>` and
//! configuration commands; this backend adds the per-run config cache and
//! hands raw output to a caller-supplied parser.

use super::{CommandSink, Facts, FactsProvider, ResourceName};
use crate::error::Result;
use std::collections::HashMap;

/// Connection to one device
pub trait Transport {
    /// Output of `display current-configuration` with `flags` appended
    fn get_config(&mut self, flags: &[String]) -> Result<String>;

    /// Send configuration commands, reporting the first rejected line as
    /// [`crate::Error::CommandRejected`]
    fn edit_config(&mut self, commands: &[String]) -> Result<()>;
}

/// Running-config parser: raw output for one resource in, facts out
pub type Parser = Box<dyn Fn(ResourceName, &str) -> Result<Facts>>;

/// Per-run cache of `display current-configuration` output, keyed by the
/// joined flag string
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: HashMap<String, String>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(flags: &[String]) -> String {
        flags.join(" ")
    }

    pub fn get(&self, flags: &[String]) -> Option<&str> {
        self.entries.get(&Self::key(flags)).map(String::as_str)
    }

    pub fn insert(&mut self, flags: &[String], output: String) {
        self.entries.insert(Self::key(flags), output);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Backend over a CLI transport
pub struct CliBackend<T: Transport> {
    transport: T,
    cache: ConfigCache,
    parser: Parser,
}

impl<T: Transport> CliBackend<T> {
    pub fn new(transport: T, parser: Parser) -> Self {
        Self {
            transport,
            cache: ConfigCache::new(),
            parser,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &ConfigCache {
        &self.cache
    }

    /// Running configuration for `flags`, served from cache when possible
    ///
    /// Older releases reject section filters; when the last flag is one,
    /// the request is retried without it. Output is trimmed and cached
    /// under the original flags.
    pub fn running_config(&mut self, flags: &[String]) -> Result<String> {
        if let Some(cached) = self.cache.get(flags) {
            log::trace!("Config cache hit for '{}'", ConfigCache::key(flags));
            return Ok(cached.to_string());
        }

        let output = match self.transport.get_config(flags) {
            Ok(output) => output,
            Err(e) => match flags.split_last() {
                Some((last, rest)) if last.contains("section") => {
                    log::debug!("'{last}' filter rejected ({e}), retrying without it");
                    self.running_config(rest)?
                }
                _ => return Err(e),
            },
        };

        let output = output.trim().to_string();
        self.cache.insert(flags, output.clone());
        Ok(output)
    }
}

impl<T: Transport> FactsProvider for CliBackend<T> {
    fn gather(&mut self, resource: ResourceName) -> Result<Facts> {
        let output = self.running_config(&resource.config_flags())?;
        log::debug!("Gathered {} bytes of {resource} config", output.len());
        (self.parser)(resource, &output)
    }

    fn invalidate(&mut self) {
        if !self.cache.is_empty() {
            log::debug!("Dropping {} cached config entries", self.cache.len());
        }
        self.cache.clear();
    }
}

impl<T: Transport> CommandSink for CliBackend<T> {
    fn edit_config(&mut self, commands: &[String]) -> Result<()> {
        if commands.is_empty() {
            return Ok(());
        }
        log::info!("Sending {} commands", commands.len());
        self.transport.edit_config(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::resources::banner::{BannerConfig, BannerKind};

    /// Records requests; refuses section filters and `bogus`
    #[derive(Default)]
    struct Recorder {
        requests: Vec<String>,
        sent: Vec<String>,
    }

    impl Transport for Recorder {
        fn get_config(&mut self, flags: &[String]) -> Result<String> {
            let key = flags.join(" ");
            self.requests.push(key.clone());
            if key.contains("section") || key.contains("bogus") {
                return Err(Error::Transport {
                    message: "Unrecognized command".into(),
                });
            }
            Ok(format!("  header login information \"\nhi\"  [{key}]\n"))
        }

        fn edit_config(&mut self, commands: &[String]) -> Result<()> {
            self.sent.extend_from_slice(commands);
            Ok(())
        }
    }

    fn backend() -> CliBackend<Recorder> {
        CliBackend::new(
            Recorder::default(),
            Box::new(|resource: ResourceName, output: &str| {
                assert_eq!(resource, ResourceName::Banner);
                Ok(Facts {
                    banners: vec![BannerConfig::from_running_config(BannerKind::Login, output)],
                    ..Default::default()
                })
            }),
        )
    }

    fn flags(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_cache_hit_skips_transport() {
        let mut backend = backend();
        let first = backend.running_config(&flags(&["interface"])).unwrap();
        let second = backend.running_config(&flags(&["interface"])).unwrap();
        assert_eq!(first, second);
        assert_eq!(backend.transport().requests.len(), 1);
        assert!(first.starts_with("header"));
    }

    #[test]
    fn test_section_fallback() {
        let mut backend = backend();
        let output = backend
            .running_config(&flags(&["interface", "| section lldp"]))
            .unwrap();
        assert!(output.ends_with("[interface]"));
        assert_eq!(
            backend.transport().requests,
            vec!["interface | section lldp", "interface"]
        );
        assert!(backend.cache().get(&flags(&["interface", "| section lldp"])).is_some());
    }

    #[test]
    fn test_other_errors_propagate() {
        let mut backend = backend();
        let err = backend.running_config(&flags(&["bogus"])).unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
    }

    #[test]
    fn test_invalidate_forces_reread() {
        let mut backend = backend();
        let facts = backend.gather(ResourceName::Banner).unwrap();
        assert_eq!(facts.banners[0].text.as_deref(), Some("hi"));
        backend.invalidate();
        backend.gather(ResourceName::Banner).unwrap();
        assert_eq!(backend.transport().requests.len(), 2);
    }

    #[test]
    fn test_edit_config_forwards() {
        let mut backend = backend();
        backend.edit_config(&[]).unwrap();
        backend.edit_config(&flags(&["lldp enable"])).unwrap();
        assert_eq!(backend.transport().sent, vec!["lldp enable"]);
    }
}
