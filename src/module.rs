//! Resource-module runner
//!
//! One run: validate the task, gather facts, compile commands, apply them
//! (unless in check mode), then re-read the device and report before/after
//! whenever there were commands.

use crate::error::Result;
use crate::task::Task;
use reconcile::{CommandList, ConfigurationSet, MatchMode, Options, Policy, Resource, pair};
use serde::Serialize;
use vrpkit::backend::{Backend, Facts};
use vrpkit::interface_name;
use vrpkit::resources::{
    Banner, BannerConfig, Interfaces, LldpGlobal, LldpInterfaces, banner, interfaces, lldp_global,
    lldp_interfaces,
};

/// Knobs for a run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute and report commands without sending them
    pub check_mode: bool,
    /// How want interface names find their device counterpart
    pub match_mode: MatchMode,
    /// Expand abbreviated interface names on both sides before matching
    pub normalize_names: bool,
}

/// Outcome of one task run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleResult {
    pub changed: bool,
    pub commands: Vec<String>,
    pub before: serde_json::Value,
    /// Present whenever commands were produced; in check mode it equals
    /// `before`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ModuleResult {
    /// Unified diff of the pretty-printed before and after facts; empty when
    /// nothing changed on the device
    pub fn render_diff(&self) -> String {
        let Some(after) = &self.after else {
            return String::new();
        };
        let before = serde_json::to_string_pretty(&self.before).unwrap_or_default() + "\n";
        let after = serde_json::to_string_pretty(after).unwrap_or_default() + "\n";

        similar::TextDiff::from_lines(&before, &after)
            .unified_diff()
            .context_radius(3)
            .header("before", "after")
            .to_string()
    }
}

/// Run one task against a device
///
/// Any failure is returned as-is; commands accepted before a rejected one
/// stay applied on the device.
pub fn run<B: Backend + ?Sized>(task: &Task, backend: &mut B, opts: &RunOptions) -> Result<ModuleResult> {
    task.validate()?;
    let resource = task.resource();

    log::info!("Gathering {resource} facts");
    let facts = backend.gather(resource)?;
    let before = facts.section(resource)?;

    let mut warnings = Vec::new();
    let commands = compile(task, &facts, opts, &mut warnings)?.lines();
    let changed = !commands.is_empty();

    let mut after = None;
    if !changed {
        log::info!("{resource}: no changes");
    } else {
        if opts.check_mode {
            log::warn!("Check mode: {} commands not sent", commands.len());
        } else {
            log::info!("Applying {} commands for {resource}", commands.len());
            backend.edit_config(&commands)?;
            backend.invalidate();
        }
        let facts = backend.gather(resource)?;
        after = Some(facts.section(resource)?);
    }

    Ok(ModuleResult {
        changed,
        commands,
        before,
        after,
        warnings,
    })
}

/// Commands for `task` against `facts`, without touching the device
pub fn compile(
    task: &Task,
    facts: &Facts,
    opts: &RunOptions,
    warnings: &mut Vec<String>,
) -> Result<CommandList> {
    let engine = Options {
        match_mode: opts.match_mode,
    };
    let policy = task.policy();

    match task {
        Task::Interfaces { config, .. } => {
            let want = normalized(config, opts.normalize_names, |c| &mut c.name);
            let have = normalized(&facts.interfaces, opts.normalize_names, |c| &mut c.name);
            reconcile_task(
                &Interfaces,
                &interfaces::instances(&want),
                &interfaces::instances(&have),
                policy,
                &engine,
                warnings,
            )
        }
        Task::LldpInterfaces { config, .. } => {
            let want = normalized(config, opts.normalize_names, |c| &mut c.name);
            let have = normalized(&facts.lldp_interfaces, opts.normalize_names, |c| &mut c.name);
            reconcile_task(
                &LldpInterfaces,
                &lldp_interfaces::instances(&want),
                &lldp_interfaces::instances(&have),
                policy,
                &engine,
                warnings,
            )
        }
        Task::LldpGlobal { config, .. } => reconcile_task(
            &LldpGlobal,
            &lldp_global::want_set(config.as_ref()),
            &lldp_global::have_set(&facts.lldp_global),
            policy,
            &engine,
            warnings,
        ),
        Task::Banner {
            banner: kind,
            text,
            state,
        } => {
            let want = BannerConfig {
                banner: *kind,
                text: text.clone(),
            };
            reconcile_task(
                &Banner,
                &banner::want_set(&want, *state)?,
                &banner::have_set(&facts.banners),
                policy,
                &engine,
                warnings,
            )
        }
    }
}

fn reconcile_task<R: Resource>(
    resource: &R,
    want: &ConfigurationSet<R::Attr>,
    have: &ConfigurationSet<R::Attr>,
    policy: Policy,
    opts: &Options,
    warnings: &mut Vec<String>,
) -> Result<CommandList> {
    let commands = reconcile::reconcile(resource, want, have, policy, opts)?;

    for (w, partner) in want.iter().zip(pair(want, have, opts.match_mode)) {
        if partner.is_none() {
            warnings.push(format!(
                "{} '{}' is not present on the device and was skipped",
                resource.resource_type(),
                w.identity()
            ));
        }
    }
    Ok(commands)
}

fn normalized<T: Clone>(items: &[T], enabled: bool, name: impl Fn(&mut T) -> &mut String) -> Vec<T> {
    let mut items = items.to_vec();
    if enabled {
        for item in &mut items {
            let field = name(item);
            *field = interface_name::normalize(field);
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use vrpkit::backend::memory::MemoryDevice;
    use vrpkit::resources::{BannerKind, BannerState, InterfaceConfig, LldpGlobalConfig};

    fn device() -> MemoryDevice {
        let _ = env_logger::builder().is_test(true).try_init();
        MemoryDevice::with_facts(Facts {
            interfaces: vec![
                InterfaceConfig {
                    enabled: Some(true),
                    ..InterfaceConfig::named("GE0/0/1")
                },
                InterfaceConfig {
                    description: Some("old".into()),
                    ..InterfaceConfig::named("GE0/0/2")
                },
            ],
            ..Default::default()
        })
    }

    fn mtu_task(policy: Policy) -> Task {
        Task::Interfaces {
            state: policy,
            config: vec![InterfaceConfig {
                mtu: Some(9000),
                enabled: None,
                ..InterfaceConfig::named("GE0/0/1")
            }],
        }
    }

    #[test]
    fn test_run_applies_and_reports() {
        let mut device = device();
        let result = run(&mtu_task(Policy::Merged), &mut device, &RunOptions::default()).unwrap();

        assert!(result.changed);
        assert_eq!(
            result.commands,
            vec!["interface GE0/0/1", "jumboframe enable 9000", "quit"]
        );
        let after = result.after.clone().unwrap();
        assert_eq!(after[0]["mtu"], 9000);
        assert!(result.render_diff().contains("+    \"mtu\": 9000"));
        assert_eq!(device.gathers(), 2);

        let again = run(&mtu_task(Policy::Merged), &mut device, &RunOptions::default()).unwrap();
        assert!(!again.changed);
        assert!(again.after.is_none());
        assert!(again.render_diff().is_empty());
    }

    #[test]
    fn test_check_mode_leaves_device_untouched() {
        let mut device = device();
        let opts = RunOptions {
            check_mode: true,
            ..Default::default()
        };
        let result = run(&mtu_task(Policy::Merged), &mut device, &opts).unwrap();

        assert!(result.changed);
        assert_eq!(result.after.as_ref(), Some(&result.before));
        assert!(result.render_diff().is_empty());
        assert!(device.applied().is_empty());
        assert_eq!(device.facts().interfaces[0].mtu, None);
        assert_eq!(device.gathers(), 2);
    }

    #[test]
    fn test_overridden_resets_other_interfaces() {
        let mut device = device();
        let result = run(&mtu_task(Policy::Overridden), &mut device, &RunOptions::default()).unwrap();
        assert_eq!(
            result.commands,
            vec![
                "interface GE0/0/1",
                "jumboframe enable 9000",
                "quit",
                "interface GE0/0/2",
                "undo description",
                "quit",
            ]
        );
        assert_eq!(device.facts().interfaces[1].description, None);
    }

    #[test]
    fn test_unknown_interface_warns() {
        let mut device = device();
        let task = Task::Interfaces {
            state: Policy::Merged,
            config: vec![InterfaceConfig::named("GE0/0/9")],
        };
        let result = run(&task, &mut device, &RunOptions::default()).unwrap();
        assert!(!result.changed);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("GE0/0/9"));
    }

    #[test]
    fn test_empty_config_is_precondition_error() {
        let mut device = device();
        let task = Task::Interfaces {
            state: Policy::Replaced,
            config: vec![],
        };
        let err = run(&task, &mut device, &RunOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value of config parameter must not be empty for state replaced"
        );
        assert_eq!(device.gathers(), 1);
    }

    #[test]
    fn test_device_rejection_is_terminal() {
        let mut device = device().reject_commands("jumboframe");
        let err = run(&mtu_task(Policy::Merged), &mut device, &RunOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Vrp(vrpkit::Error::CommandRejected { .. })));
        assert_eq!(device.applied(), ["interface GE0/0/1".to_string()]);
    }

    #[test]
    fn test_normalized_names_match_device_spelling() {
        let mut device = MemoryDevice::with_facts(Facts {
            interfaces: vec![InterfaceConfig::named("GigabitEthernet0/0/1")],
            ..Default::default()
        });
        let opts = RunOptions {
            normalize_names: true,
            ..Default::default()
        };
        let result = run(&mtu_task(Policy::Merged), &mut device, &opts).unwrap();
        assert_eq!(result.commands[0], "interface GigabitEthernet0/0/1");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_lldp_global_and_banner() {
        let mut device = MemoryDevice::new();
        let lldp = Task::LldpGlobal {
            state: Policy::Merged,
            config: Some(LldpGlobalConfig {
                enabled: Some(true),
                timer: Some(10),
                ..Default::default()
            }),
        };
        let result = run(&lldp, &mut device, &RunOptions::default()).unwrap();
        assert_eq!(
            result.commands,
            vec!["lldp enable", "lldp message-transmission interval 10"]
        );

        let banner = Task::Banner {
            banner: BannerKind::Shell,
            text: Some("welcome".into()),
            state: BannerState::Present,
        };
        let result = run(&banner, &mut device, &RunOptions::default()).unwrap();
        assert!(result.changed);
        assert_eq!(device.facts().banners[0].text.as_deref(), Some("welcome"));

        let removed = Task::Banner {
            banner: BannerKind::Shell,
            text: None,
            state: BannerState::Absent,
        };
        let result = run(&removed, &mut device, &RunOptions::default()).unwrap();
        assert_eq!(result.commands, vec!["undo header shell"]);
        assert!(device.facts().banners.is_empty());
    }

    #[test]
    fn test_result_serialization_skips_empty_fields() {
        let mut device = device();
        let opts = RunOptions {
            check_mode: true,
            ..Default::default()
        };
        let result = run(&mtu_task(Policy::Merged), &mut device, &opts).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("after").is_some());
        assert!(json.get("warnings").is_none());
        assert_eq!(json["changed"], true);

        let task = Task::Interfaces {
            state: Policy::Merged,
            config: vec![InterfaceConfig {
                enabled: Some(true),
                ..InterfaceConfig::named("GE0/0/1")
            }],
        };
        let result = run(&task, &mut device, &RunOptions::default()).unwrap();
        assert!(!result.changed);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("after").is_none());
    }
}
