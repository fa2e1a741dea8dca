//! Policy resolver - runs one reconciliation policy to completion
//!
//! Every policy is a strategy over two primitive passes:
//!
//! - **clear**: an identity-only want against the have instance restricted
//!   to the attributes the real want leaves unspecified (after the resource
//!   adds the attributes want pins indirectly)
//! - **set**: the real want against the full have instance
//!
//! `replaced` and `overridden` share the same "clear then set" routine for
//! matched instances, so they always emit identical batches for them.

use crate::command::{Batch, CommandList, CommandListBuilder};
use crate::diff::{diff, stale};
use crate::error::{Error, Result};
use crate::matcher::{MatchMode, pair};
use crate::resource::Resource;
use crate::types::{ConfigurationSet, Instance, Policy};

/// Options for a reconciliation run
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// How want identities find their have partner
    pub match_mode: MatchMode,
}

/// Outcome of one policy invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub commands: CommandList,
    pub changed: bool,
}

impl Reconciliation {
    pub fn lines(&self) -> Vec<String> {
        self.commands.lines()
    }
}

/// Which passes run for an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Passes {
    Set,
    ClearThenSet,
    Clear,
}

/// Per-instance pass selection for a matched want/have pair
fn matched_passes(policy: Policy) -> Passes {
    match policy {
        Policy::Merged => Passes::Set,
        Policy::Replaced | Policy::Overridden => Passes::ClearThenSet,
        Policy::Deleted => Passes::Clear,
    }
}

/// Compile the command list that moves `have` to `want` under `policy`
///
/// Fails before emitting anything if the policy needs desired state and
/// `want` is empty, or if the resource does not offer the policy.
pub fn reconcile<R: Resource>(
    resource: &R,
    want: &ConfigurationSet<R::Attr>,
    have: &ConfigurationSet<R::Attr>,
    policy: Policy,
    opts: &Options,
) -> Result<CommandList> {
    if !resource.supports(policy) {
        return Err(Error::UnsupportedPolicy {
            resource: resource.resource_type(),
            policy,
        });
    }
    if policy.requires_want() && want.is_empty() {
        return Err(Error::EmptyWant { policy });
    }

    log::debug!(
        "Reconciling {} with state {} ({} want, {} have)",
        resource.resource_type(),
        policy,
        want.len(),
        have.len()
    );

    let mut builder = CommandListBuilder::new();
    let pairs = pair(want, have, opts.match_mode);

    match policy {
        Policy::Merged | Policy::Replaced => {
            for (w, partner) in want.iter().zip(&pairs) {
                match partner {
                    Some(i) => {
                        let h = &have.as_slice()[*i];
                        run_passes(resource, matched_passes(policy), w, h, &mut builder);
                    }
                    None => skip_unmatched(resource, w),
                }
            }
        }
        Policy::Deleted if want.is_empty() => {
            for h in have {
                let bare = Instance::identity_only(h.identity());
                run_passes(resource, Passes::Clear, &bare, h, &mut builder);
            }
        }
        Policy::Deleted => {
            for (w, partner) in want.iter().zip(&pairs) {
                match partner {
                    Some(i) => {
                        let bare = Instance::identity_only(w.identity());
                        let h = &have.as_slice()[*i];
                        run_passes(resource, Passes::Clear, &bare, h, &mut builder);
                    }
                    None => skip_unmatched(resource, w),
                }
            }
        }
        Policy::Overridden => {
            for (i, h) in have.iter().enumerate() {
                let partners: Vec<&Instance<R::Attr>> = want
                    .iter()
                    .zip(&pairs)
                    .filter(|(_, p)| **p == Some(i))
                    .map(|(w, _)| w)
                    .collect();

                if partners.is_empty() {
                    let bare = Instance::identity_only(h.identity());
                    run_passes(resource, Passes::Clear, &bare, h, &mut builder);
                } else {
                    for w in partners {
                        run_passes(resource, Passes::ClearThenSet, w, h, &mut builder);
                    }
                }
            }
            for (w, partner) in want.iter().zip(&pairs) {
                if partner.is_none() {
                    skip_unmatched(resource, w);
                }
            }
        }
    }

    Ok(builder.build())
}

/// [`reconcile`] plus the `changed` flag
pub fn plan<R: Resource>(
    resource: &R,
    want: &ConfigurationSet<R::Attr>,
    have: &ConfigurationSet<R::Attr>,
    policy: Policy,
    opts: &Options,
) -> Result<Reconciliation> {
    let commands = reconcile(resource, want, have, policy, opts)?;
    let changed = commands.changed();
    Ok(Reconciliation { commands, changed })
}

fn skip_unmatched<R: Resource>(resource: &R, want: &Instance<R::Attr>) {
    log::warn!(
        "Skipping {} '{}': not present on the device",
        resource.resource_type(),
        want.identity()
    );
}

/// Run the selected passes for one want/have pair
///
/// Batches address the have identity, so a containment match still lands in
/// the device's own context.
fn run_passes<R: Resource>(
    resource: &R,
    passes: Passes,
    want: &Instance<R::Attr>,
    have: &Instance<R::Attr>,
    builder: &mut CommandListBuilder,
) {
    let identity = have.identity();
    let scope = resource.scope(identity);

    if matches!(passes, Passes::Clear | Passes::ClearThenSet) {
        let view = have.project_absent_in(&resource.effective_want(identity, want));
        let bare = Instance::identity_only(identity);
        let removals = stale(&bare, &view);
        if !removals.is_empty() {
            log::debug!("{identity}: clearing {:?}", removals.names());
            let commands = resource.clear_commands(identity, &removals, &view);
            builder.push(Batch::new(scope.clone(), commands));
        }
    }

    if matches!(passes, Passes::Set | Passes::ClearThenSet) {
        let changes = diff(want, have);
        if changes.is_empty() {
            log::debug!("{identity}: already in desired state");
        } else {
            log::debug!("{identity}: setting {:?}", changes.names());
            let commands = resource.set_commands(identity, &changes, want, have);
            builder.push(Batch::new(scope, commands));
        }
    }
}
