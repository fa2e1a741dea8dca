//! # Reconcile
//!
//! A small compiler from declared network configuration to CLI commands.
//!
//! Given the desired configuration of a set of resource instances ("want"),
//! the configuration observed on the device ("have") and a policy, the engine
//! produces the minimal ordered list of commands that moves have to want.
//! It performs no I/O: facts come in already parsed, commands go out as
//! plain strings.
//!
//! ## Core Concepts
//!
//! - **Instance**: one resource (e.g. an interface) addressed by its identity,
//!   holding only the attributes the caller expressed
//! - **Policy**: `merged`, `replaced`, `overridden` or `deleted`
//! - **Resource**: the vendor-specific command emitter for one resource type
//! - **CommandList**: scoped, merged and de-duplicated output
//!
//! ## Example
//!
//! ```ignore
//! use reconcile::{ConfigurationSet, Instance, Options, Policy, reconcile};
//!
//! let want: ConfigurationSet<_> = vec![
//!     Instance::identity_only("GE0/0/1").with(InterfaceAttr::Mtu, 9000_i64),
//! ].into();
//! let have = facts.interfaces();
//!
//! let commands = reconcile(&Interfaces, &want, &have, Policy::Merged, &Options::default())?;
//! assert_eq!(commands.lines(), ["interface GE0/0/1", "jumboframe enable 9000", "quit"]);
//! ```
//!
//! ## Guarantees
//!
//! - Attributes absent from want never produce commands under `merged`
//! - Re-running against a device that already matches want yields nothing
//! - Want identities unknown to the device are skipped, never created
//! - Each context block appears at most once per invocation

pub mod command;
pub mod diff;
pub mod error;
pub mod matcher;
pub mod resolver;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use command::{Batch, Command, CommandList, CommandListBuilder, Scope};
pub use diff::{AttributeChange, AttributeDiff, DiffSet, DiffSummary, compare, diff, stale};
pub use error::{Error, ErrorCategory, Result};
pub use matcher::{MatchMode, pair};
pub use resolver::{Options, Reconciliation, plan, reconcile};
pub use resource::Resource;
pub use types::{Attribute, ConfigurationSet, Instance, Policy, Value};
