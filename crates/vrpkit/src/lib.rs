//! # vrpkit
//!
//! Huawei VRP (S series) resources for the `reconcile` engine.
//!
//! This crate provides:
//! - Command emitters for interfaces, per-interface LLDP, global LLDP and
//!   banners
//! - Typed, validated task schemas for each of them
//! - A backend seam for gathering facts and applying commands, with a
//!   cached CLI backend and an in-memory device model
//!
//! ## Example
//!
//! ```no_run
//! use reconcile::{Options, Policy, reconcile};
//! use vrpkit::backend::{CommandSink, FactsProvider, ResourceName};
//! use vrpkit::backend::memory::MemoryDevice;
//! use vrpkit::resources::interfaces::{self, InterfaceConfig, Interfaces};
//!
//! let mut device = MemoryDevice::new();
//! let have = device.gather(ResourceName::Interfaces).unwrap().interfaces;
//! let want = vec![InterfaceConfig { mtu: Some(9000), ..InterfaceConfig::named("GE0/0/1") }];
//!
//! let commands = reconcile(
//!     &Interfaces,
//!     &interfaces::instances(&want),
//!     &interfaces::instances(&have),
//!     Policy::Merged,
//!     &Options::default(),
//! ).unwrap();
//! device.edit_config(&commands.lines()).unwrap();
//! ```

pub mod backend;
pub mod error;
pub mod interface_name;
pub mod resources;
pub mod schema;

pub use backend::{Backend, CommandSink, Facts, FactsProvider, ResourceName};
pub use error::{Error, ErrorCategory, Result};
pub use schema::Validate;
