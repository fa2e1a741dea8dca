//! # vrpsync
//!
//! Declarative configuration of Huawei VRP switches.
//!
//! A [`Task`] names a resource, a state and the desired configuration;
//! [`run`] gathers the device's current configuration, compiles the commands
//! that close the gap, applies them and reports the before/after facts.
//!
//! ## Example
//!
//! ```no_run
//! use vrpsync::{RunOptions, TaskFile, run};
//! use vrpkit::backend::memory::MemoryDevice;
//!
//! let file = TaskFile::load("~/network/site.toml").unwrap();
//! let mut device = MemoryDevice::new();
//! for task in &file.tasks {
//!     let result = run(task, &mut device, &RunOptions::default()).unwrap();
//!     print!("{}", result.render_diff());
//! }
//! ```

pub mod error;
pub mod module;
pub mod task;

pub use error::{Error, Result};
pub use module::{ModuleResult, RunOptions, compile, run};
pub use task::{ConfigFormat, Task, TaskFile};
