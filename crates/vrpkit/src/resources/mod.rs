//! Resource emitters and their typed task schemas

pub mod banner;
pub mod interfaces;
pub mod lldp_global;
pub mod lldp_interfaces;

pub use banner::{Banner, BannerAttr, BannerConfig, BannerKind, BannerState};
pub use interfaces::{Duplex, InterfaceAttr, InterfaceConfig, Interfaces};
pub use lldp_global::{LldpGlobal, LldpGlobalAttr, LldpGlobalConfig};
pub use lldp_interfaces::{LldpInterfaceAttr, LldpInterfaceConfig, LldpInterfaces};
