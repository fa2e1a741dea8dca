//! Resource trait - the command emitter seam
//!
//! A Resource knows the vendor syntax for one resource type: which context a
//! batch of commands lives in, and how to render the set and clear commands
//! for an attribute diff. The policy resolver owns everything else.

use crate::command::Scope;
use crate::diff::DiffSet;
use crate::types::{Attribute, Instance, Policy};

/// Command emitter for one resource type
///
/// # Example
///
/// ```ignore
/// use reconcile::{Attribute, DiffSet, Instance, Resource, Scope};
///
/// struct Hostname;
///
/// impl Resource for Hostname {
///     type Attr = HostnameAttr;
///
///     fn resource_type(&self) -> &'static str {
///         "hostname"
///     }
///
///     fn scope(&self, _identity: &str) -> Option<Scope> {
///         None
///     }
///
///     fn set_commands(&self, _id: &str, diff: &DiffSet<HostnameAttr>,
///                     _want: &Instance<HostnameAttr>, _have: &Instance<HostnameAttr>) -> Vec<String> {
///         diff.new_value(HostnameAttr::Name)
///             .map(|v| vec![format!("sysname {v}")])
///             .unwrap_or_default()
///     }
///
///     fn clear_commands(&self, _id: &str, stale: &DiffSet<HostnameAttr>,
///                       _have: &Instance<HostnameAttr>) -> Vec<String> {
///         if stale.drops(HostnameAttr::Name) { vec!["undo sysname".into()] } else { vec![] }
///     }
/// }
/// ```
pub trait Resource {
    /// Attribute enumeration of this resource type
    type Attr: Attribute;

    /// Resource type name (e.g. "interfaces")
    fn resource_type(&self) -> &'static str;

    /// Context a batch for `identity` must be entered into, or `None` for
    /// top-level commands
    fn scope(&self, identity: &str) -> Option<Scope>;

    /// Whether this resource type offers `policy`
    fn supports(&self, policy: Policy) -> bool {
        let _ = policy;
        true
    }

    /// `want` plus the attributes it pins without naming them
    ///
    /// The clear pass leaves these alone. A rule that makes one attribute
    /// imply another (a fixed speed implies negotiation off) belongs here,
    /// otherwise replaced would reset the implied attribute on every run.
    fn effective_want(
        &self,
        identity: &str,
        want: &Instance<Self::Attr>,
    ) -> Instance<Self::Attr> {
        let _ = identity;
        want.clone()
    }

    /// Commands that apply the added/changed attributes in `diff`
    ///
    /// `want` and `have` are the complete instances, for rules that depend
    /// on attributes outside the diff. Commands are returned in the order
    /// they must reach the device.
    fn set_commands(
        &self,
        identity: &str,
        diff: &DiffSet<Self::Attr>,
        want: &Instance<Self::Attr>,
        have: &Instance<Self::Attr>,
    ) -> Vec<String>;

    /// Commands that return the attributes in `stale` to device defaults
    ///
    /// Every entry of `stale` is a removal. `have` is the device view the
    /// clear pass works against (already restricted to the attributes the
    /// caller left unspecified).
    fn clear_commands(
        &self,
        identity: &str,
        stale: &DiffSet<Self::Attr>,
        have: &Instance<Self::Attr>,
    ) -> Vec<String>;
}
