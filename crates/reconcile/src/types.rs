//! Core types for want/have reconciliation

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A closed set of attribute names for one resource type.
///
/// Implemented by a fieldless enum per resource (e.g. interface attributes).
/// The declaration order of [`Attribute::all`] is the order used for
/// reporting, not for command emission.
pub trait Attribute: Copy + Ord + fmt::Debug + 'static {
    /// Every attribute of the resource type
    fn all() -> &'static [Self];

    /// Schema name of the attribute (e.g. "description")
    fn name(self) -> &'static str;
}

/// A single attribute value
///
/// An attribute the caller expressed no opinion about is simply absent from
/// the instance; there is no "null" variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Value {
    /// Truthiness used by the emitters: non-blank string, non-zero int, `true`
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Str(s) => !s.trim().is_empty(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// String payload, trimmed
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.trim()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a.trim() == b.trim(),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{}", s.trim()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// One resource instance (e.g. one interface), addressed by its identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance<A: Attribute> {
    identity: String,
    attrs: BTreeMap<A, Value>,
}

impl<A: Attribute> Instance<A> {
    /// An instance carrying only its identity ("touch, change nothing")
    pub fn identity_only(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style setter
    pub fn with(mut self, attr: A, value: impl Into<Value>) -> Self {
        self.set(attr, value);
        self
    }

    /// Builder-style optional setter; `None` leaves the attribute absent
    pub fn with_opt<V: Into<Value>>(mut self, attr: A, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.set(attr, v);
        }
        self
    }

    pub fn set(&mut self, attr: A, value: impl Into<Value>) {
        self.attrs.insert(attr, value.into());
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn get(&self, attr: A) -> Option<&Value> {
        self.attrs.get(&attr)
    }

    /// Whether the attribute is present and truthy
    pub fn is_set(&self, attr: A) -> bool {
        self.get(attr).is_some_and(Value::is_truthy)
    }

    /// Whether the attribute is present and explicitly `false`
    pub fn is_false(&self, attr: A) -> bool {
        self.get(attr).and_then(Value::as_bool) == Some(false)
    }

    /// True when no attribute is expressed
    pub fn is_bare(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn attributes(&self) -> impl Iterator<Item = (A, &Value)> {
        self.attrs.iter().map(|(a, v)| (*a, v))
    }

    /// Copy of `self` keeping only the attributes that `want` leaves absent
    ///
    /// The identity is kept. Against an identity-only `want` this is a plain
    /// clone.
    pub fn project_absent_in(&self, want: &Self) -> Self {
        Self {
            identity: self.identity.clone(),
            attrs: self
                .attrs
                .iter()
                .filter(|(attr, _)| want.get(**attr).is_none())
                .map(|(attr, value)| (*attr, value.clone()))
                .collect(),
        }
    }
}

/// Ordered collection of instances: one side (want or have) of an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationSet<A: Attribute> {
    instances: Vec<Instance<A>>,
}

impl<A: Attribute> ConfigurationSet<A> {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    pub fn push(&mut self, instance: Instance<A>) {
        self.instances.push(instance);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instance<A>> {
        self.instances.iter()
    }

    pub fn as_slice(&self) -> &[Instance<A>] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Find an instance by exact identity
    pub fn find_exact(&self, identity: &str) -> Option<&Instance<A>> {
        self.instances.iter().find(|i| i.identity() == identity)
    }
}

impl<A: Attribute> Default for ConfigurationSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Attribute> From<Vec<Instance<A>>> for ConfigurationSet<A> {
    fn from(instances: Vec<Instance<A>>) -> Self {
        Self { instances }
    }
}

impl<A: Attribute> FromIterator<Instance<A>> for ConfigurationSet<A> {
    fn from_iter<I: IntoIterator<Item = Instance<A>>>(iter: I) -> Self {
        Self {
            instances: iter.into_iter().collect(),
        }
    }
}

impl<'a, A: Attribute> IntoIterator for &'a ConfigurationSet<A> {
    type Item = &'a Instance<A>;
    type IntoIter = std::slice::Iter<'a, Instance<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.iter()
    }
}

/// Reconciliation policy (the `state` of a resource task)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Add/change only what want expresses
    #[default]
    Merged,
    /// Reset matched instances, then apply want
    Replaced,
    /// Replaced, plus reset every have instance want does not mention
    Overridden,
    /// Reset the named instances (or all, when want is empty)
    Deleted,
}

impl Policy {
    pub const ALL: [Policy; 4] = [
        Policy::Merged,
        Policy::Replaced,
        Policy::Overridden,
        Policy::Deleted,
    ];

    /// Whether an empty want is a precondition failure for this policy
    pub fn requires_want(self) -> bool {
        !matches!(self, Self::Deleted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Merged => "merged",
            Self::Replaced => "replaced",
            Self::Overridden => "overridden",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merged" => Ok(Self::Merged),
            "replaced" => Ok(Self::Replaced),
            "overridden" => Ok(Self::Overridden),
            "deleted" => Ok(Self::Deleted),
            other => Err(Error::InvalidPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub(crate) enum TestAttr {
        Color,
        Size,
        On,
    }

    impl Attribute for TestAttr {
        fn all() -> &'static [Self] {
            &[Self::Color, Self::Size, Self::On]
        }

        fn name(self) -> &'static str {
            match self {
                Self::Color => "color",
                Self::Size => "size",
                Self::On => "on",
            }
        }
    }

    #[test]
    fn test_value_equality_trims_strings() {
        assert_eq!(Value::from(" up "), Value::from("up"));
        assert_ne!(Value::from("1000"), Value::Int(1000));
        assert_ne!(Value::Bool(false), Value::Int(0));
    }

    #[test]
    fn test_value_truthiness() {
        assert!(!Value::from("   ").is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::from("x").is_truthy());
    }

    #[test]
    fn test_project_absent_in() {
        let have = Instance::identity_only("a")
            .with(TestAttr::Color, "red")
            .with(TestAttr::Size, 3_i64);
        let want = Instance::identity_only("a").with(TestAttr::Color, "blue");

        let projected = have.project_absent_in(&want);
        assert_eq!(projected.identity(), "a");
        assert!(projected.get(TestAttr::Color).is_none());
        assert_eq!(projected.get(TestAttr::Size), Some(&Value::Int(3)));

        let bare = Instance::identity_only("a");
        assert_eq!(have.project_absent_in(&bare), have);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("Merged".parse::<Policy>().unwrap(), Policy::Merged);
        assert_eq!("overridden".parse::<Policy>().unwrap(), Policy::Overridden);
        assert!("present".parse::<Policy>().is_err());
        assert!(!Policy::Deleted.requires_want());
        assert!(Policy::Replaced.requires_want());
    }
}
