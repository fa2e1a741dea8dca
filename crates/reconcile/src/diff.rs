//! Attribute diff computation between a want and a have instance

use crate::types::{Attribute, Instance, Value};

/// How one attribute differs between want and have
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeChange {
    /// Present on both sides with equal values
    Unchanged(Value),
    /// Expressed by want, absent on the device
    Added(Value),
    /// Expressed by want with a different value than the device
    Changed { old: Value, new: Value },
    /// Present on the device, left absent by want
    Removed(Value),
}

impl AttributeChange {
    /// The value want asks for, if any
    pub fn new_value(&self) -> Option<&Value> {
        match self {
            Self::Added(v) | Self::Unchanged(v) => Some(v),
            Self::Changed { new, .. } => Some(new),
            Self::Removed(_) => None,
        }
    }

    /// The value currently on the device, if any
    pub fn old_value(&self) -> Option<&Value> {
        match self {
            Self::Unchanged(v) | Self::Removed(v) => Some(v),
            Self::Changed { old, .. } => Some(old),
            Self::Added(_) => None,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged(_))
    }
}

/// Result of comparing one attribute between two instances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDiff<A: Attribute> {
    pub attr: A,
    pub change: AttributeChange,
}

/// The set of attribute diffs for one instance pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSet<A: Attribute> {
    entries: Vec<AttributeDiff<A>>,
}

impl<A: Attribute> DiffSet<A> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributeDiff<A>> {
        self.entries.iter()
    }

    pub fn get(&self, attr: A) -> Option<&AttributeChange> {
        self.entries
            .iter()
            .find(|d| d.attr == attr)
            .map(|d| &d.change)
    }

    pub fn contains(&self, attr: A) -> bool {
        self.get(attr).is_some()
    }

    /// The new value for `attr` if it participates in this diff
    pub fn new_value(&self, attr: A) -> Option<&Value> {
        self.get(attr).and_then(AttributeChange::new_value)
    }

    /// The outgoing device value for `attr` if it participates in this diff
    pub fn old_value(&self, attr: A) -> Option<&Value> {
        self.get(attr).and_then(AttributeChange::old_value)
    }

    /// Whether `attr` participates with a truthy new value
    pub fn sets(&self, attr: A) -> bool {
        self.new_value(attr).is_some_and(Value::is_truthy)
    }

    /// Whether `attr` participates with a truthy outgoing value
    pub fn drops(&self, attr: A) -> bool {
        self.old_value(attr).is_some_and(Value::is_truthy)
    }

    /// Attribute names in this set, for logging
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|d| d.attr.name()).collect()
    }
}

/// Classify a single attribute
fn classify(want: Option<&Value>, have: Option<&Value>) -> Option<AttributeChange> {
    match (want, have) {
        (None, None) => None,
        (Some(w), None) => Some(AttributeChange::Added(w.clone())),
        (None, Some(h)) => Some(AttributeChange::Removed(h.clone())),
        (Some(w), Some(h)) if w == h => Some(AttributeChange::Unchanged(w.clone())),
        (Some(w), Some(h)) => Some(AttributeChange::Changed {
            old: h.clone(),
            new: w.clone(),
        }),
    }
}

/// Full per-attribute comparison, including unchanged and removed entries
pub fn compare<A: Attribute>(want: &Instance<A>, have: &Instance<A>) -> DiffSet<A> {
    let entries = A::all()
        .iter()
        .filter_map(|attr| {
            classify(want.get(*attr), have.get(*attr)).map(|change| AttributeDiff {
                attr: *attr,
                change,
            })
        })
        .collect();
    DiffSet { entries }
}

/// Differences the set pass must act on
///
/// Only attributes present in `want` participate; an attribute absent from
/// `want` never produces an entry regardless of `have`. Returns an empty set
/// when every expressed attribute already matches.
pub fn diff<A: Attribute>(want: &Instance<A>, have: &Instance<A>) -> DiffSet<A> {
    let entries = compare(want, have)
        .entries
        .into_iter()
        .filter(|d| matches!(d.change, AttributeChange::Added(_) | AttributeChange::Changed { .. }))
        .collect();
    DiffSet { entries }
}

/// Device values the clear pass must act on
///
/// Every attribute present in `have` that `want` leaves absent, as
/// [`AttributeChange::Removed`].
pub fn stale<A: Attribute>(want: &Instance<A>, have: &Instance<A>) -> DiffSet<A> {
    let entries = compare(want, have)
        .entries
        .into_iter()
        .filter(|d| matches!(d.change, AttributeChange::Removed(_)))
        .collect();
    DiffSet { entries }
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub added: usize,
    pub changed: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    /// Create a summary from a comparison
    pub fn from_diffs<A: Attribute>(diffs: &DiffSet<A>) -> Self {
        let mut summary = Self::default();
        for d in diffs.iter() {
            match d.change {
                AttributeChange::Added(_) => summary.added += 1,
                AttributeChange::Changed { .. } => summary.changed += 1,
                AttributeChange::Removed(_) => summary.removed += 1,
                AttributeChange::Unchanged(_) => summary.unchanged += 1,
            }
        }
        summary
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.added + self.changed + self.removed > 0
    }
}
