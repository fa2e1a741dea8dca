//! Identity matching between want and have instances

use crate::types::{Attribute, ConfigurationSet, Instance};
use serde::{Deserialize, Serialize};

/// How a want identity finds its have partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Identities must be equal
    Exact,
    /// Equal identities first; otherwise a have identity containing the want
    /// identity as a substring (truncated device names)
    ///
    /// # Warning
    ///
    /// Containment is not prefix-safe. A want `GE0/0/1` that is missing on
    /// the device matches an existing `GE0/0/10`, and that port gets
    /// reconfigured. Use [`MatchMode::Exact`] when want names are already in
    /// device spelling.
    #[default]
    ExactThenContains,
}

impl MatchMode {
    /// Find the have partner for one want identity
    ///
    /// Exact matches are searched over the whole have set before the
    /// containment fallback is considered.
    pub fn find<'h, A: Attribute>(
        self,
        identity: &str,
        have: &'h ConfigurationSet<A>,
    ) -> Option<(usize, &'h Instance<A>)> {
        let exact = have
            .iter()
            .enumerate()
            .find(|(_, h)| h.identity() == identity);

        match (exact, self) {
            (Some(found), _) => Some(found),
            (None, Self::Exact) => None,
            (None, Self::ExactThenContains) => {
                let found = have
                    .iter()
                    .enumerate()
                    .find(|(_, h)| !identity.is_empty() && h.identity().contains(identity));
                if let Some((_, h)) = found {
                    log::debug!(
                        "'{identity}' matched '{}' by containment",
                        h.identity()
                    );
                }
                found
            }
        }
    }
}

/// Pair every want instance with the index of its have partner
///
/// The result is aligned with `want`; `None` marks an instance with nothing
/// to reconcile against.
pub fn pair<A: Attribute>(
    want: &ConfigurationSet<A>,
    have: &ConfigurationSet<A>,
    mode: MatchMode,
) -> Vec<Option<usize>> {
    want.iter()
        .map(|w| mode.find(w.identity(), have).map(|(i, _)| i))
        .collect()
}
