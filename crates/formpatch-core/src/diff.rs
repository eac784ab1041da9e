//! Snapshot difference.

use crate::snapshot::{QuadSet, Snapshot};

/// Quads only in the old snapshot (`removed`) and only in the new one
/// (`added`).
///
/// Straight out of [`diff`] no key is on both sides. The bounded-description
/// closure may later mirror unchanged quads onto both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    pub removed: QuadSet,
    pub added: QuadSet,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Key-indexed set difference in both directions, `O(|old| + |new|)`.
pub fn diff(old: &Snapshot, new: &Snapshot) -> Delta {
    let removed: QuadSet = old
        .iter()
        .filter(|(key, _)| !new.contains_key(key))
        .map(|(_, quad)| quad.clone())
        .collect();
    let added: QuadSet = new
        .iter()
        .filter(|(key, _)| !old.contains_key(key))
        .map(|(_, quad)| quad.clone())
        .collect();

    tracing::debug!(
        stored = old.len(),
        revised = new.len(),
        removed = removed.len(),
        added = added.len(),
        "computed snapshot diff"
    );

    Delta { removed, added }
}
