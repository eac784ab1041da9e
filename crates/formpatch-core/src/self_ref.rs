//! Self-reference reduction.
//!
//! A quad whose subject and object are the same node is the RDFa idiom for
//! "this field is about the current resource". When a subject has such a
//! quad, its other quads are scaffolding and are dropped from the payload.
//! This is a content heuristic, not an RDF rule, so it only runs when
//! enabled in [`crate::PatchOptions`].

use crate::snapshot::QuadSet;
use crate::term::Node;
use ahash::AHashSet;

pub fn reduce_self_references(quads: &QuadSet) -> QuadSet {
    let self_subjects: AHashSet<&Node> = quads
        .quads()
        .filter(|quad| quad.is_self_reference())
        .map(|quad| &quad.subject)
        .collect();

    if self_subjects.is_empty() {
        return quads.clone();
    }

    let kept: QuadSet = quads
        .quads()
        .filter(|quad| quad.is_self_reference() || !self_subjects.contains(&quad.subject))
        .cloned()
        .collect();

    tracing::debug!(
        self_references = self_subjects.len(),
        dropped = quads.len() - kept.len(),
        "reduced self-referencing subjects"
    );
    kept
}
