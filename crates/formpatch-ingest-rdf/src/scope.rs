//! Form scoping.
//!
//! A form is about one designated resource. Only quads whose subject is that
//! resource, or a blank node reachable from it through object positions,
//! belong in the form's snapshot.

use formpatch_core::{BlankNodeId, Node, Quad, Snapshot};
use std::collections::HashSet;

pub fn scope_to_resource(snapshot: &Snapshot, resource: &str) -> Snapshot {
    let root = Node::iri(resource);
    let quads = snapshot.quads();

    let mut kept: Vec<Quad> = Vec::new();
    let mut seen: HashSet<BlankNodeId> = HashSet::new();
    let mut pending: Vec<BlankNodeId> = Vec::new();

    let mut take = |quad: &Quad, pending: &mut Vec<BlankNodeId>| {
        if let Some(id) = quad.object.as_blank() {
            if seen.insert(id.clone()) {
                pending.push(id.clone());
            }
        }
        kept.push(quad.clone());
    };

    for quad in quads.quads().filter(|quad| quad.subject == root) {
        take(quad, &mut pending);
    }
    while let Some(id) = pending.pop() {
        for key in quads.keys_with_blank_subject(&id) {
            if let Some(quad) = quads.get(key) {
                take(quad, &mut pending);
            }
        }
    }

    let scoped = Snapshot::build(kept);
    tracing::debug!(
        resource,
        total = snapshot.len(),
        scoped = scoped.len(),
        "scoped snapshot to form resource"
    );
    scoped
}
