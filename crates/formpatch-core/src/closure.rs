//! Bounded-description closure over blank-node chains.
//!
//! Blank nodes have no identity the server could match on, so an update has to
//! move a blank-node subtree as a whole or not at all. Starting from a seed
//! quad, every quad that mentions one of its blank nodes (as subject or as
//! object) is pulled into the destination side of the delta and mirrored onto
//! the other side, and the pull repeats from each pulled quad.
//!
//! "Already in destination" is the visited check, so cycles (including
//! `_:b p _:b`) terminate.

use crate::diff::Delta;
use crate::snapshot::{QuadSet, Snapshot};
use crate::term::Quad;

/// Pull every quad of `source` reachable from `seed` through blank nodes into
/// `destination` and `mirror`. Returns the number of quads pulled.
pub fn close_bounded_description(
    seed: &Quad,
    source: &Snapshot,
    destination: &mut QuadSet,
    mirror: &mut QuadSet,
) -> usize {
    let source = source.quads();
    let mut pulled = 0;
    let mut pending: Vec<Quad> = vec![seed.clone()];

    while let Some(quad) = pending.pop() {
        let blanks = quad
            .subject
            .as_blank()
            .into_iter()
            .chain(quad.object.as_blank());

        for id in blanks {
            let touching = source
                .keys_with_blank_object(id)
                .iter()
                .chain(source.keys_with_blank_subject(id));
            for key in touching {
                if destination.contains_key(key) {
                    continue;
                }
                let Some(found) = source.get(key) else {
                    continue;
                };
                tracing::trace!(quad = %key, "pulled into bounded description");
                destination.insert_keyed(key.clone(), found.clone());
                mirror.insert_keyed(key.clone(), found.clone());
                pending.push(found.clone());
                pulled += 1;
            }
        }
    }

    pulled
}

/// Close both sides of a delta: `removed` against `stored` (mirroring into
/// `added`), then `added` against `revised` (mirroring into `removed`).
pub fn close_delta(delta: &mut Delta, stored: &Snapshot, revised: &Snapshot) {
    let seeds: Vec<Quad> = delta.removed.quads().cloned().collect();
    let mut pulled_removed = 0;
    for seed in &seeds {
        pulled_removed +=
            close_bounded_description(seed, stored, &mut delta.removed, &mut delta.added);
    }

    let seeds: Vec<Quad> = delta.added.quads().cloned().collect();
    let mut pulled_added = 0;
    for seed in &seeds {
        pulled_added +=
            close_bounded_description(seed, revised, &mut delta.added, &mut delta.removed);
    }

    tracing::debug!(
        pulled_removed,
        pulled_added,
        removed = delta.removed.len(),
        added = delta.added.len(),
        "closed bounded descriptions"
    );
}
