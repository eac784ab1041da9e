//! Formpatch core: RDF form diff & patch engine.
//!
//! A form's RDFa markup implies a set of RDF quads. This crate takes two
//! snapshots of that set (as loaded, and as edited), computes the minimal
//! delta, repairs the delta so blank-node substructures move as a whole, and
//! serializes the result as a SPARQL 1.1 Update request body:
//!
//! ```text
//! stored ──┐
//!          ├─► diff ─► [self-reference reduction] ─► bounded-description closure ─► writer ─► body
//! revised ─┘
//! ```
//!
//! Extraction of the snapshots and the network PATCH are collaborators; this
//! crate does no I/O and keeps no state between calls.

pub mod closure;
pub mod diff;
pub mod entities;
pub mod options;
pub mod patch;
pub mod request;
pub mod self_ref;
pub mod snapshot;
pub mod term;
pub mod vocab;
pub mod writer;

pub use closure::{close_bounded_description, close_delta};
pub use diff::{diff, Delta};
pub use options::{DeleteClauseStyle, PatchOptions, SelfReferenceReduction};
pub use patch::FormPatch;
pub use request::{Precondition, UpdateRequest, SPARQL_UPDATE_CONTENT_TYPE};
pub use self_ref::reduce_self_references;
pub use snapshot::{BlankNodeLabels, Extraction, QuadSet, Snapshot, SnapshotBuilder};
pub use term::{BlankNodeId, Literal, Node, Quad, Term, TermError};
pub use writer::{quad_key, write_update, EMPTY_UPDATE};
