//! Keyed quad collections.
//!
//! Every quad is stored under its canonical key ([`quad_key`]), so two quads
//! that serialize identically collapse to one entry and set difference by key
//! is set difference by structure. Blank-node adjacency is indexed on insert
//! for the bounded-description closure.

use crate::term::{BlankNodeId, Node, Quad, Term, TermError};
use crate::writer::quad_key;
use ahash::{AHashMap, AHashSet};

// ============================================================================
// QuadSet
// ============================================================================

/// Mutable keyed set of quads.
#[derive(Debug, Clone, Default)]
pub struct QuadSet {
    quads: AHashMap<String, Quad>,
    by_blank_subject: AHashMap<BlankNodeId, Vec<String>>,
    by_blank_object: AHashMap<BlankNodeId, Vec<String>>,
}

impl QuadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a quad; returns `false` if its key was already present.
    pub fn insert(&mut self, quad: Quad) -> bool {
        let key = quad_key(&quad);
        self.insert_keyed(key, quad)
    }

    /// Insert under a key computed by the caller with [`quad_key`].
    pub(crate) fn insert_keyed(&mut self, key: String, quad: Quad) -> bool {
        if self.quads.contains_key(&key) {
            return false;
        }
        if let Some(id) = quad.subject.as_blank() {
            self.by_blank_subject
                .entry(id.clone())
                .or_default()
                .push(key.clone());
        }
        if let Some(id) = quad.object.as_blank() {
            self.by_blank_object
                .entry(id.clone())
                .or_default()
                .push(key.clone());
        }
        self.quads.insert(key, quad);
        true
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.quads.contains_key(key)
    }

    pub fn contains(&self, quad: &Quad) -> bool {
        self.quads.contains_key(&quad_key(quad))
    }

    pub fn get(&self, key: &str) -> Option<&Quad> {
        self.quads.get(key)
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Quad)> {
        self.quads.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.quads.keys()
    }

    pub fn quads(&self) -> impl Iterator<Item = &Quad> {
        self.quads.values()
    }

    /// Quads ordered by key, for deterministic output.
    pub fn sorted(&self) -> Vec<&Quad> {
        let mut entries: Vec<(&String, &Quad)> = self.quads.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries.into_iter().map(|(_, quad)| quad).collect()
    }

    /// Keys of quads whose subject is the given blank node.
    pub fn keys_with_blank_subject(&self, id: &BlankNodeId) -> &[String] {
        self.by_blank_subject
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Keys of quads whose object is the given blank node.
    pub fn keys_with_blank_object(&self, id: &BlankNodeId) -> &[String] {
        self.by_blank_object
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl FromIterator<Quad> for QuadSet {
    fn from_iter<I: IntoIterator<Item = Quad>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Quad> for QuadSet {
    fn extend<I: IntoIterator<Item = Quad>>(&mut self, iter: I) {
        for quad in iter {
            self.insert(quad);
        }
    }
}

impl PartialEq for QuadSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.keys().all(|key| other.contains_key(key))
    }
}

impl Eq for QuadSet {}

// ============================================================================
// Snapshot
// ============================================================================

/// Quads extracted from one state of a form. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    quads: QuadSet,
}

impl Snapshot {
    pub fn build(quads: impl IntoIterator<Item = Quad>) -> Self {
        Self {
            quads: quads.into_iter().collect(),
        }
    }

    pub fn quads(&self) -> &QuadSet {
        &self.quads
    }

    pub fn into_quads(self) -> QuadSet {
        self.quads
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.quads.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Quad> {
        self.quads.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Quad)> {
        self.quads.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.quads.keys()
    }
}

impl FromIterator<Quad> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Quad>>(iter: I) -> Self {
        Self::build(iter)
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// How the builder treats collaborator blank-node labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlankNodeLabels {
    /// Keep each label's local suffix (`_:b1` becomes `_:bn1`). Labels whose
    /// suffixes clash get a fresh one.
    #[default]
    Preserve,
    /// Number blank nodes `0, 1, 2, ..` in order of first appearance.
    ///
    /// Two extractions of structurally similar markup then agree on ids, which
    /// is what makes a blank-node diff meaningful when the collaborator's own
    /// labels are not stable across reloads.
    Renumber,
}

/// A finished snapshot and the number of distinct blank nodes it contains.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub snapshot: Snapshot,
    pub blank_nodes: usize,
}

/// Accumulates quads from one extraction pass.
///
/// All labelling state lives here, so two passes never share counters. A blank
/// node is identified by the collaborator's full label; distinct labels always
/// end up with distinct ids.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    labels: BlankNodeLabels,
    quads: QuadSet,
    assigned: AHashMap<String, BlankNodeId>,
    taken: AHashSet<BlankNodeId>,
}

impl SnapshotBuilder {
    pub fn new(labels: BlankNodeLabels) -> Self {
        Self {
            labels,
            ..Self::default()
        }
    }

    /// Extraction callback: `(subject, predicate, object, datatype, language)`.
    pub fn accept(
        &mut self,
        subject: &str,
        predicate: &str,
        object: &str,
        datatype: Option<&str>,
        language: Option<&str>,
    ) -> Result<(), TermError> {
        let Quad {
            subject: subject_node,
            predicate,
            object: object_term,
        } = Quad::from_raw(subject, predicate, object, datatype, language)?;

        let subject = match subject_node {
            Node::BlankNode(_) => Node::BlankNode(self.label(subject)),
            iri => iri,
        };
        let object = match object_term {
            Term::Node(Node::BlankNode(_)) => Term::Node(Node::BlankNode(self.label(object))),
            other => other,
        };
        self.quads.insert(Quad {
            subject,
            predicate,
            object,
        });
        Ok(())
    }

    /// Add a quad whose blank nodes are already normalized ids. The id's
    /// suffix stands in for the label.
    pub fn push(&mut self, quad: Quad) {
        let Quad {
            subject,
            predicate,
            object,
        } = quad;
        let subject = self.relabel(subject);
        let object = match object {
            Term::Node(node) => Term::Node(self.relabel(node)),
            literal => literal,
        };
        self.quads.insert(Quad {
            subject,
            predicate,
            object,
        });
    }

    fn relabel(&mut self, node: Node) -> Node {
        match node {
            Node::BlankNode(id) => Node::BlankNode(self.assign(id.suffix().to_string(), id)),
            iri => iri,
        }
    }

    fn label(&mut self, raw: &str) -> BlankNodeId {
        let label = raw.strip_prefix("_:").unwrap_or(raw);
        self.assign(label.to_string(), BlankNodeId::from_label(label))
    }

    fn assign(&mut self, label: String, preferred: BlankNodeId) -> BlankNodeId {
        if let Some(id) = self.assigned.get(&label) {
            return id.clone();
        }
        let base = match self.labels {
            BlankNodeLabels::Preserve => preferred,
            BlankNodeLabels::Renumber => BlankNodeId::from_suffix(self.assigned.len().to_string()),
        };
        let mut id = base.clone();
        let mut n = 0;
        while self.taken.contains(&id) {
            n += 1;
            id = BlankNodeId::from_suffix(format!("{}_{n}", base.suffix()));
        }
        tracing::trace!(label = %label, suffix = id.suffix(), "assigned blank node");
        self.taken.insert(id.clone());
        self.assigned.insert(label, id.clone());
        id
    }

    pub fn finish(self) -> Extraction {
        Extraction {
            blank_nodes: self.assigned.len(),
            snapshot: Snapshot { quads: self.quads },
        }
    }
}
