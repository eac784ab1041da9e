//! RDF term model.
//!
//! Quads are always in one implicit graph, so "quad" and "triple" are used
//! interchangeably. The predicate is always an IRI; the subject is an IRI or a
//! blank node; the object is any term.

use crate::vocab::{RDF_LANG_STRING, RDF_XML_LITERAL, XSD_STRING};
use thiserror::Error;

// ============================================================================
// Blank nodes
// ============================================================================

/// Local identity of a blank node within one snapshot.
///
/// Only the local suffix is stored; the writer renders suffix `1` as `_:bn1`
/// (or `?var1` inside a DELETE pattern). [`BlankNodeId::from_label`] maps
/// `_:b1`, `b1` and `bn1` to the same suffix, so extraction goes through
/// [`crate::SnapshotBuilder`], which keeps distinct labels apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNodeId(String);

impl BlankNodeId {
    /// Preferred suffix for a collaborator-supplied label (`_:b1`, `b1`,
    /// `bn1`, `x7`).
    pub fn from_label(label: &str) -> Self {
        let label = label.strip_prefix("_:").unwrap_or(label);
        let suffix = ["bn", "b"]
            .iter()
            .find_map(|marker| label.strip_prefix(marker).filter(|rest| !rest.is_empty()))
            .unwrap_or(label);
        Self(suffix.to_string())
    }

    /// Build from an already-normalized suffix.
    pub fn from_suffix(suffix: impl Into<String>) -> Self {
        Self(suffix.into())
    }

    pub fn suffix(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Terms
// ============================================================================

/// A term that may stand in subject position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Iri(String),
    BlankNode(BlankNodeId),
}

impl Node {
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(value.into())
    }

    pub fn blank(label: &str) -> Self {
        Self::BlankNode(BlankNodeId::from_label(label))
    }

    /// `_:`-prefixed text is a blank node label, anything else an IRI.
    pub fn from_raw(text: &str) -> Self {
        if text.starts_with("_:") {
            Self::blank(text)
        } else {
            Self::iri(text)
        }
    }

    pub fn as_blank(&self) -> Option<&BlankNodeId> {
        match self {
            Self::BlankNode(id) => Some(id),
            Self::Iri(_) => None,
        }
    }
}

/// Literal value with a resolved datatype.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: String,
    pub datatype: String,
    pub language: Option<String>,
}

impl Literal {
    /// An explicit datatype wins; otherwise a language makes it an
    /// `rdf:langString`, and everything else is an `xsd:string`.
    ///
    /// Language tags are case-insensitive and stored lowercased, the form RDF
    /// parsers hand out. Inconsistent pairs (a language on a non-langString
    /// datatype) are kept as given and serialized literally.
    pub fn new(
        lexical: impl Into<String>,
        datatype: Option<String>,
        language: Option<String>,
    ) -> Self {
        let language = language.map(|tag| tag.to_ascii_lowercase());
        let datatype = datatype.unwrap_or_else(|| {
            if language.is_some() {
                RDF_LANG_STRING.to_string()
            } else {
                XSD_STRING.to_string()
            }
        });
        Self {
            lexical: lexical.into(),
            datatype,
            language,
        }
    }

    pub fn string(lexical: impl Into<String>) -> Self {
        Self::new(lexical, None, None)
    }

    pub fn lang_string(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self::new(lexical, None, Some(language.into()))
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::new(lexical, Some(datatype.into()), None)
    }

    pub fn is_lang_string(&self) -> bool {
        self.datatype == RDF_LANG_STRING
    }

    pub fn is_plain_string(&self) -> bool {
        self.datatype == XSD_STRING
    }

    pub fn is_xml_literal(&self) -> bool {
        self.datatype == RDF_XML_LITERAL
    }
}

/// A term in object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Node(Node),
    Literal(Literal),
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Node(Node::iri(value))
    }

    pub fn blank(label: &str) -> Self {
        Self::Node(Node::blank(label))
    }

    pub fn literal(literal: Literal) -> Self {
        Self::Literal(literal)
    }

    /// Blank node in object position. Literals never count, whatever their
    /// lexical form looks like.
    pub fn as_blank(&self) -> Option<&BlankNodeId> {
        match self {
            Self::Node(node) => node.as_blank(),
            Self::Literal(_) => None,
        }
    }
}

impl From<Node> for Term {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

// ============================================================================
// Quads
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TermError {
    #[error("quad subject is empty")]
    EmptySubject,
    #[error("quad predicate is empty")]
    EmptyPredicate,
    #[error("quad predicate must be an IRI, got blank node {0}")]
    BlankPredicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quad {
    pub subject: Node,
    pub predicate: String,
    pub object: Term,
}

impl Quad {
    pub fn new(subject: Node, predicate: impl Into<String>, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Accept one quad in the extraction callback shape
    /// `(subject, predicate, object, datatype, language)`.
    ///
    /// The object is a literal when a datatype or language is supplied; plain
    /// strings must therefore arrive with `xsd:string` as their datatype.
    /// Otherwise a `_:` prefix marks a blank node and anything else is an IRI.
    pub fn from_raw(
        subject: &str,
        predicate: &str,
        object: &str,
        datatype: Option<&str>,
        language: Option<&str>,
    ) -> Result<Self, TermError> {
        if subject.is_empty() {
            return Err(TermError::EmptySubject);
        }
        if predicate.is_empty() {
            return Err(TermError::EmptyPredicate);
        }
        if predicate.starts_with("_:") {
            return Err(TermError::BlankPredicate(predicate.to_string()));
        }

        let object = if datatype.is_some() || language.is_some() {
            Term::Literal(Literal::new(
                object,
                datatype.map(str::to_string),
                language.map(str::to_string),
            ))
        } else {
            Term::Node(Node::from_raw(object))
        };

        Ok(Self {
            subject: Node::from_raw(subject),
            predicate: predicate.to_string(),
            object,
        })
    }

    /// `subject == object` as the same node term.
    pub fn is_self_reference(&self) -> bool {
        matches!(&self.object, Term::Node(node) if *node == self.subject)
    }
}
