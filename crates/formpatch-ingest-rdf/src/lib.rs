//! RDF document extraction for formpatch (boundary adapter).
//!
//! The browser front end extracts snapshots from RDFa; everything else (the
//! CLI, tests, server-side tooling) hands us serialized RDF instead. This
//! crate parses it with **Sophia** and feeds the quads through a
//! [`SnapshotBuilder`], so the usual per-extraction blank-node labelling
//! applies:
//! - N-Triples (`.nt`)
//! - Turtle (`.ttl`)
//! - N-Quads (`.nq`)
//! - TriG (`.trig`)
//! - RDF/XML (`.rdf`, `.owl`, `.xml`)
//!
//! Graph names are dropped: the engine works on one implicit graph.

pub mod scope;

pub use scope::scope_to_resource;

use formpatch_core::vocab::XSD_STRING;
use formpatch_core::{BlankNodeLabels, Extraction, SnapshotBuilder, TermError};
use sophia::api::quad::Quad as _;
use sophia::api::source::{QuadSource, StreamError, TripleSource};
use sophia::api::term::Term as RdfTerm;
use sophia::api::triple::Triple as _;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    NQuads,
    TriG,
    RdfXml,
}

impl RdfFormat {
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "nt" | "ntriples" => Ok(Self::NTriples),
            "ttl" | "turtle" => Ok(Self::Turtle),
            "nq" | "nquads" => Ok(Self::NQuads),
            "trig" => Ok(Self::TriG),
            "rdf" | "owl" | "xml" => Ok(Self::RdfXml),
            other => Err(IngestError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NTriples => "N-Triples",
            Self::Turtle => "Turtle",
            Self::NQuads => "N-Quads",
            Self::TriG => "TriG",
            Self::RdfXml => "RDF/XML",
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported RDF format: .{0}")]
    UnsupportedFormat(String),
    #[error("failed to parse {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
    #[error("unsupported term in {position} position: {term}")]
    UnsupportedTerm {
        position: &'static str,
        term: String,
    },
    #[error(transparent)]
    Shape(#[from] TermError),
}

// ============================================================================
// Term conversion
// ============================================================================

/// An object term in the extraction callback's string form.
struct RawObject {
    text: String,
    datatype: Option<String>,
    language: Option<String>,
}

/// IRIs pass through; blank nodes keep their document label behind `_:`.
fn raw_node<T: RdfTerm>(term: &T, position: &'static str) -> Result<String, IngestError> {
    if let Some(iri) = term.iri() {
        return Ok(iri.as_str().to_string());
    }
    if let Some(id) = term.bnode_id() {
        return Ok(format!("_:{}", id.as_str()));
    }
    Err(IngestError::UnsupportedTerm {
        position,
        term: format!("{:?}", term.kind()),
    })
}

fn raw_object<T: RdfTerm>(term: &T) -> Result<RawObject, IngestError> {
    if let Some(lexical) = term.lexical_form() {
        let language = term.language_tag().map(|tag| tag.as_str().to_string());
        let datatype = term
            .datatype()
            .map(|dt| dt.as_str().to_string())
            .or_else(|| language.is_none().then(|| XSD_STRING.to_string()));
        return Ok(RawObject {
            text: lexical.to_string(),
            datatype,
            language,
        });
    }
    Ok(RawObject {
        text: raw_node(term, "object")?,
        datatype: None,
        language: None,
    })
}

/// Feed one parsed statement through the extraction callback, so document
/// blank-node labels get the same treatment as any other collaborator's.
fn accept_statement<S, P, O>(
    builder: &mut SnapshotBuilder,
    s: &S,
    p: &P,
    o: &O,
) -> Result<(), IngestError>
where
    S: RdfTerm,
    P: RdfTerm,
    O: RdfTerm,
{
    let subject = raw_node(s, "subject")?;
    let predicate = raw_node(p, "predicate")?;
    let object = raw_object(o)?;
    builder.accept(
        &subject,
        &predicate,
        &object.text,
        object.datatype.as_deref(),
        object.language.as_deref(),
    )?;
    Ok(())
}

// ============================================================================
// Parsing
// ============================================================================

fn stream_error<E: std::error::Error>(
    format: RdfFormat,
    err: StreamError<E, IngestError>,
) -> IngestError {
    match err {
        StreamError::SourceError(e) => IngestError::Parse {
            format: format.name(),
            message: e.to_string(),
        },
        StreamError::SinkError(e) => e,
    }
}

fn collect_triples<S: TripleSource>(
    mut source: S,
    format: RdfFormat,
    builder: &mut SnapshotBuilder,
) -> Result<(), IngestError> {
    source
        .try_for_each_triple(|t| accept_statement(builder, &t.s(), &t.p(), &t.o()))
        .map_err(|e| stream_error(format, e))
}

fn collect_quads<S: QuadSource>(
    mut source: S,
    format: RdfFormat,
    builder: &mut SnapshotBuilder,
) -> Result<(), IngestError> {
    source
        .try_for_each_quad(|q| accept_statement(builder, &q.s(), &q.p(), &q.o()))
        .map_err(|e| stream_error(format, e))
}

/// Parse one RDF document into a snapshot.
pub fn snapshot_from_reader<R: BufRead>(
    reader: R,
    format: RdfFormat,
    labels: BlankNodeLabels,
) -> Result<Extraction, IngestError> {
    let mut builder = SnapshotBuilder::new(labels);
    match format {
        RdfFormat::NTriples => collect_triples(
            sophia::turtle::parser::nt::parse_bufread(reader),
            format,
            &mut builder,
        )?,
        RdfFormat::Turtle => collect_triples(
            sophia::turtle::parser::turtle::parse_bufread(reader),
            format,
            &mut builder,
        )?,
        RdfFormat::NQuads => collect_quads(
            sophia::turtle::parser::nq::parse_bufread(reader),
            format,
            &mut builder,
        )?,
        RdfFormat::TriG => collect_quads(
            sophia::turtle::parser::trig::parse_bufread(reader),
            format,
            &mut builder,
        )?,
        RdfFormat::RdfXml => collect_triples(
            sophia::xml::parser::parse_bufread(reader),
            format,
            &mut builder,
        )?,
    }

    let extraction = builder.finish();
    tracing::debug!(
        format = format.name(),
        quads = extraction.snapshot.len(),
        blank_nodes = extraction.blank_nodes,
        "extracted snapshot"
    );
    Ok(extraction)
}

pub fn snapshot_from_rdf(
    bytes: &[u8],
    format: RdfFormat,
    labels: BlankNodeLabels,
) -> Result<Extraction, IngestError> {
    snapshot_from_reader(std::io::Cursor::new(bytes), format, labels)
}

/// Read a file, picking the format from its extension.
pub fn snapshot_from_rdf_file(
    path: &Path,
    labels: BlankNodeLabels,
) -> Result<Extraction, IngestError> {
    let format = RdfFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    snapshot_from_rdf(&bytes, format, labels)
}
