//! SPARQL 1.1 Update writer.
//!
//! The term syntax here is a wire contract: snapshot keys are built with the
//! same functions, so extraction and writing can never disagree about how a
//! literal or IRI is spelled.

use crate::entities::decode_entities;
use crate::options::DeleteClauseStyle;
use crate::snapshot::QuadSet;
use crate::term::{Literal, Node, Quad, Term};

/// Body sent when there is nothing to change.
pub const EMPTY_UPDATE: &str = "INSERT {} WHERE {}";

/// How blank nodes are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankNodeForm {
    /// `_:bnN`, a node in an INSERT template.
    Node,
    /// `?varN`, a variable in a DELETE pattern.
    Variable,
}

// ============================================================================
// Terms
// ============================================================================

pub fn write_iri(out: &mut String, iri: &str) {
    out.push('<');
    for c in iri.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '>' => out.push_str("\\>"),
            c => out.push(c),
        }
    }
    out.push('>');
}

pub fn write_blank(out: &mut String, suffix: &str, form: BlankNodeForm) {
    out.push_str(match form {
        BlankNodeForm::Node => "_:bn",
        BlankNodeForm::Variable => "?var",
    });
    out.push_str(suffix);
}

fn write_escaped_string(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
}

pub fn write_literal(out: &mut String, literal: &Literal) {
    if literal.is_xml_literal() {
        write_escaped_string(out, &decode_entities(&literal.lexical));
    } else {
        write_escaped_string(out, &literal.lexical);
    }

    if literal.is_lang_string() {
        out.push('@');
        if let Some(language) = &literal.language {
            out.extend(
                language
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric() || *c == '-'),
            );
        }
    } else if !literal.is_plain_string() {
        out.push_str("^^");
        write_iri(out, &literal.datatype);
    }
}

pub fn write_node(out: &mut String, node: &Node, form: BlankNodeForm) {
    match node {
        Node::Iri(iri) => write_iri(out, iri),
        Node::BlankNode(id) => write_blank(out, id.suffix(), form),
    }
}

pub fn write_term(out: &mut String, term: &Term, form: BlankNodeForm) {
    match term {
        Term::Node(node) => write_node(out, node, form),
        Term::Literal(literal) => write_literal(out, literal),
    }
}

/// `subject predicate object` without the trailing ` .`.
pub fn write_quad(out: &mut String, quad: &Quad, form: BlankNodeForm) {
    write_node(out, &quad.subject, form);
    out.push(' ');
    write_iri(out, &quad.predicate);
    out.push(' ');
    write_term(out, &quad.object, form);
}

/// Canonical snapshot key: the quad as it appears on an INSERT line.
pub fn quad_key(quad: &Quad) -> String {
    let mut key = String::new();
    write_quad(&mut key, quad, BlankNodeForm::Node);
    key
}

// ============================================================================
// Update bodies
// ============================================================================

/// Append-only builder for one update body.
struct UpdateBuffer {
    out: String,
}

impl UpdateBuffer {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn open(&mut self, header: &str) {
        self.out.push_str(header);
        self.out.push_str(" {\n");
    }

    fn lines(&mut self, quads: &QuadSet, form: BlankNodeForm) {
        for quad in quads.sorted() {
            self.out.push_str("  ");
            write_quad(&mut self.out, quad, form);
            self.out.push_str(" .\n");
        }
    }

    fn close(&mut self, terminator: &str) {
        self.out.push('}');
        self.out.push_str(terminator);
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Serialize a delta as a SPARQL 1.1 Update body.
///
/// Sections with no quads are omitted. When both sides are empty the result
/// is [`EMPTY_UPDATE`].
pub fn write_update(removed: &QuadSet, added: &QuadSet, style: DeleteClauseStyle) -> String {
    if removed.is_empty() && added.is_empty() {
        return EMPTY_UPDATE.to_string();
    }

    let mut buf = UpdateBuffer::new();
    match style {
        DeleteClauseStyle::DeleteWhere => {
            if !removed.is_empty() {
                buf.open("DELETE WHERE");
                buf.lines(removed, BlankNodeForm::Variable);
                buf.close(";");
            }
            if !added.is_empty() {
                buf.open("INSERT");
                buf.lines(added, BlankNodeForm::Node);
                buf.close("");
                buf.open("WHERE");
                buf.close(";");
            }
        }
        DeleteClauseStyle::DeleteInsertWhere => {
            if !removed.is_empty() {
                buf.open("DELETE");
                buf.lines(removed, BlankNodeForm::Variable);
                buf.close("");
            }
            if !added.is_empty() {
                buf.open("INSERT");
                buf.lines(added, BlankNodeForm::Node);
                buf.close("");
            }
            // The WHERE clause binds the DELETE pattern variables.
            buf.open("WHERE");
            buf.lines(removed, BlankNodeForm::Variable);
            buf.close(";");
        }
    }
    buf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::RDF_XML_LITERAL;

    fn term(term: &Term) -> String {
        let mut out = String::new();
        write_term(&mut out, term, BlankNodeForm::Node);
        out
    }

    fn set(quads: Vec<Quad>) -> QuadSet {
        quads.into_iter().collect()
    }

    #[test]
    fn iri_escapes_backslash_and_angle() {
        assert_eq!(term(&Term::iri("http://ex/a>b\\c")), "<http://ex/a\\>b\\\\c>");
    }

    #[test]
    fn blank_node_forms() {
        let mut out = String::new();
        write_term(&mut out, &Term::blank("_:b7"), BlankNodeForm::Node);
        out.push(' ');
        write_term(&mut out, &Term::blank("_:b7"), BlankNodeForm::Variable);
        assert_eq!(out, "_:bn7 ?var7");
    }

    #[test]
    fn literal_escapes_and_suffixes() {
        assert_eq!(
            term(&Literal::string("a\"b\\c\td\ne\rf").into()),
            "\"a\\\"b\\\\c\\td\\ne\\rf\""
        );
        assert_eq!(term(&Literal::lang_string("hi", "en-GB").into()), "\"hi\"@en-gb");
        assert_eq!(term(&Literal::lang_string("hi", "en_<GB>").into()), "\"hi\"@engb");
        assert_eq!(
            term(&Literal::typed("5", "http://www.w3.org/2001/XMLSchema#integer").into()),
            "\"5\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn mismatched_language_is_written_literally() {
        // A language on an xsd:string literal carries no suffix.
        let lit = Literal::new("x", Some(crate::vocab::XSD_STRING.into()), Some("en".into()));
        assert_eq!(term(&lit.into()), "\"x\"");
    }

    #[test]
    fn xml_literal_entities_decoded_before_escaping() {
        let lit = Literal::typed("<b>Caf&eacute; &quot;A&quot;</b>", RDF_XML_LITERAL);
        assert_eq!(
            term(&lit.into()),
            "\"<b>Café \\\"A\\\"</b>\"^^<http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral>"
        );
    }

    #[test]
    fn entities_left_alone_outside_xml_literals() {
        assert_eq!(term(&Literal::string("a &amp; b").into()), "\"a &amp; b\"");
    }

    #[test]
    fn empty_delta_is_noop_update() {
        let empty = QuadSet::new();
        assert_eq!(write_update(&empty, &empty, DeleteClauseStyle::DeleteWhere), EMPTY_UPDATE);
        assert_eq!(
            write_update(&empty, &empty, DeleteClauseStyle::DeleteInsertWhere),
            EMPTY_UPDATE
        );
    }

    #[test]
    fn delete_where_layout() {
        let r = Node::iri("http://ex/r");
        let removed = set(vec![Quad::new(r.clone(), "http://ex/p", Term::blank("_:b1"))]);
        let added = set(vec![Quad::new(r, "http://ex/p", Literal::string("new"))]);

        let body = write_update(&removed, &added, DeleteClauseStyle::DeleteWhere);
        assert_eq!(
            body,
            "DELETE WHERE {\n  <http://ex/r> <http://ex/p> ?var1 .\n};\n\
             INSERT {\n  <http://ex/r> <http://ex/p> \"new\" .\n}\nWHERE {\n};\n"
        );
    }

    #[test]
    fn delete_insert_where_layout_repeats_patterns() {
        let r = Node::iri("http://ex/r");
        let removed = set(vec![Quad::new(r.clone(), "http://ex/p", Term::blank("_:b1"))]);
        let added = set(vec![Quad::new(r, "http://ex/p", Literal::string("new"))]);

        let body = write_update(&removed, &added, DeleteClauseStyle::DeleteInsertWhere);
        assert_eq!(
            body,
            "DELETE {\n  <http://ex/r> <http://ex/p> ?var1 .\n}\n\
             INSERT {\n  <http://ex/r> <http://ex/p> \"new\" .\n}\n\
             WHERE {\n  <http://ex/r> <http://ex/p> ?var1 .\n};\n"
        );
    }

    #[test]
    fn insert_only_omits_delete_section() {
        let added = set(vec![Quad::new(
            Node::iri("http://ex/r"),
            "http://ex/p",
            Literal::string("v"),
        )]);
        for style in [DeleteClauseStyle::DeleteWhere, DeleteClauseStyle::DeleteInsertWhere] {
            let body = write_update(&QuadSet::new(), &added, style);
            assert!(body.starts_with("INSERT {\n"), "{body}");
            assert!(!body.contains("DELETE"));
            assert!(body.ends_with("WHERE {\n};\n"), "{body}");
        }
    }

    #[test]
    fn lines_are_ordered_by_key() {
        let r = Node::iri("http://ex/r");
        let added = set(vec![
            Quad::new(r.clone(), "http://ex/z", Literal::string("1")),
            Quad::new(r.clone(), "http://ex/a", Literal::string("2")),
        ]);
        let body = write_update(&QuadSet::new(), &added, DeleteClauseStyle::DeleteWhere);
        let a = body.find("http://ex/a").expect("a line");
        let z = body.find("http://ex/z").expect("z line");
        assert!(a < z);
    }

    #[test]
    fn key_matches_insert_line() {
        let quad = Quad::new(Node::blank("_:b2"), "http://ex/p", Literal::lang_string("x", "fr"));
        assert_eq!(quad_key(&quad), "_:bn2 <http://ex/p> \"x\"@fr");
    }
}
