use formpatch_core::{quad_key, BlankNodeLabels, Literal, Node, Quad, Term};
use formpatch_ingest_rdf::{snapshot_from_rdf, RdfFormat};
use proptest::prelude::*;

fn iri() -> impl Strategy<Value = String> {
    proptest::string::string_regex("http://example\\.org/[a-z]{1,6}(#[a-z0-9]{1,4})?").unwrap()
}

fn literal() -> impl Strategy<Value = Literal> {
    let lexical = || proptest::string::string_regex("(\\PC|[\t\n\r\"\\\\]){0,12}").unwrap();
    prop_oneof![
        lexical().prop_map(Literal::string),
        (
            lexical(),
            proptest::string::string_regex("[a-zA-Z]{2}(-[a-zA-Z]{2})?").unwrap()
        )
            .prop_map(|(v, l)| Literal::lang_string(v, l)),
        (lexical(), iri()).prop_map(|(v, dt)| Literal::typed(v, dt)),
    ]
}

fn ground_quad() -> impl Strategy<Value = Quad> {
    (
        iri(),
        iri(),
        prop_oneof![iri().prop_map(Term::iri), literal().prop_map(Term::Literal)],
    )
        .prop_map(|(s, p, o)| Quad::new(Node::iri(s), p, o))
}

/// Parse one written line back through an independent N-Triples parser.
fn parse_back(line: &str) -> Vec<Quad> {
    let extraction = snapshot_from_rdf(
        line.as_bytes(),
        RdfFormat::NTriples,
        BlankNodeLabels::Preserve,
    )
    .expect("written term syntax should parse as N-Triples");
    extraction.snapshot.iter().map(|(_, q)| q.clone()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn ground_quads_roundtrip_through_ntriples(quad in ground_quad()) {
        let line = format!("{} .\n", quad_key(&quad));
        let parsed = parse_back(&line);
        prop_assert_eq!(parsed, vec![quad]);
    }
}

#[test]
fn escaped_literal_roundtrips() {
    let quad = Quad::new(
        Node::iri("http://example.org/res"),
        "http://example.org/note",
        Literal::string("line one\nline \"two\"\ttab \\ slash\r"),
    );
    let line = format!("{} .\n", quad_key(&quad));
    assert_eq!(parse_back(&line), vec![quad]);
}

#[test]
fn language_literal_roundtrips() {
    let quad = Quad::new(
        Node::iri("http://example.org/res"),
        "http://example.org/label",
        Literal::lang_string("Grüße", "de"),
    );
    let line = format!("{} .\n", quad_key(&quad));
    assert_eq!(parse_back(&line), vec![quad]);
}
