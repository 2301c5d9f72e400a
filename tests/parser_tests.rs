use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use microdata2rdf::emitter::grouping::CanonicalGroupingEmitter;
use microdata2rdf::emitter::ntriples::NTriplesEmitter;
use microdata2rdf::emitter::{SharedSink, StatementCollector, StatementSink};
use microdata2rdf::error::{ExtractError, ParseError};
use microdata2rdf::extraction::extractor::ExtractionOptions;
use microdata2rdf::model::term::{Statement, Subject, Term};
use microdata2rdf::parser::{parser_for_format, MicrodataParser, MICRODATA_FORMAT};
use microdata2rdf::registry::VocabularyRegistry;

const BASE: &str = "http://example.org/reading.html";

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture")
}

#[test]
fn format_identity() {
    assert_eq!(MICRODATA_FORMAT.name, "HTML5-Microdata");
    assert_eq!(MICRODATA_FORMAT.standard_uri, "http://www.w3.org/ns/formats/md");
    assert!(!MICRODATA_FORMAT.supports_namespaces);
    assert!(!MICRODATA_FORMAT.supports_contexts);

    for token in ["text/html", "TEXT/HTML; charset=utf-8", "html", ".htm", "html5-microdata"] {
        assert!(MICRODATA_FORMAT.matches(token), "{token} should match");
    }
    for token in ["text/turtle", "application/xhtml+xml", "ttl", ""] {
        assert!(!MICRODATA_FORMAT.matches(token), "{token} should not match");
    }
}

#[test]
fn parser_lookup_by_format() {
    let parser = parser_for_format("text/html").unwrap().expect("html parser");
    assert_eq!(parser.format().name, "HTML5-Microdata");
    assert!(!parser.registry().is_empty());

    assert!(parser_for_format("text/turtle").unwrap().is_none());
}

#[test]
fn parse_webpage_fixture() {
    let parser = MicrodataParser::new().unwrap();
    let mut sink = StatementCollector::new();
    let count = parser.parse(&fixture("webpage.html"), BASE, &mut sink).unwrap();

    assert_eq!(count, 9);
    let out = sink.into_statements();
    assert_eq!(out.len(), 9);

    let dune = Subject::Iri("http://example.org/books/dune".to_string());
    assert!(out.iter().any(|s| s.subject.is_blank()
        && s.predicate == "http://schema.org/about"
        && s.object == Term::from(dune.clone())));
    assert!(out
        .iter()
        .any(|s| s.predicate == "http://schema.org/name" && s.object == Term::literal("Frank Herbert")));
    assert!(out
        .iter()
        .any(|s| s.predicate == "http://schema.org/publisher" && s.object == Term::literal("Chilton Books")));
}

#[test]
fn parse_writes_ntriples() {
    let parser = MicrodataParser::new().unwrap();
    let mut buf = Vec::new();
    {
        let mut emitter = NTriplesEmitter::new(&mut buf);
        parser
            .parse(&fixture("webpage.html"), BASE, &mut emitter)
            .unwrap();
    }
    let out = String::from_utf8(buf).unwrap();
    assert!(out.contains(
        "<http://example.org/books/dune> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Book> ."
    ));
    // Well-known prefixes are announced as comments.
    assert!(out.starts_with("# @prefix"));
}

#[test]
fn invalid_base_is_reported() {
    let parser = MicrodataParser::new().unwrap();
    let err = parser
        .parse("<div itemscope></div>", "relative/path", StatementCollector::new())
        .unwrap_err();
    assert!(matches!(err, ParseError::InvalidBase { .. }), "got {err:?}");
    assert!(err.to_string().contains("relative/path"));
}

#[test]
fn options_reach_the_extractor() {
    let parser = MicrodataParser::new().unwrap().with_options(ExtractionOptions {
        fail_on_relative_item_type: true,
        ..ExtractionOptions::default()
    });
    assert!(parser.options().fail_on_relative_item_type);

    let err = parser
        .parse(&fixture("relative_type.html"), BASE, StatementCollector::new())
        .unwrap_err();
    assert!(
        matches!(err, ParseError::Extract(ExtractError::RelativeItemType { .. })),
        "got {err:?}"
    );
}

#[test]
fn custom_registry_and_shared_sink() {
    let registry = VocabularyRegistry::from_json_str(&fixture("registry.json")).unwrap();
    let parser = MicrodataParser::with_registry(Arc::new(registry)).with_options(ExtractionOptions {
        expand_property_equivalents: true,
        ..ExtractionOptions::default()
    });

    let shared = SharedSink::new(StatementCollector::new());
    parser
        .parse(&fixture("webpage.html"), BASE, shared.clone())
        .unwrap();
    let collector = shared.into_inner().expect("sole owner");

    let titles: Vec<&Term> = collector
        .statements()
        .iter()
        .filter(|s| s.predicate == "http://purl.org/dc/terms/title")
        .map(|s| &s.object)
        .collect();
    assert_eq!(
        titles,
        vec![
            &Term::literal("Reading list"),
            &Term::literal("Dune"),
            &Term::literal("Frank Herbert"),
        ]
    );
    assert!(collector.is_ended());
}

// ---------------------------------------------------------------------------
// Concurrent runs into one shared sink
// ---------------------------------------------------------------------------

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

fn parse_concurrently<S>(shared: &SharedSink<S>, pages: &[&str])
where
    S: StatementSink + Send + 'static,
{
    let parser = MicrodataParser::new().unwrap();
    let handles: Vec<_> = pages
        .iter()
        .map(|page| {
            let parser = parser.clone();
            let sink = shared.clone();
            let page = page.to_string();
            thread::spawn(move || parser.parse(&page, BASE, sink).unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

fn types_by_subject(statements: &[Statement]) -> Vec<(Subject, String)> {
    statements
        .iter()
        .filter(|s| s.predicate == RDF_TYPE)
        .map(|s| (s.subject.clone(), s.object.to_string()))
        .collect()
}

#[test]
fn concurrent_runs_keep_blank_nodes_apart() {
    let shared = SharedSink::new(StatementCollector::new());
    parse_concurrently(
        &shared,
        &[
            r#"<div itemscope itemtype="http://schema.org/Book"><span itemprop="name">Dune</span></div>"#,
            r#"<div itemscope itemtype="http://schema.org/Person"><span itemprop="name">Ann</span></div>"#,
        ],
    );
    let collector = shared.into_inner().expect("sole owner");
    let out = collector.statements();
    assert_eq!(out.len(), 4);

    let subjects: HashSet<&Subject> = out.iter().map(|s| &s.subject).collect();
    assert_eq!(subjects.len(), 2, "got: {out:#?}");
    assert!(subjects.iter().all(|s| s.is_blank()));

    // Each subject has exactly one type and one name.
    for subject in subjects {
        let types = out
            .iter()
            .filter(|s| &s.subject == subject && s.predicate == RDF_TYPE)
            .count();
        let names = out
            .iter()
            .filter(|s| &s.subject == subject && s.predicate == "http://schema.org/name")
            .count();
        assert_eq!((types, names), (1, 1), "subject {subject}");
    }
    assert!(collector.is_ended());
}

#[test]
fn shared_grouping_emitter_ends_once_after_all_runs() {
    let grouped = CanonicalGroupingEmitter::new(StatementCollector::new());
    let shared = SharedSink::new(grouped);
    let webpage = fixture("webpage.html");
    parse_concurrently(
        &shared,
        &[
            webpage.as_str(),
            r#"<div itemscope itemtype="http://schema.org/Book"><span itemprop="name">Dune</span></div>"#,
        ],
    );
    assert_eq!(shared.active_runs(), 0);

    let grouped = shared.into_inner().expect("sole owner");
    assert_eq!(grouped.buffered(), 0);
    let collector = grouped.into_inner();
    assert!(collector.is_ended());
    assert_eq!(collector.statements().len(), 11);

    // Three blank-node items across the two runs, all distinct.
    let types = types_by_subject(collector.statements());
    let blank_subjects: HashSet<&Subject> = types
        .iter()
        .map(|(s, _)| s)
        .filter(|s| s.is_blank())
        .collect();
    assert_eq!(blank_subjects.len(), 3, "got: {types:?}");
}

#[test]
fn single_owner_sink_keeps_plain_labels() {
    let parser = MicrodataParser::new().unwrap();
    let mut sink = StatementCollector::new();
    parser
        .parse(
            r#"<div itemscope itemtype="http://schema.org/Book"></div>"#,
            BASE,
            &mut sink,
        )
        .unwrap();
    assert_eq!(sink.statements()[0].subject, Subject::Blank("b0".to_string()));
}
