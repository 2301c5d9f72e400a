//! RDF terms and statements produced by the extractor.
//!
//! Every term has a canonical textual form, its N-Triples spelling
//! (`<iri>`, `_:label`, `"literal"@lang`). The total order over terms is the
//! byte-wise order of that form, so sorting is reproducible and matches the
//! order of the serialized lines.

use std::cmp::Ordering;
use std::fmt;

/// The subject of a statement: an absolute IRI or a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    Iri(String),
    /// Blank node label, without the `_:` prefix.
    Blank(String),
}

impl Subject {
    pub fn is_blank(&self) -> bool {
        matches!(self, Subject::Blank(_))
    }

    /// N-Triples spelling of this subject.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Iri(iri) => write!(f, "<{iri}>"),
            Subject::Blank(label) => write!(f, "_:{label}"),
        }
    }
}

impl Ord for Subject {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl PartialOrd for Subject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A plain literal, optionally language-tagged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: String,
    pub language: Option<String>,
}

impl Literal {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
        }
    }

    pub fn with_language(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_literal(&self.value))?;
        if let Some(ref lang) = self.language {
            write!(f, "@{lang}")?;
        }
        Ok(())
    }
}

/// The object of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::new(value))
    }

    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(label) => write!(f, "_:{label}"),
            Term::Literal(lit) => lit.fmt(f),
        }
    }
}

impl From<Subject> for Term {
    fn from(subject: Subject) -> Self {
        match subject {
            Subject::Iri(iri) => Term::Iri(iri),
            Subject::Blank(label) => Term::Blank(label),
        }
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One subject-predicate-object statement, optionally in a named graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    pub subject: Subject,
    /// Absolute predicate IRI.
    pub predicate: String,
    pub object: Term,
    pub context: Option<Subject>,
}

impl Statement {
    pub fn new(subject: Subject, predicate: impl Into<String>, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object: object.into(),
            context: None,
        }
    }

    pub fn in_context(mut self, context: Subject) -> Self {
        self.context = Some(context);
        self
    }

    /// Canonical spelling of the predicate (`<iri>`), the key predicates sort by.
    pub fn predicate_canonical(&self) -> String {
        format!("<{}>", self.predicate)
    }
}

impl fmt::Display for Statement {
    /// N-Triples line (N-Quads when a context is present), without the newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {}", self.subject, self.predicate, self.object)?;
        if let Some(ref ctx) = self.context {
            write!(f, " {ctx}")?;
        }
        f.write_str(" .")
    }
}

/// Escape a string for an N-Triples literal (per RDF 1.1 N-Triples).
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                // Control chars: \uXXXX
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out
}
