use std::collections::HashMap;
use std::io::{self, Write};

use super::StatementSink;
use crate::model::term::{escape_literal, Statement, Subject, Term};

/// Turtle emitter with prefix support.
///
/// Consecutive statements about the same subject are joined with `;`, so
/// output from the canonical grouping emitter reads as one block per
/// subject. Statement contexts are dropped: Turtle has no named graphs.
pub struct TurtleEmitter<W: Write> {
    writer: W,
    count: u64,
    prefixes: HashMap<String, String>,
    prefix_written: bool,
    open_subject: Option<Subject>,
}

impl<W: Write> TurtleEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            count: 0,
            prefixes: HashMap::new(),
            prefix_written: false,
            open_subject: None,
        }
    }

    /// Write all registered prefixes (called before first statement).
    fn write_prefixes(&mut self) -> io::Result<()> {
        if self.prefix_written {
            return Ok(());
        }
        self.prefix_written = true;
        // Sort for deterministic output
        let mut prefixes: Vec<_> = self.prefixes.iter().collect();
        prefixes.sort_by_key(|(k, _)| (*k).clone());
        for (prefix, iri) in prefixes {
            writeln!(self.writer, "@prefix {prefix}: <{iri}> .")?;
        }
        if !self.prefixes.is_empty() {
            writeln!(self.writer)?;
        }
        Ok(())
    }

    /// Try to compact an IRI using registered prefixes.
    fn compact_iri(&self, iri: &str) -> String {
        // Find longest matching prefix
        let mut best: Option<(&str, &str)> = None;
        for (prefix, ns) in &self.prefixes {
            if iri.starts_with(ns.as_str())
                && best.is_none_or(|(_, prev_ns)| ns.len() > prev_ns.len())
            {
                best = Some((prefix.as_str(), ns.as_str()));
            }
        }
        if let Some((prefix, ns)) = best {
            let local = &iri[ns.len()..];
            // Only compact if local name is valid (alphanumeric + _)
            if !local.is_empty() && local.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return format!("{prefix}:{local}");
            }
        }
        format!("<{iri}>")
    }

    fn subject_text(&self, subject: &Subject) -> String {
        match subject {
            Subject::Iri(iri) => self.compact_iri(iri),
            Subject::Blank(label) => format!("_:{label}"),
        }
    }

    fn object_text(&self, object: &Term) -> String {
        match object {
            Term::Iri(iri) => self.compact_iri(iri),
            Term::Blank(label) => format!("_:{label}"),
            Term::Literal(lit) => match lit.language {
                Some(ref lang) => format!("\"{}\"@{lang}", escape_literal(&lit.value)),
                None => format!("\"{}\"", escape_literal(&lit.value)),
            },
        }
    }

    fn predicate_text(&self, predicate: &str) -> String {
        if predicate == crate::model::ontology::standard::RDF_TYPE {
            "a".to_string()
        } else {
            self.compact_iri(predicate)
        }
    }

    fn close_subject(&mut self) -> io::Result<()> {
        if self.open_subject.take().is_some() {
            writeln!(self.writer, " .")?;
        }
        Ok(())
    }
}

impl<W: Write> StatementSink for TurtleEmitter<W> {
    fn handle_statement(&mut self, statement: Statement) -> io::Result<()> {
        self.write_prefixes()?;
        let p = self.predicate_text(&statement.predicate);
        let o = self.object_text(&statement.object);
        if self.open_subject.as_ref() == Some(&statement.subject) {
            write!(self.writer, " ;\n    {p} {o}")?;
        } else {
            self.close_subject()?;
            let s = self.subject_text(&statement.subject);
            write!(self.writer, "{s} {p} {o}")?;
            self.open_subject = Some(statement.subject);
        }
        self.count += 1;
        Ok(())
    }

    fn add_prefix(&mut self, prefix: &str, iri: &str) {
        self.prefixes.insert(prefix.to_string(), iri.to_string());
    }

    fn end(&mut self) -> io::Result<()> {
        self.write_prefixes()?;
        self.close_subject()?;
        self.writer.flush()
    }

    fn statement_count(&self) -> u64 {
        self.count
    }
}
