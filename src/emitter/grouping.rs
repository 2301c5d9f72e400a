//! Canonical grouping of a statement stream.
//!
//! [`CanonicalGroupingEmitter`] buffers statements and, when the buffer
//! reaches capacity or the stream ends, writes them to the wrapped sink:
//!
//! 1. grouped by context (no context first),
//! 2. then by subject,
//! 3. within a subject, `rdf:type` statements first, then one contiguous
//!    block per predicate.
//!
//! Contexts, subjects, predicates and objects are all ordered by the
//! byte-wise order of their N-Triples spelling. Output is a permutation of
//! the input: nothing is deduplicated. With a capacity at least as large as
//! the stream, output order depends only on the statement multiset. A
//! smaller capacity orders each flush window on its own.

use std::collections::BTreeMap;
use std::io;

use tracing::debug;

use super::StatementSink;
use crate::model::ontology::standard;
use crate::model::term::Statement;

/// Default buffer size, in statements.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

type Keyed = (String, Statement);

#[derive(Default)]
struct SubjectGroup {
    types: Vec<Keyed>,
    predicates: BTreeMap<String, Vec<Keyed>>,
}

/// Buffers statements and forwards them to `inner` in canonical order.
pub struct CanonicalGroupingEmitter<S: StatementSink> {
    inner: S,
    capacity: usize,
    buffer: Vec<Statement>,
    count: u64,
    ended: bool,
}

impl<S: StatementSink> CanonicalGroupingEmitter<S> {
    pub fn new(inner: S) -> Self {
        Self::with_capacity(inner, DEFAULT_BUFFER_SIZE)
    }

    /// A capacity of zero behaves like one: every statement is flushed alone.
    pub fn with_capacity(inner: S, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            capacity,
            buffer: Vec::with_capacity(capacity.min(DEFAULT_BUFFER_SIZE)),
            count: 0,
            ended: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Statements waiting for the next flush.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        debug!(statements = self.buffer.len(), "flushing grouped statements");

        let mut contexts: BTreeMap<Option<String>, BTreeMap<String, SubjectGroup>> =
            BTreeMap::new();
        for statement in self.buffer.drain(..) {
            let context_key = statement.context.as_ref().map(|c| c.canonical());
            let group = contexts
                .entry(context_key)
                .or_default()
                .entry(statement.subject.canonical())
                .or_default();
            let object_key = statement.object.canonical();
            if statement.predicate == standard::RDF_TYPE {
                group.types.push((object_key, statement));
            } else {
                group
                    .predicates
                    .entry(statement.predicate_canonical())
                    .or_default()
                    .push((object_key, statement));
            }
        }

        for subjects in contexts.into_values() {
            for mut group in subjects.into_values() {
                group.types.sort_by(|a, b| a.0.cmp(&b.0));
                for (_, statement) in group.types {
                    self.inner.handle_statement(statement)?;
                }
                for mut block in group.predicates.into_values() {
                    block.sort_by(|a, b| a.0.cmp(&b.0));
                    for (_, statement) in block {
                        self.inner.handle_statement(statement)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<S: StatementSink> StatementSink for CanonicalGroupingEmitter<S> {
    fn start(&mut self) -> io::Result<()> {
        self.ended = false;
        self.inner.start()
    }

    fn handle_statement(&mut self, statement: Statement) -> io::Result<()> {
        self.ended = false;
        self.buffer.push(statement);
        self.count += 1;
        if self.buffer.len() >= self.capacity {
            self.flush_buffer()?;
        }
        Ok(())
    }

    fn add_prefix(&mut self, prefix: &str, iri: &str) {
        self.inner.add_prefix(prefix, iri);
    }

    /// Flushes whatever is buffered and ends the wrapped sink. A second call
    /// with nothing new buffered does nothing.
    fn end(&mut self) -> io::Result<()> {
        if self.ended {
            return Ok(());
        }
        self.flush_buffer()?;
        self.ended = true;
        self.inner.end()
    }

    fn statement_count(&self) -> u64 {
        self.count
    }

    fn run_scope(&mut self) -> Option<u64> {
        self.inner.run_scope()
    }
}
