use std::io::{self, Write};

use super::StatementSink;
use crate::model::term::Statement;

/// N-Triples emitter. Streams statements as `<s> <p> <o> .` lines; a
/// statement with a context is written as an N-Quads line.
pub struct NTriplesEmitter<W: Write> {
    writer: W,
    count: u64,
}

impl<W: Write> NTriplesEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, count: 0 }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> StatementSink for NTriplesEmitter<W> {
    fn handle_statement(&mut self, statement: Statement) -> io::Result<()> {
        writeln!(self.writer, "{statement}")?;
        self.count += 1;
        Ok(())
    }

    fn add_prefix(&mut self, prefix: &str, iri: &str) {
        // N-Triples has no prefixes; emit as a comment for readability.
        // Errors surface again on the next write.
        let _ = writeln!(self.writer, "# @prefix {prefix}: <{iri}> .");
    }

    fn end(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn statement_count(&self) -> u64 {
        self.count
    }
}
