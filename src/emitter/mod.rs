pub mod grouping;
pub mod ntriples;
pub mod turtle;

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::model::term::Statement;

/// Push contract for statement consumers: `start`, any number of
/// `handle_statement`, then `end`.
pub trait StatementSink {
    /// Called once before the first statement.
    fn start(&mut self) -> io::Result<()> {
        Ok(())
    }
    /// Accept one statement.
    fn handle_statement(&mut self, statement: Statement) -> io::Result<()>;
    /// Register a namespace prefix (used by Turtle output).
    fn add_prefix(&mut self, _prefix: &str, _iri: &str) {}
    /// Called once after the last statement. Flushes buffered output.
    fn end(&mut self) -> io::Result<()>;
    /// Number of statements accepted so far.
    fn statement_count(&self) -> u64;
    /// Run number for a producer that is about to write into a sink shared
    /// with other runs. Each call returns a new number; `None` for a sink
    /// owned by a single run. Blank-node labels are qualified by it.
    fn run_scope(&mut self) -> Option<u64> {
        None
    }
}

impl<S: StatementSink + ?Sized> StatementSink for &mut S {
    fn start(&mut self) -> io::Result<()> {
        (**self).start()
    }

    fn handle_statement(&mut self, statement: Statement) -> io::Result<()> {
        (**self).handle_statement(statement)
    }

    fn add_prefix(&mut self, prefix: &str, iri: &str) {
        (**self).add_prefix(prefix, iri)
    }

    fn end(&mut self) -> io::Result<()> {
        (**self).end()
    }

    fn statement_count(&self) -> u64 {
        (**self).statement_count()
    }

    fn run_scope(&mut self) -> Option<u64> {
        (**self).run_scope()
    }
}

/// Collects statements in arrival order.
#[derive(Debug, Default)]
pub struct StatementCollector {
    statements: Vec<Statement>,
    started: bool,
    ended: bool,
}

impl StatementCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl StatementSink for StatementCollector {
    fn start(&mut self) -> io::Result<()> {
        self.started = true;
        Ok(())
    }

    fn handle_statement(&mut self, statement: Statement) -> io::Result<()> {
        self.statements.push(statement);
        Ok(())
    }

    fn end(&mut self) -> io::Result<()> {
        self.ended = true;
        Ok(())
    }

    fn statement_count(&self) -> u64 {
        self.statements.len() as u64
    }
}

/// A sink shared between concurrent extraction runs. Every call takes the
/// lock, so buffer mutation inside the wrapped sink is serialized.
///
/// Each run gets its own [`run_scope`](StatementSink::run_scope), so blank
/// nodes from different runs never share a label. `start` and `end` bracket
/// the runs as a whole: the wrapped sink is started by the first active run
/// and ended when the last active run ends.
#[derive(Debug)]
pub struct SharedSink<S> {
    inner: Arc<Mutex<SharedState<S>>>,
}

#[derive(Debug)]
struct SharedState<S> {
    sink: S,
    active_runs: usize,
    next_run: u64,
}

impl<S> Clone for SharedSink<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: StatementSink> SharedSink<S> {
    pub fn new(sink: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SharedState {
                sink,
                active_runs: 0,
                next_run: 0,
            })),
        }
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, SharedState<S>>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("shared sink lock poisoned"))
    }

    /// Runs that have started and not yet ended.
    pub fn active_runs(&self) -> usize {
        self.lock().map(|state| state.active_runs).unwrap_or(0)
    }

    /// Unwrap the sink once every other handle has been dropped.
    pub fn into_inner(self) -> Option<S> {
        Arc::try_unwrap(self.inner)
            .ok()
            .and_then(|m| m.into_inner().ok())
            .map(|state| state.sink)
    }
}

impl<S: StatementSink> StatementSink for SharedSink<S> {
    fn start(&mut self) -> io::Result<()> {
        let mut state = self.lock()?;
        state.active_runs += 1;
        if state.active_runs == 1 {
            state.sink.start()?;
        }
        Ok(())
    }

    fn handle_statement(&mut self, statement: Statement) -> io::Result<()> {
        self.lock()?.sink.handle_statement(statement)
    }

    fn add_prefix(&mut self, prefix: &str, iri: &str) {
        if let Ok(mut state) = self.lock() {
            state.sink.add_prefix(prefix, iri);
        }
    }

    fn end(&mut self) -> io::Result<()> {
        let mut state = self.lock()?;
        state.active_runs = state.active_runs.saturating_sub(1);
        if state.active_runs == 0 {
            state.sink.end()?;
        }
        Ok(())
    }

    fn statement_count(&self) -> u64 {
        self.lock().map(|state| state.sink.statement_count()).unwrap_or(0)
    }

    fn run_scope(&mut self) -> Option<u64> {
        let mut state = self.lock().ok()?;
        let run = state.next_run;
        state.next_run += 1;
        Some(run)
    }
}
