//! Extract HTML microdata items to RDF statements.
//!
//! The pipeline: a [`dom::MicrodataDocument`] is walked by the
//! [`extraction::extractor::ItemExtractor`], which resolves subjects, types,
//! vocabularies and predicates (consulting a [`registry::VocabularyRegistry`])
//! and pushes [`model::term::Statement`]s into an [`emitter::StatementSink`].
//! [`emitter::grouping::CanonicalGroupingEmitter`] reorders that stream into a
//! deterministic grouped form before it reaches a serializer.

pub mod dom;
pub mod emitter;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parser;
pub mod registry;
