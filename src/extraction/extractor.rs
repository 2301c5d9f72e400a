//! Item extraction engine: walks microdata items and emits RDF statements.
//!
//! The [`ItemExtractor`] resolves each top-level item's subject and types,
//! derives its vocabulary, and recurses through its properties, pushing
//! statements into a [`StatementSink`]. Per-run mutable state (the subject
//! identity map and the sink) lives in an [`ExtractionRunState`]; the type and
//! vocabulary are threaded by value as an [`EvaluationContext`].

use tracing::{debug, info, warn};

use crate::dom::{MicrodataDocument, NodeId};
use crate::emitter::StatementSink;
use crate::error::ExtractError;
use crate::model::iri;
use crate::model::ontology::{md, standard, WELL_KNOWN_PREFIXES};
use crate::model::term::{Literal, Statement, Subject, Term};
use crate::registry::VocabularyRegistry;

use super::collector::{find_item_properties, find_top_level_items};
use super::identity::SubjectIdentityMap;
use super::predicate::PredicateResolver;

// ---------------------------------------------------------------------------
// ExtractionOptions
// ---------------------------------------------------------------------------

/// Options controlling extraction policy.
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// Abort the run on an `itemid` that cannot be made absolute, instead of
    /// warning and falling back to a blank node.
    pub fail_on_relative_item_id: bool,
    /// Abort the run on a relative `itemtype` token, instead of warning and
    /// skipping it.
    pub fail_on_relative_item_type: bool,
    /// Emit extra statements for registry `subPropertyOf` and
    /// `equivalentProperty` values.
    pub expand_property_equivalents: bool,
    /// Tag literals with the nearest `lang` attribute.
    pub language_literals: bool,
    pub blank_node_prefix: String,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            fail_on_relative_item_id: false,
            fail_on_relative_item_type: false,
            expand_property_equivalents: false,
            language_literals: false,
            blank_node_prefix: "b".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// EvaluationContext / ExtractionRunState
// ---------------------------------------------------------------------------

/// Type and vocabulary in effect for an item, passed down by value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationContext {
    pub current_type: Option<String>,
    pub current_vocabulary: Option<String>,
}

/// Mutable state owned by one extraction run.
pub struct ExtractionRunState<S: StatementSink> {
    subjects: SubjectIdentityMap,
    sink: S,
    emitted: u64,
}

impl<S: StatementSink> ExtractionRunState<S> {
    pub fn new(sink: S, blank_node_prefix: &str) -> Self {
        Self {
            subjects: SubjectIdentityMap::new(blank_node_prefix),
            sink,
            emitted: 0,
        }
    }

    pub fn subjects(&self) -> &SubjectIdentityMap {
        &self.subjects
    }

    /// Statements pushed to the sink by this run.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn emit(&mut self, statement: Statement) -> Result<(), ExtractError> {
        self.sink.handle_statement(statement)?;
        self.emitted += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ItemExtractor
// ---------------------------------------------------------------------------

/// Turns the microdata items of a [`MicrodataDocument`] into statements.
pub struct ItemExtractor<'a, D: MicrodataDocument + ?Sized> {
    document: &'a D,
    registry: &'a VocabularyRegistry,
    options: &'a ExtractionOptions,
    predicates: PredicateResolver<'a>,
}

impl<'a, D: MicrodataDocument + ?Sized> ItemExtractor<'a, D> {
    pub fn new(
        document: &'a D,
        registry: &'a VocabularyRegistry,
        options: &'a ExtractionOptions,
    ) -> Self {
        Self {
            document,
            registry,
            options,
            predicates: PredicateResolver::new(document.base_uri()),
        }
    }

    // -----------------------------------------------------------------------
    // Public entry points
    // -----------------------------------------------------------------------

    /// Run a full extraction: `start`, every top-level item, `end`.
    /// Returns the number of statements pushed.
    ///
    /// Blank-node labels are `{prefix}{n}`, or `{prefix}{run}_{n}` when the
    /// sink reports a [`run_scope`](StatementSink::run_scope).
    pub fn extract<S: StatementSink>(&self, mut sink: S) -> Result<u64, ExtractError> {
        for (prefix, iri) in WELL_KNOWN_PREFIXES {
            sink.add_prefix(prefix, iri);
        }
        sink.start()?;

        let blank_node_prefix = match sink.run_scope() {
            Some(run) => format!("{}{run}_", self.options.blank_node_prefix),
            None => self.options.blank_node_prefix.clone(),
        };
        let mut state = ExtractionRunState::new(sink, &blank_node_prefix);
        let items = find_top_level_items(self.document);
        debug!(items = items.len(), "top-level items");
        for item in items {
            self.process_item(item, EvaluationContext::default(), &mut state)?;
        }

        let emitted = state.emitted;
        let mut sink = state.into_sink();
        sink.end()?;
        info!(statements = emitted, "extraction finished");
        Ok(emitted)
    }

    /// Generate the statements for one item and return its subject.
    ///
    /// An item already seen in this run returns its recorded subject without
    /// emitting anything, which terminates `itemref` cycles.
    pub fn process_item<S: StatementSink>(
        &self,
        node: NodeId,
        inherited: EvaluationContext,
        state: &mut ExtractionRunState<S>,
    ) -> Result<Subject, ExtractError> {
        if let Some(subject) = state.subjects.get(node) {
            return Ok(subject.clone());
        }

        let subject = match self.resolve_item_id(node)? {
            Some(iri) => Subject::Iri(iri),
            None => state.subjects.fresh_blank(),
        };
        state.subjects.insert(node, subject.clone());
        debug!(node = node.0, subject = %subject, "processing item");

        let primary_type = match self.emit_types(node, &subject, state)? {
            Some(t) => Some(t),
            None => inherited.current_type,
        };
        let vocabulary = primary_type
            .as_deref()
            .and_then(|t| self.vocabulary_for(t));
        let context = EvaluationContext {
            current_type: primary_type,
            current_vocabulary: vocabulary,
        };

        for property in find_item_properties(self.document, node) {
            self.process_property(property, &subject, &context, state)?;
        }

        Ok(subject)
    }

    // -----------------------------------------------------------------------
    // Subject and type resolution
    // -----------------------------------------------------------------------

    /// Absolute IRI for the item's `itemid`, if it has a usable one.
    fn resolve_item_id(&self, node: NodeId) -> Result<Option<String>, ExtractError> {
        let itemid = match self.document.attribute(node, md::ITEMID) {
            Some(id) => id.trim(),
            None => return Ok(None),
        };

        match iri::resolve(self.document.base_uri(), itemid) {
            Ok(resolved) => Ok(Some(resolved)),
            Err(e) => {
                if self.options.fail_on_relative_item_id {
                    return Err(ExtractError::RelativeItemId {
                        itemid: itemid.to_string(),
                        reason: e.to_string(),
                    });
                }
                warn!(itemid = %itemid, error = %e, "unresolvable itemid, using a blank node");
                Ok(None)
            }
        }
    }

    /// Emit `rdf:type` for each absolute `itemtype` token; return the first.
    fn emit_types<S: StatementSink>(
        &self,
        node: NodeId,
        subject: &Subject,
        state: &mut ExtractionRunState<S>,
    ) -> Result<Option<String>, ExtractError> {
        let Some(itemtype) = self.document.attribute(node, md::ITEMTYPE) else {
            return Ok(None);
        };

        let mut primary: Option<String> = None;
        for token in itemtype.split_ascii_whitespace() {
            if !iri::is_absolute(token) {
                if self.options.fail_on_relative_item_type {
                    return Err(ExtractError::RelativeItemType {
                        itemtype: token.to_string(),
                    });
                }
                warn!(itemtype = %token, "skipping relative itemtype");
                continue;
            }
            state.emit(Statement::new(
                subject.clone(),
                standard::RDF_TYPE,
                Term::iri(token),
            ))?;
            if primary.is_none() {
                primary = Some(token.to_string());
            }
        }
        Ok(primary)
    }

    /// Registry prefix matching `type_uri`, else the type cut after its last
    /// `#` or `/`.
    fn vocabulary_for(&self, type_uri: &str) -> Option<String> {
        match self.registry.match_type(type_uri) {
            Some(entry) => Some(entry.prefix_uri().to_string()),
            None => iri::vocabulary_for_type(type_uri),
        }
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn process_property<S: StatementSink>(
        &self,
        property: NodeId,
        subject: &Subject,
        context: &EvaluationContext,
        state: &mut ExtractionRunState<S>,
    ) -> Result<(), ExtractError> {
        let Some(names) = self.document.attribute(property, md::ITEMPROP) else {
            return Ok(());
        };

        for name in names.split_ascii_whitespace() {
            let predicate = self.predicates.resolve(
                name,
                context.current_type.as_deref(),
                context.current_vocabulary.as_deref(),
            );
            let value: Term = if self.document.has_attribute(property, md::ITEMSCOPE) {
                self.process_item(property, context.clone(), state)?.into()
            } else {
                self.literal_value(property).into()
            };
            debug!(property = property.0, predicate = %predicate, "property");

            state.emit(Statement::new(subject.clone(), predicate, value.clone()))?;
            if self.options.expand_property_equivalents {
                self.emit_equivalents(name, subject, &value, context, state)?;
            }
        }
        Ok(())
    }

    fn literal_value(&self, node: NodeId) -> Literal {
        let text = self.document.text_content(node);
        if self.options.language_literals {
            if let Some(lang) = self.language_of(node) {
                return Literal::with_language(text, lang);
            }
        }
        Literal::new(text)
    }

    /// `lang` of the nearest ancestor-or-self that declares a non-empty one.
    fn language_of(&self, node: NodeId) -> Option<String> {
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(lang) = self.document.attribute(n, md::LANG) {
                let lang = lang.trim();
                if !lang.is_empty() {
                    return Some(lang.to_string());
                }
            }
            current = self.document.parent(n);
        }
        None
    }

    /// Extra statements for the registry's `subPropertyOf` and
    /// `equivalentProperty` values of `name` in the current vocabulary.
    fn emit_equivalents<S: StatementSink>(
        &self,
        name: &str,
        subject: &Subject,
        value: &Term,
        context: &EvaluationContext,
        state: &mut ExtractionRunState<S>,
    ) -> Result<(), ExtractError> {
        let Some(entry) = context
            .current_vocabulary
            .as_deref()
            .and_then(|v| self.registry.entry_for_vocabulary(v))
        else {
            return Ok(());
        };

        for key in [md::SUB_PROPERTY_OF, md::EQUIVALENT_PROPERTY] {
            for equiv in entry.property_attribute_list(name, key) {
                if iri::is_absolute(&equiv) {
                    state.emit(Statement::new(subject.clone(), equiv, value.clone()))?;
                }
            }
        }
        Ok(())
    }
}
