//! Microdata exposed as a named source format.
//!
//! Host frameworks look a parser up by format token (name, MIME type, file
//! extension or standard URI) with [`parser_for_format`] and call
//! [`MicrodataParser::parse`]. How they discover this module is up to them.

use std::sync::Arc;

use crate::dom::html::parse_html;
use crate::emitter::StatementSink;
use crate::error::{ParseError, RegistryError};
use crate::extraction::extractor::{ExtractionOptions, ItemExtractor};
use crate::model::ontology::md;
use crate::registry::VocabularyRegistry;

/// Identity of a source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFormat {
    pub name: &'static str,
    pub mime_types: &'static [&'static str],
    pub file_extensions: &'static [&'static str],
    pub standard_uri: &'static str,
    pub supports_namespaces: bool,
    pub supports_contexts: bool,
}

impl SourceFormat {
    /// True if `token` names this format, ignoring ASCII case. A leading
    /// `.` on an extension and MIME parameters (`; charset=...`) are ignored.
    pub fn matches(&self, token: &str) -> bool {
        let token = token.trim();
        let mime = token.split(';').next().unwrap_or(token).trim();
        let ext = token.strip_prefix('.').unwrap_or(token);
        self.name.eq_ignore_ascii_case(token)
            || self.standard_uri == token
            || self.mime_types.iter().any(|m| m.eq_ignore_ascii_case(mime))
            || self.file_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// HTML5 microdata.
pub const MICRODATA_FORMAT: SourceFormat = SourceFormat {
    name: "HTML5-Microdata",
    mime_types: &["text/html"],
    file_extensions: &["html", "htm"],
    standard_uri: md::FORMAT_URI,
    supports_namespaces: false,
    supports_contexts: false,
};

/// Parses HTML and pushes the microdata statements to a sink.
#[derive(Debug, Clone)]
pub struct MicrodataParser {
    registry: Arc<VocabularyRegistry>,
    options: ExtractionOptions,
}

impl MicrodataParser {
    /// Parser using the embedded default registry.
    pub fn new() -> Result<Self, RegistryError> {
        Ok(Self::with_registry(VocabularyRegistry::builtin()?))
    }

    pub fn with_registry(registry: Arc<VocabularyRegistry>) -> Self {
        Self {
            registry,
            options: ExtractionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn format(&self) -> &'static SourceFormat {
        &MICRODATA_FORMAT
    }

    pub fn registry(&self) -> &VocabularyRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    /// Parse `input` with `base_uri` as the document address and push its
    /// statements to `sink`. Returns the number of statements pushed.
    pub fn parse<S: StatementSink>(
        &self,
        input: &str,
        base_uri: &str,
        sink: S,
    ) -> Result<u64, ParseError> {
        let tree = parse_html(input, base_uri)?;
        let extractor = ItemExtractor::new(&tree, &self.registry, &self.options);
        Ok(extractor.extract(sink)?)
    }
}

/// Parser for `token`, or `None` if the token names another format.
pub fn parser_for_format(token: &str) -> Result<Option<MicrodataParser>, RegistryError> {
    if !MICRODATA_FORMAT.matches(token) {
        return Ok(None);
    }
    MicrodataParser::new().map(Some)
}
