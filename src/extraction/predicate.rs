//! Predicate URI construction.

use crate::model::iri::{canonical_fragment, is_absolute, with_fragment};

/// Expands property names into absolute predicate URIs.
pub struct PredicateResolver<'a> {
    base_uri: &'a str,
}

impl<'a> PredicateResolver<'a> {
    pub fn new(base_uri: &'a str) -> Self {
        Self { base_uri }
    }

    /// Predicate URI for `name` in the given type/vocabulary context.
    ///
    /// - absolute names are returned unchanged;
    /// - without a current type, the name becomes a fragment of the document base;
    /// - otherwise it is appended to the vocabulary, with a `#` separator
    ///   unless the vocabulary already ends in `#` or `/`.
    pub fn resolve(
        &self,
        name: &str,
        current_type: Option<&str>,
        current_vocabulary: Option<&str>,
    ) -> String {
        if is_absolute(name) {
            return name.to_string();
        }
        let fragment = canonical_fragment(name);
        let vocabulary = match (current_type, current_vocabulary) {
            (Some(t), Some(v)) if !t.is_empty() && !v.is_empty() => v,
            _ => return with_fragment(self.base_uri, &fragment),
        };
        if vocabulary.ends_with('#') || vocabulary.ends_with('/') {
            format!("{vocabulary}{fragment}")
        } else {
            format!("{vocabulary}#{fragment}")
        }
    }
}
