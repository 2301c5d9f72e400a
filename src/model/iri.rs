//! IRI helpers: absoluteness, resolution against a base, vocabulary
//! derivation and fragment canonicalisation.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

/// Characters that need percent-encoding in an IRI fragment.
/// `%` is left alone so already-encoded names pass through unchanged.
const FRAGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// True if `value` parses as an absolute URI (has a scheme).
pub fn is_absolute(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Resolve `reference` against `base`.
///
/// An absolute reference is returned unchanged (not normalised), so an
/// absolute `itemid` keeps its exact spelling.
pub fn resolve(base: &str, reference: &str) -> Result<String, url::ParseError> {
    if is_absolute(reference) {
        return Ok(reference.to_string());
    }
    let base = Url::parse(base)?;
    Ok(base.join(reference)?.to_string())
}

/// Canonicalise a property name for use as a fragment or path suffix.
/// Plain identifiers are returned unchanged.
pub fn canonical_fragment(name: &str) -> String {
    utf8_percent_encode(name, FRAGMENT_ENCODE_SET).to_string()
}

/// Derive a vocabulary URI from a type URI by cutting after the rightmost
/// `#` or `/` (delimiter retained).
///
/// A type with neither delimiter is its own vocabulary; an empty type has
/// none.
pub fn vocabulary_for_type(type_uri: &str) -> Option<String> {
    if type_uri.is_empty() {
        return None;
    }
    match type_uri.rfind(['#', '/']) {
        Some(index) => Some(type_uri[..=index].to_string()),
        None => Some(type_uri.to_string()),
    }
}

/// `base` with its fragment replaced by `fragment`.
pub fn with_fragment(base: &str, fragment: &str) -> String {
    let without = base.split_once('#').map_or(base, |(head, _)| head);
    format!("{without}#{fragment}")
}
