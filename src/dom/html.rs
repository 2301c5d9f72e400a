//! Build a [`NodeTree`] from HTML markup.
//!
//! Uses the `scraper` crate (html5ever underneath) for tokenizing and tree
//! construction, then copies elements and text into the arena.

use scraper::{ElementRef, Html};
use tracing::{debug, warn};
use url::Url;

use super::{NodeId, NodeTree, NodeTreeBuilder};
use crate::error::ParseError;

/// Parse `input` as an HTML document with `base_uri` as its address.
///
/// The first `<base href>` in the document, resolved against `base_uri`,
/// becomes the document base.
pub fn parse_html(input: &str, base_uri: &str) -> Result<NodeTree, ParseError> {
    let base = Url::parse(base_uri).map_err(|source| ParseError::InvalidBase {
        base: base_uri.to_string(),
        source,
    })?;

    let document = Html::parse_document(input);
    for err in document.errors.iter() {
        debug!(error = %err, "html parse error");
    }

    let mut builder = NodeTreeBuilder::new(base.as_str());
    let mut base_href: Option<String> = None;
    copy_element(document.root_element(), None, &mut builder, &mut base_href);

    if let Some(href) = base_href {
        match base.join(&href) {
            Ok(resolved) => {
                debug!(base = %resolved, "<base> found");
                builder.set_base_uri(resolved.as_str());
            }
            Err(e) => warn!(href = %href, error = %e, "ignoring unusable <base href>"),
        }
    }

    Ok(builder.build())
}

fn copy_element(
    element: ElementRef<'_>,
    parent: Option<NodeId>,
    builder: &mut NodeTreeBuilder,
    base_href: &mut Option<String>,
) {
    let value = element.value();
    let attributes: Vec<(&str, &str)> = value.attrs().collect();
    let node = builder.element(parent, value.name(), &attributes);

    if base_href.is_none() && value.name().eq_ignore_ascii_case("base") {
        if let Some(href) = value.attr("href") {
            *base_href = Some(href.to_string());
        }
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            copy_element(child_element, Some(node), builder, base_href);
        } else if let Some(text) = child.value().as_text() {
            builder.text(node, text);
        }
    }
}
