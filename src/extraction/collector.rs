//! Property discovery for an item.

use std::collections::{HashSet, VecDeque};

use crate::dom::{MicrodataDocument, NodeId};
use crate::model::ontology::md;

/// The properties of the item rooted at `root`, in document order.
///
/// Breadth-first over `root`'s children and the first element for each
/// `itemref` id. Traversal stops descending at nested items but still
/// reports them when they carry `itemprop`. A node reached twice (a
/// malformed but tolerated `itemref` graph) is skipped silently.
pub fn find_item_properties<D: MicrodataDocument + ?Sized>(doc: &D, root: NodeId) -> Vec<NodeId> {
    let mut results = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut pending: VecDeque<NodeId> = VecDeque::new();

    visited.insert(root);
    pending.extend(doc.children(root).iter().copied());

    if let Some(itemref) = doc.attribute(root, md::ITEMREF) {
        for id in itemref.split_ascii_whitespace() {
            if let Some(target) = doc.element_by_id(id) {
                pending.push_back(target);
            }
        }
    }

    while let Some(current) = pending.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        if !doc.has_attribute(current, md::ITEMSCOPE) {
            pending.extend(doc.children(current).iter().copied());
        }
        if has_property_names(doc, current) {
            results.push(current);
        }
    }

    results.sort_by_key(|node| doc.position(*node));
    results
}

/// Items not themselves a property of another item, in document order.
pub fn find_top_level_items<D: MicrodataDocument + ?Sized>(doc: &D) -> Vec<NodeId> {
    doc.elements()
        .into_iter()
        .filter(|node| doc.has_attribute(*node, md::ITEMSCOPE) && !doc.has_attribute(*node, md::ITEMPROP))
        .collect()
}

fn has_property_names<D: MicrodataDocument + ?Sized>(doc: &D, node: NodeId) -> bool {
    doc.attribute(node, md::ITEMPROP)
        .is_some_and(|names| names.split_ascii_whitespace().next().is_some())
}
