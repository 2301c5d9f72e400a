use microdata2rdf::dom::{NodeId, NodeTree};
use microdata2rdf::extraction::collector::{find_item_properties, find_top_level_items};

const BASE: &str = "http://example.org/doc.html";

#[test]
fn direct_children_with_itemprop() {
    let mut b = NodeTree::builder(BASE);
    let item = b.element(None, "div", &[("itemscope", "")]);
    let name = b.element(Some(item), "span", &[("itemprop", "name")]);
    let _plain = b.element(Some(item), "span", &[]);
    let desc = b.element(Some(item), "span", &[("itemprop", "description")]);
    let tree = b.build();

    assert_eq!(find_item_properties(&tree, item), vec![name, desc]);
}

#[test]
fn traversal_passes_through_non_item_nodes() {
    let mut b = NodeTree::builder(BASE);
    let item = b.element(None, "div", &[("itemscope", "")]);
    let wrapper = b.element(Some(item), "section", &[]);
    let inner = b.element(Some(wrapper), "p", &[]);
    let deep = b.element(Some(inner), "span", &[("itemprop", "name")]);
    let tree = b.build();

    assert_eq!(find_item_properties(&tree, item), vec![deep]);
}

#[test]
fn nested_item_is_a_property_but_not_descended() {
    let mut b = NodeTree::builder(BASE);
    let item = b.element(None, "div", &[("itemscope", "")]);
    let nested = b.element(Some(item), "div", &[("itemprop", "author"), ("itemscope", "")]);
    let _nested_name = b.element(Some(nested), "span", &[("itemprop", "name")]);
    let tree = b.build();

    assert_eq!(find_item_properties(&tree, item), vec![nested]);
}

#[test]
fn nested_item_without_itemprop_hides_its_subtree() {
    let mut b = NodeTree::builder(BASE);
    let item = b.element(None, "div", &[("itemscope", "")]);
    let other = b.element(Some(item), "div", &[("itemscope", "")]);
    let _hidden = b.element(Some(other), "span", &[("itemprop", "name")]);
    let tree = b.build();

    assert!(find_item_properties(&tree, item).is_empty());
}

#[test]
fn itemref_discovery_is_resorted_into_document_order() {
    let mut b = NodeTree::builder(BASE);
    let body = b.element(None, "body", &[]);
    // Referenced node sits before the item in the document...
    let early = b.element(Some(body), "p", &[("id", "early"), ("itemprop", "first")]);
    let item = b.element(Some(body), "div", &[("itemscope", ""), ("itemref", "early")]);
    // ...but is discovered after the item's own children.
    let child = b.element(Some(item), "span", &[("itemprop", "second")]);
    let tree = b.build();

    assert_eq!(find_item_properties(&tree, item), vec![early, child]);
}

#[test]
fn itemref_target_descendants_are_collected() {
    let mut b = NodeTree::builder(BASE);
    let body = b.element(None, "body", &[]);
    let item = b.element(Some(body), "div", &[("itemscope", ""), ("itemref", "extra")]);
    let extra = b.element(Some(body), "div", &[("id", "extra")]);
    let a = b.element(Some(extra), "span", &[("itemprop", "a")]);
    let c = b.element(Some(extra), "span", &[("itemprop", "c")]);
    let tree = b.build();

    assert_eq!(find_item_properties(&tree, item), vec![a, c]);
}

#[test]
fn itemref_to_own_child_reports_it_once() {
    let mut b = NodeTree::builder(BASE);
    let item = b.element(None, "div", &[("itemscope", ""), ("itemref", "c c")]);
    let child = b.element(Some(item), "span", &[("id", "c"), ("itemprop", "name")]);
    let tree = b.build();

    assert_eq!(find_item_properties(&tree, item), vec![child]);
}

#[test]
fn itemref_back_to_root_is_ignored() {
    let mut b = NodeTree::builder(BASE);
    let item = b.element(None, "div", &[("id", "self"), ("itemscope", ""), ("itemref", "self")]);
    let child = b.element(Some(item), "span", &[("itemprop", "name")]);
    let tree = b.build();

    assert_eq!(find_item_properties(&tree, item), vec![child]);
}

#[test]
fn unknown_itemref_ids_are_skipped() {
    let mut b = NodeTree::builder(BASE);
    let item = b.element(None, "div", &[("itemscope", ""), ("itemref", "nope  also-nope")]);
    let child = b.element(Some(item), "span", &[("itemprop", "name")]);
    let tree = b.build();

    assert_eq!(find_item_properties(&tree, item), vec![child]);
}

#[test]
fn empty_itemprop_is_not_a_property() {
    let mut b = NodeTree::builder(BASE);
    let item = b.element(None, "div", &[("itemscope", "")]);
    let _empty = b.element(Some(item), "span", &[("itemprop", "")]);
    let _blank = b.element(Some(item), "span", &[("itemprop", "   ")]);
    let tree = b.build();

    assert!(find_item_properties(&tree, item).is_empty());
}

#[test]
fn top_level_items_exclude_properties() {
    let mut b = NodeTree::builder(BASE);
    let body = b.element(None, "body", &[]);
    let first = b.element(Some(body), "div", &[("itemscope", "")]);
    let _prop_item = b.element(Some(first), "div", &[("itemscope", ""), ("itemprop", "about")]);
    let _not_item = b.element(Some(body), "div", &[]);
    let second = b.element(Some(body), "div", &[("itemscope", "")]);
    let tree = b.build();

    let items: Vec<NodeId> = find_top_level_items(&tree);
    assert_eq!(items, vec![first, second]);
}
