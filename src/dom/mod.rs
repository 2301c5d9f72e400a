//! The input tree the extractor walks.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Identity is the
//! index, never the attribute content, so two elements with identical
//! attributes are still distinct nodes.

pub mod html;

use std::collections::HashMap;

use crate::model::ontology::md;

/// Stable handle of an element node within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Capabilities the extractor needs from a document tree.
///
/// Only element nodes are addressable; text is reachable through
/// [`text_content`](Self::text_content).
pub trait MicrodataDocument {
    /// Absolute base URI of the document.
    fn base_uri(&self) -> &str;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Element children in document order.
    fn children(&self, node: NodeId) -> &[NodeId];

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Position of the node in a pre-order walk of the whole document.
    fn position(&self, node: NodeId) -> usize;

    /// Text of all descendant text nodes, whitespace-collapsed and trimmed.
    fn text_content(&self, node: NodeId) -> String;

    /// First element in document order whose `id` equals `id`.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Every element, in document order.
    fn elements(&self) -> Vec<NodeId>;
}

#[derive(Debug, Clone)]
enum Content {
    Element(NodeId),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    attributes: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    content: Vec<Content>,
}

/// Arena-backed [`MicrodataDocument`]. Build one with [`NodeTreeBuilder`].
#[derive(Debug, Clone)]
pub struct NodeTree {
    base_uri: String,
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
    /// Pre-order position per node, indexed by `NodeId`.
    positions: Vec<usize>,
    /// Nodes in document order.
    order: Vec<NodeId>,
    ids: HashMap<String, NodeId>,
}

impl NodeTree {
    pub fn builder(base_uri: impl Into<String>) -> NodeTreeBuilder {
        NodeTreeBuilder::new(base_uri)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].name
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        for content in &self.nodes[node.0].content {
            match content {
                Content::Text(text) => out.push_str(text),
                Content::Element(child) => self.collect_text(*child, out),
            }
        }
    }
}

impl MicrodataDocument for NodeTree {
    fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0]
            .attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn position(&self, node: NodeId) -> usize {
        self.positions[node.0]
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut raw = String::new();
        self.collect_text(node, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    fn elements(&self) -> Vec<NodeId> {
        self.order.clone()
    }
}

/// Incrementally assembles a [`NodeTree`].
///
/// Nodes may be added in any order; document order is the pre-order walk of
/// the finished tree, computed by [`build`](Self::build).
#[derive(Debug)]
pub struct NodeTreeBuilder {
    base_uri: String,
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
}

impl NodeTreeBuilder {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn set_base_uri(&mut self, base_uri: impl Into<String>) {
        self.base_uri = base_uri.into();
    }

    /// Append an element as the last child of `parent` (or as a new root).
    pub fn element(&mut self, parent: Option<NodeId>, name: &str, attributes: &[(&str, &str)]) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            parent,
            children: Vec::new(),
            content: Vec::new(),
        });
        match parent {
            Some(p) => {
                let parent_data = &mut self.nodes[p.0];
                parent_data.children.push(id);
                parent_data.content.push(Content::Element(id));
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Append a text node as the last child of `parent`.
    pub fn text(&mut self, parent: NodeId, text: &str) {
        self.nodes[parent.0]
            .content
            .push(Content::Text(text.to_string()));
    }

    pub fn build(self) -> NodeTree {
        let mut positions = vec![0; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut ids = HashMap::new();

        // Iterative pre-order walk; children pushed in reverse so the first
        // child pops first.
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            positions[node.0] = order.len();
            order.push(node);
            let data = &self.nodes[node.0];
            if let Some((_, id)) = data
                .attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(md::ID))
            {
                ids.entry(id.clone()).or_insert(node);
            }
            stack.extend(data.children.iter().rev().copied());
        }

        NodeTree {
            base_uri: self.base_uri,
            nodes: self.nodes,
            roots: self.roots,
            positions,
            order,
            ids,
        }
    }
}
