//! Per-run mapping from item nodes to their subjects.

use std::collections::HashMap;

use crate::dom::NodeId;
use crate::model::term::Subject;

/// Write-once map from [`NodeId`] to [`Subject`], plus the blank-node
/// allocator for the run. Keyed by node identity, so structurally identical
/// items still get distinct subjects.
#[derive(Debug)]
pub struct SubjectIdentityMap {
    subjects: HashMap<NodeId, Subject>,
    blank_prefix: String,
    next_blank: u64,
}

impl SubjectIdentityMap {
    pub fn new(blank_prefix: impl Into<String>) -> Self {
        Self {
            subjects: HashMap::new(),
            blank_prefix: blank_prefix.into(),
            next_blank: 0,
        }
    }

    pub fn get(&self, node: NodeId) -> Option<&Subject> {
        self.subjects.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.subjects.contains_key(&node)
    }

    /// Record `node -> subject`. An existing mapping is never replaced;
    /// returns `false` if the node was already mapped.
    pub fn insert(&mut self, node: NodeId, subject: Subject) -> bool {
        if self.subjects.contains_key(&node) {
            return false;
        }
        self.subjects.insert(node, subject);
        true
    }

    /// Allocate a blank node unique within this run.
    pub fn fresh_blank(&mut self) -> Subject {
        let label = format!("{}{}", self.blank_prefix, self.next_blank);
        self.next_blank += 1;
        Subject::Blank(label)
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
