// ── Hierarchy assembler ──
//
// Turns id-indexed flat records that point at their parent into an owned
// tree. Parent id 0 marks the root. Anything not reachable from the root
// (unknown parent, or a cycle that never touches the root) is dropped.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::model::{FlatRecord, RecordSet};

const ROOT_PARENT: i64 = 0;

/// A record with its ordered children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: u32,
    #[serde(flatten)]
    pub record: FlatRecord,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<TreeNode>,
}

impl TreeNode {
    /// Depth of the deepest branch, counting this node.
    pub fn depth(&self) -> usize {
        1 + self.components.iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Every node in the tree, parents before children.
    pub fn walk(&self) -> Vec<&TreeNode> {
        let mut out = vec![self];
        for child in &self.components {
            out.extend(child.walk());
        }
        out
    }

    pub fn find(&self, id: u32) -> Option<&TreeNode> {
        self.walk().into_iter().find(|node| node.id == id)
    }
}

struct Assembler<'a> {
    records: &'a RecordSet,
    children: IndexMap<i64, Vec<u32>>,
    order_field: &'a str,
    visited: HashSet<u32>,
}

impl Assembler<'_> {
    fn sort_key(&self, id: u32) -> i64 {
        self.records
            .get(&id)
            .and_then(|record| record.int(self.order_field))
            .unwrap_or(i64::MAX)
    }

    fn build(&mut self, id: u32, record: &FlatRecord) -> TreeNode {
        let records = self.records;
        self.visited.insert(id);
        let mut child_ids = self
            .children
            .get(&i64::from(id))
            .cloned()
            .unwrap_or_default();
        // Stable: equal order keys keep appearance order.
        child_ids.sort_by_key(|child| self.sort_key(*child));

        let mut components = Vec::with_capacity(child_ids.len());
        for child in child_ids {
            if self.visited.contains(&child) {
                debug!(id = child, parent = id, "component already placed, skipped");
                continue;
            }
            if let Some(child_record) = records.get(&child) {
                components.push(self.build(child, child_record));
            }
        }

        TreeNode {
            id,
            record: record.clone(),
            components,
        }
    }
}

/// Build the tree rooted at the first record whose `parent_field` is 0.
///
/// Siblings are ordered by `order_field` ascending; a missing order value
/// sorts last. Returns `None` when no record is a root.
pub fn assemble(records: &RecordSet, parent_field: &str, order_field: &str) -> Option<TreeNode> {
    let mut children: IndexMap<i64, Vec<u32>> = IndexMap::new();
    let mut root = None;
    for (id, record) in records {
        match record.int(parent_field) {
            Some(ROOT_PARENT) if root.is_none() => root = Some((*id, record)),
            Some(ROOT_PARENT) => debug!(id, "additional root ignored"),
            Some(parent) => children.entry(parent).or_default().push(*id),
            None => debug!(id, "component without parent reference dropped"),
        }
    }

    let (root_id, root_record) = root?;
    let mut assembler = Assembler {
        records,
        children,
        order_field,
        visited: HashSet::new(),
    };
    let tree = assembler.build(root_id, root_record);

    let dropped = records.len() - assembler.visited.len();
    if dropped > 0 {
        debug!(dropped, "unreachable components left out of the tree");
    }
    Some(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn component(parent: i64, pos: Option<i64>) -> FlatRecord {
        let record = FlatRecord::new().with("cont_in", parent);
        match pos {
            Some(pos) => record.with("rel_pos", pos),
            None => record,
        }
    }

    fn ids(nodes: &[TreeNode]) -> Vec<u32> {
        nodes.iter().map(|n| n.id).collect()
    }

    #[test]
    fn chain_assembles_to_full_depth() {
        let mut records = RecordSet::new();
        records.insert(1, component(0, Some(-1)));
        for id in 2..=6 {
            records.insert(id, component(i64::from(id - 1), Some(0)));
        }
        let tree = assemble(&records, "cont_in", "rel_pos");
        assert_eq!(tree.map(|t| t.depth()), Some(6));
    }

    #[test]
    fn siblings_sort_by_position_missing_last() {
        let mut records = RecordSet::new();
        records.insert(1, component(0, None));
        records.insert(10, component(1, None));
        records.insert(11, component(1, Some(2)));
        records.insert(12, component(1, Some(0)));
        records.insert(13, component(1, Some(2)));
        let tree = assemble(&records, "cont_in", "rel_pos").unwrap_or_else(|| panic!("no root"));
        assert_eq!(ids(&tree.components), vec![12, 11, 13, 10]);
    }

    #[test]
    fn orphans_and_cycles_are_dropped() {
        let mut records = RecordSet::new();
        records.insert(1, component(0, Some(0)));
        records.insert(2, component(1, Some(0)));
        records.insert(99, component(999, Some(0)));
        records.insert(7, component(8, Some(0)));
        records.insert(8, component(7, Some(0)));
        let tree = assemble(&records, "cont_in", "rel_pos").unwrap_or_else(|| panic!("no root"));
        let placed: Vec<u32> = tree.walk().iter().map(|n| n.id).collect();
        assert_eq!(placed, vec![1, 2]);
        assert!(tree.find(99).is_none());
    }

    #[test]
    fn second_root_is_ignored() {
        let mut records = RecordSet::new();
        records.insert(0, component(0, Some(0)));
        records.insert(5, component(0, Some(1)));
        let tree = assemble(&records, "cont_in", "rel_pos").unwrap_or_else(|| panic!("no root"));
        assert_eq!(tree.id, 0);
        assert!(tree.components.is_empty());
    }

    #[test]
    fn no_root_means_no_tree() {
        let mut records = RecordSet::new();
        records.insert(3, component(2, Some(0)));
        assert_eq!(assemble(&records, "cont_in", "rel_pos"), None);
        assert_eq!(assemble(&RecordSet::new(), "cont_in", "rel_pos"), None);
    }

    #[test]
    fn serializes_with_flattened_fields() {
        let mut records = RecordSet::new();
        records.insert(1, component(0, Some(-1)).with("name", "Chassis"));
        records.insert(2, component(1, Some(0)).with("name", "Base Band"));
        let tree = assemble(&records, "cont_in", "rel_pos");
        let json = serde_json::to_value(&tree).unwrap_or_default();
        assert_eq!(json["name"], "Chassis");
        assert_eq!(json["components"][0]["id"], 2);
        assert!(json["components"][0].get("components").is_none());
    }
}
