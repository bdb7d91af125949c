//! Character-keyed ternary search tree backed by a node arena.
//!
//! # Responsibility
//! - Map words (or tags) to the set of document ids containing them.
//! - Support exact lookups and prefix enumeration over the `eq` subtree.
//! - Remove a document id from every node on delete (tombstone sweep).
//!
//! # Invariants
//! - Nodes are only ever appended to the arena; none is unlinked or reused,
//!   so every arena slot is reachable from `root`.
//! - `lo`/`hi` children hold alternative characters ordered by `char` value;
//!   `eq` advances to the next character of the same word.
//! - A node's `ids` is non-empty iff some indexed document still carries the
//!   word spelled by the root-to-node path.

use crate::model::document::DocumentId;
use std::collections::BTreeSet;

/// Position of a node inside the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(usize);

/// Single character-keyed node.
#[derive(Debug, Clone)]
pub struct TernaryNode {
    key: char,
    lo: Option<NodeIndex>,
    eq: Option<NodeIndex>,
    hi: Option<NodeIndex>,
    ids: BTreeSet<DocumentId>,
}

impl TernaryNode {
    fn new(key: char) -> Self {
        Self {
            key,
            lo: None,
            eq: None,
            hi: None,
            ids: BTreeSet::new(),
        }
    }

    /// Character stored at this node.
    pub fn key(&self) -> char {
        self.key
    }

    /// Document ids whose word terminates at this node.
    pub fn ids(&self) -> &BTreeSet<DocumentId> {
        &self.ids
    }

    /// Returns whether at least one document terminates a word here.
    pub fn is_terminal(&self) -> bool {
        !self.ids.is_empty()
    }
}

#[derive(Clone, Copy)]
enum Link {
    Root,
    Lo(NodeIndex),
    Eq(NodeIndex),
    Hi(NodeIndex),
}

enum Visit {
    Expand(Option<NodeIndex>),
    Emit(NodeIndex),
}

/// Ternary search tree mapping words to document id sets.
#[derive(Debug, Clone, Default)]
pub struct TernaryTree {
    nodes: Vec<TernaryNode>,
    root: Option<NodeIndex>,
}

impl TernaryTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated nodes, including tombstoned and internal ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether nothing was ever inserted.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts `word` for document `id`.
    ///
    /// `word` is expected to be normalized by the caller. Empty words are
    /// skipped. Returns `true` when `id` was newly added to the word's set.
    pub fn insert(&mut self, word: &str, id: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        if chars.is_empty() {
            return false;
        }

        let mut link = Link::Root;
        let mut pos = 0;
        loop {
            let c = chars[pos];
            let current = match self.follow(link) {
                Some(index) => index,
                None => self.attach(link, c),
            };

            let key = self.nodes[current.0].key;
            if c < key {
                link = Link::Lo(current);
            } else if c > key {
                link = Link::Hi(current);
            } else if pos + 1 < chars.len() {
                pos += 1;
                link = Link::Eq(current);
            } else {
                return self.nodes[current.0].ids.insert(id.to_string());
            }
        }
    }

    /// Returns the node terminating `word`, if the full path exists.
    ///
    /// A returned node may still have an empty id set when it is internal
    /// only or every document carrying the word was tombstoned.
    pub fn lookup_exact(&self, word: &str) -> Option<&TernaryNode> {
        self.find(word).map(|index| &self.nodes[index.0])
    }

    /// Returns the node at the end of `prefix` (if it terminates a word) plus
    /// every word-terminating node in its `eq` subtree.
    pub fn enumerate_prefix(&self, prefix: &str) -> Vec<&TernaryNode> {
        let Some(start) = self.find(prefix) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        let start_node = &self.nodes[start.0];
        if start_node.is_terminal() {
            found.push(start_node);
        }

        let mut stack = vec![Visit::Expand(start_node.eq)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Expand(None) => {}
                Visit::Expand(Some(index)) => {
                    let node = &self.nodes[index.0];
                    // Reverse push order yields lo, self, eq, hi.
                    stack.push(Visit::Expand(node.hi));
                    stack.push(Visit::Expand(node.eq));
                    stack.push(Visit::Emit(index));
                    stack.push(Visit::Expand(node.lo));
                }
                Visit::Emit(index) => {
                    let node = &self.nodes[index.0];
                    if node.is_terminal() {
                        found.push(node);
                    }
                }
            }
        }

        found
    }

    /// Ids of documents containing exactly `word`.
    pub fn ids_exact(&self, word: &str) -> BTreeSet<DocumentId> {
        self.lookup_exact(word)
            .map(|node| node.ids.clone())
            .unwrap_or_default()
    }

    /// Union of ids of documents containing any word starting with `prefix`.
    pub fn ids_with_prefix(&self, prefix: &str) -> BTreeSet<DocumentId> {
        self.enumerate_prefix(prefix)
            .into_iter()
            .flat_map(|node| node.ids.iter().cloned())
            .collect()
    }

    /// Removes `id` from every node that references it.
    ///
    /// Nodes are kept in place. Returns the number of nodes `id` was removed
    /// from; a second call for the same id returns `0`.
    pub fn tombstone(&mut self, id: &str) -> usize {
        // Every arena slot is linked into the tree, so a flat sweep visits
        // the same nodes as a lo/eq/hi traversal.
        let mut removed = 0;
        for node in &mut self.nodes {
            if node.ids.remove(id) {
                removed += 1;
            }
        }
        removed
    }

    fn find(&self, word: &str) -> Option<NodeIndex> {
        let mut chars = word.chars();
        let mut c = chars.next()?;
        let mut current = self.root?;
        loop {
            let node = &self.nodes[current.0];
            if c < node.key {
                current = node.lo?;
            } else if c > node.key {
                current = node.hi?;
            } else {
                match chars.next() {
                    Some(next) => {
                        c = next;
                        current = node.eq?;
                    }
                    None => return Some(current),
                }
            }
        }
    }

    fn follow(&self, link: Link) -> Option<NodeIndex> {
        match link {
            Link::Root => self.root,
            Link::Lo(parent) => self.nodes[parent.0].lo,
            Link::Eq(parent) => self.nodes[parent.0].eq,
            Link::Hi(parent) => self.nodes[parent.0].hi,
        }
    }

    fn attach(&mut self, link: Link, key: char) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(TernaryNode::new(key));
        match link {
            Link::Root => self.root = Some(index),
            Link::Lo(parent) => self.nodes[parent.0].lo = Some(index),
            Link::Eq(parent) => self.nodes[parent.0].eq = Some(index),
            Link::Hi(parent) => self.nodes[parent.0].hi = Some(index),
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::TernaryTree;

    fn sorted_keys(tree: &TernaryTree, prefix: &str) -> Vec<Vec<String>> {
        let mut sets: Vec<Vec<String>> = tree
            .enumerate_prefix(prefix)
            .into_iter()
            .map(|node| node.ids().iter().cloned().collect())
            .collect();
        sets.sort();
        sets
    }

    #[test]
    fn insert_reports_new_ids_only() {
        let mut tree = TernaryTree::new();
        assert!(tree.insert("milk", "n1"));
        assert!(!tree.insert("milk", "n1"));
        assert!(tree.insert("milk", "n2"));
        assert_eq!(tree.ids_exact("milk").len(), 2);
    }

    #[test]
    fn empty_word_is_skipped() {
        let mut tree = TernaryTree::new();
        assert!(!tree.insert("", "n1"));
        assert!(tree.is_empty());
        assert!(tree.lookup_exact("").is_none());
    }

    #[test]
    fn shared_prefix_reuses_nodes() {
        let mut tree = TernaryTree::new();
        tree.insert("milk", "n1");
        let after_first = tree.node_count();
        tree.insert("mile", "n2");
        assert_eq!(tree.node_count(), after_first + 1);
    }

    #[test]
    fn internal_node_is_found_but_empty() {
        let mut tree = TernaryTree::new();
        tree.insert("milk", "n1");
        let node = tree.lookup_exact("mil").expect("path should exist");
        assert_eq!(node.key(), 'l');
        assert!(!node.is_terminal());
        assert!(tree.lookup_exact("milky").is_none());
    }

    #[test]
    fn enumerate_prefix_visits_eq_subtree_only() {
        let mut tree = TernaryTree::new();
        tree.insert("mi", "a");
        tree.insert("milk", "b");
        tree.insert("mint", "c");
        tree.insert("ma", "d");
        tree.insert("mz", "e");

        assert_eq!(
            sorted_keys(&tree, "mi"),
            vec![vec!["a".to_string()], vec!["b".to_string()], vec!["c".to_string()]]
        );
        assert!(tree.enumerate_prefix("q").is_empty());
    }

    #[test]
    fn tombstone_removes_id_everywhere_and_keeps_nodes() {
        let mut tree = TernaryTree::new();
        tree.insert("milk", "n1");
        tree.insert("eggs", "n1");
        tree.insert("milk", "n2");
        let nodes = tree.node_count();

        assert_eq!(tree.tombstone("n1"), 2);
        assert_eq!(tree.tombstone("n1"), 0);
        assert_eq!(tree.node_count(), nodes);
        assert!(tree.ids_exact("eggs").is_empty());
        assert_eq!(
            tree.ids_exact("milk").into_iter().collect::<Vec<_>>(),
            vec!["n2".to_string()]
        );
    }

    #[test]
    fn non_ascii_characters_are_ordered_by_char_value() {
        let mut tree = TernaryTree::new();
        tree.insert("café", "n1");
        tree.insert("cafe", "n2");
        assert!(tree.ids_exact("café").contains("n1"));
        assert!(tree.ids_exact("cafe").contains("n2"));
        assert_eq!(tree.ids_with_prefix("caf").len(), 2);
    }
}
