//! Huffman tree construction
//!
//! The tree is an arena: every node lives in one `Vec` owned by
//! [`HuffmanTree`] and links (children and parent) are [`NodeId`] indices into
//! it. Nodes are created once during [`HuffmanTree::build`]; the only later
//! write is the labeling pass that records which child of its parent each
//! node is.
//!
//! # Tie-breaking
//!
//! Construction repeatedly extracts the two least nodes from a priority queue.
//! "Least" is the following total order, so the resulting codes are identical
//! on every run for the same frequency table:
//!
//! 1. lower weight is less;
//! 2. on equal weight, a leaf is less than an internal node;
//! 3. between two leaves, the lower symbol (by `Ord`) is less;
//! 4. between two internal nodes, the one created earlier is less.
//!
//! The first node extracted becomes the zero-child of the new internal node
//! and the second becomes the one-child.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt::{self, Write as _};

use crate::entropy::frequency::FrequencyTable;
use crate::error::{HuffError, Result};

/// Stable index of a node inside a [`HuffmanTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the tree's arena
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Leaf or internal payload of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind<S> {
    /// A single alphabet symbol
    Leaf(S),
    /// Merge point with exactly two children
    Internal {
        /// Child reached by a `0` bit
        zero: NodeId,
        /// Child reached by a `1` bit
        one: NodeId,
    },
}

/// Node in the Huffman tree
#[derive(Debug, Clone)]
pub struct Node<S> {
    kind: NodeKind<S>,
    weight: u64,
    parent: Option<NodeId>,
    label: Option<bool>,
}

impl<S> Node<S> {
    fn leaf(symbol: S, weight: u64) -> Self {
        Self {
            kind: NodeKind::Leaf(symbol),
            weight,
            parent: None,
            label: None,
        }
    }

    /// Leaf or internal payload
    pub fn kind(&self) -> &NodeKind<S> {
        &self.kind
    }

    /// Own count for a leaf, sum of the children's weights otherwise
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Parent link, `None` only for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Which child of its parent this node is; `None` for the root
    pub fn label(&self) -> Option<bool> {
        self.label
    }

    /// True for leaves
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Symbol carried by a leaf
    pub fn symbol(&self) -> Option<&S> {
        match &self.kind {
            NodeKind::Leaf(symbol) => Some(symbol),
            NodeKind::Internal { .. } => None,
        }
    }

    /// `(zero, one)` children of an internal node
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Internal { zero, one } => Some((zero, one)),
        }
    }
}

/// Tie-break class of a queued node.
///
/// Leaves are pushed in ascending symbol order, so comparing leaf ids is the
/// same as comparing their symbols. Internal ids grow in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rank {
    Leaf(NodeId),
    Internal(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    weight: u64,
    rank: Rank,
}

impl QueueEntry {
    fn id(&self) -> NodeId {
        match self.rank {
            Rank::Leaf(id) | Rank::Internal(id) => id,
        }
    }
}

/// Total order used by the priority queue; `Less` is extracted first.
fn compare_entries(a: &QueueEntry, b: &QueueEntry) -> Ordering {
    a.weight.cmp(&b.weight).then_with(|| match (a.rank, b.rank) {
        (Rank::Leaf(x), Rank::Leaf(y)) => x.cmp(&y),
        (Rank::Leaf(_), Rank::Internal(_)) => Ordering::Less,
        (Rank::Internal(_), Rank::Leaf(_)) => Ordering::Greater,
        (Rank::Internal(x), Rank::Internal(y)) => x.cmp(&y),
    })
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_entries(self, other)
    }
}

/// Huffman tree over symbols of type `S`
#[derive(Debug, Clone)]
pub struct HuffmanTree<S> {
    nodes: Vec<Node<S>>,
    root: NodeId,
    leaf_count: usize,
}

impl<S: Ord + Clone> HuffmanTree<S> {
    /// Build the tree for a frequency table
    ///
    /// A table with a single symbol yields a tree whose only node is a leaf
    /// acting as root. An empty table is rejected with
    /// [`HuffError::InvalidInput`]: no code exists for zero symbols.
    pub fn build(frequencies: &FrequencyTable<S>) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HuffError::invalid_input(
                "cannot build a Huffman tree from an empty frequency table",
            ));
        }

        let leaf_count = frequencies.len();
        let mut nodes: Vec<Node<S>> = Vec::with_capacity(2 * leaf_count - 1);
        let mut heap = BinaryHeap::with_capacity(leaf_count);

        for (symbol, &count) in frequencies {
            let id = NodeId(nodes.len());
            nodes.push(Node::leaf(symbol.clone(), count));
            heap.push(Reverse(QueueEntry {
                weight: count,
                rank: Rank::Leaf(id),
            }));
        }

        let root = loop {
            let Some(Reverse(zero)) = heap.pop() else {
                return Err(HuffError::invalid_input(
                    "priority queue drained before a root was found",
                ));
            };
            let Some(Reverse(one)) = heap.pop() else {
                break zero.id();
            };

            let weight = zero.weight.checked_add(one.weight).ok_or_else(|| {
                HuffError::invalid_input("combined node weight overflows u64")
            })?;

            let id = NodeId(nodes.len());
            nodes.push(Node {
                kind: NodeKind::Internal {
                    zero: zero.id(),
                    one: one.id(),
                },
                weight,
                parent: None,
                label: None,
            });
            nodes[zero.id().0].parent = Some(id);
            nodes[one.id().0].parent = Some(id);

            log::trace!(
                "merged nodes {} ({}) and {} ({}) into {} ({})",
                zero.id().0,
                zero.weight,
                one.id().0,
                one.weight,
                id.0,
                weight
            );

            heap.push(Reverse(QueueEntry {
                weight,
                rank: Rank::Internal(id),
            }));
        };
        nodes[root.0].parent = None;

        let mut tree = Self {
            nodes,
            root,
            leaf_count,
        };
        tree.assign_labels();

        log::debug!(
            "Built Huffman tree: {} leaves, {} nodes, root weight {}",
            tree.leaf_count,
            tree.nodes.len(),
            tree.nodes[root.0].weight
        );
        Ok(tree)
    }
}

impl<S> HuffmanTree<S> {
    fn assign_labels(&mut self) {
        for i in 0..self.nodes.len() {
            if let Some((zero, one)) = self.nodes[i].children() {
                self.nodes[zero.0].label = Some(false);
                self.nodes[one.0].label = Some(true);
            }
        }
    }

    /// The unique node without a parent
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node by id
    ///
    /// Ids are only handed out by this tree, so lookups never fail for them.
    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    /// All nodes in creation order: leaves first, then internal nodes
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<S>)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Leaves with their symbols, in ascending symbol order
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &S)> + '_ {
        self.nodes()
            .filter_map(|(id, node)| node.symbol().map(|symbol| (id, symbol)))
    }

    /// Number of leaves, one per distinct symbol
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Weight of a node
    pub fn weight(&self, id: NodeId) -> u64 {
        self.nodes[id.0].weight
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Bit label of a node
    pub fn label(&self, id: NodeId) -> Option<bool> {
        self.nodes[id.0].label
    }

    /// Children of an internal node
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        self.nodes[id.0].children()
    }

    /// Whether a node is a leaf
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].is_leaf()
    }

    /// Symbol of a leaf
    pub fn symbol(&self, id: NodeId) -> Option<&S> {
        self.nodes[id.0].symbol()
    }

    /// Ancestors of `id`, nearest first, ending with the root
    pub fn path_to_root(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Labels collected walking from `id` up to the root (leaf-first order)
    pub fn labels_to_root(&self, id: NodeId) -> impl Iterator<Item = bool> + '_ {
        std::iter::successors(Some(id), move |&n| self.parent(n))
            .filter_map(move |n| self.label(n))
    }

    /// Number of edges between `id` and the root
    pub fn depth(&self, id: NodeId) -> usize {
        self.path_to_root(id).count()
    }
}

impl<S: fmt::Display> HuffmanTree<S> {
    /// Pre-order dump, one `symbol : weight : label` line per node
    ///
    /// Internal nodes print `*` as symbol and the root prints `-` as label.
    pub fn render_dfs(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            let label = match node.label {
                Some(false) => "0",
                Some(true) => "1",
                None => "-",
            };
            let indent = "  ".repeat(depth);
            // writing into a String cannot fail
            let _ = match &node.kind {
                NodeKind::Leaf(symbol) => {
                    writeln!(out, "{}{} : {} : {}", indent, symbol, node.weight, label)
                }
                NodeKind::Internal { zero, one } => {
                    stack.push((*one, depth + 1));
                    stack.push((*zero, depth + 1));
                    writeln!(out, "{}* : {} : {}", indent, node.weight, label)
                }
            };
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(text: &str) -> HuffmanTree<char> {
        HuffmanTree::build(&FrequencyTable::from_symbols(text.chars())).unwrap()
    }

    fn leaf_id<S: PartialEq>(tree: &HuffmanTree<S>, symbol: &S) -> NodeId {
        tree.leaves()
            .find(|(_, s)| *s == symbol)
            .map(|(id, _)| id)
            .unwrap()
    }

    #[test]
    fn test_empty_table_rejected() {
        let empty = FrequencyTable::<char>::from_symbols(std::iter::empty());
        let err = HuffmanTree::build(&empty).unwrap_err();
        assert!(matches!(err, HuffError::InvalidInput { .. }));
    }

    #[test]
    fn test_single_symbol_tree() {
        let tree = tree_of("zzzz");
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaf_count(), 1);
        assert!(tree.is_leaf(tree.root()));
        assert_eq!(tree.symbol(tree.root()), Some(&'z'));
        assert_eq!(tree.weight(tree.root()), 4);
        assert_eq!(tree.parent(tree.root()), None);
        assert_eq!(tree.label(tree.root()), None);
    }

    #[test]
    fn test_aaabbc_shape() {
        let tree = tree_of("aaabbc");
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.weight(tree.root()), 6);

        // c(1) and b(2) merge first; the weight-3 leaf `a` beats that
        // weight-3 internal node on the tie and becomes the zero-child
        let (zero, one) = tree.children(tree.root()).unwrap();
        assert_eq!(tree.symbol(zero), Some(&'a'));
        assert_eq!(tree.weight(one), 3);

        let (c, b) = tree.children(one).unwrap();
        assert_eq!(tree.symbol(c), Some(&'c'));
        assert_eq!(tree.symbol(b), Some(&'b'));

        assert_eq!(tree.depth(leaf_id(&tree, &'a')), 1);
        assert_eq!(tree.depth(leaf_id(&tree, &'c')), 2);
    }

    #[test]
    fn test_leaf_ties_broken_by_symbol() {
        let tree = tree_of("dcba");
        let (zero, one) = tree.children(tree.root()).unwrap();
        // a,b merge first (internal #4), then c,d (#5); #4 is older
        let (a, b) = tree.children(zero).unwrap();
        let (c, d) = tree.children(one).unwrap();
        assert_eq!(tree.symbol(a), Some(&'a'));
        assert_eq!(tree.symbol(b), Some(&'b'));
        assert_eq!(tree.symbol(c), Some(&'c'));
        assert_eq!(tree.symbol(d), Some(&'d'));
    }

    #[test]
    fn test_weight_invariant_and_labels() {
        let tree = tree_of("the quick brown fox jumps over the lazy dog");
        for (id, node) in tree.nodes() {
            if let Some((zero, one)) = node.children() {
                assert_eq!(node.weight(), tree.weight(zero) + tree.weight(one));
                assert_eq!(tree.parent(zero), Some(id));
                assert_eq!(tree.parent(one), Some(id));
                assert_eq!(tree.label(zero), Some(false));
                assert_eq!(tree.label(one), Some(true));
            }
        }
        let roots: Vec<_> = tree.nodes().filter(|(_, n)| n.parent().is_none()).collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].0, tree.root());
        assert_eq!(tree.node_count(), 2 * tree.leaf_count() - 1);
    }

    #[test]
    fn test_arena_layout() {
        let tree = tree_of("aaabbc");
        // leaves occupy the first slots in ascending symbol order
        for (expected, (id, symbol)) in ['a', 'b', 'c'].iter().zip(tree.leaves()) {
            assert_eq!(symbol, expected);
            assert!(matches!(tree.node(id).kind(), NodeKind::Leaf(s) if s == expected));
        }
        let indices: Vec<usize> = tree.leaves().map(|(id, _)| id.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        // the root is the last node created
        assert_eq!(tree.root().index(), tree.node_count() - 1);
        match tree.node(tree.root()).kind() {
            NodeKind::Internal { zero, one } => {
                assert_eq!(tree.symbol(*zero), Some(&'a'));
                assert!(zero.index() < one.index());
            }
            NodeKind::Leaf(_) => panic!("root of a three-symbol tree must be internal"),
        }
    }

    #[test]
    fn test_extreme_weights() {
        let freq = FrequencyTable::from_counts([(1u8, u64::MAX - 1), (2u8, 1)]).unwrap();
        let tree = HuffmanTree::build(&freq).unwrap();
        assert_eq!(tree.weight(tree.root()), u64::MAX);
    }

    #[test]
    fn test_labels_to_root() {
        let tree = tree_of("aaabbc");
        let b = leaf_id(&tree, &'b');
        let labels: Vec<bool> = tree.labels_to_root(b).collect();
        assert_eq!(labels, vec![true, true]);
        assert_eq!(tree.path_to_root(b).last(), Some(tree.root()));
    }

    #[test]
    fn test_render_dfs() {
        let tree = tree_of("aaabbc");
        let dump = tree.render_dfs();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(
            lines,
            vec![
                "* : 6 : -",
                "  a : 3 : 0",
                "  * : 3 : 1",
                "    c : 1 : 0",
                "    b : 2 : 1",
            ]
        );
    }

    #[test]
    fn test_deterministic_across_builds() {
        let freq = FrequencyTable::from_symbols("abracadabra alakazam".chars());
        let first = HuffmanTree::build(&freq).unwrap().render_dfs();
        for _ in 0..10 {
            assert_eq!(HuffmanTree::build(&freq).unwrap().render_dfs(), first);
        }
    }
}
