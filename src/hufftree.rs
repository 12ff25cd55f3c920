use std::fmt;

use tracing::{debug, trace};

use crate::bit_path::BitPath;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::{MinHeap, Weighted};
use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: Symbol,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// `a` was extracted first and becomes the '0' branch.
    pub fn merge(a: Self, b: Self) -> Self {
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }
}

impl Weighted for HuffNode {
    fn weight(&self) -> u64 {
        HuffNode::weight(self)
    }
}

/// A code tree built from symbol frequencies. Every internal node has two
/// children, so the leaf paths form a prefix-free code.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    /// Builds the tree for `frequencies`. Leaves enter the heap ordered by
    /// (weight, symbol bytes); each round merges the two lightest nodes with
    /// the first one extracted on the left.
    pub fn from_frequencies(frequencies: FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        let mut heap = MinHeap::new();
        for (symbol, count) in frequencies.into_sorted() {
            heap.insert(HuffNode::leaf(symbol, count))?;
        }
        HuffmanTree::build_from_heap(heap)
    }

    fn build_from_heap(mut heap: MinHeap<HuffNode>) -> Result<Self> {
        while heap.heap_size() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;
            trace!(left = x.weight(), right = y.weight(), "merge");
            heap.insert(HuffNode::merge(x, y))?;
        }
        let root = heap.extract_min()?;

        let tree = HuffmanTree { root };
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            weight = tree.root.weight(),
            "built huffman tree"
        );
        Ok(tree)
    }

    /// Every leaf with its bit path, in pre-order with the right ('1')
    /// branch visited before the left one.
    ///
    /// A tree that is a single leaf has no branches to walk; that symbol is
    /// given the one-bit path `"0"` so the bitstream stays well defined.
    pub fn paths(&self) -> Vec<(&Symbol, BitPath)> {
        let mut out = Vec::new();
        if let HuffNode::Leaf { symbol, .. } = &self.root {
            out.push((symbol, BitPath::new().child(false)));
            return out;
        }

        let mut stack = vec![(&self.root, BitPath::new())];
        while let Some((node, path)) = stack.pop() {
            match node {
                HuffNode::Leaf { symbol, .. } => out.push((symbol, path)),
                HuffNode::Internal { left, right, .. } => {
                    // popped in reverse: right first
                    stack.push((&**left, path.child(false)));
                    stack.push((&**right, path.child(true)));
                }
            }
        }
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.fold(|_| 1, |l, r| l + r)
    }

    pub fn internal_count(&self) -> usize {
        self.fold(|_| 0, |l, r| l + r + 1)
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.fold(|_| 0, |l, r| l.max(r) + 1)
    }

    /// Mean code length in bits, weighted by symbol frequency.
    pub fn average_code_length(&self) -> f64 {
        let total = self.root.weight();
        if total == 0 {
            return 0.0;
        }
        let weighted: u64 = self
            .paths_with_weights()
            .map(|(weight, len)| weight * len as u64)
            .sum();
        weighted as f64 / total as f64
    }

    fn paths_with_weights(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        let mut stack = vec![(&self.root, 0usize)];
        std::iter::from_fn(move || loop {
            let (node, depth) = stack.pop()?;
            match node {
                HuffNode::Leaf { weight, .. } => return Some((*weight, depth.max(1))),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((&**left, depth + 1));
                    stack.push((&**right, depth + 1));
                }
            }
        })
    }

    fn fold<F, G>(&self, on_leaf: F, on_internal: G) -> usize
    where
        F: Fn(&HuffNode) -> usize,
        G: Fn(usize, usize) -> usize,
    {
        fn go<F, G>(node: &HuffNode, on_leaf: &F, on_internal: &G) -> usize
        where
            F: Fn(&HuffNode) -> usize,
            G: Fn(usize, usize) -> usize,
        {
            match node {
                HuffNode::Leaf { .. } => on_leaf(node),
                HuffNode::Internal { left, right, .. } => {
                    on_internal(go(left, on_leaf, on_internal), go(right, on_leaf, on_internal))
                }
            }
        }
        go(&self.root, &on_leaf, &on_internal)
    }

    fn fmt_node(f: &mut fmt::Formatter<'_>, node: &HuffNode, depth: usize, label: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match node {
            HuffNode::Leaf { symbol, weight } => {
                writeln!(f, "{}{}-> Leaf: {} [weight: {}]", indent, label, symbol, weight)
            }
            HuffNode::Internal { weight, left, right } => {
                writeln!(f, "{}{}-> Internal [weight: {}]", indent, label, weight)?;
                Self::fmt_node(f, left, depth + 1, "0")?;
                Self::fmt_node(f, right, depth + 1, "1")
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::fmt_node(f, &self.root, 0, "root")
    }
}

impl TryFrom<&str> for HuffmanTree {
    type Error = HuffmanError;

    fn try_from(text: &str) -> Result<Self> {
        let mut table = FrequencyTable::new();
        table.add_bytes(text.as_bytes());
        HuffmanTree::from_frequencies(table)
    }
}
