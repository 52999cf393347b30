// src/fuzzy/trie.rs
//
// Prefix index over names with exact and bounded edit-distance lookup.

use smallvec::SmallVec;

type NodeIdx = u32;

#[derive(Debug, Clone)]
struct TrieNode<V> {
    /// Sorted by character.
    children: SmallVec<[(char, NodeIdx); 4]>,
    values: SmallVec<[V; 1]>,
}

impl<V> TrieNode<V> {
    fn new() -> Self {
        Self {
            children: SmallVec::new(),
            values: SmallVec::new(),
        }
    }

    fn child(&self, c: char) -> Option<NodeIdx> {
        self.children
            .binary_search_by(|(k, _)| k.cmp(&c))
            .ok()
            .map(|i| self.children[i].1)
    }
}

/// Maps names to every value stored under them.
///
/// Nodes live in a flat arena; node 0 is the root.
#[derive(Debug, Clone)]
pub struct Trie<V> {
    nodes: Vec<TrieNode<V>>,
    len: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::new()],
            len: 0,
        }
    }
}

impl<V: Clone> Trie<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values (not distinct names).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, name: &str, value: V) {
        let mut node = 0usize;
        for c in name.chars() {
            node = match self.nodes[node].child(c) {
                Some(next) => next as usize,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::new());
                    let children = &mut self.nodes[node].children;
                    let at = children.partition_point(|(k, _)| *k < c);
                    children.insert(at, (c, next as NodeIdx));
                    next
                }
            };
        }
        self.nodes[node].values.push(value);
        self.len += 1;
    }

    /// Every value stored under exactly `name`.
    pub fn exact(&self, name: &str) -> &[V] {
        let mut node = 0usize;
        for c in name.chars() {
            match self.nodes[node].child(c) {
                Some(next) => node = next as usize,
                None => return &[],
            }
        }
        &self.nodes[node].values
    }

    /// Every `(distance, value)` whose name is within Levenshtein distance
    /// `max_distance` of `typed`.
    ///
    /// Walks the trie carrying one edit-distance row per prefix and abandons a
    /// branch as soon as no cell of its row is within range.
    pub fn within(&self, typed: &str, max_distance: usize) -> Vec<(usize, V)> {
        let target: SmallVec<[char; 32]> = typed.chars().collect();
        let n = target.len();
        let mut found = Vec::new();

        let root_row: Vec<usize> = (0..=n).collect();
        if root_row[n] <= max_distance {
            found.extend(self.nodes[0].values.iter().map(|v| (root_row[n], v.clone())));
        }

        let mut stack: Vec<(NodeIdx, Vec<usize>)> = vec![(0, root_row)];
        while let Some((node, row)) = stack.pop() {
            // Reverse so that siblings are visited in character order.
            for &(c, child) in self.nodes[node as usize].children.iter().rev() {
                let mut next = Vec::with_capacity(n + 1);
                next.push(row[0] + 1);
                for j in 1..=n {
                    let substitute = row[j - 1] + usize::from(target[j - 1] != c);
                    let delete = row[j] + 1;
                    let insert = next[j - 1] + 1;
                    next.push(substitute.min(delete).min(insert));
                }
                if next[n] <= max_distance {
                    let distance = next[n];
                    found.extend(
                        self.nodes[child as usize]
                            .values
                            .iter()
                            .map(|v| (distance, v.clone())),
                    );
                }
                if next.iter().min().is_some_and(|&m| m <= max_distance) {
                    stack.push((child, next));
                }
            }
        }
        found
    }
}

impl<V: Clone, S: AsRef<str>> FromIterator<(S, V)> for Trie<V> {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut trie = Trie::new();
        for (name, value) in iter {
            trie.insert(name.as_ref(), value);
        }
        trie
    }
}
