//! Prefix tree over symbol sequences with wildcard-tolerant search.
//!
//! A sequence is stored as a path from the root to a terminal node. Besides exact lookups,
//! the trie answers whether any stored sequence of the same length *wildcard-matches* a
//! query, i.e. agrees with it at every position where neither side is `N`.
//!
//! Because `N` may appear both in the query and in stored sequences, the search fans out
//! into several children at every such position. Its worst case is exponential in the
//! number of `N`s.

use child_map::{AlphabetMap, ChildMap, OrderedMap};

use crate::alphabet::symbols_match;

pub mod child_map;

/// Selects the child map backing a [`TrieNode`].
pub trait MapKind {
    type Map<V>: ChildMap<V>;
}

/// Children stored in an [`AlphabetMap`]. Only the symbols `ACGTN` may be used.
#[derive(Debug, Clone, Copy)]
pub struct Acgtn;

/// Children stored in an [`OrderedMap`]. Any byte may be used as a symbol.
#[derive(Debug, Clone, Copy)]
pub struct AnySymbol;

impl MapKind for Acgtn {
    type Map<V> = AlphabetMap<V>;
}

impl MapKind for AnySymbol {
    type Map<V> = OrderedMap<V>;
}

pub struct TrieNode<Kind: MapKind> {
    children: Kind::Map<Box<TrieNode<Kind>>>,
    terminal: bool,
}

/// Trie over the `ACGTN` alphabet.
pub type WildcardTrieNode = TrieNode<Acgtn>;

/// Trie over an arbitrary byte alphabet.
pub type GenericTrieNode = TrieNode<AnySymbol>;

impl<Kind: MapKind> Default for TrieNode<Kind> {
    fn default() -> Self {
        Self {
            children: Default::default(),
            terminal: false,
        }
    }
}

impl<Kind: MapKind> TrieNode<Kind> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sequence: &[u8]) {
        let mut node = self;
        for &symbol in sequence {
            node = &mut **node
                .children
                .get_or_insert_with(symbol, || Box::new(Self::new()));
        }
        node.terminal = true;
    }

    /// Returns true if exactly `sequence` is stored. `N` is treated as a literal symbol.
    pub fn exact_match(&self, sequence: &[u8]) -> bool {
        let mut node = self;
        for &symbol in sequence {
            match node.children.get(symbol) {
                Some(child) => node = &**child,
                None => return false,
            }
        }
        node.terminal
    }

    /// Returns true if some stored sequence wildcard-matches `sequence`.
    pub fn wildcard_search(&self, sequence: &[u8]) -> bool {
        self.wildcard_search_with_traceback(sequence).is_some()
    }

    /// Like [`Self::wildcard_search`], but returns the stored sequence that matched.
    ///
    /// If several stored sequences match, the first one in child enumeration order is
    /// returned.
    pub fn wildcard_search_with_traceback(&self, sequence: &[u8]) -> Option<Vec<u8>> {
        if sequence.is_empty() {
            return self.terminal.then(Vec::new);
        }

        // One pending iterator over children per depth. `path` holds the symbols of the
        // children entered above the deepest iterator.
        let mut path = Vec::with_capacity(sequence.len());
        let mut stack = vec![self.children.entries()];
        while let Some(depth) = stack.len().checked_sub(1) {
            let query = sequence[depth];
            match stack[depth].find(|&(symbol, _)| symbols_match(query, symbol)) {
                Some((symbol, child)) if depth + 1 == sequence.len() => {
                    if child.terminal {
                        path.push(symbol);
                        return Some(path);
                    }
                }
                Some((symbol, child)) => {
                    path.push(symbol);
                    stack.push(child.children.entries());
                }
                None => {
                    stack.pop();
                    path.pop();
                }
            }
        }
        None
    }

    /// Removes the exact `sequence` and prunes the nodes only it was using.
    ///
    /// Returns false if the sequence was not stored.
    pub fn pop(&mut self, sequence: &[u8]) -> bool {
        // The deepest node on the path that must survive, besides the root.
        let mut cut = 0;
        let mut node = self as &Self;
        for (depth, &symbol) in sequence.iter().enumerate() {
            if node.terminal || node.children.len() > 1 {
                cut = depth;
            }
            match node.children.get(symbol) {
                Some(child) => node = &**child,
                None => return false,
            }
        }
        if !node.terminal {
            return false;
        }

        if sequence.is_empty() || !node.children.is_empty() {
            if let Some(node) = self.descend_mut(sequence) {
                node.terminal = false;
            }
        } else if let Some(node) = self.descend_mut(&sequence[..cut]) {
            node.children.remove(sequence[cut]);
        }
        true
    }

    fn descend_mut(&mut self, sequence: &[u8]) -> Option<&mut Self> {
        let mut node = self;
        for &symbol in sequence {
            node = &mut **node.children.get_mut(symbol)?;
        }
        Some(node)
    }

    /// Number of stored sequences.
    pub fn len(&self) -> usize {
        let mut result = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            result += usize::from(node.terminal);
            stack.extend(node.children.entries().map(|(_, child)| &**child));
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        !self.terminal && self.children.is_empty()
    }

    /// All stored sequences in depth-first child enumeration order.
    pub fn sequences(&self) -> Vec<Vec<u8>> {
        let mut result = Vec::new();
        if self.terminal {
            result.push(Vec::new());
        }

        let mut prefix = Vec::new();
        let mut stack = vec![self.children.entries()];
        while let Some(entries) = stack.last_mut() {
            match entries.next() {
                Some((symbol, child)) => {
                    prefix.push(symbol);
                    if child.terminal {
                        result.push(prefix.clone());
                    }
                    stack.push(child.children.entries());
                }
                None => {
                    stack.pop();
                    prefix.pop();
                }
            }
        }
        result
    }
}

/// Nodes are freed from an explicit stack, so long sequences cannot exhaust the call stack.
impl<Kind: MapKind> Drop for TrieNode<Kind> {
    fn drop(&mut self) {
        let mut stack: Vec<_> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

impl<Kind: MapKind, Sequence: AsRef<[u8]>> Extend<Sequence> for TrieNode<Kind> {
    fn extend<T: IntoIterator<Item = Sequence>>(&mut self, iter: T) {
        for sequence in iter {
            self.insert(sequence.as_ref());
        }
    }
}

impl<Kind: MapKind, Sequence: AsRef<[u8]>> FromIterator<Sequence> for TrieNode<Kind> {
    fn from_iter<T: IntoIterator<Item = Sequence>>(iter: T) -> Self {
        let mut result = Self::new();
        result.extend(iter);
        result
    }
}
