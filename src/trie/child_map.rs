//! Child storage for trie nodes.
//!
//! Both maps implement [`ChildMap`]. [`AlphabetMap`] is a fixed array with one slot per
//! symbol of `ACGTN`, [`OrderedMap`] accepts any byte and remembers keys in insertion
//! order, except that the wildcard is always enumerated last.

use std::collections::HashMap;

use crate::alphabet::{acgtn_index, ACGTN, WILDCARD};

/// A map from a single symbol to a value.
///
/// The enumeration order of [`ChildMap::entries`] decides the order in which a trie is
/// traversed, so implementations must keep it deterministic.
pub trait ChildMap<V>: Default {
    fn get(&self, symbol: u8) -> Option<&V>;

    fn get_mut(&mut self, symbol: u8) -> Option<&mut V>;

    /// Stores `value` under `symbol` and returns the value previously stored there.
    fn put(&mut self, symbol: u8, value: V) -> Option<V>;

    fn remove(&mut self, symbol: u8) -> Option<V>;

    /// The value under `symbol`, inserting the result of `default` first if there is none.
    fn get_or_insert_with(&mut self, symbol: u8, default: impl FnOnce() -> V) -> &mut V;

    /// Number of occupied keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries<'a>(&'a self) -> impl Iterator<Item = (u8, &'a V)>
    where
        V: 'a;

    /// Consumes the map, yielding its values in no particular order.
    fn into_values(self) -> impl Iterator<Item = V>;
}

/// Fixed-capacity map over the symbols `A`, `C`, `G`, `T` and `N`.
///
/// Entries are enumerated in that order.
///
/// # Panics
///
/// All keyed operations panic if the symbol is not one of `ACGTN`.
#[derive(Debug, Clone)]
pub struct AlphabetMap<V> {
    slots: [Option<V>; ACGTN.len()],
    len: usize,
}

fn slot(symbol: u8) -> usize {
    acgtn_index(symbol)
        .unwrap_or_else(|| panic!("symbol {:?} is not one of ACGTN", char::from(symbol)))
}

impl<V> Default for AlphabetMap<V> {
    fn default() -> Self {
        Self {
            slots: [None, None, None, None, None],
            len: 0,
        }
    }
}

impl<V> ChildMap<V> for AlphabetMap<V> {
    fn get(&self, symbol: u8) -> Option<&V> {
        self.slots[slot(symbol)].as_ref()
    }

    fn get_mut(&mut self, symbol: u8) -> Option<&mut V> {
        self.slots[slot(symbol)].as_mut()
    }

    fn put(&mut self, symbol: u8, value: V) -> Option<V> {
        let previous = self.slots[slot(symbol)].replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    fn remove(&mut self, symbol: u8) -> Option<V> {
        let previous = self.slots[slot(symbol)].take();
        if previous.is_some() {
            self.len -= 1;
        }
        previous
    }

    fn get_or_insert_with(&mut self, symbol: u8, default: impl FnOnce() -> V) -> &mut V {
        let entry = &mut self.slots[slot(symbol)];
        if entry.is_none() {
            self.len += 1;
        }
        entry.get_or_insert_with(default)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn entries<'a>(&'a self) -> impl Iterator<Item = (u8, &'a V)>
    where
        V: 'a,
    {
        self.slots
            .iter()
            .zip(ACGTN)
            .filter_map(|(value, symbol)| value.as_ref().map(|value| (symbol, value)))
    }

    fn into_values(self) -> impl Iterator<Item = V> {
        self.slots.into_iter().flatten()
    }
}

/// Map over an arbitrary byte alphabet.
///
/// Keys are enumerated in insertion order, with [`WILDCARD`] moved behind all others.
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    keys: Vec<u8>,
    values: HashMap<u8, V>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            values: HashMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    fn push_key(&mut self, symbol: u8) {
        if symbol != WILDCARD && self.keys.last() == Some(&WILDCARD) {
            self.keys.insert(self.keys.len() - 1, symbol);
        } else {
            self.keys.push(symbol);
        }
    }
}

impl<V> ChildMap<V> for OrderedMap<V> {
    fn get(&self, symbol: u8) -> Option<&V> {
        self.values.get(&symbol)
    }

    fn get_mut(&mut self, symbol: u8) -> Option<&mut V> {
        self.values.get_mut(&symbol)
    }

    fn put(&mut self, symbol: u8, value: V) -> Option<V> {
        let previous = self.values.insert(symbol, value);
        if previous.is_none() {
            self.push_key(symbol);
        }
        previous
    }

    fn remove(&mut self, symbol: u8) -> Option<V> {
        let previous = self.values.remove(&symbol);
        if previous.is_some() {
            self.keys.retain(|&key| key != symbol);
        }
        previous
    }

    fn get_or_insert_with(&mut self, symbol: u8, default: impl FnOnce() -> V) -> &mut V {
        if !self.values.contains_key(&symbol) {
            self.push_key(symbol);
        }
        self.values.entry(symbol).or_insert_with(default)
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn entries<'a>(&'a self) -> impl Iterator<Item = (u8, &'a V)>
    where
        V: 'a,
    {
        self.keys
            .iter()
            .filter_map(|symbol| self.values.get(symbol).map(|value| (*symbol, value)))
    }

    fn into_values(self) -> impl Iterator<Item = V> {
        self.values.into_values()
    }
}
