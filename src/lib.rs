//! Deduplication of sequencing reads where `N` matches any base.
//!
//! Two reads are duplicates if they have the same length and agree at every position where
//! neither of them has an `N`. [`dedup::uniq_and_sort`] prepares a read set, and
//! [`dedup::collapse`] keeps one representative per group of duplicates, preferring reads
//! with fewer `N`s.

pub mod alphabet;
pub mod choose_alphabet;
pub mod dedup;
pub mod error;
pub mod io;
pub mod record;
pub mod simulate;
pub mod trie;

pub use dedup::{collapse, uniq_and_sort, Strategy};
pub use error::{Error, Result};
pub use record::SequenceRecord;
pub use trie::{GenericTrieNode, WildcardTrieNode};
