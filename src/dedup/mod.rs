//! Greedy wildcard-tolerant deduplication.
//!
//! Reads are first made unique by exact sequence, filtered by their number of `N`s and
//! ordered by it ([`uniq_and_sort`]). Then [`collapse`] walks the ordered reads and keeps
//! each read that does not wildcard-match any read kept before it.
//!
//! Wildcard matching is not transitive, so the kept set depends on the order of the input.
//! Sorting by ascending `N` count, stable for ties, makes the most informative read of a
//! cluster win deterministically.

use std::{collections::HashSet, fmt::Display, time::Instant};

use log::{debug, info, log_enabled, trace, warn, Level};

use crate::{
    choose_alphabet::{self, ChooseAlphabet, TrieAlphabet},
    record::SequenceRecord,
    trie::{MapKind, TrieNode},
};

pub use pairwise::{check_seq_equal, collapse_pairwise};

mod pairwise;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Trie,
    Pairwise,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Trie => write!(f, "trie"),
            Strategy::Pairwise => write!(f, "pairwise"),
        }
    }
}

/// Drops exact duplicate sequences and reads with more than `max_missing` `N`s, then
/// orders the remaining reads by ascending `N` count.
///
/// The first occurrence of each sequence survives and ties keep their input order. If
/// `assume_sorted` is set, the input is expected to be ordered by `N` count already. This
/// is verified, and if it does not hold, a warning is logged and the reads get sorted anyway.
pub fn uniq_and_sort(
    records: Vec<SequenceRecord>,
    mut assume_sorted: bool,
    max_missing: usize,
) -> Vec<SequenceRecord> {
    let start = Instant::now();
    info!("Number of reads (raw) = {}", records.len());

    let mut seen = HashSet::with_capacity(records.len());
    let first_occurrence: Vec<bool> = records
        .iter()
        .map(|record| seen.insert(record.sequence.as_slice()))
        .collect();
    drop(seen);

    let mut previous_n_count = 0;
    let mut unique: Vec<(usize, SequenceRecord)> = Vec::new();
    for (record, _) in records
        .into_iter()
        .zip(first_occurrence)
        .filter(|(_, first)| *first)
    {
        let n_count = record.n_count();
        if assume_sorted {
            if n_count < previous_n_count {
                warn!(
                    "Read {:?} has {n_count} Ns, fewer than an earlier read with {previous_n_count}, so the input is not sorted by N count; sorting it instead",
                    record.id
                );
                assume_sorted = false;
            } else {
                previous_n_count = n_count;
            }
        }

        if n_count <= max_missing {
            unique.push((n_count, record));
        }
    }
    info!(
        "Number of reads (unique, at most {max_missing} Ns) = {} ({:.2?})",
        unique.len(),
        start.elapsed()
    );

    if !assume_sorted {
        let start = Instant::now();
        unique.sort_by_key(|(n_count, _)| *n_count);
        debug!("Sorted reads by N count ({:.2?})", start.elapsed());
    }

    unique.into_iter().map(|(_, record)| record).collect()
}

/// Keeps each read that does not wildcard-match any read kept before it.
///
/// Both strategies produce the same result. The trie uses the fixed `ACGTN` child map if
/// all sequences fit into it, and a map over arbitrary symbols otherwise.
pub fn collapse(records: Vec<SequenceRecord>, strategy: Strategy) -> Vec<SequenceRecord> {
    let start = Instant::now();
    let kept = match strategy {
        Strategy::Trie => {
            let alphabet =
                TrieAlphabet::detect(records.iter().map(|record| record.sequence.as_slice()));
            debug!("Using trie alphabet {alphabet:?}");
            choose_alphabet::call::<CollapseTrie>(alphabet, records)
        }
        Strategy::Pairwise => collapse_pairwise(records),
    };
    info!(
        "Number of reads (after {strategy} dedup) = {} ({:.2?})",
        kept.len(),
        start.elapsed()
    );
    kept
}

struct CollapseTrie;

impl ChooseAlphabet for CollapseTrie {
    type Arguments = Vec<SequenceRecord>;
    type Return = Vec<SequenceRecord>;

    fn call<Kind: 'static + MapKind>(records: Self::Arguments) -> Self::Return {
        collapse_trie::<Kind>(records)
    }
}

/// Trie variant of [`collapse`] with an explicit child map.
pub fn collapse_trie<Kind: MapKind>(records: Vec<SequenceRecord>) -> Vec<SequenceRecord> {
    let mut trie = TrieNode::<Kind>::new();
    let mut kept = Vec::new();

    for record in records {
        if !trie.wildcard_search(&record.sequence) {
            trie.insert(&record.sequence);
            kept.push(record);
        } else if log_enabled!(Level::Trace) {
            if let Some(matched) = trie.wildcard_search_with_traceback(&record.sequence) {
                trace!(
                    "Dropping read {:?} ({}), it matches the kept sequence {}",
                    record.id,
                    String::from_utf8_lossy(&record.sequence),
                    String::from_utf8_lossy(&matched)
                );
            }
        }
    }

    debug!("Trie holds {} sequences", trie.len());
    kept
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    use super::{collapse, collapse_trie, uniq_and_sort, Strategy};
    use crate::{record::SequenceRecord, trie::AnySymbol};

    fn records(sequences: &[&str]) -> Vec<SequenceRecord> {
        sequences
            .iter()
            .enumerate()
            .map(|(index, sequence)| SequenceRecord::new(format!("r{}", index + 1), *sequence))
            .collect()
    }

    fn ids(records: &[SequenceRecord]) -> Vec<&str> {
        records.iter().map(|record| record.id.as_str()).collect()
    }

    #[test]
    fn end_to_end() {
        let input = records(&["ACGT", "ACGN", "ACGG", "NNNN"]);

        let sorted = uniq_and_sort(input, false, 9999);
        assert_eq!(ids(&sorted), ["r1", "r3", "r2", "r4"]);

        let kept = collapse(sorted.clone(), Strategy::Trie);
        assert_eq!(ids(&kept), ["r1", "r3"]);
        assert_eq!(collapse(sorted, Strategy::Pairwise), kept);
    }

    #[test]
    fn exact_duplicates_keep_first_occurrence() {
        let input = records(&["ACGT", "TTTT", "ACGT", "TTTT", "NACG"]);
        let sorted = uniq_and_sort(input, false, 9999);
        assert_eq!(ids(&sorted), ["r1", "r2", "r5"]);
    }

    #[test]
    fn uniq_and_sort_is_idempotent() {
        let input = records(&["NNA", "ACG", "NCG", "ACG", "AAA", "NCG", "ANA"]);
        let once = uniq_and_sort(input, false, 9999);
        let twice = uniq_and_sort(once.clone(), false, 9999);
        assert_eq!(once, twice);
        let assumed = uniq_and_sort(once.clone(), true, 9999);
        assert_eq!(once, assumed);
    }

    #[test]
    fn n_count_is_non_decreasing() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let sequences: Vec<String> = (0..200)
            .map(|_| {
                (0..8)
                    .map(|_| char::from(b"ACGTN"[rng.gen_range(0..5)]))
                    .collect()
            })
            .collect();
        let input: Vec<SequenceRecord> = sequences
            .iter()
            .enumerate()
            .map(|(index, sequence)| SequenceRecord::new(index.to_string(), sequence.as_str()))
            .collect();

        let sorted = uniq_and_sort(input, false, 9999);
        assert!(sorted
            .windows(2)
            .all(|pair| pair[0].n_count() <= pair[1].n_count()));
    }

    #[test]
    fn max_missing_boundary() {
        let input = records(&["ANNA", "NNNA", "AAAA", "NANA"]);
        let sorted = uniq_and_sort(input, false, 2);
        assert_eq!(ids(&sorted), ["r3", "r1", "r4"]);

        let input = records(&["ANNA", "NNNA", "AAAA", "NANA"]);
        let sorted = uniq_and_sort(input, false, 0);
        assert_eq!(ids(&sorted), ["r3"]);
    }

    #[test]
    fn unsorted_input_despite_assumption_is_sorted() {
        let input = records(&["AAA", "NNA", "ACA", "NAA"]);
        let sorted = uniq_and_sort(input.clone(), true, 9999);
        assert_eq!(ids(&sorted), ["r1", "r3", "r4", "r2"]);
        assert_eq!(sorted, uniq_and_sort(input, false, 9999));
    }

    #[test]
    fn sorted_input_is_kept_in_order() {
        let input = records(&["CAA", "AAA", "NAA", "ANA", "NNN"]);
        let sorted = uniq_and_sort(input.clone(), true, 9999);
        assert_eq!(sorted, input);
    }

    #[test]
    fn order_sensitivity() {
        // AAN and ANA match each other, ANN matches both.
        let kept = collapse(records(&["AAN", "ANA", "ANN"]), Strategy::Trie);
        assert_eq!(ids(&kept), ["r1"]);

        // ACN and AGN do not match, ANN matches both, so only the first two survive.
        let kept = collapse(records(&["ACN", "AGN", "ANN"]), Strategy::Trie);
        assert_eq!(ids(&kept), ["r1", "r2"]);

        // Non-transitive: AC and AG both match AN, but not each other.
        let kept = collapse(records(&["AN", "AC", "AG"]), Strategy::Trie);
        assert_eq!(ids(&kept), ["r1"]);
        let kept = collapse(records(&["AC", "AG", "AN"]), Strategy::Trie);
        assert_eq!(ids(&kept), ["r1", "r2"]);
    }

    #[test]
    fn trivial_inputs() {
        assert!(collapse(Vec::new(), Strategy::Trie).is_empty());
        assert!(collapse(Vec::new(), Strategy::Pairwise).is_empty());
        assert!(uniq_and_sort(Vec::new(), true, 0).is_empty());

        let all_duplicates = uniq_and_sort(records(&["ACGT", "ACGT", "ACGT"]), false, 9999);
        assert_eq!(ids(&collapse(all_duplicates, Strategy::Trie)), ["r1"]);

        // NNN has fewer Ns than NNNN, so it is sorted first.
        let all_n = uniq_and_sort(records(&["NNNN", "NNN", "NNNN"]), false, 9999);
        assert_eq!(ids(&all_n), ["r2", "r1"]);
        assert_eq!(ids(&collapse(all_n, Strategy::Trie)), ["r2", "r1"]);
    }

    #[test]
    fn long_reads() {
        let complete = "A".repeat(300_000);
        let masked = format!("{}N", &complete[1..]);
        let kept = collapse(records(&[complete.as_str(), masked.as_str()]), Strategy::Trie);
        assert_eq!(ids(&kept), ["r1"]);
    }

    #[test]
    fn different_lengths_never_match() {
        let kept = collapse(records(&["ACG", "ACGT", "NNNNN", "AC"]), Strategy::Trie);
        assert_eq!(kept.len(), 4);
        let kept = collapse(records(&["ACG", "ACGT", "NNNNN", "AC"]), Strategy::Pairwise);
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn trie_and_pairwise_agree() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        for _ in 0..2000 {
            let input: Vec<SequenceRecord> = (0..rng.gen_range(0..=8))
                .map(|index| {
                    let length = rng.gen_range(0..=6);
                    let sequence: Vec<u8> =
                        (0..length).map(|_| b"ACGTN"[rng.gen_range(0..5)]).collect();
                    SequenceRecord::new(index.to_string(), sequence)
                })
                .collect();

            let trie = collapse(input.clone(), Strategy::Trie);
            let generic = collapse_trie::<AnySymbol>(input.clone());
            let pairwise = collapse(input, Strategy::Pairwise);
            assert_eq!(trie, pairwise);
            assert_eq!(generic, pairwise);
        }
    }

    #[test]
    fn symbols_outside_acgtn() {
        let input = records(&["ACGU", "ACGN", "RCGU", "NCGU"]);
        let kept = collapse(input.clone(), Strategy::Trie);
        assert_eq!(ids(&kept), ["r1", "r3"]);
        assert_eq!(kept, collapse(input, Strategy::Pairwise));
    }
}
