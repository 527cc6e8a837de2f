use log::{log_enabled, trace, Level};

use crate::{alphabet::symbols_match, record::SequenceRecord};

/// Returns true if both sequences have the same length and agree at every position where
/// neither of them is `N`.
pub fn check_seq_equal(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(&a, &b)| symbols_match(a, b))
}

/// Pairwise variant of [`super::collapse`].
///
/// Compares each read against all reads kept so far, which makes it quadratic in the
/// number of reads.
pub fn collapse_pairwise(records: Vec<SequenceRecord>) -> Vec<SequenceRecord> {
    let mut kept: Vec<SequenceRecord> = Vec::new();

    for record in records {
        match kept
            .iter()
            .find(|kept| check_seq_equal(&record.sequence, &kept.sequence))
        {
            Some(matched) => {
                if log_enabled!(Level::Trace) {
                    trace!(
                        "Dropping read {:?} ({}), it matches the kept read {:?}",
                        record.id,
                        String::from_utf8_lossy(&record.sequence),
                        matched.id
                    );
                }
            }
            None => kept.push(record),
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    use super::check_seq_equal;

    #[test]
    fn equality_with_wildcards() {
        assert!(check_seq_equal(b"", b""));
        assert!(check_seq_equal(b"ACGT", b"ACGT"));
        assert!(check_seq_equal(b"ACGT", b"ANGN"));
        assert!(check_seq_equal(b"NNNN", b"ACGT"));
        assert!(!check_seq_equal(b"ACGT", b"ACGA"));
        assert!(!check_seq_equal(b"ACGT", b"ACG"));
        assert!(!check_seq_equal(b"NNN", b"NNNN"));
    }

    #[test]
    fn symmetric() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        for _ in 0..1000 {
            let length = rng.gen_range(0..6);
            let a: Vec<u8> = (0..length).map(|_| b"ACGTN"[rng.gen_range(0..5)]).collect();
            let b: Vec<u8> = (0..length).map(|_| b"ACGTN"[rng.gen_range(0..5)]).collect();
            assert_eq!(check_seq_equal(&a, &b), check_seq_equal(&b, &a));
        }
    }
}
