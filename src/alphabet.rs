/// The unknown base. Matches any symbol in wildcard comparisons.
pub const WILDCARD: u8 = b'N';

/// The fixed alphabet of [`crate::trie::child_map::AlphabetMap`], in slot order.
pub const ACGTN: [u8; 5] = *b"ACGTN";

/// Slot of `symbol` in [`ACGTN`], or `None` if it is not part of that alphabet.
pub fn acgtn_index(symbol: u8) -> Option<usize> {
    match symbol {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        b'N' => Some(4),
        _ => None,
    }
}

/// Two symbols wildcard-match if they are equal or either of them is [`WILDCARD`].
#[inline]
pub fn symbols_match(a: u8, b: u8) -> bool {
    a == b || a == WILDCARD || b == WILDCARD
}

pub fn count_wildcards(sequence: &[u8]) -> usize {
    sequence.iter().filter(|&&symbol| symbol == WILDCARD).count()
}
