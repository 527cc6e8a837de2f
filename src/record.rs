use crate::alphabet::count_wildcards;

/// A read identifier with its sequence of uppercase symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub sequence: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    /// Number of `N`s in the sequence.
    pub fn n_count(&self) -> usize {
        count_wildcards(&self.sequence)
    }
}
