use crate::{
    alphabet::acgtn_index,
    trie::{Acgtn, AnySymbol, MapKind},
};

/// The child map a trie is instantiated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieAlphabet {
    Acgtn,
    AnySymbol,
}

impl TrieAlphabet {
    /// The fixed `ACGTN` alphabet if all sequences fit into it, otherwise any symbol.
    pub fn detect<'sequence>(sequences: impl IntoIterator<Item = &'sequence [u8]>) -> Self {
        if sequences
            .into_iter()
            .flatten()
            .all(|&symbol| acgtn_index(symbol).is_some())
        {
            Self::Acgtn
        } else {
            Self::AnySymbol
        }
    }
}

pub fn call<Function: ChooseAlphabet>(
    alphabet: TrieAlphabet,
    arguments: Function::Arguments,
) -> Function::Return {
    match alphabet {
        TrieAlphabet::Acgtn => Function::call::<Acgtn>(arguments),
        TrieAlphabet::AnySymbol => Function::call::<AnySymbol>(arguments),
    }
}

/// A computation that is generic over the child map of a trie.
pub trait ChooseAlphabet {
    type Arguments;
    type Return;

    fn call<Kind: 'static + MapKind>(arguments: Self::Arguments) -> Self::Return;
}
