//! Explicit state threaded through the recursive encode and decode walks.
use progtree::GrammarAdapter;

use crate::{
    registry::TypeLibrary,
    utils::{
        conf::CodecConfig,
        error::{CodecError, CodecResult},
        path::NodePath,
    },
};

/// Read-only state of an encode walk.
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'a> {
    pub config: &'a CodecConfig,
}

/// Read-only state of a decode walk.
///
/// The grammar is optional so that bare value fragments can be decoded without one;
/// only nested program trees need it.
#[derive(Clone, Copy)]
pub struct DecodeContext<'a> {
    pub grammar: Option<&'a dyn GrammarAdapter>,
    pub library: &'a TypeLibrary,
}

impl<'a> DecodeContext<'a> {
    pub fn new(grammar: Option<&'a dyn GrammarAdapter>, library: &'a TypeLibrary) -> Self {
        Self { grammar, library }
    }

    /// The grammar of this walk, or [`CodecError::MissingGrammarContext`] at `path`.
    pub fn grammar(&self, path: &NodePath) -> CodecResult<&'a dyn GrammarAdapter> {
        self.grammar.ok_or_else(|| CodecError::MissingGrammarContext { path: path.clone() })
    }
}

impl std::fmt::Debug for DecodeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeContext")
            .field("grammar", &self.grammar.map(|g| g.name()))
            .field("library", self.library)
            .finish()
    }
}
