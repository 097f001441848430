//! Program trees for synthesized programs, the values they carry, and the portable
//! document nodes they are exchanged as.
//!
//! The crate is the data model shared by producers of programs (a synthesis engine),
//! consumers (an interpreter, see [`eval`]) and the `progser` codec:
//! - [`tree::ProgramTree`]: rule applications, literals and variables;
//! - [`value::DynamicValue`]: literal payloads, including user-defined
//!   [`value::OpaqueValue`]s;
//! - [`document::DocumentNode`]: tagged, attributed text trees;
//! - [`grammar::GrammarAdapter`]: resolution of rules and symbols by name.

pub mod document;
pub mod error;
pub mod eval;
pub mod grammar;
#[cfg(any(test, feature = "test-utils"))]
pub mod tests_utils;
pub mod tree;
pub mod value;

pub use document::DocumentNode;
pub use error::{BoxError, TreeError, TreeResult};
pub use eval::State;
pub use grammar::{Grammar, GrammarAdapter, Rule, Symbol, SymbolKind};
pub use tree::ProgramTree;
pub use value::{DynamicValue, OpaqueValue, Serializable, SerializableType};

pub extern crate bigdecimal;
