//! Bidirectional codec between [`progtree`] program trees and portable document trees.
//!
//! [`Codec::encode`] walks a program tree and produces a [`DocumentNode`] whose tags
//! are `NonterminalNode`, `LiteralNode` and `VariableNode`; literal payloads become
//! typed value fragments. [`Codec::decode`] reverses the walk, resolving rules and
//! symbols through a [`GrammarAdapter`](progtree::GrammarAdapter). Value types outside
//! the built-in set take part by implementing
//! [`SerializableType`](progtree::SerializableType) and registering a factory, see
//! [`registry`].
//!
//! [`xml`] turns documents into text for storage.

pub mod codec;
pub mod context;
pub mod deserializer;
pub mod magic;
pub mod registry;
pub mod serializer;
pub mod utils;
pub mod value;
pub mod xml;

pub use codec::{Codec, SharedGrammar};
pub use progtree::DocumentNode;
pub use registry::{DecodeFactory, TypeLibrary};
pub use utils::{
    conf::{CodecConfig, ListElementPolicy},
    error::{CodecError, CodecResult, ResolutionTarget},
    path::NodePath,
};

pub extern crate inventory;
pub extern crate progtree;
