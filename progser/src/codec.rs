use std::sync::Arc;

use log::{debug, warn};
use once_cell::sync::OnceCell;
use progtree::{DocumentNode, DynamicValue, GrammarAdapter, ProgramTree};

use crate::{
    context::{DecodeContext, EncodeContext},
    deserializer,
    magic::TAG_LITERAL,
    registry::TypeLibrary,
    serializer,
    utils::{conf::CodecConfig, error::CodecResult, path::NodePath},
    value,
    xml,
};

/// Grammar shared with a [`Codec`] through [`Codec::bind_grammar`].
pub type SharedGrammar = Arc<dyn GrammarAdapter + Send + Sync>;

/// Program-tree codec.
///
/// A codec owns the table of extensible types it can decode and its configuration.
/// Every decode entry point takes the grammar explicitly; for callers that work with
/// a single grammar, [`Codec::bind_grammar`] stores one for [`Codec::decode_bound`]
/// and [`Codec::decode_value`]. The binding is set once: later attempts are ignored.
#[derive(Default)]
pub struct Codec {
    library: TypeLibrary,
    config: CodecConfig,
    grammar: OnceCell<SharedGrammar>,
}

impl Codec {
    pub fn new(library: TypeLibrary, config: CodecConfig) -> Self {
        Self {
            library,
            config,
            grammar: OnceCell::new(),
        }
    }

    /// Codec with every type registered through
    /// [`register_serializable_type!`](crate::register_serializable_type) and the
    /// configuration found by [`CodecConfig::load`].
    pub fn from_environment() -> CodecResult<Self> {
        let library = TypeLibrary::from_inventory()?;
        let config = CodecConfig::load()?;
        Ok(Self::new(library, config))
    }

    pub fn library(&self) -> &TypeLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut TypeLibrary {
        &mut self.library
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Bind `grammar` for the decode calls that do not take one.
    ///
    /// Returns `false`, leaving the existing binding in place, if a grammar was
    /// already bound.
    pub fn bind_grammar(&self, grammar: SharedGrammar) -> bool {
        let name = grammar.name().to_string();
        match self.grammar.set(grammar) {
            Ok(()) => {
                debug!("Bound grammar '{}'", name);
                true
            }
            Err(_) => {
                warn!(
                    "Ignoring binding of grammar '{}': grammar '{}' is already bound",
                    name,
                    self.grammar.get().map(|g| g.name()).unwrap_or_default()
                );
                false
            }
        }
    }

    pub fn bound_grammar(&self) -> Option<&SharedGrammar> {
        self.grammar.get()
    }

    fn encode_context(&self) -> EncodeContext<'_> {
        EncodeContext {
            config: &self.config,
        }
    }

    fn bound_context(&self) -> DecodeContext<'_> {
        let grammar = self.grammar.get().map(|g| &**g as &dyn GrammarAdapter);
        DecodeContext::new(grammar, &self.library)
    }

    /// Encode `tree` as a document.
    pub fn encode(&self, tree: &ProgramTree) -> CodecResult<DocumentNode> {
        let doc = serializer::encode_node(&self.encode_context(), tree, &NodePath::root())?;
        debug!(
            "Encoded {} tree node(s) into {} document node(s)",
            tree.node_count(),
            doc.node_count()
        );
        Ok(doc)
    }

    /// Decode `doc`, resolving rules and symbols through `grammar`.
    pub fn decode(
        &self,
        doc: &DocumentNode,
        grammar: &dyn GrammarAdapter,
    ) -> CodecResult<ProgramTree> {
        let ctx = DecodeContext::new(Some(grammar), &self.library);
        let tree = deserializer::decode_node(&ctx, doc, &NodePath::root())?;
        debug!(
            "Decoded {} document node(s) with grammar '{}'",
            doc.node_count(),
            grammar.name()
        );
        Ok(tree)
    }

    /// Decode `doc` with the bound grammar.
    ///
    /// Fails with [`CodecError::MissingGrammarContext`] if none is bound.
    ///
    /// [`CodecError::MissingGrammarContext`]: crate::utils::error::CodecError::MissingGrammarContext
    pub fn decode_bound(&self, doc: &DocumentNode) -> CodecResult<ProgramTree> {
        deserializer::decode_node(&self.bound_context(), doc, &NodePath::root())
    }

    /// Encode a bare value into a standalone `LiteralNode` fragment without a symbol.
    pub fn encode_value(&self, value: &DynamicValue) -> CodecResult<DocumentNode> {
        let mut node = DocumentNode::new(TAG_LITERAL);
        value::encode_value(&self.encode_context(), value, &mut node, &NodePath::root())?;
        Ok(node)
    }

    /// Decode a value fragment. Nested programs use the bound grammar, if any.
    pub fn decode_value(&self, doc: &DocumentNode) -> CodecResult<DynamicValue> {
        value::decode_value(&self.bound_context(), doc, &NodePath::root())
    }

    /// Decode a value fragment, resolving nested programs through `grammar`.
    pub fn decode_value_with(
        &self,
        doc: &DocumentNode,
        grammar: &dyn GrammarAdapter,
    ) -> CodecResult<DynamicValue> {
        let ctx = DecodeContext::new(Some(grammar), &self.library);
        value::decode_value(&ctx, doc, &NodePath::root())
    }

    /// Encode `tree` and render it as XML using the codec's `[xml]` settings.
    pub fn to_xml(&self, tree: &ProgramTree) -> CodecResult<String> {
        xml::to_string(&self.encode(tree)?, &self.config.xml)
    }

    /// Parse XML produced by [`Codec::to_xml`] and decode it with `grammar`.
    pub fn from_xml(&self, text: &str, grammar: &dyn GrammarAdapter) -> CodecResult<ProgramTree> {
        self.decode(&xml::from_str(text)?, grammar)
    }
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("library", &self.library)
            .field("config", &self.config)
            .field("grammar", &self.grammar.get().map(|g| g.name()))
            .finish()
    }
}
