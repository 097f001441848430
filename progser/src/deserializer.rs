//! Tree Deserializer: document trees back to program trees.
use std::sync::Arc;

use log::trace;
use progtree::{
    DocumentNode, GrammarAdapter, ProgramTree, Symbol,
    tree::{Literal, Variable},
};

use crate::{
    context::DecodeContext,
    magic::{
        ATTR_RULE, ATTR_SYMBOL, TAG_HOLE, TAG_LAMBDA, TAG_LET, TAG_LITERAL, TAG_NONTERMINAL,
        TAG_TERMINAL, TAG_VARIABLE,
    },
    utils::{
        error::{CodecError, CodecResult, ResolutionTarget},
        path::NodePath,
    },
    value,
};

/// Decode `doc` using the grammar of `ctx`.
///
/// Fails with [`CodecError::MissingGrammarContext`] if `ctx` carries no grammar.
pub fn decode_node(
    ctx: &DecodeContext<'_>,
    doc: &DocumentNode,
    path: &NodePath,
) -> CodecResult<ProgramTree> {
    let grammar = ctx.grammar(path)?;
    decode_node_with(ctx, grammar, doc, path)
}

/// Decode `doc`, resolving rules and symbols through `grammar`.
pub fn decode_node_with(
    ctx: &DecodeContext<'_>,
    grammar: &dyn GrammarAdapter,
    doc: &DocumentNode,
    path: &NodePath,
) -> CodecResult<ProgramTree> {
    match doc.tag() {
        TAG_NONTERMINAL => {
            let name = doc.attribute(ATTR_RULE);
            let path = path.node(TAG_NONTERMINAL, name);
            trace!("Decoding {}", path);

            let rule = name
                .and_then(|name| grammar.resolve_rule(name))
                .ok_or_else(|| CodecError::TypeResolution {
                    target: ResolutionTarget::Rule,
                    name: name.map(str::to_string),
                    path: path.clone(),
                })?;

            let mut children = Vec::with_capacity(doc.child_count());
            for (index, child) in doc.children().iter().enumerate() {
                children.push(decode_node_with(ctx, grammar, child, &path.child(index))?);
            }

            rule.construct(children)
                .map_err(|source| CodecError::RuleConstruction {
                    rule: rule.name.clone(),
                    path,
                    source,
                })
        }
        TAG_LITERAL => {
            let path = path.node(TAG_LITERAL, doc.attribute(ATTR_SYMBOL));
            trace!("Decoding {}", path);

            let symbol = resolve_symbol(grammar, doc, &path)?;
            let value = value::decode_value(ctx, doc, &path)?;
            Ok(ProgramTree::Literal(Literal { symbol, value }))
        }
        TAG_VARIABLE => {
            let path = path.node(TAG_VARIABLE, doc.attribute(ATTR_SYMBOL));
            trace!("Decoding {}", path);

            let symbol = resolve_symbol(grammar, doc, &path)?;
            Ok(ProgramTree::Variable(Variable { symbol }))
        }
        TAG_TERMINAL => Err(CodecError::Structural {
            kind: "Terminal".to_string(),
            reason: "abstract node cannot be deserialized",
            path: path.clone(),
        }),
        tag @ (TAG_HOLE | TAG_LAMBDA | TAG_LET) => Err(CodecError::Structural {
            kind: tag.to_string(),
            reason: "unsupported node kind",
            path: path.clone(),
        }),
        tag => Err(CodecError::UnknownTag {
            tag: tag.to_string(),
            path: path.clone(),
        }),
    }
}

fn resolve_symbol(
    grammar: &dyn GrammarAdapter,
    doc: &DocumentNode,
    path: &NodePath,
) -> CodecResult<Arc<Symbol>> {
    let name = doc.attribute(ATTR_SYMBOL);
    name.and_then(|name| grammar.resolve_symbol(name))
        .ok_or_else(|| CodecError::TypeResolution {
            target: ResolutionTarget::Symbol,
            name: name.map(str::to_string),
            path: path.clone(),
        })
}

#[cfg(test)]
mod tests {
    use progtree::tests_utils::substring_grammar;

    use super::*;
    use crate::{magic::ATTR_TYPE, registry::TypeLibrary};

    fn decode(doc: &DocumentNode) -> CodecResult<ProgramTree> {
        let grammar = substring_grammar();
        let library = TypeLibrary::new();
        decode_node(
            &DecodeContext::new(Some(&grammar), &library),
            doc,
            &NodePath::root(),
        )
    }

    fn int_literal(symbol: &str, text: &str) -> DocumentNode {
        DocumentNode::new(TAG_LITERAL)
            .with_attribute(ATTR_SYMBOL, symbol)
            .with_attribute(ATTR_TYPE, "int32")
            .with_text(text)
    }

    #[test]
    fn decodes_rule_application() {
        let doc = DocumentNode::new(TAG_NONTERMINAL)
            .with_attribute(ATTR_RULE, "Substring")
            .with_child(int_literal("k", "0"))
            .with_child(int_literal("k", "6"));
        let tree = decode(&doc).unwrap();
        assert_eq!(tree.to_string(), "Substring(k:0, k:6)");
    }

    #[test]
    fn unknown_rule_and_symbol() {
        let doc = DocumentNode::new(TAG_NONTERMINAL).with_attribute(ATTR_RULE, "Reverse");
        let err = decode(&doc).unwrap_err();
        assert!(matches!(
            &err,
            CodecError::TypeResolution { target: ResolutionTarget::Rule, name: Some(name), .. }
                if name == "Reverse"
        ));

        let doc = DocumentNode::new(TAG_VARIABLE);
        let err = decode(&doc).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TypeResolution {
                target: ResolutionTarget::Symbol,
                name: None,
                ..
            }
        ));
    }

    #[test]
    fn arity_mismatch_surfaces_from_the_rule() {
        let doc = DocumentNode::new(TAG_NONTERMINAL)
            .with_attribute(ATTR_RULE, "Substring")
            .with_child(int_literal("k", "0"));
        let err = decode(&doc).unwrap_err();
        assert!(err.is_rule_construction());
        assert_eq!(
            err.path().map(ToString::to_string).as_deref(),
            Some("/NonterminalNode(Substring)")
        );
    }

    #[test]
    fn placeholder_tags_are_structural() {
        for tag in [TAG_TERMINAL, TAG_HOLE, TAG_LAMBDA, TAG_LET] {
            let err = decode(&DocumentNode::new(tag)).unwrap_err();
            assert!(err.is_structural(), "{tag} decoded as {err:?}");
        }
    }

    #[test]
    fn unknown_tag_is_reported_with_its_path() {
        let doc = DocumentNode::new(TAG_NONTERMINAL)
            .with_attribute(ATTR_RULE, "Upper")
            .with_child(DocumentNode::new("ConstantNode"));
        match decode(&doc).unwrap_err() {
            CodecError::UnknownTag { tag, path } => {
                assert_eq!(tag, "ConstantNode");
                assert_eq!(path.to_string(), "/NonterminalNode(Upper)/0");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_grammar_fails_before_walking() {
        let library = TypeLibrary::new();
        let err = decode_node(
            &DecodeContext::new(None, &library),
            &int_literal("k", "1"),
            &NodePath::root(),
        )
        .unwrap_err();
        assert!(err.is_missing_grammar_context());
    }
}
