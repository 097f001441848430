//! Tree Serializer: program trees to document trees.
use log::trace;
use progtree::{DocumentNode, ProgramTree};

use crate::{
    context::EncodeContext,
    magic::{ATTR_RULE, ATTR_SYMBOL, TAG_LITERAL, TAG_NONTERMINAL, TAG_VARIABLE},
    utils::{
        error::{CodecError, CodecResult},
        path::NodePath,
    },
    value,
};

/// Encode `tree` into a fresh document node. `path` is the location of `tree` in the
/// enclosing document and only feeds diagnostics.
pub fn encode_node(
    ctx: &EncodeContext<'_>,
    tree: &ProgramTree,
    path: &NodePath,
) -> CodecResult<DocumentNode> {
    match tree {
        ProgramTree::NonTerminal(nt) => {
            let path = path.node(TAG_NONTERMINAL, Some(&nt.rule.name));
            trace!("Encoding {}", path);

            let mut node =
                DocumentNode::new(TAG_NONTERMINAL).with_attribute(ATTR_RULE, &nt.rule.name);
            for (index, child) in nt.children.iter().enumerate() {
                node.push_child(encode_node(ctx, child, &path.child(index))?);
            }
            Ok(node)
        }
        ProgramTree::Literal(lit) => {
            let path = path.node(TAG_LITERAL, Some(&lit.symbol.name));
            trace!("Encoding {}", path);

            let mut node =
                DocumentNode::new(TAG_LITERAL).with_attribute(ATTR_SYMBOL, &lit.symbol.name);
            value::encode_value(ctx, &lit.value, &mut node, &path)?;
            Ok(node)
        }
        ProgramTree::Variable(var) => {
            trace!("Encoding {}", path.node(TAG_VARIABLE, Some(&var.symbol.name)));
            Ok(DocumentNode::new(TAG_VARIABLE).with_attribute(ATTR_SYMBOL, &var.symbol.name))
        }
        ProgramTree::Terminal(_) => Err(CodecError::Structural {
            kind: tree.kind().to_string(),
            reason: "abstract node cannot be serialized",
            path: path.clone(),
        }),
        ProgramTree::Hole(_) | ProgramTree::Lambda(_) | ProgramTree::Let(_) => {
            Err(CodecError::Structural {
                kind: tree.kind().to_string(),
                reason: "unsupported node kind",
                path: path.clone(),
            })
        }
    }
}
