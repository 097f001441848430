//! Value Codec: leaf payloads of literal nodes to and from document fragments.
//!
//! A value fragment is any [`DocumentNode`] carrying a `type` attribute:
//! - primitives write their canonical text as inline content;
//! - lists append one `Attr-ListElement` child per element, each a value fragment;
//! - nested programs and extensible values append exactly one child.
//!
//! Decoding dispatches on the `type` attribute only. An identifier that is neither a
//! primitive token, a list token nor `program` is looked up in the [`TypeLibrary`];
//! there is no fallback.
//!
//! [`TypeLibrary`]: crate::registry::TypeLibrary
use log::trace;
use progtree::{DocumentNode, DynamicValue};

use crate::{
    context::{DecodeContext, EncodeContext},
    deserializer,
    magic::{ATTR_TYPE, TAG_LIST_ELEMENT, TYPE_PROGRAM},
    serializer,
    utils::{
        conf::ListElementPolicy,
        error::{CodecError, CodecResult, ResolutionTarget},
        path::NodePath,
    },
};

pub mod list;
pub mod primitive;

use primitive::PrimitiveType;

/// Whether `type_id` is claimed by a built-in kind and so unavailable to extensible types.
pub fn is_reserved_type_id(type_id: &str) -> bool {
    type_id == TYPE_PROGRAM
        || list::parse_list_token(type_id).is_some()
        || type_id.parse::<PrimitiveType>().is_ok()
}

/// Write `value` into `target`: sets the `type` attribute and the content or children.
pub fn encode_value(
    ctx: &EncodeContext<'_>,
    value: &DynamicValue,
    target: &mut DocumentNode,
    path: &NodePath,
) -> CodecResult<()> {
    match value {
        DynamicValue::List(items) => encode_list(ctx, items, target, path),
        DynamicValue::Program(tree) => {
            target.set_attribute(ATTR_TYPE, TYPE_PROGRAM);
            let child = serializer::encode_node(ctx, tree, &path.child(0))?;
            target.push_child(child);
            Ok(())
        }
        DynamicValue::Opaque(opaque) => {
            let serializable =
                opaque
                    .as_serializable()
                    .ok_or_else(|| CodecError::Unserializable {
                        type_name: opaque.rust_type_name().to_string(),
                        path: path.clone(),
                    })?;

            let type_id = serializable.serialized_type();
            trace!("Encoding extensible value of type '{}' at {}", type_id, path);
            target.set_attribute(ATTR_TYPE, type_id);
            target.push_child(serializable.serialize());
            Ok(())
        }
        primitive => {
            let (ty, text) =
                PrimitiveType::render(primitive).ok_or_else(|| CodecError::Unserializable {
                    type_name: primitive.kind().to_string(),
                    path: path.clone(),
                })?;
            target.set_attribute(ATTR_TYPE, ty.token());
            target.set_text(text);
            Ok(())
        }
    }
}

fn encode_list(
    ctx: &EncodeContext<'_>,
    items: &[DynamicValue],
    target: &mut DocumentNode,
    path: &NodePath,
) -> CodecResult<()> {
    let mut hint: Option<String> = None;

    for (index, item) in items.iter().enumerate() {
        let element_path = path.child(index);
        let mut element = DocumentNode::new(TAG_LIST_ELEMENT);
        encode_value(ctx, item, &mut element, &element_path)?;

        if ctx.config.lists.elements == ListElementPolicy::Homogeneous {
            // Written just above, always present.
            let found = list::type_family(element.attribute(ATTR_TYPE).unwrap_or_default());
            match &hint {
                None => hint = Some(found.to_string()),
                Some(expected) if expected != found => {
                    return Err(CodecError::HeterogeneousList {
                        expected: expected.clone(),
                        found: found.to_string(),
                        path: element_path,
                    });
                }
                Some(_) => {}
            }
        }

        target.push_child(element);
    }

    target.set_attribute(ATTR_TYPE, list::list_token(hint.as_deref()));
    Ok(())
}

/// Rebuild the value described by the fragment `doc`.
pub fn decode_value(
    ctx: &DecodeContext<'_>,
    doc: &DocumentNode,
    path: &NodePath,
) -> CodecResult<DynamicValue> {
    let type_id = doc
        .attribute(ATTR_TYPE)
        .ok_or_else(|| CodecError::TypeResolution {
            target: ResolutionTarget::Type,
            name: None,
            path: path.clone(),
        })?;

    if let Ok(primitive) = type_id.parse::<PrimitiveType>() {
        return primitive
            .parse(doc.text())
            .ok_or_else(|| CodecError::ValueParse {
                expected: type_id.to_string(),
                text: doc.text().to_string(),
                path: path.clone(),
            });
    }

    if let Some(hint) = list::parse_list_token(type_id) {
        return decode_list(ctx, doc, type_id, hint, path);
    }

    if type_id == TYPE_PROGRAM {
        let grammar = ctx.grammar(path)?;
        let child = doc
            .single_child()
            .ok_or_else(|| CodecError::MalformedFragment {
                type_id: type_id.to_string(),
                reason: format!("expected exactly one child, found {}", doc.child_count()),
                path: path.clone(),
            })?;
        let tree = deserializer::decode_node_with(ctx, grammar, child, &path.child(0))?;
        return Ok(DynamicValue::Program(Box::new(tree)));
    }

    trace!("Decoding extensible value of type '{}' at {}", type_id, path);
    ctx.library.construct(type_id, doc, path)
}

fn decode_list(
    ctx: &DecodeContext<'_>,
    doc: &DocumentNode,
    type_id: &str,
    hint: Option<&str>,
    path: &NodePath,
) -> CodecResult<DynamicValue> {
    let mut items = Vec::new();
    items
        .try_reserve_exact(doc.child_count())
        .map_err(|e| CodecError::Construction {
            type_id: type_id.to_string(),
            reason: e.to_string(),
            path: path.clone(),
        })?;

    for (index, element) in doc.children().iter().enumerate() {
        let element_path = path.child(index);
        if element.tag() != TAG_LIST_ELEMENT {
            return Err(CodecError::MalformedFragment {
                type_id: type_id.to_string(),
                reason: format!(
                    "expected '{}' children, found '{}'",
                    TAG_LIST_ELEMENT,
                    element.tag()
                ),
                path: element_path,
            });
        }

        if let (Some(expected), Some(found)) = (hint, element.attribute(ATTR_TYPE)) {
            if list::type_family(expected) != list::type_family(found) {
                return Err(CodecError::HeterogeneousList {
                    expected: expected.to_string(),
                    found: found.to_string(),
                    path: element_path,
                });
            }
        }

        items.push(decode_value(ctx, element, &element_path)?);
    }

    Ok(DynamicValue::List(items))
}
