//! XML rendering of document trees, for persisting them to disk or sending them over
//! the wire.
//!
//! Each [`DocumentNode`] maps to one element: the tag becomes the element name,
//! attributes are written in key order, and inline text precedes the children.
//!
//! Indentation is layout only. A node holding both text and children is always written
//! compactly, whitespace-only text next to children is written as CDATA, and on reading
//! whitespace-only character data around child elements is dropped. Text and attribute
//! values must be legal XML 1.0 characters: control characters other than tab, line
//! feed and carriage return are rejected when rendering.
use std::path::Path;

use log::debug;
use progtree::DocumentNode;
use quick_xml::{
    Reader, Writer,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::utils::{
    conf::XmlConfig,
    error::{CodecError, CodecResult},
};

fn xml_error(e: impl std::fmt::Display) -> CodecError {
    CodecError::Xml {
        message: e.to_string(),
    }
}

/// Whitespace an indenting writer may insert between elements.
fn is_layout(text: &str) -> bool {
    text.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}

fn is_xml_char(c: char) -> bool {
    matches!(c as u32, 0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF)
}

fn check_chars(tag: &str, what: &str, text: &str) -> CodecResult<()> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(xml_error(format!(
            "{} of '{}' contains U+{:04X}, which XML 1.0 cannot represent",
            what, tag, c as u32
        ))),
        None => Ok(()),
    }
}

/// Render `doc` as an XML document.
pub fn to_string(doc: &DocumentNode, config: &XmlConfig) -> CodecResult<String> {
    let (mut writer, indented) = match config.indent {
        Some(indent) if indent > 0 => (Writer::new_with_indent(Vec::new(), b' ', indent), true),
        _ => (Writer::new(Vec::new()), false),
    };

    if config.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
    }
    write_node(&mut writer, doc, indented)?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

fn write_node(
    writer: &mut Writer<Vec<u8>>,
    node: &DocumentNode,
    indented: bool,
) -> CodecResult<()> {
    let has_text = !node.text().is_empty();
    let has_children = node.child_count() > 0;

    if indented && has_text && has_children {
        // Indentation inside mixed content would end up in the text.
        let mut compact = Writer::new(Vec::new());
        write_node(&mut compact, node, false)?;
        let fragment = String::from_utf8(compact.into_inner()).map_err(xml_error)?;
        return writer
            .write_event(Event::Text(BytesText::from_escaped(fragment)))
            .map_err(xml_error);
    }

    let mut start = BytesStart::new(node.tag());
    for (key, value) in node.attributes() {
        check_chars(node.tag(), "attribute value", value)?;
        start.push_attribute((key, value));
    }

    if !has_text && !has_children {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    if has_text {
        check_chars(node.tag(), "text", node.text())?;
        let event = if has_children && is_layout(node.text()) {
            Event::CData(BytesCData::new(node.text()))
        } else {
            Event::Text(BytesText::new(node.text()))
        };
        writer.write_event(event).map_err(xml_error)?;
    }
    for child in node.children() {
        write_node(writer, child, indented)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.tag())))
        .map_err(xml_error)
}

/// Element being read. Whitespace-only character data is held apart until the element
/// closes: it is the element's text only if the element has no children.
struct OpenNode {
    node: DocumentNode,
    layout: String,
}

fn open_node(start: &BytesStart<'_>) -> CodecResult<OpenNode> {
    let mut node = DocumentNode::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(xml_error)?;
        node.set_attribute(key, value.into_owned());
    }
    Ok(OpenNode {
        node,
        layout: String::new(),
    })
}

fn close_node(
    open: OpenNode,
    stack: &mut [OpenNode],
    root: &mut Option<DocumentNode>,
) -> CodecResult<()> {
    let OpenNode { mut node, layout } = open;
    if node.child_count() == 0 && node.text().is_empty() {
        node.set_text(layout);
    }

    match stack.last_mut() {
        Some(parent) => parent.node.push_child(node),
        None if root.is_some() => {
            return Err(xml_error("document has more than one root element"));
        }
        None => *root = Some(node),
    }
    Ok(())
}

fn append_text(stack: &mut [OpenNode], text: &str, verbatim: bool) -> CodecResult<()> {
    match stack.last_mut() {
        Some(open) if !verbatim && is_layout(text) => open.layout.push_str(text),
        Some(open) => open.node.push_text(text),
        None if is_layout(text) => {}
        None => return Err(xml_error("text outside of the root element")),
    }
    Ok(())
}

/// Parse an XML document produced by [`to_string`].
pub fn from_str(xml: &str) -> CodecResult<DocumentNode> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut stack: Vec<OpenNode> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => stack.push(open_node(&e)?),
            Event::Empty(e) => {
                let node = open_node(&e)?;
                close_node(node, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| xml_error("closing tag without a matching opening tag"))?;
                close_node(node, &mut stack, &mut root)?;
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(xml_error)?;
                append_text(&mut stack, &text, false)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8(e.into_inner().into_owned()).map_err(xml_error)?;
                append_text(&mut stack, &text, true)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(xml_error(format!(
            "element '{}' is never closed",
            open.node.tag()
        )));
    }
    root.ok_or_else(|| xml_error("document has no root element"))
}

/// Write `doc` to `path`, creating parent directories as needed.
pub fn save(doc: &DocumentNode, path: &Path, config: &XmlConfig) -> CodecResult<()> {
    let xml = to_string(doc, config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, xml)?;
    debug!("Saved document '{}' to `{}`", doc.tag(), path.display());
    Ok(())
}

pub fn load(path: &Path) -> CodecResult<DocumentNode> {
    let xml = std::fs::read_to_string(path)?;
    let doc = from_str(&xml)?;
    debug!("Loaded document '{}' from `{}`", doc.tag(), path.display());
    Ok(doc)
}
