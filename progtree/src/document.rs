//! Portable, tree-structured document nodes.
//!
//! A [`DocumentNode`] is the interchange form of a program tree: a tag, a set of
//! uniquely keyed string attributes, inline text and an ordered list of children.
//! It carries no knowledge of grammars or values; the codec decides what the tags
//! and attributes mean.
use std::collections::BTreeMap;

/// A single node of a tree-structured textual document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentNode {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Create an empty node with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder variant of [`DocumentNode::set_attribute`].
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder variant of [`DocumentNode::set_text`].
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Builder variant of [`DocumentNode::push_child`].
    pub fn with_child(mut self, child: DocumentNode) -> Self {
        self.push_child(child);
        self
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Set an attribute, replacing any previous value under the same key.
    ///
    /// Returns the previous value if there was one.
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.attributes.insert(key.into(), value.into())
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Iterate over all attributes in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Append text to the inline content (used by streaming readers).
    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_child(&mut self, child: DocumentNode) {
        self.children.push(child);
    }

    #[inline]
    pub fn children(&self) -> &[DocumentNode] {
        &self.children
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Children whose tag equals `tag`, in document order.
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a DocumentNode> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Returns the only child of this node, or `None` if there are zero or several.
    pub fn single_child(&self) -> Option<&DocumentNode> {
        match self.children.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DocumentNode::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_unique_by_key() {
        let mut node = DocumentNode::new("LiteralNode").with_attribute("symbol", "k");
        let previous = node.set_attribute("symbol", "s");
        assert_eq!(previous.as_deref(), Some("k"));
        assert_eq!(node.attribute("symbol"), Some("s"));
        assert_eq!(node.attributes().count(), 1);
    }

    #[test]
    fn single_child_requires_exactly_one() {
        let empty = DocumentNode::new("a");
        assert!(empty.single_child().is_none());

        let one = DocumentNode::new("a").with_child(DocumentNode::new("b"));
        assert_eq!(one.single_child().map(DocumentNode::tag), Some("b"));

        let two = one.clone().with_child(DocumentNode::new("c"));
        assert!(two.single_child().is_none());
        assert_eq!(two.node_count(), 3);
    }

    #[test]
    fn children_tagged_preserves_order() {
        let node = DocumentNode::new("list")
            .with_child(DocumentNode::new("x").with_text("1"))
            .with_child(DocumentNode::new("y"))
            .with_child(DocumentNode::new("x").with_text("2"));
        let texts: Vec<_> = node.children_tagged("x").map(DocumentNode::text).collect();
        assert_eq!(texts, ["1", "2"]);
    }
}
