/// Location of a node inside a document or program tree, used in diagnostics.
///
/// Rendered as `/NonterminalNode(Concat)/1/LiteralNode(k)`: each node contributes a
/// segment, and child positions are recorded as indices between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the `index`-th child of `self`.
    pub fn child(&self, index: usize) -> Self {
        self.join(index.to_string())
    }

    /// Path extended with a node label, e.g. `LiteralNode(k)`.
    pub fn node(&self, tag: &str, label: Option<&str>) -> Self {
        match label {
            Some(label) => self.join(format!("{}({})", tag, label)),
            None => self.join(tag.to_string()),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    fn join(&self, segment: String) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_segments_in_order() {
        let path = NodePath::root()
            .node("NonterminalNode", Some("Concat"))
            .child(1)
            .node("LiteralNode", Some("k"));
        assert_eq!(path.to_string(), "/NonterminalNode(Concat)/1/LiteralNode(k)");
        assert_eq!(path.depth(), 3);
        assert_eq!(NodePath::root().to_string(), "/");
    }
}
