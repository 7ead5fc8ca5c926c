//! Minimal HTML tree used by the region extractors.
//!
//! Text follows the element-tree model: `text` is the content before the
//! first child, `tail` is the content after the element's end tag and
//! before its next sibling. The root of a parsed document is a fragment
//! node with an empty tag that is never serialized itself.

mod entities;
mod parser;
mod serializer;

pub use parser::parse;
pub use serializer::serialize;

/// HTML elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Check whether `tag` is an HTML void element.
pub(crate) fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Element node in the parse tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    /// Lowercase tag name; empty for the document fragment root.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
    /// Text before the first child.
    pub text: String,
    /// Text after this element's end tag.
    pub tail: String,
    /// Child elements.
    pub children: Vec<Node>,
}

impl Node {
    /// Create an element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Create an empty document fragment.
    #[must_use]
    pub fn fragment() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Whether this node is the fragment root.
    pub fn is_fragment(&self) -> bool {
        self.tag.is_empty()
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check whether the attribute is present, with or without a value.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(key, _)| key == name)
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(pos).1)
    }

    /// The element id, if any.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Whitespace-separated class names.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Replace all content with a single text run.
    pub fn set_inner_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.children.clear();
    }

    /// Append text after the current last piece of content.
    pub fn append_text(&mut self, text: &str) {
        if let Some(last) = self.children.last_mut() {
            last.tail.push_str(text);
        } else {
            self.text.push_str(text);
        }
    }

    /// Concatenated text content of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Serialize the content of this node (text and children, no own tags).
    pub fn inner_html(&self) -> String {
        serializer::serialize_inner(self)
    }

    /// Serialize this node including its own tags, without its tail.
    pub fn outer_html(&self) -> String {
        serializer::serialize_element(self)
    }

    /// Parse `html` and append the resulting nodes as this node's content.
    pub fn append_html(&mut self, html: &str) -> Result<(), crate::MarkupError> {
        let fragment = parse(html)?;
        self.append_text(&fragment.text);
        self.children.extend(fragment.children);
        Ok(())
    }

    /// Find a descendant element by id (the node itself is not considered).
    pub fn element_by_id(&self, id: &str) -> Option<&Node> {
        self.children.iter().find_map(|child| {
            if child.id() == Some(id) {
                Some(child)
            } else {
                child.element_by_id(id)
            }
        })
    }

    /// Mutable variant of [`element_by_id`](Self::element_by_id).
    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut Node> {
        for child in &mut self.children {
            if child.id() == Some(id) {
                return Some(child);
            }
            if let Some(found) = child.element_by_id_mut(id) {
                return Some(found);
            }
        }
        None
    }

    /// Child-index paths of every descendant matching `predicate`, in document order.
    pub fn paths_where(&self, predicate: impl Fn(&Node) -> bool) -> Vec<Vec<usize>> {
        let mut paths = Vec::new();
        let mut current = Vec::new();
        collect_paths(self, &predicate, &mut current, &mut paths);
        paths
    }

    /// Descendant at a child-index path. The empty path is the node itself.
    pub fn at_path(&self, path: &[usize]) -> Option<&Node> {
        path.iter().try_fold(self, |node, &i| node.children.get(i))
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        path.iter()
            .try_fold(self, |node, &i| node.children.get_mut(i))
    }

    /// Replace the descendant at `path`, keeping the old node's tail.
    ///
    /// Returns the removed node, or `None` (and drops `replacement`) if the
    /// path does not exist.
    pub fn replace_at(&mut self, path: &[usize], mut replacement: Node) -> Option<Node> {
        let slot = self.at_path_mut(path)?;
        replacement.tail = std::mem::take(&mut slot.tail);
        Some(std::mem::replace(slot, replacement))
    }
}

fn collect_text(node: &Node, out: &mut String) {
    out.push_str(&node.text);
    for child in &node.children {
        collect_text(child, out);
        out.push_str(&child.tail);
    }
}

fn collect_paths(
    node: &Node,
    predicate: &impl Fn(&Node) -> bool,
    current: &mut Vec<usize>,
    paths: &mut Vec<Vec<usize>>,
) {
    for (i, child) in node.children.iter().enumerate() {
        current.push(i);
        if predicate(child) {
            paths.push(current.clone());
        }
        collect_paths(child, predicate, current, paths);
        current.pop();
    }
}
