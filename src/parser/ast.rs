// Tree types for parsed XML documentation
//
// A document is an element tree with text leaves. Nodes are immutable
// once the reader has built them.

/// Source location of an element's start tag (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Compute the line and column of a byte offset into `source`.
    ///
    /// Columns count characters, not bytes.
    pub fn at_offset(source: &str, offset: usize) -> Self {
        let mut end = offset.min(source.len());
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        let prefix = &source[..end];
        let line = prefix.matches('\n').count() + 1;
        let line_start = prefix.rfind('\n').map_or(0, |nl| nl + 1);
        let column = prefix[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

/// A node in the documentation tree
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    Element(Element),
    Text(String),
}

impl DocNode {
    /// The element inside this node, if it is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            DocNode::Element(el) => Some(el),
            DocNode::Text(_) => None,
        }
    }
}

/// An XML element with its attributes and ordered children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<DocNode>,
    pub position: Position,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            position,
        }
    }

    /// Look up an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(DocNode::as_element)
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    /// Concatenated text of all descendants, unmodified
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                DocNode::Text(text) => out.push_str(text),
                DocNode::Element(el) => el.collect_text(out),
            }
        }
    }
}

/// A parsed XML document; wraps its single root element
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}
