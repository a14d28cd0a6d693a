//! The document tree the transformers read from and write to.
//!
//! Transformers only use the [`Document`] and [`DocumentMut`] traits, so any
//! DOM can be plugged in. [`XmlDocument`] is an arena-backed implementation.

mod tree;
pub use tree::Tree;

mod xml_document;
pub use xml_document::XmlDocument;

use crate::schema::XmlName;

/// Identifies a node within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

/// Read access to a document tree.
///
/// Attributes are not nodes; they are read as name/value pairs of their
/// element.
pub trait Document {
    /// The document element, if the document has one.
    fn root(&self) -> Option<NodeId>;

    fn kind(&self, node: NodeId) -> NodeKind;

    /// Qualified name of an element. `None` for text nodes.
    fn name(&self, node: NodeId) -> Option<&XmlName>;

    /// Child elements and text nodes, interleaved in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn attributes(&self, node: NodeId) -> Vec<(XmlName, String)>;

    fn attribute(&self, node: NodeId, name: &XmlName) -> Option<&str>;

    /// Content of a text node. `None` for elements.
    fn text(&self, node: NodeId) -> Option<&str>;
}

/// Write access to a document tree.
pub trait DocumentMut: Document {
    /// Creates a detached element.
    fn create_element(&mut self, name: XmlName) -> NodeId;

    /// Creates a detached text node.
    fn create_text(&mut self, text: &str) -> NodeId;

    fn set_root(&mut self, node: NodeId);

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Inserts `child` so that it becomes the `index`th child of `parent`.
    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId);

    fn set_attribute(&mut self, node: NodeId, name: XmlName, value: String);

    /// Appends `value` to an existing attribute value, separated by a single
    /// space, or sets the attribute when it is not present.
    fn append_attribute(&mut self, node: NodeId, name: XmlName, value: &str) {
        let joined = match self.attribute(node, &name) {
            Some(existing) => format!("{existing} {value}"),
            None => value.to_string(),
        };
        self.set_attribute(node, name, joined);
    }
}
