use super::{Document, DocumentMut, NodeId, NodeKind, Tree};
use crate::schema::XmlName;

use std::fmt;

/// An arena DOM: nodes live in one vector and refer to each other by index.
#[derive(Debug, Default, Clone)]
pub struct XmlDocument {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        name: XmlName,
        attributes: Vec<(XmlName, String)>,
    },
    Text(String),
}

impl XmlDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document whose root element is `name`.
    pub fn with_root(name: impl Into<XmlName>) -> (Self, NodeId) {
        let mut doc = Self::new();
        let root = doc.create_element(name.into());
        doc.set_root(root);
        (doc, root)
    }

    /// Creates an element and appends it to `parent`.
    pub fn add_element(&mut self, parent: NodeId, name: impl Into<XmlName>) -> NodeId {
        let node = self.create_element(name.into());
        self.append_child(parent, node);
        node
    }

    /// Creates a text node and appends it to `parent`.
    pub fn add_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Appends an element holding only `text`.
    pub fn add_text_element(
        &mut self,
        parent: NodeId,
        name: impl Into<XmlName>,
        text: &str,
    ) -> NodeId {
        let node = self.add_element(parent, name);
        self.add_text(node, text);
        node
    }

    pub fn tree(&self) -> Option<Tree> {
        Tree::from_document(self)
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            children: vec![],
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        default_ns: Option<&str>,
    ) -> fmt::Result {
        let (name, attributes) = match &self.node(id).data {
            NodeData::Text(text) => return write_escaped(f, text, false),
            NodeData::Element { name, attributes } => (name, attributes),
        };

        write!(f, "<{}", name.local)?;

        if name.namespace() != default_ns {
            write!(f, " xmlns=\"")?;
            write_escaped(f, name.namespace().unwrap_or(""), true)?;
            f.write_str("\"")?;
        }

        // Namespaced attributes get a prefix declared on the element itself.
        let mut prefixes: Vec<&str> = vec![];

        for (attr, value) in attributes {
            match attr.namespace() {
                Some(namespace) => {
                    let index = match prefixes.iter().position(|ns| *ns == namespace) {
                        Some(index) => index,
                        None => {
                            prefixes.push(namespace);
                            write!(f, " xmlns:ns{}=\"", prefixes.len() - 1)?;
                            write_escaped(f, namespace, true)?;
                            f.write_str("\"")?;
                            prefixes.len() - 1
                        }
                    };
                    write!(f, " ns{index}:{}=\"", attr.local)?;
                }
                None => write!(f, " {}=\"", attr.local)?,
            }
            write_escaped(f, value, true)?;
            f.write_str("\"")?;
        }

        let children = &self.node(id).children;
        if children.is_empty() {
            return f.write_str("/>");
        }

        f.write_str(">")?;
        for child in children {
            self.write_node(f, *child, name.namespace())?;
        }
        write!(f, "</{}>", name.local)
    }
}

impl Document for XmlDocument {
    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.node(node).data {
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
        }
    }

    fn name(&self, node: NodeId) -> Option<&XmlName> {
        match &self.node(node).data {
            NodeData::Element { name, .. } => Some(name),
            NodeData::Text(_) => None,
        }
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children.clone()
    }

    fn attributes(&self, node: NodeId) -> Vec<(XmlName, String)> {
        match &self.node(node).data {
            NodeData::Element { attributes, .. } => attributes.clone(),
            NodeData::Text(_) => vec![],
        }
    }

    fn attribute(&self, node: NodeId, name: &XmlName) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(attr, _)| attr == name)
                .map(|(_, value)| value.as_str()),
            NodeData::Text(_) => None,
        }
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }
}

impl DocumentMut for XmlDocument {
    fn create_element(&mut self, name: XmlName) -> NodeId {
        self.push(NodeData::Element {
            name,
            attributes: vec![],
        })
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    fn set_root(&mut self, node: NodeId) {
        self.root = Some(node);
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
    }

    fn set_attribute(&mut self, node: NodeId, name: XmlName, value: String) {
        if let NodeData::Element { attributes, .. } = &mut self.nodes[node.0].data {
            match attributes.iter_mut().find(|(attr, _)| *attr == name) {
                Some((_, existing)) => *existing = value,
                None => attributes.push((name, value)),
            }
        }
    }
}

/// Renders the document as XML text without a declaration.
impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.write_node(f, root, None),
            None => Ok(()),
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str, attribute: bool) -> fmt::Result {
    for c in text.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' if attribute => f.write_str("&quot;")?,
            c => fmt::Write::write_char(f, c)?,
        }
    }
    Ok(())
}
