use super::{Document, NodeId, NodeKind};
use crate::schema::XmlName;

use std::collections::BTreeMap;

/// An owned snapshot of a document subtree for structural comparison.
///
/// Whitespace-only text is dropped and adjacent text nodes are merged, so
/// two documents compare equal when they hold the same elements, attributes
/// and text in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    Element {
        name: XmlName,
        attributes: BTreeMap<XmlName, String>,
        children: Vec<Tree>,
    },
    Text(String),
}

impl Tree {
    /// Snapshot of the document element.
    pub fn from_document(doc: &impl Document) -> Option<Tree> {
        doc.root().map(|root| Tree::from_node(doc, root))
    }

    pub fn from_node(doc: &impl Document, node: NodeId) -> Tree {
        if doc.kind(node) == NodeKind::Text {
            return Tree::Text(doc.text(node).unwrap_or_default().to_string());
        }

        let mut children: Vec<Tree> = vec![];

        for child in doc.children(node) {
            match Tree::from_node(doc, child) {
                Tree::Text(text) if text.trim().is_empty() => {}
                Tree::Text(text) => match children.last_mut() {
                    Some(Tree::Text(prev)) => prev.push_str(&text),
                    _ => children.push(Tree::Text(text)),
                },
                element => children.push(element),
            }
        }

        Tree::Element {
            name: doc.name(node).cloned().unwrap_or_else(|| XmlName::new("")),
            attributes: doc.attributes(node).into_iter().collect(),
            children,
        }
    }

    pub fn element(name: impl Into<XmlName>) -> Tree {
        Tree::Element {
            name: name.into(),
            attributes: BTreeMap::new(),
            children: vec![],
        }
    }

    pub fn text(text: impl Into<String>) -> Tree {
        Tree::Text(text.into())
    }

    /// Adds an attribute. No-op on text.
    pub fn attr(mut self, name: impl Into<XmlName>, value: impl Into<String>) -> Tree {
        if let Tree::Element { attributes, .. } = &mut self {
            attributes.insert(name.into(), value.into());
        }
        self
    }

    /// Appends a child. No-op on text.
    pub fn child(mut self, child: Tree) -> Tree {
        if let Tree::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    /// Appends an element holding only `text`.
    pub fn text_child(self, name: impl Into<XmlName>, text: impl Into<String>) -> Tree {
        self.child(Tree::element(name).child(Tree::text(text)))
    }
}
