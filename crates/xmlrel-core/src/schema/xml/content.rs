use super::{ClassMapId, PropertyMap};
use crate::schema::{LinkInfo, OrderInfo, XmlName};

use indexmap::IndexMap;

/// What can appear inside a mapped element: attributes, PCDATA and child
/// elements.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub attributes: IndexMap<XmlName, PropertyMap>,

    pub pcdata: Option<PropertyMap>,

    pub children: IndexMap<XmlName, ChildMap>,
}

/// How a child element type is mapped.
#[derive(Debug, Clone)]
pub enum ChildMap {
    /// The element's text is a property (column value).
    Property(PropertyMap),

    /// The element is an instance of another class, stored in a linked table.
    RelatedClass(RelatedClassMap),

    /// The element is a wrapper whose content is stored in the containing
    /// class's row.
    InlineClass(InlineClassMap),
}

#[derive(Debug, Clone)]
pub struct RelatedClassMap {
    /// Name of the child element. May differ from the related class map's
    /// own element when the class map is reached through delegation.
    pub element: XmlName,

    /// The related class map, delegation already resolved.
    pub class: ClassMapId,

    /// Keys joining the containing class table to the related class table.
    pub link: LinkInfo,

    pub order: Option<OrderInfo>,
}

#[derive(Debug, Clone)]
pub struct InlineClassMap {
    pub element: XmlName,

    pub content: Content,

    pub order: Option<OrderInfo>,
}

impl Content {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.pcdata.is_none() && self.children.is_empty()
    }

    /// Adds every map from `base` that is not already defined here.
    pub(crate) fn inherit(&mut self, base: &Content) {
        for (name, map) in &base.attributes {
            if !self.attributes.contains_key(name) {
                self.attributes.insert(name.clone(), map.clone());
            }
        }

        if self.pcdata.is_none() {
            self.pcdata = base.pcdata.clone();
        }

        for (name, map) in &base.children {
            if !self.children.contains_key(name) {
                self.children.insert(name.clone(), map.clone());
            }
        }
    }
}

impl ChildMap {
    pub fn order(&self) -> Option<&OrderInfo> {
        match self {
            ChildMap::Property(map) => map.order.as_ref(),
            ChildMap::RelatedClass(map) => map.order.as_ref(),
            ChildMap::InlineClass(map) => map.order.as_ref(),
        }
    }
}
