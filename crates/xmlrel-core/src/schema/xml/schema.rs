use super::{ClassMap, ClassMapId, ClassMapKind};
use crate::schema::XmlName;

use indexmap::IndexMap;

/// The class-centric (XML-centric) view of a map, keyed by element type.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    pub class_maps: Vec<ClassMap>,

    /// Element types with a mapping, either direct or by delegation.
    pub elements: IndexMap<XmlName, ElementRef>,
}

/// How an element type reaches its class map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementRef {
    /// The element type has its own class map.
    Direct(ClassMapId),

    /// "Use class map": the element type is mapped with another element
    /// type's class map.
    Delegate(XmlName),
}

impl Schema {
    pub fn class(&self, id: ClassMapId) -> &ClassMap {
        self.class_maps.get(id.0).expect("invalid class map ID")
    }

    pub fn class_maps(&self) -> impl Iterator<Item = &ClassMap> {
        self.class_maps.iter()
    }

    /// Resolves an element type to its terminal class map, following any
    /// delegation chain.
    ///
    /// Chains are checked for cycles when they are registered, so the walk
    /// always terminates; it is still bounded by the number of elements.
    pub fn class_map_id(&self, element: &XmlName) -> Option<ClassMapId> {
        let mut current = element;

        for _ in 0..=self.elements.len() {
            match self.elements.get(current)? {
                ElementRef::Direct(id) => return Some(*id),
                ElementRef::Delegate(target) => current = target,
            }
        }

        None
    }

    pub fn class_map(&self, element: &XmlName) -> Option<&ClassMap> {
        self.class_map_id(element).map(|id| self.class(id))
    }

    pub fn element_kind(&self, element: &XmlName) -> Option<ClassMapKind> {
        self.class_map(element).map(|class| class.kind)
    }

    /// The ignored root wrapper, if the map declares one.
    pub fn ignored_root(&self) -> Option<&ClassMap> {
        self.class_maps.iter().find(|class| class.is_ignored_root())
    }
}
