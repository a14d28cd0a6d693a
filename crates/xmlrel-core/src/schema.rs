mod builder;
pub use builder::{
    Builder, ChildDef, ClassDef, ColumnDef, ContentDef, ElementPropertyDef, InlineDef, KeyDef,
    LinkDef, OrderDef, PropertyDef, PropertyTableDef, RelatedDef, TableDef,
};

pub mod db;

mod link;
pub use link::LinkInfo;

pub mod mapping;
use mapping::Mapping;

mod name;
pub use name::XmlName;

mod order;
pub use order::OrderInfo;

mod source;
pub use source::MapSource;

mod verify;

pub mod xml;

use db::{KeyGeneration, Table, TableId};
use std::sync::Arc;

#[derive(Debug)]
pub struct Schema {
    /// XML-centric view: element types to class maps
    pub xml: xml::Schema,

    /// Database-level schema
    pub db: Arc<db::Schema>,

    /// Table-centric view, derived from `xml`
    pub mapping: Mapping,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Resolves an element type, through any delegation, to its class map.
    pub fn class_map(&self, element: &XmlName) -> Option<&xml::ClassMap> {
        self.xml.class_map(element)
    }

    pub fn mapping_for(&self, table: TableId) -> Option<&mapping::ClassTableMap> {
        self.mapping.class_table(table)
    }

    pub fn table(&self, id: TableId) -> &Table {
        self.db.table(id)
    }

    /// Returns `true` if storing a document may need to synthesize a key:
    /// some table reachable from a class map has a generated key.
    pub fn requires_key_generator(&self) -> bool {
        self.mapping.class_tables().any(|class_table| {
            let mut tables = Some(class_table.table)
                .into_iter()
                .chain(class_table.property_tables.iter().map(|map| map.table));

            tables.any(|table| {
                self.db
                    .table(table)
                    .keys
                    .iter()
                    .any(|key| key.generation == KeyGeneration::Generated)
            })
        })
    }
}
