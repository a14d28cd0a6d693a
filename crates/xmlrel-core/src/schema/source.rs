use super::{Builder, ClassDef, Schema, TableDef, XmlName};
use crate::Result;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A declarative map description.
///
/// The JSON form mirrors the builder calls:
///
/// ```json
/// {
///   "tables": [
///     {
///       "name": "Orders",
///       "columns": [{ "name": "id", "type": { "integer": 8 } }],
///       "keys": [{ "name": "pk", "kind": "primary", "columns": ["id"], "generated": true }]
///     }
///   ],
///   "classes": [
///     { "element": "Order", "kind": "root_table", "table": "Orders" }
///   ],
///   "use_class_maps": { "Purchase": "Order" }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapSource {
    #[serde(default)]
    pub tables: Vec<TableDef>,

    #[serde(default)]
    pub classes: Vec<ClassDef>,

    /// Element type to the element type whose class map it uses.
    #[serde(default)]
    pub use_class_maps: IndexMap<XmlName, XmlName>,
}

impl MapSource {
    pub fn from_json(src: &str) -> Result<MapSource> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn builder(&self) -> Result<Builder> {
        let mut builder = Builder::new();

        for table in &self.tables {
            builder.table(table.clone());
        }

        for class in &self.classes {
            builder.class_map(class.clone())?;
        }

        for (element, target) in &self.use_class_maps {
            builder.use_class_map(element.clone(), target.clone())?;
        }

        Ok(builder)
    }

    /// Compiles the description into a validated schema.
    pub fn compile(&self) -> Result<Schema> {
        self.builder()?.build()
    }
}
