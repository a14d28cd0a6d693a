use crate::{
    convert::ValueFormatter,
    schema::{
        db::{KeyKind, Type},
        xml::ClassMapKind,
        XmlName,
    },
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Declares a table. Names are resolved when the schema is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDef {
    /// Table name, optionally qualified as `catalog.schema.table`.
    pub name: String,

    pub columns: Vec<ColumnDef>,

    #[serde(default)]
    pub keys: Vec<KeyDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: Type,

    #[serde(default = "default_true")]
    pub nullable: bool,

    /// `chrono` format pattern for date and time columns.
    #[serde(default)]
    pub format: Option<String>,

    #[serde(skip)]
    pub formatter: Option<Arc<dyn ValueFormatter>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDef {
    pub name: String,

    pub kind: KeyKind,

    pub columns: Vec<String>,

    /// Values come from the key generator rather than the document.
    #[serde(default)]
    pub generated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub element: XmlName,

    pub kind: ClassMapKind,

    #[serde(default)]
    pub table: Option<String>,

    /// Element type of the base class map.
    #[serde(default)]
    pub extends: Option<XmlName>,

    #[serde(flatten)]
    pub content: ContentDef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentDef {
    #[serde(default)]
    pub attributes: IndexMap<XmlName, PropertyDef>,

    #[serde(default)]
    pub pcdata: Option<PropertyDef>,

    #[serde(default)]
    pub children: Vec<ChildDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Value column, in the class table or in `property_table`.
    pub column: String,

    #[serde(default)]
    pub property_table: Option<PropertyTableDef>,

    #[serde(default)]
    pub order: Option<OrderDef>,

    #[serde(default)]
    pub multi_valued: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyTableDef {
    pub table: String,
    pub link: LinkDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "map", rename_all = "snake_case")]
pub enum ChildDef {
    Property(ElementPropertyDef),
    RelatedClass(RelatedDef),
    InlineClass(InlineDef),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementPropertyDef {
    pub element: XmlName,

    #[serde(flatten)]
    pub property: PropertyDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedDef {
    /// The child element. Its class map is found through any delegation.
    pub element: XmlName,

    pub link: LinkDef,

    #[serde(default)]
    pub order: Option<OrderDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineDef {
    pub element: XmlName,

    #[serde(flatten)]
    pub content: ContentDef,

    #[serde(default)]
    pub order: Option<OrderDef>,
}

/// Names the keys of a link. `parent_key` belongs to the containing class
/// table, `child_key` to the related or property table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDef {
    pub parent_key: String,
    pub child_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDef {
    Fixed(i64),
    Column {
        name: String,

        #[serde(default = "default_true")]
        ascending: bool,

        #[serde(default = "default_true")]
        generate: bool,
    },
}

fn default_true() -> bool {
    true
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: vec![],
            keys: vec![],
        }
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn key(mut self, key: KeyDef) -> Self {
        self.keys.push(key);
        self
    }
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
            format: None,
            formatter: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn format(mut self, pattern: impl Into<String>) -> Self {
        self.format = Some(pattern.into());
        self
    }

    pub fn formatter(mut self, formatter: Arc<dyn ValueFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

impl KeyDef {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        kind: KeyKind,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            columns: columns.into_iter().map(Into::into).collect(),
            generated: false,
        }
    }

    pub fn primary<S: Into<String>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(name, KeyKind::Primary, columns)
    }

    pub fn unique<S: Into<String>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(name, KeyKind::Unique, columns)
    }

    pub fn foreign<S: Into<String>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(name, KeyKind::Foreign, columns)
    }

    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }
}

impl ClassDef {
    pub fn new(element: impl Into<XmlName>, kind: ClassMapKind) -> Self {
        Self {
            element: element.into(),
            kind,
            table: None,
            extends: None,
            content: ContentDef::default(),
        }
    }

    pub fn root_table(element: impl Into<XmlName>, table: impl Into<String>) -> Self {
        Self::new(element, ClassMapKind::RootTable).table(table)
    }

    pub fn class_table(element: impl Into<XmlName>, table: impl Into<String>) -> Self {
        Self::new(element, ClassMapKind::ClassTable).table(table)
    }

    pub fn ignored_root(element: impl Into<XmlName>) -> Self {
        Self::new(element, ClassMapKind::IgnoredRoot)
    }

    pub fn pass_through(element: impl Into<XmlName>) -> Self {
        Self::new(element, ClassMapKind::PassThrough)
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn extends(mut self, base: impl Into<XmlName>) -> Self {
        self.extends = Some(base.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<XmlName>, property: PropertyDef) -> Self {
        self.content = self.content.attribute(name, property);
        self
    }

    pub fn pcdata(mut self, property: PropertyDef) -> Self {
        self.content = self.content.pcdata(property);
        self
    }

    pub fn child(mut self, child: ChildDef) -> Self {
        self.content = self.content.child(child);
        self
    }
}

impl ContentDef {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.pcdata.is_none() && self.children.is_empty()
    }

    pub fn attribute(mut self, name: impl Into<XmlName>, property: PropertyDef) -> Self {
        self.attributes.insert(name.into(), property);
        self
    }

    pub fn pcdata(mut self, property: PropertyDef) -> Self {
        self.pcdata = Some(property);
        self
    }

    pub fn child(mut self, child: ChildDef) -> Self {
        self.children.push(child);
        self
    }
}

impl PropertyDef {
    pub fn column(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            property_table: None,
            order: None,
            multi_valued: false,
        }
    }

    /// Stores the value in `table`, reached from the class table through
    /// `link`.
    pub fn in_table(mut self, table: impl Into<String>, link: LinkDef) -> Self {
        self.property_table = Some(PropertyTableDef {
            table: table.into(),
            link,
        });
        self
    }

    pub fn order(mut self, order: OrderDef) -> Self {
        self.order = Some(order);
        self
    }

    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }
}

impl ChildDef {
    pub fn property(element: impl Into<XmlName>, property: PropertyDef) -> Self {
        Self::Property(ElementPropertyDef {
            element: element.into(),
            property,
        })
    }

    pub fn related(element: impl Into<XmlName>, link: LinkDef) -> Self {
        Self::RelatedClass(RelatedDef {
            element: element.into(),
            link,
            order: None,
        })
    }

    pub fn inline(element: impl Into<XmlName>, content: ContentDef) -> Self {
        Self::InlineClass(InlineDef {
            element: element.into(),
            content,
            order: None,
        })
    }

    /// Sets the order of a related or inline class. Element properties
    /// carry their order on the [`PropertyDef`].
    pub fn order(mut self, order: OrderDef) -> Self {
        match &mut self {
            Self::Property(def) => def.property.order = Some(order),
            Self::RelatedClass(def) => def.order = Some(order),
            Self::InlineClass(def) => def.order = Some(order),
        }
        self
    }

    pub fn element(&self) -> &XmlName {
        match self {
            Self::Property(def) => &def.element,
            Self::RelatedClass(def) => &def.element,
            Self::InlineClass(def) => &def.element,
        }
    }
}

impl LinkDef {
    pub fn new(parent_key: impl Into<String>, child_key: impl Into<String>) -> Self {
        Self {
            parent_key: parent_key.into(),
            child_key: child_key.into(),
        }
    }
}

impl OrderDef {
    /// A generated, ascending order column.
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            name: name.into(),
            ascending: true,
            generate: true,
        }
    }

    pub fn descending(self) -> Self {
        match self {
            Self::Column { name, generate, .. } => Self::Column {
                name,
                ascending: false,
                generate,
            },
            fixed => fixed,
        }
    }

    /// The column is populated by another mapping rather than generated.
    pub fn supplied(self) -> Self {
        match self {
            Self::Column {
                name, ascending, ..
            } => Self::Column {
                name,
                ascending,
                generate: false,
            },
            fixed => fixed,
        }
    }
}
