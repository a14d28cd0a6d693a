use crate::schema::{
    db::{ColumnId, TableId},
    xml::{ClassMapId, PropertyKind},
    LinkInfo, OrderInfo, XmlName,
};

/// Everything stored in, or reached from, one class table.
#[derive(Debug, Clone)]
pub struct ClassTableMap {
    pub table: TableId,

    /// The base-most class map mapped to the table.
    pub class: ClassMapId,

    /// Element created for a row when no link names another one.
    pub element: XmlName,

    /// Properties stored in the class table itself.
    pub columns: Vec<ColumnMap>,

    /// Properties stored in side tables, one row per value.
    pub property_tables: Vec<PropertyTableMap>,

    /// Nested classes stored in linked class tables.
    pub related: Vec<RelatedClassTableMap>,
}

/// A column holding the value of a single XML construct.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub column: ColumnId,

    /// Name of the attribute or element. For PCDATA, the element holding the
    /// text.
    pub property: XmlName,

    pub kind: PropertyKind,

    pub multi_valued: bool,

    pub order: Option<OrderInfo>,

    /// Inline wrapper elements between the class element and the property,
    /// outermost first.
    pub path: Vec<InlineStep>,
}

/// One inline wrapper element on the way from a class element to a
/// property or related class.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineStep {
    pub element: XmlName,
    pub order: Option<OrderInfo>,
}

#[derive(Debug, Clone)]
pub struct PropertyTableMap {
    pub table: TableId,

    /// Class table (parent) to property table (child).
    pub link: LinkInfo,

    /// The value column, which lives in `table`.
    pub column: ColumnMap,
}

#[derive(Debug, Clone)]
pub struct RelatedClassTableMap {
    /// Element created for each related row.
    pub element: XmlName,

    pub class: ClassMapId,

    pub table: TableId,

    /// Class table (parent) to related class table (child).
    pub link: LinkInfo,

    pub order: Option<OrderInfo>,

    pub path: Vec<InlineStep>,
}

impl ClassTableMap {
    pub fn columns(&self) -> impl Iterator<Item = &ColumnMap> {
        self.columns.iter()
    }

    pub fn property_tables(&self) -> impl Iterator<Item = &PropertyTableMap> {
        self.property_tables.iter()
    }

    pub fn related(&self) -> impl Iterator<Item = &RelatedClassTableMap> {
        self.related.iter()
    }

    /// Returns the column map of `column`, if the column holds a property.
    pub fn column_map(&self, column: ColumnId) -> Option<&ColumnMap> {
        self.columns.iter().find(|map| map.column == column)
    }
}
