use crate::schema::{
    db::{ColumnId, TableId},
    LinkInfo, OrderInfo, XmlName,
};

use serde::{Deserialize, Serialize};

/// Maps a single XML construct (attribute, PCDATA or element-as-property) to
/// a column.
#[derive(Debug, Clone)]
pub struct PropertyMap {
    /// Name of the attribute or element. For PCDATA, the name of the element
    /// containing the text.
    pub name: XmlName,

    pub kind: PropertyKind,

    /// Column holding the value. Belongs to the class table, or to the
    /// property table when `property_table` is set.
    pub column: ColumnId,

    /// Side table holding one row per value.
    pub property_table: Option<PropertyTable>,

    pub order: Option<OrderInfo>,

    /// The attribute value is a whitespace separated token list (IDREFS,
    /// NMTOKENS) stored one token per property table row.
    pub multi_valued: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Element,
    Attribute,
    Pcdata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyTable {
    pub table: TableId,

    /// Keys joining the class table (parent) to the property table (child).
    pub link: LinkInfo,
}

impl PropertyMap {
    /// Table the value column lives in, given the class table.
    pub fn value_table(&self, class_table: TableId) -> TableId {
        self.property_table
            .map(|property_table| property_table.table)
            .unwrap_or(class_table)
    }
}
