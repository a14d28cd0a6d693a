use super::db::ColumnId;

/// How the relative position of a mapped construct among its siblings is
/// known.
///
/// The two representations are mutually exclusive; replacing one with the
/// other is a plain assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderInfo {
    /// Order implied by the content model. Not persisted.
    Fixed(i64),

    /// Order persisted in a column.
    Column {
        column: ColumnId,

        /// When false, larger values come first.
        ascending: bool,

        /// When true, the value is the construct's document position and is
        /// written by the transformer. When false, the column is populated
        /// from the document by some other mapping.
        generate: bool,
    },
}

impl OrderInfo {
    pub fn column(&self) -> Option<ColumnId> {
        match *self {
            OrderInfo::Column { column, .. } => Some(column),
            OrderInfo::Fixed(_) => None,
        }
    }

    /// Returns the order column when its value is written by the transformer.
    pub fn generated_column(&self) -> Option<ColumnId> {
        match *self {
            OrderInfo::Column {
                column,
                generate: true,
                ..
            } => Some(column),
            _ => None,
        }
    }

    pub fn is_ascending(&self) -> bool {
        match *self {
            OrderInfo::Column { ascending, .. } => ascending,
            OrderInfo::Fixed(_) => true,
        }
    }
}
