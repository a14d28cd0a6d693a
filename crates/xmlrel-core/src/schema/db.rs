mod column;
pub use column::{Column, ColumnId};

mod key;
pub use key::{Key, KeyGeneration, KeyId, KeyKind};

mod schema;
pub use schema::Schema;

mod table;
pub use table::{Table, TableId, TableName};

mod ty;
pub use ty::Type;
