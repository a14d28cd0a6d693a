use super::{Formatter, Params, ToSql};

use xmlrel_core::schema::db::Type;

impl ToSql for &Type {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, self.sql_name());
    }
}
