use super::{Comma, Formatter, Params, ToSql};

use xmlrel_core::driver::operation::Insert;

impl ToSql for &Insert {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let serializer = f.serializer;
        let table = serializer.table(self.table);
        let columns = Comma(table.columns.iter().map(|column| serializer.column_name(column.id)));
        let values = Comma(self.values.iter());
        let name = &table.name;

        fmt!(f, "INSERT INTO " name " (" columns ") VALUES (" values ")");
    }
}
