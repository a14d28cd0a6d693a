use super::{Comma, Formatter, Params, ToSql};

use xmlrel_core::{
    driver::operation::{Direction, Select},
    schema::db::ColumnId,
    stmt::Value,
};

struct Filter<'a>(&'a [(ColumnId, Value)]);

impl ToSql for &Select {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let serializer = f.serializer;
        let table = serializer.table(self.table);
        let columns = Comma(table.columns.iter().map(|column| serializer.column_name(column.id)));

        let name = &table.name;

        fmt!(f, "SELECT " columns " FROM " name);

        if !self.filter.is_empty() {
            fmt!(f, " WHERE " Filter(&self.filter));
        }

        if let Some(order_by) = &self.order_by {
            let direction = match order_by.direction {
                Direction::Asc => " ASC",
                Direction::Desc => " DESC",
            };
            fmt!(f, " ORDER BY " serializer.column_name(order_by.column) direction);
        }
    }
}

impl ToSql for Filter<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let mut s = "";
        for (column, value) in self.0 {
            fmt!(f, s f.serializer.column_name(*column));

            if value.is_null() {
                fmt!(f, " IS NULL");
            } else {
                fmt!(f, " = " value);
            }

            s = " AND ";
        }
    }
}
