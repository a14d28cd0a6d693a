use super::{Comma, Formatter, Params, ToSql};

use xmlrel_core::schema::db::{Column, Key, KeyKind, Table};

struct ColumnsWithConstraints<'a>(&'a Table);

struct KeyConstraint<'a>(&'a Key);

impl ToSql for &Table {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let columns = ColumnsWithConstraints(self);
        let name = &self.name;

        fmt!(f, "CREATE TABLE " name " (" columns ")");
    }
}

impl ToSql for ColumnsWithConstraints<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, Comma(&self.0.columns));

        for key in &self.0.keys {
            if key.kind.is_unique() {
                fmt!(f, ", " KeyConstraint(key));
            }
        }
    }
}

impl ToSql for &Column {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let ty = &self.ty;

        fmt!(f, f.serializer.column_name(self.id) " " ty);

        if !self.nullable {
            fmt!(f, " NOT NULL");
        }
    }
}

impl ToSql for KeyConstraint<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let serializer = f.serializer;
        let columns = Comma(self.0.columns.iter().map(|id| serializer.column_name(*id)));

        let kind = if self.0.kind == KeyKind::Primary {
            "PRIMARY KEY ("
        } else {
            "UNIQUE ("
        };

        fmt!(f, kind columns ")");
    }
}
