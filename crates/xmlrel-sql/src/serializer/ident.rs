use super::{Flavor, Formatter, Params, Period, ToSql};

use xmlrel_core::schema::db::TableName;

/// A quoted identifier. Embedded quote characters are doubled.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let quote = f.serializer.quote;

        f.dst.push(quote);
        for c in self.0.as_ref().chars() {
            if c == quote {
                f.dst.push(quote);
            }
            f.dst.push(c);
        }
        f.dst.push(quote);
    }
}

impl ToSql for &TableName {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match f.serializer.flavor {
            // SQLite has no catalogs or schemas; qualifiers would name
            // attached databases.
            Flavor::Sqlite => fmt!(f, Ident(&self.name)),
            Flavor::Postgresql | Flavor::Mysql => fmt!(f, Period(self.parts().map(Ident))),
        }
    }
}
