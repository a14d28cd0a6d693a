use super::{
    db::{ColumnId, KeyId, TableId},
    mapping::ColumnMap,
    xml::{ChildMap, Content},
    LinkInfo, OrderInfo, Schema,
};
use crate::{Error, Result};

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        debug_assert!(self.verify_ids_populated());

        self.verify_class_tables_are_mapped()?;

        for class_table in self.schema.mapping.class_tables() {
            for column in class_table.columns() {
                self.verify_column_map(class_table.table, column)?;
            }

            for property_table in class_table.property_tables() {
                self.verify_link(&property_table.link, class_table.table, property_table.table);
                self.verify_column_map(property_table.table, &property_table.column)?;
            }

            for related in class_table.related() {
                self.verify_link(&related.link, class_table.table, related.table);
            }
        }

        for class in self.schema.xml.class_maps() {
            self.verify_content_orders(&class.content);
        }

        Ok(())
    }

    fn verify_ids_populated(&self) -> bool {
        for (index, class) in self.schema.xml.class_maps.iter().enumerate() {
            assert_eq!(class.id.0, index);
        }

        for (index, table) in self.schema.db.tables.iter().enumerate() {
            assert_eq!(table.id, TableId(index));

            for (index, column) in table.columns.iter().enumerate() {
                assert_eq!(column.id, ColumnId { table: table.id, index });
            }

            for (index, key) in table.keys.iter().enumerate() {
                assert_eq!(key.id, KeyId { table: table.id, index });
            }
        }

        true
    }

    /// Both views agree: every class map with a table has a class table map
    /// for it.
    fn verify_class_tables_are_mapped(&self) -> Result<()> {
        for class in self.schema.xml.class_maps() {
            let Some(table) = class.table else {
                continue;
            };

            if self.schema.mapping.class_table(table).is_none() {
                return Err(Error::invalid_mapping(format!(
                    "class map `{}` has no class table map for `{}`",
                    class.element,
                    self.schema.db.table(table).name
                )));
            }
        }

        Ok(())
    }

    /// A column map points into its table and back at a property of some
    /// class map.
    fn verify_column_map(&self, table: TableId, map: &ColumnMap) -> Result<()> {
        assert_eq!(map.column.table, table, "column map in wrong table");

        let found = self
            .schema
            .xml
            .class_maps()
            .any(|class| content_has_column(&class.content, map.column));

        if !found {
            return Err(Error::invalid_mapping(format!(
                "column `{}` has no matching property",
                self.schema.db.column(map.column).name
            )));
        }

        Ok(())
    }

    fn verify_link(&self, link: &LinkInfo, parent: TableId, child: TableId) {
        assert_eq!(link.parent_key.table, parent, "link parent key in wrong table");
        assert_eq!(link.child_key.table, child, "link child key in wrong table");
    }

    fn verify_content_orders(&self, content: &Content) {
        for child in content.children.values() {
            if let Some(OrderInfo::Column { column, .. }) = child.order() {
                // Resolving the column panics on a dangling ID.
                let _ = self.schema.db.column(*column);
            }

            if let ChildMap::InlineClass(inline) = child {
                self.verify_content_orders(&inline.content);
            }
        }
    }
}

fn content_has_column(content: &Content, column: ColumnId) -> bool {
    content.attributes.values().any(|map| map.column == column)
        || content.pcdata.as_ref().is_some_and(|map| map.column == column)
        || content.children.values().any(|child| match child {
            ChildMap::Property(map) => map.column == column,
            ChildMap::InlineClass(inline) => content_has_column(&inline.content, column),
            ChildMap::RelatedClass(_) => false,
        })
}
