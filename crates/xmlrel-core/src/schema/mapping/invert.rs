use super::{
    ClassTableMap, ColumnMap, InlineStep, Mapping, PropertyTableMap, RelatedClassTableMap,
};
use crate::{
    schema::{
        db,
        xml::{self, ChildMap, ClassMapId, Content, PropertyMap},
    },
    Error, Result,
};

/// Derives the table-centric view from the class-centric view.
///
/// Every class map with a table contributes its (inherited) content to the
/// class table map of that table. Class maps sharing a table must belong to
/// one inheritance chain.
pub fn invert(xml: &xml::Schema, db: &db::Schema) -> Result<Mapping> {
    let mut mapping = Mapping::default();

    for class in xml.class_maps() {
        let Some(table) = class.table else {
            continue;
        };

        let root = base_most(xml, class.id);

        let class_table = mapping
            .tables
            .entry(table)
            .or_insert_with(|| ClassTableMap {
                table,
                class: root,
                element: xml.class(root).element.clone(),
                columns: vec![],
                property_tables: vec![],
                related: vec![],
            });

        if class_table.class != root {
            return Err(Error::invalid_mapping(format!(
                "table `{}` is mapped by unrelated class maps `{}` and `{}`",
                db.table(table).name,
                class_table.element,
                class.element
            )));
        }

        let mut path = vec![];
        collect(xml, &class.content, &mut path, class_table);
    }

    Ok(mapping)
}

fn base_most(xml: &xml::Schema, mut id: ClassMapId) -> ClassMapId {
    // Base chains are cycle checked by the builder.
    while let Some(base) = xml.class(id).base {
        id = base;
    }
    id
}

fn collect(
    xml: &xml::Schema,
    content: &Content,
    path: &mut Vec<InlineStep>,
    class_table: &mut ClassTableMap,
) {
    for map in content.attributes.values() {
        push_property(map, path, class_table);
    }

    if let Some(map) = &content.pcdata {
        push_property(map, path, class_table);
    }

    for child in content.children.values() {
        match child {
            ChildMap::Property(map) => push_property(map, path, class_table),
            ChildMap::RelatedClass(related) => {
                let exists = class_table
                    .related
                    .iter()
                    .any(|existing| existing.element == related.element && existing.path == *path);

                if !exists {
                    class_table.related.push(RelatedClassTableMap {
                        element: related.element.clone(),
                        class: related.class,
                        table: xml.class(related.class).expect_table(),
                        link: related.link,
                        order: related.order,
                        path: path.clone(),
                    });
                }
            }
            ChildMap::InlineClass(inline) => {
                path.push(InlineStep {
                    element: inline.element.clone(),
                    order: inline.order,
                });
                collect(xml, &inline.content, path, class_table);
                path.pop();
            }
        }
    }
}

fn push_property(map: &PropertyMap, path: &[InlineStep], class_table: &mut ClassTableMap) {
    let column = ColumnMap {
        column: map.column,
        property: map.name.clone(),
        kind: map.kind,
        multi_valued: map.multi_valued,
        order: map.order,
        path: path.to_vec(),
    };

    match map.property_table {
        Some(property_table) => {
            let exists = class_table
                .property_tables
                .iter()
                .any(|existing| existing.column.column == map.column);

            if !exists {
                class_table.property_tables.push(PropertyTableMap {
                    table: property_table.table,
                    link: property_table.link,
                    column,
                });
            }
        }
        None => {
            if class_table.column_map(map.column).is_none() {
                class_table.columns.push(column);
            }
        }
    }
}
