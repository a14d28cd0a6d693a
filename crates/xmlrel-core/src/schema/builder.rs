mod content;

mod def;
pub use def::{
    ChildDef, ClassDef, ColumnDef, ContentDef, ElementPropertyDef, InlineDef, KeyDef, LinkDef,
    OrderDef, PropertyDef, PropertyTableDef, RelatedDef, TableDef,
};

use super::{
    db::{self, Column, ColumnId, Key, KeyGeneration, KeyId, KeyKind, Table, TableId, TableName},
    mapping,
    xml::{self, ClassMap, ClassMapId, ClassMapKind, ElementRef},
    Schema, XmlName,
};
use crate::{convert::DateTimeFormatter, Error, Result};

use indexmap::IndexMap;
use std::{collections::HashSet, sync::Arc};
use tracing::debug;

/// Collects table and class map declarations and compiles them into a
/// [`Schema`].
///
/// Declarations refer to tables, columns and keys by name. Names are
/// resolved, and the resulting map validated, by [`Builder::build`].
#[derive(Debug, Default, Clone)]
pub struct Builder {
    tables: Vec<TableDef>,

    classes: IndexMap<XmlName, ClassDef>,

    /// "Use class map" delegations, element to target element.
    delegates: IndexMap<XmlName, XmlName>,
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    builder: &'a Builder,

    /// Tables as they are built
    tables: Vec<Table>,

    /// Class maps are assigned identifiers up front so that related class
    /// maps can point at classes declared later.
    class_ids: IndexMap<XmlName, ClassMapId>,

    /// Element type lookup, direct and delegated
    elements: IndexMap<XmlName, ElementRef>,

    /// Base class map of each class map, by class map index
    bases: Vec<Option<ClassMapId>>,

    /// Table of each class map, inherited tables included
    class_tables: Vec<Option<TableId>>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&mut self, table: TableDef) -> &mut Self {
        self.tables.push(table);
        self
    }

    /// Declares a class map. An element type may be mapped only once,
    /// either directly or by delegation.
    pub fn class_map(&mut self, class: ClassDef) -> Result<&mut Self> {
        if self.classes.contains_key(&class.element) || self.delegates.contains_key(&class.element)
        {
            return Err(Error::invalid_mapping(format!(
                "element type `{}` is mapped more than once",
                class.element
            )));
        }

        self.classes.insert(class.element.clone(), class);
        Ok(self)
    }

    /// Maps `element` with the class map of `target` ("use class map").
    ///
    /// Fails when the delegation would close a cycle.
    pub fn use_class_map(
        &mut self,
        element: impl Into<XmlName>,
        target: impl Into<XmlName>,
    ) -> Result<&mut Self> {
        let element = element.into();
        let target = target.into();

        if self.classes.contains_key(&element) || self.delegates.contains_key(&element) {
            return Err(Error::invalid_mapping(format!(
                "element type `{element}` is mapped more than once"
            )));
        }

        let mut visited = HashSet::new();
        let mut current = &target;

        loop {
            if *current == element || !visited.insert(current) {
                return Err(Error::invalid_mapping(format!(
                    "using the class map of `{target}` for `{element}` creates a delegation cycle"
                )));
            }

            match self.delegates.get(current) {
                Some(next) => current = next,
                None => break,
            }
        }

        self.delegates.insert(element, target);
        Ok(self)
    }

    /// Declares the wrapper element that holds several independent roots.
    pub fn ignored_root(&mut self, element: impl Into<XmlName>) -> Result<&mut Self> {
        self.class_map(ClassDef::ignored_root(element))
    }

    /// Declares an element whose children would be promoted into its parent.
    /// Storing a document that contains one fails.
    pub fn pass_through(&mut self, element: impl Into<XmlName>) -> Result<&mut Self> {
        self.class_map(ClassDef::pass_through(element))
    }

    pub fn build(&self) -> Result<Schema> {
        let mut builder = BuildSchema {
            builder: self,
            tables: vec![],
            class_ids: IndexMap::new(),
            elements: IndexMap::new(),
            bases: vec![],
            class_tables: vec![],
        };

        for (index, def) in self.tables.iter().enumerate() {
            let table = builder
                .build_table(TableId(index), def)
                .map_err(|err| err.context(format!("table `{}`", def.name)))?;
            builder.tables.push(table);
        }

        builder.register_elements()?;
        builder.resolve_class_tables()?;

        let class_maps = builder.build_class_maps()?;

        let xml = xml::Schema {
            class_maps,
            elements: builder.elements,
        };

        let db = Arc::new(db::Schema {
            tables: builder.tables,
        });

        let mapping = mapping::invert(&xml, &db)?;

        let schema = Schema { xml, db, mapping };

        // Verify the schema structure
        schema.verify()?;

        debug!(
            tables = schema.db.tables.len(),
            class_maps = schema.xml.class_maps.len(),
            "built mapping"
        );

        Ok(schema)
    }
}

impl BuildSchema<'_> {
    fn build_table(&self, id: TableId, def: &TableDef) -> Result<Table> {
        let name = TableName::from(def.name.as_str());

        if self.tables.iter().any(|table| table.name == name) {
            return Err(Error::invalid_mapping("table is declared more than once"));
        }

        let mut columns: Vec<Column> = vec![];

        for (index, column) in def.columns.iter().enumerate() {
            if columns.iter().any(|existing| existing.name == column.name) {
                return Err(Error::invalid_mapping(format!(
                    "column `{}` is declared more than once",
                    column.name
                )));
            }

            let formatter = match (&column.formatter, &column.format) {
                (Some(formatter), _) => Some(formatter.clone()),
                (None, Some(pattern)) => {
                    Some(Arc::new(DateTimeFormatter::new(pattern.clone())) as Arc<_>)
                }
                (None, None) => None,
            };

            columns.push(Column {
                id: ColumnId { table: id, index },
                name: column.name.clone(),
                ty: column.ty.clone(),
                nullable: column.nullable,
                formatter,
            });
        }

        let mut keys: Vec<Key> = vec![];
        let mut primary_key = None;

        for (index, key) in def.keys.iter().enumerate() {
            let key_id = KeyId { table: id, index };

            if keys.iter().any(|existing| existing.name == key.name) {
                return Err(Error::invalid_mapping(format!(
                    "key `{}` is declared more than once",
                    key.name
                )));
            }

            if key.columns.is_empty() {
                return Err(Error::invalid_mapping(format!(
                    "key `{}` has no columns",
                    key.name
                )));
            }

            let key_columns = key
                .columns
                .iter()
                .map(|name| {
                    columns
                        .iter()
                        .find(|column| column.name == *name)
                        .map(|column| column.id)
                        .ok_or_else(|| {
                            Error::invalid_mapping(format!(
                                "key `{}` names unknown column `{name}`",
                                key.name
                            ))
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            if key.generated && !key.kind.is_unique() {
                return Err(Error::invalid_mapping(format!(
                    "foreign key `{}` cannot be generated",
                    key.name
                )));
            }

            if key.kind == KeyKind::Primary {
                if primary_key.is_some() {
                    return Err(Error::invalid_mapping("table has more than one primary key"));
                }
                primary_key = Some(key_id);
            }

            keys.push(Key {
                id: key_id,
                name: key.name.clone(),
                kind: key.kind,
                columns: key_columns,
                generation: if key.generated {
                    KeyGeneration::Generated
                } else {
                    KeyGeneration::Supplied
                },
            });
        }

        Ok(Table {
            id,
            name,
            columns,
            keys,
            primary_key,
        })
    }

    fn register_elements(&mut self) -> Result<()> {
        for (index, element) in self.builder.classes.keys().enumerate() {
            self.class_ids.insert(element.clone(), ClassMapId(index));
            self.elements
                .insert(element.clone(), ElementRef::Direct(ClassMapId(index)));
        }

        for (element, target) in &self.builder.delegates {
            self.elements
                .insert(element.clone(), ElementRef::Delegate(target.clone()));
        }

        // Every delegation chain must end at a declared class map.
        for (element, target) in &self.builder.delegates {
            if self.resolve_element(element).is_none() {
                return Err(Error::invalid_mapping(format!(
                    "element type `{element}` uses the class map of `{target}`, which is not mapped"
                )));
            }
        }

        Ok(())
    }

    fn resolve_element(&self, element: &XmlName) -> Option<ClassMapId> {
        let mut current = element;

        for _ in 0..=self.elements.len() {
            match self.elements.get(current)? {
                ElementRef::Direct(id) => return Some(*id),
                ElementRef::Delegate(target) => current = target,
            }
        }

        None
    }

    /// Resolves every class map's base and table. Content is resolved
    /// against the class table, which a derived class map may inherit.
    fn resolve_class_tables(&mut self) -> Result<()> {
        let defs: Vec<&ClassDef> = self.builder.classes.values().collect();

        for def in &defs {
            let base = match &def.extends {
                Some(base) => Some(self.resolve_element(base).ok_or_else(|| {
                    Error::invalid_mapping(format!(
                        "class map `{}` extends unmapped element type `{base}`",
                        def.element
                    ))
                })?),
                None => None,
            };
            self.bases.push(base);
        }

        for (index, def) in defs.iter().enumerate() {
            let table = self
                .class_table(&defs, ClassMapId(index))
                .map_err(|err| err.context(format!("class map `{}`", def.element)))?;
            self.class_tables.push(table);
        }

        Ok(())
    }

    fn build_class_maps(&self) -> Result<Vec<ClassMap>> {
        let mut ignored_root = None;
        let mut class_maps = Vec::with_capacity(self.builder.classes.len());

        for (index, def) in self.builder.classes.values().enumerate() {
            let id = ClassMapId(index);
            let table = self.class_tables[index];

            self.verify_kind(def, table)
                .map_err(|err| err.context(format!("class map `{}`", def.element)))?;

            if def.kind == ClassMapKind::IgnoredRoot {
                if let Some(existing) = ignored_root.replace(&def.element) {
                    return Err(Error::invalid_mapping(format!(
                        "both `{existing}` and `{}` are mapped as ignored roots",
                        def.element
                    )));
                }
            }

            let content = match table {
                Some(table) => self
                    .build_content(&def.content, table, &def.element)
                    .map_err(|err| err.context(format!("class map `{}`", def.element)))?,
                None => xml::Content::default(),
            };

            class_maps.push(ClassMap {
                id,
                element: def.element.clone(),
                kind: def.kind,
                table,
                base: self.bases[index],
                content,
            });
        }

        // Derived class maps inherit whatever they do not define, nearest
        // base first.
        let own: Vec<xml::Content> = class_maps.iter().map(|class| class.content.clone()).collect();

        for class in &mut class_maps {
            let mut base = class.base;
            while let Some(id) = base {
                class.content.inherit(&own[id.0]);
                base = self.bases[id.0];
            }
        }

        Ok(class_maps)
    }

    /// Table of a class map, taken from the base chain when not declared.
    fn class_table(&self, defs: &[&ClassDef], id: ClassMapId) -> Result<Option<TableId>> {
        let mut table = None;
        let mut visited = HashSet::new();
        let mut current = Some(id);

        while let Some(class) = current {
            if !visited.insert(class) {
                return Err(Error::invalid_mapping("base class maps form a cycle"));
            }

            if let Some(name) = &defs[class.0].table {
                let resolved = self.table_id(name)?;

                match table {
                    None => table = Some(resolved),
                    Some(existing) if existing != resolved => {
                        return Err(Error::invalid_mapping(format!(
                            "base class map `{}` is mapped to a different table; only single-table inheritance is supported",
                            defs[class.0].element
                        )))
                    }
                    Some(_) => {}
                }
            }

            current = self.bases[class.0];
        }

        Ok(table)
    }

    fn verify_kind(&self, def: &ClassDef, table: Option<TableId>) -> Result<()> {
        match (def.kind.has_table(), table) {
            (true, None) => {
                return Err(Error::invalid_mapping(format!(
                    "{:?} class map must name a table",
                    def.kind
                )))
            }
            (false, Some(_)) => {
                return Err(Error::invalid_mapping(format!(
                    "{:?} class map must not name a table",
                    def.kind
                )))
            }
            _ => {}
        }

        if !def.kind.has_table() && !def.content.is_empty() {
            return Err(Error::invalid_mapping(format!(
                "{:?} class map cannot map content",
                def.kind
            )));
        }

        if def.kind == ClassMapKind::RootTable {
            if let Some(table) = table {
                if self.tables[table.0].primary_key.is_none() {
                    return Err(Error::invalid_mapping(format!(
                        "root table `{}` has no primary key",
                        self.tables[table.0].name
                    )));
                }
            }
        }

        Ok(())
    }

    fn table_id(&self, name: &str) -> Result<TableId> {
        self.tables
            .iter()
            .find(|table| table.name.matches(name))
            .map(|table| table.id)
            .ok_or_else(|| Error::invalid_mapping(format!("unknown table `{name}`")))
    }

    fn column(&self, table: TableId, name: &str) -> Result<ColumnId> {
        let table = &self.tables[table.0];
        table
            .column_by_name(name)
            .map(|column| column.id)
            .ok_or_else(|| {
                Error::invalid_mapping(format!(
                    "table `{}` has no column `{name}`",
                    table.name
                ))
            })
    }

    fn key(&self, table: TableId, name: &str) -> Result<&Key> {
        let table = &self.tables[table.0];
        table.key_by_name(name).ok_or_else(|| {
            Error::invalid_mapping(format!("table `{}` has no key `{name}`", table.name))
        })
    }
}
