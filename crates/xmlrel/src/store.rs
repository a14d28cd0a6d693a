use crate::{
    keys::{copy_key, KeyResolver},
    row::Row,
    transfer::{CommitMode, DocumentLocationInfo, Options, RootLocation},
};

use async_recursion::async_recursion;
use tracing::{debug, trace};
use xmlrel_core::{
    convert,
    driver::{
        operation::{Insert, Transaction},
        Connection, KeyGenerator, Operation, Response,
    },
    schema::{
        db::{Column, ColumnId, KeyId, Table},
        xml::{
            ChildMap, ClassMap, ClassMapKind, Content, PropertyMap, PropertyTable,
            RelatedClassMap,
        },
        OrderInfo, XmlName,
    },
    stmt::{Value, ValueRecord},
    Document, Error, NodeId, NodeKind, Result, Schema,
};

/// Writes the rows of one document.
///
/// Elements are visited depth first, in document order. A row is inserted
/// once every value it holds is known, which is not always document order:
/// a child holding the unique side of its link is written before its parent
/// row, and a child referencing its parent's key is deferred until the
/// parent row is written.
pub(crate) struct Store<'a> {
    schema: &'a Schema,
    doc: &'a (dyn Document + Sync),
    connection: &'a mut dyn Connection,
    keys: KeyResolver<'a>,
    options: &'a Options,
}

/// A class row under construction, with the children waiting for it.
struct Frame<'a> {
    row: Row,

    /// Keys of `row` that linked rows copy from.
    needed: Vec<KeyId>,

    /// Children written after `row`, most recent last.
    pending: Vec<Pending<'a>>,
}

/// A child whose row copies its parent's key and so waits for the parent
/// row to be written.
#[derive(Debug)]
enum Pending<'a> {
    Class {
        node: NodeId,
        map: &'a RelatedClassMap,
        position: i64,
    },
    Property {
        map: &'a PropertyMap,
        table: PropertyTable,
        text: String,
        position: Option<i64>,
    },
}

/// How a class row attaches to the row of its parent element.
#[derive(Debug, Default)]
struct Placement {
    /// This row's foreign key and the parent key values to copy into it.
    foreign_key: Option<(KeyId, ValueRecord)>,

    /// This row's unique key, which the parent row copies from.
    unique_key: Option<KeyId>,

    /// Generated order value held by this row.
    order: Option<(ColumnId, Value)>,
}

impl<'a> Store<'a> {
    pub(crate) fn new(
        schema: &'a Schema,
        doc: &'a (dyn Document + Sync),
        connection: &'a mut dyn Connection,
        key_generator: Option<&'a mut Box<dyn KeyGenerator>>,
        options: &'a Options,
    ) -> Store<'a> {
        Store {
            schema,
            doc,
            connection,
            keys: KeyResolver::new(key_generator),
            options,
        }
    }

    /// Stores the document under the configured commit mode.
    pub(crate) async fn apply(mut self) -> Result<DocumentLocationInfo> {
        let per_document = self.options.commit_mode == CommitMode::AfterDocument;

        if per_document {
            self.exec(Transaction::Start.into()).await?;
        }

        match self.store_document().await {
            Ok(location) => {
                if per_document {
                    self.exec(Transaction::Commit.into()).await?;
                }
                Ok(location)
            }
            Err(err) => {
                if per_document {
                    self.rollback().await;
                }
                Err(err)
            }
        }
    }

    async fn store_document(&mut self) -> Result<DocumentLocationInfo> {
        let Some(root) = self.doc.root() else {
            return Err(Error::structural_violation("document has no root element"));
        };

        let element = self.element_name(root)?;

        let Some(class) = self.schema.class_map(element) else {
            return Err(Error::invalid_mapping(format!(
                "root element `{element}` is not mapped"
            )));
        };

        match class.kind {
            ClassMapKind::RootTable => {
                let location = self.store_root(root, element, class).await?;

                Ok(DocumentLocationInfo {
                    roots: vec![location],
                    ignored_root: None,
                })
            }
            ClassMapKind::IgnoredRoot => {
                let doc = self.doc;
                let mut roots = vec![];

                for child in doc.children(root) {
                    if doc.kind(child) != NodeKind::Element {
                        continue;
                    }

                    let name = self.element_name(child)?;

                    let Some(class) = self.schema.class_map(name) else {
                        trace!(element = %name, "skipping unmapped element");
                        continue;
                    };

                    match class.kind {
                        ClassMapKind::RootTable => {}
                        ClassMapKind::ClassTable => {
                            return Err(Error::invalid_mapping(format!(
                                "element `{name}` under ignored root `{element}` is mapped to a class table, not to a root table"
                            )))
                        }
                        ClassMapKind::IgnoredRoot | ClassMapKind::PassThrough => {
                            return Err(unsupported_element(name, class.kind))
                        }
                    }

                    roots.push(self.store_root(child, name, class).await?);
                }

                Ok(DocumentLocationInfo {
                    roots,
                    ignored_root: Some(element.clone()),
                })
            }
            ClassMapKind::ClassTable => Err(Error::invalid_mapping(format!(
                "root element `{element}` is mapped to a class table, not to a root table or an ignored root"
            ))),
            ClassMapKind::PassThrough => Err(unsupported_element(element, class.kind)),
        }
    }

    async fn store_root(
        &mut self,
        node: NodeId,
        element: &XmlName,
        class: &'a ClassMap,
    ) -> Result<RootLocation> {
        let table = self.class_table(class)?;

        let Some(primary_key) = table.primary_key() else {
            return Err(Error::invalid_mapping(format!(
                "root table `{}` has no primary key",
                table.name
            )));
        };

        let placement = Placement {
            unique_key: Some(primary_key.id),
            ..Placement::default()
        };

        let row = self.store_class(node, class, placement).await?;

        Ok(RootLocation {
            element: element.clone(),
            table: table.id,
            key: row.key_values(primary_key),
        })
    }

    /// Writes the row of a class element and every row below it.
    #[async_recursion]
    async fn store_class(
        &mut self,
        node: NodeId,
        class: &'a ClassMap,
        placement: Placement,
    ) -> Result<Row> {
        let table = self.class_table(class)?;

        let mut frame = Frame {
            row: Row::new(table),
            needed: placement.unique_key.into_iter().collect(),
            pending: vec![],
        };

        if let Some((key, values)) = placement.foreign_key {
            frame.row.assign_key(table.key(key), values);
        }

        if let Some((column, value)) = placement.order {
            frame.row.assign(column, value);
        }

        self.store_content(node, &class.content, &mut frame).await?;

        let Frame {
            mut row,
            needed,
            mut pending,
        } = frame;

        self.keys.prepare(table, &mut row, &needed).await?;
        self.insert(table, &row).await?;

        while let Some(child) = pending.pop() {
            self.store_pending(&row, child).await?;
        }

        Ok(row)
    }

    /// Maps the attributes and children of `node` into `frame`. Inline
    /// classes recurse with the same frame.
    #[async_recursion]
    async fn store_content(
        &mut self,
        node: NodeId,
        content: &'a Content,
        frame: &mut Frame<'a>,
    ) -> Result<()> {
        let doc = self.doc;

        for (name, value) in doc.attributes(node) {
            match content.attributes.get(&name) {
                Some(map) => self.store_property(map, value, None, frame).await?,
                None => trace!(attribute = %name, "skipping unmapped attribute"),
            }
        }

        // PCDATA in a class-table column is the concatenation of the element's
        // text children, placed at the first of them. A property table keeps
        // one row per text child so mixed content keeps its interleaving.
        let mut pcdata: Option<(String, i64)> = None;

        for (index, child) in doc.children(node).into_iter().enumerate() {
            let position = index as i64 + 1;

            match doc.kind(child) {
                NodeKind::Text => {
                    let text = doc.text(child).unwrap_or_default();

                    if is_ignorable(text) {
                        continue;
                    }

                    let Some(map) = &content.pcdata else {
                        trace!("skipping unmapped text");
                        continue;
                    };

                    if map.property_table.is_some() {
                        self.store_property(map, text.to_string(), Some(position), frame)
                            .await?;
                        continue;
                    }

                    match &mut pcdata {
                        Some((buf, _)) => buf.push_str(text),
                        None => pcdata = Some((text.to_string(), position)),
                    }
                }
                NodeKind::Element => {
                    let name = self.element_name(child)?;

                    match content.children.get(name) {
                        Some(ChildMap::Property(map)) => {
                            let text = element_text(doc, child);
                            self.store_property(map, text, Some(position), frame)
                                .await?;
                        }
                        Some(ChildMap::InlineClass(map)) => {
                            if let Some((column, value)) =
                                generated_order(map.order.as_ref(), position)
                            {
                                frame.row.assign(column, value);
                            }

                            self.store_content(child, &map.content, frame).await?;
                        }
                        Some(ChildMap::RelatedClass(map)) => {
                            self.store_related(child, map, position, frame).await?;
                        }
                        None => match self.schema.class_map(name) {
                            Some(class)
                                if matches!(
                                    class.kind,
                                    ClassMapKind::IgnoredRoot | ClassMapKind::PassThrough
                                ) =>
                            {
                                return Err(unsupported_element(name, class.kind));
                            }
                            _ => trace!(element = %name, "skipping unmapped element"),
                        },
                    }
                }
            }
        }

        if let (Some(map), Some((text, position))) = (&content.pcdata, pcdata) {
            self.store_property(map, text, Some(position), frame).await?;
        }

        Ok(())
    }

    async fn store_property(
        &mut self,
        map: &'a PropertyMap,
        text: String,
        position: Option<i64>,
        frame: &mut Frame<'a>,
    ) -> Result<()> {
        let Some(table) = map.property_table else {
            let column = self.schema.db.column(map.column);
            let value = self.column_value(column, &text)?;
            frame.row.set(column, value)?;

            if let Some((column, value)) =
                position.and_then(|position| generated_order(map.order.as_ref(), position))
            {
                frame.row.assign(column, value);
            }

            return Ok(());
        };

        if map.multi_valued {
            frame.needed.push(table.link.parent_key);

            for (index, token) in text.split_whitespace().enumerate() {
                frame.pending.push(Pending::Property {
                    map,
                    table,
                    text: token.to_string(),
                    position: Some(index as i64 + 1),
                });
            }

            return Ok(());
        }

        if table.link.parent_key_is_unique() {
            debug!(
                property = %map.name,
                "deferring property row until its parent row is written"
            );
            frame.needed.push(table.link.parent_key);
            frame.pending.push(Pending::Property {
                map,
                table,
                text,
                position,
            });
            return Ok(());
        }

        // The property row holds the unique key; write it first and
        // reference it from the class row.
        let parent_key = self.schema.db.key(table.link.parent_key);
        self.ensure_unlinked(&frame.row, parent_key.id, &map.name)?;

        let row = self
            .store_property_row(map, table, &text, position, None)
            .await?;

        copy_key(
            &row,
            self.schema.db.key(table.link.child_key),
            &mut frame.row,
            parent_key,
        );

        if let Some((column, value)) =
            position.and_then(|position| generated_order(map.order.as_ref(), position))
        {
            if column.table == frame.row.table {
                frame.row.assign(column, value);
            }
        }

        Ok(())
    }

    /// Writes one property table row. `parent` is the class row when the
    /// class row holds the unique side of the link.
    async fn store_property_row(
        &mut self,
        map: &'a PropertyMap,
        table: PropertyTable,
        text: &str,
        position: Option<i64>,
        parent: Option<&Row>,
    ) -> Result<Row> {
        let schema = self.schema;
        let db_table = schema.table(table.table);
        let mut row = Row::new(db_table);

        let needed = match parent {
            Some(parent) => {
                copy_key(
                    parent,
                    schema.db.key(table.link.parent_key),
                    &mut row,
                    schema.db.key(table.link.child_key),
                );
                vec![]
            }
            None => vec![table.link.child_key],
        };

        let column = schema.db.column(map.column);
        let value = self.column_value(column, text)?;
        row.set(column, value)?;

        if let Some((column, value)) =
            position.and_then(|position| generated_order(map.order.as_ref(), position))
        {
            if column.table == db_table.id {
                row.assign(column, value);
            }
        }

        self.keys.prepare(db_table, &mut row, &needed).await?;
        self.insert(db_table, &row).await?;

        Ok(row)
    }

    async fn store_related(
        &mut self,
        node: NodeId,
        map: &'a RelatedClassMap,
        position: i64,
        frame: &mut Frame<'a>,
    ) -> Result<()> {
        let class = self.schema.xml.class(map.class);

        if map.link.parent_key_is_unique() {
            debug!(
                element = %map.element,
                "deferring related class until its parent row is written"
            );
            frame.needed.push(map.link.parent_key);
            frame.pending.push(Pending::Class {
                node,
                map,
                position,
            });
            return Ok(());
        }

        // The related row holds the unique key; write it first and
        // reference it from the class row.
        let parent_key = self.schema.db.key(map.link.parent_key);
        self.ensure_unlinked(&frame.row, parent_key.id, &map.element)?;

        let placement = Placement {
            unique_key: Some(map.link.child_key),
            ..Placement::default()
        };

        let row = self.store_class(node, class, placement).await?;

        copy_key(
            &row,
            self.schema.db.key(map.link.child_key),
            &mut frame.row,
            parent_key,
        );

        if let Some((column, value)) = generated_order(map.order.as_ref(), position) {
            if column.table == frame.row.table {
                frame.row.assign(column, value);
            }
        }

        Ok(())
    }

    async fn store_pending(&mut self, parent: &Row, pending: Pending<'a>) -> Result<()> {
        match pending {
            Pending::Class {
                node,
                map,
                position,
            } => {
                let parent_key = self.schema.db.key(map.link.parent_key);
                let class = self.schema.xml.class(map.class);

                let placement = Placement {
                    foreign_key: Some((map.link.child_key, parent.key_values(parent_key))),
                    unique_key: None,
                    order: generated_order(map.order.as_ref(), position)
                        .filter(|(column, _)| Some(column.table) == class.table),
                };

                self.store_class(node, class, placement).await?;
            }
            Pending::Property {
                map,
                table,
                text,
                position,
            } => {
                self.store_property_row(map, table, &text, position, Some(parent))
                    .await?;
            }
        }

        Ok(())
    }

    /// A foreign key referencing a single child row can only be filled
    /// once per row.
    fn ensure_unlinked(&self, row: &Row, key: KeyId, element: &XmlName) -> Result<()> {
        let key = self.schema.db.key(key);

        if row.key_is_null(key) {
            Ok(())
        } else {
            Err(Error::structural_violation(format!(
                "element `{element}` occurs more than once, but key `{}` references a single row",
                key.name
            )))
        }
    }

    fn column_value(&self, column: &Column, text: &str) -> Result<Value> {
        if text.is_empty() && self.options.empty_string_is_null {
            return Ok(Value::Null);
        }

        convert::to_value(column, text).map_err(|err| {
            err.context(format!(
                "column `{}` of table `{}`",
                column.name,
                self.schema.db.table(column.id.table).name
            ))
        })
    }

    fn class_table(&self, class: &ClassMap) -> Result<&'a Table> {
        let schema = self.schema;

        match class.table {
            Some(table) => Ok(schema.table(table)),
            None => Err(Error::invalid_mapping(format!(
                "element `{}` is not mapped to a table",
                class.element
            ))),
        }
    }

    fn element_name(&self, node: NodeId) -> Result<&'a XmlName> {
        let doc = self.doc;

        doc.name(node)
            .ok_or_else(|| Error::structural_violation(format!("node {node:?} is not an element")))
    }

    async fn insert(&mut self, table: &Table, row: &Row) -> Result<()> {
        debug!(table = %table.name, values = ?row.values(), "insert row");

        let insert = Insert {
            table: table.id,
            values: row.values().clone(),
        };

        if self.options.commit_mode != CommitMode::AfterInsert {
            self.exec(insert.into()).await?;
            return Ok(());
        }

        self.exec(Transaction::Start.into()).await?;

        if let Err(err) = self.exec(insert.into()).await {
            self.rollback().await;
            return Err(err);
        }

        self.exec(Transaction::Commit.into()).await?;
        Ok(())
    }

    async fn rollback(&mut self) {
        if let Err(err) = self.exec(Transaction::Rollback.into()).await {
            debug!(%err, "rollback failed");
        }
    }

    async fn exec(&mut self, op: Operation) -> Result<Response> {
        self.connection.exec(&self.schema.db, op).await
    }
}

/// Whitespace-only text between elements. An empty text node is not
/// ignorable: it is an empty value.
/// Ignored roots are only honored as the document element, and pass-through
/// elements not at all.
fn unsupported_element(name: &XmlName, kind: ClassMapKind) -> Error {
    match kind {
        ClassMapKind::IgnoredRoot => Error::structural_violation(format!(
            "element `{name}` is mapped as an ignored root but is not the document element"
        )),
        _ => Error::structural_violation(format!(
            "element `{name}` is mapped as pass-through, which is not supported"
        )),
    }
}

fn is_ignorable(text: &str) -> bool {
    !text.is_empty() && text.trim().is_empty()
}

/// Text of an element mapped as a property.
fn element_text(doc: &(dyn Document + Sync), node: NodeId) -> String {
    doc.children(node)
        .into_iter()
        .filter_map(|child| doc.text(child))
        .filter(|text| !is_ignorable(text))
        .collect()
}

/// The value written to a generated order column for the `position`th
/// child: the position itself, negated for descending columns so that the
/// column's direction reproduces document order.
fn generated_order(order: Option<&OrderInfo>, position: i64) -> Option<(ColumnId, Value)> {
    match *order? {
        OrderInfo::Column {
            column,
            ascending,
            generate: true,
        } => {
            let value = if ascending { position } else { -position };
            Some((column, Value::I64(value)))
        }
        _ => None,
    }
}
