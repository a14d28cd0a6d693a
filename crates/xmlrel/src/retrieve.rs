use crate::{
    order_tracker::{Order, OrderTracker},
    transfer::Seed,
};

use async_recursion::async_recursion;
use std::collections::HashMap;
use tracing::{debug, trace};
use xmlrel_core::{
    convert,
    driver::{
        operation::{Direction, Select},
        Connection,
    },
    schema::{
        db::{Column, TableId},
        mapping::{ClassTableMap, ColumnMap, InlineStep},
        xml::PropertyKind,
        LinkInfo, OrderInfo, XmlName,
    },
    stmt::{Value, ValueRecord},
    DocumentMut, Error, NodeId, Result, Schema, XmlDocument,
};

/// Builds a document from rows.
///
/// Every seed row becomes a class element. Its columns become attributes,
/// text and property elements; its property tables and related class tables
/// are read with one SELECT each, keyed by the row's link key values, and
/// turned into children recursively.
pub(crate) struct Retrieve<'a> {
    schema: &'a Schema,
    connection: &'a mut dyn Connection,
    doc: XmlDocument,
}

/// The children of one class element: one tracker for the element itself
/// and one for each inline wrapper element created under it.
struct Scope {
    trackers: Vec<OrderTracker>,

    /// Inline wrapper path to its tracker in `trackers`.
    inline: HashMap<Vec<XmlName>, usize>,
}

impl<'a> Retrieve<'a> {
    pub(crate) fn new(schema: &'a Schema, connection: &'a mut dyn Connection) -> Retrieve<'a> {
        Retrieve {
            schema,
            connection,
            doc: XmlDocument::new(),
        }
    }

    /// Builds the document rooted at the seed rows. Each seed may name the
    /// element created for its rows; otherwise the class table's element is
    /// used.
    pub(crate) async fn apply(
        mut self,
        seeds: Vec<(Seed, Option<XmlName>)>,
        wrapper: Option<XmlName>,
    ) -> Result<XmlDocument> {
        let mut roots = vec![];

        for (seed, element) in seeds {
            let map = self.class_table_map(seed.table())?;
            let element = element.unwrap_or_else(|| map.element.clone());

            for row in self.seed_rows(seed).await? {
                roots.push((map.table, row, element.clone()));
            }
        }

        match wrapper {
            None => {
                if roots.len() > 1 {
                    return Err(Error::ambiguous_root(roots.len()));
                }

                let Some((table, row, element)) = roots.pop() else {
                    return Err(Error::structural_violation(
                        "no root row found and no ignored root is mapped",
                    ));
                };

                let root = self.retrieve_class(table, &row, &element).await?;
                self.doc.set_root(root);
            }
            Some(wrapper) => {
                let root = self.doc.create_element(wrapper);
                self.doc.set_root(root);

                let mut tracker = OrderTracker::new(root);

                for (table, row, element) in &roots {
                    let child = self.retrieve_class(*table, row, element).await?;
                    tracker.insert(&mut self.doc, child, Order::None);
                }
            }
        }

        Ok(self.doc)
    }

    async fn seed_rows(&mut self, seed: Seed) -> Result<Vec<ValueRecord>> {
        let schema = self.schema;

        match seed {
            Seed::Key { table, key } => {
                let table = schema.table(table);

                let Some(primary_key) = table.primary_key() else {
                    return Err(Error::invalid_mapping(format!(
                        "table `{}` has no primary key to retrieve by",
                        table.name
                    )));
                };

                if primary_key.columns.len() != key.len() {
                    return Err(Error::invalid_mapping(format!(
                        "primary key of table `{}` has {} columns, {} values given",
                        table.name,
                        primary_key.columns.len(),
                        key.len()
                    )));
                }

                let mut select = Select::new(table.id);
                for (column, value) in primary_key.columns.iter().zip(key) {
                    select = select.filter(*column, value);
                }

                self.select(select).await
            }
            Seed::Filter { table, filter } => {
                if let Some((column, _)) = filter.iter().find(|(column, _)| column.table != table) {
                    return Err(Error::invalid_mapping(format!(
                        "filter column `{}` is not a column of table `{}`",
                        schema.db.column(*column).name,
                        schema.table(table).name
                    )));
                }

                let select = Select {
                    table,
                    filter,
                    order_by: None,
                };

                self.select(select).await
            }
            Seed::Rows { table, rows } => {
                let table = schema.table(table);

                if let Some(row) = rows.iter().find(|row| row.len() != table.columns.len()) {
                    return Err(Error::invalid_mapping(format!(
                        "supplied row has {} values but table `{}` has {} columns",
                        row.len(),
                        table.name,
                        table.columns.len()
                    )));
                }

                Ok(rows)
            }
        }
    }

    /// Builds the element for one class row, and everything below it.
    #[async_recursion]
    async fn retrieve_class(
        &mut self,
        table: TableId,
        row: &ValueRecord,
        element: &XmlName,
    ) -> Result<NodeId> {
        let schema = self.schema;
        let map = self.class_table_map(table)?;

        let node = self.doc.create_element(element.clone());
        let mut scope = Scope::new(node);

        for column_map in map.columns() {
            let column = schema.db.column(column_map.column);

            let Some(text) = self.column_text(column, &row[column.id.index])? else {
                trace!(column = %column.name, "skipping NULL column");
                continue;
            };

            let order = order_of(column_map.order.as_ref(), Some(row));
            self.add_property(&mut scope, column_map, text, order, row);
        }

        for property_table in map.property_tables() {
            let column_map = &property_table.column;
            let column = schema.db.column(column_map.column);

            let rows = self
                .select_linked(
                    row,
                    &property_table.link,
                    property_table.table,
                    column_map.order.as_ref(),
                    column_map.multi_valued,
                )
                .await?;

            for child_row in &rows {
                let Some(text) = self.column_text(column, &child_row[column.id.index])? else {
                    trace!(column = %column.name, "skipping NULL column");
                    continue;
                };

                let holder = order_holder(&property_table.link, row, child_row);
                let order = order_of(column_map.order.as_ref(), Some(holder));
                self.add_property(&mut scope, column_map, text, order, row);
            }
        }

        for related in map.related() {
            let rows = self
                .select_linked(
                    row,
                    &related.link,
                    related.table,
                    related.order.as_ref(),
                    false,
                )
                .await?;

            for child_row in &rows {
                let child = self
                    .retrieve_class(related.table, child_row, &related.element)
                    .await?;

                let holder = order_holder(&related.link, row, child_row);
                let order = order_of(related.order.as_ref(), Some(holder));

                let tracker = scope.tracker(&mut self.doc, &related.path, row);
                tracker.insert(&mut self.doc, child, order);
            }
        }

        Ok(node)
    }

    fn add_property(
        &mut self,
        scope: &mut Scope,
        column_map: &ColumnMap,
        text: String,
        order: Order,
        row: &ValueRecord,
    ) {
        let tracker = scope.tracker(&mut self.doc, &column_map.path, row);
        let parent = tracker.parent();

        match column_map.kind {
            PropertyKind::Attribute if column_map.multi_valued => {
                self.doc
                    .append_attribute(parent, column_map.property.clone(), &text);
            }
            PropertyKind::Attribute => {
                self.doc
                    .set_attribute(parent, column_map.property.clone(), text);
            }
            PropertyKind::Pcdata => {
                let node = self.doc.create_text(&text);
                tracker.insert(&mut self.doc, node, order);
            }
            PropertyKind::Element => {
                let node = self.doc.create_element(column_map.property.clone());

                if !text.is_empty() {
                    let text = self.doc.create_text(&text);
                    self.doc.append_child(node, text);
                }

                tracker.insert(&mut self.doc, node, order);
            }
        }
    }

    /// Reads the rows linked to `row`. Rows feeding an order tracker are
    /// read in reverse document order; multi-valued tokens, which are
    /// appended, in document order.
    async fn select_linked(
        &mut self,
        row: &ValueRecord,
        link: &LinkInfo,
        table: TableId,
        order: Option<&OrderInfo>,
        appended: bool,
    ) -> Result<Vec<ValueRecord>> {
        let schema = self.schema;
        let parent_key = schema.db.key(link.parent_key);
        let child_key = schema.db.key(link.child_key);

        let mut select = Select::new(table);

        for (parent_column, child_column) in parent_key.columns.iter().zip(&child_key.columns) {
            let value = &row[parent_column.index];

            if value.is_null() {
                trace!(key = %parent_key.name, "link key is NULL, no linked rows");
                return Ok(vec![]);
            }

            select = select.filter(*child_column, value.clone());
        }

        if let Some(OrderInfo::Column {
            column, ascending, ..
        }) = order
        {
            if column.table == table {
                let direction = match (*ascending, appended) {
                    (true, false) | (false, true) => Direction::Desc,
                    (true, true) | (false, false) => Direction::Asc,
                };
                select = select.order_by(*column, direction);
            }
        }

        debug!(table = %schema.table(table).name, "select linked rows");
        self.select(select).await
    }

    async fn select(&mut self, select: Select) -> Result<Vec<ValueRecord>> {
        let response = self.connection.exec(&self.schema.db, select.into()).await?;
        Ok(response.into_values())
    }

    fn column_text(&self, column: &Column, value: &Value) -> Result<Option<String>> {
        convert::to_text(column, value).map_err(|err| {
            err.context(format!(
                "column `{}` of table `{}`",
                column.name,
                self.schema.db.table(column.id.table).name
            ))
        })
    }

    fn class_table_map(&self, table: TableId) -> Result<&'a ClassTableMap> {
        let schema = self.schema;

        schema.mapping_for(table).ok_or_else(|| {
            Error::invalid_mapping(format!(
                "table `{}` is not mapped to a class",
                schema.table(table).name
            ))
        })
    }
}

impl Scope {
    fn new(element: NodeId) -> Scope {
        Scope {
            trackers: vec![OrderTracker::new(element)],
            inline: HashMap::new(),
        }
    }

    /// The tracker for children placed at `path` below the class element.
    /// Missing wrapper elements are created and placed by the order values
    /// in the class row.
    fn tracker(
        &mut self,
        doc: &mut XmlDocument,
        path: &[InlineStep],
        row: &ValueRecord,
    ) -> &mut OrderTracker {
        let mut current = 0;

        for (depth, step) in path.iter().enumerate() {
            let key: Vec<XmlName> = path[..=depth]
                .iter()
                .map(|step| step.element.clone())
                .collect();

            current = match self.inline.get(&key) {
                Some(index) => *index,
                None => {
                    let wrapper = doc.create_element(step.element.clone());
                    let order = order_of(step.order.as_ref(), Some(row));
                    self.trackers[current].insert(doc, wrapper, order);

                    self.trackers.push(OrderTracker::new(wrapper));
                    let index = self.trackers.len() - 1;
                    self.inline.insert(key, index);
                    index
                }
            };
        }

        &mut self.trackers[current]
    }
}

/// The row holding a link's order column: the row on the foreign key side.
fn order_holder<'r>(
    link: &LinkInfo,
    parent: &'r ValueRecord,
    child: &'r ValueRecord,
) -> &'r ValueRecord {
    if link.parent_key_is_unique() {
        child
    } else {
        parent
    }
}

/// Order of a child as read from `holder`. Descending columns are negated
/// so that smaller always comes first.
fn order_of(order: Option<&OrderInfo>, holder: Option<&ValueRecord>) -> Order {
    match order {
        None => Order::None,
        Some(OrderInfo::Fixed(value)) => Order::Value(*value),
        Some(OrderInfo::Column {
            column, ascending, ..
        }) => match holder.and_then(|row| order_number(&row[column.index])) {
            Some(value) if *ascending => Order::Value(value),
            Some(value) => Order::Value(-value),
            None => Order::None,
        },
    }
}

fn order_number(value: &Value) -> Option<i64> {
    match value {
        Value::I64(value) => Some(*value),
        Value::F64(value) => Some(*value as i64),
        Value::Decimal(value) | Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}
