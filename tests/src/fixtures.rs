//! Mappings and documents shared by the integration tests.

use std::sync::Arc;
use xmlrel::{
    schema::{
        db::{TableId, Type},
        Builder, ChildDef, ClassDef, ColumnDef, ContentDef, KeyDef, LinkDef, OrderDef,
        PropertyDef, TableDef,
    },
    DocumentMut, NodeId, Schema, XmlDocument,
};

pub fn table_id(schema: &Schema, name: &str) -> TableId {
    schema
        .db
        .table_by_name(name)
        .unwrap_or_else(|| panic!("no table `{name}`"))
        .id
}

/// Purchase orders: a root table with a customer it references, items and
/// tags that reference it, and an inline shipping address.
pub fn purchase_orders() -> Arc<Schema> {
    let mut builder = Schema::builder();

    builder
        .table(
            TableDef::new("Orders")
                .column(ColumnDef::new("id", Type::Integer(8)).not_null())
                .column(ColumnDef::new("number", Type::VarChar(20)))
                .column(ColumnDef::new("placed", Type::Date))
                .column(ColumnDef::new("placed_pos", Type::Integer(4)))
                .column(ColumnDef::new("customer_code", Type::VarChar(10)))
                .column(ColumnDef::new("customer_pos", Type::Integer(4)))
                .column(ColumnDef::new("street", Type::Text))
                .column(ColumnDef::new("city", Type::Text))
                .column(ColumnDef::new("ship_pos", Type::Integer(4)))
                .column(ColumnDef::new("note", Type::Text))
                .column(ColumnDef::new("note_pos", Type::Integer(4)))
                .key(KeyDef::primary("pk", ["id"]).generated())
                .key(KeyDef::foreign("customer_fk", ["customer_code"])),
        )
        .table(
            TableDef::new("Customers")
                .column(ColumnDef::new("code", Type::VarChar(10)).not_null())
                .column(ColumnDef::new("name", Type::Text))
                .key(KeyDef::primary("pk", ["code"])),
        )
        .table(
            TableDef::new("Items")
                .column(ColumnDef::new("id", Type::Integer(8)).not_null())
                .column(ColumnDef::new("order_id", Type::Integer(8)))
                .column(ColumnDef::new("pos", Type::Integer(4)))
                .column(ColumnDef::new("product", Type::Text))
                .column(ColumnDef::new("quantity", Type::Integer(4)))
                .key(KeyDef::primary("pk", ["id"]).generated())
                .key(KeyDef::foreign("order_fk", ["order_id"])),
        )
        .table(
            TableDef::new("Tags")
                .column(ColumnDef::new("order_id", Type::Integer(8)))
                .column(ColumnDef::new("pos", Type::Integer(4)))
                .column(ColumnDef::new("tag", Type::VarChar(10)))
                .key(KeyDef::foreign("order_fk", ["order_id"])),
        );

    builder
        .class_map(
            ClassDef::root_table("Order", "Orders")
                .attribute("number", PropertyDef::column("number"))
                .attribute(
                    "tags",
                    PropertyDef::column("tag")
                        .in_table("Tags", LinkDef::new("pk", "order_fk"))
                        .order(OrderDef::column("pos"))
                        .multi_valued(),
                )
                .child(
                    ChildDef::related("Customer", LinkDef::new("customer_fk", "pk"))
                        .order(OrderDef::column("customer_pos")),
                )
                .child(ChildDef::property(
                    "Placed",
                    PropertyDef::column("placed").order(OrderDef::column("placed_pos")),
                ))
                .child(
                    ChildDef::inline(
                        "Shipping",
                        ContentDef::default()
                            .child(ChildDef::property(
                                "Street",
                                PropertyDef::column("street").order(OrderDef::Fixed(1)),
                            ))
                            .child(ChildDef::property(
                                "City",
                                PropertyDef::column("city").order(OrderDef::Fixed(2)),
                            )),
                    )
                    .order(OrderDef::column("ship_pos")),
                )
                .child(
                    ChildDef::related("Item", LinkDef::new("pk", "order_fk"))
                        .order(OrderDef::column("pos")),
                )
                .child(ChildDef::property(
                    "Note",
                    PropertyDef::column("note").order(OrderDef::column("note_pos")),
                )),
        )
        .unwrap()
        .class_map(
            ClassDef::class_table("Customer", "Customers")
                .attribute("code", PropertyDef::column("code"))
                .child(ChildDef::property("Name", PropertyDef::column("name"))),
        )
        .unwrap()
        .class_map(
            ClassDef::class_table("Item", "Items")
                .child(ChildDef::property(
                    "Product",
                    PropertyDef::column("product").order(OrderDef::Fixed(1)),
                ))
                .child(ChildDef::property(
                    "Quantity",
                    PropertyDef::column("quantity").order(OrderDef::Fixed(2)),
                )),
        )
        .unwrap();

    Arc::new(builder.build().unwrap())
}

pub struct Item<'a> {
    pub product: &'a str,
    pub quantity: &'a str,
}

/// An order with a customer, a placement date, a shipping address, the given
/// items and a closing note, in that order.
pub fn purchase_order(number: &str, tags: &str, items: &[Item<'_>]) -> XmlDocument {
    let (mut doc, root) = XmlDocument::with_root("Order");

    doc.set_attribute(root, "number".into(), number.to_string());
    if !tags.is_empty() {
        doc.set_attribute(root, "tags".into(), tags.to_string());
    }

    let customer = doc.add_element(root, "Customer");
    doc.set_attribute(customer, "code".into(), "C7".to_string());
    doc.add_text_element(customer, "Name", "Ada Lovelace");

    doc.add_text_element(root, "Placed", "2024-03-01");

    let shipping = doc.add_element(root, "Shipping");
    doc.add_text_element(shipping, "Street", "1 Main St");
    doc.add_text_element(shipping, "City", "Oslo");

    for item in items {
        let node = doc.add_element(root, "Item");
        doc.add_text_element(node, "Product", item.product);
        doc.add_text_element(node, "Quantity", item.quantity);
    }

    doc.add_text_element(root, "Note", "Leave at the door");

    doc
}

/// Books stored one row each. With `wrapped`, `Catalog` is mapped as the
/// ignored root holding any number of books.
pub fn catalog(wrapped: bool) -> Arc<Schema> {
    Arc::new(catalog_builder(wrapped).build().unwrap())
}

/// The wrapped catalog, with `Aside` mapped as a pass-through element.
pub fn catalog_with_asides() -> Arc<Schema> {
    let mut builder = catalog_builder(true);
    builder.pass_through("Aside").unwrap();
    Arc::new(builder.build().unwrap())
}

fn catalog_builder(wrapped: bool) -> Builder {
    let mut builder = Schema::builder();

    builder.table(
        TableDef::new("Books")
            .column(ColumnDef::new("id", Type::Integer(8)).not_null())
            .column(ColumnDef::new("title", Type::VarChar(10)).not_null())
            .column(ColumnDef::new("year", Type::Integer(2)))
            .key(KeyDef::primary("pk", ["id"]).generated()),
    );

    builder
        .class_map(
            ClassDef::root_table("Book", "Books")
                .attribute("year", PropertyDef::column("year"))
                .child(ChildDef::property("Title", PropertyDef::column("title"))),
        )
        .unwrap();

    if wrapped {
        builder.ignored_root("Catalog").unwrap();
    }

    builder
}

pub fn book(title: &str, year: &str) -> XmlDocument {
    let (mut doc, root) = XmlDocument::with_root("Book");
    populate_book(&mut doc, root, title, year);
    doc
}

/// A `Catalog` wrapper holding one book per `(title, year)` pair.
pub fn books(entries: &[(&str, &str)]) -> XmlDocument {
    let (mut doc, root) = XmlDocument::with_root("Catalog");

    for (title, year) in entries {
        let node = doc.add_element(root, "Book");
        populate_book(&mut doc, node, title, year);
    }

    doc
}

fn populate_book(doc: &mut XmlDocument, node: NodeId, title: &str, year: &str) {
    doc.set_attribute(node, "year".into(), year.to_string());
    doc.add_text_element(node, "Title", title);
}

/// A person with an optional nickname attribute and an optional comment
/// element, both text columns.
pub fn people() -> Arc<Schema> {
    let mut builder = Schema::builder();

    builder.table(
        TableDef::new("People")
            .column(ColumnDef::new("id", Type::Integer(8)).not_null())
            .column(ColumnDef::new("nickname", Type::Text))
            .column(ColumnDef::new("comment", Type::Text))
            .key(KeyDef::primary("pk", ["id"]).generated()),
    );

    builder
        .class_map(
            ClassDef::root_table("Person", "People")
                .attribute("nickname", PropertyDef::column("nickname"))
                .child(ChildDef::property("Comment", PropertyDef::column("comment"))),
        )
        .unwrap();

    Arc::new(builder.build().unwrap())
}

/// A playlist whose tracks are ordered by a descending column.
pub fn playlists() -> Arc<Schema> {
    let mut builder = Schema::builder();

    builder
        .table(
            TableDef::new("Playlists")
                .column(ColumnDef::new("id", Type::Integer(8)).not_null())
                .column(ColumnDef::new("name", Type::Text))
                .key(KeyDef::primary("pk", ["id"]).generated()),
        )
        .table(
            TableDef::new("Tracks")
                .column(ColumnDef::new("id", Type::Integer(8)).not_null())
                .column(ColumnDef::new("playlist_id", Type::Integer(8)))
                .column(ColumnDef::new("slot", Type::Integer(4)))
                .column(ColumnDef::new("title", Type::Text))
                .key(KeyDef::primary("pk", ["id"]).generated())
                .key(KeyDef::foreign("playlist_fk", ["playlist_id"])),
        );

    builder
        .class_map(
            ClassDef::root_table("Playlist", "Playlists")
                .attribute("name", PropertyDef::column("name"))
                .child(
                    ChildDef::related("Track", LinkDef::new("pk", "playlist_fk"))
                        .order(OrderDef::column("slot").descending()),
                ),
        )
        .unwrap()
        .class_map(ClassDef::class_table("Track", "Tracks").pcdata(PropertyDef::column("title")))
        .unwrap();

    Arc::new(builder.build().unwrap())
}

pub fn playlist(name: &str, tracks: &[&str]) -> XmlDocument {
    let (mut doc, root) = XmlDocument::with_root("Playlist");
    doc.set_attribute(root, "name".into(), name.to_string());

    for track in tracks {
        let node = doc.add_element(root, "Track");
        doc.add_text(node, track);
    }

    doc
}

/// Paragraphs of mixed content: text runs and `b` elements each live in their
/// own property table, ordered by their position in the paragraph.
pub fn paragraphs() -> Arc<Schema> {
    let mut builder = Schema::builder();

    builder
        .table(
            TableDef::new("Paras")
                .column(ColumnDef::new("id", Type::Integer(8)).not_null())
                .key(KeyDef::primary("pk", ["id"]).generated()),
        )
        .table(
            TableDef::new("Runs")
                .column(ColumnDef::new("para_id", Type::Integer(8)))
                .column(ColumnDef::new("pos", Type::Integer(4)))
                .column(ColumnDef::new("body", Type::Text))
                .key(KeyDef::foreign("para_fk", ["para_id"])),
        )
        .table(
            TableDef::new("Bolds")
                .column(ColumnDef::new("para_id", Type::Integer(8)))
                .column(ColumnDef::new("pos", Type::Integer(4)))
                .column(ColumnDef::new("body", Type::Text))
                .key(KeyDef::foreign("para_fk", ["para_id"])),
        );

    builder
        .class_map(
            ClassDef::root_table("p", "Paras")
                .pcdata(
                    PropertyDef::column("body")
                        .in_table("Runs", LinkDef::new("pk", "para_fk"))
                        .order(OrderDef::column("pos")),
                )
                .child(ChildDef::property(
                    "b",
                    PropertyDef::column("body")
                        .in_table("Bolds", LinkDef::new("pk", "para_fk"))
                        .order(OrderDef::column("pos")),
                )),
        )
        .unwrap();

    Arc::new(builder.build().unwrap())
}

/// `<p>Hello <b>bold</b> and <b>more</b> world</p>`
pub fn paragraph() -> XmlDocument {
    let (mut doc, root) = XmlDocument::with_root("p");

    doc.add_text(root, "Hello ");
    doc.add_text_element(root, "b", "bold");
    doc.add_text(root, " and ");
    doc.add_text_element(root, "b", "more");
    doc.add_text(root, " world");

    doc
}
