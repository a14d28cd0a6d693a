use tests::{
    assert_tree,
    fixtures::{self, Item},
    setup, tests,
};
use xmlrel::{
    driver::SequenceKeyGenerator, schema::XmlName, stmt::Value, RootLocation, Transfer,
};

async fn purchase_order_round_trip() {
    let schema = fixtures::purchase_orders();
    let (mut transfer, log) = setup(
        schema.clone(),
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let doc = fixtures::purchase_order(
        "PO-1",
        "rush gift fragile",
        &[
            Item {
                product: "Pen",
                quantity: "2",
            },
            Item {
                product: "Stapler",
                quantity: "1",
            },
        ],
    );

    let location = transfer.store_document(&doc).await.unwrap();

    assert_eq!(
        location.roots,
        [RootLocation {
            element: XmlName::new("Order"),
            table: fixtures::table_id(&schema, "Orders"),
            key: vec![Value::I64(1)].into(),
        }]
    );
    assert_eq!(location.ignored_root, None);

    let retrieved = transfer.retrieve_document(&location).await.unwrap();
    assert_tree!(retrieved, doc.tree().unwrap());
    assert!(log.count(|op| op.is_select()) > 0);
}

async fn rows_are_written_once_their_keys_are_known() {
    let schema = fixtures::purchase_orders();
    let (mut transfer, log) = setup(
        schema.clone(),
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let doc = fixtures::purchase_order(
        "PO-2",
        "rush gift fragile",
        &[
            Item {
                product: "Pen",
                quantity: "2",
            },
            Item {
                product: "Stapler",
                quantity: "1",
            },
        ],
    );

    transfer.store_document(&doc).await.unwrap();

    // The customer is referenced by the order and written first; items and
    // tags reference the order and follow it.
    assert_eq!(
        log.labels(&schema.db),
        [
            "start",
            "insert Customers",
            "insert Orders",
            "insert Items",
            "insert Items",
            "insert Tags",
            "insert Tags",
            "insert Tags",
            "commit",
        ]
    );

    let inserts = log.inserts();

    assert_eq!(
        inserts[0].values.fields,
        [Value::from("C7"), Value::from("Ada Lovelace")]
    );

    // Orders: id, number, placed, placed_pos, customer_code, customer_pos,
    // street, city, ship_pos, note, note_pos
    let order = &inserts[1].values;
    assert_eq!(order[0], Value::I64(1));
    assert_eq!(order[1], Value::from("PO-2"));
    assert_eq!(order[3], Value::I64(2));
    assert_eq!(order[4], Value::from("C7"));
    assert_eq!(order[5], Value::I64(1));
    assert_eq!(order[6], Value::from("1 Main St"));
    assert_eq!(order[7], Value::from("Oslo"));
    assert_eq!(order[8], Value::I64(3));
    assert_eq!(order[10], Value::I64(6));

    // Items: id, order_id, pos, product, quantity. Deferred children are
    // written most recent first; their order column keeps document order.
    assert_eq!(
        inserts[2].values.fields,
        [
            Value::I64(1),
            Value::I64(1),
            Value::I64(5),
            Value::from("Stapler"),
            Value::I64(1),
        ]
    );
    assert_eq!(
        inserts[3].values.fields,
        [
            Value::I64(2),
            Value::I64(1),
            Value::I64(4),
            Value::from("Pen"),
            Value::I64(2),
        ]
    );

    // Tags: order_id, pos, tag
    let tags: Vec<_> = inserts[4..]
        .iter()
        .map(|insert| insert.values.fields.clone())
        .collect();
    assert_eq!(
        tags,
        [
            vec![Value::I64(1), Value::I64(3), Value::from("fragile")],
            vec![Value::I64(1), Value::I64(2), Value::from("gift")],
            vec![Value::I64(1), Value::I64(1), Value::from("rush")],
        ]
    );
}

async fn order_without_optional_parts() {
    let schema = fixtures::purchase_orders();
    let (mut transfer, log) = setup(
        schema.clone(),
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let doc = fixtures::purchase_order("PO-3", "", &[]);
    let location = transfer.store_document(&doc).await.unwrap();

    assert_eq!(
        log.inserted_tables(&schema.db),
        ["Customers", "Orders"]
    );

    let retrieved = transfer.retrieve_document(&location).await.unwrap();
    assert_tree!(retrieved, doc.tree().unwrap());
}

async fn mixed_content_round_trip() {
    let schema = fixtures::paragraphs();
    let (mut transfer, log) = setup(
        schema.clone(),
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let doc = fixtures::paragraph();
    let location = transfer.store_document(&doc).await.unwrap();

    // Each text run is its own row, numbered by its place among the
    // paragraph's children.
    assert_eq!(
        log.inserted_tables(&schema.db),
        ["Paras", "Runs", "Bolds", "Runs", "Bolds", "Runs"]
    );

    let runs: Vec<_> = log
        .inserts()
        .into_iter()
        .filter(|insert| insert.table == fixtures::table_id(&schema, "Runs"))
        .map(|insert| insert.values.fields)
        .collect();
    assert_eq!(
        runs,
        [
            vec![Value::I64(1), Value::I64(5), Value::from(" world")],
            vec![Value::I64(1), Value::I64(3), Value::from(" and ")],
            vec![Value::I64(1), Value::I64(1), Value::from("Hello ")],
        ]
    );

    let retrieved = transfer.retrieve_document(&location).await.unwrap();
    assert_tree!(retrieved, doc.tree().unwrap());
}

tests!(
    purchase_order_round_trip,
    rows_are_written_once_their_keys_are_known,
    order_without_optional_parts,
    mixed_content_round_trip,
);
