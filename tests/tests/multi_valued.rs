use tests::{
    assert_tree,
    fixtures::{self, Item},
    setup, tests,
};
use xmlrel::{driver::SequenceKeyGenerator, schema::XmlName, Document, Transfer};

async fn tokens_are_stored_one_row_each() {
    let schema = fixtures::purchase_orders();
    let (mut transfer, log) = setup(
        schema.clone(),
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    // Runs of whitespace separate tokens like a single space.
    let doc = fixtures::purchase_order(
        "PO-7",
        "  alpha\tbeta\n gamma delta ",
        &[Item {
            product: "Ink",
            quantity: "3",
        }],
    );

    let location = transfer.store_document(&doc).await.unwrap();

    let tags = log
        .inserted_tables(&schema.db)
        .into_iter()
        .filter(|table| table == "Tags")
        .count();
    assert_eq!(tags, 4);

    let retrieved = transfer.retrieve_document(&location).await.unwrap();
    let root = retrieved.root().unwrap();

    assert_eq!(
        retrieved.attribute(root, &XmlName::new("tags")),
        Some("alpha beta gamma delta")
    );
}

async fn single_token() {
    let schema = fixtures::purchase_orders();
    let (mut transfer, _log) = setup(
        schema,
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let doc = fixtures::purchase_order("PO-8", "rush", &[]);

    let location = transfer.store_document(&doc).await.unwrap();
    let retrieved = transfer.retrieve_document(&location).await.unwrap();

    assert_tree!(retrieved, doc.tree().unwrap());
}

async fn token_too_long_for_its_column() {
    let schema = fixtures::purchase_orders();
    let (mut transfer, log) = setup(
        schema.clone(),
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let doc = fixtures::purchase_order("PO-9", "rush extraordinarily", &[]);

    let err = transfer.store_document(&doc).await.unwrap_err();
    assert!(err.is_conversion(), "{err}");

    // "rush" is written last, so the failing token comes first.
    assert_eq!(
        log.labels(&schema.db),
        ["start", "insert Customers", "insert Orders", "rollback"]
    );
}

tests!(
    tokens_are_stored_one_row_each,
    single_token,
    token_too_long_for_its_column,
);
