use tests::{assert_tree, fixtures, setup, tests};
use xmlrel::{driver::SequenceKeyGenerator, stmt::Value, Transfer};

async fn descending_order_column() {
    let schema = fixtures::playlists();
    let (mut transfer, log) = setup(
        schema.clone(),
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let doc = fixtures::playlist("Road trip", &["Intro", "Drive", "Arrival"]);
    let location = transfer.store_document(&doc).await.unwrap();

    // Tracks: id, playlist_id, slot, title
    let slots: Vec<_> = log
        .inserts()
        .iter()
        .skip(1)
        .map(|insert| (insert.values[2].clone(), insert.values[3].clone()))
        .collect();

    assert_eq!(
        slots,
        [
            (Value::I64(-3), Value::from("Arrival")),
            (Value::I64(-2), Value::from("Drive")),
            (Value::I64(-1), Value::from("Intro")),
        ]
    );

    let retrieved = transfer.retrieve_document(&location).await.unwrap();
    assert_tree!(retrieved, doc.tree().unwrap());
}

async fn document_order_survives_interleaved_sources() {
    let schema = fixtures::purchase_orders();
    let (mut transfer, _log) = setup(
        schema,
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let items: Vec<_> = ["A", "B", "C", "D", "E"]
        .into_iter()
        .map(|product| fixtures::Item {
            product,
            quantity: "1",
        })
        .collect();

    let doc = fixtures::purchase_order("PO-5", "x y", &items);
    let location = transfer.store_document(&doc).await.unwrap();

    let retrieved = transfer.retrieve_document(&location).await.unwrap();
    assert_tree!(retrieved, doc.tree().unwrap());
}

tests!(
    descending_order_column,
    document_order_survives_interleaved_sources,
);
