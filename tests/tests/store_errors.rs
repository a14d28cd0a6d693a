use tests::{fixtures, setup, tests};
use xmlrel::{driver::SequenceKeyGenerator, DocumentMut, Transfer, XmlDocument};

async fn missing_key_generator() {
    let schema = fixtures::catalog(false);
    let (mut transfer, log) = setup(schema, &mut Transfer::builder()).await;

    let err = transfer
        .store_document(&fixtures::book("Dune", "1965"))
        .await
        .unwrap_err();

    assert!(err.is_invalid_mapping(), "{err}");
    assert!(log.is_empty());
}

async fn element_property_repeated() {
    let schema = fixtures::catalog(false);
    let (mut transfer, log) = setup(
        schema,
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let mut doc = fixtures::book("Dune", "1965");
    let root = xmlrel::Document::root(&doc).unwrap();
    doc.add_text_element(root, "Title", "Dune Messiah");

    let err = transfer.store_document(&doc).await.unwrap_err();
    assert!(err.is_structural_violation(), "{err}");
    assert_eq!(log.count(|op| op.is_insert()), 0);
}

async fn single_valued_link_repeated() {
    let schema = fixtures::purchase_orders();
    let (mut transfer, log) = setup(
        schema.clone(),
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let mut doc = fixtures::purchase_order("PO-4", "", &[]);
    let root = xmlrel::Document::root(&doc).unwrap();
    let customer = doc.add_element(root, "Customer");
    doc.set_attribute(customer, "code".into(), "C8".to_string());

    let err = transfer.store_document(&doc).await.unwrap_err();
    assert!(err.is_structural_violation(), "{err}");

    assert_eq!(
        log.labels(&schema.db),
        ["start", "insert Customers", "rollback"]
    );
}

async fn unparseable_values() {
    let schema = fixtures::purchase_orders();
    let (mut transfer, _log) = setup(
        schema,
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let (mut doc, root) = XmlDocument::with_root("Order");
    doc.add_text_element(root, "Placed", "last tuesday");

    let err = transfer.store_document(&doc).await.unwrap_err();
    assert!(err.is_conversion(), "{err}");

    let schema = fixtures::catalog(false);
    let (mut transfer, _log) = setup(
        schema,
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    // Year is a two byte integer.
    for year in ["MCMLXV", "40000"] {
        let err = transfer
            .store_document(&fixtures::book("Dune", year))
            .await
            .unwrap_err();
        assert!(err.is_conversion(), "{err}");
    }
}

async fn unmapped_document_element() {
    let schema = fixtures::people();
    let (mut transfer, _log) = setup(
        schema,
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let (doc, _) = XmlDocument::with_root("Robot");
    let err = transfer.store_document(&doc).await.unwrap_err();
    assert!(err.is_invalid_mapping(), "{err}");

    let err = transfer.store_document(&XmlDocument::new()).await.unwrap_err();
    assert!(err.is_structural_violation(), "{err}");
}

async fn pass_through_and_nested_ignored_roots() {
    let schema = fixtures::catalog_with_asides();
    let (mut transfer, log) = setup(
        schema.clone(),
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    // Inside a class element.
    let mut doc = fixtures::book("Dune", "1965");
    let root = xmlrel::Document::root(&doc).unwrap();
    doc.add_text_element(root, "Aside", "first edition");

    let err = transfer.store_document(&doc).await.unwrap_err();
    assert!(err.is_structural_violation(), "{err}");

    // Directly under the ignored root.
    let mut doc = fixtures::books(&[("Dune", "1965")]);
    let root = xmlrel::Document::root(&doc).unwrap();
    doc.add_element(root, "Aside");

    let err = transfer.store_document(&doc).await.unwrap_err();
    assert!(err.is_structural_violation(), "{err}");

    // As the document element.
    let (doc, _) = XmlDocument::with_root("Aside");
    let err = transfer.store_document(&doc).await.unwrap_err();
    assert!(err.is_structural_violation(), "{err}");

    // An ignored root below the document element.
    let mut doc = fixtures::book("Dune", "1965");
    let root = xmlrel::Document::root(&doc).unwrap();
    doc.add_element(root, "Catalog");

    let err = transfer.store_document(&doc).await.unwrap_err();
    assert!(err.is_structural_violation(), "{err}");

    // The book stored under the ignored root before the aside was rolled
    // back with the rest of its document.
    assert_eq!(
        log.labels(&schema.db),
        [
            "start",
            "rollback",
            "start",
            "insert Books",
            "rollback",
            "start",
            "rollback",
            "start",
            "rollback",
        ]
    );
}

tests!(
    missing_key_generator,
    element_property_repeated,
    single_valued_link_repeated,
    unparseable_values,
    unmapped_document_element,
    pass_through_and_nested_ignored_roots,
);
