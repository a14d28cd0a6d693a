use tests::{assert_tree, fixtures, setup, tests};
use xmlrel::{
    driver::SequenceKeyGenerator, CommitMode, DocumentMut, Seed, Transfer, Tree, XmlDocument,
};

/// Two books, the second of which cannot be written: its title is missing
/// and the column is NOT NULL.
fn catalog_with_untitled_book() -> XmlDocument {
    let mut doc = fixtures::books(&[("Dune", "1965")]);
    let root = xmlrel::Document::root(&doc).unwrap();
    let book = doc.add_element(root, "Book");
    doc.set_attribute(book, "year".into(), "2001".to_string());
    doc
}

fn builder(commit_mode: CommitMode) -> xmlrel::Builder {
    let mut builder = Transfer::builder();
    builder
        .key_generator(SequenceKeyGenerator::new())
        .commit_mode(commit_mode);
    builder
}

async fn commit_after_document() {
    let schema = fixtures::catalog(true);
    let (mut transfer, log) = setup(schema.clone(), &mut builder(CommitMode::AfterDocument)).await;

    let doc = fixtures::books(&[("Dune", "1965"), ("Emma", "1815")]);
    transfer.store_document(&doc).await.unwrap();

    assert_eq!(
        log.labels(&schema.db),
        ["start", "insert Books", "insert Books", "commit"]
    );
}

async fn commit_after_insert() {
    let schema = fixtures::catalog(true);
    let (mut transfer, log) = setup(schema.clone(), &mut builder(CommitMode::AfterInsert)).await;

    let doc = fixtures::books(&[("Dune", "1965"), ("Emma", "1815")]);
    transfer.store_document(&doc).await.unwrap();

    assert_eq!(
        log.labels(&schema.db),
        [
            "start",
            "insert Books",
            "commit",
            "start",
            "insert Books",
            "commit",
        ]
    );
}

async fn never_commit() {
    let schema = fixtures::catalog(true);
    let (mut transfer, log) = setup(schema.clone(), &mut builder(CommitMode::Never)).await;

    let doc = fixtures::books(&[("Dune", "1965"), ("Emma", "1815")]);
    transfer.store_document(&doc).await.unwrap();

    assert_eq!(
        log.labels(&schema.db),
        ["insert Books", "insert Books"]
    );
    assert!(log.transactions().is_empty());
}

async fn failed_document_is_rolled_back() {
    let schema = fixtures::catalog(true);
    let books = fixtures::table_id(&schema, "Books");
    let (mut transfer, mut log) =
        setup(schema.clone(), &mut builder(CommitMode::AfterDocument)).await;

    let err = transfer
        .store_document(&catalog_with_untitled_book())
        .await
        .unwrap_err();
    assert!(err.is_driver_operation_failed(), "{err}");

    // The failed insert never reaches the log.
    assert_eq!(
        log.labels(&schema.db),
        ["start", "insert Books", "rollback"]
    );

    log.clear();

    let retrieved = transfer
        .retrieve(&[Seed::Filter {
            table: books,
            filter: vec![],
        }])
        .await
        .unwrap();
    assert_tree!(retrieved, Tree::element("Catalog"));
}

async fn failed_insert_is_rolled_back_alone() {
    let schema = fixtures::catalog(true);
    let books = fixtures::table_id(&schema, "Books");
    let (mut transfer, _log) = setup(schema.clone(), &mut builder(CommitMode::AfterInsert)).await;

    let err = transfer
        .store_document(&catalog_with_untitled_book())
        .await
        .unwrap_err();
    assert!(err.is_driver_operation_failed(), "{err}");

    let retrieved = transfer
        .retrieve(&[Seed::Filter {
            table: books,
            filter: vec![],
        }])
        .await
        .unwrap();

    assert_tree!(
        retrieved,
        Tree::element("Catalog").child(
            Tree::element("Book")
                .attr("year", "1965")
                .text_child("Title", "Dune")
        )
    );
}

async fn conversion_failure_rolls_back_earlier_rows() {
    let schema = fixtures::catalog(true);
    let (mut transfer, log) = setup(schema.clone(), &mut builder(CommitMode::AfterDocument)).await;

    let doc = fixtures::books(&[("Dune", "1965"), ("A Tale of Two Cities", "1859")]);

    let err = transfer.store_document(&doc).await.unwrap_err();
    assert!(err.is_conversion(), "{err}");
    assert!(err.to_string().contains("title"), "{err}");

    assert_eq!(
        log.labels(&schema.db),
        ["start", "insert Books", "rollback"]
    );
}

tests!(
    commit_after_document,
    commit_after_insert,
    never_commit,
    failed_document_is_rolled_back,
    failed_insert_is_rolled_back_alone,
    conversion_failure_rolls_back_earlier_rows,
);
