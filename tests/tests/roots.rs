use tests::{assert_tree, fixtures, setup, tests};
use xmlrel::{
    driver::SequenceKeyGenerator,
    schema::XmlName,
    stmt::{Value, ValueRecord},
    Seed, Transfer, Tree,
};

fn book_tree(title: &str, year: &str) -> Tree {
    Tree::element("Book")
        .attr("year", year)
        .text_child("Title", title)
}

async fn ignored_root_holds_many_roots() {
    let schema = fixtures::catalog(true);
    let (mut transfer, log) = setup(
        schema.clone(),
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let doc = fixtures::books(&[("Dune", "1965"), ("Emma", "1815"), ("Ulysses", "1922")]);

    let location = transfer.store_document(&doc).await.unwrap();
    assert_eq!(location.ignored_root, Some(XmlName::new("Catalog")));
    assert_eq!(location.roots.len(), 3);
    assert_eq!(
        log.inserted_tables(&schema.db),
        ["Books", "Books", "Books"]
    );

    let retrieved = transfer.retrieve_document(&location).await.unwrap();
    assert_tree!(retrieved, doc.tree().unwrap());
}

async fn retrieving_several_rows_needs_an_ignored_root() {
    let schema = fixtures::catalog(false);
    let books = fixtures::table_id(&schema, "Books");
    let title = schema.db.table(books).column_by_name("title").unwrap().id;

    let (mut transfer, _log) = setup(
        schema,
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    for (title, year) in [("Dune", "1965"), ("Emma", "1815"), ("Ulysses", "1922")] {
        transfer
            .store_document(&fixtures::book(title, year))
            .await
            .unwrap();
    }

    let err = transfer
        .retrieve(&[Seed::Filter {
            table: books,
            filter: vec![],
        }])
        .await
        .unwrap_err();
    assert!(err.is_ambiguous_root(), "{err}");

    let retrieved = transfer
        .retrieve(&[Seed::Filter {
            table: books,
            filter: vec![(title, Value::from("Emma"))],
        }])
        .await
        .unwrap();
    assert_tree!(retrieved, book_tree("Emma", "1815"));

    let err = transfer
        .retrieve(&[Seed::Filter {
            table: books,
            filter: vec![(title, Value::from("Beowulf"))],
        }])
        .await
        .unwrap_err();
    assert!(err.is_structural_violation(), "{err}");
}

async fn seed_rows_wrapped_by_the_ignored_root() {
    let schema = fixtures::catalog(true);
    let books = fixtures::table_id(&schema, "Books");

    let (mut transfer, _log) = setup(
        schema,
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let doc = fixtures::books(&[("Dune", "1965"), ("Emma", "1815")]);
    transfer.store_document(&doc).await.unwrap();

    let retrieved = transfer
        .retrieve(&[Seed::Filter {
            table: books,
            filter: vec![],
        }])
        .await
        .unwrap();

    assert_tree!(
        retrieved,
        Tree::element("Catalog")
            .child(book_tree("Dune", "1965"))
            .child(book_tree("Emma", "1815"))
    );
}

async fn supplied_rows() {
    let schema = fixtures::catalog(false);
    let books = fixtures::table_id(&schema, "Books");

    let (mut transfer, log) = setup(schema, &mut Transfer::builder()).await;

    let row = ValueRecord::from_vec(vec![
        Value::I64(9),
        Value::from("Walden"),
        Value::I64(1854),
    ]);

    let retrieved = transfer
        .retrieve(&[Seed::Rows {
            table: books,
            rows: vec![row],
        }])
        .await
        .unwrap();

    assert_tree!(retrieved, book_tree("Walden", "1854"));
    assert!(log.is_empty());

    let err = transfer
        .retrieve(&[Seed::Rows {
            table: books,
            rows: vec![ValueRecord::from_vec(vec![Value::I64(9)])],
        }])
        .await
        .unwrap_err();
    assert!(err.is_invalid_mapping(), "{err}");
}

async fn wrapper_is_rejected_without_an_ignored_root() {
    let schema = fixtures::catalog(false);
    let (mut transfer, log) = setup(
        schema,
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let doc = fixtures::books(&[("Dune", "1965")]);

    let err = transfer.store_document(&doc).await.unwrap_err();
    assert!(err.is_invalid_mapping(), "{err}");
    assert_eq!(log.transactions().len(), 2);
}

tests!(
    ignored_root_holds_many_roots,
    retrieving_several_rows_needs_an_ignored_root,
    seed_rows_wrapped_by_the_ignored_root,
    supplied_rows,
    wrapper_is_rejected_without_an_ignored_root,
);
