use std::sync::Arc;
use tests::{assert_tree, setup, tests};
use xmlrel::{
    driver::SequenceKeyGenerator, schema::MapSource, MappingCache, Transfer, Tree,
};

const CATALOG: &str = r#"
{
  "tables": [
    {
      "name": "Books",
      "columns": [
        { "name": "id", "type": { "integer": 8 }, "nullable": false },
        { "name": "title", "type": { "var_char": 40 } },
        { "name": "published", "type": "date", "format": "%d/%m/%Y" }
      ],
      "keys": [{ "name": "pk", "kind": "primary", "columns": ["id"], "generated": true }]
    }
  ],
  "classes": [
    { "element": "Catalog", "kind": "ignored_root" },
    {
      "element": "Book",
      "kind": "root_table",
      "table": "Books",
      "attributes": { "published": { "column": "published" } },
      "pcdata": { "column": "title" }
    }
  ],
  "use_class_maps": { "Novel": "Book" }
}
"#;

fn compile(src: &str) -> xmlrel::Result<xmlrel::Schema> {
    MapSource::from_json(src)?.compile()
}

async fn compiled_once_and_shared() {
    let cache = MappingCache::global();

    let first = cache
        .get_or_compile("tests/mapping_cache/catalog", || compile(CATALOG))
        .unwrap();
    let second = cache
        .get_or_compile("tests/mapping_cache/catalog", || {
            panic!("the mapping is already compiled")
        })
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

async fn declarative_mapping_round_trip() {
    let cache = MappingCache::new();
    let schema = cache
        .get_or_compile("catalog", || compile(CATALOG))
        .unwrap();

    let (mut transfer, _log) = setup(
        schema,
        Transfer::builder().key_generator(SequenceKeyGenerator::new()),
    )
    .await;

    let doc = {
        use xmlrel::DocumentMut;

        let (mut doc, root) = xmlrel::XmlDocument::with_root("Catalog");
        let book = doc.add_element(root, "Book");
        doc.set_attribute(book, "published".into(), "14/03/1965".to_string());
        doc.add_text(book, "Dune");

        // Mapped with the class map of `Book`.
        let novel = doc.add_element(root, "Novel");
        doc.add_text(novel, "Emma");
        doc
    };

    let location = transfer.store_document(&doc).await.unwrap();
    assert_eq!(location.roots.len(), 2);
    assert_eq!(location.roots[1].element.local, "Novel");

    let retrieved = transfer.retrieve_document(&location).await.unwrap();
    assert_tree!(
        retrieved,
        Tree::element("Catalog")
            .child(
                Tree::element("Book")
                    .attr("published", "14/03/1965")
                    .child(Tree::text("Dune"))
            )
            .child(Tree::element("Novel").child(Tree::text("Emma")))
    );
}

async fn invalid_mapping_is_not_cached() {
    let cache = MappingCache::new();
    let broken = CATALOG.replace(r#""table": "Books""#, r#""table": "Volumes""#);

    let err = cache
        .get_or_compile("catalog", || compile(&broken))
        .unwrap_err();
    assert!(err.is_invalid_mapping(), "{err}");
    assert!(cache.get("catalog").is_none());

    cache
        .get_or_compile("catalog", || compile(CATALOG))
        .unwrap();
    assert!(cache.get("catalog").is_some());
}

tests!(
    compiled_once_and_shared,
    declarative_mapping_round_trip,
    invalid_mapping_is_not_cached,
);
