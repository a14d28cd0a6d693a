/// Declares a `#[tokio::test]` for each listed async test function, run
/// against an in-memory SQLite database.
#[macro_export]
macro_rules! tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+ $(,)?
    ) => {
        mod sqlite {
            $(
                #[tokio::test]
                $( #[$attrs] )*
                async fn $f() {
                    $crate::init_tracing();
                    super::$f().await;
                }
            )*
        }
    };
}

/// Asserts that a document holds exactly the expected tree.
#[macro_export]
macro_rules! assert_tree {
    ($doc:expr, $expect:expr) => {
        $crate::pretty_assertions::assert_eq!($doc.tree(), Some($expect));
    };
}
