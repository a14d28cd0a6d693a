mod cache;
pub use cache::MappingCache;

mod keys;

mod order_tracker;
pub use order_tracker::{Order, OrderTracker};

mod retrieve;

mod row;

mod store;

mod transfer;
pub use transfer::{
    Builder, CommitMode, DocumentLocationInfo, Options, RootLocation, Seed, Transfer,
};

pub mod driver {
    pub use xmlrel_core::driver::*;

    #[cfg(feature = "sqlite")]
    pub use xmlrel_driver_sqlite as sqlite;
}

pub use xmlrel_core::{
    document, schema, stmt, Document, DocumentMut, Error, NodeId, Result, Schema, Tree,
    XmlDocument,
};
