mod class_map;
pub use class_map::{ClassMap, ClassMapId, ClassMapKind};

mod content;
pub use content::{ChildMap, Content, InlineClassMap, RelatedClassMap};

mod property;
pub use property::{PropertyKind, PropertyMap, PropertyTable};

mod schema;
pub use schema::{ElementRef, Schema};
