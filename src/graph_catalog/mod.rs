pub mod errors;
pub mod field_resolver;
pub mod schema_model;
pub mod type_graph;

// Re-export commonly used types
pub use errors::{GraphSchemaError, PathResolutionError};
pub use field_resolver::{FieldLookup, FieldResolver, PathSegment, ResolvedPath};
pub use schema_model::{base_type, FieldKind, FieldType, SchemaModel, TypeDef};
pub use type_graph::{TypeEdge, TypeGraph};
