pub mod entity;
pub mod error;
pub mod report;
pub mod schema;

pub use entity::{ALL_ENTITIES, Entity};
pub use error::{ModelError, Result};
pub use report::{EntityOutcome, OutputFormat, RunSummary};
pub use schema::{
    ColumnSpec, ParsePolicy, SemanticType, canonical_columns, coercion_schema, required_columns,
};
