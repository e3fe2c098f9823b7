//! Business logic over the loaded catalog.
//!
//! Services are resolved from the application `Context` with the
//! `FromContext` derive; validation runs before any context exists.

mod level;
mod query;
pub(crate) mod validation;

pub use level::{select_level, select_level_with, LevelFallback, LevelSelection, LevelSelector};
pub use query::{CatalogStats, CategorySummary, QueryService, SearchHit, SearchQuery};
pub use validation::{validate_all, validate_entity, SchemaValidator, SchemaViolation};
