//! Vademecum - multi-level clinical knowledge base.
//!
//! Patient-education topics and clinical decision algorithms, each written
//! at five reader-complexity levels, validated once at load and queried by
//! id, category, and ranked token search.
//!
//! ```ignore
//! let catalog = Catalog::load(Taxonomy::clinical(), entities)?;
//! let query = QueryService::new(Arc::new(catalog));
//! let entry = query.get_by_id("acute-asthma")?;
//! let level = select_level(entry, 2)?;
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod models;
pub(crate) mod repositories;
pub mod search;
pub mod services;
pub mod source;

pub use catalog::Catalog;
pub use context::Context;
pub use error::AppError;
pub use models::{Category, ComplexityLevel, Entity, EntityKind, Level, Step, Taxonomy};
pub use services::{
    select_level, select_level_with, LevelFallback, QueryService, SchemaViolation, SearchQuery,
};

// Re-export FromRef at crate root for vademecum-macros generated code
pub use di::FromRef;
