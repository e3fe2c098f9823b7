//! Domain models for the knowledge base.

mod category;
mod complexity;
mod entity;
mod level;

pub use category::{Category, Taxonomy};
pub use complexity::ComplexityLevel;
pub use entity::{Entity, EntityKind};
pub use level::{Level, Step};
