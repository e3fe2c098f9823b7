//! Data access layer over the loaded content.
//!
//! The repository owns the entities; the index is derived from it. Neither
//! is part of the public API; callers go through `QueryService`.

mod entity;
mod index;

pub use entity::EntityRepository;
pub use index::CatalogIndex;
