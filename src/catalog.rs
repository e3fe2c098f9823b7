//! The loaded knowledge base: repository plus its derived index.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{Entity, Taxonomy};
use crate::repositories::{CatalogIndex, EntityRepository};

/// An immutable, validated content set ready to be queried.
///
/// Construction is the only phase that does any work; afterwards the
/// catalog is read-only and can be shared across threads behind an `Arc`.
/// Replacing content means loading a new catalog and swapping the `Arc`.
#[derive(Debug, Clone)]
pub struct Catalog {
    repo: EntityRepository,
    index: CatalogIndex,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Validates `entities` against `taxonomy` and builds the indexes.
    ///
    /// Nothing is constructed if any entity is invalid or any id repeats.
    pub fn load(taxonomy: Taxonomy, entities: Vec<Entity>) -> Result<Self, AppError> {
        let repo = EntityRepository::load(entities, taxonomy)?;
        let index = CatalogIndex::build(&repo);

        tracing::info!(
            entities = repo.count(),
            categories = repo.taxonomy().len(),
            tokens = index.token_count(),
            "Loaded catalog"
        );

        Ok(Self {
            repo,
            index,
            loaded_at: Utc::now(),
        })
    }

    /// The taxonomy the catalog was validated against.
    pub fn taxonomy(&self) -> &Taxonomy {
        self.repo.taxonomy()
    }

    /// When the catalog finished loading.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub(crate) fn repo(&self) -> &EntityRepository {
        &self.repo
    }

    pub(crate) fn index(&self) -> &CatalogIndex {
        &self.index
    }
}
