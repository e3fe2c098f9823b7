//! Entity repository: the canonical, immutable, validated entry set.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{Entity, Taxonomy};
use crate::services::validate_all;

/// Owns every entity after load and answers id lookups in O(1).
///
/// A repository only exists for content that passed validation, so
/// anything built from one (the index, the query service) can trust every
/// entity it sees. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct EntityRepository {
    entities: Arc<[Entity]>,
    positions: Arc<HashMap<String, usize>>,
    taxonomy: Arc<Taxonomy>,
}

impl EntityRepository {
    /// Validate and take ownership of `entities`, keeping insertion order.
    ///
    /// Fails with `DuplicateId` on the first repeated id before any other
    /// check, then with `Schema` carrying every violation found.
    pub fn load(entities: Vec<Entity>, taxonomy: Taxonomy) -> Result<Self, AppError> {
        let mut positions = HashMap::with_capacity(entities.len());
        for (index, entity) in entities.iter().enumerate() {
            if let Some(first) = positions.insert(entity.id.clone(), index) {
                tracing::warn!(id = %entity.id, first, second = index, "Duplicate entity id");
                return Err(AppError::DuplicateId {
                    id: entity.id.clone(),
                    first,
                    second: index,
                });
            }
        }

        let violations = validate_all(&taxonomy, &entities);
        if !violations.is_empty() {
            tracing::warn!(count = violations.len(), "Content failed schema validation");
            return Err(AppError::Schema(violations));
        }

        Ok(Self {
            entities: entities.into(),
            positions: Arc::new(positions),
            taxonomy: Arc::new(taxonomy),
        })
    }

    /// Find an entity by id.
    pub fn find_by_id(&self, id: &str) -> Option<&Entity> {
        self.positions.get(id).map(|&pos| &self.entities[pos])
    }

    /// Get an entity by id, or `EntityNotFound`.
    pub fn get_by_id(&self, id: &str) -> Result<&Entity, AppError> {
        self.find_by_id(id)
            .ok_or_else(|| AppError::EntityNotFound(id.to_string()))
    }

    /// Entity at an insertion position.
    pub fn get(&self, position: usize) -> Option<&Entity> {
        self.entities.get(position)
    }

    /// All entities in insertion order.
    pub fn all(&self) -> &[Entity] {
        &self.entities
    }

    pub fn count(&self) -> usize {
        self.entities.len()
    }

    /// The taxonomy the entities were validated against.
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;

    fn entity(id: &str, category: &str) -> Entity {
        Entity::topic(id, id.to_uppercase(), category).with_levels(
            (1..=5)
                .map(|rank| Level::new(rank, "Summary", "Body"))
                .collect(),
        )
    }

    #[test]
    fn test_load_and_lookup() {
        let repo = EntityRepository::load(
            vec![
                entity("htn-stepped", "chronic-disease"),
                entity("copd-gold", "chronic-disease"),
            ],
            Taxonomy::clinical(),
        )
        .unwrap();

        assert_eq!(repo.count(), 2);
        assert_eq!(repo.get_by_id("htn-stepped").unwrap().name, "HTN-STEPPED");
        assert!(matches!(
            repo.get_by_id("unknown-id"),
            Err(AppError::EntityNotFound(id)) if id == "unknown-id"
        ));
    }

    #[test]
    fn test_lookup_returns_every_loaded_entity() {
        let input = vec![
            entity("a", "emergency"),
            entity("b", "screening"),
            entity("c", "management"),
        ];
        let repo = EntityRepository::load(input.clone(), Taxonomy::clinical()).unwrap();
        for e in &input {
            assert_eq!(repo.get_by_id(&e.id).unwrap(), e);
        }
    }

    #[test]
    fn test_all_keeps_insertion_order() {
        let repo = EntityRepository::load(
            vec![entity("z", "emergency"), entity("a", "emergency"), entity("m", "emergency")],
            Taxonomy::clinical(),
        )
        .unwrap();
        let ids: Vec<&str> = repo.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
        assert_eq!(repo.get(1).map(|e| e.id.as_str()), Some("a"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = EntityRepository::load(
            vec![
                entity("afib-rate-rhythm", "management"),
                entity("afib-rate-rhythm", "emergency"),
            ],
            Taxonomy::clinical(),
        );

        match result {
            Err(AppError::DuplicateId { id, first, second }) => {
                assert_eq!(id, "afib-rate-rhythm");
                assert_eq!((first, second), (0, 1));
            }
            other => panic!("expected DuplicateId, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_entity_rejected() {
        let mut broken = entity("copd-gold", "chronic-disease");
        broken.levels.retain(|l| l.rank != 3);

        let result = EntityRepository::load(vec![broken], Taxonomy::clinical());
        match result {
            Err(AppError::Schema(violations)) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].rule, "levels missing rank 3");
            }
            other => panic!("expected Schema, got {other:?}"),
        }
    }
}
