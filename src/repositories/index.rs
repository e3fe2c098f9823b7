//! Derived lookup structures, built once from a loaded repository.

use std::collections::{BTreeSet, HashMap};

use crate::repositories::EntityRepository;
use crate::search::tokenize;

/// Category and token indexes over entity insertion positions.
///
/// Built in one pass over `EntityRepository::all()`; never updated after.
/// Reloading content means building a new repository and a new index.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    /// Category slug → positions, ascending. Every declared category has
    /// an entry, empty or not.
    by_category: HashMap<String, Vec<usize>>,
    /// Normalized token → positions.
    by_token: HashMap<String, BTreeSet<usize>>,
}

impl CatalogIndex {
    /// Builds both indexes from a validated repository.
    pub fn build(repo: &EntityRepository) -> Self {
        let mut by_category: HashMap<String, Vec<usize>> = repo
            .taxonomy()
            .iter()
            .map(|c| (c.slug.clone(), Vec::new()))
            .collect();
        let mut by_token: HashMap<String, BTreeSet<usize>> = HashMap::new();

        for (position, entity) in repo.all().iter().enumerate() {
            by_category
                .entry(entity.category.clone())
                .or_default()
                .push(position);

            for text in entity.searchable_text() {
                for token in tokenize(text) {
                    by_token.entry(token).or_default().insert(position);
                }
            }
        }

        tracing::debug!(
            entities = repo.count(),
            categories = by_category.len(),
            tokens = by_token.len(),
            "Built catalog index"
        );

        Self {
            by_category,
            by_token,
        }
    }

    /// Positions of entities in `category`; empty for unknown slugs.
    pub fn category_positions(&self, category: &str) -> &[usize] {
        self.by_category
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Positions of entities carrying an already-normalized `token`.
    pub fn token_positions(&self, token: &str) -> Option<&BTreeSet<usize>> {
        self.by_token.get(token)
    }

    /// Number of distinct indexed tokens.
    pub fn token_count(&self) -> usize {
        self.by_token.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Entity, Level, Taxonomy};

    fn levels() -> Vec<Level> {
        (1..=5).map(|rank| Level::new(rank, "Overview", "Body text never indexed")).collect()
    }

    fn repo() -> EntityRepository {
        let mut taxonomy = Taxonomy::clinical();
        taxonomy.push(Category::new("child-adolescent/behavioral-health", "Behavioral Health"));

        EntityRepository::load(
            vec![
                Entity::algorithm("acute-asthma", "Acute Asthma Exacerbation", "emergency")
                    .with_presentation("Acute wheezing, dyspnea, and accessory muscle use")
                    .with_red_flags(["Silent chest"])
                    .with_levels(levels()),
                Entity::topic("anxiety-children", "Anxiety in Children", "child-adolescent/behavioral-health")
                    .with_tags(["worry", "school"])
                    .with_levels(levels()),
                Entity::algorithm("anaphylaxis", "Anaphylaxis Management", "emergency")
                    .with_alternate_name("Manejo de la anafilaxia")
                    .with_levels(levels()),
            ],
            taxonomy,
        )
        .unwrap()
    }

    #[test]
    fn test_category_index() {
        let index = CatalogIndex::build(&repo());
        assert_eq!(index.category_positions("emergency"), &[0, 2]);
        assert_eq!(index.category_positions("child-adolescent/behavioral-health"), &[1]);
        assert!(index.category_positions("screening").is_empty());
        assert!(index.category_positions("nonexistent").is_empty());
    }

    #[test]
    fn test_token_index_sources() {
        let index = CatalogIndex::build(&repo());
        let positions = |t: &str| {
            index
                .token_positions(t)
                .map(|s| s.iter().copied().collect::<Vec<_>>())
                .unwrap_or_default()
        };

        assert_eq!(positions("wheezing"), vec![0]);
        assert_eq!(positions("silent"), vec![0]);
        assert_eq!(positions("worry"), vec![1]);
        assert_eq!(positions("anafilaxia"), vec![2]);
        assert_eq!(positions("emergency"), vec![0, 2]);
        assert_eq!(positions("behavioral"), vec![1]);
        assert_eq!(positions("overview"), vec![0, 1, 2]);
        assert!(positions("body").is_empty());
    }
}
