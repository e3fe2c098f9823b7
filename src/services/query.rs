//! Query service: the read-only public surface over a loaded catalog.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::context::{AppCatalog, Context};
use crate::di::FromContext;
use crate::error::AppError;
use crate::models::{Category, Entity, EntityKind};
use crate::search::query_tokens;

/// Text search with optional category filter and result cap.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Free text; tokenized like the index.
    pub text: String,
    /// Only return entities in this category.
    pub category: Option<String>,
    /// Maximum number of hits.
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Restrict to one category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set result limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A search result and its match breadth.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    /// Number of distinct query tokens that matched.
    pub score: usize,
    pub entity: &'a Entity,
}

/// A category with its entry count.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary<'a> {
    #[serde(flatten)]
    pub category: &'a Category,
    pub count: usize,
}

/// Catalog statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub entity_count: usize,
    pub topic_count: usize,
    pub algorithm_count: usize,
    pub category_count: usize,
    pub token_count: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Lookup, category listing and ranked search over a catalog.
///
/// Every operation is a pure read of immutable data. Clones are cheap and
/// may be used from any thread.
#[derive(FromContext, Clone)]
pub struct QueryService {
    catalog: AppCatalog,
}

impl QueryService {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Get an entity by id.
    pub fn get_by_id(&self, id: &str) -> Result<&Entity, AppError> {
        self.catalog.repo().get_by_id(id)
    }

    /// Entities in `category`, in insertion order. Unknown or empty
    /// categories yield an empty list.
    pub fn by_category(&self, category: &str) -> Vec<&Entity> {
        let repo = self.catalog.repo();
        self.catalog
            .index()
            .category_positions(category)
            .iter()
            .filter_map(|&pos| repo.get(pos))
            .collect()
    }

    /// Entities matching any token of `query`, most tokens matched first,
    /// ties in insertion order.
    pub fn search(&self, query: &str) -> Vec<&Entity> {
        self.search_with(&SearchQuery::new(query))
            .into_iter()
            .map(|hit| hit.entity)
            .collect()
    }

    /// Scored search with filter and limit.
    pub fn search_with(&self, query: &SearchQuery) -> Vec<SearchHit<'_>> {
        let tokens = query_tokens(&query.text);
        let index = self.catalog.index();
        let repo = self.catalog.repo();

        let mut scores: HashMap<usize, usize> = HashMap::new();
        for token in &tokens {
            if let Some(positions) = index.token_positions(token) {
                for &pos in positions {
                    *scores.entry(pos).or_default() += 1;
                }
            }
        }

        let mut ranked: Vec<(usize, usize)> = scores.into_iter().collect();
        ranked.sort_unstable_by(|(pos_a, score_a), (pos_b, score_b)| {
            score_b.cmp(score_a).then(pos_a.cmp(pos_b))
        });

        let hits: Vec<SearchHit<'_>> = ranked
            .into_iter()
            .filter_map(|(pos, score)| repo.get(pos).map(|entity| SearchHit { score, entity }))
            .filter(|hit| match &query.category {
                Some(category) => hit.entity.category == *category,
                None => true,
            })
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        tracing::debug!(
            query = %query.text,
            tokens = tokens.len(),
            hits = hits.len(),
            "Search"
        );
        hits
    }

    /// Number of entities.
    pub fn count(&self) -> usize {
        self.catalog.repo().count()
    }

    /// Every declared category with its entry count, in taxonomy order.
    pub fn categories(&self) -> Vec<CategorySummary<'_>> {
        let index = self.catalog.index();
        self.catalog
            .taxonomy()
            .iter()
            .map(|category| CategorySummary {
                category,
                count: index.category_positions(&category.slug).len(),
            })
            .collect()
    }

    /// Counts across the catalog.
    pub fn stats(&self) -> CatalogStats {
        let all = self.catalog.repo().all();
        let algorithm_count = all
            .iter()
            .filter(|e| e.kind == EntityKind::Algorithm)
            .count();

        CatalogStats {
            entity_count: all.len(),
            topic_count: all.len() - algorithm_count,
            algorithm_count,
            category_count: self.catalog.taxonomy().len(),
            token_count: self.catalog.index().token_count(),
            loaded_at: self.catalog.loaded_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Level, Taxonomy};

    fn levels() -> Vec<Level> {
        (1..=5).map(|rank| Level::new(rank, "Overview", "")).collect()
    }

    fn service() -> QueryService {
        let catalog = Catalog::load(
            Taxonomy::clinical(),
            vec![
                Entity::algorithm("acute-asthma", "Acute Asthma Exacerbation", "emergency")
                    .with_presentation("Acute wheezing, dyspnea, and accessory muscle use")
                    .with_levels(levels()),
                Entity::topic("copd-gold", "COPD GOLD Staging", "chronic-disease")
                    .with_tags(["wheezing", "dyspnea"])
                    .with_levels(levels()),
                Entity::algorithm("anaphylaxis", "Anaphylaxis Management", "emergency")
                    .with_levels(levels()),
            ],
        )
        .unwrap();
        QueryService::new(Arc::new(catalog))
    }

    fn ids(entities: &[&Entity]) -> Vec<String> {
        entities.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_get_by_id() {
        let svc = service();
        assert_eq!(svc.get_by_id("copd-gold").unwrap().name, "COPD GOLD Staging");
        assert!(matches!(svc.get_by_id("nope"), Err(AppError::EntityNotFound(_))));
    }

    #[test]
    fn test_by_category() {
        let svc = service();
        assert_eq!(ids(&svc.by_category("emergency")), vec!["acute-asthma", "anaphylaxis"]);
        assert!(svc.by_category("screening").is_empty());
        assert!(svc.by_category("not-a-category").is_empty());
    }

    #[test]
    fn test_search_scores_by_breadth() {
        let svc = service();

        let hits = svc.search_with(&SearchQuery::new("wheezing"));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.score == 1));
        // tie → insertion order
        assert_eq!(hits[0].entity.id, "acute-asthma");

        let hits = svc.search_with(&SearchQuery::new("wheezing emergency"));
        assert_eq!(hits[0].entity.id, "acute-asthma");
        assert_eq!(hits[0].score, 2);
        let ids: Vec<&str> = hits.iter().map(|h| h.entity.id.as_str()).collect();
        assert_eq!(ids, vec!["acute-asthma", "copd-gold", "anaphylaxis"]);
    }

    #[test]
    fn test_search_repeated_token_counts_once() {
        let svc = service();
        let hits = svc.search_with(&SearchQuery::new("wheezing WHEEZING wheezing"));
        assert!(hits.iter().all(|h| h.score == 1));
    }

    #[test]
    fn test_search_no_match_and_blank() {
        let svc = service();
        assert!(svc.search("zebra").is_empty());
        assert!(svc.search("").is_empty());
        assert!(svc.search("  ?! ").is_empty());
    }

    #[test]
    fn test_search_filter_and_limit() {
        let svc = service();
        let hits = svc.search_with(&SearchQuery::new("wheezing").category("chronic-disease"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity.id, "copd-gold");

        let hits = svc.search_with(&SearchQuery::new("overview").limit(2));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_search_is_deterministic() {
        let svc = service();
        let first = ids(&svc.search("acute wheezing emergency overview"));
        for _ in 0..10 {
            assert_eq!(ids(&svc.search("acute wheezing emergency overview")), first);
        }
    }

    #[test]
    fn test_categories_and_stats() {
        let svc = service();
        let categories = svc.categories();
        let counts: Vec<(&str, usize)> = categories
            .iter()
            .map(|c| (c.category.slug.as_str(), c.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("emergency", 2),
                ("chronic-disease", 1),
                ("screening", 0),
                ("diagnostic", 0),
                ("management", 0),
            ]
        );

        let stats = svc.stats();
        assert_eq!(svc.count(), 3);
        assert_eq!(stats.entity_count, 3);
        assert_eq!(stats.algorithm_count, 2);
        assert_eq!(stats.topic_count, 1);
        assert_eq!(stats.category_count, 5);
    }
}
