//! Category model and the closed taxonomy entries are classified into.

use serde::{Deserialize, Serialize};

/// A category for classifying entries.
///
/// The slug is the identity; segments are separated by `/` for subject
/// areas nested under a discipline (e.g. `child-adolescent/behavioral-health`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable slug (e.g. "emergency", "chronic-disease").
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Optional description of what belongs here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether `slug` is lower-case segments of `[a-z0-9-]` joined by `/`.
    pub fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.split('/').all(|segment| {
                !segment.is_empty()
                    && !segment.starts_with('-')
                    && !segment.ends_with('-')
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            })
    }
}

/// The closed, ordered set of categories known when a catalog is built.
///
/// Entries naming a category outside the taxonomy fail validation; nothing
/// is inferred from entry data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    /// The clinical algorithm categories every catalog starts with.
    pub fn clinical() -> Self {
        Self {
            categories: vec![
                Category::new("emergency", "Emergency")
                    .with_description("Time-critical presentations"),
                Category::new("chronic-disease", "Chronic Disease")
                    .with_description("Long-term disease management pathways"),
                Category::new("screening", "Screening")
                    .with_description("Population and risk-based screening"),
                Category::new("diagnostic", "Diagnostic")
                    .with_description("Diagnostic work-up algorithms"),
                Category::new("management", "Management")
                    .with_description("General management pathways"),
            ],
        }
    }

    /// Adds a category, keeping declaration order.
    pub fn push(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub fn get(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
