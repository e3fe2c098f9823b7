//! Entity model: a patient-education topic or a clinical decision algorithm.

use serde::{Deserialize, Serialize};

use super::Level;

/// What kind of entry an entity is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Patient-education module.
    #[default]
    Topic,
    /// Clinical decision algorithm; its levels may carry steps.
    Algorithm,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Topic => f.write_str("topic"),
            EntityKind::Algorithm => f.write_str("algorithm"),
        }
    }
}

/// An entry in the knowledge base.
///
/// The id is the only identity. Everything else is payload or search
/// material; `referral_criteria` and `guideline_source` are descriptive
/// strings, not links to other entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Stable slug (e.g. "htn-stepped").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Parallel-language name or synonym. Searchable, never identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_name: Option<String>,
    #[serde(default)]
    pub kind: EntityKind,
    /// Category slug, declared in the catalog's taxonomy.
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Clinical presentation the entry applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub red_flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_line_therapy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_line_therapy: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub referral_criteria: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guideline_source: Option<String>,
    /// Levels keyed by rank; a valid entity has ranks 1-5 exactly once.
    pub levels: Vec<Level>,
}

impl Entity {
    /// Creates a topic entity with no levels yet.
    pub fn topic(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            alternate_name: None,
            kind: EntityKind::Topic,
            category: category.into(),
            tags: Vec::new(),
            keywords: Vec::new(),
            presentation: None,
            red_flags: Vec::new(),
            first_line_therapy: None,
            second_line_therapy: None,
            referral_criteria: Vec::new(),
            guideline_source: None,
            levels: Vec::new(),
        }
    }

    /// Creates an algorithm entity with no levels yet.
    pub fn algorithm(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            kind: EntityKind::Algorithm,
            ..Self::topic(id, name, category)
        }
    }

    pub fn with_alternate_name(mut self, name: impl Into<String>) -> Self {
        self.alternate_name = Some(name.into());
        self
    }

    pub fn with_presentation(mut self, presentation: impl Into<String>) -> Self {
        self.presentation = Some(presentation.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_red_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.red_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_levels(mut self, levels: Vec<Level>) -> Self {
        self.levels = levels;
        self
    }

    pub fn is_algorithm(&self) -> bool {
        self.kind == EntityKind::Algorithm
    }

    /// Level with the given rank, by scan. Prefer `select_level` for
    /// validated entities.
    pub fn level(&self, rank: u8) -> Option<&Level> {
        self.levels.iter().find(|l| l.rank == rank)
    }

    /// Every free-text field that feeds the search index.
    ///
    /// Level bodies and referral criteria are not indexed.
    pub fn searchable_text(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.alternate_name.as_deref())
            .chain(std::iter::once(self.category.as_str()))
            .chain(self.tags.iter().map(String::as_str))
            .chain(self.keywords.iter().map(String::as_str))
            .chain(self.presentation.as_deref())
            .chain(self.red_flags.iter().map(String::as_str))
            .chain(self.first_line_therapy.as_deref())
            .chain(self.guideline_source.as_deref())
            .chain(
                self.levels
                    .iter()
                    .flat_map(|l| [l.title.as_str(), l.summary.as_str()]),
            )
    }
}
