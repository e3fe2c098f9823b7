//! Schema validation for entries and the taxonomy they are classified into.
//!
//! Validation runs once, before a catalog exists. Every rule is checked and
//! all violations are reported together, so a content author sees the whole
//! list in one pass.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Category, ComplexityLevel, Entity, EntityKind, Level, Taxonomy};

/// A broken schema rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// Id of the offending entity, or the category slug for taxonomy issues.
    pub entity_id: String,
    /// Field path (e.g. "levels[2].steps").
    pub field: String,
    /// Description of the rule that was broken.
    pub rule: String,
}

impl SchemaViolation {
    pub fn new(
        entity_id: impl Into<String>,
        field: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            field: field.into(),
            rule: rule.into(),
        }
    }
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = if self.entity_id.is_empty() {
            "<no id>"
        } else {
            &self.entity_id
        };
        write!(f, "{}: {}: {}", id, self.field, self.rule)
    }
}

/// Validates a single entity against the schema and taxonomy.
pub fn validate_entity(entity: &Entity, taxonomy: &Taxonomy) -> Result<(), Vec<SchemaViolation>> {
    let violations = SchemaValidator::new(taxonomy).check_entity(entity);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validates a whole content set: the taxonomy, every entity, and id
/// uniqueness across entities.
pub fn validate_all(taxonomy: &Taxonomy, entities: &[Entity]) -> Vec<SchemaViolation> {
    let validator = SchemaValidator::new(taxonomy);
    let mut violations = validator.check_taxonomy();
    violations.extend(validator.check_unique_ids(entities));
    for entity in entities {
        violations.extend(validator.check_entity(entity));
    }
    violations
}

/// Rule checks against a fixed taxonomy.
///
/// Checks for malformed identity, unknown categories, gaps in the level
/// ranks, misplaced or misnumbered steps, and blank required text.
pub struct SchemaValidator<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// All violations for one entity.
    pub fn check_entity(&self, entity: &Entity) -> Vec<SchemaViolation> {
        let mut out = Vec::new();
        self.check_identity(entity, &mut out);
        self.check_category(entity, &mut out);
        self.check_levels(entity, &mut out);
        for (index, level) in entity.levels.iter().enumerate() {
            self.check_level_content(entity, index, level, &mut out);
        }
        out
    }

    /// Category slugs must be well-formed and declared once.
    pub fn check_taxonomy(&self) -> Vec<SchemaViolation> {
        let mut out = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for (index, category) in self.taxonomy.iter().enumerate() {
            if !Category::is_valid_slug(&category.slug) {
                out.push(SchemaViolation::new(
                    &category.slug,
                    "category.slug",
                    "must be lower-case segments of [a-z0-9-] separated by '/'",
                ));
            }
            if category.name.trim().is_empty() {
                out.push(SchemaViolation::new(
                    &category.slug,
                    "category.name",
                    "must not be blank",
                ));
            }
            if let Some(first) = seen.insert(category.slug.as_str(), index) {
                out.push(SchemaViolation::new(
                    &category.slug,
                    "category.slug",
                    format!("duplicate category also declared at position {first}"),
                ));
            }
        }
        out
    }

    /// No two entities may share an id.
    pub fn check_unique_ids(&self, entities: &[Entity]) -> Vec<SchemaViolation> {
        let mut out = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for (index, entity) in entities.iter().enumerate() {
            if let Some(first) = seen.insert(entity.id.as_str(), index) {
                out.push(SchemaViolation::new(
                    &entity.id,
                    "id",
                    format!(
                        "duplicate id '{}' also used by entity #{} ('{}')",
                        entity.id, first, entities[first].name
                    ),
                ));
            }
        }
        out
    }

    fn check_identity(&self, entity: &Entity, out: &mut Vec<SchemaViolation>) {
        if entity.id.is_empty() {
            out.push(SchemaViolation::new("", "id", "must not be empty"));
        } else if !is_valid_id(&entity.id) {
            out.push(SchemaViolation::new(
                &entity.id,
                "id",
                "must be lower-case letters, digits and '-', not starting or ending with '-'",
            ));
        }
        if entity.name.trim().is_empty() {
            out.push(SchemaViolation::new(&entity.id, "name", "must not be blank"));
        }
    }

    fn check_category(&self, entity: &Entity, out: &mut Vec<SchemaViolation>) {
        if !self.taxonomy.contains(&entity.category) {
            out.push(SchemaViolation::new(
                &entity.id,
                "category",
                format!("unknown category '{}'", entity.category),
            ));
        }
    }

    /// Levels must be exactly ranks 1..=5, each once.
    fn check_levels(&self, entity: &Entity, out: &mut Vec<SchemaViolation>) {
        let mut present = [false; ComplexityLevel::MAX_RANK as usize];

        for level in &entity.levels {
            match ComplexityLevel::try_from(level.rank) {
                Ok(tier) => {
                    let slot = &mut present[usize::from(tier.rank()) - 1];
                    if *slot {
                        out.push(SchemaViolation::new(
                            &entity.id,
                            "levels",
                            format!("duplicate rank {}", level.rank),
                        ));
                    }
                    *slot = true;
                }
                Err(_) => out.push(SchemaViolation::new(
                    &entity.id,
                    "levels",
                    format!(
                        "rank {} outside {}..={}",
                        level.rank,
                        ComplexityLevel::MIN_RANK,
                        ComplexityLevel::MAX_RANK
                    ),
                )),
            }
        }

        for tier in ComplexityLevel::all() {
            if !present[usize::from(tier.rank()) - 1] {
                out.push(SchemaViolation::new(
                    &entity.id,
                    "levels",
                    format!("levels missing rank {}", tier.rank()),
                ));
            }
        }
    }

    /// Summary must be present; steps only on algorithms, numbered 1..=k.
    fn check_level_content(
        &self,
        entity: &Entity,
        index: usize,
        level: &Level,
        out: &mut Vec<SchemaViolation>,
    ) {
        let field = |name: &str| format!("levels[{index}].{name}");

        if level.summary.trim().is_empty() {
            out.push(SchemaViolation::new(
                &entity.id,
                field("summary"),
                "must not be blank",
            ));
        }

        if level.steps.is_empty() {
            return;
        }

        if entity.kind == EntityKind::Topic {
            out.push(SchemaViolation::new(
                &entity.id,
                field("steps"),
                "steps are only allowed on algorithm entities",
            ));
        }

        for (position, step) in level.steps.iter().enumerate() {
            let expected = position as u32 + 1;
            if step.number != expected {
                out.push(SchemaViolation::new(
                    &entity.id,
                    field("steps"),
                    format!(
                        "step numbers must run 1..={} without gaps; found {} at position {}",
                        level.steps.len(),
                        step.number,
                        expected
                    ),
                ));
            }
            if step.action.trim().is_empty() {
                out.push(SchemaViolation::new(
                    &entity.id,
                    format!("levels[{index}].steps[{position}].action"),
                    "must not be blank",
                ));
            }
        }
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.starts_with('-')
        && !id.ends_with('-')
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Step;

    fn five_levels() -> Vec<Level> {
        (1..=5)
            .map(|rank| Level::new(rank, format!("Summary {rank}"), "Body"))
            .collect()
    }

    fn rules(violations: &[SchemaViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.rule.as_str()).collect()
    }

    #[test]
    fn test_valid_topic_passes() {
        let entity = Entity::topic("copd-gold", "COPD", "chronic-disease").with_levels(five_levels());
        assert!(validate_entity(&entity, &Taxonomy::clinical()).is_ok());
    }

    #[test]
    fn test_missing_level_three() {
        let levels = five_levels().into_iter().filter(|l| l.rank != 3).collect();
        let entity = Entity::topic("copd-gold", "COPD", "chronic-disease").with_levels(levels);

        let violations = validate_entity(&entity, &Taxonomy::clinical()).unwrap_err();
        assert_eq!(rules(&violations), vec!["levels missing rank 3"]);
        assert_eq!(violations[0].field, "levels");
    }

    #[test]
    fn test_duplicate_and_out_of_range_ranks() {
        let mut levels = five_levels();
        levels.push(Level::new(2, "Again", ""));
        levels.push(Level::new(6, "Too deep", ""));
        let entity = Entity::topic("x", "X", "screening").with_levels(levels);

        let violations = validate_entity(&entity, &Taxonomy::clinical()).unwrap_err();
        assert_eq!(rules(&violations), vec!["duplicate rank 2", "rank 6 outside 1..=5"]);
    }

    #[test]
    fn test_no_levels_reports_every_rank() {
        let entity = Entity::topic("x", "X", "screening");
        let violations = validate_entity(&entity, &Taxonomy::clinical()).unwrap_err();
        assert_eq!(violations.len(), 5);
    }

    #[test]
    fn test_identity_and_category_rules() {
        let entity = Entity::topic("Bad Id", "  ", "cardiology").with_levels(five_levels());
        let violations = validate_entity(&entity, &Taxonomy::clinical()).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "name", "category"]);
        assert_eq!(violations[2].rule, "unknown category 'cardiology'");
    }

    #[test]
    fn test_steps_on_topic_rejected() {
        let mut levels = five_levels();
        levels[0].steps = vec![Step::new(1, "Do something")];
        let entity = Entity::topic("x", "X", "screening").with_levels(levels);

        let violations = validate_entity(&entity, &Taxonomy::clinical()).unwrap_err();
        assert_eq!(violations[0].field, "levels[0].steps");
        assert_eq!(violations[0].rule, "steps are only allowed on algorithm entities");
    }

    #[test]
    fn test_step_gap_rejected() {
        let mut levels = five_levels();
        levels[4].steps = vec![
            Step::new(1, "Obtain ECG"),
            Step::new(3, "Draw troponin"),
        ];
        let entity = Entity::algorithm("chest-pain-eval", "Chest Pain", "emergency").with_levels(levels);

        let violations = validate_entity(&entity, &Taxonomy::clinical()).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].rule.contains("found 3 at position 2"));
    }

    #[test]
    fn test_contiguous_steps_on_algorithm_pass() {
        let mut levels = five_levels();
        levels[2].steps = vec![
            Step::new(1, "Obtain ECG").branch("ST-elevation?", "Activate cath lab", "Step 2"),
            Step::new(2, "Draw troponin"),
        ];
        let entity = Entity::algorithm("chest-pain-eval", "Chest Pain", "emergency").with_levels(levels);
        assert!(validate_entity(&entity, &Taxonomy::clinical()).is_ok());
    }

    #[test]
    fn test_level_content_rules() {
        let with_steps = |level: usize, numbers: &[u32], action: &str| {
            let mut levels = five_levels();
            levels[level].steps = numbers.iter().map(|&n| Step::new(n, action)).collect();
            Entity::algorithm("sepsis-bundle", "Sepsis", "emergency").with_levels(levels)
        };
        let blank_summary = {
            let mut levels = five_levels();
            levels[1].summary = "   ".to_string();
            Entity::topic("sepsis-bundle", "Sepsis", "emergency").with_levels(levels)
        };

        let cases: Vec<(&str, Entity, Vec<(&str, &str)>)> = vec![
            (
                "blank summary",
                blank_summary,
                vec![("levels[1].summary", "must not be blank")],
            ),
            (
                "blank step action",
                with_steps(0, &[1], " "),
                vec![("levels[0].steps[0].action", "must not be blank")],
            ),
            (
                "duplicate step number",
                with_steps(3, &[1, 1], "Measure lactate"),
                vec![(
                    "levels[3].steps",
                    "step numbers must run 1..=2 without gaps; found 1 at position 2",
                )],
            ),
            (
                "steps out of order",
                with_steps(3, &[2, 1], "Measure lactate"),
                vec![
                    (
                        "levels[3].steps",
                        "step numbers must run 1..=2 without gaps; found 2 at position 1",
                    ),
                    (
                        "levels[3].steps",
                        "step numbers must run 1..=2 without gaps; found 1 at position 2",
                    ),
                ],
            ),
        ];

        for (name, entity, expected) in cases {
            let violations = validate_entity(&entity, &Taxonomy::clinical()).unwrap_err();
            let found: Vec<(&str, &str)> = violations
                .iter()
                .map(|v| (v.field.as_str(), v.rule.as_str()))
                .collect();
            assert_eq!(found, expected, "case: {name}");
        }
    }

    #[test]
    fn test_malformed_category_slug() {
        let mut taxonomy = Taxonomy::clinical();
        taxonomy.push(Category::new("Cardiology", "Cardiology"));

        let violations = validate_all(&taxonomy, &[]);
        assert_eq!(
            violations,
            vec![SchemaViolation::new(
                "Cardiology",
                "category.slug",
                "must be lower-case segments of [a-z0-9-] separated by '/'",
            )]
        );
    }

    #[test]
    fn test_validate_all_reports_duplicates_and_taxonomy() {
        let mut taxonomy = Taxonomy::clinical();
        taxonomy.push(Category::new("emergency", "Emergency again"));

        let a = Entity::topic("afib-rate-rhythm", "AF", "management").with_levels(five_levels());
        let b = a.clone();

        let violations = validate_all(&taxonomy, &[a, b]);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].rule.starts_with("duplicate category"));
        assert_eq!(
            violations[1].rule,
            "duplicate id 'afib-rate-rhythm' also used by entity #0 ('AF')"
        );
    }

    #[test]
    fn test_violation_display() {
        let v = SchemaViolation::new("", "id", "must not be empty");
        assert_eq!(v.to_string(), "<no id>: id: must not be empty");
    }
}
