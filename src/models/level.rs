//! A single complexity level of an entry and its algorithm steps.

use serde::{Deserialize, Serialize};

use super::ComplexityLevel;

/// Content for one complexity rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// Complexity rank (1-5).
    pub rank: u8,
    /// Heading shown for this level.
    #[serde(default)]
    pub title: String,
    /// Short summary (required).
    pub summary: String,
    /// Body payload. Opaque to the knowledge base.
    #[serde(default)]
    pub body: String,
    /// Ordered checklist, algorithm entries only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
}

impl Level {
    pub fn new(rank: u8, summary: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            rank,
            title: String::new(),
            summary: summary.into(),
            body: body.into(),
            steps: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// The tier this level is written for, if the rank is valid.
    pub fn complexity(&self) -> Option<ComplexityLevel> {
        ComplexityLevel::try_from(self.rank).ok()
    }
}

/// One step of a clinical decision algorithm.
///
/// `next_if_yes` / `next_if_no` are human-readable instructions, not
/// references to other steps; nothing resolves or follows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// 1-based position within its level.
    pub number: u32,
    /// What to do.
    pub action: String,
    /// Branch condition, usually phrased as a question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_if_yes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_if_no: Option<String>,
}

impl Step {
    pub fn new(number: u32, action: impl Into<String>) -> Self {
        Self {
            number,
            action: action.into(),
            criteria: None,
            next_if_yes: None,
            next_if_no: None,
        }
    }

    /// Adds a yes/no branch described in free text.
    pub fn branch(
        mut self,
        criteria: impl Into<String>,
        if_yes: impl Into<String>,
        if_no: impl Into<String>,
    ) -> Self {
        self.criteria = Some(criteria.into());
        self.next_if_yes = Some(if_yes.into());
        self.next_if_no = Some(if_no.into());
        self
    }
}
