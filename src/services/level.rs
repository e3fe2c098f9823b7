//! Level selection for a retrieved entity.
//!
//! `select_level` never substitutes: an out-of-range rank is reported as
//! `LevelNotFound`. Substitution happens only through an explicit
//! `LevelFallback` chosen by the caller.

use serde::{Deserialize, Serialize};

use crate::context::{AppConfig, Context};
use crate::di::FromContext;
use crate::error::AppError;
use crate::models::{ComplexityLevel, Entity, Level};

/// What to do when the requested rank is outside 1-5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelFallback {
    /// Report `LevelNotFound`.
    #[default]
    Strict,
    /// Clamp into the valid range.
    Nearest,
    /// Use level 1.
    Lowest,
}

impl std::str::FromStr for LevelFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(LevelFallback::Strict),
            "nearest" => Ok(LevelFallback::Nearest),
            "lowest" => Ok(LevelFallback::Lowest),
            _ => Err(format!(
                "Invalid fallback '{}'. Valid values: strict, nearest, lowest",
                s
            )),
        }
    }
}

/// A selected level and whether it stands in for the requested one.
#[derive(Debug, Clone, Serialize)]
pub struct LevelSelection<'a> {
    pub level: &'a Level,
    pub requested: i64,
    /// True when `level.rank` differs from `requested`.
    pub substituted: bool,
}

/// Returns the level with rank `rank`, or `LevelNotFound`.
///
/// Total for ranks 1-5 on a validated entity.
pub fn select_level(entity: &Entity, rank: i64) -> Result<&Level, AppError> {
    ComplexityLevel::from_rank(rank)
        .and_then(|tier| level_at(entity, tier))
        .ok_or_else(|| AppError::level_not_found(rank))
}

/// Like `select_level`, applying `fallback` to out-of-range ranks.
pub fn select_level_with(
    entity: &Entity,
    rank: i64,
    fallback: LevelFallback,
) -> Result<LevelSelection<'_>, AppError> {
    let effective = match (ComplexityLevel::from_rank(rank), fallback) {
        (Some(_), _) => rank,
        (None, LevelFallback::Strict) => return Err(AppError::level_not_found(rank)),
        (None, LevelFallback::Nearest) => rank.clamp(
            i64::from(ComplexityLevel::MIN_RANK),
            i64::from(ComplexityLevel::MAX_RANK),
        ),
        (None, LevelFallback::Lowest) => i64::from(ComplexityLevel::MIN_RANK),
    };

    let level = select_level(entity, effective)?;
    if effective != rank {
        tracing::warn!(
            id = %entity.id,
            requested = rank,
            served = effective,
            ?fallback,
            "Substituted level"
        );
    }

    Ok(LevelSelection {
        level,
        requested: rank,
        substituted: effective != rank,
    })
}

/// Validated entities hold ranks 1-5 in some order; try the natural slot
/// before scanning.
fn level_at(entity: &Entity, tier: ComplexityLevel) -> Option<&Level> {
    let rank = tier.rank();
    entity
        .levels
        .get(usize::from(rank) - 1)
        .filter(|l| l.rank == rank)
        .or_else(|| entity.level(rank))
}

/// Level selection using the configured fallback policy.
#[derive(FromContext, Clone)]
pub struct LevelSelector {
    config: AppConfig,
}

impl LevelSelector {
    /// The policy this selector applies.
    pub fn fallback(&self) -> LevelFallback {
        self.config.levels.fallback
    }

    /// Select with the configured policy.
    pub fn select<'a>(&self, entity: &'a Entity, rank: i64) -> Result<LevelSelection<'a>, AppError> {
        select_level_with(entity, rank, self.fallback())
    }
}
