//! Reader-complexity tiers shared by every entry.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The fixed audience tiers an entry is written for.
///
/// Tiers run from the simplest reader (Child) to the most specialised
/// (Physician): Child → Patient → Nursing → Student → Physician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum ComplexityLevel {
    Child = 1,
    Patient = 2,
    Nursing = 3,
    Student = 4,
    Physician = 5,
}

impl ComplexityLevel {
    /// Lowest valid rank.
    pub const MIN_RANK: u8 = 1;
    /// Highest valid rank. Every entry carries exactly this many levels.
    pub const MAX_RANK: u8 = 5;

    /// Returns the numeric rank of this tier (1-5).
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Returns a static slice of all tiers in ascending order.
    pub fn all() -> &'static [ComplexityLevel] {
        &[
            ComplexityLevel::Child,
            ComplexityLevel::Patient,
            ComplexityLevel::Nursing,
            ComplexityLevel::Student,
            ComplexityLevel::Physician,
        ]
    }

    /// Returns the inclusive range of valid ranks as `[min, max]`.
    pub fn valid_range() -> [u8; 2] {
        [Self::MIN_RANK, Self::MAX_RANK]
    }

    /// Looks up the tier for an arbitrary integer rank.
    pub fn from_rank(rank: i64) -> Option<ComplexityLevel> {
        u8::try_from(rank).ok().and_then(|r| Self::try_from(r).ok())
    }

    /// Human-readable tier name.
    pub fn name(&self) -> &'static str {
        match self {
            ComplexityLevel::Child => "Child",
            ComplexityLevel::Patient => "Patient",
            ComplexityLevel::Nursing => "Nursing / Allied Health",
            ComplexityLevel::Student => "Medical Student",
            ComplexityLevel::Physician => "Physician",
        }
    }

    /// Short label for badges.
    pub fn label(&self) -> &'static str {
        match self {
            ComplexityLevel::Child => "Kids",
            ComplexityLevel::Patient => "Patient",
            ComplexityLevel::Nursing => "Nursing",
            ComplexityLevel::Student => "Student",
            ComplexityLevel::Physician => "Clinician",
        }
    }

    /// Who the tier is written for.
    pub fn audience(&self) -> &'static str {
        match self {
            ComplexityLevel::Child => "Children ages 5-12",
            ComplexityLevel::Patient => "Patients and caregivers (general adult reader)",
            ComplexityLevel::Nursing => "Nurses and allied health professionals",
            ComplexityLevel::Student => "Medical students preparing for boards",
            ComplexityLevel::Physician => "Practising physicians",
        }
    }
}

impl TryFrom<u8> for ComplexityLevel {
    type Error = AppError;

    fn try_from(rank: u8) -> Result<Self, Self::Error> {
        match rank {
            1 => Ok(ComplexityLevel::Child),
            2 => Ok(ComplexityLevel::Patient),
            3 => Ok(ComplexityLevel::Nursing),
            4 => Ok(ComplexityLevel::Student),
            5 => Ok(ComplexityLevel::Physician),
            _ => Err(AppError::level_not_found(i64::from(rank))),
        }
    }
}

impl std::fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.rank(), self.name())
    }
}

impl FromStr for ComplexityLevel {
    type Err = AppError;

    /// Accepts either the rank ("3") or the tier name ("nursing").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(rank) = s.trim().parse::<i64>() {
            return Self::from_rank(rank).ok_or_else(|| AppError::level_not_found(rank));
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "child" | "kids" => Ok(ComplexityLevel::Child),
            "patient" => Ok(ComplexityLevel::Patient),
            "nursing" => Ok(ComplexityLevel::Nursing),
            "student" => Ok(ComplexityLevel::Student),
            "physician" | "clinician" => Ok(ComplexityLevel::Physician),
            _ => Err(AppError::UnknownLevel(s.to_string())),
        }
    }
}
