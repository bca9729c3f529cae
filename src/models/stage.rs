//! Tournament stages, from the preliminary round down to the grand final.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One stage of the tournament. Elimination stages are named after their
/// field size; `Preliminary` and `Placements` are not part of the
/// elimination countdown and have no field size.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Preliminary,
    Placements,
    Top1024,
    Top512,
    Top256,
    Top128,
    Top64,
    Top32,
    Top16,
    QuarterFinals,
    SemiFinals,
    GrandFinal,
    Finished,
}

/// Explicit progression order, earliest first. All ordering and stepping is
/// defined against this list, never against numeric enum values.
const PROGRESSION: [Stage; 13] = [
    Stage::Preliminary,
    Stage::Placements,
    Stage::Top1024,
    Stage::Top512,
    Stage::Top256,
    Stage::Top128,
    Stage::Top64,
    Stage::Top32,
    Stage::Top16,
    Stage::QuarterFinals,
    Stage::SemiFinals,
    Stage::GrandFinal,
    Stage::Finished,
];

impl Stage {
    fn position(self) -> usize {
        PROGRESSION.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// Number of competitors entering this stage, for elimination stages.
    pub fn field_size(self) -> Option<usize> {
        match self {
            Stage::Top1024 => Some(1024),
            Stage::Top512 => Some(512),
            Stage::Top256 => Some(256),
            Stage::Top128 => Some(128),
            Stage::Top64 => Some(64),
            Stage::Top32 => Some(32),
            Stage::Top16 => Some(16),
            Stage::QuarterFinals => Some(8),
            Stage::SemiFinals => Some(4),
            Stage::GrandFinal => Some(2),
            _ => None,
        }
    }

    /// The elimination stage for a field of `n` competitors (`n` must be a
    /// power of two between 2 and 1024).
    pub fn from_field_size(n: usize) -> Option<Stage> {
        PROGRESSION
            .iter()
            .copied()
            .find(|s| s.field_size() == Some(n))
    }

    /// The stage after this one, `None` past `Finished`.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Preliminary | Stage::Placements | Stage::Finished => None,
            _ => PROGRESSION.get(self.position() + 1).copied(),
        }
    }

    /// The elimination stage before this one.
    pub fn previous(self) -> Option<Stage> {
        match self {
            Stage::Preliminary | Stage::Placements | Stage::Top1024 => None,
            _ => PROGRESSION.get(self.position() - 1).copied(),
        }
    }

    pub fn is_elimination(self) -> bool {
        self.field_size().is_some()
    }

    /// Display label ("Top 16", "Grand Final", ...).
    pub fn label(self) -> &'static str {
        match self {
            Stage::Preliminary => "Preliminary Round",
            Stage::Placements => "Placements",
            Stage::Top1024 => "Top 1024",
            Stage::Top512 => "Top 512",
            Stage::Top256 => "Top 256",
            Stage::Top128 => "Top 128",
            Stage::Top64 => "Top 64",
            Stage::Top32 => "Top 32",
            Stage::Top16 => "Top 16",
            Stage::QuarterFinals => "Quarter Finals",
            Stage::SemiFinals => "Semi Finals",
            Stage::GrandFinal => "Grand Final",
            Stage::Finished => "Finished",
        }
    }
}

impl Ord for Stage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position().cmp(&other.position())
    }
}

impl PartialOrd for Stage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
