//! Bout: a single match between two competitors (green vs. red).

use crate::models::fencer::{Competitor, FencerId, StatSlot};
use crate::models::stage::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a bout.
pub type BoutId = Uuid;

/// Which elimination line a bout belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationLine {
    /// The main bracket (still in contention for first place).
    Title,
    /// The fixed bronze-medal bout, created alongside the grand final.
    ThirdPlace,
    /// A consolation bout in placement mode.
    Placement,
}

/// Phase-specific bout data.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoutKind {
    /// Round-robin group bout. `group` and `round` are 1-based.
    Group { group: usize, round: usize },
    Elimination { line: EliminationLine },
}

/// A single bout. Pairing is immutable; scores, piste assignment, and the
/// lifecycle flags mutate through the tournament's entry points.
///
/// Lifecycle: pending -> staged (piste reserved) -> ongoing -> completed.
/// A completed bout has unequal scores and a well-defined winner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bout {
    pub id: BoutId,
    pub green: Competitor,
    pub red: Competitor,
    pub stage: Stage,
    pub kind: BoutKind,
    /// Assigned piste number, if any.
    pub piste: Option<u32>,
    /// Pre-resolved without a piste and without statistics: wildcard bye or
    /// disqualification win.
    pub walkover: bool,
    pub ongoing: bool,
    pub completed: bool,
    /// Allocator tie-break; higher is served first.
    pub priority: i32,
    pub green_score: u32,
    pub red_score: u32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Bout {
    fn new(green: Competitor, red: Competitor, stage: Stage, kind: BoutKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            green,
            red,
            stage,
            kind,
            piste: None,
            walkover: false,
            ongoing: false,
            completed: false,
            priority: 0,
            green_score: 0,
            red_score: 0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Round-robin group bout (both sides are real fencers).
    pub fn group(green: FencerId, red: FencerId, group: usize, round: usize) -> Self {
        Self::new(
            Competitor::Fencer(green),
            Competitor::Fencer(red),
            Stage::Preliminary,
            BoutKind::Group { group, round },
        )
    }

    pub fn elimination(
        green: Competitor,
        red: Competitor,
        stage: Stage,
        line: EliminationLine,
    ) -> Self {
        Self::new(green, red, stage, BoutKind::Elimination { line })
    }

    pub fn winner(&self) -> Option<Competitor> {
        if !self.completed {
            None
        } else if self.green_score > self.red_score {
            Some(self.green)
        } else {
            Some(self.red)
        }
    }

    pub fn loser(&self) -> Option<Competitor> {
        if !self.completed {
            None
        } else if self.green_score > self.red_score {
            Some(self.red)
        } else {
            Some(self.green)
        }
    }

    pub fn involves(&self, competitor: Competitor) -> bool {
        self.green == competitor || self.red == competitor
    }

    pub fn involves_fencer(&self, id: FencerId) -> bool {
        self.involves(Competitor::Fencer(id))
    }

    /// The statistics bucket this bout feeds.
    pub fn stat_slot(&self) -> StatSlot {
        match self.kind {
            BoutKind::Group { round, .. } => StatSlot::Preliminary(round - 1),
            BoutKind::Elimination { .. } => StatSlot::Elimination,
        }
    }

    pub fn is_third_place(&self) -> bool {
        matches!(
            self.kind,
            BoutKind::Elimination {
                line: EliminationLine::ThirdPlace
            }
        )
    }

    /// Record validated scores and close the bout. Statistics are the
    /// caller's responsibility (they need fencer access).
    pub fn complete(&mut self, green_score: u32, red_score: u32) {
        self.green_score = green_score;
        self.red_score = red_score;
        self.ongoing = false;
        self.completed = true;
        self.completed_at = Some(Utc::now());
    }

    /// Auto-complete as a 1-0 walkover without statistics or a piste.
    pub fn resolve_walkover(&mut self, winner_is_green: bool) {
        self.walkover = true;
        self.piste = None;
        if winner_is_green {
            self.complete(1, 0);
        } else {
            self.complete(0, 1);
        }
    }
}
