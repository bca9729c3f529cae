//! Fencer, per-stage statistics, and the Competitor variant used in bouts.

use crate::models::bout::BoutId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a fencer (used in bouts and lookups).
pub type FencerId = Uuid;

/// Number of recent bout outcomes kept per fencer (trend display only).
pub const RECENT_FORM_LIMIT: usize = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Diverse,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Right,
    Left,
}

/// One side of a bout: either a real fencer or a wildcard (bye) used to pad
/// the elimination field to a power of two. Wildcards never accumulate
/// statistics; every statistics-mutating path pattern-matches and skips them.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Competitor {
    Fencer(FencerId),
    Wildcard(u32),
}

impl Competitor {
    pub fn fencer_id(&self) -> Option<FencerId> {
        match self {
            Competitor::Fencer(id) => Some(*id),
            Competitor::Wildcard(_) => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Competitor::Wildcard(_))
    }
}

/// One statistics bucket: `overall`, one preliminary round, or elimination.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatBucket {
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_for: u32,
    pub points_against: u32,
}

impl StatBucket {
    pub fn record(&mut self, won: bool, points_for: u32, points_against: u32) {
        self.matches += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.points_for += points_for;
        self.points_against += points_against;
    }

    /// Reverse a previously recorded result (score correction).
    pub fn revert(&mut self, won: bool, points_for: u32, points_against: u32) {
        self.matches = self.matches.saturating_sub(1);
        if won {
            self.wins = self.wins.saturating_sub(1);
        } else {
            self.losses = self.losses.saturating_sub(1);
        }
        self.points_for = self.points_for.saturating_sub(points_for);
        self.points_against = self.points_against.saturating_sub(points_against);
    }

    /// Rounded integer win percentage; 0 when no matches were played.
    pub fn win_percentage(&self) -> u32 {
        if self.matches == 0 {
            0
        } else {
            ((self.wins as f64 / self.matches as f64) * 100.0).round() as u32
        }
    }

    /// Signed points difference.
    pub fn points_difference(&self) -> i64 {
        self.points_for as i64 - self.points_against as i64
    }

    /// Points difference rendered with an explicit `+` when positive.
    pub fn points_difference_str(&self) -> String {
        let diff = self.points_difference();
        if diff > 0 {
            format!("+{diff}")
        } else {
            diff.to_string()
        }
    }

    pub fn points_per_game(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.points_for as f64 / self.matches as f64
        }
    }

    pub fn points_against_per_game(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.points_against as f64 / self.matches as f64
        }
    }

    /// Sum of several buckets (group-scope standings).
    pub fn sum<'a>(buckets: impl IntoIterator<Item = &'a StatBucket>) -> StatBucket {
        let mut total = StatBucket::default();
        for b in buckets {
            total.matches += b.matches;
            total.wins += b.wins;
            total.losses += b.losses;
            total.points_for += b.points_for;
            total.points_against += b.points_against;
        }
        total
    }
}

/// One entry of a fencer's bounded recent-form history.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FormEntry {
    pub bout: BoutId,
    pub won: bool,
}

/// Which statistics bucket a bout feeds (besides `overall`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatSlot {
    /// Zero-based preliminary round index.
    Preliminary(usize),
    Elimination,
}

/// A participant in the tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fencer {
    pub id: FencerId,
    /// Position on the start list, 1-based. Stable display identity.
    pub start_number: u32,
    pub name: String,
    pub club: Option<String>,
    /// Alpha-3 country code, normalized by the importing collaborator.
    pub nationality: Option<String>,
    pub gender: Option<Gender>,
    pub handedness: Option<Handedness>,
    pub age: Option<u32>,
    /// Preliminary group, 1-based, set when the round is generated.
    pub prelim_group: Option<usize>,
    /// Seed index within the current elimination round; picks the next
    /// opponent. Wildcards have none and sort after every seeded fencer.
    pub elimination_value: Option<u32>,
    pub last_match_won: bool,
    pub eliminated: bool,
    pub disqualified: bool,
    pub final_rank: Option<u32>,
    /// Rank written back by the last standings computation (display only).
    pub rank: Option<u32>,
    pub overall: StatBucket,
    /// One bucket per preliminary round.
    pub preliminary: Vec<StatBucket>,
    pub elimination: StatBucket,
    /// Most recent bout outcomes, oldest first, capped at [`RECENT_FORM_LIMIT`].
    pub recent_form: Vec<FormEntry>,
}

impl Fencer {
    /// Create a new fencer with empty statistics for `num_prelim_rounds` rounds.
    pub fn new(
        name: impl Into<String>,
        club: Option<String>,
        nationality: Option<String>,
        start_number: u32,
        num_prelim_rounds: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_number,
            name: name.into(),
            club,
            nationality,
            gender: None,
            handedness: None,
            age: None,
            prelim_group: None,
            elimination_value: None,
            last_match_won: false,
            eliminated: false,
            disqualified: false,
            final_rank: None,
            rank: None,
            overall: StatBucket::default(),
            preliminary: vec![StatBucket::default(); num_prelim_rounds],
            elimination: StatBucket::default(),
            recent_form: Vec::new(),
        }
    }

    /// "12 Name (GER) / Club" - start number, name, then whatever identity
    /// details are present.
    pub fn describe(&self) -> String {
        match (&self.club, &self.nationality) {
            (Some(club), Some(nat)) => {
                format!("{} {} ({}) / {}", self.start_number, self.name, nat, club)
            }
            (Some(club), None) => format!("{} {} / {}", self.start_number, self.name, club),
            (None, Some(nat)) => format!("{} {} ({})", self.start_number, self.name, nat),
            (None, None) => format!("{} {}", self.start_number, self.name),
        }
    }

    fn slot_mut(&mut self, slot: StatSlot) -> &mut StatBucket {
        match slot {
            StatSlot::Preliminary(round) => &mut self.preliminary[round],
            StatSlot::Elimination => &mut self.elimination,
        }
    }

    /// The bucket a given slot refers to.
    pub fn slot(&self, slot: StatSlot) -> &StatBucket {
        match slot {
            StatSlot::Preliminary(round) => &self.preliminary[round],
            StatSlot::Elimination => &self.elimination,
        }
    }

    /// Record a bout result in `overall` and the slot bucket, and append to
    /// the recent-form history.
    pub fn update_statistics(
        &mut self,
        bout: BoutId,
        won: bool,
        points_for: u32,
        points_against: u32,
        slot: StatSlot,
    ) {
        self.overall.record(won, points_for, points_against);
        self.slot_mut(slot).record(won, points_for, points_against);
        self.last_match_won = won;
        self.recent_form.push(FormEntry { bout, won });
        if self.recent_form.len() > RECENT_FORM_LIMIT {
            self.recent_form.remove(0);
        }
    }

    /// Reverse a previously recorded bout result, removing its recent-form
    /// entry. Used by score correction so the bout is never double-counted.
    pub fn revert_statistics(
        &mut self,
        bout: BoutId,
        won: bool,
        points_for: u32,
        points_against: u32,
        slot: StatSlot,
    ) {
        self.overall.revert(won, points_for, points_against);
        self.slot_mut(slot).revert(won, points_for, points_against);
        self.recent_form.retain(|e| e.bout != bout);
        self.last_match_won = self.recent_form.last().map(|e| e.won).unwrap_or(false);
    }

    /// `overall` must equal the sum of all per-stage buckets, and wins plus
    /// losses must equal matches in every bucket.
    pub fn statistics_consistent(&self) -> bool {
        let buckets = self.preliminary.iter().chain(std::iter::once(&self.elimination));
        let summed = StatBucket::sum(buckets);
        let balanced = |b: &StatBucket| b.wins + b.losses == b.matches;
        summed == self.overall
            && balanced(&self.overall)
            && self.preliminary.iter().all(balanced)
            && balanced(&self.elimination)
    }
}
