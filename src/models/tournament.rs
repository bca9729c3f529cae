//! Tournament aggregate root, configuration, and TournamentError.

use crate::models::bout::{Bout, BoutId, BoutKind};
use crate::models::fencer::{Fencer, FencerId, Gender, Handedness, StatBucket};
use crate::models::piste::Piste;
use crate::models::stage::Stage;
use crate::models::tree::Tableau;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How the elimination phase handles losers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationMode {
    /// Losers are out; only the bronze-medal bout is played among them.
    #[default]
    Ko,
    /// Losers keep fencing consolation bouts until every rank is decided.
    Placement,
    /// Not implemented; rejected at configuration time.
    Repechage,
}

impl std::fmt::Display for EliminationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EliminationMode::Ko => write!(f, "ko"),
            EliminationMode::Placement => write!(f, "placement"),
            EliminationMode::Repechage => write!(f, "repechage"),
        }
    }
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// The piste still has an ongoing bout; retry on another piste or let it finish.
    PisteOccupied { piste: u32 },
    PisteNotFound { piste: u32 },
    PisteDisabled { piste: u32 },
    /// Negative or tied scores are rejected before anything mutates.
    InvalidScore { green: i32, red: i32 },
    BoutNotFound(BoutId),
    FencerNotFound(FencerId),
    /// The current stage still has unfinished bouts; advancing is refused.
    MatchesIncomplete { left: usize },
    /// Attempt to advance past the terminal stage.
    TerminalStage,
    /// Matches for the first stage were already generated.
    AlreadyStarted,
    /// The bout has no piste reservation to remove.
    NotStaged(BoutId),
    /// The bout is completed or a walkover and cannot be scored or staged.
    BoutClosed(BoutId),
    /// Score correction requires an already-completed bout.
    NotCompleted(BoutId),
    /// Repechage is intentionally unimplemented.
    UnsupportedMode(EliminationMode),
    InvalidAttribute { attribute: String, reason: String },
    /// More fencers than the largest supported elimination field (1024).
    TooManyFencers { count: usize },
    NotEnoughFencers { count: usize },
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::PisteOccupied { piste } => {
                write!(f, "Piste {piste} is still occupied by an ongoing bout")
            }
            TournamentError::PisteNotFound { piste } => write!(f, "Piste {piste} does not exist"),
            TournamentError::PisteDisabled { piste } => write!(f, "Piste {piste} is disabled"),
            TournamentError::InvalidScore { green, red } => {
                write!(
                    f,
                    "Invalid score {green}:{red} (scores must be non-negative and not tied)"
                )
            }
            TournamentError::BoutNotFound(id) => write!(f, "Bout {id} not found"),
            TournamentError::FencerNotFound(id) => write!(f, "Fencer {id} not found"),
            TournamentError::MatchesIncomplete { left } => {
                write!(f, "{left} bout(s) of the current stage are not completed")
            }
            TournamentError::TerminalStage => write!(f, "The tournament is already finished"),
            TournamentError::AlreadyStarted => write!(f, "The tournament has already started"),
            TournamentError::NotStaged(id) => write!(f, "Bout {id} has no piste assignment"),
            TournamentError::BoutClosed(id) => {
                write!(
                    f,
                    "Bout {id} is completed or a walkover and cannot be changed this way"
                )
            }
            TournamentError::NotCompleted(id) => {
                write!(
                    f,
                    "Bout {id} is not completed; only completed bouts can be corrected"
                )
            }
            TournamentError::UnsupportedMode(mode) => {
                write!(f, "Elimination mode '{mode}' is not implemented")
            }
            TournamentError::InvalidAttribute { attribute, reason } => {
                write!(f, "Invalid value for '{attribute}': {reason}")
            }
            TournamentError::TooManyFencers { count } => {
                write!(f, "{count} fencers exceed the largest supported field (1024)")
            }
            TournamentError::NotEnoughFencers { count } => {
                write!(f, "Need at least 2 fencers, got {count}")
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Configuration consumed at tournament creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub name: String,
    pub location: Option<String>,
    /// Number of round-robin preliminary rounds; 0 goes straight to elimination.
    pub preliminary_rounds: usize,
    /// Fixed group count; computed (groups of at most 8) when absent.
    pub preliminary_groups: Option<usize>,
    pub elimination_mode: EliminationMode,
    pub num_pistes: usize,
    /// Fixed first elimination field size (top-n cut); everyone advances when absent.
    pub first_elimination_round: Option<usize>,
}

/// Elimination bracket state. The bouts themselves live in `Tournament::bouts`;
/// this tracks the round countdown and the fixed third-place bout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub mode: EliminationMode,
    /// Current elimination round.
    pub stage: Stage,
    pub third_place: Option<BoutId>,
}

/// Full tournament state: fencers, pistes, bouts (current and archived),
/// stage machine, and the elimination bracket. Sole owner of all mutation
/// entry points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub fencers: Vec<Fencer>,
    pub pistes: Vec<Piste>,
    pub stage: Stage,
    /// Current preliminary round, 1-based.
    pub preliminary_round: usize,
    pub preliminary_rounds: usize,
    pub preliminary_groups: Option<usize>,
    pub elimination_mode: EliminationMode,
    pub first_elimination_round: Option<usize>,
    /// Every bout ever generated, in sequence order per round. Bouts are
    /// retained after their stage advances (standings, export, correction).
    pub bouts: Vec<Bout>,
    pub bracket: Option<Bracket>,
    pub tableau: Tableau,
}

impl Tournament {
    /// Create a tournament from a config and an imported start list.
    /// Fails fast on repechage and on impossible field sizes; no matches are
    /// generated yet (see `start_tournament`).
    pub fn new(config: TournamentConfig, fencers: Vec<Fencer>) -> Result<Self, TournamentError> {
        if config.elimination_mode == EliminationMode::Repechage {
            return Err(TournamentError::UnsupportedMode(EliminationMode::Repechage));
        }
        if fencers.len() < 2 {
            return Err(TournamentError::NotEnoughFencers {
                count: fencers.len(),
            });
        }
        if fencers.len() > 1024 {
            return Err(TournamentError::TooManyFencers {
                count: fencers.len(),
            });
        }
        if let Some(n) = config.first_elimination_round {
            if !n.is_power_of_two() || !(2..=1024).contains(&n) {
                return Err(TournamentError::InvalidAttribute {
                    attribute: "first_elimination_round".into(),
                    reason: format!("{n} is not a power of two between 2 and 1024"),
                });
            }
        }
        if config.num_pistes == 0 {
            return Err(TournamentError::InvalidAttribute {
                attribute: "num_pistes".into(),
                reason: "at least one piste is required".into(),
            });
        }

        // The start list may be imported without knowing the round count;
        // every fencer needs one statistics bucket per preliminary round.
        let mut fencers = fencers;
        for fencer in &mut fencers {
            fencer
                .preliminary
                .resize(config.preliminary_rounds, StatBucket::default());
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: config.name,
            location: config.location,
            created_at: Utc::now(),
            fencers,
            pistes: (1..=config.num_pistes as u32).map(Piste::new).collect(),
            stage: Stage::Preliminary,
            preliminary_round: 1,
            preliminary_rounds: config.preliminary_rounds,
            preliminary_groups: config.preliminary_groups,
            elimination_mode: config.elimination_mode,
            first_elimination_round: config.first_elimination_round,
            bouts: Vec::new(),
            bracket: None,
            tableau: Tableau::new(),
        })
    }

    pub fn get_fencer(&self, id: FencerId) -> Option<&Fencer> {
        self.fencers.iter().find(|f| f.id == id)
    }

    pub fn get_fencer_mut(&mut self, id: FencerId) -> Option<&mut Fencer> {
        self.fencers.iter_mut().find(|f| f.id == id)
    }

    pub fn get_bout(&self, id: BoutId) -> Option<&Bout> {
        self.bouts.iter().find(|b| b.id == id)
    }

    pub fn get_bout_mut(&mut self, id: BoutId) -> Option<&mut Bout> {
        self.bouts.iter_mut().find(|b| b.id == id)
    }

    pub fn get_piste(&self, number: u32) -> Option<&Piste> {
        self.pistes.iter().find(|p| p.number == number)
    }

    pub fn get_piste_mut(&mut self, number: u32) -> Option<&mut Piste> {
        self.pistes.iter_mut().find(|p| p.number == number)
    }

    /// Whether a bout belongs to the stage currently being fenced.
    pub fn is_current(&self, bout: &Bout) -> bool {
        match (&self.stage, &bout.kind) {
            (Stage::Preliminary, BoutKind::Group { round, .. }) => *round == self.preliminary_round,
            (stage, BoutKind::Elimination { .. }) => bout.stage == *stage,
            _ => false,
        }
    }

    pub fn current_bouts(&self) -> Vec<&Bout> {
        self.bouts.iter().filter(|b| self.is_current(b)).collect()
    }

    /// Unfinished bouts in the current stage.
    pub fn matches_left(&self) -> usize {
        self.current_bouts().iter().filter(|b| !b.completed).count()
    }

    /// Adjust a bout's allocator priority (manual operator action).
    pub fn prioritize_bout(
        &mut self,
        bout_id: BoutId,
        priority: i32,
    ) -> Result<(), TournamentError> {
        let bout = self
            .get_bout_mut(bout_id)
            .ok_or(TournamentError::BoutNotFound(bout_id))?;
        bout.priority = priority;
        Ok(())
    }

    /// Number of preliminary groups actually in use.
    pub fn num_groups(&self) -> usize {
        self.fencers
            .iter()
            .filter_map(|f| f.prelim_group)
            .max()
            .unwrap_or(0)
    }

    /// Snapshot the whole aggregate as JSON for the persistence layer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a tournament from a JSON snapshot.
    pub fn from_json(json: &str) -> serde_json::Result<Tournament> {
        serde_json::from_str(json)
    }

    /// Edit a fencer attribute with the start-list validation rules.
    /// Optional attributes are cleared by an empty value.
    pub fn change_fencer_attribute(
        &mut self,
        fencer_id: FencerId,
        attribute: &str,
        value: &str,
    ) -> Result<(), TournamentError> {
        let invalid = |reason: &str| TournamentError::InvalidAttribute {
            attribute: attribute.to_string(),
            reason: reason.to_string(),
        };
        let value = value.trim();
        let fencer = self
            .fencers
            .iter_mut()
            .find(|f| f.id == fencer_id)
            .ok_or(TournamentError::FencerNotFound(fencer_id))?;
        match attribute {
            "name" => {
                if value.is_empty() {
                    return Err(invalid("name must be non-empty"));
                }
                fencer.name = value.to_string();
            }
            "club" => {
                if value.len() > 5 {
                    return Err(invalid("club must be at most 5 characters"));
                }
                fencer.club = (!value.is_empty()).then(|| value.to_string());
            }
            "nationality" => {
                if value.is_empty() {
                    fencer.nationality = None;
                } else if value.len() != 3 || !value.chars().all(|c| c.is_ascii_uppercase()) {
                    return Err(invalid("nationality must be an uppercase alpha-3 code"));
                } else {
                    fencer.nationality = Some(value.to_string());
                }
            }
            "gender" => {
                fencer.gender = match value {
                    "" => None,
                    "M" => Some(Gender::Male),
                    "F" => Some(Gender::Female),
                    "D" => Some(Gender::Diverse),
                    _ => return Err(invalid("gender must be 'M', 'F' or 'D'")),
                };
            }
            "handedness" => {
                fencer.handedness = match value {
                    "" => None,
                    "R" => Some(Handedness::Right),
                    "L" => Some(Handedness::Left),
                    _ => return Err(invalid("handedness must be 'R' or 'L'")),
                };
            }
            "age" => {
                fencer.age = if value.is_empty() {
                    None
                } else {
                    match value.parse::<u32>() {
                        Ok(age) if age <= 99 => Some(age),
                        _ => return Err(invalid("age must be an integer between 0 and 99")),
                    }
                };
            }
            _ => return Err(invalid("unknown attribute")),
        }
        Ok(())
    }
}
