//! Fencing tournament engine: group round robins with fairness-aware bout
//! sequencing, piste allocation, and a wildcard-padded elimination tableau
//! with knockout and placement modes.

pub mod logic;
pub mod models;
pub mod views;

pub use logic::{
    advance_round, assign_certain_piste, assign_pistes, correct_score, disable_piste, disqualify,
    enable_piste, enter_elimination, finish_tournament, generate_preliminary_round, next_stage,
    order_fairly, push_score, ranked_fencer_ids, remove_piste_assignment, revoke_disqualification,
    set_active, simulate_current, start_tournament, StandingsScope,
};
pub use models::{
    Bout, BoutId, BoutKind, Bracket, Competitor, EliminationLine, EliminationMode, Fencer,
    FencerId, FormEntry, Gender, Handedness, Piste, PisteState, Stage, StatBucket, StatSlot,
    Tournament, TournamentConfig, TournamentError, TournamentId, RECENT_FORM_LIMIT,
};
