//! Data structures for the tournament: fencers, bouts, pistes, stages, tableau.

mod bout;
mod fencer;
mod piste;
mod stage;
mod tournament;
mod tree;

pub use bout::{Bout, BoutId, BoutKind, EliminationLine};
pub use fencer::{
    Competitor, Fencer, FencerId, FormEntry, Gender, Handedness, StatBucket, StatSlot,
    RECENT_FORM_LIMIT,
};
pub use piste::{Piste, PisteState};
pub use stage::Stage;
pub use tournament::{
    Bracket, EliminationMode, Tournament, TournamentConfig, TournamentError, TournamentId,
};
pub use tree::{Tableau, TableauNode};
