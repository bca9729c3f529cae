//! Tournament business logic: stage control, group play, the elimination
//! tableau, piste allocation, and scoring.

mod control;
mod elimination;
mod groups;
mod pistes;
mod scoring;
mod standings;

pub use control::{next_stage, start_tournament};
pub use elimination::{advance_round, enter_elimination, finish_tournament};
pub use groups::{generate_preliminary_round, order_fairly};
pub use pistes::{
    assign_certain_piste, assign_pistes, disable_piste, enable_piste, remove_piste_assignment,
    set_active,
};
pub use scoring::{correct_score, disqualify, push_score, revoke_disqualification, simulate_current};
pub use standings::{ranked_fencer_ids, StandingsScope};
