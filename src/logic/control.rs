//! Stage control: starting the tournament and advancing between stages.

use crate::logic::elimination;
use crate::logic::groups::generate_preliminary_round;
use crate::logic::pistes::assign_pistes;
use crate::models::{Stage, Tournament, TournamentError};

/// Generate the first stage's bouts and stage them on the pistes. With no
/// preliminary rounds configured the tableau is seeded straight from the
/// start list.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if !tournament.bouts.is_empty() {
        return Err(TournamentError::AlreadyStarted);
    }
    if tournament.fencers.len() < 2 {
        return Err(TournamentError::NotEnoughFencers {
            count: tournament.fencers.len(),
        });
    }
    if tournament.preliminary_rounds == 0 {
        elimination::enter_elimination(tournament)?;
    } else {
        tournament.stage = Stage::Preliminary;
        tournament.preliminary_round = 1;
        generate_preliminary_round(tournament)?;
    }
    assign_pistes(tournament);
    log::info!("Tournament '{}' started", tournament.name);
    Ok(())
}

/// Advance to the next stage once every bout of the current one is done:
/// next preliminary round, entry into the elimination tableau, next bracket
/// round, or closing the tournament after the grand final.
pub fn next_stage(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let left = tournament.matches_left();
    if left > 0 {
        return Err(TournamentError::MatchesIncomplete { left });
    }
    match tournament.stage {
        Stage::Finished => Err(TournamentError::TerminalStage),
        Stage::Preliminary => {
            if tournament.preliminary_round < tournament.preliminary_rounds {
                tournament.preliminary_round += 1;
                generate_preliminary_round(tournament)?;
            } else {
                elimination::enter_elimination(tournament)?;
            }
            assign_pistes(tournament);
            Ok(())
        }
        Stage::GrandFinal => elimination::finish_tournament(tournament),
        _ => {
            elimination::advance_round(tournament)?;
            assign_pistes(tournament);
            Ok(())
        }
    }
}
