//! Score submission, retroactive correction, disqualification, simulation.

use crate::logic::pistes::assign_pistes;
use crate::models::{BoutId, Competitor, FencerId, StatSlot, Tournament, TournamentError};
use rand::Rng;

fn validate_scores(green: i32, red: i32) -> Result<(u32, u32), TournamentError> {
    if green < 0 || red < 0 || green == red {
        return Err(TournamentError::InvalidScore { green, red });
    }
    Ok((green as u32, red as u32))
}

fn record_for(
    tournament: &mut Tournament,
    competitor: Competitor,
    bout_id: BoutId,
    won: bool,
    points_for: u32,
    points_against: u32,
    slot: StatSlot,
) {
    // Wildcards accumulate nothing.
    if let Competitor::Fencer(id) = competitor {
        if let Some(f) = tournament.get_fencer_mut(id) {
            f.update_statistics(bout_id, won, points_for, points_against, slot);
        }
    }
}

fn revert_for(
    tournament: &mut Tournament,
    competitor: Competitor,
    bout_id: BoutId,
    won: bool,
    points_for: u32,
    points_against: u32,
    slot: StatSlot,
) {
    if let Competitor::Fencer(id) = competitor {
        if let Some(f) = tournament.get_fencer_mut(id) {
            f.revert_statistics(bout_id, won, points_for, points_against, slot);
        }
    }
}

/// Submit the final score of a bout. Frees the piste, updates both fencers'
/// statistics, and re-runs the allocator for the freed capacity.
pub fn push_score(
    tournament: &mut Tournament,
    bout_id: BoutId,
    green_score: i32,
    red_score: i32,
) -> Result<(), TournamentError> {
    let (green_score, red_score) = validate_scores(green_score, red_score)?;
    let bout = tournament
        .get_bout(bout_id)
        .ok_or(TournamentError::BoutNotFound(bout_id))?;
    if bout.completed || bout.walkover {
        return Err(TournamentError::BoutClosed(bout_id));
    }
    let (green, red, piste, ongoing, slot) =
        (bout.green, bout.red, bout.piste, bout.ongoing, bout.stat_slot());

    if ongoing {
        if let Some(p) = piste.and_then(|n| tournament.get_piste_mut(n)) {
            p.match_finished();
        }
    } else if let Some(p) = piste.and_then(|n| tournament.get_piste_mut(n)) {
        // Scored without ever being started: release the reservation.
        p.staged = false;
    }
    if let Some(b) = tournament.get_bout_mut(bout_id) {
        b.complete(green_score, red_score);
    }

    let green_won = green_score > red_score;
    record_for(tournament, green, bout_id, green_won, green_score, red_score, slot);
    record_for(tournament, red, bout_id, !green_won, red_score, green_score, slot);

    log::debug!("Bout {bout_id} completed {green_score}:{red_score}");
    assign_pistes(tournament);
    Ok(())
}

/// Retroactively correct an already-completed bout. The previous result's
/// contribution is reversed before the new one is applied through the normal
/// submission path, so no counter or history entry is double-counted.
pub fn correct_score(
    tournament: &mut Tournament,
    bout_id: BoutId,
    green_score: i32,
    red_score: i32,
) -> Result<(), TournamentError> {
    let (green_score, red_score) = validate_scores(green_score, red_score)?;
    let bout = tournament
        .get_bout(bout_id)
        .ok_or(TournamentError::BoutNotFound(bout_id))?;
    if bout.walkover {
        return Err(TournamentError::BoutClosed(bout_id));
    }
    if !bout.completed {
        return Err(TournamentError::NotCompleted(bout_id));
    }
    let (green, red, old_green, old_red, slot) = (
        bout.green,
        bout.red,
        bout.green_score,
        bout.red_score,
        bout.stat_slot(),
    );

    let old_green_won = old_green > old_red;
    revert_for(tournament, green, bout_id, old_green_won, old_green, old_red, slot);
    revert_for(tournament, red, bout_id, !old_green_won, old_red, old_green, slot);

    if let Some(b) = tournament.get_bout_mut(bout_id) {
        b.green_score = green_score;
        b.red_score = red_score;
    }

    let green_won = green_score > red_score;
    record_for(tournament, green, bout_id, green_won, green_score, red_score, slot);
    record_for(tournament, red, bout_id, !green_won, red_score, green_score, slot);

    log::info!("Bout {bout_id} corrected to {green_score}:{red_score}");
    Ok(())
}

/// Disqualify a fencer: they drop to the bottom of every standings view and
/// all their unfinished bouts resolve as 1-0 walkover wins for the opponent
/// (no piste, no statistics), exactly like a wildcard bye. Completed bouts
/// are left untouched.
pub fn disqualify(tournament: &mut Tournament, fencer_id: FencerId) -> Result<(), TournamentError> {
    let fencer = tournament
        .get_fencer_mut(fencer_id)
        .ok_or(TournamentError::FencerNotFound(fencer_id))?;
    fencer.disqualified = true;
    let me = Competitor::Fencer(fencer_id);

    let affected: Vec<(BoutId, Option<u32>, bool, bool)> = tournament
        .bouts
        .iter()
        .filter(|b| !b.completed && b.involves(me))
        .map(|b| (b.id, b.piste, b.ongoing, b.green == me))
        .collect();
    for (id, piste, ongoing, green_is_me) in affected {
        if let Some(p) = piste.and_then(|n| tournament.get_piste_mut(n)) {
            if ongoing {
                p.match_finished();
            } else {
                p.staged = false;
            }
        }
        if let Some(b) = tournament.get_bout_mut(id) {
            b.resolve_walkover(!green_is_me);
        }
        log::info!("Bout {id} auto-completed as walkover (disqualification)");
    }

    assign_pistes(tournament);
    Ok(())
}

/// Revoke a disqualification. Standing inputs are restored; bouts that were
/// auto-completed stay completed.
pub fn revoke_disqualification(
    tournament: &mut Tournament,
    fencer_id: FencerId,
) -> Result<(), TournamentError> {
    let fencer = tournament
        .get_fencer_mut(fencer_id)
        .ok_or(TournamentError::FencerNotFound(fencer_id))?;
    fencer.disqualified = false;
    Ok(())
}

/// Push random plausible scores (winner 15, loser 0-14) into every
/// unfinished bout of the current stage. Testing aid.
pub fn simulate_current(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let pending: Vec<BoutId> = tournament
        .current_bouts()
        .iter()
        .filter(|b| !b.completed && !b.walkover)
        .map(|b| b.id)
        .collect();
    let mut rng = rand::thread_rng();
    for id in pending {
        let loser_score = rng.gen_range(0..15);
        if rng.gen_bool(0.5) {
            push_score(tournament, id, 15, loser_score)?;
        } else {
            push_score(tournament, id, loser_score, 15)?;
        }
    }
    Ok(())
}
