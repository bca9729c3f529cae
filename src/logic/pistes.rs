//! Piste allocation: automatic assignment, manual overrides, disabling.

use crate::models::{BoutId, Competitor, Tournament, TournamentError};

fn set_bout_piste(tournament: &mut Tournament, bout_id: BoutId, piste: Option<u32>) {
    if let Some(b) = tournament.get_bout_mut(bout_id) {
        b.piste = piste;
    }
}

/// Competitors currently bound to a piste (staged or fencing), excluding the
/// given bout. Used to keep one fencer off two pistes at once.
fn booked_competitors(tournament: &Tournament, except: BoutId) -> Vec<Competitor> {
    let mut booked = Vec::new();
    for bout in &tournament.bouts {
        if bout.id != except && bout.piste.is_some() && !bout.completed {
            booked.push(bout.green);
            booked.push(bout.red);
        }
    }
    booked
}

/// Assign free pistes to pending bouts of the current stage.
///
/// Bouts are served in descending priority (stable within equal priority);
/// walkovers, completed bouts, and bouts whose fencer is already booked
/// elsewhere are skipped. Pistes are picked lowest number first among those
/// neither staged nor disabled, preferring ones not currently occupied
/// (staging onto an occupied piste queues the bout as next).
pub fn assign_pistes(tournament: &mut Tournament) {
    let mut pending: Vec<BoutId> = tournament
        .current_bouts()
        .iter()
        .filter(|b| b.piste.is_none() && !b.completed && !b.walkover)
        .map(|b| b.id)
        .collect();
    let priority_of = |t: &Tournament, id: BoutId| t.get_bout(id).map(|b| b.priority).unwrap_or(0);
    pending.sort_by_key(|&id| std::cmp::Reverse(priority_of(tournament, id)));

    for bout_id in pending {
        let (green, red) = {
            let bout = match tournament.get_bout(bout_id) {
                Some(b) => b,
                None => continue,
            };
            (bout.green, bout.red)
        };
        let booked = booked_competitors(tournament, bout_id);
        if booked.contains(&green) || booked.contains(&red) {
            continue;
        }

        let mut candidates: Vec<u32> = tournament
            .pistes
            .iter()
            .filter(|p| !p.staged && !p.disabled)
            .map(|p| p.number)
            .collect();
        candidates.sort_by_key(|&n| {
            let occupied = tournament.get_piste(n).map(|p| p.occupied).unwrap_or(false);
            (occupied, n)
        });
        let Some(number) = candidates.first().copied() else {
            break; // nothing left to hand out this pass
        };

        if let Some(p) = tournament.get_piste_mut(number) {
            p.staged = true;
        }
        if let Some(b) = tournament.get_bout_mut(bout_id) {
            b.piste = Some(number);
        }
        log::debug!("Staged bout {bout_id} on piste {number}");
    }
}

/// Start a staged bout: its piste becomes occupied. Refused while the piste
/// is still occupied by another ongoing bout.
pub fn set_active(tournament: &mut Tournament, bout_id: BoutId) -> Result<(), TournamentError> {
    let bout = tournament
        .get_bout(bout_id)
        .ok_or(TournamentError::BoutNotFound(bout_id))?;
    if bout.completed || bout.walkover {
        return Err(TournamentError::BoutClosed(bout_id));
    }
    let number = bout.piste.ok_or(TournamentError::NotStaged(bout_id))?;
    let piste = tournament
        .get_piste(number)
        .ok_or(TournamentError::PisteNotFound { piste: number })?;
    if piste.occupied {
        return Err(TournamentError::PisteOccupied { piste: number });
    }

    if let Some(p) = tournament.get_piste_mut(number) {
        p.match_started();
    }
    if let Some(b) = tournament.get_bout_mut(bout_id) {
        b.ongoing = true;
        b.started_at = Some(chrono::Utc::now());
    }
    log::debug!("Bout {bout_id} started on piste {number}");
    Ok(())
}

/// Manually assign a bout to a specific piste, resolving conflicts:
/// a staged bout moves to a free piste; two staged bouts swap pistes; an
/// unstaged bout takes a free piste; staging onto a piste reserved by
/// another unstarted bout bumps that bout back to unassigned.
pub fn assign_certain_piste(
    tournament: &mut Tournament,
    bout_id: BoutId,
    piste: u32,
) -> Result<(), TournamentError> {
    let bout = tournament
        .get_bout(bout_id)
        .ok_or(TournamentError::BoutNotFound(bout_id))?;
    if bout.completed || bout.walkover {
        return Err(TournamentError::BoutClosed(bout_id));
    }
    let ongoing = bout.ongoing;
    let old_piste = bout.piste;
    let target = tournament
        .get_piste(piste)
        .ok_or(TournamentError::PisteNotFound { piste })?;
    if target.disabled {
        return Err(TournamentError::PisteDisabled { piste });
    }
    if old_piste == Some(piste) {
        return Ok(());
    }

    // Moving an ongoing bout needs a fully free target.
    if ongoing {
        if target.staged || target.occupied {
            return Err(TournamentError::PisteOccupied { piste });
        }
        if let Some(old) = old_piste.and_then(|n| tournament.get_piste_mut(n)) {
            old.match_finished();
        }
        if let Some(p) = tournament.get_piste_mut(piste) {
            p.match_started();
        }
        set_bout_piste(tournament, bout_id, Some(piste));
        return Ok(());
    }

    // Bout staged on the target piste, if any.
    let displaced: Option<BoutId> = tournament
        .bouts
        .iter()
        .find(|b| b.id != bout_id && b.piste == Some(piste) && !b.completed && !b.ongoing)
        .map(|b| b.id);
    let target_staged = target.staged;

    match (old_piste, target_staged) {
        // Staged elsewhere, target free: move the reservation.
        (Some(old), false) => {
            if let Some(p) = tournament.get_piste_mut(old) {
                p.staged = false;
            }
            if let Some(p) = tournament.get_piste_mut(piste) {
                p.staged = true;
            }
            set_bout_piste(tournament, bout_id, Some(piste));
        }
        // Both staged: swap the two bouts.
        (Some(old), true) => {
            if let Some(other) = displaced {
                set_bout_piste(tournament, other, Some(old));
            } else if let Some(p) = tournament.get_piste_mut(old) {
                p.staged = false;
            }
            set_bout_piste(tournament, bout_id, Some(piste));
        }
        // Unstaged, target free: plain assignment.
        (None, false) => {
            if let Some(p) = tournament.get_piste_mut(piste) {
                p.staged = true;
            }
            set_bout_piste(tournament, bout_id, Some(piste));
        }
        // Unstaged, target reserved by an unstarted bout: bump it.
        (None, true) => {
            if let Some(other) = displaced {
                set_bout_piste(tournament, other, None);
            }
            set_bout_piste(tournament, bout_id, Some(piste));
        }
    }
    log::debug!("Bout {bout_id} manually assigned to piste {piste}");
    Ok(())
}

/// Drop a bout's piste reservation. Fails unless the bout is staged.
pub fn remove_piste_assignment(
    tournament: &mut Tournament,
    bout_id: BoutId,
) -> Result<(), TournamentError> {
    let bout = tournament
        .get_bout(bout_id)
        .ok_or(TournamentError::BoutNotFound(bout_id))?;
    if bout.completed || bout.ongoing {
        return Err(TournamentError::NotStaged(bout_id));
    }
    let number = bout.piste.ok_or(TournamentError::NotStaged(bout_id))?;
    if let Some(p) = tournament.get_piste_mut(number) {
        p.staged = false;
    }
    set_bout_piste(tournament, bout_id, None);
    Ok(())
}

/// Disable a piste: unstage any bout reserved on it, then mark it unusable.
/// Fails while an ongoing bout occupies it.
pub fn disable_piste(tournament: &mut Tournament, piste: u32) -> Result<(), TournamentError> {
    let p = tournament
        .get_piste(piste)
        .ok_or(TournamentError::PisteNotFound { piste })?;
    if p.occupied {
        return Err(TournamentError::PisteOccupied { piste });
    }
    for bout in &mut tournament.bouts {
        if bout.piste == Some(piste) && !bout.completed {
            bout.piste = None;
        }
    }
    if let Some(p) = tournament.get_piste_mut(piste) {
        p.reset();
        p.disabled = true;
    }
    log::info!("Piste {piste} disabled");
    Ok(())
}

/// Re-enable a disabled piste and let the allocator use it again.
pub fn enable_piste(tournament: &mut Tournament, piste: u32) -> Result<(), TournamentError> {
    let p = tournament
        .get_piste_mut(piste)
        .ok_or(TournamentError::PisteNotFound { piste })?;
    p.disabled = false;
    assign_pistes(tournament);
    Ok(())
}
