//! Standings: deterministic multi-key ranking over fencer statistics.
//!
//! Recomputed fully from the statistics buckets on every call; the only
//! state written back is each fencer's display rank.

use crate::models::{Fencer, FencerId, StatBucket, Tournament};

/// Which slice of the tournament a standings request covers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StandingsScope {
    /// Everyone, ranked on the `overall` bucket.
    Overall,
    /// One preliminary group (1-based), ranked on the summed preliminary buckets.
    PreliminaryGroup(usize),
    /// Fencers who entered the bracket, ranked on the elimination bucket.
    Elimination,
    /// Everyone: bracket fencers first, then those who never reached it.
    Combined,
}

/// Sort key, compared descending field by field:
/// not disqualified, reached-elimination (combined scope), final rank
/// (better rank wins; unranked sorts below any ranked fencer), win
/// percentage, points difference, points for, points against. Remaining
/// ties are unspecified.
fn sort_key(fencer: &Fencer, bucket: &StatBucket, combined: bool) -> (bool, bool, i64, u32, i64, u32, u32) {
    let rank_key = match fencer.final_rank {
        Some(rank) => -(rank as i64),
        None => i64::MIN,
    };
    let reached = !combined || fencer.elimination_value.is_some() || fencer.final_rank.is_some();
    (
        !fencer.disqualified,
        reached,
        rank_key,
        bucket.win_percentage(),
        bucket.points_difference(),
        bucket.points_for,
        bucket.points_against,
    )
}

fn scope_bucket(fencer: &Fencer, scope: StandingsScope) -> StatBucket {
    match scope {
        StandingsScope::Overall | StandingsScope::Combined => fencer.overall,
        StandingsScope::PreliminaryGroup(_) => StatBucket::sum(fencer.preliminary.iter()),
        StandingsScope::Elimination => fencer.elimination,
    }
}

fn in_scope(fencer: &Fencer, scope: StandingsScope) -> bool {
    match scope {
        StandingsScope::Overall | StandingsScope::Combined => true,
        StandingsScope::PreliminaryGroup(group) => fencer.prelim_group == Some(group),
        StandingsScope::Elimination => {
            fencer.elimination_value.is_some() || fencer.final_rank.is_some()
        }
    }
}

/// Fencer ids in ranking order for the given scope, best first. Writes the
/// computed rank back onto each fencer for display.
pub fn ranked_fencer_ids(tournament: &mut Tournament, scope: StandingsScope) -> Vec<FencerId> {
    let combined = scope == StandingsScope::Combined;
    let mut order: Vec<(FencerId, (bool, bool, i64, u32, i64, u32, u32))> = tournament
        .fencers
        .iter()
        .filter(|f| in_scope(f, scope))
        .map(|f| (f.id, sort_key(f, &scope_bucket(f, scope), combined)))
        .collect();
    order.sort_by(|a, b| b.1.cmp(&a.1));

    let ids: Vec<FencerId> = order.into_iter().map(|(id, _)| id).collect();
    for (i, id) in ids.iter().enumerate() {
        if let Some(f) = tournament.get_fencer_mut(*id) {
            f.rank = Some(i as u32 + 1);
        }
    }
    ids
}
