//! Group stage: partition into groups, round-robin pairing, fairness ordering.

use crate::models::{Bout, Competitor, Tournament, TournamentError};
use rand::Rng;
use std::collections::HashMap;

/// Largest group size the auto-partition aims for.
const MAX_GROUP_SIZE: usize = 8;

/// Wait-counter sentinel applied to both fencers of an emitted bout. Strongly
/// negative so a fencer who just fenced is passed over until every other
/// pairing is exhausted; counters recover by +1 per scan, so the loop always
/// terminates.
const JUST_FENCED: i64 = -10_000;

/// Number of groups: configured, or the smallest count keeping groups at 8 or
/// fewer members.
fn group_count(num_fencers: usize, configured: Option<usize>) -> usize {
    match configured {
        Some(g) if g > 0 => g.min(num_fencers),
        _ => num_fencers.div_ceil(MAX_GROUP_SIZE).max(1),
    }
}

/// Partition fencers into groups by round-robin over the start list; writes
/// each fencer's 1-based group assignment and returns the group member lists.
fn assign_groups(tournament: &mut Tournament) -> Vec<Vec<usize>> {
    let num_groups = group_count(tournament.fencers.len(), tournament.preliminary_groups);
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); num_groups];
    for (i, fencer) in tournament.fencers.iter_mut().enumerate() {
        let g = i % num_groups;
        fencer.prelim_group = Some(g + 1);
        groups[g].push(i);
    }
    groups
}

/// Generate the current preliminary round: every group plays a full round
/// robin (C(n,2) bouts, colors by coin flip), then the whole round is
/// reordered by the fairness sequencer and appended to the bout list.
pub fn generate_preliminary_round(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let round = tournament.preliminary_round;
    let groups = assign_groups(tournament);
    let mut rng = rand::thread_rng();

    let mut bouts = Vec::new();
    for (g, members) in groups.iter().enumerate() {
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                let a = tournament.fencers[members[i]].id;
                let b = tournament.fencers[members[j]].id;
                let bout = if rng.gen_bool(0.5) {
                    Bout::group(a, b, g + 1, round)
                } else {
                    Bout::group(b, a, g + 1, round)
                };
                bouts.push(bout);
            }
        }
    }

    let mut bouts = order_fairly(bouts);

    // A disqualified fencer forfeits: resolve immediately, no piste needed.
    for bout in &mut bouts {
        let dq = |c: Competitor| {
            c.fencer_id()
                .and_then(|id| tournament.get_fencer(id))
                .map(|f| f.disqualified)
                .unwrap_or(false)
        };
        if dq(bout.green) || dq(bout.red) {
            bout.resolve_walkover(!dq(bout.green));
        }
    }

    log::info!(
        "Generated preliminary round {} with {} bouts in {} group(s)",
        round,
        bouts.len(),
        groups.len()
    );
    tournament.bouts.extend(bouts);
    Ok(())
}

/// Fairness-ordered sequencing (greedy heuristic, not an optimal scheduler).
///
/// A per-fencer wait counter starts at zero. The remaining bouts are scanned
/// in order: a bout is emitted once its two fencers' summed wait exceeds the
/// larger of the two waits (both have waited at least once); otherwise both
/// counters tick up and the scan moves on. Emitting a bout resets both
/// fencers to [`JUST_FENCED`]. No fencer lands in two adjacent slots unless
/// the remaining pairings leave no alternative.
pub fn order_fairly(bouts: Vec<Bout>) -> Vec<Bout> {
    let mut wait: HashMap<Competitor, i64> = HashMap::new();
    for bout in &bouts {
        wait.insert(bout.green, 0);
        wait.insert(bout.red, 0);
    }

    let mut remaining = bouts;
    let mut ordered = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let picked = loop {
            let mut found = None;
            for (i, bout) in remaining.iter().enumerate() {
                let wg = wait.get(&bout.green).copied().unwrap_or(0);
                let wr = wait.get(&bout.red).copied().unwrap_or(0);
                if wg + wr > wg.max(wr) {
                    found = Some(i);
                    break;
                }
                wait.insert(bout.green, wg + 1);
                wait.insert(bout.red, wr + 1);
            }
            if let Some(i) = found {
                break i;
            }
        };
        let bout = remaining.remove(picked);
        wait.insert(bout.green, JUST_FENCED);
        wait.insert(bout.red, JUST_FENCED);
        ordered.push(bout);
    }
    ordered
}
