//! Elimination phase: tableau construction, round advancement, final ranks.
//!
//! The field is padded to a power of two with wildcards; a bout against a
//! wildcard (or a disqualified fencer) resolves as a 1-0 walkover without a
//! piste and without statistics. KO mode drops losers with a rank; placement
//! mode keeps them fencing consolation lines until everyone is ranked.

use crate::logic::standings::{ranked_fencer_ids, StandingsScope};
use crate::models::{
    Bout, BoutId, BoutKind, Bracket, Competitor, EliminationLine, EliminationMode, Stage,
    Tournament, TournamentError,
};
use std::collections::VecDeque;

/// Whether a competitor can actually fence (real and not disqualified).
fn playable(tournament: &Tournament, competitor: Competitor) -> bool {
    match competitor {
        Competitor::Wildcard(_) => false,
        Competitor::Fencer(id) => tournament
            .get_fencer(id)
            .map(|f| !f.disqualified)
            .unwrap_or(false),
    }
}

/// Create one elimination bout (with its tableau node), resolving it as a
/// walkover right away when either side cannot fence.
fn create_bout(
    tournament: &mut Tournament,
    green: Competitor,
    red: Competitor,
    stage: Stage,
    line: EliminationLine,
    parents: Vec<usize>,
) -> BoutId {
    let mut bout = Bout::elimination(green, red, stage, line);
    if !playable(tournament, green) || !playable(tournament, red) {
        let winner_is_green = playable(tournament, green) || !playable(tournament, red);
        bout.resolve_walkover(winner_is_green);
    }
    let id = bout.id;
    tournament.tableau.add_node(id, stage, parents);
    tournament.bouts.push(bout);
    id
}

/// One completed bout of the finished round, in sequence order.
struct RoundResult {
    winner: Competitor,
    loser: Competitor,
    node: usize,
}

fn completed_round(
    tournament: &Tournament,
    stage: Stage,
) -> Result<Vec<RoundResult>, TournamentError> {
    let mut round = Vec::new();
    let mut left = 0;
    for bout in &tournament.bouts {
        if bout.stage != stage || !matches!(bout.kind, BoutKind::Elimination { .. }) {
            continue;
        }
        match (bout.winner(), bout.loser()) {
            (Some(winner), Some(loser)) => round.push(RoundResult {
                winner,
                loser,
                node: tournament
                    .tableau
                    .node_for_bout(bout.id)
                    .map(|n| n.id)
                    .unwrap_or(0),
            }),
            _ => left += 1,
        }
    }
    if left > 0 {
        return Err(TournamentError::MatchesIncomplete { left });
    }
    Ok(round)
}

/// Build the first elimination round from the preliminary standings.
///
/// The field is the full ranking (or the configured top-n cut), padded to the
/// next power of two with wildcards; pairing consumes the seeded list from
/// both ends (best vs. worst). Seed indexes are written back as each
/// fencer's elimination value; wildcards stay unseeded and sort last.
pub fn enter_elimination(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let mut ranked = ranked_fencer_ids(tournament, StandingsScope::Overall);
    if let Some(cut) = tournament.first_elimination_round {
        ranked.truncate(cut);
    }
    let field = ranked.len().next_power_of_two().max(2);
    let stage = Stage::from_field_size(field).ok_or(TournamentError::TooManyFencers {
        count: ranked.len(),
    })?;
    let num_wildcards = field - ranked.len();

    for (i, id) in ranked.iter().enumerate() {
        if let Some(f) = tournament.get_fencer_mut(*id) {
            f.elimination_value = Some(i as u32);
            f.eliminated = false;
        }
    }

    let mut seeds: VecDeque<Competitor> = ranked.into_iter().map(Competitor::Fencer).collect();
    for n in 1..=num_wildcards {
        seeds.push_back(Competitor::Wildcard(n as u32));
    }

    tournament.stage = stage;
    tournament.bracket = Some(Bracket {
        mode: tournament.elimination_mode,
        stage,
        third_place: None,
    });

    while let (Some(green), Some(red)) = (seeds.pop_front(), seeds.pop_back()) {
        create_bout(tournament, green, red, stage, EliminationLine::Title, Vec::new());
    }

    log::info!(
        "Entered elimination at {} with {} wildcard(s)",
        stage.label(),
        num_wildcards
    );
    Ok(())
}

fn set_elimination_value(tournament: &mut Tournament, competitor: Competitor, value: u32) {
    if let Competitor::Fencer(id) = competitor {
        if let Some(f) = tournament.get_fencer_mut(id) {
            f.elimination_value = Some(value);
        }
    }
}

fn mark_eliminated(tournament: &mut Tournament, competitor: Competitor, rank: Option<u32>) {
    if let Competitor::Fencer(id) = competitor {
        if let Some(f) = tournament.get_fencer_mut(id) {
            f.eliminated = true;
            if rank.is_some() {
                f.final_rank = rank;
            }
        }
    }
}

fn never_eliminated(tournament: &Tournament, competitor: Competitor) -> bool {
    match competitor {
        Competitor::Wildcard(_) => false,
        Competitor::Fencer(id) => tournament
            .get_fencer(id)
            .map(|f| !f.eliminated)
            .unwrap_or(false),
    }
}

/// Advance the bracket one round. Requires every bout of the current round
/// to be completed.
pub fn advance_round(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let bracket = tournament
        .bracket
        .clone()
        .ok_or(TournamentError::TerminalStage)?;
    let stage = bracket.stage;
    let next = match stage.next() {
        Some(s) if s.is_elimination() => s,
        _ => return Err(TournamentError::TerminalStage),
    };
    let round = completed_round(tournament, stage)?;

    match bracket.mode {
        EliminationMode::Ko => advance_ko(tournament, &round, stage, next),
        EliminationMode::Placement => advance_placement(tournament, &round, stage, next),
        EliminationMode::Repechage => {
            return Err(TournamentError::UnsupportedMode(EliminationMode::Repechage))
        }
    }

    tournament.stage = next;
    if let Some(b) = tournament.bracket.as_mut() {
        b.stage = next;
    }
    log::info!("Bracket advanced to {}", next.label());
    Ok(())
}

/// KO: losers are out with the current round's field size as their rank
/// (semi-final losers wait for the bronze-medal bout); winners pair in
/// sequence order for the next round.
fn advance_ko(tournament: &mut Tournament, round: &[RoundResult], stage: Stage, next: Stage) {
    let loser_rank = if stage == Stage::SemiFinals {
        None // decided by the third-place bout
    } else {
        stage.field_size().map(|n| n as u32)
    };
    for result in round {
        mark_eliminated(tournament, result.loser, loser_rank);
    }

    let winners: Vec<(Competitor, usize)> = round.iter().map(|r| (r.winner, r.node)).collect();
    for (i, (w, _)) in winners.iter().enumerate() {
        set_elimination_value(tournament, *w, i as u32);
    }
    for pair in winners.chunks(2) {
        if let [(green, gn), (red, rn)] = pair {
            create_bout(
                tournament,
                *green,
                *red,
                next,
                EliminationLine::Title,
                vec![*gn, *rn],
            );
        }
    }

    if next == Stage::GrandFinal {
        // The two semi-final losers meet for bronze, alongside the final.
        let losers: Vec<(Competitor, usize)> = round.iter().map(|r| (r.loser, r.node)).collect();
        if let [(green, gn), (red, rn)] = losers.as_slice() {
            let id = create_bout(
                tournament,
                *green,
                *red,
                next,
                EliminationLine::ThirdPlace,
                vec![*gn, *rn],
            );
            if let Some(b) = tournament.bracket.as_mut() {
                b.third_place = Some(id);
            }
        }
    }
}

/// Placement: nobody stops fencing. Within each tier block the winners are
/// regrouped before the losers, so winners keep meeting winners and losers
/// drop into consolation lines; the resulting bout order of the last round
/// is the final ranking order.
fn advance_placement(tournament: &mut Tournament, round: &[RoundResult], stage: Stage, next: Stage) {
    for result in round {
        mark_eliminated(tournament, result.loser, None);
    }

    // A tier block spans field_size/2 bouts; winners of a block stay in the
    // upper half of its rank range, losers fall to the lower half.
    let block = stage.field_size().unwrap_or(2) / 2;
    let mut order: Vec<(Competitor, usize)> = Vec::with_capacity(round.len() * 2);
    for chunk in round.chunks(block.max(1)) {
        for r in chunk {
            order.push((r.winner, r.node));
        }
        for r in chunk {
            order.push((r.loser, r.node));
        }
    }
    for (i, (c, _)) in order.iter().enumerate() {
        set_elimination_value(tournament, *c, i as u32);
    }

    for (j, pair) in order.chunks(2).enumerate() {
        if let [(green, gn), (red, rn)] = pair {
            let title = never_eliminated(tournament, *green) && never_eliminated(tournament, *red);
            let line = if title {
                EliminationLine::Title
            } else if next == Stage::GrandFinal && j == 1 {
                // Losers of the title semi-finals: the bronze-medal bout.
                EliminationLine::ThirdPlace
            } else {
                EliminationLine::Placement
            };
            let id = create_bout(tournament, *green, *red, next, line, vec![*gn, *rn]);
            if line == EliminationLine::ThirdPlace {
                if let Some(b) = tournament.bracket.as_mut() {
                    b.third_place = Some(id);
                }
            }
        }
    }
}

/// Close the bracket after the grand-final round: assign final ranks from
/// the last round's bout order (winner before loser, wildcards skipped) and
/// move the tournament to `Finished`.
pub fn finish_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let bracket = tournament
        .bracket
        .clone()
        .ok_or(TournamentError::TerminalStage)?;
    if bracket.stage != Stage::GrandFinal {
        return Err(TournamentError::TerminalStage);
    }
    let round = completed_round(tournament, Stage::GrandFinal)?;

    let mut rank = 0u32;
    for result in &round {
        mark_eliminated(tournament, result.loser, None);
        for c in [result.winner, result.loser] {
            if let Competitor::Fencer(id) = c {
                rank += 1;
                if let Some(f) = tournament.get_fencer_mut(id) {
                    f.final_rank = Some(rank);
                }
            }
        }
    }

    tournament.stage = Stage::Finished;
    if let Some(b) = tournament.bracket.as_mut() {
        b.stage = Stage::Finished;
    }
    log::info!("Tournament finished; {rank} fencer(s) ranked in the tableau");
    Ok(())
}
