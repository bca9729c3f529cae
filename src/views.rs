//! Serializable output shapes for the operator UI: match list, standings
//! rows, tableau map, dashboard summary, and the per-fencer hub. Views are
//! plain data computed on demand; nothing here mutates tournament state
//! except the rank write-back performed by the standings engine.

use crate::logic::{ranked_fencer_ids, StandingsScope};
use crate::models::{
    Bout, BoutId, Competitor, FencerId, PisteState, StatBucket, Tournament, TournamentError,
};
use serde::Serialize;

fn competitor_name(tournament: &Tournament, competitor: Competitor) -> String {
    match competitor {
        Competitor::Wildcard(_) => "Wildcard".to_string(),
        Competitor::Fencer(id) => tournament
            .get_fencer(id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
    }
}

fn competitor_nationality(tournament: &Tournament, competitor: Competitor) -> String {
    match competitor {
        Competitor::Wildcard(_) => "WLD".to_string(),
        Competitor::Fencer(id) => tournament
            .get_fencer(id)
            .and_then(|f| f.nationality.clone())
            .unwrap_or_default(),
    }
}

/// One row of the match list or tableau.
#[derive(Clone, Debug, Serialize)]
pub struct BoutView {
    pub id: BoutId,
    pub green: String,
    pub red: String,
    pub green_nationality: String,
    pub red_nationality: String,
    pub green_score: u32,
    pub red_score: u32,
    pub stage: String,
    /// Piste number, "TBA" while unassigned, "-" for walkovers.
    pub piste: String,
    pub ongoing: bool,
    pub completed: bool,
    pub walkover: bool,
    pub priority: i32,
}

fn bout_view(tournament: &Tournament, bout: &Bout) -> BoutView {
    let piste = if bout.walkover {
        "-".to_string()
    } else {
        match bout.piste {
            Some(n) => n.to_string(),
            None => "TBA".to_string(),
        }
    };
    BoutView {
        id: bout.id,
        green: competitor_name(tournament, bout.green),
        red: competitor_name(tournament, bout.red),
        green_nationality: competitor_nationality(tournament, bout.green),
        red_nationality: competitor_nationality(tournament, bout.red),
        green_score: bout.green_score,
        red_score: bout.red_score,
        stage: bout.stage.label().to_string(),
        piste,
        ongoing: bout.ongoing,
        completed: bout.completed,
        walkover: bout.walkover,
        priority: bout.priority,
    }
}

/// The current stage's bouts in sequence order.
pub fn match_list(tournament: &Tournament) -> Vec<BoutView> {
    tournament
        .current_bouts()
        .into_iter()
        .map(|b| bout_view(tournament, b))
        .collect()
}

/// One row of a standings table.
#[derive(Clone, Debug, Serialize)]
pub struct StandingRow {
    pub rank: u32,
    pub name: String,
    pub club: Option<String>,
    pub nationality: Option<String>,
    /// "wins - losses".
    pub win_lose: String,
    pub matches: u32,
    pub win_percentage: u32,
    /// Signed, with an explicit `+` when positive.
    pub points_difference: String,
    pub points_for: u32,
    pub points_against: u32,
    pub final_rank: Option<u32>,
    pub disqualified: bool,
}

/// A full standings table for the requested scope, best first.
pub fn standings(tournament: &mut Tournament, scope: StandingsScope) -> Vec<StandingRow> {
    let ids = ranked_fencer_ids(tournament, scope);
    ids.iter()
        .enumerate()
        .filter_map(|(i, id)| {
            let f = tournament.get_fencer(*id)?;
            let bucket = match scope {
                StandingsScope::Overall | StandingsScope::Combined => f.overall,
                StandingsScope::PreliminaryGroup(_) => StatBucket::sum(f.preliminary.iter()),
                StandingsScope::Elimination => f.elimination,
            };
            Some(StandingRow {
                rank: i as u32 + 1,
                name: f.name.clone(),
                club: f.club.clone(),
                nationality: f.nationality.clone(),
                win_lose: format!("{} - {}", bucket.wins, bucket.losses),
                matches: bucket.matches,
                win_percentage: bucket.win_percentage(),
                points_difference: bucket.points_difference_str(),
                points_for: bucket.points_for,
                points_against: bucket.points_against,
                final_rank: f.final_rank,
                disqualified: f.disqualified,
            })
        })
        .collect()
}

/// One elimination round of the tableau map.
#[derive(Clone, Debug, Serialize)]
pub struct TableauRound {
    pub stage: String,
    pub bouts: Vec<BoutView>,
}

/// The tableau round by round, in the order the rounds were fenced.
pub fn tableau(tournament: &Tournament) -> Vec<TableauRound> {
    tournament
        .tableau
        .stages()
        .into_iter()
        .map(|stage| TableauRound {
            stage: stage.label().to_string(),
            bouts: tournament
                .tableau
                .nodes_for_stage(stage)
                .into_iter()
                .filter_map(|n| tournament.get_bout(n.bout))
                .map(|b| bout_view(tournament, b))
                .collect(),
        })
        .collect()
}

/// Dashboard summary line.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardInfo {
    pub name: String,
    pub location: Option<String>,
    pub stage: String,
    pub elimination_mode: String,
    pub num_fencers: usize,
    pub num_pistes: usize,
    pub matches_left: usize,
}

pub fn dashboard(tournament: &Tournament) -> DashboardInfo {
    DashboardInfo {
        name: tournament.name.clone(),
        location: tournament.location.clone(),
        stage: tournament.stage.label().to_string(),
        elimination_mode: tournament.elimination_mode.to_string(),
        num_fencers: tournament.fencers.len(),
        num_pistes: tournament.pistes.len(),
        matches_left: tournament.matches_left(),
    }
}

/// Occupancy of one piste, with the bout currently attached to it.
#[derive(Clone, Debug, Serialize)]
pub struct PisteView {
    pub number: u32,
    pub state: PisteState,
    pub bout: Option<BoutView>,
}

pub fn piste_overview(tournament: &Tournament) -> Vec<PisteView> {
    tournament
        .pistes
        .iter()
        .map(|p| {
            let bout = tournament
                .bouts
                .iter()
                .filter(|b| b.piste == Some(p.number) && !b.completed)
                .max_by_key(|b| b.ongoing)
                .map(|b| bout_view(tournament, b));
            PisteView {
                number: p.number,
                state: p.state(),
                bout,
            }
        })
        .collect()
}

/// Per-fencer detail page: identity, statistics per stage, recent form, and
/// the next upcoming bout.
#[derive(Clone, Debug, Serialize)]
pub struct FencerHub {
    pub id: FencerId,
    pub description: String,
    pub group: Option<usize>,
    pub rank: Option<u32>,
    pub final_rank: Option<u32>,
    pub eliminated: bool,
    pub disqualified: bool,
    pub overall: StatBucket,
    pub preliminary: Vec<StatBucket>,
    pub elimination: StatBucket,
    pub win_percentage: u32,
    pub points_per_game: f64,
    pub points_against_per_game: f64,
    /// Recent bout outcomes, oldest first.
    pub recent_form: Vec<bool>,
    pub next_bout: Option<BoutView>,
}

pub fn fencer_hub(
    tournament: &Tournament,
    fencer_id: FencerId,
) -> Result<FencerHub, TournamentError> {
    let fencer = tournament
        .get_fencer(fencer_id)
        .ok_or(TournamentError::FencerNotFound(fencer_id))?;
    let next_bout = tournament
        .current_bouts()
        .into_iter()
        .find(|b| !b.completed && b.involves_fencer(fencer_id))
        .map(|b| bout_view(tournament, b));
    Ok(FencerHub {
        id: fencer.id,
        description: fencer.describe(),
        group: fencer.prelim_group,
        rank: fencer.rank,
        final_rank: fencer.final_rank,
        eliminated: fencer.eliminated,
        disqualified: fencer.disqualified,
        overall: fencer.overall,
        preliminary: fencer.preliminary.clone(),
        elimination: fencer.elimination,
        win_percentage: fencer.overall.win_percentage(),
        points_per_game: fencer.overall.points_per_game(),
        points_against_per_game: fencer.overall.points_against_per_game(),
        recent_form: fencer.recent_form.iter().map(|e| e.won).collect(),
        next_bout,
    })
}
