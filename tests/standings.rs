//! Integration tests for the standings engine: the multi-key comparator and
//! the per-scope buckets.

use fencing_tableau::{
    ranked_fencer_ids, EliminationMode, Fencer, FencerId, StandingsScope, StatBucket, Tournament,
    TournamentConfig,
};

fn tournament(n: usize) -> Tournament {
    let fencers: Vec<Fencer> = (0..n)
        .map(|i| Fencer::new(format!("F{i}"), None, None, i as u32 + 1, 1))
        .collect();
    Tournament::new(
        TournamentConfig {
            name: "Test Cup".into(),
            location: None,
            preliminary_rounds: 1,
            preliminary_groups: None,
            elimination_mode: EliminationMode::Ko,
            num_pistes: 2,
            first_elimination_round: None,
        },
        fencers,
    )
    .unwrap()
}

fn bucket(wins: u32, losses: u32, points_for: u32, points_against: u32) -> StatBucket {
    StatBucket {
        matches: wins + losses,
        wins,
        losses,
        points_for,
        points_against,
    }
}

fn id_of(t: &Tournament, start_number: u32) -> FencerId {
    t.fencers
        .iter()
        .find(|f| f.start_number == start_number)
        .unwrap()
        .id
}

#[test]
fn comparator_orders_by_win_percentage_then_difference_then_points() {
    let mut t = tournament(4);
    t.fencers[0].overall = bucket(1, 1, 20, 15); // 50%, +5
    t.fencers[1].overall = bucket(2, 0, 30, 10); // 100%
    t.fencers[2].overall = bucket(1, 1, 25, 20); // 50%, +5, more points for
    t.fencers[3].overall = bucket(0, 2, 5, 30); // 0%

    let ranked = ranked_fencer_ids(&mut t, StandingsScope::Overall);
    assert_eq!(ranked[0], id_of(&t, 2));
    assert_eq!(ranked[1], id_of(&t, 3)); // wins the points-for tiebreak
    assert_eq!(ranked[2], id_of(&t, 1));
    assert_eq!(ranked[3], id_of(&t, 4));
}

#[test]
fn fencers_without_matches_rank_without_dividing_by_zero() {
    let mut t = tournament(3);
    t.fencers[0].overall = bucket(1, 0, 15, 3);
    let ranked = ranked_fencer_ids(&mut t, StandingsScope::Overall);
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0], id_of(&t, 1));
    assert_eq!(t.fencers[1].overall.win_percentage(), 0);
}

#[test]
fn points_difference_renders_with_an_explicit_plus() {
    assert_eq!(bucket(1, 0, 18, 3).points_difference_str(), "+15");
    assert_eq!(bucket(0, 1, 3, 18).points_difference_str(), "-15");
    assert_eq!(bucket(1, 1, 10, 10).points_difference_str(), "0");
}

#[test]
fn computed_rank_is_written_back_for_display() {
    let mut t = tournament(3);
    t.fencers[2].overall = bucket(1, 0, 15, 0);
    let ranked = ranked_fencer_ids(&mut t, StandingsScope::Overall);
    for (i, id) in ranked.iter().enumerate() {
        assert_eq!(t.get_fencer(*id).unwrap().rank, Some(i as u32 + 1));
    }
    assert_eq!(t.fencers[2].rank, Some(1));
}

#[test]
fn final_rank_outranks_any_statistics() {
    let mut t = tournament(3);
    t.fencers[0].overall = bucket(5, 0, 75, 10);
    t.fencers[1].final_rank = Some(2);
    t.fencers[2].final_rank = Some(1);

    let ranked = ranked_fencer_ids(&mut t, StandingsScope::Overall);
    assert_eq!(ranked[0], id_of(&t, 3));
    assert_eq!(ranked[1], id_of(&t, 2));
    assert_eq!(ranked[2], id_of(&t, 1));
}

#[test]
fn combined_scope_lists_bracket_fencers_first() {
    let mut t = tournament(3);
    // Never reached the bracket, but with the best record.
    t.fencers[0].overall = bucket(3, 0, 45, 5);
    t.fencers[1].elimination_value = Some(0);
    t.fencers[2].elimination_value = Some(1);
    t.fencers[2].overall = bucket(1, 2, 20, 30);

    let ranked = ranked_fencer_ids(&mut t, StandingsScope::Combined);
    assert_eq!(ranked[2], id_of(&t, 1));
    // Plain overall scope ignores bracket membership.
    let overall = ranked_fencer_ids(&mut t, StandingsScope::Overall);
    assert_eq!(overall[0], id_of(&t, 1));
}

#[test]
fn elimination_scope_covers_only_bracket_fencers() {
    let mut t = tournament(3);
    // Reached the bracket with a win on the board.
    t.fencers[0].elimination_value = Some(1);
    t.fencers[0].elimination = bucket(1, 0, 15, 8);
    // Already holds a final rank; outranks any statistics.
    t.fencers[1].final_rank = Some(1);
    // Never qualified, whatever the overall record says.
    t.fencers[2].overall = bucket(3, 0, 45, 5);

    let ranked = ranked_fencer_ids(&mut t, StandingsScope::Elimination);
    assert_eq!(ranked, vec![id_of(&t, 2), id_of(&t, 1)]);
    assert_eq!(t.fencers[1].rank, Some(1));
    assert_eq!(t.fencers[0].rank, Some(2));
}

#[test]
fn group_scope_ranks_only_that_group_on_preliminary_buckets() {
    let mut t = tournament(4);
    t.fencers[0].prelim_group = Some(1);
    t.fencers[1].prelim_group = Some(1);
    t.fencers[2].prelim_group = Some(2);
    t.fencers[3].prelim_group = Some(2);
    t.fencers[0].preliminary[0] = bucket(0, 1, 5, 15);
    t.fencers[1].preliminary[0] = bucket(1, 0, 15, 5);
    // Overall stats must not leak into the group view.
    t.fencers[0].overall = bucket(4, 0, 60, 10);

    let ranked = ranked_fencer_ids(&mut t, StandingsScope::PreliminaryGroup(1));
    assert_eq!(ranked, vec![id_of(&t, 2), id_of(&t, 1)]);
}
