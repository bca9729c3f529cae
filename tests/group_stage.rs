//! Integration tests for the preliminary phase: group partitioning,
//! round-robin generation, and the fairness sequencer.

use fencing_tableau::{
    next_stage, order_fairly, push_score, start_tournament, Bout, BoutKind, EliminationMode,
    Fencer, Stage, Tournament, TournamentConfig, TournamentError,
};
use uuid::Uuid;

fn config(preliminary_rounds: usize, num_pistes: usize) -> TournamentConfig {
    TournamentConfig {
        name: "Test Cup".into(),
        location: None,
        preliminary_rounds,
        preliminary_groups: None,
        elimination_mode: EliminationMode::Ko,
        num_pistes,
        first_elimination_round: None,
    }
}

fn fencers(n: usize, rounds: usize) -> Vec<Fencer> {
    (0..n)
        .map(|i| Fencer::new(format!("F{i}"), None, None, i as u32 + 1, rounds))
        .collect()
}

fn tournament(n: usize) -> Tournament {
    Tournament::new(config(1, 4), fencers(n, 1)).unwrap()
}

#[test]
fn six_fencers_give_a_fifteen_bout_round_robin() {
    let mut t = tournament(6);
    start_tournament(&mut t).unwrap();
    assert_eq!(t.stage, Stage::Preliminary);
    assert_eq!(t.bouts.len(), 15);
    for bout in &t.bouts {
        assert_eq!(bout.stage, Stage::Preliminary);
        assert!(matches!(bout.kind, BoutKind::Group { group: 1, round: 1 }));
    }
}

#[test]
fn auto_partition_keeps_groups_at_eight_or_fewer() {
    let mut t = tournament(9);
    start_tournament(&mut t).unwrap();
    assert_eq!(t.num_groups(), 2);
    // Round robin of a 5-group and a 4-group.
    assert_eq!(t.bouts.len(), 10 + 6);
    for f in &t.fencers {
        assert!(matches!(f.prelim_group, Some(1) | Some(2)));
    }
}

#[test]
fn configured_group_count_is_respected() {
    let mut cfg = config(1, 4);
    cfg.preliminary_groups = Some(3);
    let mut t = Tournament::new(cfg, fencers(6, 1)).unwrap();
    start_tournament(&mut t).unwrap();
    assert_eq!(t.num_groups(), 3);
    // Three groups of two: one bout each.
    assert_eq!(t.bouts.len(), 3);
}

#[test]
fn fair_order_avoids_back_to_back_bouts() {
    let ids: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();
    let mut bouts = Vec::new();
    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            bouts.push(Bout::group(ids[i], ids[j], 1, 1));
        }
    }
    let ordered = order_fairly(bouts);
    assert_eq!(ordered.len(), 15);
    for pair in ordered.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            !b.involves(a.green) && !b.involves(a.red),
            "fencer scheduled in two adjacent slots"
        );
    }
}

#[test]
fn starting_twice_is_refused() {
    let mut t = tournament(4);
    start_tournament(&mut t).unwrap();
    assert!(matches!(
        start_tournament(&mut t),
        Err(TournamentError::AlreadyStarted)
    ));
}

#[test]
fn next_stage_refuses_while_bouts_remain() {
    let mut t = tournament(4);
    start_tournament(&mut t).unwrap();
    assert!(matches!(
        next_stage(&mut t),
        Err(TournamentError::MatchesIncomplete { left: 6 })
    ));
}

#[test]
fn second_preliminary_round_repeats_the_round_robin() {
    let mut t = Tournament::new(config(2, 4), fencers(4, 2)).unwrap();
    start_tournament(&mut t).unwrap();
    assert_eq!(t.bouts.len(), 6);
    let ids: Vec<_> = t.bouts.iter().map(|b| b.id).collect();
    for id in ids {
        push_score(&mut t, id, 15, 7).unwrap();
    }
    next_stage(&mut t).unwrap();
    assert_eq!(t.stage, Stage::Preliminary);
    assert_eq!(t.preliminary_round, 2);
    assert_eq!(t.bouts.len(), 12);
    // Statistics landed in the round-one bucket only.
    for f in &t.fencers {
        assert_eq!(f.preliminary[0].matches, 3);
        assert_eq!(f.preliminary[1].matches, 0);
        assert_eq!(f.overall.matches, 3);
    }
}

#[test]
fn group_bouts_against_a_disqualified_fencer_resolve_as_walkovers() {
    let mut t = tournament(4);
    let dq = t.fencers[0].id;
    fencing_tableau::disqualify(&mut t, dq).unwrap();
    start_tournament(&mut t).unwrap();
    let walkovers: Vec<&Bout> = t.bouts.iter().filter(|b| b.walkover).collect();
    assert_eq!(walkovers.len(), 3);
    for bout in walkovers {
        assert!(bout.completed);
        assert_eq!(bout.piste, None);
        let winner = bout.winner().unwrap().fencer_id().unwrap();
        assert_ne!(winner, dq);
    }
    // Walkovers never touch statistics.
    assert_eq!(t.get_fencer(dq).unwrap().overall.matches, 0);
}
