//! Integration tests for score submission, retroactive correction, and
//! disqualification.

use fencing_tableau::{
    correct_score, disqualify, push_score, ranked_fencer_ids, revoke_disqualification,
    simulate_current, start_tournament, EliminationMode, Fencer, StandingsScope, Tournament,
    TournamentConfig, TournamentError,
};

fn tournament(n: usize) -> Tournament {
    let fencers: Vec<Fencer> = (0..n)
        .map(|i| Fencer::new(format!("F{i}"), None, None, i as u32 + 1, 1))
        .collect();
    let mut t = Tournament::new(
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
    .unwrap();
    start_tournament(&mut t).unwrap();
    t
}

#[test]
fn negative_and_tied_scores_are_rejected_without_mutation() {
    let mut t = tournament(4);
    let id = t.bouts[0].id;
    assert!(matches!(
        push_score(&mut t, id, -1, 5),
        Err(TournamentError::InvalidScore { green: -1, red: 5 })
    ));
    assert!(matches!(
        push_score(&mut t, id, 10, 10),
        Err(TournamentError::InvalidScore { .. })
    ));
    assert!(!t.get_bout(id).unwrap().completed);
    for f in &t.fencers {
        assert_eq!(f.overall.matches, 0);
    }
}

#[test]
fn submission_updates_both_fencers_and_stays_consistent() {
    let mut t = tournament(4);
    let id = t.bouts[0].id;
    let (green, red) = {
        let b = t.get_bout(id).unwrap();
        (b.green.fencer_id().unwrap(), b.red.fencer_id().unwrap())
    };
    push_score(&mut t, id, 15, 11).unwrap();

    let g = t.get_fencer(green).unwrap();
    assert_eq!((g.overall.wins, g.overall.losses), (1, 0));
    assert_eq!((g.overall.points_for, g.overall.points_against), (15, 11));
    assert!(g.last_match_won);
    assert_eq!(g.recent_form.len(), 1);

    let r = t.get_fencer(red).unwrap();
    assert_eq!((r.overall.wins, r.overall.losses), (0, 1));
    assert!(!r.last_match_won);

    for f in &t.fencers {
        assert!(f.statistics_consistent());
    }
}

#[test]
fn scoring_a_completed_bout_twice_is_refused() {
    let mut t = tournament(4);
    let id = t.bouts[0].id;
    push_score(&mut t, id, 15, 11).unwrap();
    assert!(matches!(
        push_score(&mut t, id, 15, 2),
        Err(TournamentError::BoutClosed(_))
    ));
}

#[test]
fn correction_reverses_the_old_result_before_applying_the_new() {
    let mut t = tournament(4);
    let id = t.bouts[0].id;
    let (green, red) = {
        let b = t.get_bout(id).unwrap();
        (b.green.fencer_id().unwrap(), b.red.fencer_id().unwrap())
    };
    push_score(&mut t, id, 15, 11).unwrap();
    // The referee flips the result.
    correct_score(&mut t, id, 9, 15).unwrap();

    let g = t.get_fencer(green).unwrap();
    assert_eq!(g.overall.matches, 1);
    assert_eq!((g.overall.wins, g.overall.losses), (0, 1));
    assert_eq!((g.overall.points_for, g.overall.points_against), (9, 15));
    assert!(!g.last_match_won);
    // The bout appears once in the history, with the corrected outcome.
    assert_eq!(g.recent_form.len(), 1);

    let r = t.get_fencer(red).unwrap();
    assert_eq!((r.overall.wins, r.overall.losses), (1, 0));
    assert!(r.last_match_won);

    for f in &t.fencers {
        assert!(f.statistics_consistent());
    }
}

#[test]
fn only_completed_non_walkover_bouts_can_be_corrected() {
    let mut t = tournament(4);
    let id = t.bouts[0].id;
    assert!(matches!(
        correct_score(&mut t, id, 15, 3),
        Err(TournamentError::NotCompleted(_))
    ));

    let dq = t.fencers[0].id;
    disqualify(&mut t, dq).unwrap();
    let walkover = t.bouts.iter().find(|b| b.walkover).unwrap().id;
    assert!(matches!(
        correct_score(&mut t, walkover, 15, 3),
        Err(TournamentError::BoutClosed(_))
    ));
}

#[test]
fn disqualification_forfeits_open_bouts_and_sinks_the_standings() {
    let mut t = tournament(4);
    let dq = t.fencers[0].id;
    // One completed result for the fencer stays on the books.
    let played = t
        .bouts
        .iter()
        .find(|b| b.involves_fencer(dq))
        .unwrap()
        .id;
    let dq_is_green = t.get_bout(played).unwrap().green.fencer_id() == Some(dq);
    if dq_is_green {
        push_score(&mut t, played, 15, 0).unwrap();
    } else {
        push_score(&mut t, played, 0, 15).unwrap();
    }

    disqualify(&mut t, dq).unwrap();
    let open: Vec<_> = t
        .bouts
        .iter()
        .filter(|b| b.involves_fencer(dq) && b.id != played)
        .collect();
    assert_eq!(open.len(), 2);
    for bout in open {
        assert!(bout.walkover && bout.completed);
        assert_ne!(bout.winner().unwrap().fencer_id(), Some(dq));
    }
    // Despite a perfect record, the disqualified fencer ranks last.
    let ranked = ranked_fencer_ids(&mut t, StandingsScope::Overall);
    assert_eq!(*ranked.last().unwrap(), dq);

    revoke_disqualification(&mut t, dq).unwrap();
    let ranked = ranked_fencer_ids(&mut t, StandingsScope::Overall);
    assert_eq!(ranked[0], dq);
}

#[test]
fn simulation_completes_the_whole_round_consistently() {
    let mut t = tournament(6);
    simulate_current(&mut t).unwrap();
    assert_eq!(t.matches_left(), 0);
    for f in &t.fencers {
        assert_eq!(f.overall.matches, 5);
        assert!(f.statistics_consistent());
    }
}
