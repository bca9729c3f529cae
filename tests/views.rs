//! Integration tests for the read-only view layer.

use fencing_tableau::views::{dashboard, fencer_hub, match_list, standings, tableau};
use fencing_tableau::{
    push_score, start_tournament, EliminationMode, Fencer, StandingsScope, Tournament,
    TournamentConfig,
};

fn tournament(n: usize, preliminary_rounds: usize, mode: EliminationMode) -> Tournament {
    let fencers: Vec<Fencer> = (0..n)
        .map(|i| {
            Fencer::new(
                format!("F{i}"),
                Some("Club".into()),
                Some("GER".into()),
                i as u32 + 1,
                preliminary_rounds,
            )
        })
        .collect();
    Tournament::new(
        TournamentConfig {
            name: "Test Cup".into(),
            location: Some("Hall 3".into()),
            preliminary_rounds,
            preliminary_groups: None,
            elimination_mode: mode,
            num_pistes: 2,
            first_elimination_round: None,
        },
        fencers,
    )
    .unwrap()
}

#[test]
fn dashboard_summarizes_the_current_state() {
    let mut t = tournament(4, 1, EliminationMode::Ko);
    start_tournament(&mut t).unwrap();
    let info = dashboard(&t);
    assert_eq!(info.name, "Test Cup");
    assert_eq!(info.location.as_deref(), Some("Hall 3"));
    assert_eq!(info.stage, "Preliminary Round");
    assert_eq!(info.num_fencers, 4);
    assert_eq!(info.num_pistes, 2);
    assert_eq!(info.matches_left, 6);
}

#[test]
fn match_list_labels_unassigned_pistes_as_tba() {
    let mut t = tournament(6, 1, EliminationMode::Ko);
    start_tournament(&mut t).unwrap();
    let rows = match_list(&t);
    assert_eq!(rows.len(), 15);
    // Two pistes: two bouts staged, the rest wait.
    assert_eq!(rows.iter().filter(|r| r.piste != "TBA").count(), 2);
    assert!(rows.iter().all(|r| !r.green.is_empty() && !r.red.is_empty()));
}

#[test]
fn wildcard_bouts_render_with_the_wld_placeholder() {
    let mut t = tournament(5, 0, EliminationMode::Ko);
    start_tournament(&mut t).unwrap();
    let rows = match_list(&t);
    let byes: Vec<_> = rows.iter().filter(|r| r.walkover).collect();
    assert_eq!(byes.len(), 3);
    for row in byes {
        assert_eq!(row.red, "Wildcard");
        assert_eq!(row.red_nationality, "WLD");
        assert_eq!(row.piste, "-");
        assert!(row.completed);
    }
}

#[test]
fn standings_rows_carry_formatted_records() {
    let mut t = tournament(4, 1, EliminationMode::Ko);
    start_tournament(&mut t).unwrap();
    let id = t.bouts[0].id;
    push_score(&mut t, id, 15, 5).unwrap();

    let rows = standings(&mut t, StandingsScope::Overall);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].win_lose, "1 - 0");
    assert_eq!(rows[0].points_difference, "+10");
    assert_eq!(rows[0].win_percentage, 100);
    assert_eq!(rows[3].points_difference, "-10");
}

#[test]
fn fencer_hub_reports_statistics_and_the_next_bout() {
    let mut t = tournament(4, 1, EliminationMode::Ko);
    start_tournament(&mut t).unwrap();
    let id = t.bouts[0].id;
    let green = t.get_bout(id).unwrap().green.fencer_id().unwrap();
    push_score(&mut t, id, 15, 5).unwrap();

    let hub = fencer_hub(&t, green).unwrap();
    assert_eq!(hub.overall.matches, 1);
    assert_eq!(hub.recent_form, vec![true]);
    assert_eq!(hub.group, Some(1));
    // Two more round-robin bouts to fence.
    assert!(hub.next_bout.is_some());
    assert!(!hub.next_bout.unwrap().completed);
}

#[test]
fn tableau_view_groups_bouts_by_round() {
    let mut t = tournament(4, 0, EliminationMode::Ko);
    start_tournament(&mut t).unwrap();
    for id in t.current_bouts().iter().map(|b| b.id).collect::<Vec<_>>() {
        push_score(&mut t, id, 15, 3).unwrap();
    }
    fencing_tableau::next_stage(&mut t).unwrap();

    let rounds = tableau(&t);
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0].stage, "Semi Finals");
    assert_eq!(rounds[0].bouts.len(), 2);
    assert_eq!(rounds[1].stage, "Grand Final");
    assert_eq!(rounds[1].bouts.len(), 2);
}
