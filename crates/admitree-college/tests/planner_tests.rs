use std::sync::Arc;

use admitree_college::{
    Catalog, CollegeDomain, PlanAction, PlanState, Planner, PlannerConfig, PlannerError,
    SatPercentileTable, School, Student,
};
use admitree_core::{IterationBudget, PlanningDomain, SearchConfig, Tree};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn sat_table() -> SatPercentileTable {
    SatPercentileTable::new((400..=1600).step_by(10).map(|score| (score, (score - 400) / 12)))
        .expect("valid table")
}

fn domain() -> CollegeDomain {
    CollegeDomain::new(sat_table(), PlannerConfig::default()).expect("valid domain")
}

fn state(schools: Vec<School>) -> PlanState {
    PlanState::new(
        Student::new(1550, 3.9, 0.99),
        Arc::new(Catalog::new(schools).expect("catalog")),
    )
}

/// Rollouts end at once, so every root child is valued by its own state.
fn settled_search() -> SearchConfig {
    SearchConfig {
        early_stop_probability: 1.0,
        ..SearchConfig::default()
    }
}

fn planner(schools: Vec<School>, seed: u64) -> Planner {
    Planner::new(
        Catalog::new(schools).expect("catalog"),
        sat_table(),
        PlannerConfig::default(),
        seed,
    )
    .expect("planner")
}

#[test]
fn available_actions_follow_catalog_order_then_stop() {
    let mut skipped = School::new("Skipped", 40.0, 10);
    skipped.applying = false;
    let state = state(vec![
        School::new("B", 40.0, 10),
        skipped,
        School::new("A", 20.0, 30),
    ]);

    assert_eq!(
        domain().available_actions(&state),
        vec![
            PlanAction::Work("B".to_string()),
            PlanAction::Work("A".to_string()),
            PlanAction::Stop,
        ]
    );
}

#[test]
fn working_records_a_projected_checkpoint_on_a_copy() {
    let domain = domain();
    let state = state(vec![School::new("A", 20.0, 30)]);

    let work = PlanAction::Work("A".to_string());
    assert_eq!(work.school(), Some("A"));

    let (next, cost) = domain.apply_action(&state, &work).expect("apply");

    assert_eq!(cost, 2.0);
    assert_eq!(next.student.hours_invested("A"), 2.0);
    assert_eq!(next.student.essay_score("A"), Some(800.0));
    assert!(state.student.history("A").is_empty());
    assert!(Arc::ptr_eq(&state.schools, &next.schools));
}

#[test]
fn stop_leaves_the_state_unchanged() {
    let domain = domain();
    let state = state(vec![School::new("A", 20.0, 30)]);

    assert_eq!(PlanAction::Stop.school(), None);
    let (next, cost) = domain.apply_action(&state, &PlanAction::Stop).expect("apply");
    assert_eq!(cost, 0.0);
    assert_eq!(next.student, state.student);
}

#[test]
fn school_is_dropped_once_its_hour_cap_is_reached() {
    let domain = domain();
    let work = PlanAction::Work("A".to_string());
    let state = state(vec![School::new("A", 20.0, 30)]);

    let (once, _) = domain.apply_action(&state, &work).expect("apply");
    assert_eq!(domain.available_actions(&once), vec![PlanAction::Stop]);

    let (twice, _) = domain.apply_action(&once, &work).expect("apply");
    assert_eq!(twice.student.hours_invested("A"), 4.0);
    assert_eq!(twice.student.history("A").len(), 2);
    assert_eq!(twice.student.essay_score("A"), Some(814.0));
    assert_eq!(domain.available_actions(&twice), vec![PlanAction::Stop]);
}

#[test]
fn working_on_an_unknown_school_fails() {
    let domain = domain();
    let state = state(vec![School::new("A", 20.0, 30)]);

    let err = domain
        .apply_action(&state, &PlanAction::Work("Z".to_string()))
        .expect_err("unknown school");
    assert!(matches!(err, PlannerError::UnknownSchool { ref name } if name == "Z"));
}

#[test]
fn certain_admissions_give_exact_expected_reward() {
    let domain = domain();
    let state = state(vec![
        School::new("Sure", 100.0, 100),
        School::new("Also", 100.0, 50),
        School::new("Never", 0.0, 1000),
    ]);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let value = domain.expected_reward(&state, 4.0, &mut rng).expect("reward");
    assert!((value - (100.0 + 0.1 * 50.0 - 2.0)).abs() < 1e-9);
}

#[test]
fn recommends_work_when_an_essay_moves_the_odds() {
    let mut planner = planner(vec![School::new("Midtown", 50.0, 100)], 11);
    let student = Student::new(1550, 3.9, 0.99);
    let mut budget = IterationBudget::new(20);

    let recommendation = planner
        .recommend_with_budget(&student, &settled_search(), &mut budget)
        .expect("search");

    assert_eq!(recommendation.action, PlanAction::Work("Midtown".to_string()));
    assert_eq!(recommendation.root_children.len(), 2);
    assert_eq!(recommendation.metrics.iterations_completed, 20);
    assert_eq!(recommendation.tree.nodes[0].visits, 20);
}

#[test]
fn stops_when_extra_work_cannot_change_admissions() {
    let mut planner = planner(
        vec![
            School::new("Reach", 0.0, 500),
            School::new("Safety", 100.0, 10),
        ],
        5,
    );
    let student = Student::new(1200, 3.5, 0.6);
    let mut budget = IterationBudget::new(40);

    let recommendation = planner
        .recommend_with_budget(&student, &settled_search(), &mut budget)
        .expect("search");

    assert_eq!(recommendation.action, PlanAction::Stop);
    // Safety is certain and Reach is closed, so any work only costs time.
    for child in &recommendation.root_children {
        if child.action == PlanAction::Stop {
            assert!((child.average_reward - 10.0).abs() < 1e-9);
        } else {
            assert!(child.average_reward <= 9.0 + 1e-9);
        }
    }
}

#[test]
fn highly_selective_single_school_is_either_worked_or_skipped() {
    let mut planner = planner(vec![School::new("Ivy", 5.0, 100)], 42);
    let student = Student::new(1550, 4.0, 0.99);
    let mut budget = IterationBudget::new(25);

    let recommendation = planner
        .recommend_with_budget(&student, &SearchConfig::default(), &mut budget)
        .expect("search");

    assert!(
        matches!(recommendation.action, PlanAction::Stop)
            || matches!(recommendation.action, PlanAction::Work(ref name) if name == "Ivy")
    );
}

#[test]
fn nothing_to_apply_to_means_stop_without_search() {
    let mut closed = School::new("Closed", 30.0, 80);
    closed.applying = false;
    let mut planner = planner(vec![closed], 1);
    let mut budget = IterationBudget::new(10);

    let student = Student::new(1300, 3.7, 0.8);

    let recommendation = planner
        .recommend_with_budget(&student, &SearchConfig::default(), &mut budget)
        .expect("search");

    assert_eq!(recommendation.action, PlanAction::Stop);
    assert_eq!(recommendation.metrics.expansions, 0);
    assert_eq!(recommendation.metrics.iterations_completed, 0);
    assert!(recommendation.root_children.is_empty());
}

#[test]
fn same_seed_gives_same_statistics() {
    let schools = || {
        vec![
            School::new("North", 25.0, 80),
            School::new("South", 60.0, 40),
        ]
    };
    let student = Student::new(1400, 3.8, 0.9);
    let search = SearchConfig::default();

    let run = |seed| {
        let mut planner = planner(schools(), seed);
        let mut budget = IterationBudget::new(30);
        planner
            .recommend_with_budget(&student, &search, &mut budget)
            .expect("search")
    };

    let first = run(9);
    let second = run(9);
    assert_eq!(first.action, second.action);
    assert_eq!(first.root_children, second.root_children);
}

#[test]
fn invalid_students_are_rejected_before_search() {
    let mut planner = planner(vec![School::new("A", 30.0, 10)], 1);
    let mut budget = IterationBudget::new(10);
    let search = SearchConfig::default();

    let err = planner
        .recommend_with_budget(&Student::new(1555, 3.0, 0.5), &search, &mut budget)
        .expect_err("sat not in table");
    assert!(matches!(err, PlannerError::SatScoreNotInTable { score: 1555 }));

    let err = planner
        .recommend_with_budget(&Student::new(1500, 3.0, 1.5), &search, &mut budget)
        .expect_err("gpa percentile out of range");
    assert!(matches!(err, PlannerError::InvalidPercentile { field: "gpa_percentile", .. }));
}

#[test_log::test]
fn wall_clock_recommendation_finishes() {
    let mut planner = planner(vec![School::new("A", 30.0, 10)], 2);
    let search = SearchConfig {
        time_limit_secs: 0.05,
        ..SearchConfig::default()
    };

    let recommendation = planner
        .recommend(&Student::new(1300, 3.5, 0.7), &search)
        .expect("search");
    assert!(recommendation.tree.node_count >= 1);
}

#[test]
fn stop_child_rollout_still_works_on_open_schools() {
    let domain = domain();
    let mut tree = Tree::new(&domain, state(vec![School::new("Mid", 50.0, 100)]));
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let search = SearchConfig {
        early_stop_probability: 0.0,
        ..SearchConfig::default()
    };
    let mut rollouts = Vec::new();

    tree.search_with_hook(
        &domain,
        &search,
        &mut IterationBudget::new(2),
        &mut rng,
        |iteration| rollouts.push((iteration.leaf, iteration.rollout_steps)),
    )
    .expect("search");

    let (stop_leaf, steps) = rollouts[1];
    let stop = tree.node(stop_leaf).expect("stop node");
    assert_eq!(stop.action(), Some(&PlanAction::Stop));
    assert!(stop.is_terminal());
    assert_eq!(steps, 1);

    // The work child has nothing left to do besides stopping.
    assert_eq!(rollouts[0].1, 0);
}

#[test]
fn unseeded_planner_recommends_an_available_action() {
    let mut planner = Planner::unseeded(
        Catalog::new(vec![School::new("A", 40.0, 20)]).expect("catalog"),
        sat_table(),
        PlannerConfig::default(),
    )
    .expect("planner");
    let mut budget = IterationBudget::new(10);

    let recommendation = planner
        .recommend_with_budget(&Student::new(1400, 3.6, 0.85), &settled_search(), &mut budget)
        .expect("search");

    assert!(matches!(recommendation.action.school(), None | Some("A")));
    assert_eq!(recommendation.metrics.iterations_completed, 10);
}
