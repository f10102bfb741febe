use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::CounterDomain;
use crate::{
    Tree,
    tree::rollout::{RolloutParams, rollout},
};

#[test]
fn never_stopping_early_runs_until_only_stop_remains() {
    let domain = CounterDomain { limit: 3 };
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let result = rollout(
        &domain,
        &0,
        0.0,
        &mut rng,
        RolloutParams {
            early_stop_probability: 0.0,
            max_steps: 64,
        },
    )
    .expect("rollout should succeed");

    assert_eq!(result.steps, 3);
    assert!((result.cost - 3.0).abs() < f64::EPSILON);
    assert!((result.reward - 1.5).abs() < f64::EPSILON);
}

#[test]
fn always_stopping_early_evaluates_the_start_state() {
    let domain = CounterDomain { limit: 3 };
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let result = rollout(
        &domain,
        &1,
        1.0,
        &mut rng,
        RolloutParams {
            early_stop_probability: 1.0,
            max_steps: 64,
        },
    )
    .expect("rollout should succeed");

    assert_eq!(result.steps, 0);
    assert!((result.cost - 1.0).abs() < f64::EPSILON);
    assert!((result.reward - 0.5).abs() < f64::EPSILON);
}

#[test]
fn stop_child_rollout_keeps_acting_on_its_parent_state() {
    let domain = CounterDomain { limit: 2 };
    let mut tree = Tree::new(&domain, 0);
    let root = tree.root_id();
    let _ = tree.expand(&domain, root).expect("expand increment");
    let stop = tree.expand(&domain, root).expect("expand stop");

    let node = tree.node(stop).expect("stop node");
    assert!(node.is_terminal());

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let result = rollout(
        &domain,
        node.state(),
        node.cost(),
        &mut rng,
        RolloutParams {
            early_stop_probability: 0.0,
            max_steps: 64,
        },
    )
    .expect("rollout should succeed");

    assert_eq!(result.steps, 2);
    assert!((result.cost - 2.0).abs() < f64::EPSILON);
    assert!((result.reward - 1.0).abs() < f64::EPSILON);
}

#[test]
fn step_cap_bounds_rollout_length() {
    let domain = CounterDomain { limit: 100 };
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let result = rollout(
        &domain,
        &0,
        0.0,
        &mut rng,
        RolloutParams {
            early_stop_probability: 0.0,
            max_steps: 5,
        },
    )
    .expect("rollout should succeed");

    assert_eq!(result.steps, 5);
}
