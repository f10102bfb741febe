use std::path::PathBuf;

use admitree_college::{Planner, PlannerConfig, load_catalog, load_sat_table, load_student};
use admitree_core::SearchConfig;

fn main() {
    env_logger::init();

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"));
    let time_limit_secs = std::env::args()
        .nth(2)
        .map(|secs| secs.parse::<f64>().expect("time limit must be a number of seconds"))
        .unwrap_or(2.0);
    let seed = std::env::args()
        .nth(3)
        .map(|seed| seed.parse::<u64>().expect("seed must be an unsigned integer"));

    let catalog = load_catalog(data_dir.join("schools.json")).expect("failed to load schools");
    let sat_table =
        load_sat_table(data_dir.join("sat_percentiles.csv")).expect("failed to load SAT table");
    let student = load_student(data_dir.join("student.json")).expect("failed to load student");

    let planner_config = PlannerConfig::from_default_yaml().expect("invalid planner config");
    let search = SearchConfig {
        time_limit_secs,
        ..SearchConfig::from_default_yaml().expect("invalid search config")
    };

    let mut planner = match seed {
        Some(seed) => Planner::new(catalog, sat_table, planner_config, seed),
        None => Planner::unseeded(catalog, sat_table, planner_config),
    }
    .expect("invalid planner inputs");

    let chances = planner
        .domain()
        .admission_chances(&planner.root_state(&student))
        .expect("admission model failed");
    for (school, p) in &chances {
        println!("chance {school}: {:.4}", p);
    }

    let recommendation = planner
        .recommend(&student, &search)
        .expect("search failed");

    for child in &recommendation.root_children {
        println!(
            "{}: visits={} avg_reward={:.2}",
            child.action, child.visits, child.average_reward
        );
    }
    println!(
        "recommendation={} iterations={} nodes={}",
        recommendation.action,
        recommendation.metrics.iterations_completed,
        recommendation.tree.node_count
    );
}
