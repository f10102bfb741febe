use std::sync::Arc;

use admitree_core::{Budget, ChildSummary, RunMetrics, SearchConfig, Tree, TreeSnapshot};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    Catalog, CollegeDomain, PlanAction, PlanState, PlannerConfig, PlannerError,
    SatPercentileTable, Student,
};

#[derive(Debug, Clone)]
/// What to work on next, plus the statistics behind the choice.
pub struct Recommendation {
    pub action: PlanAction,
    /// Root children, highest average reward first.
    pub root_children: Vec<ChildSummary<PlanAction>>,
    pub metrics: RunMetrics,
    pub tree: TreeSnapshot,
}

#[derive(Debug, Clone)]
/// Seeded front end running one search per recommendation.
pub struct Planner {
    domain: CollegeDomain,
    catalog: Arc<Catalog>,
    rng: ChaCha8Rng,
}

impl Planner {
    /// Create a planner with deterministic RNG seed.
    pub fn new(
        catalog: Catalog,
        sat_table: SatPercentileTable,
        config: PlannerConfig,
        seed: u64,
    ) -> Result<Self, PlannerError> {
        Ok(Planner {
            domain: CollegeDomain::new(sat_table, config)?,
            catalog: Arc::new(catalog),
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Create a planner seeded from the thread-local generator.
    pub fn unseeded(
        catalog: Catalog,
        sat_table: SatPercentileTable,
        config: PlannerConfig,
    ) -> Result<Self, PlannerError> {
        Self::new(catalog, sat_table, config, rand::random())
    }

    pub fn domain(&self) -> &CollegeDomain {
        &self.domain
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Root planning state for `student` over this planner's catalog.
    pub fn root_state(&self, student: &Student) -> PlanState {
        PlanState::new(student.clone(), Arc::clone(&self.catalog))
    }

    /// Search until the wall-clock limit of `search` and recommend the best action.
    pub fn recommend(
        &mut self,
        student: &Student,
        search: &SearchConfig,
    ) -> Result<Recommendation, PlannerError> {
        let mut deadline = search.deadline();
        self.recommend_with_budget(student, search, &mut deadline)
    }

    /// Search against an explicit budget and recommend the best action.
    pub fn recommend_with_budget<B: Budget + ?Sized>(
        &mut self,
        student: &Student,
        search: &SearchConfig,
        budget: &mut B,
    ) -> Result<Recommendation, PlannerError> {
        search.validate()?;
        self.domain.validate_student(student)?;

        let mut tree = Tree::new(&self.domain, self.root_state(student));
        let outcome =
            tree.search_with_hook(&self.domain, search, budget, &mut self.rng, |_| {})?;

        log::info!(
            "recommending {} after {} rollouts",
            outcome.best_action,
            outcome.metrics.iterations_completed
        );

        Ok(Recommendation {
            action: outcome.best_action,
            root_children: outcome.root_children,
            metrics: outcome.metrics,
            tree: tree.snapshot(),
        })
    }
}
