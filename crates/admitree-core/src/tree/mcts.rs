use std::{
    fmt, fs,
    path::Path,
    time::{Duration, Instant},
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tree::{
    budget::{Budget, Deadline},
    domain::PlanningDomain,
    error::TreeError,
    ids::NodeId,
    rollout::{RolloutParams, rollout},
    search_tree::{ChildSummary, Tree},
};

const DEFAULT_SEARCH_CONFIG_YAML: &str = include_str!("../../config/search.default.yaml");

/// Search configuration for a time-boxed MCTS run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub time_limit_secs: f64,
    pub exploration_weight: f64,
    pub exploitation_weight: f64,
    pub early_stop_probability: f64,
    pub max_rollout_steps: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            time_limit_secs: 30.0,
            exploration_weight: 1.41,
            exploitation_weight: 1.0,
            early_stop_probability: 0.3,
            max_rollout_steps: 256,
        }
    }
}

impl SearchConfig {
    /// Parse a search config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SearchConfigError> {
        let config: SearchConfig = serde_yaml::from_str(yaml).map_err(SearchConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a search config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SearchConfigError> {
        let yaml = fs::read_to_string(path).map_err(SearchConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SEARCH_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, SearchConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), SearchConfigError> {
        if !self.time_limit_secs.is_finite() || self.time_limit_secs < 0.0 {
            return Err(SearchConfigError::Invalid(
                "time_limit_secs must be finite and >= 0".to_string(),
            ));
        }
        if !self.exploration_weight.is_finite() || self.exploration_weight < 0.0 {
            return Err(SearchConfigError::Invalid(
                "exploration_weight must be finite and >= 0".to_string(),
            ));
        }
        if !self.exploitation_weight.is_finite() || self.exploitation_weight < 0.0 {
            return Err(SearchConfigError::Invalid(
                "exploitation_weight must be finite and >= 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.early_stop_probability) {
            return Err(SearchConfigError::Invalid(
                "early_stop_probability must be within [0, 1]".to_string(),
            ));
        }
        if self.max_rollout_steps == 0 {
            return Err(SearchConfigError::Invalid(
                "max_rollout_steps must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Wall-clock deadline starting now and lasting `time_limit_secs`.
    /// Limits too large for a `Duration` never expire; negative or NaN limits expire at once.
    pub fn deadline(&self) -> Deadline {
        let limit = Duration::try_from_secs_f64(self.time_limit_secs.max(0.0))
            .unwrap_or(Duration::MAX);
        Deadline::after(limit)
    }

    fn rollout_params(&self) -> RolloutParams {
        RolloutParams {
            early_stop_probability: self.early_stop_probability,
            max_steps: self.max_rollout_steps,
        }
    }
}

/// Error type for loading and validating `SearchConfig`.
#[derive(Debug)]
pub enum SearchConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for SearchConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            SearchConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            SearchConfigError::Invalid(err) => write!(f, "invalid search config: {err}"),
        }
    }
}

impl std::error::Error for SearchConfigError {}

/// Which loop of the driver produced an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Guaranteed expansion of every root action.
    FirstLayer,
    /// Regular select / expand / rollout / backpropagate iterations.
    Tree,
}

/// Per-iteration metrics emitted by MCTS.
#[derive(Debug, Clone, Copy)]
pub struct IterationMetrics {
    pub phase: SearchPhase,
    pub leaf: NodeId,
    pub depth: u64,
    pub expanded: bool,
    pub rollout_steps: usize,
    pub reward: f64,
}

/// Aggregate metrics for a complete search run.
#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    pub iterations_completed: usize,
    pub first_layer_iterations: usize,
    pub expansions: usize,
    pub reward_sum: f64,
    pub average_reward: f64,
    pub elapsed: Duration,
}

impl RunMetrics {
    fn record(&mut self, metrics: &IterationMetrics) {
        self.iterations_completed += 1;
        if metrics.phase == SearchPhase::FirstLayer {
            self.first_layer_iterations += 1;
        }
        if metrics.expanded {
            self.expansions += 1;
        }
        self.reward_sum += metrics.reward;
        self.average_reward = self.reward_sum / self.iterations_completed as f64;
    }
}

/// Result of a search: the recommended root action plus diagnostics.
#[derive(Debug, Clone)]
pub struct SearchOutcome<A> {
    /// Best root action by average reward, or the stop action if nothing was expanded.
    pub best_action: A,
    pub root_children: Vec<ChildSummary<A>>,
    pub metrics: RunMetrics,
}

impl<S, A> Tree<S, A>
where
    S: Clone,
    A: Clone + PartialEq + fmt::Display,
{
    /// Roll out from `leaf` and backpropagate the reward.
    fn simulate<D, R>(
        &mut self,
        domain: &D,
        leaf: NodeId,
        phase: SearchPhase,
        expanded: bool,
        config: &SearchConfig,
        rng: &mut R,
    ) -> Result<IterationMetrics, D::Error>
    where
        D: PlanningDomain<State = S, Action = A>,
        R: Rng + ?Sized,
    {
        let result = {
            let node = self.node(leaf)?;
            rollout(
                domain,
                node.state(),
                node.cost(),
                rng,
                config.rollout_params(),
            )?
        };
        self.backpropagate(leaf, result.reward)?;

        Ok(IterationMetrics {
            phase,
            leaf,
            depth: self.node(leaf)?.depth(),
            expanded,
            rollout_steps: result.steps,
            reward: result.reward,
        })
    }

    /// Execute one complete MCTS iteration: selection/expansion, rollout, backpropagation.
    pub fn iterate<D, R>(
        &mut self,
        domain: &D,
        config: &SearchConfig,
        rng: &mut R,
    ) -> Result<IterationMetrics, D::Error>
    where
        D: PlanningDomain<State = S, Action = A>,
        R: Rng + ?Sized,
    {
        let policy = self.tree_policy(
            domain,
            config.exploitation_weight,
            config.exploration_weight,
        )?;
        self.simulate(
            domain,
            policy.leaf,
            SearchPhase::Tree,
            policy.expanded,
            config,
            rng,
        )
    }

    /// Expand one untried root action and roll it out.
    fn expand_root<D, R>(
        &mut self,
        domain: &D,
        config: &SearchConfig,
        rng: &mut R,
    ) -> Result<IterationMetrics, D::Error>
    where
        D: PlanningDomain<State = S, Action = A>,
        R: Rng + ?Sized,
    {
        let child = self.expand(domain, self.root_id())?;
        self.simulate(domain, child, SearchPhase::FirstLayer, true, config, rng)
    }

    /// Run a search until the wall-clock deadline of `config` expires.
    pub fn search<D, R>(
        &mut self,
        domain: &D,
        config: &SearchConfig,
        rng: &mut R,
    ) -> Result<SearchOutcome<A>, D::Error>
    where
        D: PlanningDomain<State = S, Action = A>,
        R: Rng + ?Sized,
    {
        let mut deadline = config.deadline();
        self.search_with_hook(domain, config, &mut deadline, rng, |_| {})
    }

    /// Run a search against `budget` and invoke a callback after each completed iteration.
    ///
    /// Every root action is expanded and rolled out once before UCB1 descent
    /// starts. A terminal root returns the stop action without expanding.
    /// An invalid `config` fails with [`TreeError::InvalidConfig`] before anything runs.
    pub fn search_with_hook<D, B, R, FHook>(
        &mut self,
        domain: &D,
        config: &SearchConfig,
        budget: &mut B,
        rng: &mut R,
        mut on_iteration: FHook,
    ) -> Result<SearchOutcome<A>, D::Error>
    where
        D: PlanningDomain<State = S, Action = A>,
        B: Budget + ?Sized,
        R: Rng + ?Sized,
        FHook: FnMut(&IterationMetrics),
    {
        config
            .validate()
            .map_err(|err| TreeError::InvalidConfig {
                reason: err.to_string(),
            })?;

        let started = Instant::now();
        let mut metrics = RunMetrics::default();
        let root = self.root_id();

        if self.node(root)?.is_terminal() {
            log::info!("root state is terminal, nothing to search");
            return Ok(self.outcome(domain, metrics)?);
        }

        while !self.node(root)?.is_fully_expanded() {
            if budget.exhausted() {
                log::info!(
                    "budget exhausted after {} iterations while expanding the first layer",
                    metrics.iterations_completed
                );
                break;
            }
            let iteration = self.expand_root(domain, config, rng)?;
            on_iteration(&iteration);
            metrics.record(&iteration);
        }

        log::info!(
            "first layer holds {} children after {} iterations",
            self.node(root)?.children().len(),
            metrics.iterations_completed
        );

        while !budget.exhausted() {
            let iteration = self.iterate(domain, config, rng)?;
            on_iteration(&iteration);
            metrics.record(&iteration);
        }

        metrics.elapsed = started.elapsed();
        log::info!(
            "search completed: {} iterations in {:.2}s",
            metrics.iterations_completed,
            metrics.elapsed.as_secs_f64()
        );

        Ok(self.outcome(domain, metrics)?)
    }

    fn outcome<D>(&self, domain: &D, metrics: RunMetrics) -> Result<SearchOutcome<A>, TreeError>
    where
        D: PlanningDomain<State = S, Action = A>,
    {
        let root_children = self.root_summaries()?;
        for child in &root_children {
            log::debug!(
                "{}: visits={}, avg_reward={:.2}",
                child.action,
                child.visits,
                child.average_reward
            );
        }

        let best_action = self
            .best_root_action()?
            .unwrap_or_else(|| domain.stop_action());

        Ok(SearchOutcome {
            best_action,
            root_children,
            metrics,
        })
    }
}
