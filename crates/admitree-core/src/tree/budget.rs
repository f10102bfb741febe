use std::time::{Duration, Instant};

/// Decides when a search has to stop.
///
/// Consulted once before every expansion of the first root layer and once
/// before every regular iteration; never inside a rollout.
pub trait Budget {
    fn exhausted(&mut self) -> bool;
}

/// Wall-clock deadline measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    /// Start a deadline that expires `limit` from now.
    pub fn after(limit: Duration) -> Self {
        Deadline {
            started: Instant::now(),
            limit,
        }
    }
}

impl Budget for Deadline {
    fn exhausted(&mut self) -> bool {
        self.started.elapsed() >= self.limit
    }
}

/// Deterministic budget allowing a fixed number of checks to pass.
#[derive(Debug, Clone, Copy)]
pub struct IterationBudget {
    remaining: usize,
}

impl IterationBudget {
    pub fn new(iterations: usize) -> Self {
        IterationBudget {
            remaining: iterations,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Budget for IterationBudget {
    fn exhausted(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }
}
