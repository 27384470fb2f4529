//! UCT search configuration parameters.

use std::time::Duration;

use engine_core::PlayerId;

use crate::search::SearchError;

/// Exploration constant Cp = 1/sqrt(2), suited to rewards in [0, 1].
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Default wall-clock budget per search.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_millis(1500);

/// Resource limit bounding how long a search may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Run exactly this many select/simulate/backpropagate iterations.
    Iterations(u32),
    /// Keep iterating while the elapsed wall-clock time is under this limit.
    Time(Duration),
}

impl Budget {
    /// Whether another iteration may start.
    ///
    /// Checked before each iteration, so a time budget can be overrun by at
    /// most one iteration.
    #[inline]
    pub fn allows(&self, iterations_done: u32, elapsed: Duration) -> bool {
        match *self {
            Budget::Iterations(limit) => iterations_done < limit,
            Budget::Time(limit) => elapsed < limit,
        }
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget::Time(DEFAULT_TIME_BUDGET)
    }
}

/// How a rollout result is credited to each node on the backpropagation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attribution {
    /// Every node receives the searcher's reward unchanged.
    PassThrough,
    /// A node whose incoming move was made by the searcher receives `delta`;
    /// a node whose incoming move was made by anyone else receives `1 - delta`.
    /// Each player therefore maximizes their own outcome while descending.
    #[default]
    ZeroSum,
}

impl Attribution {
    /// Reward credited to a node whose incoming move was made by `mover`
    /// (None for the root) when `searcher` observed `delta`.
    #[inline]
    pub fn credit(self, delta: f64, mover: Option<PlayerId>, searcher: PlayerId) -> f64 {
        match (self, mover) {
            (Attribution::ZeroSum, Some(player)) if player != searcher => 1.0 - delta,
            _ => delta,
        }
    }
}

/// Rule used to pick the recommended root child once the budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalSelection {
    /// Highest mean reward (UCB1 with zero exploration).
    #[default]
    Exploitation,
    /// Highest visit count.
    MostVisited,
}

/// Configuration for a UCT search.
#[derive(Debug, Clone)]
pub struct UctConfig {
    /// Time or iteration limit per search round.
    pub budget: Budget,

    /// Exploration coefficient used by the tree policy.
    pub exploration: f64,

    /// Reward attribution during backpropagation.
    pub attribution: Attribution,

    /// Rule for the final recommendation.
    pub final_selection: FinalSelection,

    /// Extra budget rounds to run while the exploitation-best root child is
    /// not also the most visited one. 0 disables the check.
    pub robust_extensions: u32,

    /// Abort a rollout that has not reached a terminal state after this many
    /// moves. `None` lets rollouts run to completion.
    pub max_rollout_depth: Option<u32>,
}

impl Default for UctConfig {
    fn default() -> Self {
        Self {
            budget: Budget::default(),
            exploration: DEFAULT_EXPLORATION,
            attribution: Attribution::default(),
            final_selection: FinalSelection::default(),
            robust_extensions: 0,
            max_rollout_depth: None,
        }
    }
}

impl UctConfig {
    /// Create a fast, deterministic config for testing.
    pub fn for_testing() -> Self {
        Self {
            budget: Budget::Iterations(1000),
            ..Self::default()
        }
    }

    /// Builder pattern: set the budget.
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Builder pattern: use an iteration budget.
    pub fn with_iterations(self, n: u32) -> Self {
        self.with_budget(Budget::Iterations(n))
    }

    /// Builder pattern: use a wall-clock budget.
    pub fn with_time_budget(self, limit: Duration) -> Self {
        self.with_budget(Budget::Time(limit))
    }

    /// Builder pattern: set the exploration coefficient.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set reward attribution.
    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = attribution;
        self
    }

    /// Builder pattern: set the final selection rule.
    pub fn with_final_selection(mut self, selection: FinalSelection) -> Self {
        self.final_selection = selection;
        self
    }

    /// Builder pattern: set the number of robust extension rounds.
    pub fn with_robust_extensions(mut self, rounds: u32) -> Self {
        self.robust_extensions = rounds;
        self
    }

    /// Builder pattern: cap rollout length.
    pub fn with_max_rollout_depth(mut self, depth: u32) -> Self {
        self.max_rollout_depth = Some(depth);
        self
    }

    /// Reject configurations the search cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration must be a finite non-negative number, got {}",
                self.exploration
            )));
        }

        if self.max_rollout_depth == Some(0) {
            return Err(SearchError::InvalidConfig(
                "max_rollout_depth must be at least 1 when set".to_string(),
            ));
        }

        Ok(())
    }
}
