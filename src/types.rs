//! Common types shared across the graph substrate and the three solver engines.

use serde::{Deserialize, Serialize};

/// Cost type for optimization problems (signed to allow negative costs).
pub type Cost = i64;

/// Capacity/flow type for a single arc.
pub type Weight = i64;

/// Node or arc index.
pub type Index = usize;

/// Terminal status of a `solve()` call.
///
/// Per the solvers' error-handling contract, this is returned directly by
/// `solve()` rather than wrapped in a `Result` — every variant here is an
/// expected, well-defined outcome of running the algorithm to completion,
/// not an exceptional condition. Construction-time mistakes (malformed
/// input) are reported separately as [`crate::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// The solve succeeded; all result queries are defined.
    Optimal,
    /// MCF only: no flow respects supplies and bounds.
    Infeasible,
    /// MCF only: a negative-cost cycle admits unlimited flow under the
    /// stated bounds.
    Unbounded,
    /// MaxFlow only: the true max flow exceeds the representable `FlowSum`
    /// range. Flows returned are saturated at the overflow sentinel.
    IntOverflow,
    /// MCF EQ supply type only: `sum(supply) != 0`, detected pre-solve.
    Unbalanced,
    /// Cost-scaling MCF only: after integer scaling, a cost would overflow
    /// the internal integer width.
    BadCostRange,
    /// An internal consistency check failed after a solve (debug builds
    /// only). Indicates a bug; the result must not be trusted.
    BadResult,
    /// `solve()` has not been called yet.
    NotSolved,
}

impl Status {
    /// True if the solve produced a usable (if not necessarily optimal)
    /// flow/assignment.
    pub fn has_solution(self) -> bool {
        matches!(self, Self::Optimal | Self::IntOverflow)
    }

    /// True if the solution is proven optimal.
    pub fn is_optimal(self) -> bool {
        matches!(self, Self::Optimal)
    }
}

/// Statistics from a solver run, reported alongside the [`Status`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverStats {
    /// Time spent solving (seconds).
    pub solve_time_seconds: f64,
    /// Pivots (Network Simplex), discharges (MaxFlow), or refine-loop
    /// pushes (cost-scaling) performed.
    pub iterations: usize,
    /// Number of global updates / relabel passes.
    pub relabel_count: usize,
    /// Best objective value found (total cost for MCF, flow value for
    /// MaxFlow).
    pub objective_value: Option<f64>,
}

/// Common solver parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverParams {
    /// Maximum pivots/discharges before giving up with
    /// [`Error::NoConvergence`](crate::Error::NoConvergence) (0 = use the
    /// engine's built-in bound, `max(10^6, n*m)` for Network Simplex per
    /// spec.md §4.6.4).
    pub iteration_limit: usize,
    /// Scaling divisor `alpha` for cost-scaling MCF (spec.md §4.7),
    /// `2..=32`, default 5.
    pub cost_scaling_alpha: u32,
    /// Verbosity passed through to `tracing` span creation (0 = silent).
    pub verbosity: u32,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            iteration_limit: 0,
            cost_scaling_alpha: 5,
            verbosity: 0,
        }
    }
}

impl SolverParams {
    /// True if an explicit iteration limit was set.
    pub fn has_iteration_limit(&self) -> bool {
        self.iteration_limit > 0
    }
}
