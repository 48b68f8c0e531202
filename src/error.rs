//! Error types for converge-flow.
//!
//! Construction-time mistakes (bad dimensions, malformed bounds) surface as
//! `Error`. Solve-time outcomes are a different thing: per the solvers'
//! contract a completed `solve()` always returns a [`crate::Status`], never
//! an `Err` — infeasibility, unboundedness, and overflow are expected
//! terminal states of the algorithm, not exceptional ones.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a problem or graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Problem has no feasible solution (used by constructors that can
    /// detect infeasibility up front, e.g. unbalanced supplies)
    #[error("infeasible: {0}")]
    Infeasible(String),

    /// Invalid input data
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Dimension mismatch in input
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        got: usize,
    },

    /// Numeric overflow during construction (e.g. scaling costs would not
    /// fit the target integer width)
    #[error("numeric overflow: {0}")]
    Overflow(String),

    /// Algorithm did not converge within an implementation-defined safety
    /// bound; indicates a bug rather than a genuine non-convergence, since
    /// spec.md's iteration bounds are generous (see `simplex`).
    #[error("did not converge after {iterations} iterations")]
    NoConvergence {
        /// Iterations completed
        iterations: usize,
    },

    /// Internal error (bug): an invariant the solver is supposed to
    /// maintain was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an infeasible error
    pub fn infeasible(msg: impl Into<String>) -> Self {
        Self::Infeasible(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, got: usize) -> Self {
        Self::DimensionMismatch { expected, got }
    }

    /// Create an overflow error
    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    /// Create an internal-consistency error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
