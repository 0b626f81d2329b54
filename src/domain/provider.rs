// Domain service interface for solving optimization problems
// Every native algorithm and every external-solver adapter implements this contract

use super::context::SolveContext;
use super::models::{Problem, Solution};
use super::value_objects::{ProblemFamily, SolutionStatus};

/// Error taxonomy shared by every provider
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid {family} input: {reason}")]
    InvalidInput {
        family: ProblemFamily,
        reason: String,
    },

    #[error("{family} problem is infeasible: {reason}")]
    Infeasible {
        family: ProblemFamily,
        reason: String,
    },

    #[error("{family} problem is unbounded: {reason}")]
    Unbounded {
        family: ProblemFamily,
        reason: String,
    },

    #[error("{family} solve timed out: {reason}")]
    TimedOut {
        family: ProblemFamily,
        reason: String,
    },

    #[error("unsupported capability '{capability}': {reason}")]
    UnsupportedCapability { capability: String, reason: String },

    #[error("internal {family} solver error: {reason}")]
    InternalSolverError {
        family: ProblemFamily,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fieldless view of [`Error`] for callers that only switch on the taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Infeasible,
    Unbounded,
    TimedOut,
    UnsupportedCapability,
    InternalSolverError,
}

impl Error {
    pub fn invalid_input(family: ProblemFamily, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            family,
            reason: reason.into(),
        }
    }

    pub fn infeasible(family: ProblemFamily, reason: impl Into<String>) -> Self {
        Self::Infeasible {
            family,
            reason: reason.into(),
        }
    }

    pub fn unbounded(family: ProblemFamily, reason: impl Into<String>) -> Self {
        Self::Unbounded {
            family,
            reason: reason.into(),
        }
    }

    pub fn timed_out(family: ProblemFamily, reason: impl Into<String>) -> Self {
        Self::TimedOut {
            family,
            reason: reason.into(),
        }
    }

    pub fn unsupported(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedCapability {
            capability: capability.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(family: ProblemFamily, reason: impl Into<String>) -> Self {
        Self::InternalSolverError {
            family,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput { .. } => ErrorKind::InvalidInput,
            Error::Infeasible { .. } => ErrorKind::Infeasible,
            Error::Unbounded { .. } => ErrorKind::Unbounded,
            Error::TimedOut { .. } => ErrorKind::TimedOut,
            Error::UnsupportedCapability { .. } => ErrorKind::UnsupportedCapability,
            Error::InternalSolverError { .. } => ErrorKind::InternalSolverError,
        }
    }

    /// Status a [`Solution`] reports for this error.
    ///
    /// Infeasible, unbounded and timed-out outcomes are normal terminal states
    /// of a well-formed solve; everything else is `Error`.
    pub fn status(&self) -> SolutionStatus {
        match self {
            Error::Infeasible { .. } => SolutionStatus::Infeasible,
            Error::Unbounded { .. } => SolutionStatus::Unbounded,
            Error::TimedOut { .. } => SolutionStatus::TimedOut,
            _ => SolutionStatus::Error,
        }
    }
}

impl Solution {
    /// Non-optimal report for a failed or inconclusive solve.
    pub fn from_error(family: ProblemFamily, error: &Error) -> Self {
        Solution::new(family, error.status(), error.to_string())
    }
}

/// Domain service interface for optimization providers
///
/// A provider maps a validated problem of its family to a solution. It
/// holds no mutable state across calls; configuration is fixed when the
/// provider is built and registered.
pub trait Provider: Send + Sync {
    /// Solve a structurally valid problem of [`Provider::family`].
    ///
    /// Infeasible, unbounded and timed-out outcomes may be returned either as
    /// a solution with the matching status or as the matching error.
    fn solve(&self, problem: &Problem, ctx: &SolveContext) -> Result<Solution>;

    /// Provider-specific checks that depend on configuration, run after
    /// structural validation and before any algorithm executes.
    fn validate(&self, _problem: &Problem) -> Result<()> {
        Ok(())
    }

    /// The problem family this provider serves
    fn family(&self) -> ProblemFamily;

    /// Get the name of this provider (algorithm or backend) for logging
    fn name(&self) -> &str;
}

/// Error for a provider handed a problem of another family.
pub fn family_mismatch(expected: ProblemFamily, problem: &Problem) -> Error {
    Error::internal(
        expected,
        format!("provider received a {} problem", problem.family()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_family_and_reason() {
        let err = Error::infeasible(ProblemFamily::ShortestPath, "target 4 is unreachable");
        assert_eq!(
            err.to_string(),
            "shortest-path problem is infeasible: target 4 is unreachable"
        );
        assert_eq!(err.kind(), ErrorKind::Infeasible);
    }

    #[test]
    fn test_error_status_mapping() {
        let timeout = Error::timed_out(ProblemFamily::MinCostFlow, "deadline elapsed");
        assert_eq!(timeout.status(), SolutionStatus::TimedOut);

        let unsupported = Error::unsupported("optimize.tsp", "not registered");
        assert_eq!(unsupported.status(), SolutionStatus::Error);

        let report = Solution::from_error(ProblemFamily::GenericConstraint, &unsupported);
        assert_eq!(report.status, SolutionStatus::Error);
        assert!(report.message.contains("optimize.tsp"));
        assert!(report.payload.is_none());
    }
}
