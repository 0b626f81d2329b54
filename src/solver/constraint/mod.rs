// Constraint gateway
// Forwards the opaque constraint payload to an external LP/MIP backend. Without
// the `ffi` feature the gateway is a stub that reports UnsupportedCapability.

#[cfg(feature = "ffi")]
pub mod coin_cbc_solver;
#[cfg(feature = "ffi")]
pub mod highs_solver;
#[cfg(feature = "ffi")]
pub mod model;

use crate::domain::{ConstraintConfig, Problem, ProblemFamily, Provider, Result, Solution, SolveContext};

#[cfg(not(feature = "ffi"))]
use crate::domain::{capability, Error};

#[cfg(feature = "ffi")]
use crate::domain::{family_mismatch, ConstraintBackend, SolutionPayload, SolverStatistics};
#[cfg(feature = "ffi")]
use log::{debug, warn};
#[cfg(feature = "ffi")]
use model::LinearProgram;
#[cfg(feature = "ffi")]
use std::time::{Duration, Instant};

pub struct ConstraintGateway {
    #[cfg_attr(not(feature = "ffi"), allow(dead_code))]
    config: ConstraintConfig,
}

impl ConstraintGateway {
    /// Whether an external backend is compiled in
    pub const AVAILABLE: bool = cfg!(feature = "ffi");

    pub fn new(config: ConstraintConfig) -> Self {
        Self { config }
    }
}

impl Default for ConstraintGateway {
    fn default() -> Self {
        Self::new(ConstraintConfig::default())
    }
}

#[cfg(feature = "ffi")]
impl ConstraintGateway {
    fn decode(&self, problem: &Problem) -> Result<LinearProgram> {
        match problem {
            Problem::GenericConstraint(constraint) => LinearProgram::from_payload(&constraint.payload),
            other => Err(family_mismatch(self.family(), other)),
        }
    }

    /// Payload choice first, then the configured default; `Auto` means HiGHS.
    fn backend_for(&self, program: &LinearProgram) -> Result<ConstraintBackend> {
        let backend = program.backend()?.unwrap_or(self.config.default_backend);
        Ok(match backend {
            ConstraintBackend::Auto => ConstraintBackend::Highs,
            other => other,
        })
    }

    /// Tightest of the payload limit, the configured default and the deadline.
    fn time_limit(&self, program: &LinearProgram, ctx: &SolveContext) -> Option<Duration> {
        [
            program
                .time_limit_seconds
                .and_then(|limit| Duration::try_from_secs_f64(limit).ok()),
            self.config.default_time_limit,
            ctx.remaining(),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}

impl Provider for ConstraintGateway {
    #[cfg(feature = "ffi")]
    fn solve(&self, problem: &Problem, ctx: &SolveContext) -> Result<Solution> {
        let program = self.decode(problem)?;
        let backend = self.backend_for(&program)?;
        let time_limit = self.time_limit(&program, ctx);
        ctx.checkpoint(self.family())?;

        debug!(
            "forwarding program with {} variables ({} integral) and {} constraints to {:?}",
            program.num_variables(),
            program.num_integral(),
            program.constraints.len(),
            backend
        );

        let start_time = Instant::now();
        let (name, outcome) = match backend {
            ConstraintBackend::CoinCbc => (
                coin_cbc_solver::NAME,
                coin_cbc_solver::solve(&program, time_limit),
            ),
            _ => (highs_solver::NAME, highs_solver::solve(&program, time_limit)),
        };

        let variable_values = outcome.map_err(|e| {
            warn!("{} backend finished without an optimum: {}", name, e);
            e
        })?;

        let mut statistics = SolverStatistics::new(name, 0);
        statistics.solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        let objective = program.objective_value(&variable_values);
        let payload = SolutionPayload::GenericConstraint {
            backend: name.to_string(),
            variable_values,
        };

        Ok(Solution::optimal(self.family(), Some(objective), payload)
            .with_statistics(statistics)
            .with_message(format!("Optimal solution found by {}", name)))
    }

    #[cfg(not(feature = "ffi"))]
    fn solve(&self, _problem: &Problem, _ctx: &SolveContext) -> Result<Solution> {
        Err(Error::unsupported(
            capability::CONSTRAINT,
            "built without the `ffi` feature",
        ))
    }

    #[cfg(feature = "ffi")]
    fn validate(&self, problem: &Problem) -> Result<()> {
        self.decode(problem).map(|_| ())
    }

    fn family(&self) -> ProblemFamily {
        ProblemFamily::GenericConstraint
    }

    fn name(&self) -> &str {
        if Self::AVAILABLE {
            "external-constraint-gateway"
        } else {
            "unavailable-constraint-gateway"
        }
    }
}
