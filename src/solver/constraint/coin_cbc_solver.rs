// COIN-OR CBC backend through good_lp

use super::model::{Comparison, LinearProgram, Sense, VariableKind};
use crate::domain::{Error, ProblemFamily, Result};
use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolverModel, Variable as GoodLpVariable,
};
use std::time::{Duration, Instant};

pub const NAME: &str = "coin_cbc";

const FAMILY: ProblemFamily = ProblemFamily::GenericConstraint;

/// Optimal variable values, in declaration order.
pub fn solve(program: &LinearProgram, time_limit: Option<Duration>) -> Result<Vec<f64>> {
    let start_time = Instant::now();

    let mut vars = variables!();
    let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(program.num_variables());
    for i in 0..program.num_variables() {
        let spec = program.variable(i);
        let (lower, upper) = spec.bounds();
        let var = match spec.kind {
            VariableKind::Binary => vars.add(variable().binary().min(lower).max(upper)),
            VariableKind::Integer => vars.add(variable().integer().min(lower).max(upper)),
            VariableKind::Continuous => vars.add(variable().min(lower).max(upper)),
        };
        lp_variables.push(var);
    }

    let mut objective: Expression = 0.into();
    for (&coeff, &var) in program.objective.iter().zip(&lp_variables) {
        if coeff != 0.0 {
            objective += coeff * var;
        }
    }

    let unsolved = match program.sense {
        Sense::Minimize => vars.minimise(objective),
        Sense::Maximize => vars.maximise(objective),
    };
    let mut lp_model = unsolved.using(coin_cbc::coin_cbc);
    if let Some(limit) = time_limit {
        lp_model.set_parameter("seconds", &format!("{:.3}", limit.as_secs_f64()));
    }

    for constraint in &program.constraints {
        let mut lhs: Expression = 0.into();
        for (&coeff, &var) in constraint.coefficients.iter().zip(&lp_variables) {
            if coeff != 0.0 {
                lhs += coeff * var;
            }
        }

        lp_model = match constraint.comparison {
            Comparison::Le => lp_model.with(lhs.leq(constraint.bound)),
            Comparison::Eq => lp_model.with(lhs.eq(constraint.bound)),
            Comparison::Ge => lp_model.with(lhs.geq(constraint.bound)),
        };
    }

    let result = lp_model.solve();
    // CBC stops on its time limit with the incumbent, which is not proven optimal
    let out_of_time = time_limit.is_some_and(|limit| start_time.elapsed() >= limit);

    match result {
        Ok(_) | Err(ResolutionError::Other(_)) if out_of_time => Err(Error::timed_out(
            FAMILY,
            "CBC reached its time limit before proving optimality",
        )),
        Ok(sol) => Ok(lp_variables.iter().map(|&var| sol.value(var)).collect()),
        Err(ResolutionError::Infeasible) => Err(Error::infeasible(
            FAMILY,
            "no solution satisfies all constraints",
        )),
        Err(ResolutionError::Unbounded) => Err(Error::unbounded(
            FAMILY,
            "objective can be improved without limit",
        )),
        Err(e) => Err(Error::internal(FAMILY, format!("CBC failed: {}", e))),
    }
}
