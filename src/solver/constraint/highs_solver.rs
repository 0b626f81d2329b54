// HiGHS backend
// Translates a LinearProgram into a HiGHS row problem and maps the model status back

use super::model::{Comparison, LinearProgram, Sense as ProgramSense};
use crate::domain::{Error, ProblemFamily, Result};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Duration;

pub const NAME: &str = "highs";

const FAMILY: ProblemFamily = ProblemFamily::GenericConstraint;

/// Optimal variable values, in declaration order.
pub fn solve(program: &LinearProgram, time_limit: Option<Duration>) -> Result<Vec<f64>> {
    let mut pb = RowProblem::default();
    let mut columns = Vec::with_capacity(program.num_variables());

    for (i, &coeff) in program.objective.iter().enumerate() {
        let variable = program.variable(i);
        let (lower, upper) = variable.bounds();
        let column = if variable.is_integral() {
            pb.add_integer_column(coeff, lower..=upper)
        } else {
            pb.add_column(coeff, lower..=upper)
        };
        columns.push(column);
    }

    for constraint in &program.constraints {
        let terms: Vec<_> = constraint
            .coefficients
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != 0.0)
            .map(|(i, &c)| (columns[i], c))
            .collect();

        match constraint.comparison {
            Comparison::Le => {
                pb.add_row(..=constraint.bound, &terms);
            }
            Comparison::Eq => {
                pb.add_row(constraint.bound..=constraint.bound, &terms);
            }
            Comparison::Ge => {
                pb.add_row(constraint.bound.., &terms);
            }
        }
    }

    let sense = match program.sense {
        ProgramSense::Maximize => Sense::Maximise,
        ProgramSense::Minimize => Sense::Minimise,
    };

    let mut model = pb.optimise(sense);
    if let Some(limit) = time_limit {
        model.set_option("time_limit", limit.as_secs_f64());
    }
    let solved = model.solve();

    match solved.status() {
        HighsModelStatus::Optimal => Ok(solved.get_solution().columns().to_vec()),
        HighsModelStatus::Infeasible => Err(Error::infeasible(
            FAMILY,
            "no solution satisfies all constraints",
        )),
        HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => Err(
            Error::unbounded(FAMILY, "objective can be improved without limit"),
        ),
        HighsModelStatus::ReachedTimeLimit => Err(Error::timed_out(
            FAMILY,
            "HiGHS reached its time limit before proving optimality",
        )),
        status => Err(Error::internal(
            FAMILY,
            format!("HiGHS returned status {:?}", status),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_small_lp() {
        // max x + y  s.t.  x + 2y <= 4, 3x + y <= 6
        let program = LinearProgram::from_payload(&json!({
            "sense": "maximize",
            "objective": [1.0, 1.0],
            "constraints": [
                { "coefficients": [1.0, 2.0], "comparison": "le", "bound": 4.0 },
                { "coefficients": [3.0, 1.0], "comparison": "le", "bound": 6.0 }
            ]
        }))
        .unwrap();
        let values = solve(&program, None).unwrap();
        assert!((program.objective_value(&values) - 2.8).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_lp() {
        let program = LinearProgram::from_payload(&json!({
            "objective": [1.0],
            "constraints": [{ "coefficients": [1.0], "comparison": "ge", "bound": 5.0 }],
            "variables": [{ "upper": 2.0 }]
        }))
        .unwrap();
        assert_eq!(solve(&program, None).unwrap_err().kind(), ErrorKind::Infeasible);
    }
}
