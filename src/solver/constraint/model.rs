// Linear / mixed-integer program decoded from the opaque constraint payload

use crate::domain::{ConstraintBackend, Error, ProblemFamily, Result};
use serde::Deserialize;
use std::time::Duration;

const FAMILY: ProblemFamily = ProblemFamily::GenericConstraint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    #[default]
    Minimize,
    Maximize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    #[default]
    Continuous,
    Integer,
    Binary,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct VariableSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: VariableKind,
    /// Defaults to 0
    #[serde(default)]
    pub lower: Option<f64>,
    /// Defaults to +inf (1 for binaries)
    #[serde(default)]
    pub upper: Option<f64>,
}

impl VariableSpec {
    pub fn bounds(&self) -> (f64, f64) {
        match self.kind {
            VariableKind::Binary => (
                self.lower.unwrap_or(0.0).max(0.0),
                self.upper.unwrap_or(1.0).min(1.0),
            ),
            _ => (
                self.lower.unwrap_or(0.0),
                self.upper.unwrap_or(f64::INFINITY),
            ),
        }
    }

    pub fn is_integral(&self) -> bool {
        !matches!(self.kind, VariableKind::Continuous)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    #[serde(alias = "<=")]
    Le,
    #[serde(alias = "=", alias = "==")]
    Eq,
    #[serde(alias = ">=")]
    Ge,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConstraintSpec {
    #[serde(default)]
    pub name: String,
    pub coefficients: Vec<f64>,
    pub comparison: Comparison,
    pub bound: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearProgram {
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub sense: Sense,
    /// Empty means one continuous non-negative variable per objective coefficient
    #[serde(default)]
    pub variables: Vec<VariableSpec>,
    pub objective: Vec<f64>,
    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,
    #[serde(default)]
    pub time_limit_seconds: Option<f64>,
}

impl LinearProgram {
    /// Decode and check a constraint payload.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self> {
        let program: LinearProgram = serde_json::from_value(payload.clone())
            .map_err(|e| Error::invalid_input(FAMILY, format!("malformed constraint payload: {}", e)))?;
        program.validate()?;
        Ok(program)
    }

    pub fn num_variables(&self) -> usize {
        if self.variables.is_empty() {
            self.objective.len()
        } else {
            self.variables.len()
        }
    }

    pub fn variable(&self, index: usize) -> VariableSpec {
        self.variables.get(index).cloned().unwrap_or_default()
    }

    pub fn num_integral(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integral()).count()
    }

    /// Backend requested by the payload, if any
    pub fn backend(&self) -> Result<Option<ConstraintBackend>> {
        match &self.backend {
            None => Ok(None),
            Some(name) => ConstraintBackend::from_name(name).map(Some).ok_or_else(|| {
                Error::invalid_input(FAMILY, format!("unknown constraint backend '{}'", name))
            }),
        }
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .zip(values)
            .map(|(c, x)| c * x)
            .sum()
    }

    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        let n = self.num_variables();

        if !self.variables.is_empty() && self.objective.len() != self.variables.len() {
            errors.push(format!(
                "{} objective coefficients for {} variables",
                self.objective.len(),
                self.variables.len()
            ));
        }
        if self.objective.iter().any(|c| !c.is_finite()) {
            errors.push("objective coefficients must be finite".to_string());
        }
        for (i, variable) in self.variables.iter().enumerate() {
            let (lower, upper) = variable.bounds();
            if lower.is_nan() || upper.is_nan() || lower > upper {
                errors.push(format!("variable {} has empty bounds [{}, {}]", i, lower, upper));
            }
        }
        for (i, constraint) in self.constraints.iter().enumerate() {
            if constraint.coefficients.len() > n {
                errors.push(format!(
                    "constraint {} has {} coefficients for {} variables",
                    i,
                    constraint.coefficients.len(),
                    n
                ));
            }
            if !constraint.bound.is_finite() || constraint.coefficients.iter().any(|c| !c.is_finite()) {
                errors.push(format!("constraint {} must be finite", i));
            }
        }
        if let Some(limit) = self.time_limit_seconds {
            if !(limit.is_finite() && limit > 0.0) {
                errors.push(format!("time limit {} must be positive", limit));
            } else if Duration::try_from_secs_f64(limit).is_err() {
                errors.push(format!("time limit {} is out of range", limit));
            }
        }
        if let Err(e) = self.backend() {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::invalid_input(FAMILY, errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_full_payload_decodes() {
        let payload = json!({
            "backend": "cbc",
            "sense": "maximize",
            "variables": [
                { "name": "x", "kind": "integer", "upper": 10.0 },
                { "name": "y", "kind": "binary" }
            ],
            "objective": [3.0, 2.0],
            "constraints": [
                { "coefficients": [1.0, 1.0], "comparison": "<=", "bound": 4.0 },
                { "name": "floor", "coefficients": [1.0], "comparison": "ge", "bound": 1.0 }
            ],
            "time_limit_seconds": 5.0
        });
        let program = LinearProgram::from_payload(&payload).unwrap();
        assert_eq!(program.sense, Sense::Maximize);
        assert_eq!(program.backend().unwrap(), Some(ConstraintBackend::CoinCbc));
        assert_eq!(program.variable(1).bounds(), (0.0, 1.0));
        assert_eq!(program.num_integral(), 2);
        assert_eq!(program.constraints[0].comparison, Comparison::Le);
    }

    #[test]
    fn test_implicit_variables() {
        let program = LinearProgram::from_payload(&json!({ "objective": [1.0, 2.0, 3.0] })).unwrap();
        assert_eq!(program.num_variables(), 3);
        assert_eq!(program.variable(2).bounds(), (0.0, f64::INFINITY));
        assert_eq!(program.objective_value(&[1.0, 1.0, 1.0]), 6.0);
    }

    #[test]
    fn test_inconsistent_payload_rejected() {
        let payload = json!({
            "variables": [{ "lower": 5.0, "upper": 1.0 }],
            "objective": [1.0, 2.0],
            "constraints": [{ "coefficients": [1.0, 1.0, 1.0], "comparison": "eq", "bound": 1.0 }]
        });
        let err = LinearProgram::from_payload(&payload).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("objective coefficients"));
        assert!(text.contains("empty bounds"));
        assert!(text.contains("3 coefficients"));
    }

    #[test]
    fn test_out_of_range_time_limit_rejected() {
        let payload = json!({ "objective": [1.0], "time_limit_seconds": 1e300 });
        let err = LinearProgram::from_payload(&payload).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("out of range"), "{}", err);
    }

    #[test]
    fn test_malformed_payload_rejected() {
        assert!(LinearProgram::from_payload(&json!({ "objective": "max x" })).is_err());
        assert!(LinearProgram::from_payload(&json!({ "objective": [], "backend": "gurobi" })).is_err());
    }
}
