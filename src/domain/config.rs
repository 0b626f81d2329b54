// Provider configuration, fixed when the capability registry is built

use std::time::Duration;

/// A configuration value that no provider can run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("knapsack memory budget must be positive")]
    ZeroKnapsackBudget,

    #[error("global relabel interval must be positive")]
    ZeroRelabelInterval,

    #[error("constraint time limit must be positive")]
    ZeroConstraintTimeLimit,
}

/// Assignment solver selection policy
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentConfig {
    /// Padded matrix size above which integral problems use the ε-scaling auction.
    pub auction_threshold: usize,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            auction_threshold: 256,
        }
    }
}

/// Knapsack resource limits
#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackConfig {
    /// Largest dynamic-programming table the solver may allocate.
    pub memory_budget_bytes: usize,
}

impl Default for KnapsackConfig {
    fn default() -> Self {
        Self {
            memory_budget_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Push-relabel tuning
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowConfig {
    /// Relabel operations between two global relabelings. `None` uses the node count.
    pub global_relabel_interval: Option<usize>,
}

/// Backend choice for the constraint gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstraintBackend {
    /// Let the gateway pick (HiGHS)
    #[default]
    Auto,
    Highs,
    CoinCbc,
}

impl ConstraintBackend {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "auto" => Some(ConstraintBackend::Auto),
            "highs" => Some(ConstraintBackend::Highs),
            "cbc" | "coin_cbc" | "coin-cbc" => Some(ConstraintBackend::CoinCbc),
            _ => None,
        }
    }
}

/// Defaults for requests forwarded to external solvers
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstraintConfig {
    pub default_backend: ConstraintBackend,
    /// Applied when neither the payload nor the solve context sets a limit.
    pub default_time_limit: Option<Duration>,
}

/// Configuration for every registered provider
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProviderConfig {
    pub assignment: AssignmentConfig,
    pub knapsack: KnapsackConfig,
    pub flow: FlowConfig,
    pub constraint: ConstraintConfig,
}

impl ProviderConfig {
    pub fn with_auction_threshold(mut self, threshold: usize) -> Self {
        self.assignment.auction_threshold = threshold;
        self
    }

    pub fn with_knapsack_memory_budget(mut self, bytes: usize) -> Self {
        self.knapsack.memory_budget_bytes = bytes;
        self
    }

    pub fn with_global_relabel_interval(mut self, interval: usize) -> Self {
        self.flow.global_relabel_interval = Some(interval);
        self
    }

    pub fn with_constraint_backend(mut self, backend: ConstraintBackend) -> Self {
        self.constraint.default_backend = backend;
        self
    }

    pub fn with_constraint_time_limit(mut self, limit: Duration) -> Self {
        self.constraint.default_time_limit = Some(limit);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.knapsack.memory_budget_bytes == 0 {
            return Err(ConfigError::ZeroKnapsackBudget);
        }
        if self.flow.global_relabel_interval == Some(0) {
            return Err(ConfigError::ZeroRelabelInterval);
        }
        if self.constraint.default_time_limit == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroConstraintTimeLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProviderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.assignment.auction_threshold, 256);
        assert_eq!(config.knapsack.memory_budget_bytes, 256 * 1024 * 1024);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let config = ProviderConfig::default().with_knapsack_memory_budget(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroKnapsackBudget));
    }

    #[test]
    fn test_zero_relabel_interval_rejected() {
        let config = ProviderConfig::default().with_global_relabel_interval(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroRelabelInterval));
    }

    #[test]
    fn test_zero_constraint_time_limit_rejected() {
        let config = ProviderConfig::default().with_constraint_time_limit(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroConstraintTimeLimit));
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(ConstraintBackend::from_name("HiGHS"), Some(ConstraintBackend::Highs));
        assert_eq!(ConstraintBackend::from_name("cbc"), Some(ConstraintBackend::CoinCbc));
        assert_eq!(ConstraintBackend::from_name("gurobi"), None);
    }
}
