// Capability registry: stable identifiers mapped to providers
// Built once at startup and read-only afterwards, so it can be shared behind an Arc

use crate::domain::{
    capability, ConfigError, Error, ProblemFamily, Provider, ProviderConfig, Result,
};
use crate::solver::{
    AssignmentSolver, ConstraintGateway, KnapsackSolver, MaxFlowSolver, MinCostFlowSolver,
    ShortestPathSolver,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Errors raised while assembling a registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("capability '{0}' is registered twice")]
    DuplicateCapability(String),

    #[error("invalid provider configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// One registered capability
#[derive(Clone)]
pub struct CapabilityEntry {
    pub id: String,
    pub provider: Arc<dyn Provider>,
    /// False when the backing feature was not compiled in
    pub enabled: bool,
}

impl CapabilityEntry {
    pub fn family(&self) -> ProblemFamily {
        self.provider.family()
    }
}

impl std::fmt::Debug for CapabilityEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityEntry")
            .field("id", &self.id)
            .field("family", &self.family())
            .field("provider", &self.provider.name())
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Serializable description of a capability, for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityInfo {
    pub id: String,
    pub family: ProblemFamily,
    pub provider: String,
    pub enabled: bool,
}

#[derive(Debug, Default)]
pub struct CapabilityRegistryBuilder {
    entries: Vec<CapabilityEntry>,
}

impl CapabilityRegistryBuilder {
    pub fn register(self, id: impl Into<String>, provider: Arc<dyn Provider>) -> Self {
        self.register_with_state(id, provider, true)
    }

    pub fn register_disabled(self, id: impl Into<String>, provider: Arc<dyn Provider>) -> Self {
        self.register_with_state(id, provider, false)
    }

    pub fn register_with_state(
        mut self,
        id: impl Into<String>,
        provider: Arc<dyn Provider>,
        enabled: bool,
    ) -> Self {
        self.entries.push(CapabilityEntry {
            id: id.into(),
            provider,
            enabled,
        });
        self
    }

    pub fn build(self) -> std::result::Result<CapabilityRegistry, RegistryError> {
        let mut entries = BTreeMap::new();
        for entry in self.entries {
            if entries.contains_key(&entry.id) {
                return Err(RegistryError::DuplicateCapability(entry.id));
            }
            info!(
                "registered capability '{}' -> {} ({}{})",
                entry.id,
                entry.provider.name(),
                entry.family(),
                if entry.enabled { "" } else { ", disabled" }
            );
            entries.insert(entry.id.clone(), entry);
        }
        Ok(CapabilityRegistry { entries })
    }
}

/// Immutable map from capability id to provider
#[derive(Debug)]
pub struct CapabilityRegistry {
    entries: BTreeMap<String, CapabilityEntry>,
}

impl CapabilityRegistry {
    pub fn builder() -> CapabilityRegistryBuilder {
        CapabilityRegistryBuilder::default()
    }

    /// Every native provider plus the constraint gateway, enabled only when
    /// the `ffi` feature is compiled in.
    pub fn with_defaults(
        config: &ProviderConfig,
    ) -> std::result::Result<CapabilityRegistry, RegistryError> {
        config.validate()?;

        Self::builder()
            .register(
                capability::ASSIGNMENT,
                Arc::new(AssignmentSolver::new(config.assignment.clone())),
            )
            .register(
                capability::KNAPSACK,
                Arc::new(KnapsackSolver::new(config.knapsack.clone())),
            )
            .register(capability::SHORTEST_PATH, Arc::new(ShortestPathSolver::new()))
            .register(
                capability::MAX_FLOW,
                Arc::new(MaxFlowSolver::new(config.flow.clone())),
            )
            .register(capability::MIN_COST_FLOW, Arc::new(MinCostFlowSolver::new()))
            .register_with_state(
                capability::CONSTRAINT,
                Arc::new(ConstraintGateway::new(config.constraint.clone())),
                ConstraintGateway::AVAILABLE,
            )
            .build()
    }

    pub fn get(&self, id: &str) -> Option<&CapabilityEntry> {
        self.entries.get(id)
    }

    /// Enabled provider for `id`, or `UnsupportedCapability`.
    pub fn resolve(&self, id: &str) -> Result<&Arc<dyn Provider>> {
        match self.entries.get(id) {
            Some(entry) if entry.enabled => Ok(&entry.provider),
            Some(_) => Err(Error::unsupported(id, "capability is not compiled into this build")),
            None => Err(Error::unsupported(id, "no provider is registered under this id")),
        }
    }

    /// Capabilities ordered by id
    pub fn capabilities(&self) -> Vec<CapabilityInfo> {
        self.entries
            .values()
            .map(|entry| CapabilityInfo {
                id: entry.id.clone(),
                family: entry.family(),
                provider: entry.provider.name().to_string(),
                enabled: entry.enabled,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[test]
    fn test_defaults_cover_every_family() {
        let registry = CapabilityRegistry::with_defaults(&ProviderConfig::default()).unwrap();
        assert_eq!(registry.len(), ProblemFamily::ALL.len());
        for family in ProblemFamily::ALL {
            let entry = registry.get(family.capability_id()).unwrap();
            assert_eq!(entry.family(), family);
        }
    }

    #[test]
    fn test_unknown_capability_is_unsupported() {
        let registry = CapabilityRegistry::with_defaults(&ProviderConfig::default()).unwrap();
        let err = registry.resolve("optimize.vehicle_routing").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnsupportedCapability);
    }

    #[test]
    fn test_disabled_entry_is_unsupported() {
        let registry = CapabilityRegistry::builder()
            .register_disabled("optimize.knapsack", Arc::new(KnapsackSolver::default()))
            .build()
            .unwrap();
        let err = registry.resolve("optimize.knapsack").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnsupportedCapability);
        assert!(!registry.capabilities()[0].enabled);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let err = CapabilityRegistry::builder()
            .register("optimize.knapsack", Arc::new(KnapsackSolver::default()))
            .register("optimize.knapsack", Arc::new(KnapsackSolver::default()))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateCapability("optimize.knapsack".into()));
    }

    #[test]
    fn test_constraint_entry_tracks_feature() {
        let registry = CapabilityRegistry::with_defaults(&ProviderConfig::default()).unwrap();
        let entry = registry.get(capability::CONSTRAINT).unwrap();
        assert_eq!(entry.enabled, cfg!(feature = "ffi"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ProviderConfig::default().with_knapsack_memory_budget(0);
        assert!(matches!(
            CapabilityRegistry::with_defaults(&config),
            Err(RegistryError::InvalidConfig(ConfigError::ZeroKnapsackBudget))
        ));
    }
}
