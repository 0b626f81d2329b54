// Infrastructure: Server setup and configuration
// Single Responsibility: Manage server lifecycle and configuration

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use tonic::transport::Server;

use crate::application::mappers::optdispatch::optimization_dispatch_server::OptimizationDispatchServer;
use crate::application::{Dispatcher, GrpcDispatchService};
use crate::domain::{ConstraintBackend, ProviderConfig};
use crate::solver::CapabilityRegistry;

pub const DEFAULT_ADDRESS: &str = "0.0.0.0:50051";

const ADDR_VAR: &str = "OPTDISPATCH_ADDR";
const TIMEOUT_VAR: &str = "OPTDISPATCH_DEFAULT_TIMEOUT_MS";
const KNAPSACK_BUDGET_VAR: &str = "OPTDISPATCH_KNAPSACK_BUDGET_MB";
const AUCTION_THRESHOLD_VAR: &str = "OPTDISPATCH_AUCTION_THRESHOLD";
const RELABEL_INTERVAL_VAR: &str = "OPTDISPATCH_GLOBAL_RELABEL_INTERVAL";
const CONSTRAINT_BACKEND_VAR: &str = "OPTDISPATCH_CONSTRAINT_BACKEND";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServerConfigError {
    #[error("{name}={value} is not valid: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: SocketAddr,
    /// Deadline applied to requests that carry none
    pub default_timeout: Option<Duration>,
    pub providers: ProviderConfig,
}

impl ServerConfig {
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            default_timeout: None,
            providers: ProviderConfig::default(),
        }
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn with_providers(mut self, providers: ProviderConfig) -> Self {
        self.providers = providers;
        self
    }

    /// Read the configuration from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ServerConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable lookup; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let address = lookup(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let address = parse_var(ADDR_VAR, &address)?;

        let mut config = Self::new(address);
        let mut providers = ProviderConfig::default();

        if let Some(value) = lookup(TIMEOUT_VAR) {
            let millis: u64 = parse_var(TIMEOUT_VAR, &value)?;
            if millis > 0 {
                config.default_timeout = Some(Duration::from_millis(millis));
            }
        }
        if let Some(value) = lookup(KNAPSACK_BUDGET_VAR) {
            let megabytes: usize = parse_var(KNAPSACK_BUDGET_VAR, &value)?;
            let bytes = megabytes
                .checked_mul(1024 * 1024)
                .ok_or_else(|| invalid(KNAPSACK_BUDGET_VAR, &value, "budget overflows usize"))?;
            providers = providers.with_knapsack_memory_budget(bytes);
        }
        if let Some(value) = lookup(AUCTION_THRESHOLD_VAR) {
            providers = providers.with_auction_threshold(parse_var(AUCTION_THRESHOLD_VAR, &value)?);
        }
        if let Some(value) = lookup(RELABEL_INTERVAL_VAR) {
            providers =
                providers.with_global_relabel_interval(parse_var(RELABEL_INTERVAL_VAR, &value)?);
        }
        if let Some(value) = lookup(CONSTRAINT_BACKEND_VAR) {
            let backend = ConstraintBackend::from_name(&value)
                .ok_or_else(|| invalid(CONSTRAINT_BACKEND_VAR, &value, "unknown backend"))?;
            providers = providers.with_constraint_backend(backend);
        }

        config.providers = providers;
        Ok(config)
    }
}

fn invalid(name: &'static str, value: &str, reason: impl Into<String>) -> ServerConfigError {
    ServerConfigError::InvalidVar {
        name,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_var<T>(name: &'static str, value: &str) -> Result<T, ServerConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(name, value, e.to_string()))
}

pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(CapabilityRegistry::with_defaults(&config.providers)?);
    let dispatcher = Dispatcher::new(registry);

    print_banner(&config, &dispatcher);

    let service = GrpcDispatchService::new(dispatcher, config.default_timeout);
    Server::builder()
        .add_service(OptimizationDispatchServer::new(service))
        .serve(config.address)
        .await?;

    Ok(())
}

fn print_banner(config: &ServerConfig, dispatcher: &Dispatcher) {
    info!("optdispatch listening on {}", config.address);
    match config.default_timeout {
        Some(timeout) => info!("default request deadline: {:?}", timeout),
        None => info!("requests without a deadline run to completion"),
    }
    for capability in dispatcher.capabilities() {
        info!(
            "  {:<24} {:<32} {}",
            capability.id,
            capability.provider,
            if capability.enabled { "enabled" } else { "disabled" }
        );
    }
}
