// Domain module: problem model, provider contract and validation

pub mod config;
pub mod context;
pub mod models;
pub mod provider;
pub mod validation;
pub mod value_objects;

pub use config::*;
pub use context::*;
pub use models::*;
pub use provider::*;
pub use value_objects::*;
