// Infrastructure: gRPC server and its environment configuration

pub mod server;

pub use server::{start_server, ServerConfig, ServerConfigError};
