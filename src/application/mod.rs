// Application layer: dispatch facade and, behind `server`, the gRPC service

pub mod dispatch;

#[cfg(feature = "server")]
pub mod grpc_service;
#[cfg(feature = "server")]
pub mod mappers;

pub use dispatch::Dispatcher;

#[cfg(feature = "server")]
pub use grpc_service::GrpcDispatchService;
