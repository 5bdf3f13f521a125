pub mod config;
pub mod error;
pub mod session;
pub mod simulation;
pub mod telemetry;
