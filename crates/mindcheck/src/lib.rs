pub mod config;
pub mod error;
pub mod surveys;
pub mod telemetry;
