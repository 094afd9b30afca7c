pub mod config;
pub mod error;
pub mod import;
pub mod playbook;
pub mod telemetry;
