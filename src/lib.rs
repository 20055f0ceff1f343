pub mod api;
pub mod cli;
pub mod core;
pub mod report;
pub mod store;
pub mod telemetry;
