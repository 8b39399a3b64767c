pub mod checker;
pub mod config;
pub mod feed;
pub mod keybox;
pub mod report;
pub mod serial;
pub mod telemetry;
