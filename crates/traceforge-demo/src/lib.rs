pub mod config;
pub mod scenarios;

pub use config::DemoConfig;
pub use scenarios::{run_demo, RunSummary};
