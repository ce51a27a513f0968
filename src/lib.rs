pub mod cli;
pub mod commands;
pub mod config;
pub mod event;
pub mod logging;
pub mod report;
pub mod state;
pub mod time;
pub mod utils;

pub use report::Reporter;
pub use state::Aggregator;
