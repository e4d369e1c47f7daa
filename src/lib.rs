pub mod chart;
pub mod config;
pub mod error;
pub mod hourly;
pub mod output;
pub mod prompt;
pub mod record;
pub mod session;
pub mod source;
pub mod stats;
pub mod summary;
