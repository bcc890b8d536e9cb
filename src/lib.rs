pub mod aggregation;
pub mod config;
pub mod error;
pub mod render;
pub mod report;
pub mod runner;
pub mod source;
