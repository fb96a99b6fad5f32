//! CLI library components for csvcheck.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod report;
pub mod summary;
