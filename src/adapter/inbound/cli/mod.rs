//! CLI module graph.

pub mod account;
pub mod command;
pub mod dispatch;
pub mod market;
pub mod output;
pub mod paths;
