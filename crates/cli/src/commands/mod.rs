//! CLI subcommands.

pub mod catalog;
pub mod migrate;
