//! OpsimNav CLI library.
//!
//! Command handlers, terminal styling and output formatting for the
//! `opsimnav-cli` binary.

pub mod commands;
pub mod output;
pub mod terminal;
