// Module exports for CLI subcommands
//
// Each module handles one subcommand. main.rs parses arguments, resolves the
// configuration and dispatches to these handlers.

pub mod classes;
pub mod estimate;
pub mod extents;
pub mod report;
