//! Command-line interface for the `infback` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings, the shared `DISPLAY_LEVEL` atomic, and the display macros. |
//! | [`op_mode`]   | `OpMode` enum and environment-based defaults (`INFBACK_WINDOW_BITS`, `INFBACK_NBWORKERS`). |
//! | [`args`]      | `Cli` (clap derive) and `ParsedArgs`, the validated runtime options. |
//!
//! Typical call sequence: `Cli::parse` → `ParsedArgs::from_cli` → dispatch to the I/O layer.

pub mod constants;
pub mod op_mode;
pub mod args;
