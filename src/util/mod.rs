//! Filesystem helpers for the command-line front end.
//!
//! - [`file_status`]: regular-file / directory checks and timestamp copying
//! - [`file_list`]  : expansion of directory arguments into `.deflate` files

pub mod file_list;
pub mod file_status;

pub use file_list::create_file_list;
pub use file_status::{copy_file_times, is_directory, is_reg_file};
