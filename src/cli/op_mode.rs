//! Operation mode selection and startup defaults for the CLI.
//!
//! - [`OpMode`]: what the CLI should do with its inputs.
//! - [`init_window_bits`] / [`init_nb_workers`]: read per-process defaults
//!   from environment variables, falling back to [`crate::config`].

use crate::cli::constants::display_level;
use crate::config::{
    ENV_NBWORKERS, ENV_WINDOW_BITS, NB_WORKERS_DEFAULT, WINDOW_BITS_DEFAULT, WINDOW_BITS_MAX,
    WINDOW_BITS_MIN,
};

/// What the CLI should do with its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    /// Decompress each input to its output.
    Decompress,
    /// Decode each input and discard the output, reporting integrity only.
    Test,
}

fn warn_ignored(name: &str, value: &str, why: &str) {
    if display_level() >= 2 {
        eprintln!("Ignore environment variable setting {}={}: {} ", name, value, why);
    }
}

/// Read the default window size exponent from `INFBACK_WINDOW_BITS`.
pub fn init_window_bits() -> i32 {
    init_window_bits_from(std::env::var(ENV_WINDOW_BITS).ok().as_deref())
}

/// Testable core of [`init_window_bits`]: parse an optional raw value.
///
/// Values outside `8..=15`, or not numeric, are ignored with a warning.
pub fn init_window_bits_from(env_val: Option<&str>) -> i32 {
    if let Some(env) = env_val {
        match env.trim().parse::<i32>() {
            Ok(bits) if (WINDOW_BITS_MIN..=WINDOW_BITS_MAX).contains(&bits) => return bits,
            Ok(_) => warn_ignored(ENV_WINDOW_BITS, env, "outside 8-15"),
            Err(_) => warn_ignored(ENV_WINDOW_BITS, env, "not a valid unsigned value"),
        }
    }
    WINDOW_BITS_DEFAULT
}

/// Read the number of worker threads from `INFBACK_NBWORKERS`.
pub fn init_nb_workers() -> usize {
    init_nb_workers_from(std::env::var(ENV_NBWORKERS).ok().as_deref())
}

/// Testable core of [`init_nb_workers`]: parse an optional raw value.
///
/// Pass `None` to simulate the variable being unset.  A non-numeric value is
/// ignored with a warning and [`NB_WORKERS_DEFAULT`] (`0`, auto) is returned.
pub fn init_nb_workers_from(env_val: Option<&str>) -> usize {
    if let Some(env) = env_val {
        match env.trim().parse::<usize>() {
            Ok(n) => return n,
            Err(_) => warn_ignored(ENV_NBWORKERS, env, "not a valid unsigned value"),
        }
    }
    NB_WORKERS_DEFAULT
}
