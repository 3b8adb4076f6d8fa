//! Binary entry point for the `infback` command-line tool.
//!
//! # Control flow
//!
//! 1. [`Cli::parse`] reads `argv`; [`ParsedArgs::from_cli`] folds in the
//!    environment defaults and validates flag combinations.
//! 2. Directory inputs are expanded when `-r` is given.
//! 3. [`run`] dispatches to the I/O layer and returns an exit code.

#[cfg(feature = "recursive")]
use anyhow::Context;
use clap::Parser;

use infback::cli::args::{Cli, EnvDefaults, ParsedArgs};
use infback::cli::constants::{set_display_level, PROGRAM_NAME};
use infback::cli::op_mode::{init_nb_workers, init_window_bits};
use infback::io::{decompress_filename, decompress_multiple_filenames};
use infback::{displaylevel, end_process};

/// Replace directory arguments with the `.deflate` files beneath them.
#[cfg(feature = "recursive")]
fn expand_inputs(inputs: Vec<String>) -> anyhow::Result<Vec<String>> {
    let files = infback::util::create_file_list(&inputs)
        .context("cannot expand directory arguments")?;
    Ok(files
        .into_iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect())
}

#[cfg(not(feature = "recursive"))]
fn expand_inputs(inputs: Vec<String>) -> anyhow::Result<Vec<String>> {
    Ok(inputs)
}

/// Execute the operation selected by argument parsing.
///
/// Returns the process exit code (0 = success, 1 = at least one input failed).
fn run(args: ParsedArgs) -> anyhow::Result<i32> {
    let ParsedArgs {
        prefs,
        op_mode,
        inputs,
        output,
        to_stdout,
        recursive,
        ..
    } = args;

    let inputs = if recursive { expand_inputs(inputs)? } else { inputs };
    if recursive && inputs.is_empty() {
        displaylevel!(1, "{}: no .deflate files found\n", PROGRAM_NAME);
        return Ok(1);
    }

    displaylevel!(
        4,
        "{} v{}: window bits {}, {} worker(s), mode {:?}\n",
        PROGRAM_NAME,
        infback::VERSION_STRING,
        prefs.window_bits,
        prefs.nb_workers,
        op_mode
    );

    if let (Some(dst), [src]) = (output.as_deref(), inputs.as_slice()) {
        return match decompress_filename(src, dst, &prefs) {
            Ok(_) => Ok(0),
            Err(e) => {
                displaylevel!(1, "{}: {}: {}\n", PROGRAM_NAME, src, e);
                Ok(1)
            }
        };
    }

    let failures = decompress_multiple_filenames(&inputs, to_stdout, &prefs);
    if failures > 0 {
        displaylevel!(2, "{} of {} file(s) failed\n", failures, inputs.len());
    }
    Ok(if failures == 0 { 0 } else { 1 })
}

fn main() {
    let env = EnvDefaults {
        window_bits: init_window_bits(),
        nb_workers: init_nb_workers(),
    };
    let args = match ParsedArgs::from_cli(Cli::parse(), env) {
        Ok(a) => a,
        Err(e) => end_process!(1, "{:#}", e),
    };
    set_display_level(args.display_level);

    let code = match run(args) {
        Ok(code) => code,
        Err(e) => end_process!(1, "{:#}", e),
    };
    std::process::exit(code);
}
