//! Command-line argument parsing for the `infback` binary.
//!
//! [`Cli`] is the raw `clap` surface.  [`ParsedArgs::from_cli`] folds it
//! together with the environment defaults into the validated options the
//! dispatch phase consumes.  Bad combinations return an `Err` whose message
//! begins with `"bad usage: "`.

use anyhow::anyhow;
use clap::{ArgAction, Parser};

use crate::cli::op_mode::OpMode;
use crate::config::{WINDOW_BITS_MAX, WINDOW_BITS_MIN};
use crate::io::file_io::{STDIN_MARK, STDOUT_MARK};
use crate::io::prefs::Prefs;

/// Raw command line.
#[derive(Debug, Parser)]
#[command(
    name = "infback",
    version,
    about = "Decompress raw DEFLATE streams",
    after_help = "With no FILE, or when FILE is -, read standard input and write standard output."
)]
pub struct Cli {
    /// Input files (`x.deflate` decompresses to `x`, anything else to `<name>.out`).
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Write output to FILE (single input only); `-` means standard output.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<String>,

    /// Write all output to standard output.
    #[arg(short = 'c', long = "stdout")]
    pub stdout: bool,

    /// Test integrity: decode and discard the output.
    #[arg(short = 't', long = "test")]
    pub test: bool,

    /// Overwrite existing output files.
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Window size exponent (8-15).  Must be at least the compressor's.
    #[arg(
        short = 'w',
        long = "window-bits",
        value_name = "N",
        value_parser = clap::value_parser!(i32)
            .range(WINDOW_BITS_MIN as i64..=WINDOW_BITS_MAX as i64)
    )]
    pub window_bits: Option<i32>,

    /// Files decompressed in parallel (0 = one per core).
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Recurse into directories, picking up `.deflate` files.
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Keep the output's own timestamps instead of copying the input's.
    #[arg(long = "no-keep-times")]
    pub no_keep_times: bool,

    /// More output (repeatable).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Less output (repeatable).
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,
}

/// Environment-derived defaults that flags override.
#[derive(Debug, Clone, Copy)]
pub struct EnvDefaults {
    pub window_bits: i32,
    pub nb_workers: usize,
}

/// Validated options produced from [`Cli`].
#[derive(Debug)]
pub struct ParsedArgs {
    /// Decompression/IO preferences.
    pub prefs: Prefs,
    /// Resolved operation mode.
    pub op_mode: OpMode,
    /// Input paths; [`STDIN_MARK`] stands for standard input.
    pub inputs: Vec<String>,
    /// Explicit output for a single input.
    pub output: Option<String>,
    /// Send every output to standard output.
    pub to_stdout: bool,
    /// Expand directories among `inputs`.
    pub recursive: bool,
    /// Display level derived from `-v` / `-q`.
    pub display_level: u32,
}

impl ParsedArgs {
    /// Fold `cli` and `env` into validated options.
    pub fn from_cli(cli: Cli, env: EnvDefaults) -> anyhow::Result<ParsedArgs> {
        let display_level = (2 + cli.verbose as u32).saturating_sub(cli.quiet as u32);

        if cli.recursive && !cfg!(feature = "recursive") {
            return Err(anyhow!(
                "bad usage: -r: this build was compiled without recursive directory support"
            ));
        }

        let mut inputs: Vec<String> = cli
            .inputs
            .into_iter()
            .map(|s| if s == "-" { STDIN_MARK.to_owned() } else { s })
            .collect();
        if inputs.is_empty() {
            inputs.push(STDIN_MARK.to_owned());
        }

        let mut output = cli.output.map(|s| if s == "-" { STDOUT_MARK.to_owned() } else { s });
        if output.is_some() && (inputs.len() > 1 || cli.recursive) {
            return Err(anyhow!("bad usage: -o cannot be used with multiple input files"));
        }
        if cli.stdout {
            if output.as_deref().map_or(false, |o| o != STDOUT_MARK) {
                return Err(anyhow!("bad usage: -c and -o name different outputs"));
            }
            output = None;
        }
        if inputs.iter().filter(|s| *s == STDIN_MARK).count() > 1 {
            return Err(anyhow!("bad usage: standard input given more than once"));
        }

        // Standard input has no name to derive an output from.
        let reads_stdin = inputs.iter().any(|s| s == STDIN_MARK);
        let to_stdout = cli.stdout
            || output.as_deref() == Some(STDOUT_MARK)
            || (reads_stdin && output.is_none());
        if to_stdout {
            output = None;
        }

        let mut prefs = Prefs::default();
        prefs.set_window_bits(cli.window_bits.unwrap_or(env.window_bits));
        prefs.set_overwrite(cli.force);
        prefs.set_test_mode(cli.test);
        prefs.set_nb_workers(cli.jobs.unwrap_or(env.nb_workers));
        prefs.keep_file_times = !cli.no_keep_times;

        Ok(ParsedArgs {
            prefs,
            op_mode: if cli.test { OpMode::Test } else { OpMode::Decompress },
            inputs,
            output,
            to_stdout,
            recursive: cli.recursive,
            display_level,
        })
    }
}

/// Parse an explicit argument list (argv[0] included).
///
/// This variant is callable from tests without touching `std::env`.
pub fn parse_args_from<I, T>(argv: I, env: EnvDefaults) -> anyhow::Result<ParsedArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(argv)?;
    ParsedArgs::from_cli(cli, env)
}
