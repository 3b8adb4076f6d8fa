// Argument folding: flags over environment defaults, output selection.

use infback::cli::args::{parse_args_from, EnvDefaults};
use infback::cli::op_mode::OpMode;
use infback::io::{STDIN_MARK, STDOUT_MARK};

const ENV: EnvDefaults = EnvDefaults { window_bits: 12, nb_workers: 2 };

fn parse(args: &[&str]) -> anyhow::Result<infback::cli::args::ParsedArgs> {
    parse_args_from(std::iter::once("infback").chain(args.iter().copied()), ENV)
}

#[test]
fn environment_defaults_apply_without_flags() {
    let a = parse(&["in.deflate"]).unwrap();
    assert_eq!(a.prefs.window_bits, 12);
    assert_eq!(a.prefs.nb_workers, 2);
    assert!(!a.to_stdout);
    assert_eq!(a.output, None);
}

#[test]
fn stdout_flag_with_many_inputs() {
    let a = parse(&["-c", "a.deflate", "b.deflate"]).unwrap();
    assert!(a.to_stdout);
    assert_eq!(a.inputs.len(), 2);
}

#[test]
fn dash_input_reads_stdin_and_writes_stdout() {
    let a = parse(&["-"]).unwrap();
    assert_eq!(a.inputs, vec![STDIN_MARK]);
    assert!(a.to_stdout);
}

#[test]
fn stdin_with_explicit_output_file() {
    let a = parse(&["-o", "result.bin"]).unwrap();
    assert_eq!(a.inputs, vec![STDIN_MARK]);
    assert_eq!(a.output.as_deref(), Some("result.bin"));
    assert!(!a.to_stdout);
}

#[test]
fn conflicting_outputs_are_bad_usage() {
    let err = parse(&["-c", "-o", "file", "in.deflate"]).unwrap_err();
    assert!(err.to_string().starts_with("bad usage: "));
    assert!(parse(&["-c", "-o", "-", "in.deflate"]).is_ok());
    assert_ne!(STDOUT_MARK, "-");
}

#[test]
fn test_mode_selected() {
    let a = parse(&["--test", "x.deflate"]).unwrap();
    assert_eq!(a.op_mode, OpMode::Test);
}

#[test]
fn keep_times_can_be_disabled() {
    assert!(parse(&["a.deflate"]).unwrap().prefs.keep_file_times);
    assert!(!parse(&["--no-keep-times", "a.deflate"]).unwrap().prefs.keep_file_times);
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(parse(&["--frobnicate"]).is_err());
}
