// prefs.rs: decompression preferences shared by the file-level API.
//
// `Prefs` is a plain value type: the CLI builds one from defaults, the
// environment and its flags, then hands it by reference to every operation.

use crate::config::{effective_workers, NB_WORKERS_DEFAULT, WINDOW_BITS_DEFAULT};

/// Options controlling file-level decompression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefs {
    /// Window size exponent handed to every engine (`8..=15`).
    pub window_bits: i32,
    /// Replace existing output files instead of refusing.
    pub overwrite: bool,
    /// Decode and discard: verify integrity without writing output.
    pub test_mode: bool,
    /// Files decompressed concurrently; `0` = one per logical core.
    pub nb_workers: usize,
    /// Give outputs the input's modification time and permissions.
    pub keep_file_times: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Prefs {
            window_bits: WINDOW_BITS_DEFAULT,
            overwrite: false,
            test_mode: false,
            nb_workers: NB_WORKERS_DEFAULT,
            keep_file_times: true,
        }
    }
}

impl Prefs {
    pub fn set_window_bits(&mut self, bits: i32) -> i32 {
        self.window_bits = bits;
        self.window_bits
    }

    pub fn set_overwrite(&mut self, yes: bool) -> bool {
        self.overwrite = yes;
        self.overwrite
    }

    pub fn set_test_mode(&mut self, yes: bool) -> bool {
        self.test_mode = yes;
        self.test_mode
    }

    /// Store the requested worker count, resolved and clamped.
    pub fn set_nb_workers(&mut self, n: usize) -> usize {
        self.nb_workers = effective_workers(n);
        self.nb_workers
    }
}
