// Environment-variable defaults, parsed from explicit values.

use infback::cli::op_mode::{init_nb_workers_from, init_window_bits_from};
use infback::config::{NB_WORKERS_DEFAULT, WINDOW_BITS_DEFAULT};

#[test]
fn window_bits_bounds() {
    assert_eq!(init_window_bits_from(Some("8")), 8);
    assert_eq!(init_window_bits_from(Some("15")), 15);
    assert_eq!(init_window_bits_from(Some("-3")), WINDOW_BITS_DEFAULT);
    assert_eq!(init_window_bits_from(Some("")), WINDOW_BITS_DEFAULT);
}

#[test]
fn worker_count_passes_through_unclamped() {
    // Clamping happens when the count reaches the preferences.
    assert_eq!(init_nb_workers_from(Some("0")), 0);
    assert_eq!(init_nb_workers_from(Some("500")), 500);
    assert_eq!(init_nb_workers_from(Some("-1")), NB_WORKERS_DEFAULT);
}
