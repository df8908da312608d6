//! Logging setup: a debug-level file sink plus a stderr sink gated by
//! `--verbose`, grounded in `bin-resolved/src/main.rs::begin_logging`
//! and restating the original Python's `setup_logging` (file always
//! at `DEBUG`, screen level toggled by verbosity).

use std::fs::File;
use std::io::Write as _;
use std::sync::{Arc, Mutex};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

/// Fixed log file path, matching the original Python's `output.log`.
const LOG_FILE_PATH: &str = "output.log";

/// Install a `tracing` subscriber with two layers: a file sink always
/// at `DEBUG`, and a stderr sink at `DEBUG` (if `verbose`) or `WARN`
/// otherwise.
pub fn init(verbose: bool) {
    let file = match File::create(LOG_FILE_PATH) {
        Ok(file) => Arc::new(Mutex::new(file)),
        Err(error) => {
            eprintln!("could not open {LOG_FILE_PATH}: {error}");
            return;
        }
    };

    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(move || WriteGuard(Arc::clone(&file)))
        .with_filter(LevelFilter::DEBUG);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(stderr_level);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

/// A `Write` handle onto the shared log file, so the `fmt` layer can
/// mint one per log line without taking ownership of the file.
struct WriteGuard(Arc<Mutex<File>>);

impl std::io::Write for WriteGuard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log file mutex poisoned").write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().expect("log file mutex poisoned").flush()
    }
}
