//! scanner for the taxscan notation

use std::path::Path;
use tracing::debug;

use crate::language::{FileTaxonomy, LoadingError};
use crate::machine::StateMachine;

pub mod scanner;

pub use scanner::{scan_file, ScanOptions, UnknownPolicy};

/// Read a file and return an owned String. We pass that ownership back to
/// the caller so the taxonomy and its diagnostics can refer to the same
/// source text.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Scan source text into a FileTaxonomy, splitting on newline boundaries.
pub fn scan(content: &str, machine: &dyn StateMachine, options: ScanOptions) -> FileTaxonomy {
    let lines: Vec<&str> = content
        .lines()
        .collect();
    let file = scanner::scan_file(&lines, machine, options);

    if file.is_failed() {
        debug!(
            "errors: {}",
            file.errors
                .len()
        );
    } else {
        let count = file
            .routine
            .instructions
            .len();
        debug!(
            "Found {} instruction{}",
            count,
            if count == 1 { "" } else { "s" }
        );
    }
    file
}
