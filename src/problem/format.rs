use owo_colors::OwoColorize;
use std::path::Path;

use crate::language::{CompilationError, LoadingError};

/// Format a compilation error with full details including the offending
/// source line.
pub fn full_compilation_error(error: &CompilationError, filename: &Path, source: &str) -> String {
    let line = error.line_num();
    let code = source
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or("?");
    let width = 3.max(
        line.to_string()
            .len(),
    );

    format!(
        r#"
{}: {}:{} {}

{:width$} {}
{:width$} {} {}
{:width$} {}
        "#,
        "error".bright_red(),
        filename.to_string_lossy(),
        line,
        error
            .message()
            .bold(),
        ' ',
        '|'.bright_blue(),
        line.bright_blue(),
        '|'.bright_blue(),
        code,
        ' ',
        '|'.bright_blue(),
    )
    .trim_ascii()
    .to_string()
}

/// Format a compilation error with concise single-line output.
pub fn concise_compilation_error(error: &CompilationError, filename: &Path) -> String {
    format!(
        "{}: {}:{} {}",
        "error".bright_red(),
        filename.to_string_lossy(),
        error.line_num(),
        error
            .message()
            .bold(),
    )
}

/// Format a LoadingError with concise single-line output.
pub fn concise_loading_error(error: &LoadingError<'_>) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .problem
            .bold()
    )
}
