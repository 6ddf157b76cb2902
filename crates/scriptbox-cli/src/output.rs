//! Output formatting for CLI responses.
//!
//! Results go to stdout; everything meant for a human goes to stderr.

use scriptbox_types::DiagnosticError;

/// Prints a success message.
pub fn print_success(message: &str) {
    eprintln!("[OK] {message}");
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

/// Prints the cause and fix of an error, when it has them.
pub fn print_diagnostics(error: &dyn DiagnosticError) {
    if let Some(hint) = error.hint() {
        eprintln!("\n  Cause: {hint}");
    }
    if let Some(fix) = error.fix() {
        eprintln!("  Fix:   {fix}\n");
    }
}

/// Echoes a captured script log line.
pub fn print_log(entry: &str) {
    eprintln!("{entry}");
}

/// Prints a JSON document on stdout.
pub fn print_json(value: &serde_json::Value) {
    println!("{value}");
}
