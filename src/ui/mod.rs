//! User interface module - output and error display.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Writing to the terminal

pub mod formatter;

pub use formatter::{error_message, metadata_line, NO_VALUE};

/// Print each line to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}
