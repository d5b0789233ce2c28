//! Pure formatting functions for UI output.
//!
//! Everything here returns strings; printing happens in the parent module.

use crate::domain::Metadata;

/// Placeholder printed for a metadata key without a value
pub const NO_VALUE: &str = "No value found";

/// Format one `NAME=value` line.
///
/// # Arguments
/// * `key` - The metadata key
/// * `value` - Its value, `None` when the computation produced none
pub fn metadata_line(key: Metadata, value: Option<&str>) -> String {
    format!("{}={}", key, value.unwrap_or(NO_VALUE))
}

/// Format an error and its chain of causes, outermost first.
pub fn error_message(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
