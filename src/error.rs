use thiserror::Error;

/// Unified error type for version computation
#[derive(Error, Debug)]
pub enum GitVersionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: '{input}' {reason}")]
    VersionParse { input: String, reason: String },

    #[error("Pattern error in '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Version calculation failed: {0}")]
    Calculation(#[source] Box<GitVersionError>),
}

/// Convenience type alias for Results in git-semver
pub type Result<T> = std::result::Result<T, GitVersionError>;

impl GitVersionError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitVersionError::Config(msg.into())
    }

    /// Create a version parse error for the offending input
    pub fn version_parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        GitVersionError::VersionParse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a pattern error carrying the template and a diagnostic
    pub fn pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        GitVersionError::Pattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Wrap any failure of the build pipeline.
    ///
    /// Already wrapped errors are returned unchanged so callers never see
    /// nested calculation failures.
    pub fn calculation(cause: GitVersionError) -> Self {
        match cause {
            GitVersionError::Calculation(_) => cause,
            other => GitVersionError::Calculation(Box::new(other)),
        }
    }
}
