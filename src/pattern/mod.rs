//! Version templates
//!
//! A template mixes plain characters with `${...}` placeholders:
//!
//! - `${v}` the base version, `${M}`/`${m}`/`${p}` its numbers and
//!   `${M+}`/`${m+}`/`${p+}` the numbers plus one
//! - `${meta.NAME}` a value of the computation's metadata registry
//! - `${env.NAME}` an environment variable
//! - `${sys.NAME}` a configured system property
//!
//! A placeholder may carry a modifier: `${pre:NAME}` always emits `pre`,
//! `${pre~NAME}` emits `pre` only when the value is not empty, and
//! `${<NAME}` picks a separator automatically (`.` inside the numeric
//! triple, `-` before the first qualifier, `.` after it).
//!
//! Templates are parsed once into [Template] and evaluated against a
//! [PatternContext]; the expansion must be a valid [crate::domain::Version].

pub mod evaluator;
pub mod parser;

pub use evaluator::{evaluate, expand, PatternContext};
pub use parser::{parse, Modifier, Placeholder, Segment, Source, Template};

use crate::domain::Version;
use crate::error::Result;

/// Default template off a release tag
pub const DEFAULT_VERSION_PATTERN: &str = "${v}${<meta.COMMIT_DISTANCE}${<meta.GIT_SHA1_8}";

/// Default template on a clean annotated version tag
pub const DEFAULT_TAG_VERSION_PATTERN: &str = "${v}${<meta.QUALIFIED_BRANCH_NAME}";

/// Parse and evaluate `template` in one step
pub fn render(template: &str, context: &PatternContext<'_>) -> Result<Version> {
    evaluate(&parse(template)?, context)
}
