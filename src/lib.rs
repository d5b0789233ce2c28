pub mod analyzer;
pub mod calculator;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;
pub mod pattern;
pub mod strategy;
pub mod ui;

pub use calculator::GitVersionCalculator;
pub use domain::{Metadata, Version};
pub use error::{GitVersionError, Result};
