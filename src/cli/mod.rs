//! Command line workflow behind the `git-semver` binary

pub mod orchestration;

pub use orchestration::{run, RunArgs};
