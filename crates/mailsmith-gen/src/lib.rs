//! Email generation pipeline.
//!
//! Drives the per-project flow: scaffold a project, run the external site
//! builder, then convert every generated HTML page into an email-safe copy
//! with all CSS inlined.

pub mod generator;
pub mod runner;

pub use generator::{Generator, GenerateError, ToolCommand, ToolConfig};
pub use runner::{CommandRunner, RunError, ShellRunner};
