//! CSS inlining for email-safe HTML.
//!
//! This crate wraps the `css-inline` library to turn stylesheet-based pages
//! into pages styled entirely through element-level `style` attributes, and
//! reports CSS properties with known-poor support across mail clients.

pub mod compat;
pub mod inliner;

pub use compat::{WarnLevel, Warning};
pub use inliner::{inline_file, inline_html, InlineError, InlineResult};
