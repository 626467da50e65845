//! mdeck CLI - Command-line interface library
//!
//! This library provides the CLI functionality for mdeck:
//! - Render: convert a markdown note to a standalone HTML deck
//! - Export: render plus collect referenced images into a portable directory
//!
//! # Binary Usage
//!
//! ```bash
//! # Render a note to HTML on stdout
//! mdeck render talk.md
//!
//! # Render into a file, forcing print-mode layout
//! mdeck render talk.md --output talk.html --print-pdf
//!
//! # Export a portable deck with its images
//! mdeck export talk.md --directory dist/
//! ```

pub mod app;
pub mod config;

// Re-export main entry point and types
pub use app::{export_command, render_command, run_cli};
pub use config::Settings;
