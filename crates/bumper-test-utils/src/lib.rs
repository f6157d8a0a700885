//! Shared test utilities for the bumper workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: sample project files in each supported format
//! - [`project`]: [`TestProject`] temporary directory with file helpers

pub mod fixtures;
pub mod project;

pub use project::TestProject;
