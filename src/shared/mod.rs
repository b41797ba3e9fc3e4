//! Shared utilities and common functionality
//!
//! This module contains the component manifest types and the helpers used to publish them.

mod manifest;
mod types;

pub use manifest::write_manifest;
pub use types::*;
