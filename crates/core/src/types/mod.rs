//! Core types for Trailmark.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod name;

pub use id::*;
pub use name::{NameError, NameKey};
