//! # Utilities Module
//!
//! Helpers that are not tied to a single endpoint.

/// Portal date format, "yesterday at midnight" and free-text date parsing.
pub mod dates;
