//! # Configuration Modules
//!
//! Construction-time configuration for the portal client, loadable from JSON
//! files and `SICAP_*` environment variables.

/// Client options, timeouts and their file/environment loaders.
pub mod client_options;
