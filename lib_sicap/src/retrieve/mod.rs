//! # Data Retrieval Module
//!
//! Network plumbing shared by the portal client: the [`http::Transport`] seam
//! with its `reqwest` implementation, and the fixed-backoff
//! [`retry::RetryPolicy`] wrapped around each call.

/// Transport trait, owned response type and the blocking `reqwest` session.
pub mod http;
/// Status-code driven retry loop with a fixed pause between attempts.
pub mod retry;
