//! # SICAP Portal Module
//!
//! Everything specific to the `e-licitatie.ro` API: the client, the default
//! payload of each endpoint, the bundled CPV table and the procedure phase
//! ids used by notice filters.

/// Retrying client exposing one method per portal operation.
pub mod client;
/// Bundled CPV code table, loaded lazily by the client.
pub mod cpv;
/// Default request bodies and the shallow override merge.
pub mod defaults;
/// `sysProcedurePhaseId` values and their labels.
pub mod phases;
