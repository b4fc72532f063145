//! # lib_sicap
//!
//! Blocking client for the public JSON API of the Romanian e-procurement
//! portal (SICAP, `e-licitatie.ro`).
//!
//! ```no_run
//! use lib_sicap::{ClientOptions, Overrides, SicapClient};
//! use serde_json::json;
//!
//! let client = SicapClient::new(ClientOptions::default())?;
//! let mut filters = Overrides::new();
//! filters.insert("pageSize".into(), json!(50));
//! let response = client.get_ca_notice_list(filters)?;
//! if response.is_ok() {
//!     let notices: serde_json::Value = response.json()?;
//!     println!("{}", notices["total"]);
//! }
//! # Ok::<(), lib_sicap::SicapError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod configs;
pub mod error;
pub mod loggers;
pub mod portal;
pub mod retrieve;
pub mod utils;

pub use configs::client_options::{ClientOptions, Timeouts};
pub use error::{Result, SicapError};
pub use portal::client::SicapClient;
pub use portal::cpv::{CpvSource, CpvTable};
pub use portal::defaults::{Endpoint, Overrides};
pub use portal::phases::ProcedurePhase;
pub use retrieve::http::{HttpResponse, ReqwestTransport, Transport};
pub use retrieve::retry::RetryPolicy;
pub use utils::dates::{date_iso, date_parsed, parse_date, yesterday, ParsedDate};
