//! # SICAP API Client
//!
//! A dedicated client for the public JSON API behind `e-licitatie.ro`. It owns
//! one long-lived HTTP session, fills in the default payload of each endpoint,
//! merges caller overrides on top, and runs every call except
//! [`SicapClient::get_server_time`] under the fixed [`RetryPolicy`].
//!
//! Responses come back raw: a retry-wrapped method that still sees a non-200
//! after three attempts returns that last [`HttpResponse`], and the caller
//! decides what to do with its status.

use std::sync::OnceLock;

use serde_json::Value;
use tracing::{debug, info};

use crate::configs::client_options::ClientOptions;
use crate::error::Result;
use crate::loggers::init_logging;
use crate::portal::cpv::{CpvSource, CpvTable};
use crate::portal::defaults::{compose, procedure_view_query, to_query_pairs, Endpoint, Overrides};
use crate::retrieve::http::{HttpResponse, ReqwestTransport, Transport};
use crate::retrieve::retry::RetryPolicy;
use crate::utils::dates;

pub const PORTAL_HOST: &str = "e-licitatie.ro";
pub const REFERER: &str = "https://e-licitatie.ro";
pub const CONTENT_TYPE: &str = "application/json;charset=UTF-8";
pub const SERVER_TIME_PATH: &str = "time/getServerTime";

/// Base URL of the API for the chosen scheme.
pub fn base_url(secure: bool) -> String {
    let scheme = if secure { "https" } else { "http" };
    format!("{scheme}://{PORTAL_HOST}/api-pub/")
}

/// # SICAP Client
///
/// Generic over its [`Transport`] so tests and alternative HTTP stacks can
/// stand in for the `reqwest` session. The CPV table is loaded the first time
/// [`SicapClient::cpvs`] is called and kept for the client's lifetime.
pub struct SicapClient<T = ReqwestTransport> {
    transport: T,
    retry: RetryPolicy,
    cpv_source: CpvSource,
    cpvs: OnceLock<CpvTable>,
}

impl SicapClient<ReqwestTransport> {
    /// Opens a session against the live portal.
    ///
    /// Initialises logging from `options.verbose` (unless a subscriber is
    /// already installed) and emits one startup line.
    pub fn new(options: ClientOptions) -> Result<Self> {
        init_logging(options.verbose);
        options.validate()?;

        let timeouts = options.timeouts();
        let transport = ReqwestTransport::new(
            &base_url(options.secure),
            &[("Referer", REFERER), ("Content-Type", CONTENT_TYPE)],
            timeouts.overall(),
            timeouts.connect(),
        )?;

        Ok(Self::with_transport(transport, &options))
    }
}

impl<T: Transport> SicapClient<T> {
    /// Wraps an existing transport. Only `cpv_path` is taken from `options`;
    /// scheme and timeouts belong to the transport.
    pub fn with_transport(transport: T, options: &ClientOptions) -> Self {
        info!(secure = options.secure, "SICAP API client initialized");
        Self {
            transport,
            retry: RetryPolicy::default(),
            cpv_source: options.cpv_source(),
            cpvs: OnceLock::new(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Default body of `endpoint`, as of now.
    pub fn defaults_for(&self, endpoint: Endpoint) -> Overrides {
        endpoint.defaults(dates::now())
    }

    /// The body `endpoint` would be sent with, without sending it.
    pub fn body_for(&self, endpoint: Endpoint, overrides: Overrides) -> Overrides {
        compose(endpoint, dates::now(), overrides)
    }

    /// Server clock as text, e.g. `2023-06-01T00:00:00.000Z`.
    ///
    /// Single attempt. A non-200 answer is an
    /// [`UnexpectedStatus`](crate::error::SicapError::UnexpectedStatus) error.
    pub fn get_server_time(&self) -> Result<String> {
        let response = self.transport.get(SERVER_TIME_PATH, &[])?;
        Ok(response.error_for_status()?.body)
    }

    /// Contract award notices matching the given filters.
    pub fn get_ca_notice_list(&self, overrides: Overrides) -> Result<HttpResponse> {
        self.post(Endpoint::CaNoticeList, overrides)
    }

    /// One contract award notice document.
    pub fn get_ca_notice(&self, ca_notice_id: u64) -> Result<HttpResponse> {
        self.get(&format!("C_PUBLIC_CANotice/get/{ca_notice_id}"), Vec::new())
    }

    /// Contracts awarded within a notice.
    pub fn get_ca_notice_contracts(&self, overrides: Overrides) -> Result<HttpResponse> {
        self.post(Endpoint::CaNoticeContracts, overrides)
    }

    /// Prior information notices.
    pub fn get_public_pi_notice_all(&self, overrides: Overrides) -> Result<HttpResponse> {
        self.post(Endpoint::PublicPiNoticeAll, overrides)
    }

    /// Contract notices. Defaults to open procedures in deliberation.
    pub fn get_c_notice_list(&self, overrides: Overrides) -> Result<HttpResponse> {
        self.post(Endpoint::CNoticeList, overrides)
    }

    pub fn get_da_award_notice_list(&self, overrides: Overrides) -> Result<HttpResponse> {
        self.post(Endpoint::DaAwardNoticeList, overrides)
    }

    pub fn get_public_da_award_notice(&self, da_award_notice_id: u64) -> Result<HttpResponse> {
        self.get(&format!("PublicDAAwardNotice/getView/{da_award_notice_id}"), Vec::new())
    }

    /// Direct acquisitions finalised since yesterday by default.
    pub fn get_direct_acquisition_list(&self, overrides: Overrides) -> Result<HttpResponse> {
        self.post(Endpoint::DirectAcquisitionList, overrides)
    }

    pub fn get_public_direct_acquisition(&self, direct_acquisition_id: u64) -> Result<HttpResponse> {
        self.get(
            &format!("PublicDirectAcquisition/getView/{direct_acquisition_id}"),
            Vec::new(),
        )
    }

    /// Contracting authority profile.
    pub fn get_ca_entity_view(&self, entity_id: u64) -> Result<HttpResponse> {
        self.get(&format!("Entity/getCAEntityView/{entity_id}"), Vec::new())
    }

    /// Supplier profile.
    pub fn get_su_entity_view(&self, entity_id: u64) -> Result<HttpResponse> {
        self.get(&format!("Entity/getSUEntityView/{entity_id}"), Vec::new())
    }

    pub fn get_rfq_invitation_view(&self, rfq_invitation_id: u64) -> Result<HttpResponse> {
        self.get(&format!("RfqInvitation/getView/{rfq_invitation_id}"), Vec::new())
    }

    pub fn get_procedure_reports(&self, procedure_id: u64) -> Result<HttpResponse> {
        self.get(
            "ProcedureReports/GetProcedureReports/",
            vec![("procedureId".to_string(), procedure_id.to_string())],
        )
    }

    pub fn get_procedure_statement_view(&self, procedure_id: u64) -> Result<HttpResponse> {
        self.get(
            "ProcedureStatement/getView/",
            vec![("procedureId".to_string(), procedure_id.to_string())],
        )
    }

    /// Procedure page. Query defaults to `procedureLotId=undefined`.
    pub fn get_procedure_view(&self, procedure_id: u64, overrides: Overrides) -> Result<HttpResponse> {
        let query = to_query_pairs(&procedure_view_query(procedure_id, overrides));
        self.get("ProcedureView/getView/", query)
    }

    /// The CPV table, read from its source on the first call only.
    pub fn cpvs(&self) -> Result<&CpvTable> {
        if let Some(table) = self.cpvs.get() {
            return Ok(table);
        }
        let table = self.cpv_source.load()?;
        debug!(entries = table.len(), source = ?self.cpv_source, "CPV table loaded");
        Ok(self.cpvs.get_or_init(|| table))
    }

    fn post(&self, endpoint: Endpoint, overrides: Overrides) -> Result<HttpResponse> {
        let body = Value::Object(self.body_for(endpoint, overrides));
        let path = endpoint.path();
        self.retry.run(path, || self.transport.post_json(path, &body))
    }

    fn get(&self, path: &str, query: Vec<(String, String)>) -> Result<HttpResponse> {
        self.retry.run(path, || self.transport.get(path, &query))
    }
}

impl<T> Drop for SicapClient<T> {
    fn drop(&mut self) {
        debug!("SICAP API session closed");
    }
}
