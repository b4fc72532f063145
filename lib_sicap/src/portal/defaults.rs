//! # Request Defaults
//!
//! Default payloads for every portal operation that takes a body or a query,
//! and the single-level merge that lays caller overrides on top of them.
//!
//! The shapes below are what the portal expects field for field; it rejects or
//! silently ignores anything else. Each call to [`Endpoint::defaults`] builds
//! a brand new map, so nested range objects and lists are never shared
//! between requests.
//!
//! Merging is shallow and unvalidated: an override replaces the whole value
//! under its key (a `{"from": ..}` override drops the default `to`), and keys
//! unknown to the defaults are passed through verbatim.

use chrono::NaiveDateTime;
use serde_json::{json, Map, Value};

use crate::utils::dates::yesterday_from;

/// Caller-supplied partial body or query.
pub type Overrides = Map<String, Value>;

/// Portal operations with a default payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CaNoticeList,
    CaNoticeContracts,
    PublicPiNoticeAll,
    CNoticeList,
    DaAwardNoticeList,
    DirectAcquisitionList,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::CaNoticeList,
        Endpoint::CaNoticeContracts,
        Endpoint::PublicPiNoticeAll,
        Endpoint::CNoticeList,
        Endpoint::DaAwardNoticeList,
        Endpoint::DirectAcquisitionList,
    ];

    /// Path relative to the API base, POSTed with the composed body.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CaNoticeList => "NoticeCommon/GetCANoticeList/",
            Endpoint::CaNoticeContracts => "C_PUBLIC_CANotice/GetCANoticeContracts",
            Endpoint::PublicPiNoticeAll => "PUBLICPINotice/GetAll/",
            Endpoint::CNoticeList => "NoticeCommon/GetCNoticeList/",
            Endpoint::DaAwardNoticeList => "DaAwardNoticeCommon/GetDaAwardNoticeList/",
            Endpoint::DirectAcquisitionList => "DirectAcquisitionCommon/GetDirectAcquisitionList/",
        }
    }

    /// Operation name as the portal's web front end calls it.
    pub fn operation(self) -> &'static str {
        match self {
            Endpoint::CaNoticeList => "getCANoticeList",
            Endpoint::CaNoticeContracts => "getCANoticeContracts",
            Endpoint::PublicPiNoticeAll => "getPUBLICPINoticeAll",
            Endpoint::CNoticeList => "getCNoticeList",
            Endpoint::DaAwardNoticeList => "getDaAwardNoticeList",
            Endpoint::DirectAcquisitionList => "getDirectAcquisitionList",
        }
    }

    /// Fresh default body. `now` anchors the "since yesterday" date filters.
    pub fn defaults(self, now: NaiveDateTime) -> Overrides {
        let body = match self {
            Endpoint::CaNoticeList => json!({
                "sysNoticeTypeIds": [],
                "sortProperties": [],
                "pageSize": 2000,
                "sysNoticeStateId": null,
                "contractingAuthorityId": null,
                "winnerId": null,
                "cPVCategoryId": null,
                "sysContractAssigmentTypeId": null,
                "cPVId": null,
                "assignedUserId": null,
                "sysAcquisitionContractTypeId": null,
                "pageIndex": 0,
                "startPublicationDate": yesterday_from(now),
                "endPublicationDate": null,
            }),
            Endpoint::CaNoticeContracts => json!({
                "caNoticeId": 0,
                "winnerTitle": null,
                "winnerFiscalNumber": null,
                "contractDate": { "from": null, "to": null },
                "contractValue": { "from": null, "to": null },
                "contractMinOffer": { "from": null, "to": null },
                "contractMaxOffer": { "from": null, "to": null },
                "contractTitle": null,
                "lots": null,
                "sortOrder": [],
                "sysContractFrameworkType": {},
                "skip": 0,
                "take": 200,
            }),
            Endpoint::PublicPiNoticeAll => json!({
                "pageIndex": 0,
                "pageSize": 18,
                "sortProperties": [],
                "cpv": null,
            }),
            // sysProcedurePhaseId values are listed in `portal::phases`.
            Endpoint::CNoticeList => json!({
                "sysNoticeTypeIds": [],
                "sortProperties": [],
                "pageSize": 5,
                "hasUnansweredQuestions": false,
                "pageIndex": 0,
                "startTenderReceiptDeadline": null,
                "sysProcedureStateId": 2,
                "sysProcedurePhaseId": 4,
                "startPublicationDate": null,
                "endPublicationDate": null,
            }),
            Endpoint::DaAwardNoticeList => json!({
                "pageSize": 5,
                "pageIndex": 0,
                "sortProperties": [],
                "showOngoingDa": false,
                "cookieContext": null,
                "sysDirectAcquisitionStateId": null,
                "contractingAuthorityId": null,
                "supplierId": null,
                "cpvCategoryId": null,
                "cpvCodeId": null,
                "publicationDateStart": yesterday_from(now),
                "publicationDateEnd": null,
                "finalizationDateStart": null,
                "finalizationDateEnd": null,
            }),
            Endpoint::DirectAcquisitionList => json!({
                "pageSize": 2000,
                "pageIndex": 0,
                "sortProperties": [],
                "showOngoingDa": false,
                "cookieContext": null,
                "sysDirectAcquisitionStateId": null,
                "contractingAuthorityId": null,
                "supplierId": null,
                "cpvCategoryId": null,
                "cpvCodeId": null,
                "publicationDateStart": null,
                "publicationDateEnd": null,
                "finalizationDateStart": yesterday_from(now),
                "finalizationDateEnd": null,
            }),
        };
        object(body)
    }
}

/// Lays `overrides` over `base`, key by key, one level deep.
pub fn merge_overrides(mut base: Overrides, overrides: Overrides) -> Overrides {
    base.extend(overrides);
    base
}

/// Defaults for `endpoint` with `overrides` merged on top.
pub fn compose(endpoint: Endpoint, now: NaiveDateTime, overrides: Overrides) -> Overrides {
    merge_overrides(endpoint.defaults(now), overrides)
}

/// Query for the procedure view page.
pub fn procedure_view_query(procedure_id: u64, overrides: Overrides) -> Overrides {
    let defaults = object(json!({
        "procedureId": procedure_id,
        "procedureLotId": "undefined",
    }));
    merge_overrides(defaults, overrides)
}

/// Renders a flat map as query pairs: strings verbatim, `null` as empty,
/// everything else as its JSON text.
pub fn to_query_pairs(params: &Overrides) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(k, v)| {
            let rendered = match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (k.clone(), rendered)
        })
        .collect()
}

fn object(value: Value) -> Overrides {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
