//! Parsed-action control endpoints.
//!
//! The SOAP/SSDP runtime is out of scope; these routes are the
//! "already-parsed action request" boundary. The Browse action takes its
//! argument names straight from the protocol (`ObjectID`, `BrowseFlag`,
//! …) and returns the filled response fields (`Result`,
//! `NumberReturned`, `TotalMatches`, `UpdateID`).

use crate::browse::{self, BrowseFlag, BrowseRequest, BrowseResponse};
use crate::mime;
use crate::server::{error_response, AppContext};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use dircast_common::{Error, Result};
use serde::Deserialize;
use serde_json::json;

pub fn control_routes() -> Router<AppContext> {
    Router::new()
        .route("/content-directory", post(browse_action))
        .route(
            "/content-directory/search-capabilities",
            get(search_capabilities),
        )
        .route(
            "/content-directory/sort-capabilities",
            get(sort_capabilities),
        )
        .route("/content-directory/system-update-id", get(system_update_id))
        .route("/connection-manager/protocol-info", get(protocol_info))
        .route("/connection-manager/connection-ids", get(connection_ids))
        .route("/connection-manager/connection-info", get(connection_info))
}

/// Browse action arguments as they arrive from a control point.
#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    #[serde(rename = "ObjectID", default = "default_object_id")]
    object_id: String,
    #[serde(rename = "BrowseFlag")]
    browse_flag: String,
    #[serde(rename = "StartingIndex", default)]
    starting_index: u32,
    #[serde(rename = "RequestedCount", default)]
    requested_count: u32,
    #[serde(rename = "SortCriteria", default)]
    sort_criteria: String,
    #[serde(rename = "Filter", default)]
    filter: String,
}

fn default_object_id() -> String {
    "0".to_string()
}

/// Validate the raw arguments into a typed request.
///
/// Argument validation happens before any catalog access: a bogus
/// BrowseFlag or ObjectID fails without a lookup.
fn parse_browse(params: &BrowseParams) -> Result<BrowseRequest> {
    let flag: BrowseFlag = params.browse_flag.parse()?;
    let object_id: u32 = params
        .object_id
        .parse()
        .map_err(|_| Error::invalid_argument(format!("bad ObjectID: {:?}", params.object_id)))?;

    Ok(BrowseRequest {
        object_id,
        flag,
        starting_index: params.starting_index,
        requested_count: params.requested_count,
        sort_criteria: params.sort_criteria.clone(),
        filter: params.filter.clone(),
    })
}

async fn browse_action(
    State(ctx): State<AppContext>,
    Json(params): Json<BrowseParams>,
) -> std::result::Result<Json<BrowseResponse>, (StatusCode, String)> {
    let req = parse_browse(&params).map_err(error_response)?;

    let snapshot = ctx
        .state
        .snapshot()
        .ok_or_else(|| error_response(Error::no_such_object(req.object_id)))?;

    browse::browse(&snapshot, &req)
        .map(Json)
        .map_err(error_response)
}

async fn search_capabilities() -> Json<serde_json::Value> {
    Json(json!({ "SearchCaps": "" }))
}

async fn sort_capabilities() -> Json<serde_json::Value> {
    Json(json!({ "SortCaps": "" }))
}

async fn system_update_id() -> Json<serde_json::Value> {
    Json(json!({ "Id": "0" }))
}

async fn protocol_info() -> Json<serde_json::Value> {
    Json(json!({
        "Source": mime::protocol_list().join(","),
        "Sink": "",
    }))
}

async fn connection_ids() -> Json<serde_json::Value> {
    Json(json!({ "ConnectionIDs": "" }))
}

async fn connection_info() -> Json<serde_json::Value> {
    Json(json!({
        "ConnectionID": 0,
        "RcsID": -1,
        "AVTransportID": -1,
        "ProtocolInfo": mime::protocol_list().join(","),
        "PeerConnectionManager": "",
        "PeerConnectionID": -1,
        "Direction": "Output",
        "Status": "OK",
    }))
}
