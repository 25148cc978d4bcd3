//! JSON endpoints consumed by the sync agents.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use cs_core::protocol::{PublishAck, PublishRequest};
use cs_infra::store::{ClipboardStore, StoreError};

use super::with_store;
use crate::mapper::to_remote_record;

fn reply_json<T: Serialize>(value: &T, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(value), status)
}

/// `POST /clipboard` — append a record.
pub fn publish(
    store: ClipboardStore,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("clipboard")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_store(store))
        .and_then(handle_publish)
}

async fn handle_publish(
    body: PublishRequest,
    store: ClipboardStore,
) -> Result<impl Reply, Rejection> {
    match store.append(&body.device_id, &body.content) {
        Ok(id) => {
            info!(id, device_id = %body.device_id, "stored clipboard record");
            Ok(reply_json(&PublishAck::success(id), StatusCode::OK))
        }
        Err(StoreError::Validation(msg)) => {
            Ok(reply_json(&json!({ "error": msg }), StatusCode::BAD_REQUEST))
        }
        Err(err) => {
            error!(error = %err, "failed to store clipboard record");
            Ok(reply_json(
                &json!({ "error": "internal error" }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// `GET /clipboard/latest?device_id=` — newest record for a device.
pub fn latest(
    store: ClipboardStore,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("clipboard" / "latest")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_store(store))
        .and_then(handle_latest)
}

async fn handle_latest(
    params: HashMap<String, String>,
    store: ClipboardStore,
) -> Result<impl Reply, Rejection> {
    let Some(device_id) = params.get("device_id") else {
        return Ok(reply_json(
            &json!({ "error": "Missing device_id" }),
            StatusCode::BAD_REQUEST,
        ));
    };

    match store.latest_for(device_id) {
        Ok(Some(record)) => Ok(reply_json(&to_remote_record(record), StatusCode::OK)),
        Ok(None) => Ok(reply_json(
            &json!({ "message": "No data found" }),
            StatusCode::NOT_FOUND,
        )),
        Err(StoreError::Validation(msg)) => {
            Ok(reply_json(&json!({ "error": msg }), StatusCode::BAD_REQUEST))
        }
        Err(err) => {
            error!(error = %err, "failed to query latest clipboard record");
            Ok(reply_json(
                &json!({ "error": "internal error" }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// `GET /clipboard/history?device_id=&limit=` — recent records, newest
/// first. Both parameters are optional; the store caps the limit.
pub fn history(
    store: ClipboardStore,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("clipboard" / "history")
        .and(warp::get())
        .and(super::optional_query())
        .and(with_store(store))
        .and_then(handle_history)
}

async fn handle_history(
    params: HashMap<String, String>,
    store: ClipboardStore,
) -> Result<impl Reply, Rejection> {
    let device_id = params.get("device_id").map(String::as_str);
    let limit = match params.get("limit").map(|raw| raw.parse::<i64>()) {
        None => None,
        Some(Ok(limit)) => Some(limit),
        Some(Err(_)) => {
            return Ok(reply_json(
                &json!({ "error": "Invalid limit" }),
                StatusCode::BAD_REQUEST,
            ))
        }
    };

    match store.recent(device_id, limit) {
        Ok(records) => {
            let body: Vec<_> = records.into_iter().map(to_remote_record).collect();
            Ok(reply_json(&body, StatusCode::OK))
        }
        Err(err) => {
            error!(error = %err, "failed to query clipboard history");
            Ok(reply_json(
                &json!({ "error": "internal error" }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}
