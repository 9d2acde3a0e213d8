//! `POST /api`: detection intake.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::{error, warn};

use super::error::{ApiError, ApiResult};
use super::HttpState;
use crate::domain::Detection;

/// Accepted keys per field, checked in order.
pub const NAME_KEYS: &[&str] = &["Name", "name"];
pub const GENERATION_KEYS: &[&str] = &["Generation", "generation"];
pub const JOB_ID_KEYS: &[&str] = &["JobId", "jobId", "job_id"];
pub const RARITY_KEYS: &[&str] = &["Rarity", "rarity"];

const DEFAULT_RARITY: &str = "Unknown";

/// First usable value among `keys`.
///
/// Empty strings, zero, `false` and `null` count as absent so the next alias
/// is tried. Numbers are accepted and rendered as text.
fn lookup(body: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match body.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    })
}

/// Extract a detection from a JSON object, or name the missing fields.
pub fn parse_detection(body: &Map<String, Value>) -> Result<Detection, Vec<&'static str>> {
    let name = lookup(body, NAME_KEYS);
    let generation = lookup(body, GENERATION_KEYS);
    let job_id = lookup(body, JOB_ID_KEYS);

    match (name, generation, job_id) {
        (Some(name), Some(generation), Some(job_id)) => Ok(Detection {
            name,
            generation,
            rarity: lookup(body, RARITY_KEYS).unwrap_or_else(|| DEFAULT_RARITY.to_string()),
            job_id,
        }),
        (name, generation, job_id) => Err([
            (name.is_none(), "name"),
            (generation.is_none(), "generation"),
            (job_id.is_none(), "jobId"),
        ]
        .into_iter()
        .filter_map(|(missing, field)| missing.then_some(field))
        .collect()),
    }
}

pub async fn receive_detection(
    State(state): State<HttpState>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let parsed: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))?;
    let Value::Object(fields) = parsed else {
        return Err(ApiError::bad_request("expected a JSON object"));
    };

    let detection = parse_detection(&fields).map_err(|missing| {
        warn!(missing = ?missing, "Rejected detection with missing fields");
        ApiError::bad_request(format!("missing fields: {}", missing.join(", ")))
    })?;

    state.detections.handle(detection).await.map_err(|e| {
        error!(error = %e, "Detection handling failed");
        ApiError::internal(e.to_string())
    })?;

    Ok(Json(json!({ "status": "OK" })))
}
