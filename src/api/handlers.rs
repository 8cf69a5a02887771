use super::{ApiError, AppState};
use crate::error::PredictError;
use crate::verdict::ThreatVerdict;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::{info, warn};

/// `POST /api/predict`: a non-empty `file_path` routes to capture inference,
/// anything else to the complaint-category fallback. Form-encoded and JSON
/// bodies are both accepted; anything unreadable is an empty object.
pub async fn predict(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ThreatVerdict>, ApiError> {
    let body = read_body(request, &state).await;

    if let Some(file_path) = body.get("file_path").filter(|v| truthy(v)) {
        let Some(raw) = file_path.as_str().map(str::to_owned) else {
            warn!("file_path is not a string");
            return Err(PredictError::InvalidInput(
                "file_path is required and must be a string".to_string(),
            )
            .into());
        };
        let detector = state.detector.clone();
        let outcome = tokio::task::spawn_blocking(move || detector.predict_capture(&raw))
            .await
            .map_err(|e| PredictError::Internal(e.to_string()))
            .and_then(|r| r);
        return match outcome {
            Ok(p) => Ok(Json(p.verdict)),
            Err(e) => {
                warn!(error = %e, "capture prediction failed");
                Err(e.into())
            }
        };
    }

    let complaint_type = ["complaint_type", "complaintType"]
        .iter()
        .filter_map(|k| body.get(*k))
        .find(|v| truthy(v))
        .map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
        .unwrap_or_default();
    let verdict = ThreatVerdict::from_complaint(&complaint_type);
    info!(category = %verdict.category, is_threat = verdict.is_threat, "complaint classified");
    Ok(Json(verdict))
}

async fn read_body(request: Request, state: &AppState) -> Value {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        return match Form::<HashMap<String, String>>::from_request(request, state).await {
            Ok(Form(fields)) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect::<Map<_, _>>(),
            ),
            Err(e) => {
                warn!(error = %e, "form body rejected");
                Value::Null
            }
        };
    }

    match Bytes::from_request(request, state).await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        Err(e) => {
            warn!(error = %e, "request body unreadable");
            Value::Null
        }
    }
}

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// JSON truthiness the way form-style clients send "absent": null, false, 0, "" and empty containers.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
