pub mod products;
pub mod users;

use crate::error::{self, AppError};
use axum::{extract::rejection::JsonRejection, response::Json};
use serde_json::{json, Value};

/// GET / - liveness probe
pub async fn index() -> Json<Value> {
    Json(json!({ "hello": "world" }))
}

/// Path ids that are not integers cannot match any row.
pub(crate) fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Unwraps the JSON extractor, turning a rejection into a validation failure.
pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> error::Result<Value> {
    body.map(|Json(value)| value).map_err(AppError::from)
}

/// `"true"` is true, any other present value is false.
pub(crate) fn parse_flag(raw: Option<&str>) -> Option<bool> {
    raw.map(|value| value == "true")
}
