//! HTTP 请求处理器

pub mod forecast;
pub mod health;

pub use forecast::{handle_daily, handle_hourly, handle_ten_days};
pub use health::handle_health;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// 未匹配路由，保持 `{ "message": ... }` 的错误格式
pub async fn handle_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "not found" })),
    )
}
