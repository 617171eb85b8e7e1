//! 请求级错误
//!
//! 每种错误对应一个确定的 HTTP 状态码，响应体统一为 `{ "message": ..., ... }`。

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// 请求体为空、不是合法 JSON 或不是对象
    #[error("{0}")]
    InvalidBody(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} must be a string")]
    InvalidField(&'static str),

    #[error("wrong API token")]
    Unauthorized,

    /// 上游返回非 2xx，响应体原样透传
    #[error("{body}")]
    Upstream { status: StatusCode, body: String },

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("upstream request failed: {0}")]
    Transport(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidBody(_)
            | RelayError::MissingField(_)
            | RelayError::InvalidField(_) => StatusCode::BAD_REQUEST,
            RelayError::Unauthorized => StatusCode::FORBIDDEN,
            RelayError::Upstream { status, .. } => *status,
            RelayError::MalformedResponse(_) | RelayError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn body(&self) -> Value {
        let mut body = json!({ "message": self.to_string() });
        if let RelayError::MissingField(field) | RelayError::InvalidField(field) = self {
            body["field"] = json!(field);
        }
        body
    }

    /// 由上游的状态码和响应体构造错误
    ///
    /// 非错误状态码（例如 3xx）无法作为错误状态返回给调用方，统一映射为 502
    pub fn upstream(status: reqwest::StatusCode, body: String) -> Self {
        let status = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::BAD_GATEWAY
        };
        RelayError::Upstream { status, body }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RelayError::MalformedResponse(err.to_string())
        } else {
            RelayError::Transport(err.to_string())
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            RelayError::MissingField("token").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RelayError::Unauthorized.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            RelayError::MalformedResponse("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            RelayError::upstream(StatusCode::TOO_MANY_REQUESTS, String::new()).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn non_error_upstream_status_becomes_bad_gateway() {
        let err = RelayError::upstream(StatusCode::MOVED_PERMANENTLY, "moved".into());
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "moved");
    }

    #[test]
    fn missing_field_body_names_the_field() {
        let body = RelayError::MissingField("location").body();
        assert_eq!(body["message"], "location is required");
        assert_eq!(body["field"], "location");
    }

    #[test]
    fn upstream_body_is_verbatim() {
        let body = RelayError::upstream(StatusCode::BAD_REQUEST, "Invalid location".into()).body();
        assert_eq!(body, json!({ "message": "Invalid location" }));
    }
}
