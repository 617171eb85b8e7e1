//! 预报端点
//!
//! 三个端点遵循相同流程：解析请求体 → 校验 → 调用上游 → 整形 → 包装信封。

use axum::{extract::State, Json};
use bytes::Bytes;

use crate::config::Variant;
use crate::error::RelayError;
use crate::forecast::{shape_daily, shape_hourly, ForecastEnvelope, WeatherPayload};
use crate::gateway::state::AppState;
use crate::upstream::{Include, RangeSelector};
use crate::validate::{parse_body, validate, Field, ForecastRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Hourly,
    Daily,
    TenDays,
}

impl Endpoint {
    fn name(self) -> &'static str {
        match self {
            Endpoint::Hourly => "hourly",
            Endpoint::Daily => "daily",
            Endpoint::TenDays => "10-days",
        }
    }

    /// 本端点的必填字段，按检查顺序
    fn required_fields(self, variant: Variant) -> Vec<Field> {
        let mut fields = vec![Field::Token, Field::Location];
        if self != Endpoint::TenDays {
            fields.push(Field::Date);
        }
        if variant == Variant::Assistant {
            fields.push(Field::RequesterName);
        }
        fields
    }
}

fn accept(state: &AppState, endpoint: Endpoint, body: &[u8]) -> Result<ForecastRequest, RelayError> {
    let body = parse_body(body)?;
    let request = validate(
        &body,
        &endpoint.required_fields(state.variant()),
        state.secret(),
    )?;

    tracing::info!(
        endpoint = endpoint.name(),
        location = %request.location,
        date = request.date.as_deref().unwrap_or("next10days"),
        "forecast request"
    );
    Ok(request)
}

/// 带日期的请求查询该日，否则查询未来 10 天
fn range_of(request: &ForecastRequest) -> RangeSelector {
    match &request.date {
        Some(date) => RangeSelector::Date(date.clone()),
        None => RangeSelector::Next10Days,
    }
}

/// POST /api/v1/hourly
pub async fn handle_hourly(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ForecastEnvelope>, RelayError> {
    let request = accept(&state, Endpoint::Hourly, &body)?;

    let upstream = state
        .weather()
        .fetch_forecast(&request.location, &range_of(&request), Include::Hours)
        .await?;
    let hours = shape_hourly(&upstream)?;

    let mut envelope = ForecastEnvelope::new(request.location, WeatherPayload::Hours(hours));
    envelope.date = request.date;
    envelope.requester_name = request.requester_name;
    Ok(Json(envelope))
}

/// POST /api/v1/daily
///
/// assistant 变体下额外请求一次穿衣建议
pub async fn handle_daily(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ForecastEnvelope>, RelayError> {
    let request = accept(&state, Endpoint::Daily, &body)?;
    let with_date = state.variant() == Variant::Assistant;

    let upstream = state
        .weather()
        .fetch_forecast(&request.location, &range_of(&request), Include::Days)
        .await?;
    let day = shape_daily(&upstream, with_date)?
        .into_iter()
        .next()
        .ok_or_else(|| RelayError::MalformedResponse("no days in forecast".into()))?;

    let suggested_clothes = match state.advisor() {
        Some(advisor) => Some(advisor.suggest_clothing(&day).await?),
        None => None,
    };

    let mut envelope = ForecastEnvelope::new(request.location, WeatherPayload::Day(day));
    envelope.date = request.date;
    envelope.requester_name = request.requester_name;
    envelope.suggested_clothes = suggested_clothes;
    Ok(Json(envelope))
}

/// POST /api/v1/10-days
pub async fn handle_ten_days(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ForecastEnvelope>, RelayError> {
    let request = accept(&state, Endpoint::TenDays, &body)?;
    let with_date = state.variant() == Variant::Assistant;

    let upstream = state
        .weather()
        .fetch_forecast(&request.location, &range_of(&request), Include::Days)
        .await?;
    let days = shape_daily(&upstream, with_date)?;

    let mut envelope = ForecastEnvelope::new(request.location, WeatherPayload::Days(days));
    envelope.requester_name = request.requester_name;
    Ok(Json(envelope))
}
