//! 预报数据模型
//!
//! 对外响应的简化结构，以及包装它们的响应信封。

mod shape;

pub use shape::{shape_daily, shape_hourly};

#[cfg(test)]
pub(crate) use shape::fixtures;

use serde::Serialize;

/// 单个小时的天气读数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourPoint {
    pub time: String,
    pub conditions: String,
    pub temp_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub wind_kph: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub pressure_mb: Option<f64>,
    pub uv_index: Option<f64>,
}

/// 单日汇总
///
/// `date` 仅在 assistant 变体下填充
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub conditions: String,
    pub description: String,
    pub temp_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub wind_kph: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub pressure_mb: Option<f64>,
    pub uv_index: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeatherPayload {
    Hours(Vec<HourPoint>),
    Day(DayPoint),
    Days(Vec<DayPoint>),
}

/// 响应信封
#[derive(Debug, Clone, Serialize)]
pub struct ForecastEnvelope {
    /// 响应生成时间（本地时间，ISO-8601，微秒精度）
    pub timestamp: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_name: Option<String>,
    pub weather: WeatherPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_clothes: Option<String>,
}

impl ForecastEnvelope {
    pub fn new(location: String, weather: WeatherPayload) -> Self {
        Self {
            timestamp: local_timestamp(),
            location,
            date: None,
            requester_name: None,
            weather,
            suggested_clothes: None,
        }
    }
}

/// 当前本地时间，形如 `2024-05-01T12:34:56.123456`
pub fn local_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
