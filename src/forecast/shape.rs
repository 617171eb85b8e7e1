//! 上游 timeline JSON → 简化结构

use serde::Deserialize;
use serde_json::Value;

use super::{DayPoint, HourPoint};
use crate::error::RelayError;

#[derive(Debug, Deserialize)]
struct Timeline {
    days: Vec<UpstreamDay>,
}

#[derive(Debug, Deserialize)]
struct UpstreamDay {
    datetime: String,
    conditions: String,
    description: String,
    #[serde(flatten)]
    readings: Readings,
}

/// 小时预报只需要 `hours`，当天的汇总字段可以缺失
#[derive(Debug, Deserialize)]
struct HourlyDay {
    hours: Option<Vec<UpstreamHour>>,
}

#[derive(Debug, Deserialize)]
struct UpstreamHour {
    datetime: String,
    conditions: String,
    #[serde(flatten)]
    readings: Readings,
}

/// 上游对缺失的读数返回 `null`
#[derive(Debug, Deserialize)]
struct Readings {
    temp: Option<f64>,
    feelslike: Option<f64>,
    windspeed: Option<f64>,
    humidity: Option<f64>,
    precip: Option<f64>,
    pressure: Option<f64>,
    uvindex: Option<f64>,
}

fn timeline(upstream: &Value) -> Result<Timeline, RelayError> {
    Timeline::deserialize(upstream).map_err(|e| RelayError::MalformedResponse(e.to_string()))
}

/// 映射 `days[0].hours[*]`，保持顺序
pub fn shape_hourly(upstream: &Value) -> Result<Vec<HourPoint>, RelayError> {
    let first = upstream
        .pointer("/days/0")
        .ok_or_else(|| RelayError::MalformedResponse("no days in forecast".into()))?;

    let hours = HourlyDay::deserialize(first)
        .map_err(|e| RelayError::MalformedResponse(e.to_string()))?
        .hours
        .ok_or_else(|| RelayError::MalformedResponse("no hours in first day".into()))?;

    Ok(hours
        .into_iter()
        .map(|hour| HourPoint {
            time: hour.datetime,
            conditions: hour.conditions,
            temp_c: hour.readings.temp,
            feels_like_c: hour.readings.feelslike,
            wind_kph: hour.readings.windspeed,
            humidity: hour.readings.humidity,
            precipitation_mm: hour.readings.precip,
            pressure_mb: hour.readings.pressure,
            uv_index: hour.readings.uvindex,
        })
        .collect())
}

/// 映射 `days[*]`，保持顺序
///
/// `with_date` 为 true 时用上游的 `datetime` 填充 `date`
pub fn shape_daily(upstream: &Value, with_date: bool) -> Result<Vec<DayPoint>, RelayError> {
    Ok(timeline(upstream)?
        .days
        .into_iter()
        .map(|day| DayPoint {
            date: with_date.then_some(day.datetime),
            conditions: day.conditions,
            description: day.description,
            temp_c: day.readings.temp,
            feels_like_c: day.readings.feelslike,
            wind_kph: day.readings.windspeed,
            humidity: day.readings.humidity,
            precipitation_mm: day.readings.precip,
            pressure_mb: day.readings.pressure,
            uv_index: day.readings.uvindex,
        })
        .collect())
}
