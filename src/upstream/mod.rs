//! 上游客户端抽象层
//!
//! 天气数据源和穿衣建议都通过 trait 注入到 `AppState`，
//! 生产环境使用 Visual Crossing 和 OpenAI 兼容接口。

pub mod openai;
pub mod visual_crossing;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::error::RelayError;
use crate::forecast::DayPoint;

pub use openai::OpenAiAdvisor;
pub use visual_crossing::VisualCrossingClient;

/// 查询的日期范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSelector {
    /// 指定日期（ISO 格式，原样传给上游）
    Date(String),
    /// 未来 10 天
    Next10Days,
}

impl RangeSelector {
    pub fn as_path_segment(&self) -> &str {
        match self {
            RangeSelector::Date(date) => date,
            RangeSelector::Next10Days => "next10days",
        }
    }
}

/// 上游返回的数据粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Include {
    Hours,
    Days,
}

impl Include {
    pub fn as_str(&self) -> &'static str {
        match self {
            Include::Hours => "hours",
            Include::Days => "days",
        }
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 天气数据源
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// 拉取预报，返回未经修改的上游 JSON
    async fn fetch_forecast(
        &self,
        location: &str,
        range: &RangeSelector,
        include: Include,
    ) -> Result<Value, RelayError>;
}

/// 穿衣建议
#[async_trait]
pub trait ClothingAdvisor: Send + Sync {
    /// 根据单日预报返回逗号分隔的衣物列表（模型原文）
    async fn suggest_clothing(&self, weather: &DayPoint) -> Result<String, RelayError>;
}

/// 创建上游 HTTP 客户端
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

/// 读取响应体；非 2xx 时把状态码和原始响应体包装为 `RelayError::Upstream`
async fn read_success_body(response: reqwest::Response, upstream: &str) -> Result<String, RelayError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(upstream, status = status.as_u16(), "upstream returned an error");
        return Err(RelayError::upstream(status, body));
    }

    Ok(body)
}
