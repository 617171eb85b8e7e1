//! OpenAI 兼容的 chat completions 客户端，用于生成穿衣建议

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{read_success_body, ClothingAdvisor};
use crate::config::SuggestConfig;
use crate::error::RelayError;
use crate::forecast::DayPoint;

/// 发送给模型的固定指令，后接 JSON 序列化的单日预报
pub const CLOTHING_PROMPT: &str = "Based on the following weather forecast for one day, \
suggest what clothes to wear. Answer only with a comma-separated list of clothing items \
and no additional text. Weather: ";

pub struct OpenAiAdvisor {
    url: String,
    api_key: String,
    model: String,
    http: Client,
}

impl OpenAiAdvisor {
    pub fn new(config: &SuggestConfig, http: Client) -> Self {
        Self {
            url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            http,
        }
    }

    fn request_body(&self, weather: &DayPoint) -> Result<Value, RelayError> {
        let weather = serde_json::to_string(weather)
            .map_err(|e| RelayError::MalformedResponse(e.to_string()))?;

        Ok(json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": format!("{CLOTHING_PROMPT}{weather}"),
                }
            ]
        }))
    }
}

/// 提取 `choices[0].message.content`
fn first_completion(response: &Value) -> Result<String, RelayError> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| RelayError::MalformedResponse("missing choices[0].message.content".into()))
}

#[async_trait]
impl ClothingAdvisor for OpenAiAdvisor {
    async fn suggest_clothing(&self, weather: &DayPoint) -> Result<String, RelayError> {
        let body = self.request_body(weather)?;
        tracing::debug!(model = %self.model, "suggestion request");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let text = read_success_body(response, "suggest").await?;
        let parsed: Value =
            serde_json::from_str(&text).map_err(|e| RelayError::MalformedResponse(e.to_string()))?;

        first_completion(&parsed)
    }
}
