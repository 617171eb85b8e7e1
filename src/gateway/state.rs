//! Gateway 应用状态

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::{Config, Variant};
use crate::upstream::{
    build_http_client, ClothingAdvisor, OpenAiAdvisor, VisualCrossingClient, WeatherSource,
};

/// 变体及其附带的依赖
#[derive(Clone)]
pub enum Mode {
    Basic,
    Assistant(Arc<dyn ClothingAdvisor>),
}

/// Gateway 应用状态
///
/// 启动时构建，之后只读；handler 之间不共享可变状态
#[derive(Clone)]
pub struct AppState {
    secret: Arc<str>,
    weather: Arc<dyn WeatherSource>,
    mode: Mode,
}

impl AppState {
    pub fn new(secret: impl Into<Arc<str>>, weather: Arc<dyn WeatherSource>, mode: Mode) -> Self {
        Self {
            secret: secret.into(),
            weather,
            mode,
        }
    }

    /// 根据配置创建上游客户端
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = build_http_client(config.upstream_timeout)?;
        let weather = Arc::new(VisualCrossingClient::new(&config.weather, http.clone()));

        let mode = match config.variant {
            Variant::Basic => Mode::Basic,
            Variant::Assistant => {
                let suggest = config
                    .suggest
                    .as_ref()
                    .context("The assistant variant needs a suggestion API configuration")?;
                Mode::Assistant(Arc::new(OpenAiAdvisor::new(suggest, http)))
            }
        };

        Ok(Self::new(config.secret.as_str(), weather, mode))
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn weather(&self) -> &dyn WeatherSource {
        self.weather.as_ref()
    }

    pub fn variant(&self) -> Variant {
        match self.mode {
            Mode::Basic => Variant::Basic,
            Mode::Assistant(_) => Variant::Assistant,
        }
    }

    pub fn advisor(&self) -> Option<&dyn ClothingAdvisor> {
        match &self.mode {
            Mode::Basic => None,
            Mode::Assistant(advisor) => Some(advisor.as_ref()),
        }
    }
}
