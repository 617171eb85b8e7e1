//! 应用配置模块
//!
//! 配置按以下顺序叠加（后者覆盖前者）：
//! - 内置默认值
//! - 可选的 TOML 配置文件（`--config <path>`）
//! - `SKYRELAY_*` 环境变量
//!
//! 配置在启动时构建一次，之后只读。

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_WEATHER_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";
pub const DEFAULT_SUGGEST_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_SUGGEST_MODEL: &str = "gpt-3.5-turbo";

/// 服务变体
///
/// - `basic`: 仅转发天气数据
/// - `assistant`: 额外要求 `requester_name`，日报附带穿衣建议
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Basic,
    Assistant,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Variant::Basic),
            "assistant" => Ok(Variant::Assistant),
            other => bail!("Unknown variant '{other}'. Supported variants: basic, assistant."),
        }
    }
}

/// 天气 API（Visual Crossing timeline）配置
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: String,
}

/// 语言模型 API 配置（仅 assistant 变体）
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// 应用配置
///
/// 包含服务器运行所需的所有配置项
#[derive(Debug, Clone)]
pub struct Config {
    /// 服务器监听地址（如 "0.0.0.0" 或 "127.0.0.1"）
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 调用方共享密钥（与请求体中的 `token` 比对）
    pub secret: String,
    pub variant: Variant,
    /// 上游请求超时
    pub upstream_timeout: Duration,
    pub weather: WeatherConfig,
    /// 仅在 `Variant::Assistant` 下存在
    pub suggest: Option<SuggestConfig>,
}

/// TOML 文件结构，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    secret: Option<String>,
    variant: Option<Variant>,
    upstream_timeout_secs: Option<u64>,
    weather: FileWeather,
    suggest: FileSuggest,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileWeather {
    base_url: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSuggest {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

impl Config {
    /// 加载配置
    ///
    /// # 参数
    ///
    /// * `path` - 可选的 TOML 配置文件路径
    ///
    /// # 环境变量
    ///
    /// - `SKYRELAY_HOST`: 服务器监听地址（默认: "0.0.0.0"）
    /// - `SKYRELAY_PORT`: 服务器监听端口（默认: 8080）
    /// - `SKYRELAY_SECRET`: 调用方共享密钥（**必需**）
    /// - `SKYRELAY_VARIANT`: `basic` 或 `assistant`（默认: basic）
    /// - `SKYRELAY_UPSTREAM_TIMEOUT_SECS`: 上游请求超时秒数（默认: 30）
    /// - `SKYRELAY_WEATHER_BASE_URL` / `SKYRELAY_WEATHER_API_KEY`（后者**必需**）
    /// - `SKYRELAY_SUGGEST_BASE_URL` / `SKYRELAY_SUGGEST_API_KEY` / `SKYRELAY_SUGGEST_MODEL`
    ///   （assistant 变体下 API key **必需**）
    ///
    /// # 错误
    ///
    /// - 缺少必需的配置项
    /// - 端口、超时或变体的取值无效
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    fn resolve<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = env("SKYRELAY_HOST")
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match env("SKYRELAY_PORT") {
            Some(value) => value
                .parse()
                .context("SKYRELAY_PORT must be a valid port number")?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        };

        let secret = env("SKYRELAY_SECRET")
            .or(file.secret)
            .context("SKYRELAY_SECRET environment variable (or `secret` in the config file) is required")?;
        if secret.is_empty() {
            bail!("The shared secret must not be empty");
        }

        let variant = match env("SKYRELAY_VARIANT") {
            Some(value) => value.parse()?,
            None => file.variant.unwrap_or_default(),
        };

        let timeout_secs = match env("SKYRELAY_UPSTREAM_TIMEOUT_SECS") {
            Some(value) => value
                .parse()
                .context("SKYRELAY_UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            None => file
                .upstream_timeout_secs
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        let weather = WeatherConfig {
            base_url: env("SKYRELAY_WEATHER_BASE_URL")
                .or(file.weather.base_url)
                .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string()),
            api_key: env("SKYRELAY_WEATHER_API_KEY")
                .or(file.weather.api_key)
                .context("SKYRELAY_WEATHER_API_KEY environment variable (or `weather.api_key`) is required")?,
        };

        let suggest = match variant {
            Variant::Basic => None,
            Variant::Assistant => Some(SuggestConfig {
                base_url: env("SKYRELAY_SUGGEST_BASE_URL")
                    .or(file.suggest.base_url)
                    .unwrap_or_else(|| DEFAULT_SUGGEST_BASE_URL.to_string()),
                api_key: env("SKYRELAY_SUGGEST_API_KEY")
                    .or(file.suggest.api_key)
                    .context("SKYRELAY_SUGGEST_API_KEY (or `suggest.api_key`) is required for the assistant variant")?,
                model: env("SKYRELAY_SUGGEST_MODEL")
                    .or(file.suggest.model)
                    .unwrap_or_else(|| DEFAULT_SUGGEST_MODEL.to_string()),
            }),
        };

        Ok(Self {
            host,
            port,
            secret,
            variant,
            upstream_timeout: Duration::from_secs(timeout_secs),
            weather,
            suggest,
        })
    }
}
