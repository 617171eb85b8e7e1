//! Test 命令 - 发送测试请求到本地服务器
//!
//! 此模块实现 `test` 命令，用于向本地运行的 skyrelay 服务器发送一个
//! 10 天预报请求，验证服务和上游凭据是否正常工作。

use anyhow::{Context, Result};
use serde_json::json;

use crate::config::{Config, Variant};

/// 执行测试命令
///
/// # 参数
///
/// * `config` - 应用配置，用于获取服务器地址和共享密钥
/// * `location` - 查询的地点
///
/// # 功能
///
/// - 向本地服务器的 `/api/v1/10-days` 端点发送请求
/// - assistant 变体下附带 `requester_name`
/// - 显示响应状态和内容
pub async fn test_command(config: Config, location: String) -> Result<()> {
    println!("Sending test request to local server...");

    let mut body = json!({
        "token": config.secret,
        "location": location,
    });
    if config.variant == Variant::Assistant {
        body["requester_name"] = json!("skyrelay-test");
    }

    // 0.0.0.0 只能监听，不能作为目标地址
    let host = if config.host == "0.0.0.0" {
        "127.0.0.1"
    } else {
        config.host.as_str()
    };
    let url = format!("http://{}:{}/api/v1/10-days", host, config.port);

    println!("Request URL: {}", url);

    let response = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await
        .context("Request failed. Make sure the server is running.")?;

    let status = response.status();
    println!("Response status: {}", status);

    let text = response
        .text()
        .await
        .context("Failed to read response body")?;

    if !status.is_success() {
        anyhow::bail!("Request failed: {}", text);
    }

    println!("Response:");
    println!("{}", text);

    Ok(())
}
