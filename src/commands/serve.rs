//! Serve 命令 - 启动中继服务器
//!
//! 此模块实现 `serve` 命令，启动 HTTP 服务器转发天气预报请求。

use anyhow::Result;

use crate::config::Config;
use crate::gateway;

/// 执行服务器启动命令
///
/// # 参数
///
/// * `config` - 应用配置，包含监听地址、端口、上游凭据等信息
///
/// # 功能
///
/// - 根据配置创建上游客户端（assistant 变体额外创建穿衣建议客户端）
/// - 初始化 HTTP 路由和中间件
/// - 启动服务器并等待关闭信号
/// - 支持优雅关闭（Ctrl+C 或 SIGTERM）
pub async fn serve_command(config: Config) -> Result<()> {
    gateway::serve(config).await
}
