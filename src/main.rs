//! skyrelay - 天气预报中继服务
//!
//! 接收 JSON 请求，转发到 Visual Crossing timeline API，
//! 把响应整形为简化的小时/日报结构后返回。
//!
//! # 功能特性
//!
//! - 小时预报、单日预报、未来 10 天预报三个端点
//! - 基于共享密钥的调用方校验
//! - assistant 变体：通过 OpenAI 兼容接口生成穿衣建议
//!
//! # 命令行接口
//!
//! - `serve`: 启动中继服务器
//! - `test`: 向本地服务器发送测试请求

mod commands;
mod config;
mod error;
mod forecast;
mod gateway;
mod upstream;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// skyrelay CLI
#[derive(Parser)]
#[command(name = "skyrelay")]
#[command(about = "Weather Forecast Relay Service", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML 配置文件路径（环境变量会覆盖其中的值）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// 可用的命令
#[derive(Subcommand)]
enum Commands {
    /// 启动中继服务器
    Serve,
    /// 向本地服务器发送测试请求
    Test {
        /// 查询的地点
        #[arg(short, long, default_value = "Berlin")]
        location: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件（如果存在）
    if let Ok(dotenv_path) = std::env::var("SKYRELAY_ENV_FILE") {
        dotenvy::from_path(&dotenv_path).ok();
    } else {
        dotenvy::dotenv().ok();
    }

    // 初始化日志系统
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyrelay=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    // 解析命令行参数和配置
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => commands::serve_command(config).await,
        Commands::Test { location } => commands::test_command(config, location).await,
    }
}
