//! 报告抽取服务主程序

use clap::Parser;
use medreport_extract::{PatternRegistry, RecordAssembler};
use medreport_server::{init_tracing, load_config};
use medreport_web::{AppState, WebServer};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// 服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "medreport-server")]
#[command(about = "Medical report field extraction server")]
struct Args {
    /// 监听主机
    #[arg(long)]
    host: Option<String>,

    /// 服务器端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref(), args.log_level.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    // 初始化日志
    init_tracing(&config.logging.level);

    info!("启动报告抽取服务...");
    info!("  监听地址: {}:{}", config.server.host, config.server.port);
    info!("  最大文件: {} bytes", config.upload.max_file_size);

    // 规则表只在启动时构建一次
    let registry = Arc::new(PatternRegistry::new()?);
    let state = AppState::new(RecordAssembler::with_registry(registry), config.upload.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let server = WebServer::new(addr, state);

    if let Err(e) = server.run().await {
        error!("服务器启动失败: {}", e);
        return Err(e);
    }

    Ok(())
}
