//! 服务端二进制的公共启动逻辑

use medreport_core::ServiceConfig;

/// 初始化日志，输出到标准错误以保持标准输出干净
pub fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();
}

/// 加载配置，命令行日志级别优先
pub fn load_config(
    config_path: Option<&str>,
    log_level: Option<&str>,
) -> anyhow::Result<ServiceConfig> {
    let mut config = ServiceConfig::load(config_path)?;
    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }
    Ok(config)
}
