//! 配置管理
//!
//! 配置来源依次为：内置默认值、可选配置文件、`MEDREPORT_` 前缀的环境变量

use crate::error::{ReportError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 服务完整配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 上传文件策略
    pub upload: UploadConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// 上传文件策略
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// 最大文件大小（字节）
    pub max_file_size: u64,
    /// 允许的扩展名，带前导点号
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allowed_extensions: [".pdf", ".png", ".jpg", ".jpeg", ".txt"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别或 EnvFilter 指令
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// 加载配置
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix("MEDREPORT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("upload.allowed_extensions"),
            )
            .build()?;

        let config: ServiceConfig = settings.try_deserialize()?;
        config.validate()?;

        match config_path {
            Some(path) => info!("Configuration loaded successfully from: {}", path),
            None => info!("Configuration loaded from defaults and environment"),
        }
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ReportError::Config("Server port cannot be 0".to_string()));
        }
        if self.upload.max_file_size == 0 {
            return Err(ReportError::Config("upload.max_file_size must be positive".to_string()));
        }
        if self.upload.allowed_extensions.is_empty() {
            return Err(ReportError::Config(
                "upload.allowed_extensions cannot be empty".to_string(),
            ));
        }
        if let Some(ext) = self.upload.allowed_extensions.iter().find(|ext| !ext.starts_with('.')) {
            return Err(ReportError::Config(format!(
                "Extension must start with a dot: {}",
                ext
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.upload.max_file_size, 10 * 1024 * 1024);
        assert!(config.upload.allowed_extensions.contains(&".pdf".to_string()));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = ServiceConfig::default();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(ReportError::Config(_))));

        let mut config = ServiceConfig::default();
        config.upload.allowed_extensions = vec!["pdf".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path =
            std::env::temp_dir().join(format!("medreport-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[server]\nport = 9100\n\n[upload]\nallowed_extensions = [\".txt\"]\n",
        )
        .unwrap();

        let config = ServiceConfig::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.upload.allowed_extensions, vec![".txt".to_string()]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = ServiceConfig::load(Some("/nonexistent/medreport.toml"));
        assert!(matches!(result, Err(ReportError::Config(_))));
    }
}
