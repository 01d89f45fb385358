//! 错误定义模块

use thiserror::Error;

/// 报告抽取系统统一错误类型
///
/// 字段缺失不是错误，用 `Option::None` 表示。
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Unknown field requested: {0}")]
    UnknownField(String),

    #[error("Malformed rule definition for field {field}: {source}")]
    MalformedRule {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No text could be extracted: {0}")]
    EmptyText(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for ReportError {
    fn from(err: config::ConfigError) -> Self {
        ReportError::Config(err.to_string())
    }
}

/// 统一结果类型
pub type Result<T> = std::result::Result<T, ReportError>;
