//! # MedReport Core
//!
//! 报告字段抽取系统的核心模块，提供数据模型、字段标识、错误定义、配置和通用工具。

pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use config::{LoggingConfig, ServerConfig, ServiceConfig, UploadConfig};
pub use error::{ReportError, Result};
pub use models::*;
