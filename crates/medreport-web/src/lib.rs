//! # MedReport Web
//!
//! 暴露报告解析接口的HTTP层

pub mod handlers;
pub mod server;

pub use handlers::{ApiError, AppState};
pub use server::WebServer;
