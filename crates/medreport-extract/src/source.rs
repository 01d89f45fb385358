//! OCR文本来源接口
//!
//! OCR本身由外部引擎完成，这里只定义取文本的窄接口

use async_trait::async_trait;
use medreport_core::Result;
use std::path::Path;
use tracing::{debug, info};

/// 外部OCR协作方：给定文件路径返回纯文本（可能为空）
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn extract_text(&self, path: &Path) -> Result<String>;
}

/// 读取OCR引擎已输出的纯文本文件
#[derive(Debug, Default, Clone)]
pub struct PlainTextSource;

#[async_trait]
impl TextSource for PlainTextSource {
    async fn extract_text(&self, path: &Path) -> Result<String> {
        debug!("Reading OCR text from {}", path.display());
        let bytes = tokio::fs::read(path).await?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        info!("Extracted text length: {} characters", text.chars().count());
        Ok(text)
    }
}
