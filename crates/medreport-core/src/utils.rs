//! 通用工具函数

use crate::config::UploadConfig;
use crate::error::{ReportError, Result};
use std::path::Path;

/// 校验输入文件的名称、扩展名和大小
pub fn validate_file(
    filename: Option<&str>,
    size: Option<u64>,
    policy: &UploadConfig,
) -> Result<()> {
    let filename = match filename {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ReportError::Validation("No file provided".to_string())),
    };

    let extension = Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    if !policy.allowed_extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&extension)) {
        return Err(ReportError::Validation(format!(
            "File format not supported. Allowed formats: {}",
            policy.allowed_extensions.join(", ")
        )));
    }

    if let Some(size) = size {
        if size > policy.max_file_size {
            return Err(ReportError::Validation(format!(
                "File size exceeds maximum allowed size of {}MB",
                policy.max_file_size / (1024 * 1024)
            )));
        }
    }

    Ok(())
}

/// 格式化文件大小
pub fn format_file_size(size_bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size_bytes < KB {
        format!("{} bytes", size_bytes)
    } else if size_bytes < MB {
        format!("{:.1} KB", size_bytes as f64 / KB as f64)
    } else if size_bytes < GB {
        format!("{:.1} MB", size_bytes as f64 / MB as f64)
    } else {
        format!("{:.1} GB", size_bytes as f64 / GB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file() {
        let policy = UploadConfig::default();

        assert!(validate_file(Some("report.PDF"), Some(1024), &policy).is_ok());
        assert!(validate_file(Some("scan.txt"), None, &policy).is_ok());

        let err = validate_file(None, None, &policy).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: No file provided");

        let err = validate_file(Some("report.docx"), Some(10), &policy).unwrap_err();
        assert!(err.to_string().contains("File format not supported"));

        // 无扩展名
        assert!(validate_file(Some("report"), Some(10), &policy).is_err());

        let err = validate_file(Some("big.png"), Some(11 * 1024 * 1024), &policy).unwrap_err();
        assert!(err.to_string().contains("maximum allowed size of 10MB"));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10.0 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
