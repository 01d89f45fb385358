//! 单字段抽取与取值规范化

use crate::registry::PatternRegistry;
use medreport_core::FieldId;
use std::sync::Arc;
use tracing::debug;

/// 首尾需去除的标点
const TRIM_PUNCTUATION: [char; 4] = ['.', ',', ':', '-'];

/// 规范化原始捕获值：合并空白，去除首尾标点与空白
pub fn normalize(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || TRIM_PUNCTUATION.contains(&c))
        .to_string()
}

/// 规范化并过滤退化值（空或单字符视为缺失）
pub fn normalize_value(raw: &str) -> Option<String> {
    let value = normalize(raw);
    if value.chars().count() > 1 {
        Some(value)
    } else {
        None
    }
}

/// 字段抽取器
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    registry: Arc<PatternRegistry>,
}

impl FieldExtractor {
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<PatternRegistry> {
        &self.registry
    }

    /// 按字段名抽取；未注册的字段名返回 `None`
    pub fn extract(&self, field_name: &str, text: &str) -> Option<String> {
        match field_name.parse::<FieldId>() {
            Ok(field) => self.extract_field(field, text),
            Err(e) => {
                debug!("Skipping extraction: {}", e);
                None
            }
        }
    }

    pub fn extract_field(&self, field: FieldId, text: &str) -> Option<String> {
        let Some(rule) = self.registry.rule(field) else {
            debug!("No rule registered for field {}", field);
            return None;
        };

        let raw = rule.find(text);
        let value = raw.and_then(normalize_value);
        debug!(
            field = %field,
            matched = raw.is_some(),
            extracted = value.is_some(),
            "Field extraction attempt"
        );
        value
    }
}
