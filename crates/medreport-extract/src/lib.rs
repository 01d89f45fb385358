//! # MedReport 字段抽取引擎
//!
//! 将噪声较多的OCR文本转换为结构化报告记录：
//! - 规则表：每个字段一条声明式匹配规则，启动时编译一次
//! - 字段抽取：首个命中、规范化、过滤退化值
//! - 记录组装：19个字段独立抽取后分组为两个子记录

pub mod assembler;
pub mod extractor;
pub mod registry;
pub mod source;

pub use assembler::RecordAssembler;
pub use extractor::{normalize, normalize_value, FieldExtractor};
pub use registry::{default_rules, CompiledRule, FieldRule, PatternRegistry, Separator, Terminator};
pub use source::{PlainTextSource, TextSource};
