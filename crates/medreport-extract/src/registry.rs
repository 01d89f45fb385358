//! 字段匹配规则表
//!
//! 每个字段对应一条声明式规则：标签候选、分隔符、取值形态、终止边界。
//! 规则在启动时统一编译一次，之后只读共享。

use medreport_core::{FieldId, ReportError, Result};
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info};

/// 标签与取值之间的分隔方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// 可选冒号，前后可有空白
    OptionalColon,
    /// 冒号或至少一个空白字符
    ColonOrSpace,
}

impl Separator {
    fn pattern(&self) -> &'static str {
        match self {
            Separator::OptionalColon => r"\s*:?\s*",
            Separator::ColonOrSpace => r"(?:\s*:\s*|\s+)",
        }
    }
}

/// 取值的终止边界
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// 取值形态自身有界
    None,
    /// 单词边界
    WordEnd,
    /// 换行、后续标签或文本（行）末尾
    Boundary(&'static [&'static str]),
}

/// 单个字段的匹配规则
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: FieldId,
    /// 标签候选，空格匹配任意空白（含无空白）；为空时直接搜索取值形态
    pub labels: &'static [&'static str],
    /// 紧邻标签之前出现即判定该处不属于本字段的限定词
    pub excluded_qualifiers: &'static [&'static str],
    pub separator: Separator,
    /// 取值形态（正则片段）
    pub value: &'static str,
    pub terminator: Terminator,
    pub case_insensitive: bool,
    pub multiline: bool,
}

impl FieldRule {
    fn labelled(field: FieldId, labels: &'static [&'static str], value: &'static str) -> Self {
        Self {
            field,
            labels,
            excluded_qualifiers: &[],
            separator: Separator::OptionalColon,
            value,
            terminator: Terminator::None,
            case_insensitive: true,
            multiline: false,
        }
    }

    fn until(mut self, boundaries: &'static [&'static str]) -> Self {
        self.terminator = Terminator::Boundary(boundaries);
        self.multiline = true;
        self
    }

    fn separated_by(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    fn excluding(mut self, qualifiers: &'static [&'static str]) -> Self {
        self.excluded_qualifiers = qualifiers;
        self
    }

    /// 生成完整的匹配表达式，第1捕获组为取值
    pub fn expression(&self) -> String {
        let mut pattern = String::new();

        if self.case_insensitive || self.multiline {
            pattern.push_str("(?");
            if self.case_insensitive {
                pattern.push('i');
            }
            if self.multiline {
                pattern.push('m');
            }
            pattern.push(')');
        }

        if !self.labels.is_empty() {
            let labels: Vec<String> = self.labels.iter().map(|l| label_pattern(l)).collect();
            pattern.push_str(r"\b(?:");
            pattern.push_str(&labels.join("|"));
            pattern.push(')');
            pattern.push_str(self.separator.pattern());
        }

        pattern.push('(');
        pattern.push_str(self.value);
        pattern.push(')');

        match self.terminator {
            Terminator::None => {}
            Terminator::WordEnd => pattern.push_str(r"\b"),
            Terminator::Boundary(boundaries) => {
                pattern.push_str(r"\s*(?:\n");
                for boundary in boundaries {
                    pattern.push_str(r"|\b");
                    pattern.push_str(&label_pattern(boundary));
                    pattern.push_str(r"\b");
                }
                pattern.push_str("|$)");
            }
        }

        pattern
    }
}

/// 标签文本转为正则：逐词转义，词间匹配任意空白
fn label_pattern(label: &str) -> String {
    label
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s*")
}

/// 内置的19条字段规则
pub fn default_rules() -> Vec<FieldRule> {
    use Separator::ColonOrSpace;

    const DATE: &str = r"\d{1,2}/\d{1,2}/\d{4}";
    const FREE_TEXT: &str = r"[^:\n]*?";

    vec![
        // 报告信息
        FieldRule::labelled(
            FieldId::UserName,
            &["user name", "username"],
            r"[A-Za-z0-9\s\-._]+?",
        )
        .until(&["created"]),
        FieldRule::labelled(
            FieldId::CreatedOn,
            &["created on", "createdon"],
            r"\d{1,2}/\d{1,2}/\d{4}\s*\d{1,2}:\d{2}:\d{2}|\d{1,2}/\d{1,2}/\d{4}",
        ),
        FieldRule::labelled(FieldId::LicenseId, &["license id", "licenseid"], r"\d+"),
        FieldRule::labelled(
            FieldId::Physician,
            &["physician"],
            r"(?:DR\.\s*[A-Z]+/)*DR\.\s*[A-Z]+",
        )
        .separated_by(ColonOrSpace)
        .excluding(&["referring"]),
        FieldRule::labelled(
            FieldId::InstitutionName,
            &["institution name", "institutionname"],
            r"[A-Z\s]+?",
        )
        .until(&["institution address"]),
        FieldRule::labelled(
            FieldId::InstitutionAddress,
            &["institution address", "institutionaddress"],
            r"[A-Za-z0-9\s,.-]*?",
        )
        .until(&["department"]),
        FieldRule::labelled(
            FieldId::DepartmentName,
            &["department name", "departmentname"],
            r"[A-Z0-9\s]+?",
        )
        .until(&["patient"]),
        // 患者信息
        FieldRule::labelled(FieldId::PatientName, &["patient name", "name"], r"[A-Z\s.]+?")
            .separated_by(ColonOrSpace)
            .excluding(&["user", "institution", "department"])
            .until(&["sex"]),
        FieldRule {
            field: FieldId::PatientId,
            labels: &[],
            excluded_qualifiers: &[],
            separator: Separator::OptionalColon,
            value: r"[A-Z]{1,3}/\d+/\d+[YM]?",
            terminator: Terminator::None,
            case_insensitive: false,
            multiline: true,
        },
        FieldRule {
            terminator: Terminator::WordEnd,
            ..FieldRule::labelled(FieldId::Sex, &["sex", "gender"], "male|female|m|f")
                .separated_by(ColonOrSpace)
        },
        FieldRule::labelled(FieldId::BirthdateAge, &["birthdate (age)"], r"[^:\n\r]+?")
            .separated_by(ColonOrSpace)
            .until(&["accession"]),
        FieldRule::labelled(
            FieldId::AccessionNumber,
            &["accession number", "accessionnumber"],
            "[A-Z0-9]+",
        ),
        FieldRule::labelled(
            FieldId::ReferringPhysician,
            &["referring physician", "referringphysician"],
            r"[A-Za-z\s,.-]*?",
        )
        .until(&["study"]),
        FieldRule::labelled(FieldId::StudyId, &["study id", "studyid"], "[A-Z0-9]+"),
        FieldRule::labelled(FieldId::Height, &["height"], FREE_TEXT).until(&["weight"]),
        FieldRule::labelled(FieldId::Weight, &["weight"], FREE_TEXT).until(&["bsa"]),
        FieldRule::labelled(FieldId::Bsa, &["bsa"], FREE_TEXT).until(&["acquisition"]),
        FieldRule::labelled(
            FieldId::AcquisitionDate,
            &["acquisition date", "acquisitiondate"],
            DATE,
        ),
        FieldRule::labelled(FieldId::Comments, &["comments"], FREE_TEXT).until(&[]),
    ]
}

/// 编译后的规则
#[derive(Debug)]
pub struct CompiledRule {
    rule: FieldRule,
    regex: Regex,
}

impl CompiledRule {
    fn compile(rule: FieldRule) -> Result<Self> {
        let expression = rule.expression();
        let regex = Regex::new(&expression).map_err(|source| ReportError::MalformedRule {
            field: rule.field.to_string(),
            source,
        })?;
        debug!("Compiled rule for {}: {}", rule.field, expression);
        Ok(Self { rule, regex })
    }

    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }

    /// 返回第一个满足规则的原始捕获值
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        let mut start = 0;
        while start <= text.len() {
            let captures = self.regex.captures_at(text, start)?;
            let whole = captures.get(0)?;

            if self.is_disqualified(&text[..whole.start()]) {
                start = next_char_boundary(text, whole.start());
                continue;
            }

            return captures.get(1).map(|m| m.as_str());
        }
        None
    }

    fn is_disqualified(&self, preceding: &str) -> bool {
        if self.rule.excluded_qualifiers.is_empty() {
            return false;
        }
        let word = preceding
            .trim_end()
            .rsplit(|c: char| !c.is_alphanumeric())
            .next()
            .unwrap_or("");
        self.rule
            .excluded_qualifiers
            .iter()
            .any(|qualifier| qualifier.eq_ignore_ascii_case(word))
    }
}

fn next_char_boundary(text: &str, index: usize) -> usize {
    text[index..]
        .chars()
        .next()
        .map(|c| index + c.len_utf8())
        .unwrap_or(text.len() + 1)
}

/// 规则注册表，构建后只读
#[derive(Debug)]
pub struct PatternRegistry {
    rules: HashMap<FieldId, CompiledRule>,
}

impl PatternRegistry {
    /// 使用内置规则构建
    pub fn new() -> Result<Self> {
        Self::from_rules(default_rules())
    }

    /// 编译给定规则；任一规则无效或重复则构建失败
    pub fn from_rules(rules: Vec<FieldRule>) -> Result<Self> {
        let mut compiled = HashMap::with_capacity(rules.len());
        for rule in rules {
            let field = rule.field;
            if compiled.insert(field, CompiledRule::compile(rule)?).is_some() {
                return Err(ReportError::Config(format!("Duplicate rule for field {}", field)));
            }
        }

        info!("Pattern registry initialized with {} rules", compiled.len());
        Ok(Self { rules: compiled })
    }

    /// 按字段名查找规则
    pub fn get_rule(&self, field_name: &str) -> Option<&CompiledRule> {
        field_name.parse::<FieldId>().ok().and_then(|field| self.rule(field))
    }

    pub fn rule(&self, field: FieldId) -> Option<&CompiledRule> {
        self.rules.get(&field)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
