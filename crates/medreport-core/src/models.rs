//! 核心数据模型定义

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 字段所属的子记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Patient, // 患者信息
    Report,  // 报告信息
}

/// 已知字段标识，共19个
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    PatientName,
    PatientId,
    Sex,
    BirthdateAge,
    AccessionNumber,
    ReferringPhysician,
    StudyId,
    Height,
    Weight,
    Bsa,
    AcquisitionDate,
    Comments,
    UserName,
    CreatedOn,
    LicenseId,
    Physician,
    InstitutionName,
    InstitutionAddress,
    DepartmentName,
}

impl FieldId {
    /// 按记录顺序排列的全部字段
    pub const ALL: [FieldId; 19] = [
        FieldId::PatientName,
        FieldId::PatientId,
        FieldId::Sex,
        FieldId::BirthdateAge,
        FieldId::AccessionNumber,
        FieldId::ReferringPhysician,
        FieldId::StudyId,
        FieldId::Height,
        FieldId::Weight,
        FieldId::Bsa,
        FieldId::AcquisitionDate,
        FieldId::Comments,
        FieldId::UserName,
        FieldId::CreatedOn,
        FieldId::LicenseId,
        FieldId::Physician,
        FieldId::InstitutionName,
        FieldId::InstitutionAddress,
        FieldId::DepartmentName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::PatientName => "patient_name",
            FieldId::PatientId => "patient_id",
            FieldId::Sex => "sex",
            FieldId::BirthdateAge => "birthdate_age",
            FieldId::AccessionNumber => "accession_number",
            FieldId::ReferringPhysician => "referring_physician",
            FieldId::StudyId => "study_id",
            FieldId::Height => "height",
            FieldId::Weight => "weight",
            FieldId::Bsa => "bsa",
            FieldId::AcquisitionDate => "acquisition_date",
            FieldId::Comments => "comments",
            FieldId::UserName => "user_name",
            FieldId::CreatedOn => "created_on",
            FieldId::LicenseId => "license_id",
            FieldId::Physician => "physician",
            FieldId::InstitutionName => "institution_name",
            FieldId::InstitutionAddress => "institution_address",
            FieldId::DepartmentName => "department_name",
        }
    }

    pub fn section(&self) -> Section {
        match self {
            FieldId::UserName
            | FieldId::CreatedOn
            | FieldId::LicenseId
            | FieldId::Physician
            | FieldId::InstitutionName
            | FieldId::InstitutionAddress
            | FieldId::DepartmentName => Section::Report,
            _ => Section::Patient,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| ReportError::UnknownField(value.to_string()))
    }
}

/// 缺失字段在线上格式中序列化为空字符串
mod empty_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}

/// 患者信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    #[serde(default, with = "empty_string")]
    pub name: Option<String>,
    #[serde(default, with = "empty_string")]
    pub id: Option<String>,
    #[serde(default, with = "empty_string")]
    pub sex: Option<String>,
    #[serde(default, with = "empty_string")]
    pub birthdate_age: Option<String>,
    #[serde(default, with = "empty_string")]
    pub accession_number: Option<String>,
    #[serde(default, with = "empty_string")]
    pub referring_physician: Option<String>,
    #[serde(default, with = "empty_string")]
    pub study_id: Option<String>,
    #[serde(default, with = "empty_string")]
    pub height: Option<String>,
    #[serde(default, with = "empty_string")]
    pub weight: Option<String>,
    #[serde(default, with = "empty_string")]
    pub bsa: Option<String>,
    #[serde(default, with = "empty_string")]
    pub acquisition_date: Option<String>,
    #[serde(default, with = "empty_string")]
    pub comments: Option<String>,
}

/// 报告信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDetails {
    #[serde(default, with = "empty_string")]
    pub user_name: Option<String>,
    #[serde(default, with = "empty_string")]
    pub created_on: Option<String>,
    #[serde(default, with = "empty_string")]
    pub license_id: Option<String>,
    #[serde(default, with = "empty_string")]
    pub physician: Option<String>,
    #[serde(default, with = "empty_string")]
    pub institution_name: Option<String>,
    #[serde(default, with = "empty_string")]
    pub institution_address: Option<String>,
    #[serde(default, with = "empty_string")]
    pub department_name: Option<String>,
}

/// 完整报告数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalReportData {
    #[serde(default)]
    pub patient_info: PatientInfo,
    #[serde(default)]
    pub report_details: ReportDetails,
}

impl MedicalReportData {
    /// 由字段值集合组装记录
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (FieldId, Option<String>)>,
    {
        let mut data = Self::default();
        for (field, value) in fields {
            *data.slot_mut(field) = value;
        }
        data
    }

    pub fn get(&self, field: FieldId) -> Option<&str> {
        let p = &self.patient_info;
        let r = &self.report_details;
        let slot = match field {
            FieldId::PatientName => &p.name,
            FieldId::PatientId => &p.id,
            FieldId::Sex => &p.sex,
            FieldId::BirthdateAge => &p.birthdate_age,
            FieldId::AccessionNumber => &p.accession_number,
            FieldId::ReferringPhysician => &p.referring_physician,
            FieldId::StudyId => &p.study_id,
            FieldId::Height => &p.height,
            FieldId::Weight => &p.weight,
            FieldId::Bsa => &p.bsa,
            FieldId::AcquisitionDate => &p.acquisition_date,
            FieldId::Comments => &p.comments,
            FieldId::UserName => &r.user_name,
            FieldId::CreatedOn => &r.created_on,
            FieldId::LicenseId => &r.license_id,
            FieldId::Physician => &r.physician,
            FieldId::InstitutionName => &r.institution_name,
            FieldId::InstitutionAddress => &r.institution_address,
            FieldId::DepartmentName => &r.department_name,
        };
        slot.as_deref()
    }

    fn slot_mut(&mut self, field: FieldId) -> &mut Option<String> {
        let p = &mut self.patient_info;
        let r = &mut self.report_details;
        match field {
            FieldId::PatientName => &mut p.name,
            FieldId::PatientId => &mut p.id,
            FieldId::Sex => &mut p.sex,
            FieldId::BirthdateAge => &mut p.birthdate_age,
            FieldId::AccessionNumber => &mut p.accession_number,
            FieldId::ReferringPhysician => &mut p.referring_physician,
            FieldId::StudyId => &mut p.study_id,
            FieldId::Height => &mut p.height,
            FieldId::Weight => &mut p.weight,
            FieldId::Bsa => &mut p.bsa,
            FieldId::AcquisitionDate => &mut p.acquisition_date,
            FieldId::Comments => &mut p.comments,
            FieldId::UserName => &mut r.user_name,
            FieldId::CreatedOn => &mut r.created_on,
            FieldId::LicenseId => &mut r.license_id,
            FieldId::Physician => &mut r.physician,
            FieldId::InstitutionName => &mut r.institution_name,
            FieldId::InstitutionAddress => &mut r.institution_address,
            FieldId::DepartmentName => &mut r.department_name,
        }
    }
}

/// 带元数据的详细报告数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalReportDataDetailed {
    pub patient_info: PatientInfo,
    pub report_details: ReportDetails,
    pub raw_text: Option<String>,
    pub source_filename: Option<String>,
    pub extraction_confidence: Option<String>, // 已抽取字段数/总字段数
    pub processed_at: String,
}

impl MedicalReportDataDetailed {
    pub fn new(
        data: MedicalReportData,
        raw_text: Option<String>,
        source_filename: Option<String>,
        extracted_fields: usize,
    ) -> Self {
        Self {
            patient_info: data.patient_info,
            report_details: data.report_details,
            raw_text,
            source_filename,
            extraction_confidence: Some(format!("{}/{}", extracted_fields, FieldId::ALL.len())),
            processed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// 错误响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status_code: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            status_code,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
