//! 记录组装
//!
//! 对全部19个字段独立执行抽取，并组装为患者信息与报告信息两个子记录

use crate::extractor::FieldExtractor;
use crate::registry::PatternRegistry;
use medreport_core::{FieldId, MedicalReportData, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// 记录组装器，HTTP层通过 `parse` 调用
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    extractor: FieldExtractor,
}

impl RecordAssembler {
    /// 使用内置规则创建
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(Arc::new(PatternRegistry::new()?)))
    }

    pub fn with_registry(registry: Arc<PatternRegistry>) -> Self {
        Self {
            extractor: FieldExtractor::new(registry),
        }
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    /// 抽取全部字段；任何输入都得到结构完整的记录
    pub fn assemble(&self, text: &str) -> MedicalReportData {
        let fields: BTreeMap<FieldId, Option<String>> = FieldId::ALL
            .iter()
            .map(|&field| (field, self.extractor.extract_field(field, text)))
            .collect();

        MedicalReportData::from_fields(fields)
    }

    /// 统计已抽取（非缺失）的字段数，仅用于诊断
    pub fn count_non_absent(record: &MedicalReportData) -> usize {
        FieldId::ALL
            .iter()
            .filter(|&&field| record.get(field).is_some())
            .count()
    }

    /// 解析OCR文本
    pub fn parse(&self, text: &str) -> MedicalReportData {
        info!("Parsing medical fields from extracted text ({} characters)", text.len());

        let record = self.assemble(text);
        info!(
            "Successfully extracted {} of {} fields from medical report",
            Self::count_non_absent(&record),
            FieldId::ALL.len()
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_REPORT: &str = "\
User Name: RADTECH01
Created On: 14/03/2024 09:15:42
License ID: 778812
Physician DR. MEHTA/DR. RAO
Institution Name: CITY HOSPITAL
Institution Address: 42 PARK ROAD, PUNE
Department Name: RADIOLOGY
Patient Name RAVI KUMAR Sex Male
Patient ID: CT/10234/45Y
Birthdate (Age) 12/01/1979 (45Y)
Accession Number: ACC99812
Referring Physician: DR. SHARMA
Study ID: ST7781
Height: 172 cm
Weight: 68 kg
BSA: 1.80 m2
Acquisition Date: 14/03/2024
Comments: Follow up in 6 weeks.
";

    fn assembler() -> RecordAssembler {
        RecordAssembler::new().unwrap()
    }

    #[test]
    fn test_full_report() {
        let record = assembler().parse(SAMPLE_REPORT);

        let patient = &record.patient_info;
        assert_eq!(patient.name.as_deref(), Some("RAVI KUMAR"));
        assert_eq!(patient.id.as_deref(), Some("CT/10234/45Y"));
        assert_eq!(patient.sex.as_deref(), Some("Male"));
        assert_eq!(patient.birthdate_age.as_deref(), Some("12/01/1979 (45Y)"));
        assert_eq!(patient.accession_number.as_deref(), Some("ACC99812"));
        assert_eq!(patient.referring_physician.as_deref(), Some("DR. SHARMA"));
        assert_eq!(patient.study_id.as_deref(), Some("ST7781"));
        assert_eq!(patient.height.as_deref(), Some("172 cm"));
        assert_eq!(patient.weight.as_deref(), Some("68 kg"));
        assert_eq!(patient.bsa.as_deref(), Some("1.80 m2"));
        assert_eq!(patient.acquisition_date.as_deref(), Some("14/03/2024"));
        assert_eq!(patient.comments.as_deref(), Some("Follow up in 6 weeks"));

        let report = &record.report_details;
        assert_eq!(report.user_name.as_deref(), Some("RADTECH01"));
        assert_eq!(report.created_on.as_deref(), Some("14/03/2024 09:15:42"));
        assert_eq!(report.license_id.as_deref(), Some("778812"));
        assert_eq!(report.physician.as_deref(), Some("DR. MEHTA/DR. RAO"));
        assert_eq!(report.institution_name.as_deref(), Some("CITY HOSPITAL"));
        assert_eq!(report.institution_address.as_deref(), Some("42 PARK ROAD, PUNE"));
        assert_eq!(report.department_name.as_deref(), Some("RADIOLOGY"));

        assert_eq!(RecordAssembler::count_non_absent(&record), 19);
    }

    #[test]
    fn test_name_and_sex_on_one_line() {
        let record = assembler().parse("PATIENT NAME JOHN DOE SEX MALE");
        assert_eq!(record.patient_info.name.as_deref(), Some("JOHN DOE"));
        assert_eq!(record.patient_info.sex.as_deref(), Some("MALE"));
    }

    #[test]
    fn test_name_with_boundary_prefix_word() {
        // "SEXTON" 以 "Sex" 开头，不应截断姓名
        let record = assembler().parse("Patient Name MARY SEXTON Sex Female\n");
        assert_eq!(record.patient_info.name.as_deref(), Some("MARY SEXTON"));
        assert_eq!(record.patient_info.sex.as_deref(), Some("Female"));
    }

    #[test]
    fn test_license_and_institution() {
        let record = assembler().parse("License ID: 12345\nInstitution Name: CITY HOSPITAL\n");
        assert_eq!(record.report_details.license_id.as_deref(), Some("12345"));
        assert_eq!(record.report_details.institution_name.as_deref(), Some("CITY HOSPITAL"));
        // 机构名不应被误认为患者姓名
        assert_eq!(record.patient_info.name, None);
        assert_eq!(RecordAssembler::count_non_absent(&record), 2);
    }

    #[test]
    fn test_empty_input() {
        let assembler = assembler();
        for text in ["", "   \n\t  \n"] {
            let record = assembler.parse(text);
            assert_eq!(record, MedicalReportData::default());
            assert_eq!(RecordAssembler::count_non_absent(&record), 0);
        }
    }

    #[test]
    fn test_line_order_does_not_change_values() {
        let lines = [
            "License ID: 12345",
            "Institution Name: CITY HOSPITAL",
            "Study ID: ST100",
            "Accession Number: ACC42",
            "Acquisition Date: 02/11/2023",
            "Comments: Stable appearance",
        ];
        let forward = lines.join("\n");
        let reversed = lines.iter().rev().copied().collect::<Vec<_>>().join("\n");
        let rotated = lines[3..]
            .iter()
            .chain(&lines[..3])
            .copied()
            .collect::<Vec<_>>()
            .join("\n");

        let assembler = assembler();
        let expected = assembler.parse(&forward);
        assert_eq!(RecordAssembler::count_non_absent(&expected), 6);
        assert_eq!(assembler.parse(&reversed), expected);
        assert_eq!(assembler.parse(&rotated), expected);
    }

    #[test]
    fn test_shared_registry_across_threads() {
        let assembler = assembler();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let assembler = assembler.clone();
                std::thread::spawn(move || {
                    let text = format!("Study ID: ST{}\nLicense ID: {}{}\n", i, i, i);
                    assembler.parse(&text)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let record = handle.join().unwrap();
            assert_eq!(record.patient_info.study_id, Some(format!("ST{}", i)));
            assert_eq!(record.report_details.license_id, Some(format!("{}{}", i, i)));
        }
    }
}
