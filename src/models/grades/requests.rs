use serde::Deserialize;
use ts_rs::TS;

use super::entities::{ExportFormat, ExportOptions, ExportScope};

fn default_true() -> bool {
    true
}

/// 成绩导出查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct ExportParams {
    #[serde(default)]
    pub scope: ExportScope,
    #[serde(default)]
    pub format: ExportFormat,
    pub course_id: Option<i64>,
    pub assignment_id: Option<i64>,
    /// 仅对 CSV 生效
    #[serde(default = "default_true")]
    pub include_headers: bool,
    #[serde(default = "default_true")]
    pub include_student_details: bool,
    #[serde(default = "default_true")]
    pub include_assignment_details: bool,
    #[serde(default)]
    pub include_feedback: bool,
}

impl ExportParams {
    pub fn options(&self) -> ExportOptions {
        ExportOptions {
            include_student_details: self.include_student_details,
            include_assignment_details: self.include_assignment_details,
            include_feedback: self.include_feedback,
        }
    }
}

/// 批改统计查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct StatisticsParams {
    pub course_id: Option<i64>,
}
