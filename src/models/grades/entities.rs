use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{GradebookError, Result};

/// 导出范围
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub enum ExportScope {
    /// 教师名下所有课程
    #[default]
    All,
    /// 单个课程
    Course,
    /// 单个作业
    Assignment,
}

impl std::fmt::Display for ExportScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportScope::All => write!(f, "all"),
            ExportScope::Course => write!(f, "course"),
            ExportScope::Assignment => write!(f, "assignment"),
        }
    }
}

/// 导出文件格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

/// 可选列开关，只增减列，不影响行的身份与顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub include_student_details: bool,
    pub include_assignment_details: bool,
    pub include_feedback: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_student_details: true,
            include_assignment_details: true,
            include_feedback: false,
        }
    }
}

/// 校验后的导出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSelection {
    All,
    Course(i64),
    Assignment(i64),
}

impl ExportSelection {
    /// 在发起任何查询之前校验范围所需的选择器
    pub fn from_params(
        scope: ExportScope,
        course_id: Option<i64>,
        assignment_id: Option<i64>,
    ) -> Result<Self> {
        match scope {
            ExportScope::All => Ok(ExportSelection::All),
            ExportScope::Course => course_id
                .map(ExportSelection::Course)
                .ok_or_else(|| GradebookError::validation("course_id is required for scope 'course'")),
            ExportScope::Assignment => assignment_id.map(ExportSelection::Assignment).ok_or_else(
                || GradebookError::validation("assignment_id is required for scope 'assignment'"),
            ),
        }
    }

    pub fn scope(&self) -> ExportScope {
        match self {
            ExportSelection::All => ExportScope::All,
            ExportSelection::Course(_) => ExportScope::Course,
            ExportSelection::Assignment(_) => ExportScope::Assignment,
        }
    }
}
