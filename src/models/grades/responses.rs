use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::models::assignments::entities::Assignment;
use crate::models::courses::entities::Course;

/// 导出范围选择器中的课程项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct CourseOption {
    pub id: i64,
    pub title: String,
    pub code: String,
}

impl From<Course> for CourseOption {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            code: course.code,
        }
    }
}

/// 导出范围选择器中的作业项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct AssignmentOption {
    pub id: i64,
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
    pub points: f64,
}

impl From<Assignment> for AssignmentOption {
    fn from(assignment: Assignment) -> Self {
        Self {
            id: assignment.id,
            title: assignment.title,
            due_date: assignment.due_date,
            points: assignment.points,
        }
    }
}

/// 批改进度统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grades.ts")]
pub struct GradingStatistics {
    pub pending_count: i64,
    pub graded_count: i64,
    pub total_submissions: i64,
    /// 已批改占比，四舍五入到整数
    pub completion_percentage: i64,
}
