//! 导出行模型
//!
//! 每种导出范围对应一种行结构，`ExportRow` 把它们统一起来。
//! 行通过 [`ExportRow::fields`] 展开为有序的 `(列名, 值)` 列表，
//! CSV 表头与 JSON 对象的键顺序都来自这里。

use serde::ser::{Serialize, SerializeMap, Serializer};

pub const STUDENT_NAME: &str = "Student Name";
pub const STUDENT_ID: &str = "Student ID";
pub const STUDENT_EMAIL: &str = "Student Email";
pub const GRADE: &str = "Grade";
pub const PERCENTAGE: &str = "Percentage";
pub const ASSIGNMENT: &str = "Assignment";
pub const COURSE: &str = "Course";
pub const COURSE_TITLE: &str = "Course Title";
pub const MAX_POINTS: &str = "Max Points";
pub const FEEDBACK: &str = "Feedback";
pub const STATUS: &str = "Status";
pub const SUBMISSION_DATE: &str = "Submission Date";
pub const TOTAL_POINTS: &str = "Total Points";
pub const AVERAGE: &str = "Average";

pub const NOT_SUBMITTED: &str = "Not Submitted";
pub const NOT_AVAILABLE: &str = "N/A";

/// 单元格的值
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Empty,
}

impl FieldValue {
    /// CSV 中的文本形式，整数不带小数点
    pub fn to_csv_string(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Empty => String::new(),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Empty => serializer.serialize_none(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FieldValue::Empty, FieldValue::Text)
    }
}

/// 学生明细列（学号、邮箱）
#[derive(Debug, Clone, PartialEq)]
pub struct StudentColumns {
    pub student_code: Option<String>,
    pub email: String,
}

/// 单次提交的作业状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    NotSubmitted,
    Submitted,
    Graded,
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::NotSubmitted => NOT_SUBMITTED,
            SubmissionState::Submitted => "Submitted",
            SubmissionState::Graded => "Graded",
        }
    }
}

/// `all` 范围：每条已评分提交一行
#[derive(Debug, Clone, PartialEq)]
pub struct AllScopeRow {
    pub student_name: String,
    pub grade: f64,
    pub percentage: String,
    pub student: Option<StudentColumns>,
    pub assignment: Option<AllScopeAssignmentColumns>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllScopeAssignmentColumns {
    pub title: String,
    pub course_code: String,
    pub course_title: String,
    pub max_points: f64,
}

/// `course` 范围：每个选课学生一行，每个作业一列
#[derive(Debug, Clone, PartialEq)]
pub struct CourseScopeRow {
    pub student_name: String,
    pub student: Option<StudentColumns>,
    pub cells: Vec<CourseGradeCell>,
    /// 课程没有作业时为空
    pub totals: Option<CourseTotals>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseGradeCell {
    pub assignment_title: String,
    pub column: String,
    pub value: FieldValue,
    /// 仅在开启反馈且存在已评分提交时出现
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseTotals {
    pub total_points: FieldValue,
    pub max_points: FieldValue,
    pub average: String,
}

/// `assignment` 范围：每个选课学生一行
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentScopeRow {
    pub student_name: String,
    pub status: SubmissionState,
    pub grade: FieldValue,
    pub student: Option<StudentColumns>,
    pub assignment: Option<AssignmentScopeColumns>,
    pub percentage: String,
    pub feedback: Option<String>,
    pub submission_date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentScopeColumns {
    pub title: String,
    pub course_code: String,
    pub max_points: f64,
}

/// 聚合器输出的一行
#[derive(Debug, Clone, PartialEq)]
pub enum ExportRow {
    All(AllScopeRow),
    Course(CourseScopeRow),
    Assignment(AssignmentScopeRow),
}

/// 有序字段表，重复的列名保留首次出现的位置并覆盖旧值
#[derive(Debug, Default)]
struct FieldList(Vec<(String, FieldValue)>);

impl FieldList {
    fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    fn set_student(&mut self, student: &Option<StudentColumns>) {
        if let Some(student) = student {
            self.set(STUDENT_ID, student.student_code.clone());
            self.set(STUDENT_EMAIL, student.email.clone());
        }
    }
}

impl ExportRow {
    /// 按列顺序展开的字段
    pub fn fields(&self) -> Vec<(String, FieldValue)> {
        let mut list = FieldList::default();
        match self {
            ExportRow::All(row) => {
                list.set(STUDENT_NAME, row.student_name.as_str());
                list.set(GRADE, row.grade);
                list.set(PERCENTAGE, row.percentage.as_str());
                list.set_student(&row.student);
                if let Some(assignment) = &row.assignment {
                    list.set(ASSIGNMENT, assignment.title.as_str());
                    list.set(COURSE, assignment.course_code.as_str());
                    list.set(COURSE_TITLE, assignment.course_title.as_str());
                    list.set(MAX_POINTS, assignment.max_points);
                }
                if let Some(feedback) = &row.feedback {
                    list.set(FEEDBACK, feedback.as_str());
                }
            }
            ExportRow::Course(row) => {
                list.set(STUDENT_NAME, row.student_name.as_str());
                list.set_student(&row.student);
                for cell in &row.cells {
                    list.set(cell.column.as_str(), cell.value.clone());
                    if let Some(feedback) = &cell.feedback {
                        list.set(format!("{} Feedback", cell.assignment_title), feedback.as_str());
                    }
                }
                if let Some(totals) = &row.totals {
                    list.set(TOTAL_POINTS, totals.total_points.clone());
                    list.set(MAX_POINTS, totals.max_points.clone());
                    list.set(AVERAGE, totals.average.as_str());
                }
            }
            ExportRow::Assignment(row) => {
                list.set(STUDENT_NAME, row.student_name.as_str());
                list.set(STATUS, row.status.as_str());
                list.set(GRADE, row.grade.clone());
                list.set_student(&row.student);
                if let Some(assignment) = &row.assignment {
                    list.set(ASSIGNMENT, assignment.title.as_str());
                    list.set(COURSE, assignment.course_code.as_str());
                    list.set(MAX_POINTS, assignment.max_points);
                }
                list.set(PERCENTAGE, row.percentage.as_str());
                if let Some(feedback) = &row.feedback {
                    list.set(FEEDBACK, feedback.as_str());
                }
                list.set(SUBMISSION_DATE, row.submission_date.as_str());
            }
        }
        list.0
    }

    /// 按列名取值
    pub fn get(&self, key: &str) -> Option<FieldValue> {
        self.fields()
            .into_iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }
}

// JSON 中每行是一个扁平对象
impl Serialize for ExportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (key, value) in &fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_rendering() {
        assert_eq!(FieldValue::Number(90.0).to_csv_string(), "90");
        assert_eq!(FieldValue::Number(92.5).to_csv_string(), "92.5");
        assert_eq!(FieldValue::Empty.to_csv_string(), "");
        assert_eq!(serde_json::to_string(&FieldValue::Number(40.0)).unwrap(), "40");
        assert_eq!(serde_json::to_string(&FieldValue::Number(7.25)).unwrap(), "7.25");
        assert_eq!(serde_json::to_string(&FieldValue::Empty).unwrap(), "null");
    }

    #[test]
    fn test_course_row_field_order() {
        let row = ExportRow::Course(CourseScopeRow {
            student_name: "Ada Lovelace".into(),
            student: None,
            cells: vec![CourseGradeCell {
                assignment_title: "Essay".into(),
                column: "Essay (50pts)".into(),
                value: FieldValue::Number(45.0),
                feedback: Some("Good".into()),
            }],
            totals: Some(CourseTotals {
                total_points: FieldValue::Number(45.0),
                max_points: FieldValue::Number(50.0),
                average: "90.0%".into(),
            }),
        });

        let keys: Vec<String> = row.fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "Student Name",
                "Essay (50pts)",
                "Essay Feedback",
                "Total Points",
                "Max Points",
                "Average"
            ]
        );
    }

    #[test]
    fn test_duplicate_column_keeps_first_position() {
        let row = ExportRow::Course(CourseScopeRow {
            student_name: "Ada Lovelace".into(),
            student: None,
            cells: vec![
                CourseGradeCell {
                    assignment_title: "Quiz".into(),
                    column: "Quiz".into(),
                    value: FieldValue::Number(3.0),
                    feedback: None,
                },
                CourseGradeCell {
                    assignment_title: "Quiz".into(),
                    column: "Quiz".into(),
                    value: FieldValue::Number(8.0),
                    feedback: None,
                },
            ],
            totals: None,
        });

        let fields = row.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1], ("Quiz".to_string(), FieldValue::Number(8.0)));
    }
}
