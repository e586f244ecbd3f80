//! 成绩聚合
//!
//! 把读取到的记录按导出范围整理为行。纯函数，不访问存储。

use std::collections::HashMap;

use crate::models::{
    assignments::entities::Assignment,
    courses::entities::Course,
    grades::{
        entities::{ExportOptions, ExportScope},
        rows::{
            AllScopeAssignmentColumns, AllScopeRow, AssignmentScopeColumns, AssignmentScopeRow,
            CourseGradeCell, CourseScopeRow, CourseTotals, ExportRow, FieldValue, NOT_AVAILABLE,
            NOT_SUBMITTED, StudentColumns, SubmissionState,
        },
    },
    profiles::entities::Profile,
    submissions::entities::Submission,
};

use super::fetch::ExportRecords;

const UNKNOWN_STUDENT: &str = "Unknown Student";

/// 得分百分比，保留一位小数（逢五进位）；满分不大于 0 或没有分数时为 "N/A"
pub fn percentage(grade: Option<f64>, max_points: f64) -> String {
    match grade {
        Some(grade) if max_points > 0.0 => {
            let value = grade / max_points * 100.0;
            // `{:.1}` 对恰好落在 .x5 的值取偶，这里先按一位小数四舍五入
            format!("{:.1}%", (value * 10.0).round() / 10.0)
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn aggregate(
    scope: ExportScope,
    records: &ExportRecords,
    options: &ExportOptions,
) -> Vec<ExportRow> {
    let lookup = Lookup::new(records);
    match scope {
        ExportScope::All => aggregate_all(records, &lookup, options),
        ExportScope::Course => aggregate_course(records, &lookup, options),
        ExportScope::Assignment => aggregate_assignment(records, &lookup, options),
    }
}

struct Lookup<'a> {
    profiles: HashMap<i64, &'a Profile>,
    courses: HashMap<i64, &'a Course>,
    assignments: HashMap<i64, &'a Assignment>,
}

impl<'a> Lookup<'a> {
    fn new(records: &'a ExportRecords) -> Self {
        Self {
            profiles: records.profiles.iter().map(|p| (p.id, p)).collect(),
            courses: records.courses.iter().map(|c| (c.id, c)).collect(),
            assignments: records.assignments.iter().map(|a| (a.id, a)).collect(),
        }
    }

    fn student_name(&self, student_id: i64) -> String {
        self.profiles
            .get(&student_id)
            .map(|p| p.full_name())
            .unwrap_or_else(|| UNKNOWN_STUDENT.to_string())
    }

    fn student_columns(&self, student_id: i64, options: &ExportOptions) -> Option<StudentColumns> {
        if !options.include_student_details {
            return None;
        }
        let profile = self.profiles.get(&student_id);
        Some(StudentColumns {
            student_code: profile.and_then(|p| p.student_code.clone()),
            email: profile.map(|p| p.email.clone()).unwrap_or_default(),
        })
    }
}

/// 每个 (作业, 学生) 只保留最新的一次提交
fn latest_submissions<'a>(
    submissions: impl Iterator<Item = &'a Submission>,
) -> HashMap<(i64, i64), &'a Submission> {
    let mut latest: HashMap<(i64, i64), &Submission> = HashMap::new();
    for submission in submissions {
        let key = (submission.assignment_id, submission.student_id);
        match latest.get(&key) {
            Some(current) if (current.submitted_at, current.id) >= (submission.submitted_at, submission.id) => {}
            _ => {
                latest.insert(key, submission);
            }
        }
    }
    latest
}

fn aggregate_all(
    records: &ExportRecords,
    lookup: &Lookup<'_>,
    options: &ExportOptions,
) -> Vec<ExportRow> {
    records
        .submissions
        .iter()
        .filter_map(|submission| {
            let grade = submission.grade?;
            let assignment = lookup.assignments.get(&submission.assignment_id)?;
            let course = lookup.courses.get(&assignment.course_id)?;

            Some(ExportRow::All(AllScopeRow {
                student_name: lookup.student_name(submission.student_id),
                grade,
                percentage: percentage(Some(grade), assignment.points),
                student: lookup.student_columns(submission.student_id, options),
                assignment: options
                    .include_assignment_details
                    .then(|| AllScopeAssignmentColumns {
                        title: assignment.title.clone(),
                        course_code: course.code.clone(),
                        course_title: course.title.clone(),
                        max_points: assignment.points,
                    }),
                feedback: options
                    .include_feedback
                    .then(|| submission.feedback.clone().unwrap_or_default()),
            }))
        })
        .collect()
}

fn aggregate_course(
    records: &ExportRecords,
    lookup: &Lookup<'_>,
    options: &ExportOptions,
) -> Vec<ExportRow> {
    let graded = latest_submissions(records.submissions.iter().filter(|s| s.is_graded()));

    records
        .enrollments
        .iter()
        .map(|enrollment| {
            let student_id = enrollment.student_id;
            let mut total_points = 0.0;
            let mut max_points = 0.0;
            let mut graded_count = 0usize;

            let cells = records
                .assignments
                .iter()
                .map(|assignment| {
                    let submission = graded.get(&(assignment.id, student_id));
                    let value = match submission.and_then(|s| s.grade) {
                        Some(grade) => {
                            total_points += grade;
                            max_points += assignment.points;
                            graded_count += 1;
                            FieldValue::Number(grade)
                        }
                        None => FieldValue::from(NOT_SUBMITTED),
                    };
                    let column = if options.include_assignment_details {
                        format!("{} ({}pts)", assignment.title, assignment.points)
                    } else {
                        assignment.title.clone()
                    };

                    CourseGradeCell {
                        assignment_title: assignment.title.clone(),
                        column,
                        value,
                        feedback: submission
                            .filter(|_| options.include_feedback)
                            .map(|s| s.feedback.clone().unwrap_or_default()),
                    }
                })
                .collect::<Vec<_>>();

            let totals = (!records.assignments.is_empty()).then(|| {
                if graded_count == 0 {
                    CourseTotals {
                        total_points: FieldValue::from("0"),
                        max_points: FieldValue::from("0"),
                        average: NOT_AVAILABLE.to_string(),
                    }
                } else {
                    CourseTotals {
                        total_points: FieldValue::Number(total_points),
                        max_points: FieldValue::Number(max_points),
                        average: percentage(Some(total_points), max_points),
                    }
                }
            });

            ExportRow::Course(CourseScopeRow {
                student_name: lookup.student_name(student_id),
                student: lookup.student_columns(student_id, options),
                cells,
                totals,
            })
        })
        .collect()
}

fn aggregate_assignment(
    records: &ExportRecords,
    lookup: &Lookup<'_>,
    options: &ExportOptions,
) -> Vec<ExportRow> {
    let Some(assignment) = records.assignments.first() else {
        return Vec::new();
    };
    let course_code = lookup
        .courses
        .get(&assignment.course_id)
        .map(|c| c.code.clone())
        .unwrap_or_default();
    let latest = latest_submissions(
        records
            .submissions
            .iter()
            .filter(|s| s.assignment_id == assignment.id),
    );

    records
        .enrollments
        .iter()
        .map(|enrollment| {
            let student_id = enrollment.student_id;
            let submission = latest.get(&(assignment.id, student_id)).copied();
            let grade = submission.and_then(|s| s.grade);

            let status = match submission {
                None => SubmissionState::NotSubmitted,
                Some(s) if s.is_graded() => SubmissionState::Graded,
                Some(_) => SubmissionState::Submitted,
            };

            ExportRow::Assignment(AssignmentScopeRow {
                student_name: lookup.student_name(student_id),
                status,
                grade: grade.map_or_else(|| FieldValue::from(NOT_AVAILABLE), FieldValue::Number),
                student: lookup.student_columns(student_id, options),
                assignment: options
                    .include_assignment_details
                    .then(|| AssignmentScopeColumns {
                        title: assignment.title.clone(),
                        course_code: course_code.clone(),
                        max_points: assignment.points,
                    }),
                percentage: percentage(grade, assignment.points),
                feedback: options
                    .include_feedback
                    .then(|| submission.and_then(|s| s.feedback.clone()).unwrap_or_default()),
                submission_date: submission
                    .map(|s| s.submitted_at.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| NOT_SUBMITTED.to_string()),
            })
        })
        .collect()
}
