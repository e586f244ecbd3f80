//! 导出记录读取
//!
//! 按导出范围依次查询课程、作业、选课、提交与学生资料。
//! 后续查询只在前置查询返回后发起；任何读取失败都会中止整个导出。

use std::collections::BTreeSet;

use tracing::debug;

use crate::errors::{GradebookError, Result};
use crate::models::{
    assignments::entities::Assignment, courses::entities::Course,
    enrollments::entities::Enrollment, grades::entities::ExportSelection,
    profiles::entities::Profile, submissions::entities::Submission,
};
use crate::storage::{Storage, SubmissionQuery};

/// 一次导出所需的全部记录
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRecords {
    pub courses: Vec<Course>,
    pub assignments: Vec<Assignment>,
    pub enrollments: Vec<Enrollment>,
    pub submissions: Vec<Submission>,
    pub profiles: Vec<Profile>,
}

pub struct RecordFetcher<'a> {
    storage: &'a dyn Storage,
}

fn fetch_error(resource: &'static str) -> impl FnOnce(GradebookError) -> GradebookError {
    move |err| GradebookError::fetch_failed(resource, err.message())
}

impl<'a> RecordFetcher<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    pub async fn fetch(
        &self,
        requester: &Profile,
        selection: ExportSelection,
    ) -> Result<ExportRecords> {
        let records = match selection {
            ExportSelection::All => self.fetch_all(requester.id).await?,
            ExportSelection::Course(course_id) => self.fetch_course(requester, course_id).await?,
            ExportSelection::Assignment(assignment_id) => {
                self.fetch_assignment(requester, assignment_id).await?
            }
        };

        debug!(
            "Fetched export records for {:?}: {} courses, {} assignments, {} enrollments, {} submissions, {} profiles",
            selection,
            records.courses.len(),
            records.assignments.len(),
            records.enrollments.len(),
            records.submissions.len(),
            records.profiles.len()
        );

        Ok(records)
    }

    /// 读取课程并校验归属，管理员不受限制
    pub async fn owned_course(&self, requester: &Profile, course_id: i64) -> Result<Course> {
        let course = self
            .storage
            .get_course_by_id(course_id)
            .await
            .map_err(fetch_error("courses"))?
            .ok_or_else(|| GradebookError::not_found(format!("课程 {course_id} 不存在")))?;

        if course.instructor_id != requester.id && !requester.is_admin() {
            return Err(GradebookError::authorization(format!(
                "无权导出课程 {course_id} 的成绩"
            )));
        }

        Ok(course)
    }

    async fn fetch_all(&self, instructor_id: i64) -> Result<ExportRecords> {
        let courses = self
            .storage
            .list_courses_by_instructor(instructor_id)
            .await
            .map_err(fetch_error("courses"))?;
        if courses.is_empty() {
            return Err(GradebookError::not_found("No courses found"));
        }

        let course_ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
        let assignments = self
            .storage
            .list_assignments_by_course_ids(&course_ids)
            .await
            .map_err(fetch_error("assignments"))?;

        let submissions = self
            .storage
            .list_submissions(SubmissionQuery {
                assignment_ids: assignments.iter().map(|a| a.id).collect(),
                graded_only: true,
            })
            .await
            .map_err(fetch_error("submissions"))?;

        let student_ids: BTreeSet<i64> = submissions.iter().map(|s| s.student_id).collect();
        let profiles = self.fetch_profiles(student_ids).await?;

        Ok(ExportRecords {
            courses,
            assignments,
            enrollments: Vec::new(),
            submissions,
            profiles,
        })
    }

    async fn fetch_course(&self, requester: &Profile, course_id: i64) -> Result<ExportRecords> {
        let course = self.owned_course(requester, course_id).await?;

        let assignments = self
            .storage
            .list_assignments_by_course_ids(&[course.id])
            .await
            .map_err(fetch_error("assignments"))?;

        let enrollments = self
            .storage
            .list_active_enrollments(course.id)
            .await
            .map_err(fetch_error("enrollments"))?;

        let submissions = self
            .storage
            .list_submissions(SubmissionQuery {
                assignment_ids: assignments.iter().map(|a| a.id).collect(),
                graded_only: true,
            })
            .await
            .map_err(fetch_error("submissions"))?;

        let profiles = self
            .fetch_profiles(enrollments.iter().map(|e| e.student_id).collect())
            .await?;

        Ok(ExportRecords {
            courses: vec![course],
            assignments,
            enrollments,
            submissions,
            profiles,
        })
    }

    async fn fetch_assignment(
        &self,
        requester: &Profile,
        assignment_id: i64,
    ) -> Result<ExportRecords> {
        let assignment = self
            .storage
            .get_assignment_by_id(assignment_id)
            .await
            .map_err(fetch_error("assignments"))?
            .ok_or_else(|| GradebookError::not_found(format!("作业 {assignment_id} 不存在")))?;

        let course = self.owned_course(requester, assignment.course_id).await?;

        let enrollments = self
            .storage
            .list_active_enrollments(course.id)
            .await
            .map_err(fetch_error("enrollments"))?;

        let submissions = self
            .storage
            .list_submissions(SubmissionQuery {
                assignment_ids: vec![assignment.id],
                graded_only: false,
            })
            .await
            .map_err(fetch_error("submissions"))?;

        let profiles = self
            .fetch_profiles(enrollments.iter().map(|e| e.student_id).collect())
            .await?;

        Ok(ExportRecords {
            courses: vec![course],
            assignments: vec![assignment],
            enrollments,
            submissions,
            profiles,
        })
    }

    async fn fetch_profiles(&self, student_ids: BTreeSet<i64>) -> Result<Vec<Profile>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = student_ids.into_iter().collect();
        self.storage
            .list_profiles_by_ids(&ids)
            .await
            .map_err(fetch_error("profiles"))
    }
}
