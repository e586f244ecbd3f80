//! 测试用内存存储

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::{GradebookError, Result};
use crate::models::{
    assignments::entities::Assignment, courses::entities::Course,
    enrollments::entities::Enrollment, profiles::entities::Profile,
    submissions::entities::Submission,
};
use crate::storage::{Storage, SubmissionQuery};

#[derive(Default)]
pub(crate) struct MemoryStorage {
    pub profiles: Vec<Profile>,
    pub courses: Vec<Course>,
    pub assignments: Vec<Assignment>,
    pub enrollments: Vec<Enrollment>,
    pub submissions: Vec<Submission>,
    /// 模拟某张表读取失败
    pub fail_on: Option<&'static str>,
    pub calls: AtomicUsize,
}

impl MemoryStorage {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self, table: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on == Some(table) {
            return Err(GradebookError::database_operation(format!(
                "simulated failure reading {table}"
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get_profile_by_id(&self, id: i64) -> Result<Option<Profile>> {
        self.touch("profiles")?;
        Ok(self.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn list_profiles_by_ids(&self, ids: &[i64]) -> Result<Vec<Profile>> {
        self.touch("profiles")?;
        Ok(self
            .profiles
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.touch("courses")?;
        Ok(self.courses.iter().find(|c| c.id == course_id).cloned())
    }

    async fn list_courses_by_instructor(&self, instructor_id: i64) -> Result<Vec<Course>> {
        self.touch("courses")?;
        let mut courses: Vec<Course> = self
            .courses
            .iter()
            .filter(|c| c.instructor_id == instructor_id)
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(courses)
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.touch("assignments")?;
        Ok(self
            .assignments
            .iter()
            .find(|a| a.id == assignment_id)
            .cloned())
    }

    async fn list_assignments_by_course_ids(
        &self,
        course_ids: &[i64],
    ) -> Result<Vec<Assignment>> {
        self.touch("assignments")?;
        Ok(self
            .assignments
            .iter()
            .filter(|a| course_ids.contains(&a.course_id))
            .cloned()
            .collect())
    }

    async fn list_active_enrollments(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        self.touch("enrollments")?;
        Ok(self
            .enrollments
            .iter()
            .filter(|e| e.course_id == course_id && e.is_active())
            .cloned()
            .collect())
    }

    async fn list_submissions(&self, query: SubmissionQuery) -> Result<Vec<Submission>> {
        self.touch("submissions")?;
        Ok(self
            .submissions
            .iter()
            .filter(|s| query.assignment_ids.contains(&s.assignment_id))
            .filter(|s| !query.graded_only || s.is_graded())
            .cloned()
            .collect())
    }
}
