use std::sync::Arc;

use crate::models::{
    assignments::entities::Assignment, courses::entities::Course,
    enrollments::entities::Enrollment, profiles::entities::Profile,
    submissions::entities::Submission,
};

use crate::errors::Result;

#[cfg(test)]
pub(crate) mod memory;
pub mod sea_orm_storage;

/// 提交查询条件
#[derive(Debug, Clone, Default)]
pub struct SubmissionQuery {
    pub assignment_ids: Vec<i64>,
    /// 只返回已评分的提交
    pub graded_only: bool,
}

/// 只读查询接口，结果均按主键升序返回（除非另有说明）
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户资料
    // 通过ID获取用户资料
    async fn get_profile_by_id(&self, id: i64) -> Result<Option<Profile>>;
    // 批量获取用户资料
    async fn list_profiles_by_ids(&self, ids: &[i64]) -> Result<Vec<Profile>>;

    /// 课程
    // 通过ID获取课程
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 列出教师的课程，按标题排序
    async fn list_courses_by_instructor(&self, instructor_id: i64) -> Result<Vec<Course>>;

    /// 作业
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 列出若干课程下的作业
    async fn list_assignments_by_course_ids(&self, course_ids: &[i64])
    -> Result<Vec<Assignment>>;

    /// 选课
    // 列出课程的有效选课记录
    async fn list_active_enrollments(&self, course_id: i64) -> Result<Vec<Enrollment>>;

    /// 提交
    async fn list_submissions(&self, query: SubmissionQuery) -> Result<Vec<Submission>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
