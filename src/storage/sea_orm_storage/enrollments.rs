//! 选课存储操作

use super::SeaOrmStorage;
use crate::entity::enrollments::{Column, Entity as Enrollments};
use crate::errors::{GradebookError, Result};
use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 列出课程的有效选课记录
    pub async fn list_active_enrollments_impl(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        let results = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Status.eq(EnrollmentStatus::ACTIVE))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_enrollment()).collect())
    }
}
