//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{Column, Entity as Assignments};
use crate::errors::{GradebookError, Result};
use crate::models::assignments::entities::Assignment;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出若干课程下的作业
    pub async fn list_assignments_by_course_ids_impl(
        &self,
        course_ids: &[i64],
    ) -> Result<Vec<Assignment>> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = Assignments::find()
            .filter(Column::CourseId.is_in(course_ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_assignment()).collect())
    }
}
