//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::courses::{Column, Entity as Courses};
use crate::errors::{GradebookError, Result};
use crate::models::courses::entities::Course;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 列出教师的课程（按标题排序）
    pub async fn list_courses_by_instructor_impl(&self, instructor_id: i64) -> Result<Vec<Course>> {
        let results = Courses::find()
            .filter(Column::InstructorId.eq(instructor_id))
            .order_by_asc(Column::Title)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_course()).collect())
    }
}
