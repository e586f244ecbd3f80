//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{Column, Entity as Submissions};
use crate::errors::{GradebookError, Result};
use crate::models::submissions::entities::Submission;
use crate::storage::SubmissionQuery;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 列出若干作业下的提交
    pub async fn list_submissions_impl(&self, query: SubmissionQuery) -> Result<Vec<Submission>> {
        if query.assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut select = Submissions::find().filter(Column::AssignmentId.is_in(query.assignment_ids));

        // 仅已评分
        if query.graded_only {
            select = select.filter(Column::Grade.is_not_null());
        }

        let results = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }
}
