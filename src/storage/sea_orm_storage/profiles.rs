//! 用户资料存储操作

use super::SeaOrmStorage;
use crate::entity::profiles::{Column, Entity as Profiles};
use crate::errors::{GradebookError, Result};
use crate::models::profiles::entities::Profile;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 通过 ID 获取用户资料
    pub async fn get_profile_by_id_impl(&self, id: i64) -> Result<Option<Profile>> {
        let result = Profiles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询用户资料失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    /// 批量获取用户资料
    pub async fn list_profiles_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = Profiles::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询用户资料失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_profile()).collect())
    }
}
