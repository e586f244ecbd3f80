pub mod aggregate;
pub mod download;
pub mod export;
pub mod fetch;
pub mod format;
pub mod selectors;
pub mod statistics;

#[cfg(test)]
pub(crate) mod fixtures;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::config::ExportConfig;
use crate::models::grades::requests::{ExportParams, StatisticsParams};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 未注册导出配置时使用默认值（不归档）
    pub(crate) fn get_export_config(&self, request: &HttpRequest) -> ExportConfig {
        request
            .app_data::<web::Data<ExportConfig>>()
            .map(|config| config.get_ref().clone())
            .unwrap_or_default()
    }

    pub async fn export_grades(
        &self,
        request: &HttpRequest,
        params: ExportParams,
    ) -> ActixResult<HttpResponse> {
        export::export_grades(self, request, params).await
    }

    pub async fn list_courses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        selectors::list_courses(self, request).await
    }

    pub async fn list_course_assignments(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        selectors::list_course_assignments(self, request, course_id).await
    }

    pub async fn grading_statistics(
        &self,
        request: &HttpRequest,
        params: StatisticsParams,
    ) -> ActixResult<HttpResponse> {
        statistics::get_grading_statistics(self, request, params).await
    }
}
