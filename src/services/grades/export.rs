//! 成绩导出
//!
//! 校验参数 → 读取记录 → 聚合 → 格式化 → 生成下载文件（可选归档）。

use std::path::PathBuf;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::NaiveDate;
use tracing::{error, info, warn};

use super::GradeService;
use super::aggregate::aggregate;
use super::download::{ArchiveStatus, ExportDocument};
use super::fetch::RecordFetcher;
use super::format::format;
use crate::errors::{GradebookError, Result};
use crate::middlewares::RequireJWT;
use crate::models::grades::{entities::ExportSelection, requests::ExportParams};
use crate::models::profiles::entities::Profile;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 生成导出文件，不涉及 HTTP
pub async fn build_export(
    storage: &dyn Storage,
    requester: &Profile,
    params: &ExportParams,
    date: NaiveDate,
) -> Result<ExportDocument> {
    // 选择器缺失时不发起任何查询
    let selection =
        ExportSelection::from_params(params.scope, params.course_id, params.assignment_id)?;

    let records = RecordFetcher::new(storage).fetch(requester, selection).await?;
    let rows = aggregate(selection.scope(), &records, &params.options());
    let body = format(&rows, params.format, params.include_headers)?;

    Ok(ExportDocument::new(params.format, body, date))
}

pub async fn export_grades(
    service: &GradeService,
    request: &HttpRequest,
    params: ExportParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let requester = match RequireJWT::extract_profile(request) {
        Some(profile) => profile,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    let today = chrono::Utc::now().date_naive();
    let document = match build_export(storage.as_ref(), &requester, &params, today).await {
        Ok(document) => document,
        Err(e) => {
            match &e {
                GradebookError::Validation(_)
                | GradebookError::NotFound(_)
                | GradebookError::Authorization(_) => {
                    warn!("Grade export rejected for user {}: {}", requester.id, e)
                }
                _ => error!("Grade export failed for user {}: {}", requester.id, e),
            }
            return Ok(ApiResponse::from_error(&e));
        }
    };

    info!(
        "User {} exported grades (scope: {}, format: {:?}, {} bytes)",
        requester.id,
        params.scope,
        params.format,
        document.body.len()
    );

    let archive = match service.get_export_config(request).archive_dir() {
        Some(dir) => archive_document(&document, PathBuf::from(dir)).await,
        None => ArchiveStatus::Disabled,
    };

    Ok(document.into_response(archive))
}

/// 归档失败只记录警告，不影响下载
async fn archive_document(document: &ExportDocument, dir: PathBuf) -> ArchiveStatus {
    let to_save = document.clone();
    match web::block(move || to_save.save_to(&dir)).await {
        Ok(Ok(path)) => {
            info!("Archived grade export to {}", path.display());
            ArchiveStatus::Saved
        }
        Ok(Err(e)) => {
            warn!("Failed to archive grade export: {}", e);
            ArchiveStatus::Failed
        }
        Err(e) => {
            warn!("Archive task aborted: {}", e);
            ArchiveStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::entities::{ExportFormat, ExportScope};
    use crate::services::grades::fixtures::{instructor, sample_storage};

    fn params(scope: ExportScope, format: ExportFormat) -> ExportParams {
        ExportParams {
            scope,
            format,
            course_id: None,
            assignment_id: None,
            include_headers: true,
            include_student_details: true,
            include_assignment_details: true,
            include_feedback: false,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[tokio::test]
    async fn test_missing_selector_makes_no_queries() {
        let storage = sample_storage();
        let err = build_export(
            &storage,
            &instructor(),
            &params(ExportScope::Course, ExportFormat::Csv),
            date(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.error_type(), "Validation Error");
        assert_eq!(storage.call_count(), 0);
    }

    #[tokio::test]
    async fn test_course_export_csv() {
        let storage = sample_storage();
        let mut p = params(ExportScope::Course, ExportFormat::Csv);
        p.course_id = Some(1);

        let doc = build_export(&storage, &instructor(), &p, date()).await.unwrap();
        assert_eq!(doc.file_name, "grades-export-2025-03-14.csv");

        let lines: Vec<&str> = doc.body.lines().collect();
        assert_eq!(
            lines[0],
            "\"Student Name\",\"Student ID\",\"Student Email\",\"Homework 1 (100pts)\",\"Essay (50pts)\",\"Total Points\",\"Max Points\",\"Average\""
        );
        assert_eq!(
            lines[1],
            "\"Ada Lovelace\",\"S010\",\"ada@example.edu\",\"90\",\"40\",\"130\",\"150\",\"86.7%\""
        );
        // 11 只有一次 0 分
        assert_eq!(
            lines[2],
            "\"Alan Turing\",\"\",\"alan@example.edu\",\"Not Submitted\",\"0\",\"0\",\"50\",\"0.0%\""
        );
        assert_eq!(
            lines[3],
            "\"Grace Hopper\",\"S012\",\"grace@example.edu\",\"Not Submitted\",\"Not Submitted\",\"0\",\"0\",\"N/A\""
        );
        assert_eq!(lines.len(), 4);
    }

    #[tokio::test]
    async fn test_all_export_json() {
        let storage = sample_storage();
        let doc = build_export(
            &storage,
            &instructor(),
            &params(ExportScope::All, ExportFormat::Json),
            date(),
        )
        .await
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&doc.body).unwrap();
        let rows = value.as_array().unwrap();
        // 已评分提交：1001、1002、1004、1005
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["Student Name"], "Ada Lovelace");
        assert_eq!(rows[0]["Course Title"], "Algorithms");
        assert_eq!(rows[2]["Course"], "CS201");
        assert_eq!(rows[3]["Percentage"], "0.0%");
    }

    #[tokio::test]
    async fn test_instructor_without_courses_aborts_export() {
        let storage = sample_storage();
        let mut other = instructor();
        other.id = 42;

        let err = build_export(
            &storage,
            &other,
            &params(ExportScope::All, ExportFormat::Csv),
            date(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.error_type(), "Resource Not Found");
        assert_eq!(err.message(), "No courses found");
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_export() {
        let mut storage = sample_storage();
        storage.fail_on = Some("submissions");
        let mut p = params(ExportScope::Assignment, ExportFormat::Csv);
        p.assignment_id = Some(101);

        let err = build_export(&storage, &instructor(), &p, date())
            .await
            .unwrap_err();
        assert_eq!(err.resource(), Some("submissions"));
    }
}
