use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::GradebookError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 将业务错误转换为对应状态码的 HTTP 响应
    pub fn from_error(err: &GradebookError) -> HttpResponse {
        let body = Self::error_empty(ErrorCode::from(err), err.format_simple());
        match err {
            GradebookError::Validation(_) => HttpResponse::BadRequest().json(body),
            GradebookError::NotFound(_) => HttpResponse::NotFound().json(body),
            GradebookError::Authorization(_) => HttpResponse::Forbidden().json(body),
            _ => HttpResponse::InternalServerError().json(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_from_error_status() {
        let cases = [
            (GradebookError::validation("x"), StatusCode::BAD_REQUEST),
            (GradebookError::not_found("x"), StatusCode::NOT_FOUND),
            (GradebookError::authorization("x"), StatusCode::FORBIDDEN),
            (GradebookError::fetch_failed("courses", "x"), StatusCode::INTERNAL_SERVER_ERROR),
            (GradebookError::save("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiResponse::from_error(&err).status(), status);
        }
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(&GradebookError::fetch("x")),
            ErrorCode::ExportFetchFailed
        );
        assert_eq!(
            ErrorCode::from(&GradebookError::serialization("x")),
            ErrorCode::ExportFormatFailed
        );
    }
}
