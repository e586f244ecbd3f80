use crate::errors::GradebookError;

/// 业务错误码，随 ApiResponse 返回给前端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    PermissionDenied = 1003,
    NotFound = 1004,

    // 课程与作业 2xxx
    CoursePermissionDenied = 2003,

    // 成绩导出 3xxx
    ExportFetchFailed = 3001,
    ExportFormatFailed = 3002,

    InternalServerError = 5000,
}

impl From<&GradebookError> for ErrorCode {
    fn from(err: &GradebookError) -> Self {
        match err {
            GradebookError::Validation(_) => ErrorCode::ValidationFailed,
            GradebookError::NotFound(_) => ErrorCode::NotFound,
            GradebookError::Authorization(_) => ErrorCode::CoursePermissionDenied,
            GradebookError::Fetch(_) => ErrorCode::ExportFetchFailed,
            GradebookError::Serialization(_) => ErrorCode::ExportFormatFailed,
            GradebookError::DatabaseConfig(_)
            | GradebookError::DatabaseConnection(_)
            | GradebookError::DatabaseOperation(_)
            | GradebookError::Save(_) => ErrorCode::InternalServerError,
        }
    }
}
