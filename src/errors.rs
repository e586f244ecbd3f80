//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_gradebook_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum GradebookError {
            $($variant(String),)*
        }

        impl GradebookError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(GradebookError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GradebookError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradebookError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_gradebook_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    Fetch("E005", "Fetch Error"),
    Save("E006", "Save Error"),
    NotFound("E007", "Resource Not Found"),
    Serialization("E008", "Serialization Error"),
    Authorization("E009", "Authorization Error"),
}

impl GradebookError {
    /// 读取某类记录失败，消息以资源名开头
    pub fn fetch_failed(resource: &str, err: impl fmt::Display) -> Self {
        GradebookError::Fetch(format!("{resource}: {err}"))
    }

    /// Fetch 错误对应的资源名
    pub fn resource(&self) -> Option<&str> {
        match self {
            GradebookError::Fetch(msg) => msg.split_once(':').map(|(resource, _)| resource),
            _ => None,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GradebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GradebookError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GradebookError {
    fn from(err: sea_orm::DbErr) -> Self {
        GradebookError::DatabaseOperation(err.to_string())
    }
}

// 只有导出文件落盘会产生 IO 错误
impl From<std::io::Error> for GradebookError {
    fn from(err: std::io::Error) -> Self {
        GradebookError::Save(err.to_string())
    }
}

impl From<serde_json::Error> for GradebookError {
    fn from(err: serde_json::Error) -> Self {
        GradebookError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for GradebookError {
    fn from(err: csv::Error) -> Self {
        GradebookError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GradebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GradebookError::database_config("test").code(), "E001");
        assert_eq!(GradebookError::validation("test").code(), "E004");
        assert_eq!(GradebookError::fetch("test").code(), "E005");
        assert_eq!(GradebookError::save("test").code(), "E006");
        assert_eq!(GradebookError::authorization("test").code(), "E009");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            GradebookError::validation("test").error_type(),
            "Validation Error"
        );
        assert_eq!(GradebookError::save("test").error_type(), "Save Error");
    }

    #[test]
    fn test_error_message() {
        let err = GradebookError::validation("course_id is required");
        assert_eq!(err.message(), "course_id is required");
    }

    #[test]
    fn test_fetch_failed_keeps_resource() {
        let err = GradebookError::fetch_failed("enrollments", "connection reset");
        assert_eq!(err.code(), "E005");
        assert_eq!(err.resource(), Some("enrollments"));
        assert!(err.message().contains("connection reset"));
        assert_eq!(GradebookError::validation("x").resource(), None);
    }

    #[test]
    fn test_io_error_becomes_save_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: GradebookError = io.into();
        assert_eq!(err.error_type(), "Save Error");
    }

    #[test]
    fn test_format_simple() {
        let err = GradebookError::validation("Invalid scope");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid scope"));
    }
}
