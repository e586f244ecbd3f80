//! 导出文件：下载响应与归档落盘

use std::path::{Path, PathBuf};

use actix_web::HttpResponse;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::grades::entities::ExportFormat;

/// 归档结果响应头
pub const ARCHIVE_HEADER: &str = "X-Export-Archive";

/// 格式化好的导出文件
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub file_name: String,
    pub format: ExportFormat,
    pub body: String,
}

/// 归档状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveStatus {
    Disabled,
    Saved,
    Failed,
}

impl ExportDocument {
    pub fn new(format: ExportFormat, body: String, date: NaiveDate) -> Self {
        Self {
            file_name: Self::file_name_for(format, date),
            format,
            body,
        }
    }

    pub fn file_name_for(format: ExportFormat, date: NaiveDate) -> String {
        format!(
            "grades-export-{}.{}",
            date.format("%Y-%m-%d"),
            format.extension()
        )
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    /// 写入归档目录，目录不存在时创建
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.body.as_bytes())?;
        Ok(path)
    }

    pub fn into_response(self, archive: ArchiveStatus) -> HttpResponse {
        let mut response = HttpResponse::Ok();
        response.content_type(self.content_type()).insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", self.file_name),
        ));
        match archive {
            ArchiveStatus::Saved => {
                response.insert_header((ARCHIVE_HEADER, "saved"));
            }
            ArchiveStatus::Failed => {
                response.insert_header((ARCHIVE_HEADER, "failed"));
            }
            ArchiveStatus::Disabled => {}
        }
        response.body(self.body)
    }
}
