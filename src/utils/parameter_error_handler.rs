//! 请求参数解析失败时返回统一的 400 响应

use actix_web::{HttpRequest, HttpResponse, error, error::InternalError};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(req: &HttpRequest, kind: &str, detail: String) -> error::Error {
    debug!("Invalid {} for {}: {}", kind, req.path(), detail);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("{kind}参数错误: {detail}"),
    ));
    InternalError::from_response(detail, response).into()
}

pub fn query_error_handler(err: error::QueryPayloadError, req: &HttpRequest) -> error::Error {
    bad_request(req, "查询", err.to_string())
}

pub fn path_error_handler(err: error::PathError, req: &HttpRequest) -> error::Error {
    bad_request(req, "路径", err.to_string())
}
