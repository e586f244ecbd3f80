//! 导出范围选择器的数据源：教师的课程与课程下的作业

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::GradeService;
use super::fetch::RecordFetcher;
use crate::middlewares::RequireJWT;
use crate::models::grades::responses::{AssignmentOption, CourseOption};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_courses(
    service: &GradeService,
    request: &HttpRequest,
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

    match storage.list_courses_by_instructor(requester.id).await {
        Ok(courses) => {
            let items: Vec<CourseOption> = courses.into_iter().map(CourseOption::from).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items, "获取成功")))
        }
        Err(e) => {
            error!("Failed to list courses for user {}: {}", requester.id, e);
            Ok(ApiResponse::from_error(&e))
        }
    }
}

pub async fn list_course_assignments(
    service: &GradeService,
    request: &HttpRequest,
    course_id: i64,
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

    if let Err(e) = RecordFetcher::new(storage.as_ref())
        .owned_course(&requester, course_id)
        .await
    {
        return Ok(ApiResponse::from_error(&e));
    }

    match storage.list_assignments_by_course_ids(&[course_id]).await {
        Ok(mut assignments) => {
            // 截止时间倒序，无截止时间的排在最后
            assignments.sort_by(|a, b| b.due_date.cmp(&a.due_date).then(a.id.cmp(&b.id)));
            let items: Vec<AssignmentOption> =
                assignments.into_iter().map(AssignmentOption::from).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items, "获取成功")))
        }
        Err(e) => {
            error!("Failed to list assignments of course {}: {}", course_id, e);
            Ok(ApiResponse::from_error(&e))
        }
    }
}
