use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::LazyLock;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::grades::requests::{ExportParams, StatisticsParams};
use crate::models::profiles::entities::ProfileRole;
use crate::services::GradeService;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: LazyLock<GradeService> = LazyLock::new(GradeService::new_lazy);

// 导出成绩（CSV / JSON 下载）
pub async fn export_grades(
    req: HttpRequest,
    query: web::Query<ExportParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.export_grades(&req, query.into_inner()).await
}

// 教师名下的课程
pub async fn list_courses(req: HttpRequest) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_courses(&req).await
}

// 课程下的作业
pub async fn list_course_assignments(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .list_course_assignments(&req, path.into_inner())
        .await
}

// 批改进度统计
pub async fn grading_statistics(
    req: HttpRequest,
    query: web::Query<StatisticsParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .grading_statistics(&req, query.into_inner())
        .await
}

// 配置路由
pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(RequireRole::new_any(ProfileRole::teacher_roles()))
            .wrap(RequireJWT)
            .route("/export", web::get().to(export_grades))
            .route("/courses", web::get().to(list_courses))
            .route(
                "/courses/{course_id}/assignments",
                web::get().to(list_course_assignments),
            )
            .route("/statistics", web::get().to(grading_statistics)),
    );
}
