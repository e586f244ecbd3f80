use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::GradeService;
use super::fetch::RecordFetcher;
use crate::middlewares::RequireJWT;
use crate::models::grades::{requests::StatisticsParams, responses::GradingStatistics};
use crate::models::submissions::entities::Submission;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::SubmissionQuery;

/// 批改进度统计，没有提交时完成率为 0
pub fn grading_statistics(submissions: &[Submission]) -> GradingStatistics {
    let total = submissions.len() as i64;
    let graded = submissions.iter().filter(|s| s.is_graded()).count() as i64;
    let completion = if total > 0 {
        (graded as f64 / total as f64 * 100.0).round() as i64
    } else {
        0
    };

    GradingStatistics {
        pending_count: total - graded,
        graded_count: graded,
        total_submissions: total,
        completion_percentage: completion,
    }
}

pub async fn get_grading_statistics(
    service: &GradeService,
    request: &HttpRequest,
    params: StatisticsParams,
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

    // 指定课程时校验归属，否则统计名下全部课程
    let course_ids = match params.course_id {
        Some(course_id) => {
            match RecordFetcher::new(storage.as_ref())
                .owned_course(&requester, course_id)
                .await
            {
                Ok(course) => vec![course.id],
                Err(e) => return Ok(ApiResponse::from_error(&e)),
            }
        }
        None => match storage.list_courses_by_instructor(requester.id).await {
            Ok(courses) => courses.into_iter().map(|c| c.id).collect(),
            Err(e) => {
                error!("Failed to list courses for statistics: {}", e);
                return Ok(ApiResponse::from_error(&e));
            }
        },
    };

    let assignment_ids = match storage.list_assignments_by_course_ids(&course_ids).await {
        Ok(assignments) => assignments.into_iter().map(|a| a.id).collect::<Vec<_>>(),
        Err(e) => {
            error!("Failed to list assignments for statistics: {}", e);
            return Ok(ApiResponse::from_error(&e));
        }
    };

    let submissions = if assignment_ids.is_empty() {
        Vec::new()
    } else {
        match storage
            .list_submissions(SubmissionQuery {
                assignment_ids,
                graded_only: false,
            })
            .await
        {
            Ok(submissions) => submissions,
            Err(e) => {
                error!("Failed to list submissions for statistics: {}", e);
                return Ok(ApiResponse::from_error(&e));
            }
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        grading_statistics(&submissions),
        "获取成功",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::grades::fixtures::submission;

    #[test]
    fn test_statistics_counts() {
        let submissions = vec![
            submission(1, 101, 10, Some(90.0), None),
            submission(2, 101, 11, None, None),
            submission(3, 102, 10, Some(0.0), None),
        ];
        let stats = grading_statistics(&submissions);
        assert_eq!(stats.graded_count, 2);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.total_submissions, 3);
        assert_eq!(stats.completion_percentage, 67);
    }

    #[test]
    fn test_statistics_without_submissions() {
        let stats = grading_statistics(&[]);
        assert_eq!(stats.total_submissions, 0);
        assert_eq!(stats.completion_percentage, 0);
    }
}
