/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <JWT_TOKEN>`，再按令牌中的 profile ID 从存储读取用户资料，
 * 存入请求扩展供处理程序使用。
 *
 * ```rust,ignore
 * web::scope("/api/v1/grades")
 *     .wrap(RequireJWT)
 *     .route("/courses", web::get().to(list_courses))
 * ```
 *
 * 处理程序中通过 [`RequireJWT::extract_profile`] 获取当前用户。
 *
 * 令牌校验使用 app_data 中的 `JwtConfig`，未注册时回退到全局配置。
 */

use crate::config::{AppConfig, JwtConfig};
use crate::models::profiles::entities::{Profile, ProfileRole};
use crate::models::ErrorCode;
use crate::storage::Storage;
use crate::utils::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

fn jwt_utils(req: &ServiceRequest) -> JwtUtils {
    match req.app_data::<web::Data<JwtConfig>>() {
        Some(config) => JwtUtils::from_config(config.get_ref()),
        None => JwtUtils::from_config(&AppConfig::get().jwt),
    }
}

// 辅助函数：提取并验证 JWT access token，返回对应的用户资料
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<Profile, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = jwt_utils(req).verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let profile_id = claims
        .profile_id()
        .ok_or_else(|| "Invalid profile ID in JWT".to_string())?;

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| "Storage not configured".to_string())?
        .get_ref()
        .clone();

    storage
        .get_profile_by_id(profile_id)
        .await
        .map_err(|err| {
            info!("Failed to load profile {}: {}", profile_id, err);
            "Failed to retrieve profile from storage".to_string()
        })?
        .ok_or_else(|| "Profile not found".to_string())
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(profile) => {
                    debug!("JWT authentication successful for ID: {}", profile.id);
                    req.extensions_mut().insert(profile);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取用户资料
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_profile(req: &actix_web::HttpRequest) -> Option<Profile> {
        req.extensions().get::<Profile>().cloned()
    }

    /// 从请求扩展中提取用户角色
    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<ProfileRole> {
        req.extensions()
            .get::<Profile>()
            .map(|profile| profile.role.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::grades::fixtures::sample_storage;
    use crate::utils::jwt::ACCESS_TOKEN;
    use actix_web::{App, HttpRequest, HttpResponse, test};

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match RequireJWT::extract_profile(&req) {
            Some(profile) => HttpResponse::Ok().body(profile.full_name()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    fn token_for(profile_id: i64) -> String {
        JwtUtils::new("secret", 0)
            .generate_token_with_expiry(
                profile_id,
                "teacher",
                ACCESS_TOKEN,
                chrono::Duration::minutes(5),
            )
            .unwrap()
    }

    macro_rules! app {
        () => {{
            let storage: Arc<dyn Storage> = Arc::new(sample_storage());
            test::init_service(
                App::new()
                    .app_data(web::Data::new(storage))
                    .app_data(web::Data::new(JwtConfig {
                        secret: "secret".to_string(),
                        leeway: 0,
                    }))
                    .service(
                        web::scope("/api")
                            .wrap(RequireJWT)
                            .route("/me", web::get().to(whoami)),
                    ),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_valid_token_loads_profile() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {}", token_for(1))))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"Barbara Liskov");
    }

    #[actix_web::test]
    async fn test_missing_or_unknown_token_is_unauthorized() {
        let app = app!();

        let req = test::TestRequest::get().uri("/api/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // 令牌有效但用户不存在
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {}", token_for(404))))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
