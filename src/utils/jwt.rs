use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;

pub const ACCESS_TOKEN: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (profile ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型，只接受 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    pub fn profile_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils {
    secret: String,
    leeway: u64,
}

impl JwtUtils {
    pub fn new(secret: impl Into<String>, leeway: u64) -> Self {
        Self {
            secret: secret.into(),
            leeway,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.clone(), config.leeway)
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        &self,
        profile_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: profile_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
    }

    // 验证 JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_ref());
        let mut validation = Validation::default();
        validation.leeway = self.leeway;

        decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)
    }

    // 验证 Access Token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = self.verify_token(token)?;
        if claims.token_type != ACCESS_TOKEN {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}
