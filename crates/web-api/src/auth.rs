//! JWT 认证模块。
//!
//! 令牌签发属于上游系统；这里只负责校验连接请求携带的 token
//! 并还原出调用方身份。校验失败一律降级为匿名身份，由角色策略
//! 决定拒绝。

use config::JwtConfig;
use domain::{Identity, UserId};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT Claims 结构
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub name: String,
    pub is_admin: bool,
    /// 过期时间 (Unix timestamp)
    pub exp: i64,
}

/// JWT Token 服务
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 生成 JWT token（测试和工具使用；生产签发在上游）。
    pub fn generate_token(
        &self,
        user_id: UserId,
        name: &str,
        is_admin: bool,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let exp = chrono::Utc::now() + chrono::Duration::hours(self.config.expiration_hours);
        let claims = Claims {
            user_id: user_id.0,
            name: name.to_owned(),
            is_admin,
            exp: exp.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// 校验 token 并还原身份；缺失或非法的 token 得到匿名身份。
    pub fn identity_from_token(&self, token: Option<&str>) -> Identity {
        let Some(token) = token else {
            return Identity::anonymous();
        };
        match decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(data) => Identity::new(
                UserId(data.claims.user_id),
                data.claims.name,
                data.claims.is_admin,
            ),
            Err(err) => {
                tracing::debug!(error = %err, "rejecting invalid token");
                Identity::anonymous()
            }
        }
    }
}
