use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite};
use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub token_type: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// refresh token 有效期，用于设置 cookie 的 max-age
    pub refresh_ttl: TimeDelta,
}

fn issue(
    user_id: i64,
    role: &str,
    kind: TokenKind,
    ttl: TimeDelta,
    secret: &str,
) -> Result<String, JwtError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        token_type: kind,
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn verify(token: &str, kind: TokenKind, secret: &str) -> Result<Claims, JwtError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?
    .claims;
    if claims.token_type != kind {
        return Err(ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    pub fn access_ttl() -> TimeDelta {
        TimeDelta::minutes(AppConfig::get().jwt.access_token_expiry)
    }

    /// 勾选“记住我”时使用更长的 refresh 有效期
    pub fn refresh_ttl(remember_me: bool) -> TimeDelta {
        let jwt = &AppConfig::get().jwt;
        if remember_me {
            TimeDelta::days(jwt.refresh_token_remember_me_expiry)
        } else {
            TimeDelta::days(jwt.refresh_token_expiry)
        }
    }

    pub fn generate_access_token(user_id: i64, role: &str) -> Result<String, JwtError> {
        issue(
            user_id,
            role,
            TokenKind::Access,
            Self::access_ttl(),
            Self::secret(),
        )
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_ttl: Option<TimeDelta>,
    ) -> Result<TokenPair, JwtError> {
        let refresh_ttl = refresh_ttl.unwrap_or_else(|| Self::refresh_ttl(false));
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: issue(
                user_id,
                role,
                TokenKind::Refresh,
                refresh_ttl,
                Self::secret(),
            )?,
            refresh_ttl,
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        verify(token, TokenKind::Access, Self::secret())
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        verify(token, TokenKind::Refresh, Self::secret())
    }

    /// 用 refresh token 换取新的 access token
    pub fn refresh_token_cookie(refresh_token: &str, ttl: TimeDelta) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(ttl.num_seconds()))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 注销时下发的过期 cookie
    pub fn expired_refresh_token_cookie() -> Cookie<'static> {
        Self::refresh_token_cookie("", TimeDelta::zero())
    }

    pub fn refresh_token_from(req: &HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_issue_and_verify() {
        let token = issue(12, "teacher", TokenKind::Access, TimeDelta::minutes(5), SECRET).unwrap();
        let claims = verify(&token, TokenKind::Access, SECRET).unwrap();
        assert_eq!(claims.user_id(), Some(12));
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_token_kind_is_enforced() {
        let refresh = issue(12, "family", TokenKind::Refresh, TimeDelta::days(1), SECRET).unwrap();
        assert!(verify(&refresh, TokenKind::Access, SECRET).is_err());
        assert!(verify(&refresh, TokenKind::Refresh, SECRET).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue(1, "admin", TokenKind::Access, TimeDelta::minutes(5), SECRET).unwrap();
        assert!(verify(&token, TokenKind::Access, "another-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // 超过默认 60 秒的时钟容差
        let token = issue(1, "admin", TokenKind::Access, TimeDelta::minutes(-5), SECRET).unwrap();
        assert!(verify(&token, TokenKind::Access, SECRET).is_err());
    }
}
