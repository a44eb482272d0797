//! 按客户端 IP 的固定窗口限流
//!
//! ```rust,ignore
//! .route("/login", web::post().to(login).wrap(RateLimit::login()))
//! ```
//!
//! 超出限制时返回 429，并带 `Retry-After`。

use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

// 键: 前缀:IP；过期时间大于所有窗口长度
static RATE_LIMIT_WINDOWS: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(300))
        .max_capacity(100_000)
        .build()
});

#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    started: Instant,
    count: u32,
}

impl Window {
    /// 记录一次请求；返回新的窗口与距离窗口结束的秒数（被拒绝时为 Some）
    fn hit(current: Option<Window>, now: Instant, max: u32, length: Duration) -> (Window, Option<u64>) {
        let window = match current {
            Some(w) if now.duration_since(w.started) < length => w,
            _ => Window {
                started: now,
                count: 0,
            },
        };
        if window.count >= max {
            let elapsed = now.duration_since(window.started);
            let retry_after = length.saturating_sub(elapsed).as_secs().max(1);
            return (window, Some(retry_after));
        }
        (
            Window {
                count: window.count + 1,
                ..window
            },
            None,
        )
    }
}

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window: Duration,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(key_prefix: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            key_prefix,
        }
    }

    /// 登录：5 次/分钟/IP
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 刷新令牌：10 次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }
}

fn client_ip(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    info.realip_remote_addr()
        .map(|addr| {
            // 形如 "1.2.3.4:5678" 时去掉端口
            addr.parse::<std::net::SocketAddr>()
                .map(|sock| sock.ip().to_string())
                .unwrap_or_else(|_| addr.to_string())
        })
        .filter(|ip| ip.parse::<IpAddr>().is_ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::TooManyRequests()
        .insert_header(("Retry-After", retry_after.to_string()))
        .json(ApiResponse::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let key = format!("{}:{}", limit.key_prefix, client_ip(&req));
            let current = RATE_LIMIT_WINDOWS.get(&key).await;
            let (window, rejected) =
                Window::hit(current, Instant::now(), limit.max_requests, limit.window);
            RATE_LIMIT_WINDOWS.insert(key.clone(), window).await;

            if let Some(retry_after) = rejected {
                warn!("Rate limit exceeded for {} ({} requests)", key, window.count);
                return Ok(req.into_response(too_many_requests(retry_after).map_into_right_body()));
            }
            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window, Duration::from_secs(60));
        assert_eq!(RateLimit::refresh_token().max_requests, 10);
    }

    #[test]
    fn test_window_rejects_after_limit() {
        let start = Instant::now();
        let length = Duration::from_secs(60);
        let mut window = None;
        for _ in 0..3 {
            let (w, rejected) = Window::hit(window, start, 3, length);
            assert!(rejected.is_none());
            window = Some(w);
        }
        let (_, rejected) = Window::hit(window, start + Duration::from_secs(20), 3, length);
        assert_eq!(rejected, Some(40));
    }

    #[test]
    fn test_window_resets_after_length() {
        let start = Instant::now();
        let length = Duration::from_secs(60);
        let full = Window {
            started: start,
            count: 5,
        };
        let (w, rejected) = Window::hit(Some(full), start + Duration::from_secs(61), 5, length);
        assert!(rejected.is_none());
        assert_eq!(w.count, 1);
    }
}
