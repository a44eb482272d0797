//! 请求体与查询参数解析失败时返回统一的 ApiResponse

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    let message = format!("Invalid request body: {err}");
    tracing::debug!("{} {}: {}", req.method(), req.path(), message);
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    let message = format!("Invalid query parameters: {err}");
    tracing::debug!("{} {}: {}", req.method(), req.path(), message);
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}
