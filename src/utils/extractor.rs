//! 路径参数提取器：非正整数的 ID 直接返回 400

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(raw: Option<&str>) -> Option<i64> {
    raw?.parse::<i64>().ok().filter(|id| *id > 0)
}

macro_rules! define_safe_id {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let raw = req.match_info().get($param);
                ready(match parse_positive_id(raw) {
                    Some(id) => Ok($name(id)),
                    None => {
                        let message = format!("Invalid path parameter '{}': {:?}", $param, raw);
                        let response = HttpResponse::BadRequest()
                            .json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
                        Err(InternalError::from_response(message, response).into())
                    }
                })
            }
        }
    };
}

define_safe_id!(SafeIDI64, "id");
define_safe_id!(SafeCourseIdI64, "course_id");
define_safe_id!(SafeSessionIdI64, "session_id");
define_safe_id!(SafeStudentIdI64, "student_id");
define_safe_id!(SafeTeacherIdI64, "teacher_id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id(Some("42")), Some(42));
        assert_eq!(parse_positive_id(Some("0")), None);
        assert_eq!(parse_positive_id(Some("-3")), None);
        assert_eq!(parse_positive_id(Some("abc")), None);
        assert_eq!(parse_positive_id(None), None);
    }
}
