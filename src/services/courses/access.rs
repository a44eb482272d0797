//! 课程与课时的访问控制：管理员不受限，教师只能操作自己任教的课程

use actix_web::{HttpRequest, HttpResponse};

use crate::middlewares::RequireJWT;
use crate::models::courses::entities::CourseSession;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

fn internal_error(context: &str, e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {e}"),
    ))
}

/// 确认当前用户可操作该课程
pub(crate) async fn ensure_course_access(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
) -> Result<(), HttpResponse> {
    match user.role {
        UserRole::Admin => Ok(()),
        UserRole::Teacher => match storage.is_course_teacher(course_id, user.id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "You do not teach this course",
            ))),
            Err(e) => Err(internal_error("Failed to check course access", e)),
        },
        _ => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Insufficient permissions",
        ))),
    }
}

/// 确认当前用户可查看该学生：教师须任教该学生选修的课时
pub(crate) async fn ensure_student_access(
    storage: &dyn Storage,
    user: &User,
    student_id: i64,
) -> Result<(), HttpResponse> {
    match user.role {
        UserRole::Admin => Ok(()),
        UserRole::Teacher => match storage.list_student_teachers(student_id).await {
            Ok(teachers) if teachers.iter().any(|t| t.id == user.id) => Ok(()),
            Ok(_) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "You do not teach this student",
            ))),
            Err(e) => Err(internal_error("Failed to check student access", e)),
        },
        _ => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Insufficient permissions",
        ))),
    }
}

/// 加载课时并确认当前用户可操作
pub(crate) async fn ensure_session_access(
    storage: &dyn Storage,
    user: &User,
    session_id: i64,
) -> Result<CourseSession, HttpResponse> {
    let session = match storage.get_session(session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SessionNotFound,
                "Session not found",
            )));
        }
        Err(e) => return Err(internal_error("Failed to get session", e)),
    };
    ensure_course_access(storage, user, session.course_id).await?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{insert_user, memory_storage, seed_session};
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_student_access_limited_to_their_teachers() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;
        let student_id = fx.student_ids[0];
        let other_id =
            insert_user(&storage, UserRole::Teacher, "autre.prof@example.com", "Omar").await;
        let admin_id = insert_user(&storage, UserRole::Admin, "admin@localhost", "Admin").await;

        let teacher = storage.get_user_by_id_impl(fx.teacher_id).await.unwrap().unwrap();
        let other = storage.get_user_by_id_impl(other_id).await.unwrap().unwrap();
        let admin = storage.get_user_by_id_impl(admin_id).await.unwrap().unwrap();

        assert!(ensure_student_access(&storage, &teacher, student_id).await.is_ok());
        assert!(ensure_student_access(&storage, &admin, student_id).await.is_ok());

        let denied = ensure_student_access(&storage, &other, student_id)
            .await
            .unwrap_err();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    }
}
