//! 家庭看板：与家庭邮箱相同的在读学生即为其子女

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FamilyService;
use crate::errors::Result;
use crate::models::family::{FamilyChild, FamilyDashboardResponse, FamilyQuery};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;
use crate::storage::Storage;
use crate::utils::stats::attendance_summary;

/// 家庭只能看自己的邮箱，管理员必须指定邮箱
pub(crate) fn target_email(user: &User, requested: Option<String>) -> Option<String> {
    match user.role {
        UserRole::Admin => requested
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty()),
        _ => Some(user.email.to_lowercase()),
    }
}

async fn load_child(storage: &dyn Storage, student: User) -> Result<FamilyChild> {
    let sessions = storage.list_student_sessions(student.id).await?;
    let stats = storage.get_student_stats(student.id).await?;
    let attendance = attendance_summary(&storage.list_student_attendance(student.id).await?);

    Ok(FamilyChild {
        student,
        sessions,
        stats,
        attendance,
    })
}

pub async fn get_dashboard(
    service: &FamilyService,
    request: &HttpRequest,
    query: FamilyQuery,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let Some(email) = target_email(&user, query.email) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Query parameter 'email' is required",
        )));
    };

    let result = async {
        let students = storage.list_students_by_email(&email).await?;
        let mut children = Vec::with_capacity(students.len());
        for student in students {
            children.push(load_child(storage.as_ref(), student).await?);
        }
        let fees = storage.list_family_fees(&email, None, None).await?;
        Ok::<_, crate::errors::SchoolHubError>((children, fees))
    }
    .await;

    match result {
        Ok((children, fees)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FamilyDashboardResponse {
                email,
                children,
                fees,
            },
            "Family dashboard retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load family dashboard: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: UserRole, email: &str) -> User {
        User {
            id: 1,
            email: email.into(),
            password_hash: None,
            role,
            firstname: "Karim".into(),
            lastname: "Mansouri".into(),
            is_active: true,
            date_of_birth: None,
            gender: None,
            phone: None,
            secondary_email: None,
            school_year: None,
            subjects: vec![],
            last_login: None,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_family_ignores_requested_email() {
        let family = user(UserRole::Family, "Famille.Mansouri@example.com");
        assert_eq!(
            target_email(&family, Some("autre@example.com".into())).as_deref(),
            Some("famille.mansouri@example.com")
        );
    }

    #[test]
    fn test_admin_requires_email() {
        let admin = user(UserRole::Admin, "admin@localhost");
        assert_eq!(target_email(&admin, None), None);
        assert_eq!(
            target_email(&admin, Some(" Parent@Example.com ".into())).as_deref(),
            Some("parent@example.com")
        );
    }
}
