pub mod access;
pub mod create;
pub mod delete;
pub mod enrollment;
pub mod get;
pub mod list;
pub mod sessions;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::courses::requests::{
    CourseQueryParams, CreateCourseRequest, EnrollStudentRequest, UpdateCourseRequest,
    UpdateSessionRequest,
};
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_course(
        &self,
        request: &HttpRequest,
        req: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, request, req).await
    }

    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        query: CourseQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, request, query).await
    }

    pub async fn get_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_course(self, request, course_id).await
    }

    pub async fn update_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
        req: UpdateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, request, course_id, req).await
    }

    pub async fn delete_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, request, course_id).await
    }

    pub async fn get_session(
        &self,
        request: &HttpRequest,
        session_id: i64,
    ) -> ActixResult<HttpResponse> {
        sessions::get_session(self, request, session_id).await
    }

    pub async fn update_session(
        &self,
        request: &HttpRequest,
        session_id: i64,
        req: UpdateSessionRequest,
    ) -> ActixResult<HttpResponse> {
        sessions::update_session(self, request, session_id, req).await
    }

    pub async fn list_student_sessions(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        sessions::list_student_sessions(self, request, student_id).await
    }

    pub async fn list_my_sessions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        sessions::list_my_sessions(self, request).await
    }

    pub async fn enroll_student(
        &self,
        request: &HttpRequest,
        session_id: i64,
        req: EnrollStudentRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::enroll_student(self, request, session_id, req).await
    }

    pub async fn remove_student(
        &self,
        request: &HttpRequest,
        session_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        enrollment::remove_student(self, request, session_id, student_id).await
    }
}
