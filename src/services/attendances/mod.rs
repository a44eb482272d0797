pub mod create;
pub mod delete;
pub mod get;
pub mod history;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::attendances::requests::{
    AttendanceQuery, CreateAttendanceRequest, UpdateAttendanceRequest,
};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_attendance(
        &self,
        request: &HttpRequest,
        session_id: i64,
        req: CreateAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_attendance(self, request, session_id, req).await
    }

    pub async fn list_attendances(
        &self,
        request: &HttpRequest,
        session_id: i64,
        query: AttendanceQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_attendances(self, request, session_id, query).await
    }

    pub async fn get_attendance(
        &self,
        request: &HttpRequest,
        attendance_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_attendance(self, request, attendance_id).await
    }

    pub async fn update_attendance(
        &self,
        request: &HttpRequest,
        attendance_id: i64,
        req: UpdateAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_attendance(self, request, attendance_id, req).await
    }

    pub async fn delete_attendance(
        &self,
        request: &HttpRequest,
        attendance_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::set_active(self, request, attendance_id, false).await
    }

    pub async fn restore_attendance(
        &self,
        request: &HttpRequest,
        attendance_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::set_active(self, request, attendance_id, true).await
    }

    pub async fn get_student_history(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        history::get_student_history(self, request, student_id).await
    }
}
