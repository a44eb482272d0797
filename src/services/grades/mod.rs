pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::grades::requests::{CreateGradeRequest, GradeQuery, UpdateGradeRequest};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
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

    pub async fn create_grade(
        &self,
        request: &HttpRequest,
        session_id: i64,
        req: CreateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_grade(self, request, session_id, req).await
    }

    pub async fn get_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
        query: GradeQuery,
    ) -> ActixResult<HttpResponse> {
        get::get_grade(self, request, grade_id, query).await
    }

    pub async fn list_session_grades(
        &self,
        request: &HttpRequest,
        session_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_session_grades(self, request, session_id).await
    }

    // 教师任教课时的全部成绩表
    pub async fn list_teacher_grades(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_teacher_grades(self, request, teacher_id).await
    }

    pub async fn update_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
        req: UpdateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_grade(self, request, grade_id, req).await
    }

    pub async fn delete_grade(&self, request: &HttpRequest, grade_id: i64) -> ActixResult<HttpResponse> {
        delete::delete_grade(self, request, grade_id).await
    }
}
