pub mod checks;
pub mod global;
pub mod high_risk;
pub mod refresh;
pub mod student;
pub mod teacher;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::stats::requests::HighRiskQuery;
use crate::storage::Storage;

pub struct StatsService {
    storage: Option<Arc<dyn Storage>>,
}

impl StatsService {
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

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        request
            .app_data::<web::Data<Arc<dyn ObjectCache>>>()
            .map(|data| data.get_ref().clone())
    }

    // 学生的考勤、表现与成绩汇总
    pub async fn get_student_stats(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        student::get_student_stats(self, request, student_id).await
    }

    // 教师名下学生的性别与年龄分布
    pub async fn get_teacher_stats(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
    ) -> ActixResult<HttpResponse> {
        teacher::get_teacher_stats(self, request, teacher_id).await
    }

    pub async fn get_global_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        global::get_global_stats(self, request).await
    }

    pub async fn list_high_risk_students(
        &self,
        request: &HttpRequest,
        query: HighRiskQuery,
    ) -> ActixResult<HttpResponse> {
        high_risk::list_high_risk_students(self, request, query).await
    }

    pub async fn check_duplicate_attendances(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        checks::check_duplicate_attendances(self, request).await
    }

    pub async fn check_missing_attendances(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
    ) -> ActixResult<HttpResponse> {
        checks::check_missing_attendances(self, request, teacher_id).await
    }

    pub async fn refresh_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        refresh::handle_refresh_stats(self, request).await
    }
}
