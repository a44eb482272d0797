pub mod holidays;
pub mod schedule;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::calendar::requests::{HolidayListQuery, SaveHolidaysRequest, SaveScheduleRequest};
use crate::storage::Storage;

pub struct CalendarService {
    storage: Option<Arc<dyn Storage>>,
}

impl CalendarService {
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

    // 缓存未注册时直接回源
    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        request
            .app_data::<web::Data<Arc<dyn ObjectCache>>>()
            .map(|data| data.get_ref().clone())
    }

    pub async fn list_holidays(
        &self,
        request: &HttpRequest,
        query: HolidayListQuery,
    ) -> ActixResult<HttpResponse> {
        holidays::list_holidays(self, request, query).await
    }

    pub async fn get_current_holidays(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        holidays::get_current_holidays(self, request).await
    }

    pub async fn save_holidays(
        &self,
        request: &HttpRequest,
        req: SaveHolidaysRequest,
    ) -> ActixResult<HttpResponse> {
        holidays::save_holidays(self, request, req).await
    }

    pub async fn get_current_schedule(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        schedule::get_current_schedule(self, request).await
    }

    pub async fn save_schedule(
        &self,
        request: &HttpRequest,
        req: SaveScheduleRequest,
    ) -> ActixResult<HttpResponse> {
        schedule::save_schedule(self, request, req).await
    }
}
