use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::calendar::requests::{
    HolidayListQuery, SaveHolidaysRequest, SaveScheduleRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CalendarService;

// 懒加载的全局 CalendarService 实例
static CALENDAR_SERVICE: Lazy<CalendarService> = Lazy::new(CalendarService::new_lazy);

pub async fn list_holidays(
    req: HttpRequest,
    query: web::Query<HolidayListQuery>,
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE.list_holidays(&req, query.into_inner()).await
}

pub async fn get_current_holidays(req: HttpRequest) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE.get_current_holidays(&req).await
}

pub async fn save_holidays(
    req: HttpRequest,
    holiday_data: web::Json<SaveHolidaysRequest>,
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE
        .save_holidays(&req, holiday_data.into_inner())
        .await
}

pub async fn get_current_schedule(req: HttpRequest) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE.get_current_schedule(&req).await
}

pub async fn save_schedule(
    req: HttpRequest,
    schedule_data: web::Json<SaveScheduleRequest>,
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE
        .save_schedule(&req, schedule_data.into_inner())
        .await
}

// 配置路由
pub fn configure_calendar_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/calendar")
            .wrap(middlewares::RequireJWT)
            // 所有可登录用户都能查看当前校历
            .route("/holidays/current", web::get().to(get_current_holidays))
            .route("/schedule/current", web::get().to(get_current_schedule))
            .service(
                web::resource("/holidays")
                    .route(
                        web::get()
                            .to(list_holidays)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::put()
                            .to(save_holidays)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .route(
                "/schedule",
                web::put()
                    .to(save_schedule)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}
