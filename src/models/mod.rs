//! 数据模型
//!
//! 每个业务域分为 `entities`（业务实体）、`requests`（请求体/查询参数）与 `responses`（响应体）。

pub mod attendances;
pub mod auth;
pub mod behaviors;
pub mod calendar;
pub mod common;
pub mod courses;
pub mod family;
pub mod fees;
pub mod grades;
pub mod maintenance;
pub mod messages;
pub mod stats;
pub mod system;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间，用于健康检查中的运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，随 `ApiResponse.code` 返回给前端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    PasswordPolicyViolation = 2001,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserEmailInvalid = 3002,
    UserNameInvalid = 3003,
    UserCreationFailed = 3004,
    UserUpdateFailed = 3005,
    UserDeleteFailed = 3006,
    CanNotDeleteCurrentUser = 3007,

    // 课程
    CourseNotFound = 4000,
    CourseCreationFailed = 4001,
    CoursePermissionDenied = 4002,
    TimeslotOverlap = 4003,
    TimeslotInvalid = 4004,
    SessionNotFound = 4005,
    StudentAlreadyEnrolled = 4006,
    StudentNotEnrolled = 4007,

    // 考勤 / 表现 / 成绩
    AttendanceNotFound = 5000,
    AttendanceAlreadyExists = 5001,
    AttendanceInvalid = 5002,
    BehaviorNotFound = 5100,
    BehaviorAlreadyExists = 5101,
    BehaviorInvalid = 5102,
    GradeNotFound = 5200,
    GradeInvalid = 5201,

    // 校历
    HolidayInvalid = 6000,
    ScheduleInvalid = 6001,

    // 消息
    MessageNotFound = 7000,
    MessageInvalid = 7001,
    MessageRecipientInvalid = 7002,
    MessagePermissionDenied = 7003,

    // 维护
    MaintenanceTaskUnknown = 8000,

    // 缴费
    FeeNotFound = 9000,
    FeeInvalid = 9001,
    FeePaymentNotFound = 9002,
}
