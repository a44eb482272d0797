use super::entities::{Subject, TimeSlotDay};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct TimeslotInput {
    pub day: TimeSlotDay,
    pub start_time: String,
    pub end_time: String,
    pub classroom: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct SessionInput {
    pub subject: Subject,
    pub level: String,
    #[serde(default)]
    pub timeslots: Vec<TimeslotInput>,
}

// 创建课程请求
//
// academic_year 省略时使用当前学年
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub academic_year: Option<String>,
    pub teacher_ids: Vec<i64>,
    pub sessions: Vec<SessionInput>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub academic_year: Option<String>,
    pub teacher_ids: Option<Vec<i64>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateSessionRequest {
    pub subject: Option<Subject>,
    pub level: Option<String>,
    pub timeslots: Option<Vec<TimeslotInput>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct EnrollStudentRequest {
    pub student_id: i64,
}

// 课程查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub academic_year: Option<String>,
    pub teacher_id: Option<i64>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub academic_year: Option<String>,
}
