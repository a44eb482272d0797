use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::{
    attendances::{
        entities::{Attendance, AttendanceDetail, StudentAttendanceEntry},
        requests::AttendanceRecordInput,
    },
    behaviors::{
        entities::{Behavior, BehaviorDetail, StudentBehaviorEntry},
        requests::BehaviorRecordInput,
    },
    calendar::entities::{Holiday, HolidayPeriod, ScheduleConfig, SchedulePeriod},
    courses::{
        entities::{CourseDetail, CourseSession, SessionDetail, SessionStudent, TeacherTimeslot},
        requests::{CourseListQuery, SessionInput, UpdateCourseRequest, UpdateSessionRequest},
        responses::CourseListResponse,
    },
    fees::{
        entities::{Fee, FeeDetail, FeeNote, FeePayment},
        requests::{CreateFeeRequest, CreatePaymentRequest, UpdateFeeRequest, UpdatePaymentRequest},
    },
    grades::{
        entities::{Grade, GradeDetail, StudentGradeEntry},
        requests::{CreateGradeRequest, UpdateGradeRequest},
    },
    messages::{
        entities::{Message, MessageDetail},
        requests::{MailboxQuery, SendMessageRequest},
        responses::{InboxResponse, SentResponse},
    },
    stats::entities::StudentStats,
    system::{ConnectionLogListResponse, ConnectionLogParams, NewConnectionLog},
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::stats::SheetHeader;

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户，password 字段须已是哈希值
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 批量获取用户
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 登录用账号：非学生、已启用、有密码
    async fn get_login_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 邮箱是否已被非学生账号占用
    async fn is_account_email_taken(&self, email: &str, exclude_id: Option<i64>) -> Result<bool>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 按角色列出已启用用户
    async fn list_active_users_by_role(&self, role: UserRole) -> Result<Vec<User>>;
    // 共用该邮箱的已启用学生
    async fn list_students_by_email(&self, email: &str) -> Result<Vec<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 软删除用户
    async fn soft_delete_user(&self, id: i64) -> Result<bool>;
    // 恢复软删除的用户
    async fn restore_user(&self, id: i64) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 更新密码哈希
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool>;
    // 用户总数（含已删除）
    async fn count_users(&self) -> Result<u64>;
    // 某角色的已启用用户数
    async fn count_active_users_by_role(&self, role: UserRole) -> Result<u64>;

    /// 课程管理方法
    // 创建课程及其教师、课时与时间段
    async fn create_course(
        &self,
        academic_year: String,
        teacher_ids: Vec<i64>,
        sessions: Vec<SessionInput>,
    ) -> Result<CourseDetail>;
    // 获取课程详情
    async fn get_course_detail(&self, course_id: i64) -> Result<Option<CourseDetail>>;
    // 分页列出有效课程
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    // 更新课程（学年、教师、启用状态）
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<CourseDetail>>;
    // 软删除课程
    async fn soft_delete_course(&self, course_id: i64) -> Result<bool>;
    // 教师在有效课程中已占用的时间段
    async fn list_teacher_timeslots(
        &self,
        teacher_ids: &[i64],
        exclude_course_id: Option<i64>,
    ) -> Result<Vec<TeacherTimeslot>>;
    // 获取课时
    async fn get_session(&self, session_id: i64) -> Result<Option<CourseSession>>;
    // 获取课时详情（教师与学生）
    async fn get_session_detail(&self, session_id: i64) -> Result<Option<SessionDetail>>;
    // 更新课时
    async fn update_session(
        &self,
        session_id: i64,
        update: UpdateSessionRequest,
    ) -> Result<Option<CourseSession>>;
    // 教师是否任教该课程
    async fn is_course_teacher(&self, course_id: i64, teacher_id: i64) -> Result<bool>;
    // 学生选课
    async fn enroll_student(&self, session_id: i64, student_id: i64) -> Result<SessionStudent>;
    // 学生退课
    async fn remove_student(&self, session_id: i64, student_id: i64) -> Result<bool>;
    // 学生所选的有效课时
    async fn list_student_sessions(&self, student_id: i64) -> Result<Vec<CourseSession>>;
    // 教师任教的有效课时
    async fn list_teacher_sessions(&self, teacher_id: i64) -> Result<Vec<CourseSession>>;
    // 所有有效课程的课时 ID
    async fn list_active_session_ids(&self) -> Result<Vec<i64>>;
    // 教师的学生（去重）
    async fn list_teacher_students(&self, teacher_id: i64) -> Result<Vec<User>>;
    // 学生的教师（去重）
    async fn list_student_teachers(&self, student_id: i64) -> Result<Vec<User>>;

    /// 考勤方法
    // 创建考勤表
    async fn create_attendance(
        &self,
        session_id: i64,
        created_by: i64,
        date: NaiveDate,
        records: Vec<AttendanceRecordInput>,
    ) -> Result<AttendanceDetail>;
    // 获取考勤表及记录
    async fn get_attendance(&self, attendance_id: i64) -> Result<Option<AttendanceDetail>>;
    // 列出课时的考勤表
    async fn list_session_attendances(
        &self,
        session_id: i64,
        date: Option<NaiveDate>,
        include_inactive: bool,
    ) -> Result<Vec<Attendance>>;
    // 替换考勤记录
    async fn update_attendance(
        &self,
        attendance_id: i64,
        records: Vec<AttendanceRecordInput>,
    ) -> Result<Option<AttendanceDetail>>;
    // 软删除或恢复考勤表
    async fn set_attendance_active(&self, attendance_id: i64, active: bool) -> Result<bool>;
    // 学生在有效考勤表中的记录，按日期升序
    async fn list_student_attendance(&self, student_id: i64) -> Result<Vec<StudentAttendanceEntry>>;
    // 一批学生在有效考勤表中的最近缺勤日期
    async fn last_absence_dates(&self, student_ids: &[i64]) -> Result<HashMap<i64, NaiveDate>>;
    // 所有有效考勤表的表头
    async fn list_active_attendance_headers(&self) -> Result<Vec<SheetHeader>>;
    // 批量停用考勤表
    async fn deactivate_attendances(&self, ids: &[i64]) -> Result<u64>;
    // 重新计算课时平均出勤率
    async fn refresh_session_attendance_stats(&self, session_id: i64) -> Result<Option<f64>>;
    // 有效考勤表的平均出勤率
    async fn average_presence_rate(&self) -> Result<f64>;

    /// 课堂表现方法
    async fn create_behavior(
        &self,
        session_id: i64,
        created_by: i64,
        date: NaiveDate,
        records: Vec<BehaviorRecordInput>,
    ) -> Result<BehaviorDetail>;
    async fn get_behavior(&self, behavior_id: i64) -> Result<Option<BehaviorDetail>>;
    async fn list_session_behaviors(
        &self,
        session_id: i64,
        date: Option<NaiveDate>,
        include_inactive: bool,
    ) -> Result<Vec<Behavior>>;
    async fn update_behavior(
        &self,
        behavior_id: i64,
        records: Vec<BehaviorRecordInput>,
    ) -> Result<Option<BehaviorDetail>>;
    async fn set_behavior_active(&self, behavior_id: i64, active: bool) -> Result<bool>;
    async fn list_student_behavior(&self, student_id: i64) -> Result<Vec<StudentBehaviorEntry>>;
    async fn list_active_behavior_headers(&self) -> Result<Vec<SheetHeader>>;
    async fn deactivate_behaviors(&self, ids: &[i64]) -> Result<u64>;
    async fn refresh_session_behavior_stats(&self, session_id: i64) -> Result<Option<f64>>;

    /// 成绩方法
    async fn create_grade(
        &self,
        session_id: i64,
        created_by: i64,
        req: CreateGradeRequest,
    ) -> Result<GradeDetail>;
    async fn get_grade(&self, grade_id: i64) -> Result<Option<GradeDetail>>;
    async fn list_session_grades(&self, session_id: i64) -> Result<Vec<Grade>>;
    // 教师任教课时的全部成绩表
    async fn list_teacher_grades(&self, teacher_id: i64) -> Result<Vec<Grade>>;
    async fn update_grade(
        &self,
        grade_id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Option<GradeDetail>>;
    async fn soft_delete_grade(&self, grade_id: i64) -> Result<bool>;
    async fn list_student_grades(&self, student_id: i64) -> Result<Vec<StudentGradeEntry>>;
    // 重新计算课时平均成绩（仅非草稿）
    async fn refresh_session_grade_stats(&self, session_id: i64) -> Result<Option<f64>>;

    /// 统计方法
    async fn upsert_student_stats(&self, stats: StudentStats) -> Result<()>;
    async fn get_student_stats(&self, student_id: i64) -> Result<Option<StudentStats>>;
    // 缺勤次数大于 0 的学生统计
    async fn list_absent_student_stats(&self) -> Result<Vec<StudentStats>>;

    /// 校历方法
    async fn list_holidays(&self, academic_year: Option<String>) -> Result<Vec<Holiday>>;
    async fn list_active_holidays(&self, academic_year: &str) -> Result<Vec<Holiday>>;
    // 停用该学年已有假期并写入新的一组
    async fn replace_holidays(
        &self,
        academic_year: &str,
        holidays: Vec<HolidayPeriod>,
        updated_by: i64,
    ) -> Result<Vec<Holiday>>;
    async fn get_active_schedule(&self, academic_year: &str) -> Result<Option<ScheduleConfig>>;
    // 停用该学年已有作息表并写入新的一份
    async fn replace_schedule(
        &self,
        academic_year: &str,
        periods: Vec<SchedulePeriod>,
        updated_by: i64,
    ) -> Result<ScheduleConfig>;

    /// 缴费方法
    // academic_year 由调用方解析好
    async fn create_fee(&self, req: CreateFeeRequest, academic_year: &str) -> Result<Fee>;
    async fn get_fee(&self, fee_id: i64) -> Result<Option<FeeDetail>>;
    // 家庭的有效缴费，附带支付与备注
    async fn list_family_fees(
        &self,
        family_email: &str,
        student_id: Option<i64>,
        academic_year: Option<String>,
    ) -> Result<Vec<FeeDetail>>;
    async fn update_fee(&self, fee_id: i64, update: UpdateFeeRequest) -> Result<Option<Fee>>;
    async fn create_fee_payment(
        &self,
        fee_id: i64,
        req: CreatePaymentRequest,
    ) -> Result<FeePayment>;
    async fn update_fee_payment(
        &self,
        payment_id: i64,
        update: UpdatePaymentRequest,
    ) -> Result<Option<FeePayment>>;
    async fn create_fee_note(
        &self,
        fee_id: i64,
        note_text: &str,
        created_by: i64,
    ) -> Result<FeeNote>;

    /// 消息方法
    async fn create_message(
        &self,
        sender_id: i64,
        req: SendMessageRequest,
    ) -> Result<MessageDetail>;
    async fn get_message(&self, message_id: i64) -> Result<Option<MessageDetail>>;
    async fn list_inbox(&self, user_id: i64, query: MailboxQuery) -> Result<InboxResponse>;
    async fn list_sent(&self, user_id: i64, query: MailboxQuery) -> Result<SentResponse>;
    async fn mark_message_read(&self, message_id: i64, user_id: i64) -> Result<bool>;
    // 按当事方软删除（发件人或收件人）
    async fn delete_message_for(&self, message_id: i64, user_id: i64) -> Result<bool>;
    async fn count_unread_messages(&self, user_id: i64) -> Result<i64>;
    async fn list_replies(&self, message_id: i64) -> Result<Vec<Message>>;

    /// 登录日志方法
    async fn create_connection_log(&self, log: NewConnectionLog) -> Result<()>;
    async fn list_connection_logs(
        &self,
        params: ConnectionLogParams,
    ) -> Result<ConnectionLogListResponse>;
}

/// 根据配置创建存储后端并完成迁移
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
