//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendances;
mod behaviors;
mod calendar;
mod connection_logs;
mod courses;
mod fees;
mod grades;
mod messages;
mod stats;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolHubError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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

use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn get_login_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_login_user_by_email_impl(email).await
    }

    async fn is_account_email_taken(&self, email: &str, exclude_id: Option<i64>) -> Result<bool> {
        self.is_account_email_taken_impl(email, exclude_id).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn list_active_users_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        self.list_active_users_by_role_impl(role).await
    }

    async fn list_students_by_email(&self, email: &str) -> Result<Vec<User>> {
        self.list_students_by_email_impl(email).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn soft_delete_user(&self, id: i64) -> Result<bool> {
        self.soft_delete_user_impl(id).await
    }

    async fn restore_user(&self, id: i64) -> Result<Option<User>> {
        self.restore_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        self.update_password_impl(id, password_hash).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn count_active_users_by_role(&self, role: UserRole) -> Result<u64> {
        self.count_active_users_by_role_impl(role).await
    }

    async fn create_course(
        &self,
        academic_year: String,
        teacher_ids: Vec<i64>,
        sessions: Vec<SessionInput>,
    ) -> Result<CourseDetail> {
        self.create_course_impl(academic_year, teacher_ids, sessions).await
    }

    async fn get_course_detail(&self, course_id: i64) -> Result<Option<CourseDetail>> {
        self.get_course_detail_impl(course_id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<CourseDetail>> {
        self.update_course_impl(course_id, update).await
    }

    async fn soft_delete_course(&self, course_id: i64) -> Result<bool> {
        self.soft_delete_course_impl(course_id).await
    }

    async fn list_teacher_timeslots(
        &self,
        teacher_ids: &[i64],
        exclude_course_id: Option<i64>,
    ) -> Result<Vec<TeacherTimeslot>> {
        self.list_teacher_timeslots_impl(teacher_ids, exclude_course_id).await
    }

    async fn get_session(&self, session_id: i64) -> Result<Option<CourseSession>> {
        self.get_session_impl(session_id).await
    }

    async fn get_session_detail(&self, session_id: i64) -> Result<Option<SessionDetail>> {
        self.get_session_detail_impl(session_id).await
    }

    async fn update_session(
        &self,
        session_id: i64,
        update: UpdateSessionRequest,
    ) -> Result<Option<CourseSession>> {
        self.update_session_impl(session_id, update).await
    }

    async fn is_course_teacher(&self, course_id: i64, teacher_id: i64) -> Result<bool> {
        self.is_course_teacher_impl(course_id, teacher_id).await
    }

    async fn enroll_student(&self, session_id: i64, student_id: i64) -> Result<SessionStudent> {
        self.enroll_student_impl(session_id, student_id).await
    }

    async fn remove_student(&self, session_id: i64, student_id: i64) -> Result<bool> {
        self.remove_student_impl(session_id, student_id).await
    }

    async fn list_student_sessions(&self, student_id: i64) -> Result<Vec<CourseSession>> {
        self.list_student_sessions_impl(student_id).await
    }

    async fn list_teacher_sessions(&self, teacher_id: i64) -> Result<Vec<CourseSession>> {
        self.list_teacher_sessions_impl(teacher_id).await
    }

    async fn list_active_session_ids(&self) -> Result<Vec<i64>> {
        self.list_active_session_ids_impl().await
    }

    async fn list_teacher_students(&self, teacher_id: i64) -> Result<Vec<User>> {
        self.list_teacher_students_impl(teacher_id).await
    }

    async fn list_student_teachers(&self, student_id: i64) -> Result<Vec<User>> {
        self.list_student_teachers_impl(student_id).await
    }

    async fn create_attendance(
        &self,
        session_id: i64,
        created_by: i64,
        date: NaiveDate,
        records: Vec<AttendanceRecordInput>,
    ) -> Result<AttendanceDetail> {
        self.create_attendance_impl(session_id, created_by, date, records).await
    }

    async fn get_attendance(&self, attendance_id: i64) -> Result<Option<AttendanceDetail>> {
        self.get_attendance_impl(attendance_id).await
    }

    async fn list_session_attendances(
        &self,
        session_id: i64,
        date: Option<NaiveDate>,
        include_inactive: bool,
    ) -> Result<Vec<Attendance>> {
        self.list_session_attendances_impl(session_id, date, include_inactive).await
    }

    async fn update_attendance(
        &self,
        attendance_id: i64,
        records: Vec<AttendanceRecordInput>,
    ) -> Result<Option<AttendanceDetail>> {
        self.update_attendance_impl(attendance_id, records).await
    }

    async fn set_attendance_active(&self, attendance_id: i64, active: bool) -> Result<bool> {
        self.set_attendance_active_impl(attendance_id, active).await
    }

    async fn last_absence_dates(&self, student_ids: &[i64]) -> Result<HashMap<i64, NaiveDate>> {
        self.last_absence_dates_impl(student_ids).await
    }

    async fn list_student_attendance(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAttendanceEntry>> {
        self.list_student_attendance_impl(student_id).await
    }

    async fn list_active_attendance_headers(&self) -> Result<Vec<SheetHeader>> {
        self.list_active_attendance_headers_impl().await
    }

    async fn deactivate_attendances(&self, ids: &[i64]) -> Result<u64> {
        self.deactivate_attendances_impl(ids).await
    }

    async fn refresh_session_attendance_stats(&self, session_id: i64) -> Result<Option<f64>> {
        self.refresh_session_attendance_stats_impl(session_id).await
    }

    async fn average_presence_rate(&self) -> Result<f64> {
        self.average_presence_rate_impl().await
    }

    async fn create_behavior(
        &self,
        session_id: i64,
        created_by: i64,
        date: NaiveDate,
        records: Vec<BehaviorRecordInput>,
    ) -> Result<BehaviorDetail> {
        self.create_behavior_impl(session_id, created_by, date, records).await
    }

    async fn get_behavior(&self, behavior_id: i64) -> Result<Option<BehaviorDetail>> {
        self.get_behavior_impl(behavior_id).await
    }

    async fn list_session_behaviors(
        &self,
        session_id: i64,
        date: Option<NaiveDate>,
        include_inactive: bool,
    ) -> Result<Vec<Behavior>> {
        self.list_session_behaviors_impl(session_id, date, include_inactive).await
    }

    async fn update_behavior(
        &self,
        behavior_id: i64,
        records: Vec<BehaviorRecordInput>,
    ) -> Result<Option<BehaviorDetail>> {
        self.update_behavior_impl(behavior_id, records).await
    }

    async fn set_behavior_active(&self, behavior_id: i64, active: bool) -> Result<bool> {
        self.set_behavior_active_impl(behavior_id, active).await
    }

    async fn list_student_behavior(&self, student_id: i64) -> Result<Vec<StudentBehaviorEntry>> {
        self.list_student_behavior_impl(student_id).await
    }

    async fn list_active_behavior_headers(&self) -> Result<Vec<SheetHeader>> {
        self.list_active_behavior_headers_impl().await
    }

    async fn deactivate_behaviors(&self, ids: &[i64]) -> Result<u64> {
        self.deactivate_behaviors_impl(ids).await
    }

    async fn refresh_session_behavior_stats(&self, session_id: i64) -> Result<Option<f64>> {
        self.refresh_session_behavior_stats_impl(session_id).await
    }

    async fn create_grade(
        &self,
        session_id: i64,
        created_by: i64,
        req: CreateGradeRequest,
    ) -> Result<GradeDetail> {
        self.create_grade_impl(session_id, created_by, req).await
    }

    async fn get_grade(&self, grade_id: i64) -> Result<Option<GradeDetail>> {
        self.get_grade_impl(grade_id).await
    }

    async fn list_session_grades(&self, session_id: i64) -> Result<Vec<Grade>> {
        self.list_session_grades_impl(session_id).await
    }

    async fn list_teacher_grades(&self, teacher_id: i64) -> Result<Vec<Grade>> {
        self.list_teacher_grades_impl(teacher_id).await
    }

    async fn update_grade(
        &self,
        grade_id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Option<GradeDetail>> {
        self.update_grade_impl(grade_id, update).await
    }

    async fn soft_delete_grade(&self, grade_id: i64) -> Result<bool> {
        self.soft_delete_grade_impl(grade_id).await
    }

    async fn list_student_grades(&self, student_id: i64) -> Result<Vec<StudentGradeEntry>> {
        self.list_student_grades_impl(student_id).await
    }

    async fn refresh_session_grade_stats(&self, session_id: i64) -> Result<Option<f64>> {
        self.refresh_session_grade_stats_impl(session_id).await
    }

    async fn upsert_student_stats(&self, stats: StudentStats) -> Result<()> {
        self.upsert_student_stats_impl(stats).await
    }

    async fn get_student_stats(&self, student_id: i64) -> Result<Option<StudentStats>> {
        self.get_student_stats_impl(student_id).await
    }

    async fn list_absent_student_stats(&self) -> Result<Vec<StudentStats>> {
        self.list_absent_student_stats_impl().await
    }

    async fn list_holidays(&self, academic_year: Option<String>) -> Result<Vec<Holiday>> {
        self.list_holidays_impl(academic_year).await
    }

    async fn list_active_holidays(&self, academic_year: &str) -> Result<Vec<Holiday>> {
        self.list_active_holidays_impl(academic_year).await
    }

    async fn replace_holidays(
        &self,
        academic_year: &str,
        holidays: Vec<HolidayPeriod>,
        updated_by: i64,
    ) -> Result<Vec<Holiday>> {
        self.replace_holidays_impl(academic_year, holidays, updated_by).await
    }

    async fn get_active_schedule(&self, academic_year: &str) -> Result<Option<ScheduleConfig>> {
        self.get_active_schedule_impl(academic_year).await
    }

    async fn replace_schedule(
        &self,
        academic_year: &str,
        periods: Vec<SchedulePeriod>,
        updated_by: i64,
    ) -> Result<ScheduleConfig> {
        self.replace_schedule_impl(academic_year, periods, updated_by).await
    }

    async fn create_fee(&self, req: CreateFeeRequest, academic_year: &str) -> Result<Fee> {
        self.create_fee_impl(req, academic_year).await
    }

    async fn get_fee(&self, fee_id: i64) -> Result<Option<FeeDetail>> {
        self.get_fee_impl(fee_id).await
    }

    async fn list_family_fees(
        &self,
        family_email: &str,
        student_id: Option<i64>,
        academic_year: Option<String>,
    ) -> Result<Vec<FeeDetail>> {
        self.list_family_fees_impl(family_email, student_id, academic_year)
            .await
    }

    async fn update_fee(&self, fee_id: i64, update: UpdateFeeRequest) -> Result<Option<Fee>> {
        self.update_fee_impl(fee_id, update).await
    }

    async fn create_fee_payment(
        &self,
        fee_id: i64,
        req: CreatePaymentRequest,
    ) -> Result<FeePayment> {
        self.create_fee_payment_impl(fee_id, req).await
    }

    async fn update_fee_payment(
        &self,
        payment_id: i64,
        update: UpdatePaymentRequest,
    ) -> Result<Option<FeePayment>> {
        self.update_fee_payment_impl(payment_id, update).await
    }

    async fn create_fee_note(
        &self,
        fee_id: i64,
        note_text: &str,
        created_by: i64,
    ) -> Result<FeeNote> {
        self.create_fee_note_impl(fee_id, note_text, created_by).await
    }

    async fn create_message(
        &self,
        sender_id: i64,
        req: SendMessageRequest,
    ) -> Result<MessageDetail> {
        self.create_message_impl(sender_id, req).await
    }

    async fn get_message(&self, message_id: i64) -> Result<Option<MessageDetail>> {
        self.get_message_impl(message_id).await
    }

    async fn list_inbox(&self, user_id: i64, query: MailboxQuery) -> Result<InboxResponse> {
        self.list_inbox_impl(user_id, query).await
    }

    async fn list_sent(&self, user_id: i64, query: MailboxQuery) -> Result<SentResponse> {
        self.list_sent_impl(user_id, query).await
    }

    async fn mark_message_read(&self, message_id: i64, user_id: i64) -> Result<bool> {
        self.mark_message_read_impl(message_id, user_id).await
    }

    async fn delete_message_for(&self, message_id: i64, user_id: i64) -> Result<bool> {
        self.delete_message_for_impl(message_id, user_id).await
    }

    async fn count_unread_messages(&self, user_id: i64) -> Result<i64> {
        self.count_unread_messages_impl(user_id).await
    }

    async fn list_replies(&self, message_id: i64) -> Result<Vec<Message>> {
        self.list_replies_impl(message_id).await
    }

    async fn create_connection_log(&self, log: NewConnectionLog) -> Result<()> {
        self.create_connection_log_impl(log).await
    }

    async fn list_connection_logs(
        &self,
        params: ConnectionLogParams,
    ) -> Result<ConnectionLogListResponse> {
        self.list_connection_logs_impl(params).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::entity::prelude::*;
    use crate::models::courses::entities::Subject;
    use crate::models::users::entities::UserRole;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};

    /// 内存 SQLite，单连接，已执行迁移
    pub(crate) async fn memory_storage() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .expect("in-memory sqlite should connect");
        Migrator::up(&db, None)
            .await
            .expect("migrations should apply");
        SeaOrmStorage { db }
    }

    pub(crate) struct SessionFixture {
        pub teacher_id: i64,
        pub session_id: i64,
        pub student_ids: Vec<i64>,
    }

    pub(crate) async fn insert_user(
        storage: &SeaOrmStorage,
        role: UserRole,
        email: &str,
        firstname: &str,
    ) -> i64 {
        let now = chrono::Utc::now().timestamp();
        UserActiveModel {
            email: Set(email.to_string()),
            role: Set(role.to_string()),
            firstname: Set(firstname.to_string()),
            lastname: Set("Haddad".to_string()),
            is_active: Set(true),
            subjects: Set("[]".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .expect("user should insert")
        .id
    }

    /// 一名任课教师、一个课时、两名已选课学生
    pub(crate) async fn seed_session(storage: &SeaOrmStorage) -> SessionFixture {
        let now = chrono::Utc::now().timestamp();
        let teacher_id =
            insert_user(storage, UserRole::Teacher, "prof@example.com", "Nadia").await;
        let student_ids = vec![
            insert_user(storage, UserRole::Student, "haddad@example.com", "Yasmine").await,
            insert_user(storage, UserRole::Student, "haddad@example.com", "Ilyes").await,
        ];

        let course = CourseActiveModel {
            academic_year: Set("2024-2025".to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .expect("course should insert");

        let session = CourseSessionActiveModel {
            course_id: Set(course.id),
            subject: Set(Subject::Arabe.to_string()),
            level: Set("1".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .expect("session should insert");

        CourseTeacherActiveModel {
            course_id: Set(course.id),
            teacher_id: Set(teacher_id),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .expect("teacher link should insert");
        for student_id in &student_ids {
            storage
                .enroll_student_impl(session.id, *student_id)
                .await
                .expect("student should enroll");
        }

        SessionFixture {
            teacher_id,
            session_id: session.id,
            student_ids,
        }
    }
}
