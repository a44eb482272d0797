//! 课程、课时与选课存储操作

use std::collections::{BTreeSet, HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{
    course_sessions, course_teachers, courses, session_students, session_timeslots, users,
};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    courses::{
        entities::{
            CourseDetail, CourseSession, SessionDetail, SessionStudent, TeacherTimeslot, Timeslot,
        },
        requests::{
            CourseListQuery, SessionInput, TimeslotInput, UpdateCourseRequest,
            UpdateSessionRequest,
        },
        responses::CourseListResponse,
    },
    users::entities::User,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

async fn insert_timeslots<C: ConnectionTrait>(
    conn: &C,
    session_id: i64,
    timeslots: &[TimeslotInput],
) -> Result<()> {
    for slot in timeslots {
        SessionTimeslotActiveModel {
            session_id: Set(session_id),
            day: Set(slot.day.to_string()),
            start_time: Set(slot.start_time.clone()),
            end_time: Set(slot.end_time.clone()),
            classroom: Set(slot.classroom.clone()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建时间段失败: {e}")))?;
    }
    Ok(())
}

async fn insert_teachers<C: ConnectionTrait>(
    conn: &C,
    course_id: i64,
    teacher_ids: &[i64],
) -> Result<()> {
    let unique: BTreeSet<i64> = teacher_ids.iter().copied().collect();
    for teacher_id in unique {
        CourseTeacherActiveModel {
            course_id: Set(course_id),
            teacher_id: Set(teacher_id),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("关联教师失败: {e}")))?;
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 创建课程（事务内写入教师、课时、时间段）
    pub async fn create_course_impl(
        &self,
        academic_year: String,
        teacher_ids: Vec<i64>,
        sessions: Vec<SessionInput>,
    ) -> Result<CourseDetail> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let course = CourseActiveModel {
            academic_year: Set(academic_year),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建课程失败: {e}")))?;

        insert_teachers(&txn, course.id, &teacher_ids).await?;

        for input in &sessions {
            let session = CourseSessionActiveModel {
                course_id: Set(course.id),
                subject: Set(input.subject.to_string()),
                level: Set(input.level.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建课时失败: {e}")))?;

            insert_timeslots(&txn, session.id, &input.timeslots).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_course_detail_impl(course.id)
            .await?
            .ok_or_else(|| SchoolHubError::not_found("Course not found after creation"))
    }

    /// 批量加载课时及其时间段
    pub(super) async fn load_sessions(
        &self,
        models: Vec<CourseSessionModel>,
    ) -> Result<Vec<CourseSession>> {
        if models.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<i64> = models.iter().map(|s| s.id).collect();
        let slots = SessionTimeslots::find()
            .filter(session_timeslots::Column::SessionId.is_in(ids))
            .order_by_asc(session_timeslots::Column::Day)
            .order_by_asc(session_timeslots::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询时间段失败: {e}")))?;

        let mut by_session: HashMap<i64, Vec<Timeslot>> = HashMap::new();
        for slot in slots {
            by_session
                .entry(slot.session_id)
                .or_default()
                .push(slot.into_timeslot());
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let timeslots = by_session.remove(&m.id).unwrap_or_default();
                m.into_session(timeslots)
            })
            .collect())
    }

    async fn build_course_details(&self, models: Vec<CourseModel>) -> Result<Vec<CourseDetail>> {
        if models.is_empty() {
            return Ok(vec![]);
        }
        let course_ids: Vec<i64> = models.iter().map(|c| c.id).collect();

        let links = CourseTeachers::find()
            .filter(course_teachers::Column::CourseId.is_in(course_ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程教师失败: {e}")))?;
        let teacher_ids: Vec<i64> = links
            .iter()
            .map(|l| l.teacher_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let teachers: HashMap<i64, User> = self
            .get_users_by_ids_impl(&teacher_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let session_models = CourseSessions::find()
            .filter(course_sessions::Column::CourseId.is_in(course_ids))
            .order_by_asc(course_sessions::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课时失败: {e}")))?;
        let mut sessions: HashMap<i64, Vec<CourseSession>> = HashMap::new();
        for session in self.load_sessions(session_models).await? {
            sessions.entry(session.course_id).or_default().push(session);
        }

        Ok(models
            .into_iter()
            .map(|course| {
                let teachers = links
                    .iter()
                    .filter(|l| l.course_id == course.id)
                    .filter_map(|l| teachers.get(&l.teacher_id).cloned())
                    .collect();
                let sessions = sessions.remove(&course.id).unwrap_or_default();
                CourseDetail {
                    course: course.into_course(),
                    teachers,
                    sessions,
                }
            })
            .collect())
    }

    pub async fn get_course_detail_impl(&self, course_id: i64) -> Result<Option<CourseDetail>> {
        let course = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程失败: {e}")))?;

        match course {
            Some(course) => Ok(self.build_course_details(vec![course]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 教师任教的课程 ID
    async fn teacher_course_ids(&self, teacher_id: i64) -> Result<Vec<i64>> {
        let links = CourseTeachers::find()
            .filter(course_teachers::Column::TeacherId.eq(teacher_id))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程教师失败: {e}")))?;
        Ok(links.into_iter().map(|l| l.course_id).collect())
    }

    /// 过滤出有效（启用且未删除）课程
    pub(super) async fn active_course_ids(
        &self,
        course_ids: Option<Vec<i64>>,
    ) -> Result<HashSet<i64>> {
        let mut select = Courses::find()
            .filter(courses::Column::IsActive.eq(true))
            .filter(courses::Column::DeletedAt.is_null());
        if let Some(ids) = course_ids {
            if ids.is_empty() {
                return Ok(HashSet::new());
            }
            select = select.filter(courses::Column::Id.is_in(ids));
        }
        let models = select
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程失败: {e}")))?;
        Ok(models.into_iter().map(|c| c.id).collect())
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Courses::find()
            .filter(courses::Column::IsActive.eq(true))
            .filter(courses::Column::DeletedAt.is_null());

        // 教师筛选
        if let Some(teacher_id) = query.teacher_id {
            let ids = self.teacher_course_ids(teacher_id).await?;
            select = select.filter(courses::Column::Id.is_in(ids));
        }

        if let Some(ref year) = query.academic_year
            && !year.trim().is_empty()
        {
            select = select.filter(courses::Column::AcademicYear.eq(year.trim()));
        }

        select = select.order_by_desc(courses::Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程页数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: self.build_course_details(models).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新课程，teacher_ids 给出时整体替换
    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<CourseDetail>> {
        let existing = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = CourseActiveModel {
            id: Set(course_id),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Some(year) = update.academic_year {
            model.academic_year = Set(year);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model
            .update(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新课程失败: {e}")))?;

        if let Some(teacher_ids) = update.teacher_ids {
            CourseTeachers::delete_many()
                .filter(course_teachers::Column::CourseId.eq(course_id))
                .exec(&txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("更新课程教师失败: {e}")))?;
            insert_teachers(&txn, course_id, &teacher_ids).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_course_detail_impl(course_id).await
    }

    pub async fn soft_delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Courses::update_many()
            .col_expr(courses::Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(courses::Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(courses::Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(courses::Column::Id.eq(course_id))
            .filter(courses::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn get_course_teacher_ids_impl(&self, course_id: i64) -> Result<Vec<i64>> {
        let links = CourseTeachers::find()
            .filter(course_teachers::Column::CourseId.eq(course_id))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程教师失败: {e}")))?;
        Ok(links.into_iter().map(|l| l.teacher_id).collect())
    }

    /// 教师在有效课程中已占用的时间段
    pub async fn list_teacher_timeslots_impl(
        &self,
        teacher_ids: &[i64],
        exclude_course_id: Option<i64>,
    ) -> Result<Vec<TeacherTimeslot>> {
        if teacher_ids.is_empty() {
            return Ok(vec![]);
        }

        let mut select = CourseTeachers::find()
            .filter(course_teachers::Column::TeacherId.is_in(teacher_ids.to_vec()));
        if let Some(course_id) = exclude_course_id {
            select = select.filter(course_teachers::Column::CourseId.ne(course_id));
        }
        let links = select
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程教师失败: {e}")))?;

        let active = self
            .active_course_ids(Some(links.iter().map(|l| l.course_id).collect()))
            .await?;
        if active.is_empty() {
            return Ok(vec![]);
        }

        let sessions = CourseSessions::find()
            .filter(course_sessions::Column::CourseId.is_in(active.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课时失败: {e}")))?;
        let session_course: HashMap<i64, i64> =
            sessions.iter().map(|s| (s.id, s.course_id)).collect();
        if session_course.is_empty() {
            return Ok(vec![]);
        }

        let slots = SessionTimeslots::find()
            .filter(session_timeslots::Column::SessionId.is_in(session_course.keys().copied()))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询时间段失败: {e}")))?;

        let mut taken = Vec::new();
        for slot in slots {
            let Some(&course_id) = session_course.get(&slot.session_id) else {
                continue;
            };
            for link in links.iter().filter(|l| l.course_id == course_id) {
                taken.push(TeacherTimeslot {
                    teacher_id: link.teacher_id,
                    course_id,
                    session_id: slot.session_id,
                    day: slot.parsed_day(),
                    start_time: slot.start_time.clone(),
                    end_time: slot.end_time.clone(),
                });
            }
        }
        Ok(taken)
    }

    pub async fn get_session_impl(&self, session_id: i64) -> Result<Option<CourseSession>> {
        let model = CourseSessions::find_by_id(session_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课时失败: {e}")))?;

        match model {
            Some(model) => Ok(self.load_sessions(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn get_session_detail_impl(&self, session_id: i64) -> Result<Option<SessionDetail>> {
        let Some(session) = self.get_session_impl(session_id).await? else {
            return Ok(None);
        };

        let academic_year = Courses::find_by_id(session.course_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程失败: {e}")))?
            .map(|c| c.academic_year)
            .unwrap_or_default();

        let teacher_ids = self.get_course_teacher_ids_impl(session.course_id).await?;
        let teachers = self.get_users_by_ids_impl(&teacher_ids).await?;

        let student_ids: Vec<i64> = SessionStudents::find()
            .filter(session_students::Column::SessionId.eq(session_id))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询选课学生失败: {e}")))?
            .into_iter()
            .map(|s| s.student_id)
            .collect();
        let students = self.get_users_by_ids_impl(&student_ids).await?;

        Ok(Some(SessionDetail {
            session,
            academic_year,
            teachers,
            students,
        }))
    }

    /// 更新课时，timeslots 给出时整体替换
    pub async fn update_session_impl(
        &self,
        session_id: i64,
        update: UpdateSessionRequest,
    ) -> Result<Option<CourseSession>> {
        if self.get_session_impl(session_id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = CourseSessionActiveModel {
            id: Set(session_id),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Some(subject) = update.subject {
            model.subject = Set(subject.to_string());
        }
        if let Some(level) = update.level {
            model.level = Set(level);
        }
        model
            .update(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新课时失败: {e}")))?;

        if let Some(timeslots) = update.timeslots {
            SessionTimeslots::delete_many()
                .filter(session_timeslots::Column::SessionId.eq(session_id))
                .exec(&txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("更新时间段失败: {e}")))?;
            insert_timeslots(&txn, session_id, &timeslots).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_session_impl(session_id).await
    }

    pub async fn is_course_teacher_impl(&self, course_id: i64, teacher_id: i64) -> Result<bool> {
        let count = CourseTeachers::find()
            .filter(course_teachers::Column::CourseId.eq(course_id))
            .filter(course_teachers::Column::TeacherId.eq(teacher_id))
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程教师失败: {e}")))?;
        Ok(count > 0)
    }

    /// 选课，重复选课由唯一索引拦截
    pub async fn enroll_student_impl(
        &self,
        session_id: i64,
        student_id: i64,
    ) -> Result<SessionStudent> {
        let now = chrono::Utc::now().timestamp();

        let model = SessionStudentActiveModel {
            session_id: Set(session_id),
            student_id: Set(student_id),
            enrolled_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("选课失败: {e}")))?;

        Ok(model.into_session_student())
    }

    pub async fn remove_student_impl(&self, session_id: i64, student_id: i64) -> Result<bool> {
        let result = SessionStudents::delete_many()
            .filter(session_students::Column::SessionId.eq(session_id))
            .filter(session_students::Column::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("退课失败: {e}")))?;
        Ok(result.rows_affected > 0)
    }

    /// 属于有效课程的课时
    async fn sessions_of_active_courses(
        &self,
        session_ids: Option<Vec<i64>>,
    ) -> Result<Vec<CourseSessionModel>> {
        let mut select = CourseSessions::find();
        if let Some(ids) = session_ids {
            if ids.is_empty() {
                return Ok(vec![]);
            }
            select = select.filter(course_sessions::Column::Id.is_in(ids));
        }
        let models = select
            .order_by_asc(course_sessions::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课时失败: {e}")))?;

        let course_ids = models.iter().map(|s| s.course_id).collect();
        let active = self.active_course_ids(Some(course_ids)).await?;
        Ok(models
            .into_iter()
            .filter(|s| active.contains(&s.course_id))
            .collect())
    }

    async fn student_session_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        let links = SessionStudents::find()
            .filter(session_students::Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询选课失败: {e}")))?;
        Ok(links.into_iter().map(|l| l.session_id).collect())
    }

    pub async fn list_student_sessions_impl(&self, student_id: i64) -> Result<Vec<CourseSession>> {
        let session_ids = self.student_session_ids(student_id).await?;
        let models = self
            .sessions_of_active_courses(Some(session_ids))
            .await?;
        self.load_sessions(models).await
    }

    pub async fn list_teacher_sessions_impl(&self, teacher_id: i64) -> Result<Vec<CourseSession>> {
        let course_ids = self.teacher_course_ids(teacher_id).await?;
        if course_ids.is_empty() {
            return Ok(vec![]);
        }
        let models = CourseSessions::find()
            .filter(course_sessions::Column::CourseId.is_in(course_ids.clone()))
            .order_by_asc(course_sessions::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课时失败: {e}")))?;
        let active = self.active_course_ids(Some(course_ids)).await?;
        let models = models
            .into_iter()
            .filter(|s| active.contains(&s.course_id))
            .collect();
        self.load_sessions(models).await
    }

    pub async fn list_active_session_ids_impl(&self) -> Result<Vec<i64>> {
        let models = self.sessions_of_active_courses(None).await?;
        Ok(models.into_iter().map(|s| s.id).collect())
    }

    /// 教师所有课时的学生，去重后只保留有效学生
    pub async fn list_teacher_students_impl(&self, teacher_id: i64) -> Result<Vec<User>> {
        let session_ids: Vec<i64> = self
            .list_teacher_sessions_impl(teacher_id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        if session_ids.is_empty() {
            return Ok(vec![]);
        }

        let student_ids: Vec<i64> = SessionStudents::find()
            .filter(session_students::Column::SessionId.is_in(session_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询选课学生失败: {e}")))?
            .into_iter()
            .map(|l| l.student_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(self
            .get_users_by_ids_impl(&student_ids)
            .await?
            .into_iter()
            .filter(|u| u.is_available())
            .collect())
    }

    pub async fn list_student_teachers_impl(&self, student_id: i64) -> Result<Vec<User>> {
        let course_ids: Vec<i64> = self
            .list_student_sessions_impl(student_id)
            .await?
            .into_iter()
            .map(|s| s.course_id)
            .collect();
        if course_ids.is_empty() {
            return Ok(vec![]);
        }

        let teacher_ids: Vec<i64> = CourseTeachers::find()
            .filter(course_teachers::Column::CourseId.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课程教师失败: {e}")))?
            .into_iter()
            .map(|l| l.teacher_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Users::find()
            .filter(users::Column::Id.is_in(teacher_ids))
            .filter(users::Column::DeletedAt.is_null())
            .order_by_asc(users::Column::Lastname)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询教师失败: {e}")))?
            .into_iter()
            .map(|m| m.into_user())
            .collect())
    }
}
