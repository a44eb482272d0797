use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn fk<F: IntoIden, FC: IntoIden, T: IntoIden, TC: IntoIden>(
    from: F,
    from_col: FC,
    to: T,
    to_col: TC,
    on_delete: ForeignKeyAction,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .from(from, from_col)
        .to(to, to_col)
        .on_delete(on_delete)
        .to_owned()
}

async fn index<T: IntoIden + Clone, C: IntoIden + Clone>(
    manager: &SchemaManager<'_>,
    name: &str,
    table: T,
    cols: &[C],
    unique: bool,
) -> Result<(), DbErr> {
    let mut stmt = Index::create();
    stmt.if_not_exists().name(name).table(table);
    for col in cols {
        stmt.col(col.clone());
    }
    if unique {
        stmt.unique();
    }
    manager.create_index(stmt.to_owned()).await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户：学生与家庭共用邮箱，因此 email 不唯一
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Firstname).string().not_null())
                    .col(ColumnDef::new(Users::Lastname).string().not_null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::DateOfBirth).string().null())
                    .col(ColumnDef::new(Users::Gender).string().null())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::SecondaryEmail).string().null())
                    .col(ColumnDef::new(Users::SchoolYear).string().null())
                    .col(ColumnDef::new(Users::Subjects).text().not_null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::DeletedAt).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 课程
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(pk(Courses::Id))
                    .col(ColumnDef::new(Courses::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Courses::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Courses::DeletedAt).big_integer().null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseTeachers::Table)
                    .if_not_exists()
                    .col(pk(CourseTeachers::Id))
                    .col(ColumnDef::new(CourseTeachers::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(CourseTeachers::TeacherId).big_integer().not_null())
                    .foreign_key(&mut fk(
                        CourseTeachers::Table,
                        CourseTeachers::CourseId,
                        Courses::Table,
                        Courses::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        CourseTeachers::Table,
                        CourseTeachers::TeacherId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        // 课时与滚动统计
        manager
            .create_table(
                Table::create()
                    .table(CourseSessions::Table)
                    .if_not_exists()
                    .col(pk(CourseSessions::Id))
                    .col(ColumnDef::new(CourseSessions::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(CourseSessions::Subject).string().not_null())
                    .col(ColumnDef::new(CourseSessions::Level).string().not_null())
                    .col(ColumnDef::new(CourseSessions::StatsAverageAttendance).double().null())
                    .col(ColumnDef::new(CourseSessions::StatsAverageGrade).double().null())
                    .col(ColumnDef::new(CourseSessions::StatsAverageBehavior).double().null())
                    .col(ColumnDef::new(CourseSessions::StatsLastUpdated).big_integer().null())
                    .col(ColumnDef::new(CourseSessions::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(CourseSessions::UpdatedAt).big_integer().not_null())
                    .foreign_key(&mut fk(
                        CourseSessions::Table,
                        CourseSessions::CourseId,
                        Courses::Table,
                        Courses::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SessionTimeslots::Table)
                    .if_not_exists()
                    .col(pk(SessionTimeslots::Id))
                    .col(ColumnDef::new(SessionTimeslots::SessionId).big_integer().not_null())
                    .col(ColumnDef::new(SessionTimeslots::Day).string().not_null())
                    .col(ColumnDef::new(SessionTimeslots::StartTime).string().not_null())
                    .col(ColumnDef::new(SessionTimeslots::EndTime).string().not_null())
                    .col(ColumnDef::new(SessionTimeslots::Classroom).string().null())
                    .foreign_key(&mut fk(
                        SessionTimeslots::Table,
                        SessionTimeslots::SessionId,
                        CourseSessions::Table,
                        CourseSessions::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SessionStudents::Table)
                    .if_not_exists()
                    .col(pk(SessionStudents::Id))
                    .col(ColumnDef::new(SessionStudents::SessionId).big_integer().not_null())
                    .col(ColumnDef::new(SessionStudents::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(SessionStudents::EnrolledAt).big_integer().not_null())
                    .foreign_key(&mut fk(
                        SessionStudents::Table,
                        SessionStudents::SessionId,
                        CourseSessions::Table,
                        CourseSessions::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        SessionStudents::Table,
                        SessionStudents::StudentId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        // 考勤表
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(pk(Attendances::Id))
                    .col(ColumnDef::new(Attendances::SessionId).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::Date).string().not_null())
                    .col(ColumnDef::new(Attendances::PresenceRate).double().not_null())
                    .col(ColumnDef::new(Attendances::TotalStudents).integer().not_null())
                    .col(ColumnDef::new(Attendances::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Attendances::ActiveKey).string().null())
                    .col(ColumnDef::new(Attendances::DeletedAt).big_integer().null())
                    .col(ColumnDef::new(Attendances::LastUpdate).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::CreatedAt).big_integer().not_null())
                    .foreign_key(&mut fk(
                        Attendances::Table,
                        Attendances::SessionId,
                        CourseSessions::Table,
                        CourseSessions::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        Attendances::Table,
                        Attendances::CreatedBy,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .col(pk(AttendanceRecords::Id))
                    .col(ColumnDef::new(AttendanceRecords::AttendanceId).big_integer().not_null())
                    .col(ColumnDef::new(AttendanceRecords::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(AttendanceRecords::IsPresent).boolean().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Comment).string().null())
                    .foreign_key(&mut fk(
                        AttendanceRecords::Table,
                        AttendanceRecords::AttendanceId,
                        Attendances::Table,
                        Attendances::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        AttendanceRecords::Table,
                        AttendanceRecords::StudentId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        // 课堂表现表
        manager
            .create_table(
                Table::create()
                    .table(Behaviors::Table)
                    .if_not_exists()
                    .col(pk(Behaviors::Id))
                    .col(ColumnDef::new(Behaviors::SessionId).big_integer().not_null())
                    .col(ColumnDef::new(Behaviors::Date).string().not_null())
                    .col(ColumnDef::new(Behaviors::BehaviorRate).double().not_null())
                    .col(ColumnDef::new(Behaviors::TotalStudents).integer().not_null())
                    .col(ColumnDef::new(Behaviors::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Behaviors::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Behaviors::ActiveKey).string().null())
                    .col(ColumnDef::new(Behaviors::DeletedAt).big_integer().null())
                    .col(ColumnDef::new(Behaviors::LastUpdate).big_integer().not_null())
                    .col(ColumnDef::new(Behaviors::CreatedAt).big_integer().not_null())
                    .foreign_key(&mut fk(
                        Behaviors::Table,
                        Behaviors::SessionId,
                        CourseSessions::Table,
                        CourseSessions::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        Behaviors::Table,
                        Behaviors::CreatedBy,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BehaviorRecords::Table)
                    .if_not_exists()
                    .col(pk(BehaviorRecords::Id))
                    .col(ColumnDef::new(BehaviorRecords::BehaviorId).big_integer().not_null())
                    .col(ColumnDef::new(BehaviorRecords::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(BehaviorRecords::Rating).integer().not_null())
                    .col(ColumnDef::new(BehaviorRecords::Comment).string().null())
                    .foreign_key(&mut fk(
                        BehaviorRecords::Table,
                        BehaviorRecords::BehaviorId,
                        Behaviors::Table,
                        Behaviors::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        BehaviorRecords::Table,
                        BehaviorRecords::StudentId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        // 成绩表
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(pk(Grades::Id))
                    .col(ColumnDef::new(Grades::SessionId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::Date).string().not_null())
                    .col(ColumnDef::new(Grades::GradeType).string().not_null())
                    .col(ColumnDef::new(Grades::IsDraft).boolean().not_null().default(false))
                    .col(ColumnDef::new(Grades::StatsAverage).double().not_null())
                    .col(ColumnDef::new(Grades::StatsHighest).double().not_null())
                    .col(ColumnDef::new(Grades::StatsLowest).double().not_null())
                    .col(ColumnDef::new(Grades::StatsAbsentCount).integer().not_null())
                    .col(ColumnDef::new(Grades::StatsTotalStudents).integer().not_null())
                    .col(ColumnDef::new(Grades::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Grades::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Grades::DeletedAt).big_integer().null())
                    .col(ColumnDef::new(Grades::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Grades::UpdatedAt).big_integer().not_null())
                    .foreign_key(&mut fk(
                        Grades::Table,
                        Grades::SessionId,
                        CourseSessions::Table,
                        CourseSessions::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        Grades::Table,
                        Grades::CreatedBy,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GradeRecords::Table)
                    .if_not_exists()
                    .col(pk(GradeRecords::Id))
                    .col(ColumnDef::new(GradeRecords::GradeId).big_integer().not_null())
                    .col(ColumnDef::new(GradeRecords::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(GradeRecords::Value).double().null())
                    .col(ColumnDef::new(GradeRecords::IsAbsent).boolean().not_null().default(false))
                    .col(ColumnDef::new(GradeRecords::Comment).string().null())
                    .foreign_key(&mut fk(
                        GradeRecords::Table,
                        GradeRecords::GradeId,
                        Grades::Table,
                        Grades::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        GradeRecords::Table,
                        GradeRecords::StudentId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        // 假期与作息
        manager
            .create_table(
                Table::create()
                    .table(Holidays::Table)
                    .if_not_exists()
                    .col(pk(Holidays::Id))
                    .col(ColumnDef::new(Holidays::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Holidays::Name).string().not_null())
                    .col(ColumnDef::new(Holidays::StartDate).string().not_null())
                    .col(ColumnDef::new(Holidays::EndDate).string().not_null())
                    .col(ColumnDef::new(Holidays::HolidayType).string().not_null())
                    .col(ColumnDef::new(Holidays::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Holidays::UpdatedBy).big_integer().null())
                    .col(ColumnDef::new(Holidays::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Holidays::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ScheduleConfigs::Table)
                    .if_not_exists()
                    .col(pk(ScheduleConfigs::Id))
                    .col(ColumnDef::new(ScheduleConfigs::AcademicYear).string().not_null())
                    .col(ColumnDef::new(ScheduleConfigs::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(ScheduleConfigs::UpdatedBy).big_integer().null())
                    .col(ColumnDef::new(ScheduleConfigs::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(ScheduleConfigs::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SchedulePeriods::Table)
                    .if_not_exists()
                    .col(pk(SchedulePeriods::Id))
                    .col(ColumnDef::new(SchedulePeriods::ConfigId).big_integer().not_null())
                    .col(ColumnDef::new(SchedulePeriods::Day).string().not_null())
                    .col(ColumnDef::new(SchedulePeriods::StartTime).string().not_null())
                    .col(ColumnDef::new(SchedulePeriods::EndTime).string().not_null())
                    .col(ColumnDef::new(SchedulePeriods::OrderNumber).integer().not_null())
                    .col(ColumnDef::new(SchedulePeriods::PeriodType).string().not_null())
                    .foreign_key(&mut fk(
                        SchedulePeriods::Table,
                        SchedulePeriods::ConfigId,
                        ScheduleConfigs::Table,
                        ScheduleConfigs::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        // 学生统计，一名学生一行
        manager
            .create_table(
                Table::create()
                    .table(StudentStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentStats::StudentId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentStats::AbsencesCount).integer().not_null())
                    .col(ColumnDef::new(StudentStats::AbsencesRate).double().not_null())
                    .col(ColumnDef::new(StudentStats::BehaviorAverage).double().not_null())
                    .col(ColumnDef::new(StudentStats::GradeAverage).double().null())
                    .col(ColumnDef::new(StudentStats::LastActivity).string().null())
                    .col(ColumnDef::new(StudentStats::LastUpdate).big_integer().not_null())
                    .foreign_key(&mut fk(
                        StudentStats::Table,
                        StudentStats::StudentId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        // 站内信
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(pk(Messages::Id))
                    .col(ColumnDef::new(Messages::SenderId).big_integer().not_null())
                    .col(ColumnDef::new(Messages::Subject).string().not_null())
                    .col(ColumnDef::new(Messages::Body).text().not_null())
                    .col(ColumnDef::new(Messages::ParentId).big_integer().null())
                    .col(ColumnDef::new(Messages::SenderDeleted).boolean().not_null().default(false))
                    .col(ColumnDef::new(Messages::CreatedAt).big_integer().not_null())
                    .foreign_key(&mut fk(
                        Messages::Table,
                        Messages::SenderId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        Messages::Table,
                        Messages::ParentId,
                        Messages::Table,
                        Messages::Id,
                        ForeignKeyAction::SetNull,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MessageRecipients::Table)
                    .if_not_exists()
                    .col(pk(MessageRecipients::Id))
                    .col(ColumnDef::new(MessageRecipients::MessageId).big_integer().not_null())
                    .col(ColumnDef::new(MessageRecipients::RecipientId).big_integer().not_null())
                    .col(ColumnDef::new(MessageRecipients::IsRead).boolean().not_null().default(false))
                    .col(ColumnDef::new(MessageRecipients::ReadAt).big_integer().null())
                    .col(ColumnDef::new(MessageRecipients::IsDeleted).boolean().not_null().default(false))
                    .foreign_key(&mut fk(
                        MessageRecipients::Table,
                        MessageRecipients::MessageId,
                        Messages::Table,
                        Messages::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        MessageRecipients::Table,
                        MessageRecipients::RecipientId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        // 登录日志
        manager
            .create_table(
                Table::create()
                    .table(ConnectionLogs::Table)
                    .if_not_exists()
                    .col(pk(ConnectionLogs::Id))
                    .col(ColumnDef::new(ConnectionLogs::UserId).big_integer().null())
                    .col(ColumnDef::new(ConnectionLogs::Email).string().not_null())
                    .col(ColumnDef::new(ConnectionLogs::Success).boolean().not_null())
                    .col(ColumnDef::new(ConnectionLogs::IpAddress).string().null())
                    .col(ColumnDef::new(ConnectionLogs::UserAgent).string().null())
                    .col(ColumnDef::new(ConnectionLogs::CreatedAt).big_integer().not_null())
                    .foreign_key(&mut fk(
                        ConnectionLogs::Table,
                        ConnectionLogs::UserId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::SetNull,
                    ))
                    .to_owned(),
            )
            .await?;

        // 家庭缴费：以家庭邮箱归属，可选关联到某个学生
        manager
            .create_table(
                Table::create()
                    .table(Fees::Table)
                    .if_not_exists()
                    .col(pk(Fees::Id))
                    .col(ColumnDef::new(Fees::FamilyEmail).string().not_null())
                    .col(ColumnDef::new(Fees::StudentId).big_integer().null())
                    .col(ColumnDef::new(Fees::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Fees::FeeType).string().not_null())
                    .col(ColumnDef::new(Fees::AmountDue).double().not_null())
                    .col(ColumnDef::new(Fees::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Fees::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Fees::UpdatedAt).big_integer().not_null())
                    .foreign_key(&mut fk(
                        Fees::Table,
                        Fees::StudentId,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::SetNull,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeePayments::Table)
                    .if_not_exists()
                    .col(pk(FeePayments::Id))
                    .col(ColumnDef::new(FeePayments::FeeId).big_integer().not_null())
                    .col(ColumnDef::new(FeePayments::AmountPaid).double().not_null())
                    .col(ColumnDef::new(FeePayments::Method).string().not_null())
                    .col(ColumnDef::new(FeePayments::PaidAt).big_integer().not_null())
                    .col(ColumnDef::new(FeePayments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(FeePayments::UpdatedAt).big_integer().not_null())
                    .foreign_key(&mut fk(
                        FeePayments::Table,
                        FeePayments::FeeId,
                        Fees::Table,
                        Fees::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeeNotes::Table)
                    .if_not_exists()
                    .col(pk(FeeNotes::Id))
                    .col(ColumnDef::new(FeeNotes::FeeId).big_integer().not_null())
                    .col(ColumnDef::new(FeeNotes::NoteText).text().not_null())
                    .col(ColumnDef::new(FeeNotes::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(FeeNotes::CreatedAt).big_integer().not_null())
                    .foreign_key(&mut fk(
                        FeeNotes::Table,
                        FeeNotes::FeeId,
                        Fees::Table,
                        Fees::Id,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        FeeNotes::Table,
                        FeeNotes::CreatedBy,
                        Users::Table,
                        Users::Id,
                        ForeignKeyAction::SetNull,
                    ))
                    .to_owned(),
            )
            .await?;

        index(manager, "idx_users_email", Users::Table, &[Users::Email], false).await?;
        index(manager, "idx_users_role", Users::Table, &[Users::Role], false).await?;
        index(
            manager,
            "idx_course_teachers_unique",
            CourseTeachers::Table,
            &[CourseTeachers::CourseId, CourseTeachers::TeacherId],
            true,
        )
        .await?;
        index(
            manager,
            "idx_course_teachers_teacher",
            CourseTeachers::Table,
            &[CourseTeachers::TeacherId],
            false,
        )
        .await?;
        index(
            manager,
            "idx_session_students_unique",
            SessionStudents::Table,
            &[SessionStudents::SessionId, SessionStudents::StudentId],
            true,
        )
        .await?;
        index(
            manager,
            "idx_attendances_session_date",
            Attendances::Table,
            &[Attendances::SessionId, Attendances::Date],
            false,
        )
        .await?;
        // 有效表唯一：停用的表 active_key 为 NULL，不参与唯一约束
        index(
            manager,
            "idx_attendances_active_key",
            Attendances::Table,
            &[Attendances::ActiveKey],
            true,
        )
        .await?;
        index(
            manager,
            "idx_attendance_records_student",
            AttendanceRecords::Table,
            &[AttendanceRecords::StudentId],
            false,
        )
        .await?;
        index(
            manager,
            "idx_behaviors_session_date",
            Behaviors::Table,
            &[Behaviors::SessionId, Behaviors::Date],
            false,
        )
        .await?;
        index(
            manager,
            "idx_behaviors_active_key",
            Behaviors::Table,
            &[Behaviors::ActiveKey],
            true,
        )
        .await?;
        index(
            manager,
            "idx_behavior_records_student",
            BehaviorRecords::Table,
            &[BehaviorRecords::StudentId],
            false,
        )
        .await?;
        index(manager, "idx_grades_session", Grades::Table, &[Grades::SessionId], false).await?;
        index(
            manager,
            "idx_grade_records_student",
            GradeRecords::Table,
            &[GradeRecords::StudentId],
            false,
        )
        .await?;
        index(
            manager,
            "idx_holidays_year",
            Holidays::Table,
            &[Holidays::AcademicYear],
            false,
        )
        .await?;
        index(
            manager,
            "idx_message_recipients_unique",
            MessageRecipients::Table,
            &[MessageRecipients::MessageId, MessageRecipients::RecipientId],
            true,
        )
        .await?;
        index(
            manager,
            "idx_message_recipients_recipient",
            MessageRecipients::Table,
            &[MessageRecipients::RecipientId],
            false,
        )
        .await?;
        index(
            manager,
            "idx_fees_family_year",
            Fees::Table,
            &[Fees::FamilyEmail, Fees::AcademicYear],
            false,
        )
        .await?;
        index(
            manager,
            "idx_fee_payments_fee",
            FeePayments::Table,
            &[FeePayments::FeeId],
            false,
        )
        .await?;
        index(manager, "idx_fee_notes_fee", FeeNotes::Table, &[FeeNotes::FeeId], false).await?;
        index(
            manager,
            "idx_connection_logs_created",
            ConnectionLogs::Table,
            &[ConnectionLogs::CreatedAt],
            false,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 先删依赖方
        let tables: [DynIden; 22] = [
            FeeNotes::Table.into_iden(),
            FeePayments::Table.into_iden(),
            Fees::Table.into_iden(),
            ConnectionLogs::Table.into_iden(),
            MessageRecipients::Table.into_iden(),
            Messages::Table.into_iden(),
            StudentStats::Table.into_iden(),
            SchedulePeriods::Table.into_iden(),
            ScheduleConfigs::Table.into_iden(),
            Holidays::Table.into_iden(),
            GradeRecords::Table.into_iden(),
            Grades::Table.into_iden(),
            BehaviorRecords::Table.into_iden(),
            Behaviors::Table.into_iden(),
            AttendanceRecords::Table.into_iden(),
            Attendances::Table.into_iden(),
            SessionStudents::Table.into_iden(),
            SessionTimeslots::Table.into_iden(),
            CourseSessions::Table.into_iden(),
            CourseTeachers::Table.into_iden(),
            Courses::Table.into_iden(),
            Users::Table.into_iden(),
        ];
        for table in tables {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden, Clone)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    Firstname,
    Lastname,
    IsActive,
    DateOfBirth,
    Gender,
    Phone,
    SecondaryEmail,
    SchoolYear,
    Subjects,
    LastLogin,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    AcademicYear,
    IsActive,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone)]
enum CourseTeachers {
    #[sea_orm(iden = "course_teachers")]
    Table,
    Id,
    CourseId,
    TeacherId,
}

#[derive(DeriveIden, Clone)]
enum CourseSessions {
    #[sea_orm(iden = "course_sessions")]
    Table,
    Id,
    CourseId,
    Subject,
    Level,
    StatsAverageAttendance,
    StatsAverageGrade,
    StatsAverageBehavior,
    StatsLastUpdated,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone)]
enum SessionTimeslots {
    #[sea_orm(iden = "session_timeslots")]
    Table,
    Id,
    SessionId,
    Day,
    StartTime,
    EndTime,
    Classroom,
}

#[derive(DeriveIden, Clone)]
enum SessionStudents {
    #[sea_orm(iden = "session_students")]
    Table,
    Id,
    SessionId,
    StudentId,
    EnrolledAt,
}

#[derive(DeriveIden, Clone)]
enum Attendances {
    #[sea_orm(iden = "attendances")]
    Table,
    Id,
    SessionId,
    Date,
    PresenceRate,
    TotalStudents,
    CreatedBy,
    IsActive,
    ActiveKey,
    DeletedAt,
    LastUpdate,
    CreatedAt,
}

#[derive(DeriveIden, Clone)]
enum AttendanceRecords {
    #[sea_orm(iden = "attendance_records")]
    Table,
    Id,
    AttendanceId,
    StudentId,
    IsPresent,
    Comment,
}

#[derive(DeriveIden, Clone)]
enum Behaviors {
    #[sea_orm(iden = "behaviors")]
    Table,
    Id,
    SessionId,
    Date,
    BehaviorRate,
    TotalStudents,
    CreatedBy,
    IsActive,
    ActiveKey,
    DeletedAt,
    LastUpdate,
    CreatedAt,
}

#[derive(DeriveIden, Clone)]
enum BehaviorRecords {
    #[sea_orm(iden = "behavior_records")]
    Table,
    Id,
    BehaviorId,
    StudentId,
    Rating,
    Comment,
}

#[derive(DeriveIden, Clone)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    SessionId,
    Date,
    GradeType,
    IsDraft,
    StatsAverage,
    StatsHighest,
    StatsLowest,
    StatsAbsentCount,
    StatsTotalStudents,
    CreatedBy,
    IsActive,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone)]
enum GradeRecords {
    #[sea_orm(iden = "grade_records")]
    Table,
    Id,
    GradeId,
    StudentId,
    Value,
    IsAbsent,
    Comment,
}

#[derive(DeriveIden, Clone)]
enum Holidays {
    #[sea_orm(iden = "holidays")]
    Table,
    Id,
    AcademicYear,
    Name,
    StartDate,
    EndDate,
    HolidayType,
    IsActive,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone)]
enum ScheduleConfigs {
    #[sea_orm(iden = "schedule_configs")]
    Table,
    Id,
    AcademicYear,
    IsActive,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone)]
enum SchedulePeriods {
    #[sea_orm(iden = "schedule_periods")]
    Table,
    Id,
    ConfigId,
    Day,
    StartTime,
    EndTime,
    OrderNumber,
    PeriodType,
}

#[derive(DeriveIden, Clone)]
enum StudentStats {
    #[sea_orm(iden = "student_stats")]
    Table,
    StudentId,
    AbsencesCount,
    AbsencesRate,
    BehaviorAverage,
    GradeAverage,
    LastActivity,
    LastUpdate,
}

#[derive(DeriveIden, Clone)]
enum Messages {
    #[sea_orm(iden = "messages")]
    Table,
    Id,
    SenderId,
    Subject,
    Body,
    ParentId,
    SenderDeleted,
    CreatedAt,
}

#[derive(DeriveIden, Clone)]
enum MessageRecipients {
    #[sea_orm(iden = "message_recipients")]
    Table,
    Id,
    MessageId,
    RecipientId,
    IsRead,
    ReadAt,
    IsDeleted,
}

#[derive(DeriveIden, Clone)]
enum ConnectionLogs {
    #[sea_orm(iden = "connection_logs")]
    Table,
    Id,
    UserId,
    Email,
    Success,
    IpAddress,
    UserAgent,
    CreatedAt,
}

#[derive(DeriveIden, Clone)]
enum Fees {
    #[sea_orm(iden = "fees")]
    Table,
    Id,
    FamilyEmail,
    StudentId,
    AcademicYear,
    FeeType,
    AmountDue,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone)]
enum FeePayments {
    #[sea_orm(iden = "fee_payments")]
    Table,
    Id,
    FeeId,
    AmountPaid,
    Method,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone)]
enum FeeNotes {
    #[sea_orm(iden = "fee_notes")]
    Table,
    Id,
    FeeId,
    NoteText,
    CreatedBy,
    CreatedAt,
}
