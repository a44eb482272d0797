//! 预导入模块

pub use super::attendance_records::{
    ActiveModel as AttendanceRecordActiveModel, Entity as AttendanceRecords,
    Model as AttendanceRecordModel,
};
pub use super::attendances::{
    ActiveModel as AttendanceActiveModel, Entity as Attendances, Model as AttendanceModel,
};
pub use super::behavior_records::{
    ActiveModel as BehaviorRecordActiveModel, Entity as BehaviorRecords,
    Model as BehaviorRecordModel,
};
pub use super::behaviors::{
    ActiveModel as BehaviorActiveModel, Entity as Behaviors, Model as BehaviorModel,
};
pub use super::connection_logs::{
    ActiveModel as ConnectionLogActiveModel, Entity as ConnectionLogs, Model as ConnectionLogModel,
};
pub use super::course_sessions::{
    ActiveModel as CourseSessionActiveModel, Entity as CourseSessions, Model as CourseSessionModel,
};
pub use super::course_teachers::{
    ActiveModel as CourseTeacherActiveModel, Entity as CourseTeachers, Model as CourseTeacherModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::fee_notes::{
    ActiveModel as FeeNoteActiveModel, Entity as FeeNotes, Model as FeeNoteModel,
};
pub use super::fee_payments::{
    ActiveModel as FeePaymentActiveModel, Entity as FeePayments, Model as FeePaymentModel,
};
pub use super::fees::{ActiveModel as FeeActiveModel, Entity as Fees, Model as FeeModel};
pub use super::grade_records::{
    ActiveModel as GradeRecordActiveModel, Entity as GradeRecords, Model as GradeRecordModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::holidays::{
    ActiveModel as HolidayActiveModel, Entity as Holidays, Model as HolidayModel,
};
pub use super::message_recipients::{
    ActiveModel as MessageRecipientActiveModel, Entity as MessageRecipients,
    Model as MessageRecipientModel,
};
pub use super::messages::{
    ActiveModel as MessageActiveModel, Entity as Messages, Model as MessageModel,
};
pub use super::schedule_configs::{
    ActiveModel as ScheduleConfigActiveModel, Entity as ScheduleConfigs,
    Model as ScheduleConfigModel,
};
pub use super::schedule_periods::{
    ActiveModel as SchedulePeriodActiveModel, Entity as SchedulePeriods,
    Model as SchedulePeriodModel,
};
pub use super::session_students::{
    ActiveModel as SessionStudentActiveModel, Entity as SessionStudents,
    Model as SessionStudentModel,
};
pub use super::session_timeslots::{
    ActiveModel as SessionTimeslotActiveModel, Entity as SessionTimeslots,
    Model as SessionTimeslotModel,
};
pub use super::student_stats::{
    ActiveModel as StudentStatsActiveModel, Entity as StudentStatsTable, Model as StudentStatsModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
