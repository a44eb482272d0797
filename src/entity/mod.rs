//! SeaORM 实体定义
//!
//! 与 models 中的业务实体分离：时间戳存为 Unix 秒，日期存为 `YYYY-MM-DD` 字符串，
//! 枚举存为字符串。各实体的 `into_*` 方法负责转换为业务实体。

pub mod prelude;

pub mod attendance_records;
pub mod attendances;
pub mod behavior_records;
pub mod behaviors;
pub mod connection_logs;
pub mod course_sessions;
pub mod course_teachers;
pub mod courses;
pub mod fee_notes;
pub mod fee_payments;
pub mod fees;
pub mod grade_records;
pub mod grades;
pub mod holidays;
pub mod message_recipients;
pub mod messages;
pub mod schedule_configs;
pub mod schedule_periods;
pub mod session_students;
pub mod session_timeslots;
pub mod student_stats;
pub mod users;

use chrono::{DateTime, NaiveDate, Utc};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

pub(crate) fn parse_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_default()
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 有效考勤/表现表的唯一键，停用时置空；唯一索引保证同一课时同一天只有一张有效表
pub(crate) fn active_sheet_key(session_id: i64, date: &str) -> String {
    format!("{session_id}:{date}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_date(date), "2024-03-09");
        assert_eq!(parse_date("2024-03-09"), date);
        assert_eq!(parse_date("garbage"), NaiveDate::default());
    }

    #[test]
    fn test_active_sheet_key() {
        assert_eq!(active_sheet_key(12, "2024-03-09"), "12:2024-03-09");
        assert_ne!(active_sheet_key(1, "2024-03-09"), active_sheet_key(2, "2024-03-09"));
    }
}
