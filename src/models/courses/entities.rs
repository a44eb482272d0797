use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::User;

/// 可选年级
pub const LEVELS: &[&str] = &[
    "0", "0-2", "1", "1-2", "2", "2-3", "3", "3-4", "4", "4-5", "5", "5-6", "6",
];

pub fn is_valid_level(level: &str) -> bool {
    LEVELS.contains(&level)
}

// 科目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub enum Subject {
    #[ts(rename = "Arabe")]
    Arabe,
    #[ts(rename = "Education Culturelle")]
    EducationCulturelle,
}

impl Subject {
    pub const ARABE: &'static str = "Arabe";
    pub const EDUCATION_CULTURELLE: &'static str = "Education Culturelle";
}

impl Serialize for Subject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Subject {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Subject>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的科目: '{s}'. 支持的科目: Arabe, Education Culturelle"
            ))
        })
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Arabe => write!(f, "{}", Subject::ARABE),
            Subject::EducationCulturelle => write!(f, "{}", Subject::EDUCATION_CULTURELLE),
        }
    }
}

impl std::str::FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Subject::ARABE => Ok(Subject::Arabe),
            Subject::EDUCATION_CULTURELLE => Ok(Subject::EducationCulturelle),
            _ => Err(format!("Invalid subject: {s}")),
        }
    }
}

// 上课时段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub enum TimeSlotDay {
    SaturdayMorning,
    SaturdayAfternoon,
    SundayMorning,
}

impl TimeSlotDay {
    pub const ALL: [TimeSlotDay; 3] = [
        TimeSlotDay::SaturdayMorning,
        TimeSlotDay::SaturdayAfternoon,
        TimeSlotDay::SundayMorning,
    ];

    pub fn weekday(&self) -> Weekday {
        match self {
            TimeSlotDay::SaturdayMorning | TimeSlotDay::SaturdayAfternoon => Weekday::Sat,
            TimeSlotDay::SundayMorning => Weekday::Sun,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlotDay::SaturdayMorning => "saturday_morning",
            TimeSlotDay::SaturdayAfternoon => "saturday_afternoon",
            TimeSlotDay::SundayMorning => "sunday_morning",
        }
    }
}

impl std::fmt::Display for TimeSlotDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeSlotDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlotDay::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| format!("Invalid time slot: {s}"))
    }
}

// 课时时间段
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Timeslot {
    pub id: i64,
    pub session_id: i64,
    pub day: TimeSlotDay,
    /// HH:MM
    pub start_time: String,
    /// HH:MM
    pub end_time: String,
    pub classroom: Option<String>,
}

// 课时滚动统计
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct SessionStats {
    pub average_attendance: Option<f64>,
    pub average_grade: Option<f64>,
    pub average_behavior: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

// 课时（某科目某年级的固定上课安排）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseSession {
    pub id: i64,
    pub course_id: i64,
    pub subject: Subject,
    pub level: String,
    pub stats: SessionStats,
    pub timeslots: Vec<Timeslot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub academic_year: String,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 课程详情（含教师与课时）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub course: Course,
    pub teachers: Vec<User>,
    pub sessions: Vec<CourseSession>,
}

// 课时详情（含选课学生）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct SessionDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub session: CourseSession,
    pub academic_year: String,
    pub teachers: Vec<User>,
    pub students: Vec<User>,
}

// 选课记录
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct SessionStudent {
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub enrolled_at: DateTime<Utc>,
}

/// 教师已占用的时间段，用于冲突检测
#[derive(Debug, Clone)]
pub struct TeacherTimeslot {
    pub teacher_id: i64,
    pub course_id: i64,
    pub session_id: i64,
    pub day: TimeSlotDay,
    pub start_time: String,
    pub end_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_serde_uses_display_names() {
        let json = serde_json::to_string(&Subject::EducationCulturelle).unwrap();
        assert_eq!(json, r#""Education Culturelle""#);
        let parsed: Subject = serde_json::from_str(r#""Arabe""#).unwrap();
        assert_eq!(parsed, Subject::Arabe);
        assert!(serde_json::from_str::<Subject>(r#""Maths""#).is_err());
    }

    #[test]
    fn test_timeslot_day_weekday() {
        assert_eq!(TimeSlotDay::SaturdayMorning.weekday(), Weekday::Sat);
        assert_eq!(TimeSlotDay::SaturdayAfternoon.weekday(), Weekday::Sat);
        assert_eq!(TimeSlotDay::SundayMorning.weekday(), Weekday::Sun);
        assert_eq!(
            "sunday_morning".parse::<TimeSlotDay>().unwrap(),
            TimeSlotDay::SundayMorning
        );
    }

    #[test]
    fn test_levels() {
        assert!(is_valid_level("0-2"));
        assert!(is_valid_level("6"));
        assert!(!is_valid_level("7"));
    }
}
