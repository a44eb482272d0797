//! 统计汇总：全部是对已取出记录的单次遍历

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::SchoolConfig;
use crate::models::attendances::entities::StudentAttendanceEntry;
use crate::models::behaviors::entities::StudentBehaviorEntry;
use crate::models::courses::entities::{CourseSession, Subject, TimeSlotDay};
use crate::models::grades::entities::{GradeStats, StudentGradeEntry};
use crate::models::stats::entities::{
    AbsenceEntry, AgeStats, AttendanceSummary, BehaviorSummary, DistributionBucket,
    DuplicateSheetGroup, GenderDistribution, GradeSummary, HighRiskStudent, HighRiskSummary,
    MissingAttendance, RiskLevel, StudentStats, SubjectAverage,
};
use crate::models::stats::requests::RiskSort;
use crate::models::users::entities::{Gender, User};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(part as f64 / total as f64 * 100.0)
    }
}

/// 平均值，空集合返回 None
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// 出勤率 = 出勤人数 / 总人数 × 100
pub fn presence_rate(present: usize, total: usize) -> f64 {
    percentage(present, total)
}

/// 一张表现表的平均评分
pub fn behavior_rate(ratings: &[i32]) -> f64 {
    mean(ratings.iter().map(|r| *r as f64))
        .map(round2)
        .unwrap_or(0.0)
}

/// 一次评估的统计，输入为 (分数, 是否缺考)
pub fn grade_stats<I>(records: I) -> GradeStats
where
    I: IntoIterator<Item = (Option<f64>, bool)>,
{
    let mut stats = GradeStats::default();
    let mut valid = Vec::new();
    for (value, is_absent) in records {
        stats.total_students += 1;
        if is_absent {
            stats.absent_count += 1;
            continue;
        }
        if let Some(v) = value {
            valid.push(v);
        }
    }

    if let Some(avg) = mean(valid.iter().copied()) {
        stats.average = round2(avg);
        stats.highest = valid.iter().copied().fold(f64::MIN, f64::max);
        stats.lowest = valid.iter().copied().fold(f64::MAX, f64::min);
    }
    stats
}

/// 课时平均成绩：逐表取有效分数的平均，没有有效分数的表不计入
pub fn session_grade_average<S, R>(sheets: S) -> Option<f64>
where
    S: IntoIterator<Item = R>,
    R: IntoIterator<Item = (Option<f64>, bool)>,
{
    let averages: Vec<f64> = sheets
        .into_iter()
        .filter_map(|records| {
            let values = records
                .into_iter()
                .filter(|(_, is_absent)| !is_absent)
                .filter_map(|(value, _)| value);
            mean(values).map(round2)
        })
        .collect();
    mean(averages).map(round2)
}

/// 按日期去重，同一天只保留最先出现的一条
pub fn dedupe_by_date<T, F>(entries: &[T], date_of: F) -> Vec<&T>
where
    F: Fn(&T) -> NaiveDate,
{
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert(date_of(entry)))
        .collect()
}

pub fn attendance_summary(entries: &[StudentAttendanceEntry]) -> AttendanceSummary {
    let unique = dedupe_by_date(entries, |e| e.date);
    let total = unique.len();
    let present = unique.iter().filter(|e| e.is_present).count();
    let absences = unique
        .iter()
        .filter(|e| !e.is_present)
        .map(|e| AbsenceEntry {
            date: e.date,
            session_id: e.session_id,
            subject: e.subject,
            reason: e.comment.clone(),
        })
        .collect();

    AttendanceSummary {
        total_sessions: total as i32,
        present: present as i32,
        absences,
        attendance_rate: percentage(present, total),
        last_activity: unique.iter().map(|e| e.date).max(),
    }
}

pub fn behavior_summary(entries: &[StudentBehaviorEntry]) -> BehaviorSummary {
    let unique = dedupe_by_date(entries, |e| e.date);
    BehaviorSummary {
        total_sessions: unique.len() as i32,
        average: mean(unique.iter().map(|e| e.rating as f64))
            .map(round2)
            .unwrap_or(0.0),
    }
}

/// 只计入已发布且未缺考的成绩
pub fn grade_summary(entries: &[StudentGradeEntry]) -> GradeSummary {
    let mut per_subject: BTreeMap<&'static str, (Subject, Vec<f64>)> = BTreeMap::new();
    let mut all_values = Vec::new();
    for entry in entries.iter().filter(|e| !e.is_draft && !e.is_absent) {
        let Some(value) = entry.value else {
            continue;
        };
        all_values.push(value);
        let key = match entry.subject {
            Subject::Arabe => Subject::ARABE,
            Subject::EducationCulturelle => Subject::EDUCATION_CULTURELLE,
        };
        per_subject
            .entry(key)
            .or_insert_with(|| (entry.subject, Vec::new()))
            .1
            .push(value);
    }

    let subjects: Vec<SubjectAverage> = per_subject
        .into_values()
        .filter_map(|(subject, values)| {
            mean(values.iter().copied()).map(|avg| SubjectAverage {
                subject,
                average: round2(avg),
                count: values.len() as i32,
            })
        })
        .collect();
    // 总平均按每个分数计算，不是各科平均的平均
    let overall_average = mean(all_values).map(round2);

    GradeSummary {
        subjects,
        overall_average,
    }
}

/// 由三类汇总生成持久化统计
pub fn build_student_stats(
    student_id: i64,
    attendance: &AttendanceSummary,
    behavior: &BehaviorSummary,
    grades: &GradeSummary,
    now: DateTime<Utc>,
) -> StudentStats {
    let total = attendance.total_sessions.max(0) as usize;
    StudentStats {
        student_id,
        absences_count: attendance.absences.len() as i32,
        absences_rate: percentage(attendance.absences.len(), total),
        behavior_average: behavior.average,
        grade_average: grades.overall_average,
        last_activity: attendance.last_activity,
        last_update: now,
    }
}

fn bucket(count: usize, total: usize) -> DistributionBucket {
    DistributionBucket {
        count: count as i32,
        percentage: format!("{:.2}", percentage(count, total)),
    }
}

pub fn gender_distribution(students: &[User]) -> GenderDistribution {
    let total = students.len();
    let masculin = students
        .iter()
        .filter(|s| s.gender == Some(Gender::Masculin))
        .count();
    let feminin = students
        .iter()
        .filter(|s| s.gender == Some(Gender::Feminin))
        .count();
    GenderDistribution {
        masculin: bucket(masculin, total),
        feminin: bucket(feminin, total),
        undefined: bucket(total - masculin - feminin, total),
    }
}

/// 仅统计有出生日期的学生
pub fn age_stats(students: &[User], today: NaiveDate) -> Option<AgeStats> {
    let ages: Vec<u32> = students.iter().filter_map(|s| s.age_on(today)).collect();
    let min = *ages.iter().min()?;
    let max = *ages.iter().max()?;
    let average = mean(ages.iter().map(|a| *a as f64)).map(round2)?;
    Some(AgeStats { min, max, average })
}

#[derive(Debug, Clone, Copy)]
pub struct RiskThresholds {
    pub step: i32,
    pub medium: i32,
    pub high: i32,
}

impl From<&SchoolConfig> for RiskThresholds {
    fn from(config: &SchoolConfig) -> Self {
        Self {
            step: config.high_risk_absence_step,
            medium: config.medium_risk_absences,
            high: config.high_risk_absences,
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            step: 3,
            medium: 6,
            high: 9,
        }
    }
}

/// 缺勤次数为 step 的正整数倍时才进入名单
pub fn classify_risk(absences: i32, thresholds: RiskThresholds) -> Option<RiskLevel> {
    if absences <= 0 || thresholds.step <= 0 || absences % thresholds.step != 0 {
        return None;
    }
    Some(if absences >= thresholds.high {
        RiskLevel::High
    } else if absences >= thresholds.medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    })
}

/// 高风险候选：学生、缺勤次数、最近一次缺勤日期
pub struct RiskCandidate {
    pub student: User,
    pub absences_count: i32,
    pub last_absence_date: Option<NaiveDate>,
}

pub fn high_risk_students(
    candidates: Vec<RiskCandidate>,
    thresholds: RiskThresholds,
    today: NaiveDate,
    sort: RiskSort,
) -> (Vec<HighRiskStudent>, HighRiskSummary) {
    let mut items: Vec<HighRiskStudent> = candidates
        .into_iter()
        .filter_map(|c| {
            let risk_level = classify_risk(c.absences_count, thresholds)?;
            Some(HighRiskStudent {
                student_id: c.student.id,
                firstname: c.student.firstname,
                lastname: c.student.lastname,
                email: c.student.email,
                absences_count: c.absences_count,
                risk_level,
                last_absence_date: c.last_absence_date,
                days_since_last_absence: c
                    .last_absence_date
                    .map(|d| today.signed_duration_since(d).num_days()),
            })
        })
        .collect();

    match sort {
        RiskSort::RiskLevel => items.sort_by(|a, b| {
            b.risk_level
                .cmp(&a.risk_level)
                .then(b.absences_count.cmp(&a.absences_count))
        }),
        // None 小于任何 Some，倒序后排在最后
        RiskSort::RecentAbsence => {
            items.sort_by(|a, b| b.last_absence_date.cmp(&a.last_absence_date))
        }
        RiskSort::Alphabetical => items.sort_by(|a, b| {
            a.lastname
                .to_lowercase()
                .cmp(&b.lastname.to_lowercase())
                .then_with(|| a.firstname.to_lowercase().cmp(&b.firstname.to_lowercase()))
        }),
    }

    let mut summary = HighRiskSummary {
        total: items.len() as i32,
        ..Default::default()
    };
    for item in &items {
        match item.risk_level {
            RiskLevel::High => summary.high += 1,
            RiskLevel::Medium => summary.medium += 1,
            RiskLevel::Low => summary.low += 1,
        }
        summary.total_absences += item.absences_count;
    }
    (items, summary)
}

/// 维护任务与重复检查共用的表头信息
#[derive(Debug, Clone)]
pub struct SheetHeader {
    pub id: i64,
    pub session_id: i64,
    pub date: NaiveDate,
    pub last_update: DateTime<Utc>,
}

fn group_by_session_day(sheets: &[SheetHeader]) -> BTreeMap<(NaiveDate, i64), Vec<&SheetHeader>> {
    let mut groups: BTreeMap<(NaiveDate, i64), Vec<&SheetHeader>> = BTreeMap::new();
    for sheet in sheets {
        groups
            .entry((sheet.date, sheet.session_id))
            .or_default()
            .push(sheet);
    }
    groups
}

/// 同一课时同一天的多张有效表，按日期排序
pub fn duplicate_groups(sheets: &[SheetHeader]) -> Vec<DuplicateSheetGroup> {
    group_by_session_day(sheets)
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|((date, session_id), group)| DuplicateSheetGroup {
            session_id,
            date,
            sheet_ids: group.iter().map(|s| s.id).collect(),
        })
        .collect()
}

/// 每组保留最近更新的一张，返回需要停用的 id
pub fn sheets_to_deactivate(sheets: &[SheetHeader]) -> Vec<i64> {
    let mut ids = Vec::new();
    for (_, group) in group_by_session_day(sheets) {
        if group.len() < 2 {
            continue;
        }
        let Some(keep) = group
            .iter()
            .max_by(|a, b| a.last_update.cmp(&b.last_update).then(a.id.cmp(&b.id)))
            .map(|s| s.id)
        else {
            continue;
        };
        ids.extend(group.iter().map(|s| s.id).filter(|id| *id != keep));
    }
    ids
}

/// 某课时在 [from, until] 内应有但缺少考勤的日期
pub fn missing_attendance(
    session: &CourseSession,
    from: NaiveDate,
    until: NaiveDate,
    holidays: &[crate::models::calendar::entities::HolidayPeriod],
    recorded: &HashSet<NaiveDate>,
) -> Vec<MissingAttendance> {
    let mut days: Vec<TimeSlotDay> = session.timeslots.iter().map(|t| t.day).collect();
    days.sort();
    days.dedup();

    days.into_iter()
        .filter_map(|day| {
            let dates: Vec<NaiveDate> =
                crate::utils::calendar::weekly_dates(day, from, until, holidays)
                    .into_iter()
                    .filter(|d| !recorded.contains(d))
                    .collect();
            (!dates.is_empty()).then(|| MissingAttendance {
                session_id: session.id,
                subject: session.subject,
                level: session.level.clone(),
                day,
                dates,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::entities::{SessionStats, Timeslot};
    use crate::models::grades::entities::GradeType;
    use crate::models::users::entities::UserRole;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn attendance(date: NaiveDate, session_id: i64, present: bool) -> StudentAttendanceEntry {
        StudentAttendanceEntry {
            attendance_id: session_id * 100 + date.ordinal() as i64,
            session_id,
            subject: Subject::Arabe,
            date,
            is_present: present,
            comment: (!present).then(|| "malade".to_string()),
            last_update: Utc::now(),
        }
    }

    fn grade(subject: Subject, value: Option<f64>, absent: bool, draft: bool) -> StudentGradeEntry {
        StudentGradeEntry {
            grade_id: 1,
            session_id: 1,
            subject,
            date: ymd(2024, 10, 5),
            grade_type: GradeType::Controle,
            value,
            is_absent: absent,
            is_draft: draft,
        }
    }

    fn student(id: i64, gender: Option<Gender>, dob: Option<NaiveDate>) -> User {
        User {
            id,
            email: format!("famille{id}@example.com"),
            password_hash: None,
            role: UserRole::Student,
            firstname: format!("Eleve{id}"),
            lastname: "Benali".into(),
            is_active: true,
            date_of_birth: dob,
            gender,
            phone: None,
            secondary_email: None,
            school_year: None,
            subjects: vec![],
            last_login: None,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    use chrono::Datelike;

    #[test]
    fn test_presence_rate() {
        assert_eq!(presence_rate(2, 3), 66.67);
        assert_eq!(presence_rate(0, 0), 0.0);
        assert_eq!(presence_rate(4, 4), 100.0);
    }

    #[test]
    fn test_behavior_rate() {
        assert_eq!(behavior_rate(&[4, 5, 3]), 4.0);
        assert_eq!(behavior_rate(&[]), 0.0);
    }

    #[test]
    fn test_grade_stats_ignores_absent_and_missing_values() {
        let stats = grade_stats([
            (Some(12.0), false),
            (Some(18.5), false),
            (None, true),
            (Some(7.0), true),
            (None, false),
        ]);
        assert_eq!(stats.total_students, 5);
        assert_eq!(stats.absent_count, 2);
        assert_eq!(stats.highest, 18.5);
        assert_eq!(stats.lowest, 12.0);
        assert_eq!(stats.average, 15.25);
    }

    #[test]
    fn test_grade_stats_all_absent() {
        let stats = grade_stats([(None, true), (None, true)]);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.highest, 0.0);
        assert_eq!(stats.lowest, 0.0);
        assert_eq!(stats.absent_count, 2);
        assert_eq!(stats.total_students, 2);
    }

    #[test]
    fn test_attendance_summary_counts_each_day_once() {
        let entries = vec![
            attendance(ymd(2024, 10, 5), 1, true),
            // 同一天的第二张表被忽略
            attendance(ymd(2024, 10, 5), 2, false),
            attendance(ymd(2024, 10, 12), 1, false),
            attendance(ymd(2024, 10, 19), 1, true),
        ];
        let summary = attendance_summary(&entries);
        assert_eq!(summary.total_sessions, 3);
        assert_eq!(summary.present, 2);
        assert_eq!(summary.absences.len(), 1);
        assert_eq!(summary.absences[0].date, ymd(2024, 10, 12));
        assert_eq!(summary.absences[0].reason.as_deref(), Some("malade"));
        assert_eq!(summary.attendance_rate, 66.67);
        assert_eq!(summary.last_activity, Some(ymd(2024, 10, 19)));
    }

    #[test]
    fn test_grade_summary_per_subject() {
        let entries = vec![
            grade(Subject::Arabe, Some(10.0), false, false),
            grade(Subject::Arabe, Some(15.0), false, false),
            grade(Subject::Arabe, Some(2.0), false, true),
            grade(Subject::EducationCulturelle, Some(16.0), false, false),
            grade(Subject::EducationCulturelle, None, true, false),
        ];
        let summary = grade_summary(&entries);
        assert_eq!(summary.subjects.len(), 2);
        let arabe = summary
            .subjects
            .iter()
            .find(|s| s.subject == Subject::Arabe)
            .unwrap();
        assert_eq!(arabe.average, 12.5);
        assert_eq!(arabe.count, 2);
        assert_eq!(summary.overall_average, Some(13.67));
        assert_eq!(grade_summary(&[]).overall_average, None);
    }

    #[test]
    fn test_overall_average_weights_every_grade() {
        let entries = vec![
            grade(Subject::Arabe, Some(10.0), false, false),
            grade(Subject::Arabe, Some(10.0), false, false),
            grade(Subject::Arabe, Some(10.0), false, false),
            grade(Subject::EducationCulturelle, Some(20.0), false, false),
        ];
        let summary = grade_summary(&entries);
        assert_eq!(summary.subjects.len(), 2);
        assert_eq!(summary.overall_average, Some(12.5));
    }

    #[test]
    fn test_session_grade_average_skips_sheets_without_values() {
        let sheets = vec![
            vec![(Some(12.0), false), (Some(14.0), false)],
            // 只有缺考和未录入分数
            vec![(None, true), (None, false)],
            vec![(Some(16.0), false), (Some(3.0), true)],
        ];
        assert_eq!(session_grade_average(sheets), Some(14.5));
        assert_eq!(session_grade_average(vec![vec![(None, false)]]), None);
        assert_eq!(session_grade_average(Vec::<Vec<(Option<f64>, bool)>>::new()), None);
    }

    #[test]
    fn test_build_student_stats() {
        let entries = vec![
            attendance(ymd(2024, 10, 5), 1, false),
            attendance(ymd(2024, 10, 12), 1, true),
        ];
        let att = attendance_summary(&entries);
        let beh = BehaviorSummary {
            total_sessions: 1,
            average: 4.0,
        };
        let grades = grade_summary(&[]);
        let stats = build_student_stats(9, &att, &beh, &grades, Utc::now());
        assert_eq!(stats.absences_count, 1);
        assert_eq!(stats.absences_rate, 50.0);
        assert_eq!(stats.behavior_average, 4.0);
        assert_eq!(stats.grade_average, None);
    }

    #[test]
    fn test_gender_distribution_percentages() {
        let students = vec![
            student(1, Some(Gender::Masculin), None),
            student(2, Some(Gender::Feminin), None),
            student(3, Some(Gender::Feminin), None),
        ];
        let dist = gender_distribution(&students);
        assert_eq!(dist.masculin.count, 1);
        assert_eq!(dist.masculin.percentage, "33.33");
        assert_eq!(dist.feminin.percentage, "66.67");
        assert_eq!(dist.undefined.percentage, "0.00");
        assert_eq!(gender_distribution(&[]).undefined.percentage, "0.00");
    }

    #[test]
    fn test_age_stats() {
        let today = ymd(2024, 10, 1);
        let students = vec![
            student(1, None, Some(ymd(2014, 1, 1))),
            student(2, None, Some(ymd(2016, 12, 1))),
            student(3, None, None),
        ];
        let stats = age_stats(&students, today).unwrap();
        assert_eq!(stats.min, 7);
        assert_eq!(stats.max, 10);
        assert_eq!(stats.average, 8.5);
        assert!(age_stats(&students[2..], today).is_none());
    }

    #[test]
    fn test_classify_risk() {
        let t = RiskThresholds::default();
        assert_eq!(classify_risk(0, t), None);
        assert_eq!(classify_risk(4, t), None);
        assert_eq!(classify_risk(3, t), Some(RiskLevel::Low));
        assert_eq!(classify_risk(6, t), Some(RiskLevel::Medium));
        assert_eq!(classify_risk(12, t), Some(RiskLevel::High));
    }

    #[test]
    fn test_high_risk_sorting_and_summary() {
        let today = ymd(2024, 11, 30);
        let candidates = vec![
            RiskCandidate {
                student: student(1, None, None),
                absences_count: 3,
                last_absence_date: Some(ymd(2024, 11, 23)),
            },
            RiskCandidate {
                student: student(2, None, None),
                absences_count: 9,
                last_absence_date: None,
            },
            RiskCandidate {
                student: student(3, None, None),
                absences_count: 5,
                last_absence_date: None,
            },
            RiskCandidate {
                student: student(4, None, None),
                absences_count: 6,
                last_absence_date: None,
            },
        ];
        let (items, summary) =
            high_risk_students(candidates, RiskThresholds::default(), today, RiskSort::RiskLevel);
        let ids: Vec<i64> = items.iter().map(|i| i.student_id).collect();
        assert_eq!(ids, vec![2, 4, 1]);
        assert_eq!(items[2].days_since_last_absence, Some(7));
        assert_eq!(
            summary,
            HighRiskSummary {
                total: 3,
                high: 1,
                medium: 1,
                low: 1,
                total_absences: 18,
            }
        );
    }

    #[test]
    fn test_high_risk_alternative_sorts() {
        let today = ymd(2024, 11, 30);
        let named = |id: i64, lastname: &str, firstname: &str, last: Option<NaiveDate>| {
            let mut s = student(id, None, None);
            s.lastname = lastname.to_string();
            s.firstname = firstname.to_string();
            RiskCandidate {
                student: s,
                absences_count: 3,
                last_absence_date: last,
            }
        };
        let candidates = || {
            vec![
                named(1, "Saidi", "Yanis", Some(ymd(2024, 11, 2))),
                named(2, "benali", "Sara", None),
                named(3, "Benali", "Adam", Some(ymd(2024, 11, 23))),
            ]
        };

        let (items, _) = high_risk_students(
            candidates(),
            RiskThresholds::default(),
            today,
            RiskSort::RecentAbsence,
        );
        let ids: Vec<i64> = items.iter().map(|i| i.student_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let (items, _) = high_risk_students(
            candidates(),
            RiskThresholds::default(),
            today,
            RiskSort::Alphabetical,
        );
        let ids: Vec<i64> = items.iter().map(|i| i.student_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    fn header(id: i64, session_id: i64, date: NaiveDate, minutes: i64) -> SheetHeader {
        SheetHeader {
            id,
            session_id,
            date,
            last_update: DateTime::<Utc>::from_timestamp(1_700_000_000 + minutes * 60, 0).unwrap(),
        }
    }

    #[test]
    fn test_duplicate_groups_and_deactivation() {
        let sheets = vec![
            header(1, 10, ymd(2024, 10, 12), 0),
            header(2, 10, ymd(2024, 10, 12), 5),
            header(3, 10, ymd(2024, 10, 5), 0),
            header(4, 11, ymd(2024, 10, 5), 0),
            header(5, 10, ymd(2024, 10, 5), 1),
        ];
        let groups = duplicate_groups(&sheets);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, ymd(2024, 10, 5));
        assert_eq!(groups[0].sheet_ids, vec![3, 5]);
        assert_eq!(groups[1].sheet_ids, vec![1, 2]);

        let mut ids = sheets_to_deactivate(&sheets);
        ids.sort();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_missing_attendance_skips_recorded_dates() {
        let session = CourseSession {
            id: 4,
            course_id: 1,
            subject: Subject::Arabe,
            level: "2".into(),
            stats: SessionStats::default(),
            timeslots: vec![Timeslot {
                id: 1,
                session_id: 4,
                day: TimeSlotDay::SaturdayMorning,
                start_time: "09:00".into(),
                end_time: "10:30".into(),
                classroom: None,
            }],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let recorded: HashSet<NaiveDate> = [ymd(2024, 9, 7)].into_iter().collect();
        let missing = missing_attendance(&session, ymd(2024, 9, 1), ymd(2024, 9, 21), &[], &recorded);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].dates, vec![ymd(2024, 9, 14), ymd(2024, 9, 21)]);

        let all: HashSet<NaiveDate> = [ymd(2024, 9, 7), ymd(2024, 9, 14), ymd(2024, 9, 21)]
            .into_iter()
            .collect();
        assert!(missing_attendance(&session, ymd(2024, 9, 1), ymd(2024, 9, 21), &[], &all).is_empty());
    }
}
