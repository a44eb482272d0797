//! 上课时间段解析与冲突检测

use crate::models::courses::entities::{TeacherTimeslot, TimeSlotDay};
use crate::models::courses::requests::TimeslotInput;

/// "HH:MM" 转为当天分钟数
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.trim().split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    (h < 24 && m < 60).then_some(h * 60 + m)
}

/// 半开区间 [start, end) 是否相交
pub fn ranges_overlap(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0 < b.1 && a.1 > b.0
}

/// 解析并校验单个时间段，返回 (start, end) 分钟数
pub fn validate_range(start: &str, end: &str) -> Result<(u32, u32), String> {
    let s = parse_hhmm(start).ok_or_else(|| format!("Invalid start time: {start}"))?;
    let e = parse_hhmm(end).ok_or_else(|| format!("Invalid end time: {end}"))?;
    if s >= e {
        return Err(format!("Start time {start} must be before end time {end}"));
    }
    Ok((s, e))
}

fn describe(day: TimeSlotDay, start: &str, end: &str) -> String {
    format!("{day} {start}-{end}")
}

/// 检查新时间段之间以及与教师已有时间段之间是否冲突
///
/// `existing` 应已排除当前正在修改的课程
pub fn find_conflict(
    candidates: &[TimeslotInput],
    existing: &[TeacherTimeslot],
) -> Result<(), String> {
    let mut parsed = Vec::with_capacity(candidates.len());
    for slot in candidates {
        parsed.push((slot, validate_range(&slot.start_time, &slot.end_time)?));
    }

    for (i, (slot, range)) in parsed.iter().enumerate() {
        for (other, other_range) in parsed.iter().skip(i + 1) {
            if slot.day == other.day && ranges_overlap(*range, *other_range) {
                return Err(format!(
                    "Time slots overlap: {} and {}",
                    describe(slot.day, &slot.start_time, &slot.end_time),
                    describe(other.day, &other.start_time, &other.end_time)
                ));
            }
        }

        for taken in existing.iter().filter(|t| t.day == slot.day) {
            let Ok(taken_range) = validate_range(&taken.start_time, &taken.end_time) else {
                continue;
            };
            if ranges_overlap(*range, taken_range) {
                return Err(format!(
                    "Teacher {} is already busy on {} (course {}, session {})",
                    taken.teacher_id,
                    describe(taken.day, &taken.start_time, &taken.end_time),
                    taken.course_id,
                    taken.session_id
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(day: TimeSlotDay, start: &str, end: &str) -> TimeslotInput {
        TimeslotInput {
            day,
            start_time: start.into(),
            end_time: end.into(),
            classroom: None,
        }
    }

    fn taken(day: TimeSlotDay, start: &str, end: &str) -> TeacherTimeslot {
        TeacherTimeslot {
            teacher_id: 3,
            course_id: 11,
            session_id: 21,
            day,
            start_time: start.into(),
            end_time: end.into(),
        }
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("09:00"), Some(540));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("9:00"), None);
        assert_eq!(parse_hhmm("0900"), None);
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        assert!(!ranges_overlap((540, 630), (630, 720)));
        assert!(ranges_overlap((540, 631), (630, 720)));
    }

    #[test]
    fn test_start_must_precede_end() {
        assert!(validate_range("10:45", "09:00").is_err());
        assert!(validate_range("10:00", "10:00").is_err());
    }

    #[test]
    fn test_conflict_with_existing_slot() {
        let candidates = [input(TimeSlotDay::SaturdayMorning, "10:00", "11:00")];
        let existing = [taken(TimeSlotDay::SaturdayMorning, "09:00", "10:30")];
        let err = find_conflict(&candidates, &existing).unwrap_err();
        assert!(err.contains("already busy"));
    }

    #[test]
    fn test_other_day_does_not_conflict() {
        let candidates = [input(TimeSlotDay::SundayMorning, "09:00", "10:30")];
        let existing = [taken(TimeSlotDay::SaturdayMorning, "09:00", "10:30")];
        assert!(find_conflict(&candidates, &existing).is_ok());
    }

    #[test]
    fn test_conflict_inside_request() {
        let candidates = [
            input(TimeSlotDay::SaturdayAfternoon, "14:00", "15:30"),
            input(TimeSlotDay::SaturdayAfternoon, "15:00", "16:00"),
        ];
        let err = find_conflict(&candidates, &[]).unwrap_err();
        assert!(err.contains("overlap"));
    }
}
