//! 学年与校历计算

use chrono::{Datelike, Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::calendar::entities::{HolidayPeriod, HolidayType, PeriodType, SchedulePeriod};
use crate::models::courses::entities::TimeSlotDay;

static ACADEMIC_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("Invalid academic year regex"));

/// 学年起始的公历年份：`start_month` 之前仍属于上一学年
pub fn academic_year_start(date: NaiveDate, start_month: u32) -> i32 {
    if date.month() >= start_month {
        date.year()
    } else {
        date.year() - 1
    }
}

/// 学年标签，如 `2024-2025`
pub fn academic_year_label(date: NaiveDate, start_month: u32) -> String {
    let start = academic_year_start(date, start_month);
    format!("{}-{}", start, start + 1)
}

/// 解析学年标签，返回起始年份；要求两个年份相邻
pub fn parse_academic_year(label: &str) -> Option<i32> {
    let caps = ACADEMIC_YEAR_RE.captures(label.trim())?;
    let start: i32 = caps[1].parse().ok()?;
    let end: i32 = caps[2].parse().ok()?;
    (end == start + 1).then_some(start)
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn holiday(name: &str, start: NaiveDate, end: NaiveDate, holiday_type: HolidayType) -> HolidayPeriod {
    HolidayPeriod {
        name: name.to_string(),
        start_date: start,
        end_date: end,
        holiday_type,
    }
}

/// 尚未配置时使用的默认假期
pub fn default_holidays(start_year: i32) -> Vec<HolidayPeriod> {
    let next = start_year + 1;
    vec![
        holiday(
            "Vacances de la Toussaint",
            ymd(start_year, 10, 21),
            ymd(start_year, 11, 3),
            HolidayType::Regular,
        ),
        holiday(
            "Vacances de Noël",
            ymd(start_year, 12, 23),
            ymd(next, 1, 5),
            HolidayType::Regular,
        ),
        holiday(
            "Vacances d'Hiver",
            ymd(next, 2, 17),
            ymd(next, 3, 2),
            HolidayType::Regular,
        ),
        holiday(
            "Vacances de Printemps",
            ymd(next, 4, 14),
            ymd(next, 4, 27),
            HolidayType::Regular,
        ),
        holiday(
            "Vacances d'Été",
            ymd(next, 6, 30),
            ymd(next, 8, 31),
            HolidayType::Regular,
        ),
        holiday("Ramadan", ymd(next, 3, 1), ymd(next, 3, 1), HolidayType::Special),
        holiday("Aïd El Fitr", ymd(next, 3, 31), ymd(next, 3, 31), HolidayType::Special),
        holiday(
            "Fête de l'école",
            ymd(next, 6, 28),
            ymd(next, 6, 29),
            HolidayType::Special,
        ),
    ]
}

fn period(day: TimeSlotDay, start: &str, end: &str, order: i32, period_type: PeriodType) -> SchedulePeriod {
    SchedulePeriod {
        day,
        start_time: start.to_string(),
        end_time: end.to_string(),
        order_number: order,
        period_type,
    }
}

/// 默认作息：每个时段两节课，中间一次课间
pub fn default_schedule() -> Vec<SchedulePeriod> {
    let mut periods = Vec::new();
    for day in TimeSlotDay::ALL {
        let (first, brk, second) = match day {
            TimeSlotDay::SaturdayAfternoon => (
                ("14:00", "15:30"),
                ("15:30", "15:45"),
                ("15:45", "17:15"),
            ),
            TimeSlotDay::SaturdayMorning | TimeSlotDay::SundayMorning => (
                ("09:00", "10:30"),
                ("10:30", "10:45"),
                ("10:45", "12:15"),
            ),
        };
        periods.push(period(day, first.0, first.1, 1, PeriodType::Class));
        periods.push(period(day, brk.0, brk.1, 2, PeriodType::Break));
        periods.push(period(day, second.0, second.1, 3, PeriodType::Class));
    }
    periods
}

pub fn is_holiday(date: NaiveDate, holidays: &[HolidayPeriod]) -> bool {
    holidays.iter().any(|h| h.contains(date))
}

/// 从 `from` 起该时段每周的上课日期（含 `until`），跳过假期
pub fn weekly_dates(
    day: TimeSlotDay,
    from: NaiveDate,
    until: NaiveDate,
    holidays: &[HolidayPeriod],
) -> Vec<NaiveDate> {
    let target = day.weekday().num_days_from_monday();
    let offset = (7 + target - from.weekday().num_days_from_monday()) % 7;
    let mut current = match from.checked_add_days(Days::new(offset as u64)) {
        Some(date) => date,
        None => return vec![],
    };

    let mut dates = Vec::new();
    while current <= until {
        if !is_holiday(current, holidays) {
            dates.push(current);
        }
        current = match current.checked_add_days(Days::new(7)) {
            Some(next) => next,
            None => break,
        };
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_academic_year_rolls_over_in_september() {
        assert_eq!(academic_year_label(ymd(2024, 8, 31), 9), "2023-2024");
        assert_eq!(academic_year_label(ymd(2024, 9, 1), 9), "2024-2025");
        assert_eq!(academic_year_label(ymd(2025, 1, 15), 9), "2024-2025");
    }

    #[test]
    fn test_parse_academic_year() {
        assert_eq!(parse_academic_year("2024-2025"), Some(2024));
        assert_eq!(parse_academic_year("2024-2026"), None);
        assert_eq!(parse_academic_year("24-25"), None);
    }

    #[test]
    fn test_default_holidays_follow_start_year() {
        let holidays = default_holidays(2025);
        assert_eq!(holidays.len(), 8);
        assert_eq!(holidays[0].start_date, ymd(2025, 10, 21));
        assert_eq!(holidays[1].end_date, ymd(2026, 1, 5));
        assert!(holidays.iter().all(|h| h.start_date <= h.end_date));
        assert_eq!(
            holidays
                .iter()
                .filter(|h| h.holiday_type == HolidayType::Special)
                .count(),
            3
        );
    }

    #[test]
    fn test_default_schedule_shape() {
        let periods = default_schedule();
        assert_eq!(periods.len(), 9);
        let afternoon: Vec<_> = periods
            .iter()
            .filter(|p| p.day == TimeSlotDay::SaturdayAfternoon)
            .collect();
        assert_eq!(afternoon[0].start_time, "14:00");
        assert_eq!(afternoon[1].period_type, PeriodType::Break);
        assert_eq!(afternoon[2].end_time, "17:15");
    }

    #[test]
    fn test_weekly_dates_skip_holidays() {
        // 2024-10-01 是周二，第一个周六为 10-05
        let holidays = vec![holiday(
            "Toussaint",
            ymd(2024, 10, 19),
            ymd(2024, 11, 3),
            HolidayType::Regular,
        )];
        let dates = weekly_dates(
            TimeSlotDay::SaturdayMorning,
            ymd(2024, 10, 1),
            ymd(2024, 11, 9),
            &holidays,
        );
        assert_eq!(
            dates,
            vec![ymd(2024, 10, 5), ymd(2024, 10, 12), ymd(2024, 11, 9)]
        );
        assert!(dates.iter().all(|d| d.weekday() == Weekday::Sat));
    }

    #[test]
    fn test_weekly_dates_start_on_matching_day() {
        let dates = weekly_dates(
            TimeSlotDay::SundayMorning,
            ymd(2024, 9, 8),
            ymd(2024, 9, 15),
            &[],
        );
        assert_eq!(dates, vec![ymd(2024, 9, 8), ymd(2024, 9, 15)]);
    }

    #[test]
    fn test_weekly_dates_empty_range() {
        let dates = weekly_dates(
            TimeSlotDay::SundayMorning,
            ymd(2024, 9, 9),
            ymd(2024, 9, 14),
            &[],
        );
        assert!(dates.is_empty());
    }
}
