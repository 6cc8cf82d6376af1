//! Календарные факты месяца

use chrono::{Datelike, NaiveDate};

use crate::types::MonthContext;

pub struct CalendarContext;

impl CalendarContext {
    /// Число дней в месяце с учётом високосных лет
    pub fn days_in_month(year: i32, month: u32) -> u32 {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };

        match (
            NaiveDate::from_ymd_opt(year, month, 1),
            NaiveDate::from_ymd_opt(next_year, next_month, 1),
        ) {
            (Some(first), Some(next)) => (next - first).num_days() as u32,
            // месяц вне 1..=12 сюда не попадает: Datelike::month() валиден
            _ => 30,
        }
    }

    /// Контекст месяца для опорной даты.
    /// Исторический месяц всегда считается прошедшим на 100%
    pub fn month_context(reference: NaiveDate, today: NaiveDate) -> MonthContext {
        let is_current_month =
            reference.year() == today.year() && reference.month() == today.month();
        let total_days_in_month = Self::days_in_month(reference.year(), reference.month());
        let current_day_of_month = if is_current_month {
            today.day()
        } else {
            total_days_in_month
        };

        MonthContext {
            reference_date: reference,
            is_current_month,
            current_day_of_month,
            total_days_in_month,
            days_remaining: total_days_in_month - current_day_of_month,
            day_progress: current_day_of_month as f64 / total_days_in_month as f64 * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(CalendarContext::days_in_month(2024, 2), 29);
        assert_eq!(CalendarContext::days_in_month(2023, 2), 28);
        assert_eq!(CalendarContext::days_in_month(2025, 4), 30);
        assert_eq!(CalendarContext::days_in_month(2025, 12), 31);
    }

    #[test]
    fn current_month_uses_today() {
        let ctx = CalendarContext::month_context(date(2025, 6, 1), date(2025, 6, 10));
        assert!(ctx.is_current_month);
        assert_eq!(ctx.current_day_of_month, 10);
        assert_eq!(ctx.total_days_in_month, 30);
        assert_eq!(ctx.days_remaining, 20);
        assert!((ctx.day_progress - 33.333333).abs() < 1e-4);
    }

    #[test]
    fn historical_month_is_fully_elapsed() {
        let ctx = CalendarContext::month_context(date(2025, 2, 15), date(2025, 6, 10));
        assert!(!ctx.is_current_month);
        assert_eq!(ctx.current_day_of_month, 28);
        assert_eq!(ctx.total_days_in_month, 28);
        assert_eq!(ctx.days_remaining, 0);
        assert!((ctx.day_progress - 100.0).abs() < 1e-9);
    }
}
