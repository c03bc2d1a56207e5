//! Per-day competitor overlap for a displayed month
//!
//! For every day of the month the calculator collects the stages whose inclusive
//! window contains that day and counts the distinct companies behind them. A
//! company with two simultaneous stages on one day counts once; a company
//! contributes nothing on days that fall between two of its own stages.
//!
//! Cost is days × companies × stages, which is fine for tens of companies with
//! a handful of stages each. Nothing is cached between months.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

use crate::models::CompanySchedule;
use crate::utils::date::{serialize_iso_date, YearMonth};

/// A stage active on a given day, with enough company context for a detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveStage {
    pub company_id: String,
    pub company_name: String,
    pub color: String,
    pub stage_id: String,
    pub stage_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayOverlap {
    #[serde(serialize_with = "serialize_iso_date")]
    pub date: NaiveDate,
    /// Distinct companies with at least one active stage
    pub count: usize,
    pub active: Vec<ActiveStage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOverlap {
    #[serde(serialize_with = "serialize_month")]
    pub month: YearMonth,
    pub days: Vec<DayOverlap>,
    pub max_count: usize,
}

fn serialize_month<S: serde::Serializer>(month: &YearMonth, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&month.to_string())
}

impl MonthOverlap {
    /// Compute overlap for every day of `month`
    pub fn compute(schedules: &[CompanySchedule], month: YearMonth) -> Self {
        let days: Vec<DayOverlap> = month
            .days()
            .into_iter()
            .map(|date| day_overlap(schedules, date))
            .collect();
        let max_count = days.iter().map(|d| d.count).max().unwrap_or(0);

        Self { month, days, max_count }
    }

    fn day(&self, date: NaiveDate) -> Option<&DayOverlap> {
        if YearMonth::of(date) != self.month {
            return None;
        }
        self.days.iter().find(|d| d.date == date)
    }

    /// Overlap count for a date; zero outside the computed month
    pub fn count_on(&self, date: NaiveDate) -> usize {
        self.day(date).map(|d| d.count).unwrap_or(0)
    }

    /// Active (company, stage) pairs for a date; empty outside the computed month
    pub fn active_on(&self, date: NaiveDate) -> &[ActiveStage] {
        self.day(date).map(|d| d.active.as_slice()).unwrap_or(&[])
    }
}

/// Overlap for a single day
pub fn day_overlap(schedules: &[CompanySchedule], date: NaiveDate) -> DayOverlap {
    let mut companies: HashSet<&str> = HashSet::new();
    let mut active = Vec::new();

    for company in schedules {
        for stage in &company.stages {
            if stage.window().contains(date) {
                companies.insert(company.id.as_str());
                active.push(ActiveStage {
                    company_id: company.id.clone(),
                    company_name: company.name.clone(),
                    color: company.color.clone(),
                    stage_id: stage.id.clone(),
                    stage_label: stage.label.clone(),
                });
            }
        }
    }

    DayOverlap {
        date,
        count: companies.len(),
        active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HiringType, PinType, Stage};

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn company(id: &str, ranges: &[(NaiveDate, NaiveDate)]) -> CompanySchedule {
        CompanySchedule {
            id: id.to_string(),
            source_id: id.to_string(),
            name: format!("company {}", id),
            color: "#3B82F6".to_string(),
            hiring_type: HiringType::NewGrad,
            data_type: None,
            job_role: None,
            stages: ranges
                .iter()
                .enumerate()
                .map(|(i, (start, end))| Stage {
                    id: format!("{}-s-{}", id, i),
                    label: "서류접수".to_string(),
                    kind: Some(PinType::DocumentSubmission),
                    start_date: *start,
                    end_date: *end,
                })
                .collect(),
        }
    }

    fn march() -> YearMonth {
        YearMonth::new(2026, 3).unwrap()
    }

    #[test]
    fn test_non_adjacent_stages_leave_gap() {
        let schedules = vec![company("a", &[(d(3, 1), d(3, 7)), (d(3, 13), d(3, 14))])];
        let overlap = MonthOverlap::compute(&schedules, march());

        for day in 1..=7 {
            assert_eq!(overlap.count_on(d(3, day)), 1, "day {}", day);
        }
        for day in 8..=12 {
            assert_eq!(overlap.count_on(d(3, day)), 0, "day {}", day);
        }
        assert_eq!(overlap.count_on(d(3, 13)), 1);
        assert_eq!(overlap.count_on(d(3, 14)), 1);
        assert_eq!(overlap.count_on(d(3, 15)), 0);
    }

    #[test]
    fn test_simultaneous_stages_count_once() {
        let schedules = vec![
            company("a", &[(d(3, 1), d(3, 10)), (d(3, 5), d(3, 6))]),
            company("b", &[(d(3, 5), d(3, 5))]),
        ];
        let overlap = MonthOverlap::compute(&schedules, march());

        assert_eq!(overlap.count_on(d(3, 5)), 2);
        assert_eq!(overlap.active_on(d(3, 5)).len(), 3);
        assert_eq!(overlap.count_on(d(3, 4)), 1);
        assert_eq!(overlap.max_count, 2);
    }

    #[test]
    fn test_month_boundary_stage_contributes_in_month_days_only() {
        let schedules = vec![company("a", &[(d(2, 25), d(3, 2))])];
        let overlap = MonthOverlap::compute(&schedules, march());

        assert_eq!(overlap.days.len(), 31);
        assert_eq!(overlap.count_on(d(3, 1)), 1);
        assert_eq!(overlap.count_on(d(3, 2)), 1);
        assert_eq!(overlap.count_on(d(3, 3)), 0);
        assert_eq!(overlap.count_on(d(2, 26)), 0);
        assert!(overlap.active_on(d(2, 26)).is_empty());
    }

    #[test]
    fn test_count_matches_distinct_company_definition() {
        let schedules = vec![
            company("a", &[(d(3, 1), d(3, 3)), (d(3, 3), d(3, 9))]),
            company("b", &[(d(3, 2), d(3, 2)), (d(3, 20), d(3, 31))]),
            company("c", &[(d(2, 1), d(4, 30))]),
        ];
        let overlap = MonthOverlap::compute(&schedules, march());

        for day in &overlap.days {
            let expected = schedules
                .iter()
                .filter(|c| c.stages.iter().any(|s| s.start_date <= day.date && day.date <= s.end_date))
                .count();
            assert_eq!(day.count, expected, "{}", day.date);
        }
        assert_eq!(overlap.max_count, 3);
    }

    #[test]
    fn test_empty_schedule_list() {
        let overlap = MonthOverlap::compute(&[], march());
        assert_eq!(overlap.max_count, 0);
        assert!(overlap.days.iter().all(|d| d.count == 0 && d.active.is_empty()));
    }
}
