//! Dashboard state
//!
//! All mutable view state lives in one [`DashboardState`] value and changes only
//! through [`DashboardState::apply`]. The derived view (overlap, legend,
//! insights) is recomputed from scratch by [`DashboardState::view`], so it is a
//! pure function of the schedules, the pins and the displayed month.
//!
//! # Example
//!
//! ```
//! use rivalcal::state::{DashboardAction, DashboardState};
//! use rivalcal::config::Config;
//! use rivalcal::utils::YearMonth;
//!
//! let mut state = DashboardState::new(YearMonth::new(2026, 3).unwrap());
//! state.apply(DashboardAction::NextMonth);
//! let view = state.view(&Config::default());
//! assert_eq!(view.overlap.month.to_string(), "2026-04");
//! ```

use serde::Serialize;
use std::time::Instant;

use crate::config::Config;
use crate::fetch::{resolve_bucket, Debouncer, RequestSequencer, RequestTicket, ScheduleQuery};
use crate::insight::generate_insights;
use crate::models::{CompanySchedule, Insight, RawScheduleRecord, UserPin};
use crate::normalize::NormalizeIssue;
use crate::overlap::{LegendStop, MonthOverlap};
use crate::utils::date::YearMonth;

#[derive(Debug, Clone)]
pub enum DashboardAction {
    NextMonth,
    PrevMonth,
    SetMonth(YearMonth),
    /// New filter; the returned ticket is the fetch the caller must perform
    SetFilter(ScheduleQuery),
    FetchCompleted {
        ticket: RequestTicket,
        records: Vec<RawScheduleRecord>,
    },
    AddPin(UserPin),
    RemovePin(String),
    ClearPins,
}

/// Derived values handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub overlap: MonthOverlap,
    pub legend: Vec<LegendStop>,
    pub insights: Vec<Insight>,
}

#[derive(Debug)]
pub struct DashboardState {
    pub month: YearMonth,
    pub filter: ScheduleQuery,
    pub schedules: Vec<CompanySchedule>,
    pub pins: Vec<UserPin>,
    /// Issues from the most recent applied fetch
    pub issues: Vec<NormalizeIssue>,
    pub showing_placeholder: bool,
    sequencer: RequestSequencer,
}

impl DashboardState {
    pub fn new(month: YearMonth) -> Self {
        Self {
            month,
            filter: ScheduleQuery::default(),
            schedules: Vec::new(),
            pins: Vec::new(),
            issues: Vec::new(),
            showing_placeholder: false,
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn with_pins(mut self, pins: Vec<UserPin>) -> Self {
        self.pins = pins;
        self
    }

    /// Apply one action. Returns a request ticket when the action requires a fetch.
    pub fn apply(&mut self, action: DashboardAction) -> Option<RequestTicket> {
        match action {
            DashboardAction::NextMonth => {
                self.month = self.month.next();
                None
            }
            DashboardAction::PrevMonth => {
                self.month = self.month.prev();
                None
            }
            DashboardAction::SetMonth(month) => {
                self.month = month;
                None
            }
            DashboardAction::SetFilter(query) => {
                self.filter = query.clone();
                self.sequencer.dispatch(query)
            }
            DashboardAction::FetchCompleted { ticket, records } => {
                if self.sequencer.complete(&ticket) {
                    let result = resolve_bucket(&ticket.query, &records, self.month);
                    self.schedules = result.schedules;
                    self.issues = result.issues;
                    self.showing_placeholder = result.placeholder;
                }
                None
            }
            DashboardAction::AddPin(pin) => {
                self.pins.push(pin);
                None
            }
            DashboardAction::RemovePin(id) => {
                self.pins.retain(|p| p.id != id);
                None
            }
            DashboardAction::ClearPins => {
                self.pins.clear();
                None
            }
        }
    }

    /// Apply the debounced filter once it is due; returns the fetch to perform
    pub fn poll_debounced(&mut self, debouncer: &mut Debouncer, now: Instant) -> Option<RequestTicket> {
        let query = debouncer.poll(now)?;
        self.apply(DashboardAction::SetFilter(query))
    }

    pub fn view(&self, config: &Config) -> DashboardView {
        build_view(&self.schedules, &self.pins, self.month, config)
    }
}

/// Compute the full view for `(schedules, pins, month)`
pub fn build_view(
    schedules: &[CompanySchedule],
    pins: &[UserPin],
    month: YearMonth,
    config: &Config,
) -> DashboardView {
    let overlap = MonthOverlap::compute(schedules, month);
    let legend = config.intensity.legend(overlap.max_count);
    let insights = generate_insights(schedules, pins, &config.insight_rules());

    DashboardView {
        overlap,
        legend,
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataType, PinType, RawId, RawStage, Severity};
    use chrono::NaiveDate;

    fn march() -> YearMonth {
        YearMonth::new(2026, 3).unwrap()
    }

    fn record(id: i64, name: &str, start: &str, end: &str) -> RawScheduleRecord {
        RawScheduleRecord {
            id: Some(RawId::Number(id)),
            company_name: Some(name.to_string()),
            hiring_type: Some("신입".to_string()),
            stages: vec![RawStage {
                id: Some(RawId::Number(1)),
                stage: Some("서류접수".to_string()),
                start_date: Some(start.to_string()),
                end_date: Some(end.to_string()),
            }],
            ..RawScheduleRecord::default()
        }
    }

    #[test]
    fn test_month_navigation() {
        let mut state = DashboardState::new(march());
        state.apply(DashboardAction::PrevMonth);
        assert_eq!(state.month, YearMonth::new(2026, 2).unwrap());
        state.apply(DashboardAction::SetMonth(YearMonth::new(2025, 12).unwrap()));
        state.apply(DashboardAction::NextMonth);
        assert_eq!(state.month, YearMonth::new(2026, 1).unwrap());
    }

    #[test]
    fn test_stale_fetch_does_not_overwrite_newer_result() {
        let mut state = DashboardState::new(march());
        let older = state.apply(DashboardAction::SetFilter(ScheduleQuery::default())).unwrap();
        let newer = state
            .apply(DashboardAction::SetFilter(ScheduleQuery {
                data_type: Some(DataType::Actual),
                ..ScheduleQuery::default()
            }))
            .unwrap();

        state.apply(DashboardAction::FetchCompleted {
            ticket: newer,
            records: vec![record(1, "네이버", "2026-03-01", "2026-03-04")],
        });
        state.apply(DashboardAction::FetchCompleted {
            ticket: older,
            records: vec![record(2, "카카오", "2026-03-01", "2026-03-04"), record(3, "토스", "2026-03-02", "2026-03-03")],
        });

        assert_eq!(state.schedules.len(), 1);
        assert_eq!(state.schedules[0].name, "네이버");
    }

    #[test]
    fn test_switching_back_to_pending_filter_applies_its_response() {
        let actual = ScheduleQuery {
            data_type: Some(DataType::Actual),
            ..ScheduleQuery::default()
        };
        let predicted = ScheduleQuery {
            data_type: Some(DataType::Predicted),
            ..ScheduleQuery::default()
        };

        let mut state = DashboardState::new(march());
        let actual_ticket = state.apply(DashboardAction::SetFilter(actual.clone())).unwrap();
        let predicted_ticket = state.apply(DashboardAction::SetFilter(predicted)).unwrap();
        // Same query still pending: no second fetch
        assert!(state.apply(DashboardAction::SetFilter(actual.clone())).is_none());

        state.apply(DashboardAction::FetchCompleted {
            ticket: actual_ticket,
            records: vec![record(1, "네이버", "2026-03-01", "2026-03-04")],
        });
        state.apply(DashboardAction::FetchCompleted {
            ticket: predicted_ticket,
            records: vec![record(2, "카카오", "2026-03-01", "2026-03-04")],
        });

        assert_eq!(state.filter, actual);
        assert_eq!(state.schedules.len(), 1);
        assert_eq!(state.schedules[0].name, "네이버");
    }

    #[test]
    fn test_fetch_replaces_wholesale_and_predicted_empty_stays_empty() {
        let mut state = DashboardState::new(march());
        let first = state.apply(DashboardAction::SetFilter(ScheduleQuery::default())).unwrap();
        state.apply(DashboardAction::FetchCompleted {
            ticket: first,
            records: vec![record(1, "네이버", "2026-03-01", "2026-03-04")],
        });
        assert_eq!(state.schedules.len(), 1);

        let predicted = state
            .apply(DashboardAction::SetFilter(ScheduleQuery {
                data_type: Some(DataType::Predicted),
                ..ScheduleQuery::default()
            }))
            .unwrap();
        state.apply(DashboardAction::FetchCompleted { ticket: predicted, records: vec![] });
        assert!(state.schedules.is_empty());
        assert!(!state.showing_placeholder);

        let actual = state
            .apply(DashboardAction::SetFilter(ScheduleQuery {
                data_type: Some(DataType::Actual),
                ..ScheduleQuery::default()
            }))
            .unwrap();
        state.apply(DashboardAction::FetchCompleted { ticket: actual, records: vec![] });
        assert!(state.showing_placeholder);
        assert!(!state.schedules.is_empty());
    }

    #[test]
    fn test_debounced_filter_dispatches_only_the_last_change() {
        let config = Config::default();
        let mut debouncer = Debouncer::from_millis(config.debounce_ms);
        let mut state = DashboardState::new(march());
        let t0 = Instant::now();

        debouncer.schedule(
            ScheduleQuery {
                job_role: Some("back".to_string()),
                ..ScheduleQuery::default()
            },
            t0,
        );
        debouncer.schedule(
            ScheduleQuery {
                job_role: Some("backend".to_string()),
                ..ScheduleQuery::default()
            },
            t0 + std::time::Duration::from_millis(100),
        );

        assert!(state
            .poll_debounced(&mut debouncer, t0 + std::time::Duration::from_millis(300))
            .is_none());
        let ticket = state
            .poll_debounced(&mut debouncer, t0 + std::time::Duration::from_millis(400))
            .unwrap();
        assert_eq!(ticket.query.job_role.as_deref(), Some("backend"));
        assert_eq!(state.filter, ticket.query);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_pins_and_view_recompute() {
        let config = Config::default();
        let mut state = DashboardState::new(march());
        let ticket = state.apply(DashboardAction::SetFilter(ScheduleQuery::default())).unwrap();
        state.apply(DashboardAction::FetchCompleted {
            ticket,
            records: vec![
                record(1, "네이버", "2026-03-01", "2026-03-04"),
                record(2, "카카오", "2026-03-03", "2026-03-08"),
                record(3, "토스", "2026-03-02", "2026-03-02"),
            ],
        });

        assert!(state.view(&config).insights.is_empty());

        let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        let pin = UserPin::new(PinType::DocumentSubmission, d(1), Some(d(3)));
        let pin_id = pin.id.clone();
        state.apply(DashboardAction::AddPin(pin));

        let view = state.view(&config);
        assert_eq!(view.overlap.count_on(d(3)), 2);
        assert_eq!(view.overlap.max_count, 2);
        assert_eq!(view.legend.len(), 3);
        assert_eq!(view.insights[0].severity, Severity::Warning);
        assert_eq!(view.insights[0].affected_company_ids.len(), 3);

        state.apply(DashboardAction::RemovePin(pin_id));
        assert!(state.view(&config).insights.is_empty());

        state.apply(DashboardAction::AddPin(UserPin::new(PinType::Interview1, d(5), None)));
        state.apply(DashboardAction::ClearPins);
        assert!(state.pins.is_empty());
    }
}
