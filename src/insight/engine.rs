//! Insight engine
//!
//! Compares the user's simulated stage windows against every competitor stage
//! window and turns the overlaps into ordered advisory records.
//!
//! # Evaluation
//!
//! 1. No pins or no schedules: nothing to compare, return an empty list.
//! 2. For each pin type in rule order that has at least one pin, collect the
//!    distinct companies with a relevant stage overlapping any of those pins
//!    (inclusive on both ends, touching counts) and apply that category's bands.
//! 3. Check the span from the earliest pin start to the latest pin end against
//!    the timeline rule.
//!
//! Output order follows the rule order, not severity.

use std::collections::HashSet;

use crate::insight::rules::{InsightRules, StageMatch};
use crate::models::{CompanySchedule, Insight, InsightCategory, PinType, Stage, UserPin};
use crate::utils::date::DateWindow;

/// Generate advisories with the given rule set
pub fn generate_insights(
    schedules: &[CompanySchedule],
    pins: &[UserPin],
    rules: &InsightRules,
) -> Vec<Insight> {
    if pins.is_empty() || schedules.is_empty() {
        return Vec::new();
    }

    let mut insights = Vec::new();

    for rule in &rules.categories {
        let windows: Vec<DateWindow> = pins
            .iter()
            .filter(|pin| pin.pin_type == rule.pin_type)
            .map(UserPin::window)
            .collect();
        if windows.is_empty() {
            continue;
        }

        let affected = competing_companies(schedules, rule.pin_type, &windows, rules.stage_match);
        let count = affected.len();

        if let Some(band) = rule.evaluate(count) {
            insights.push(Insight {
                severity: band.severity,
                category: InsightCategory::Stage(rule.pin_type),
                title: band.title.clone(),
                message: band.render(count),
                affected_company_ids: affected,
            });
        }
    }

    if let Some(timeline) = &rules.timeline {
        if let Some(span) = pin_span(pins) {
            if let Some((severity, title, message)) = timeline.evaluate(span.span_days()) {
                insights.push(Insight {
                    severity,
                    category: InsightCategory::Timeline,
                    title: title.to_string(),
                    message,
                    affected_company_ids: Vec::new(),
                });
            }
        }
    }

    insights
}

/// Ids of companies with at least one relevant stage overlapping any window,
/// in schedule order
pub fn competing_companies(
    schedules: &[CompanySchedule],
    pin_type: PinType,
    windows: &[DateWindow],
    stage_match: StageMatch,
) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut affected = Vec::new();

    for company in schedules {
        let hit = company
            .stages
            .iter()
            .filter(|stage| is_relevant(stage, pin_type, stage_match))
            .any(|stage| windows.iter().any(|w| w.overlaps(&stage.window())));

        if hit && seen.insert(company.id.as_str()) {
            affected.push(company.id.clone());
        }
    }

    affected
}

fn is_relevant(stage: &Stage, pin_type: PinType, stage_match: StageMatch) -> bool {
    match stage_match {
        StageMatch::Any => true,
        StageMatch::SameKind => stage.kind == Some(pin_type),
    }
}

/// Earliest pin start to latest pin end
pub fn pin_span(pins: &[UserPin]) -> Option<DateWindow> {
    let start = pins.iter().map(|p| p.date).min()?;
    let end = pins.iter().map(|p| p.window().end).max()?;
    Some(DateWindow::new(start, end))
}
