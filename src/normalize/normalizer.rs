//! Schedule normalization
//!
//! Turns raw fetched records into canonical [`CompanySchedule`] values.
//!
//! # Rules
//!
//! - A stage with a missing or unparsable date is dropped.
//! - A stage whose end precedes its start is rejected with a
//!   [`NormalizeIssue::ReversedRange`] so nothing downstream sees a reversed window.
//! - A company left with no valid stages is dropped.
//! - Company ids are `"{source_id}-{data_type|all}-{index}"` and stage ids
//!   `"{company_id}-{stage_id}-{position}"`, so mixing actual and predicted buckets
//!   or re-fetching never produces colliding ids.
//!
//! Normalization never fails: every problem becomes an issue in the returned
//! [`NormalizeOutcome`] and the rest of the batch is kept.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    CompanySchedule, DataType, HiringType, PinType, RawScheduleRecord, RawStage, Stage,
};
use crate::normalize::color::resolve_color;
use crate::utils::date::{parse_iso_date, DateWindow};

/// Why part of a raw record was excluded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeIssue {
    #[error("{company}: stage '{stage}' has a missing or unparsable {field} ({value:?})")]
    InvalidDate {
        company: String,
        stage: String,
        field: &'static str,
        value: Option<String>,
    },
    #[error("{company}: stage '{stage}' ends ({end}) before it starts ({start})")]
    ReversedRange {
        company: String,
        stage: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("{company}: no valid stages, company dropped")]
    NoValidStages { company: String },
}

/// Normalized schedules plus everything that was dropped on the way
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub schedules: Vec<CompanySchedule>,
    pub issues: Vec<NormalizeIssue>,
}

/// Normalize a batch of raw records
pub fn normalize_records(records: &[RawScheduleRecord]) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();

    for (index, record) in records.iter().enumerate() {
        match normalize_record(record, index, &mut outcome.issues) {
            Some(schedule) => outcome.schedules.push(schedule),
            None => {
                let company = display_name(record);
                log::debug!("Dropping company '{}' (record {}): no valid stages", company, index);
                outcome.issues.push(NormalizeIssue::NoValidStages { company });
            }
        }
    }

    outcome
}

/// Normalize and discard the issue list
pub fn normalize(records: &[RawScheduleRecord]) -> Vec<CompanySchedule> {
    normalize_records(records).schedules
}

fn display_name(record: &RawScheduleRecord) -> String {
    record
        .company_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .or_else(|| record.id.as_ref().map(|id| format!("#{}", id)))
        .unwrap_or_else(|| "(unnamed)".to_string())
}

fn normalize_record(
    record: &RawScheduleRecord,
    index: usize,
    issues: &mut Vec<NormalizeIssue>,
) -> Option<CompanySchedule> {
    let name = record.company_name.as_deref().unwrap_or("").trim().to_string();
    let company_label = display_name(record);

    let data_type = record.data_type.as_deref().and_then(|raw| {
        let parsed = DataType::from_str(raw);
        if parsed.is_none() {
            log::debug!("Ignoring unknown data_type '{}' on '{}'", raw, company_label);
        }
        parsed
    });

    let hiring_type = record
        .hiring_type
        .as_deref()
        .and_then(HiringType::from_str)
        .unwrap_or(HiringType::NewGrad);

    let source_id = record
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let bucket = data_type.map(|d| d.as_str()).unwrap_or("all");
    let company_id = format!("{}-{}-{}", source_id, bucket, index);

    let stages: Vec<Stage> = record
        .stages
        .iter()
        .enumerate()
        .filter_map(|(position, raw)| {
            normalize_stage(raw, &company_id, &company_label, position, issues)
        })
        .collect();

    if stages.is_empty() {
        return None;
    }

    Some(CompanySchedule {
        color: resolve_color(record.color.as_deref(), &name, index),
        id: company_id,
        source_id,
        name,
        hiring_type,
        data_type,
        job_role: record
            .job_role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
        stages,
    })
}

fn normalize_stage(
    raw: &RawStage,
    company_id: &str,
    company_label: &str,
    position: usize,
    issues: &mut Vec<NormalizeIssue>,
) -> Option<Stage> {
    let label = raw.stage.as_deref().unwrap_or("").trim().to_string();
    let stage_key = raw
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| position.to_string());
    let stage_name = if label.is_empty() { stage_key.clone() } else { label.clone() };

    let start = parse_stage_date(raw.start_date.as_deref(), "start_date", company_label, &stage_name, issues)?;
    let end = parse_stage_date(raw.end_date.as_deref(), "end_date", company_label, &stage_name, issues)?;

    if DateWindow::new(start, end).is_reversed() {
        log::warn!(
            "Rejecting stage '{}' of '{}': end {} precedes start {}",
            stage_name, company_label, end, start
        );
        issues.push(NormalizeIssue::ReversedRange {
            company: company_label.to_string(),
            stage: stage_name,
            start,
            end,
        });
        return None;
    }

    Some(Stage {
        id: format!("{}-{}-{}", company_id, stage_key, position),
        kind: PinType::classify_label(&label),
        label,
        start_date: start,
        end_date: end,
    })
}

fn parse_stage_date(
    value: Option<&str>,
    field: &'static str,
    company: &str,
    stage: &str,
    issues: &mut Vec<NormalizeIssue>,
) -> Option<NaiveDate> {
    let parsed = value.and_then(parse_iso_date);
    if parsed.is_none() {
        log::debug!("Dropping stage '{}' of '{}': bad {} {:?}", stage, company, field, value);
        issues.push(NormalizeIssue::InvalidDate {
            company: company.to_string(),
            stage: stage.to_string(),
            field,
            value: value.map(str::to_string),
        });
    }
    parsed
}

/// Parse a JSON array of raw records.
///
/// Elements that do not deserialize as a record are skipped with a warning; only a
/// document that is not a JSON array at all is an error.
pub fn parse_records(json: &str) -> Result<Vec<RawScheduleRecord>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)
        .context("Failed to parse schedule records: expected a JSON array")?;

    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<RawScheduleRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("Skipping malformed schedule record {}: {}", index, e),
        }
    }
    Ok(records)
}
