//! Applying a fetched bucket to the schedule list
//!
//! The schedule list is replaced wholesale on every fetch. When a bucket comes
//! back empty the outcome depends on which bucket it was:
//!
//! - `predicted`: the list stays empty. Predictions are never faked.
//! - anything else: placeholder schedules anchored to the displayed month are
//!   substituted so the calendar still has something to show.

use crate::fetch::ScheduleQuery;
use crate::models::{CompanySchedule, DataType, HiringType, RawId, RawScheduleRecord, RawStage};
use crate::normalize::{normalize_company_name, normalize_records, NormalizeIssue};
use crate::utils::date::YearMonth;

#[derive(Debug, Clone, Default)]
pub struct BucketResult {
    pub schedules: Vec<CompanySchedule>,
    pub issues: Vec<NormalizeIssue>,
    /// True when placeholder data stands in for an empty response
    pub placeholder: bool,
}

/// Turn the records returned for `query` into the new schedule list
pub fn resolve_bucket(query: &ScheduleQuery, records: &[RawScheduleRecord], month: YearMonth) -> BucketResult {
    if records.is_empty() {
        if query.data_type == Some(DataType::Predicted) {
            log::debug!("Predicted bucket is empty; leaving schedule list empty");
            return BucketResult::default();
        }
        log::debug!("Empty response for {}; substituting placeholder schedules", query.key());
        return BucketResult {
            schedules: placeholder_schedules(month, query.data_type),
            issues: Vec::new(),
            placeholder: true,
        };
    }

    let outcome = normalize_records(records);
    BucketResult {
        schedules: outcome.schedules,
        issues: outcome.issues,
        placeholder: false,
    }
}

/// Select the records a backend would return for `query`.
/// Used when every bucket has been fetched into one local file.
pub fn apply_query(records: &[RawScheduleRecord], query: &ScheduleQuery) -> Vec<RawScheduleRecord> {
    records
        .iter()
        .filter(|r| {
            query.data_type.map_or(true, |wanted| {
                r.data_type.as_deref().and_then(DataType::from_str) == Some(wanted)
            })
        })
        .filter(|r| {
            query.hiring_type.map_or(true, |wanted| {
                r.hiring_type
                    .as_deref()
                    .and_then(HiringType::from_str)
                    .unwrap_or(HiringType::NewGrad)
                    == wanted
            })
        })
        .filter(|r| {
            query.job_role.as_deref().map_or(true, |wanted| {
                r.job_role
                    .as_deref()
                    .map_or(false, |role| role.to_lowercase().contains(&wanted.to_lowercase()))
            })
        })
        .filter(|r| {
            query.company.as_deref().map_or(true, |wanted| {
                let wanted = normalize_company_name(wanted);
                r.company_name
                    .as_deref()
                    .map_or(false, |name| normalize_company_name(name).contains(&wanted))
            })
        })
        .cloned()
        .collect()
}

/// Sample schedules shown when a non-predicted bucket is empty
pub fn placeholder_schedules(month: YearMonth, data_type: Option<DataType>) -> Vec<CompanySchedule> {
    let day = |d: u32| format!("{}-{:02}", month, d);
    let stage = |id: i64, label: &str, start: u32, end: u32| RawStage {
        id: Some(RawId::Number(id)),
        stage: Some(label.to_string()),
        start_date: Some(day(start)),
        end_date: Some(day(end)),
    };
    let company = |id: &str, name: &str, stages: Vec<RawStage>| RawScheduleRecord {
        id: Some(RawId::Text(id.to_string())),
        company_name: Some(name.to_string()),
        color: None,
        hiring_type: Some(HiringType::NewGrad.as_str().to_string()),
        data_type: data_type.map(|d| d.as_str().to_string()),
        job_role: None,
        stages,
    };

    let records = vec![
        company(
            "placeholder-1",
            "삼성전자",
            vec![stage(1, "서류접수", 3, 10), stage(2, "인적성검사", 17, 17), stage(3, "1차 면접", 24, 25)],
        ),
        company(
            "placeholder-2",
            "네이버",
            vec![stage(1, "서류접수", 5, 14), stage(2, "코딩테스트", 20, 20)],
        ),
        company(
            "placeholder-3",
            "카카오",
            vec![stage(1, "서류접수", 8, 18), stage(2, "1차 면접", 26, 27)],
        ),
    ];

    normalize_records(&records).schedules
}
