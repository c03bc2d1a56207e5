// Wire shape of schedule records as delivered by the fetch collaborator.
// Every field is optional so a malformed record still deserializes and the
// normalizer can decide what to drop.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source ids arrive as numbers or strings depending on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Number(n) => write!(f, "{}", n),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStage {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScheduleRecord {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(rename = "type", default)]
    pub hiring_type: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub job_role: Option<String>,
    #[serde(default)]
    pub stages: Vec<RawStage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_accepts_numeric_and_text_ids() {
        let json = r#"[
            {"id": 7, "company_name": "네이버", "type": "신입", "stages": []},
            {"id": "abc", "company_name": "카카오", "type": "경력", "data_type": "predicted",
             "stages": [{"id": 1, "stage": "서류접수", "start_date": "2026-03-01", "end_date": "2026-03-05"}]}
        ]"#;
        let records: Vec<RawScheduleRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].id, Some(RawId::Number(7)));
        assert_eq!(records[1].id.as_ref().map(|i| i.to_string()), Some("abc".to_string()));
        assert_eq!(records[1].stages[0].stage.as_deref(), Some("서류접수"));
        assert_eq!(records[1].data_type.as_deref(), Some("predicted"));
    }

    #[test]
    fn test_raw_record_missing_fields_default() {
        let record: RawScheduleRecord = serde_json::from_str(r#"{"company_name": "토스"}"#).unwrap();
        assert!(record.id.is_none());
        assert!(record.stages.is_empty());
        assert!(record.color.is_none());
    }
}
