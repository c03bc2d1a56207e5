use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::PinType;
use crate::utils::date::{serialize_iso_date, DateWindow};

/// Hiring track of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HiringType {
    #[serde(rename = "신입")]
    NewGrad,
    #[serde(rename = "경력")]
    Experienced,
}

impl HiringType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HiringType::NewGrad => "신입",
            HiringType::Experienced => "경력",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "신입" | "new" | "newgrad" | "new_grad" | "entry" => Some(HiringType::NewGrad),
            "경력" | "experienced" | "career" => Some(HiringType::Experienced),
            _ => None,
        }
    }
}

/// Which backend bucket a schedule came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Actual,
    Predicted,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Actual => "actual",
            DataType::Predicted => "predicted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "actual" => Some(DataType::Actual),
            "predicted" => Some(DataType::Predicted),
            _ => None,
        }
    }
}

/// One hiring stage with an inclusive date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub label: String,
    /// Pin type this stage corresponds to, if its label is recognised
    pub kind: Option<PinType>,
    #[serde(serialize_with = "serialize_iso_date")]
    pub start_date: NaiveDate,
    #[serde(serialize_with = "serialize_iso_date")]
    pub end_date: NaiveDate,
}

impl Stage {
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }
}

/// Canonical competitor schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySchedule {
    /// Composite id, unique across buckets and fetches
    pub id: String,
    pub source_id: String,
    pub name: String,
    pub color: String,
    #[serde(rename = "type")]
    pub hiring_type: HiringType,
    pub data_type: Option<DataType>,
    pub job_role: Option<String>,
    pub stages: Vec<Stage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hiring_type_conversion() {
        assert_eq!(HiringType::from_str("신입"), Some(HiringType::NewGrad));
        assert_eq!(HiringType::from_str("경력"), Some(HiringType::Experienced));
        assert_eq!(HiringType::from_str("Experienced"), Some(HiringType::Experienced));
        assert_eq!(HiringType::from_str("intern"), None);
        assert_eq!(HiringType::NewGrad.as_str(), "신입");
    }

    #[test]
    fn test_data_type_conversion() {
        assert_eq!(DataType::from_str("predicted"), Some(DataType::Predicted));
        assert_eq!(DataType::from_str("ACTUAL"), Some(DataType::Actual));
        assert_eq!(DataType::from_str("guess"), None);
    }
}
