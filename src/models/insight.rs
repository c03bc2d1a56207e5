use serde::{Deserialize, Serialize, Serializer};

use crate::models::PinType;

/// Advisory severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Success,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Success => "success",
            Severity::Info => "info",
        }
    }
}

/// What an advisory record is about: one pinned stage category, or the
/// overall simulated timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsightCategory {
    Stage(PinType),
    Timeline,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightCategory::Stage(pin_type) => pin_type.as_str(),
            InsightCategory::Timeline => "timeline",
        }
    }
}

impl Serialize for InsightCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Advisory record produced by the insight engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub severity: Severity,
    pub category: InsightCategory,
    pub title: String,
    pub message: String,
    pub affected_company_ids: Vec<String>,
}
