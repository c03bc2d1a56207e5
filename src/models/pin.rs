use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::utils::date::{
    deserialize_iso_date, deserialize_opt_iso_date, serialize_iso_date, serialize_opt_iso_date,
    DateWindow,
};
use crate::utils::fuzzy::closest_match;

/// Simulated hiring stage a user can pin on the calendar.
///
/// Declaration order is the order the insight engine reports categories in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PinType {
    #[serde(rename = "document")]
    DocumentSubmission,
    #[serde(rename = "aptitude")]
    AptitudeTest,
    #[serde(rename = "interview1")]
    Interview1,
    #[serde(rename = "interview2")]
    Interview2,
    #[serde(rename = "interview3")]
    Interview3,
}

/// Keys accepted on the command line and in the pin store
const PIN_TYPE_KEYS: &[&str] = &["document", "aptitude", "interview1", "interview2", "interview3"];

impl PinType {
    pub const ALL: [PinType; 5] = [
        PinType::DocumentSubmission,
        PinType::AptitudeTest,
        PinType::Interview1,
        PinType::Interview2,
        PinType::Interview3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PinType::DocumentSubmission => "document",
            PinType::AptitudeTest => "aptitude",
            PinType::Interview1 => "interview1",
            PinType::Interview2 => "interview2",
            PinType::Interview3 => "interview3",
        }
    }

    /// Display label used in advisory text
    pub fn label(&self) -> &'static str {
        match self {
            PinType::DocumentSubmission => "서류 접수",
            PinType::AptitudeTest => "인적성/코딩테스트",
            PinType::Interview1 => "1차 면접",
            PinType::Interview2 => "2차 면접",
            PinType::Interview3 => "3차 면접",
        }
    }

    /// Classify a free-form stage label ("서류접수", "1차 면접", "Coding Test", ...)
    /// into the pin type it corresponds to. Announcements and unrecognised labels
    /// return `None`.
    pub fn classify_label(label: &str) -> Option<PinType> {
        let key: String = label
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if key.is_empty() {
            return None;
        }
        if ["합격", "발표", "result", "offer", "입사"].iter().any(|k| key.contains(k)) {
            return None;
        }
        if [
            "인적성", "적성", "인성검사", "역량검사", "검사", "코딩", "필기", "aptitude", "test", "assessment",
            "과제",
        ]
        .iter()
        .any(|k| key.contains(k))
        {
            return Some(PinType::AptitudeTest);
        }
        if ["3차", "최종", "final", "interview3", "임원"].iter().any(|k| key.contains(k)) {
            return Some(PinType::Interview3);
        }
        if ["2차", "interview2"].iter().any(|k| key.contains(k)) {
            return Some(PinType::Interview2);
        }
        if ["1차", "면접", "interview"].iter().any(|k| key.contains(k)) {
            return Some(PinType::Interview1);
        }
        if ["서류", "접수", "지원", "document", "application", "apply"]
            .iter()
            .any(|k| key.contains(k))
        {
            return Some(PinType::DocumentSubmission);
        }
        None
    }
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinTypeParseError {
    #[error("Unknown pin type '{input}'\n  Did you mean '{suggestion}'?")]
    Suggest { input: String, suggestion: String },
    #[error("Unknown pin type '{input}'. Valid types: document, aptitude, interview1, interview2, interview3")]
    Unknown { input: String },
}

impl FromStr for PinType {
    type Err = PinTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let parsed = match lower.as_str() {
            "document" | "documents" | "doc" | "서류" => Some(PinType::DocumentSubmission),
            "aptitude" | "test" | "인적성" => Some(PinType::AptitudeTest),
            "interview1" | "1차" => Some(PinType::Interview1),
            "interview2" | "2차" => Some(PinType::Interview2),
            "interview3" | "3차" => Some(PinType::Interview3),
            _ => None,
        };

        parsed.ok_or_else(|| match closest_match(&lower, PIN_TYPE_KEYS, 3) {
            Some(suggestion) => PinTypeParseError::Suggest {
                input: s.to_string(),
                suggestion: suggestion.to_string(),
            },
            None => PinTypeParseError::Unknown { input: s.to_string() },
        })
    }
}

/// A user-authored simulated stage window.
///
/// Serialized as `{ id, type, date, endDate? }` with ISO date strings; `endDate`
/// absent means a single-day window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPin {
    pub id: String,
    #[serde(rename = "type")]
    pub pin_type: PinType,
    #[serde(serialize_with = "serialize_iso_date", deserialize_with = "deserialize_iso_date")]
    pub date: NaiveDate,
    #[serde(
        rename = "endDate",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_iso_date",
        deserialize_with = "deserialize_opt_iso_date"
    )]
    pub end_date: Option<NaiveDate>,
}

impl UserPin {
    /// Create a new pin with a fresh id
    pub fn new(pin_type: PinType, date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pin_type,
            date,
            end_date,
        }
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.date, self.end_date.unwrap_or(self.date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_pin_type_conversion() {
        for pin_type in PinType::ALL {
            assert_eq!(pin_type.as_str().parse::<PinType>(), Ok(pin_type));
        }
        assert_eq!("서류".parse::<PinType>(), Ok(PinType::DocumentSubmission));
        assert!(matches!(
            "intervew2".parse::<PinType>(),
            Err(PinTypeParseError::Suggest { ref suggestion, .. }) if suggestion == "interview2"
        ));
        assert!(matches!(
            "completely-wrong".parse::<PinType>(),
            Err(PinTypeParseError::Unknown { .. })
        ));
    }

    #[test]
    fn test_classify_label() {
        assert_eq!(PinType::classify_label("서류접수"), Some(PinType::DocumentSubmission));
        assert_eq!(PinType::classify_label("서류 전형"), Some(PinType::DocumentSubmission));
        assert_eq!(PinType::classify_label("인적성검사"), Some(PinType::AptitudeTest));
        assert_eq!(PinType::classify_label("Coding Test"), Some(PinType::AptitudeTest));
        assert_eq!(PinType::classify_label("인성검사"), Some(PinType::AptitudeTest));
        assert_eq!(PinType::classify_label("AI역량검사"), Some(PinType::AptitudeTest));
        assert_eq!(PinType::classify_label("역량 검사"), Some(PinType::AptitudeTest));
        // Competency interviews stay interviews
        assert_eq!(PinType::classify_label("역량면접"), Some(PinType::Interview1));
        assert_eq!(PinType::classify_label("인성 면접"), Some(PinType::Interview1));
        assert_eq!(PinType::classify_label("1차 면접"), Some(PinType::Interview1));
        assert_eq!(PinType::classify_label("면접"), Some(PinType::Interview1));
        assert_eq!(PinType::classify_label("2차 면접"), Some(PinType::Interview2));
        assert_eq!(PinType::classify_label("최종면접"), Some(PinType::Interview3));
        assert_eq!(PinType::classify_label("최종 합격 발표"), None);
        assert_eq!(PinType::classify_label("오리엔테이션"), None);
        assert_eq!(PinType::classify_label(""), None);
    }

    #[test]
    fn test_pin_window_defaults_to_single_day() {
        let pin = UserPin::new(PinType::Interview2, d(2026, 3, 10), None);
        assert_eq!(pin.window(), DateWindow::single_day(d(2026, 3, 10)));
        assert!(!pin.id.is_empty());

        let ranged = UserPin::new(PinType::DocumentSubmission, d(2026, 3, 1), Some(d(2026, 3, 3)));
        assert_eq!(ranged.window().span_days(), 2);
    }

    #[test]
    fn test_pin_json_shape() {
        let pin = UserPin {
            id: "p1".to_string(),
            pin_type: PinType::DocumentSubmission,
            date: d(2026, 3, 1),
            end_date: Some(d(2026, 3, 3)),
        };
        let json = serde_json::to_value(&pin).unwrap();
        assert_eq!(json["type"], "document");
        assert_eq!(json["date"], "2026-03-01");
        assert_eq!(json["endDate"], "2026-03-03");

        let single = UserPin { end_date: None, ..pin };
        let json = serde_json::to_value(&single).unwrap();
        assert!(json.get("endDate").is_none());
    }

    #[test]
    fn test_pin_deserializes_timestamps() {
        let pin: UserPin = serde_json::from_str(
            r#"{"id":"x","type":"interview1","date":"2026-03-04T00:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(pin.date, d(2026, 3, 4));
        assert_eq!(pin.end_date, None);
    }
}
