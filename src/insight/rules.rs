//! Advisory rule set
//!
//! Each pinned stage category carries an ordered list of count bands; the first
//! band whose range contains the competitor count produces the advisory. A
//! category with no bands emits nothing, which is how "no rule" is expressed.
//!
//! # Default rules
//!
//! | Category    | Count   | Severity |
//! |-------------|---------|----------|
//! | document    | >= 3    | Warning  |
//! | document    | 0       | Success  |
//! | document    | 1..=2   | Info     |
//! | aptitude    | >= 2    | Warning  |
//! | aptitude    | 0       | Success  |
//! | interview1  | >= 3    | Warning  |
//! | interview2  | 0       | Success  |
//! | interview2  | >= 2    | Info     |
//! | interview3  | (none)  |          |
//!
//! The overall timeline is checked separately: span < 14 days is Info, span > 30
//! days is Warning.

use serde::Serialize;

use crate::models::{PinType, Severity};

pub const DEFAULT_DOCUMENT_WARNING_AT: usize = 3;
pub const DEFAULT_APTITUDE_WARNING_AT: usize = 2;
pub const DEFAULT_INTERVIEW1_WARNING_AT: usize = 3;
pub const DEFAULT_INTERVIEW2_INFO_AT: usize = 2;
pub const DEFAULT_TIMELINE_FAST_BELOW_DAYS: i64 = 14;
pub const DEFAULT_TIMELINE_SLOW_ABOVE_DAYS: i64 = 30;

/// Which competitor stages are compared against a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageMatch {
    /// Only stages whose label classifies as the pin's type
    SameKind,
    /// Every stage, regardless of label
    Any,
}

impl StageMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageMatch::SameKind => "same-kind",
            StageMatch::Any => "any",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "same-kind" | "same_kind" | "kind" => Some(StageMatch::SameKind),
            "any" | "all" => Some(StageMatch::Any),
            _ => None,
        }
    }
}

/// Inclusive competitor-count range mapped to an advisory.
/// `{count}` in `message` is replaced with the actual count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountBand {
    pub min: usize,
    pub max: Option<usize>,
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl CountBand {
    fn new(min: usize, max: Option<usize>, severity: Severity, title: &str, message: &str) -> Self {
        Self {
            min,
            max,
            severity,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn matches(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    pub fn render(&self, count: usize) -> String {
        self.message.replace("{count}", &count.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRule {
    pub pin_type: PinType,
    pub bands: Vec<CountBand>,
}

impl CategoryRule {
    pub fn evaluate(&self, count: usize) -> Option<&CountBand> {
        self.bands.iter().find(|band| band.matches(count))
    }
}

/// Overall span check across every pin. `{days}` in the messages is replaced with
/// the span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRule {
    pub fast_below: i64,
    pub slow_above: i64,
}

impl TimelineRule {
    pub fn evaluate(&self, span_days: i64) -> Option<(Severity, &'static str, String)> {
        if span_days < self.fast_below {
            Some((
                Severity::Info,
                "빠른 채용 프로세스",
                format!(
                    "전체 채용 일정이 {}일로 짧습니다. 빠른 프로세스는 지원자 경험과 합격자 확보에 유리합니다.",
                    span_days
                ),
            ))
        } else if span_days > self.slow_above {
            Some((
                Severity::Warning,
                "지원자 이탈 위험",
                format!(
                    "전체 채용 일정이 {}일로 깁니다. 프로세스가 길어지면 지원자가 타사로 이탈할 수 있습니다.",
                    span_days
                ),
            ))
        } else {
            None
        }
    }
}

/// Tunable thresholds the default rule set is built from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightThresholds {
    pub document_warning_at: usize,
    pub aptitude_warning_at: usize,
    pub interview1_warning_at: usize,
    pub interview2_info_at: usize,
    /// No interview3 rule unless set
    pub interview3_warning_at: Option<usize>,
    pub timeline_fast_below: i64,
    pub timeline_slow_above: i64,
    pub timeline_enabled: bool,
    /// Categories whose rule is switched off entirely
    pub disabled: Vec<PinType>,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            document_warning_at: DEFAULT_DOCUMENT_WARNING_AT,
            aptitude_warning_at: DEFAULT_APTITUDE_WARNING_AT,
            interview1_warning_at: DEFAULT_INTERVIEW1_WARNING_AT,
            interview2_info_at: DEFAULT_INTERVIEW2_INFO_AT,
            interview3_warning_at: None,
            timeline_fast_below: DEFAULT_TIMELINE_FAST_BELOW_DAYS,
            timeline_slow_above: DEFAULT_TIMELINE_SLOW_ABOVE_DAYS,
            timeline_enabled: true,
            disabled: Vec::new(),
        }
    }
}

/// Complete, ordered rule set consumed by the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightRules {
    pub stage_match: StageMatch,
    /// One entry per pin type, in reporting order
    pub categories: Vec<CategoryRule>,
    pub timeline: Option<TimelineRule>,
}

impl Default for InsightRules {
    fn default() -> Self {
        Self::from_thresholds(&InsightThresholds::default(), StageMatch::SameKind)
    }
}

impl InsightRules {
    pub fn from_thresholds(thresholds: &InsightThresholds, stage_match: StageMatch) -> Self {
        let categories = PinType::ALL
            .iter()
            .map(|&pin_type| {
                let bands = if thresholds.disabled.contains(&pin_type) {
                    Vec::new()
                } else {
                    default_bands(pin_type, thresholds)
                };
                CategoryRule { pin_type, bands }
            })
            .collect();

        let timeline = thresholds.timeline_enabled.then(|| TimelineRule {
            fast_below: thresholds.timeline_fast_below,
            slow_above: thresholds.timeline_slow_above,
        });

        Self {
            stage_match,
            categories,
            timeline,
        }
    }

    pub fn rule_for(&self, pin_type: PinType) -> Option<&CategoryRule> {
        self.categories.iter().find(|rule| rule.pin_type == pin_type)
    }
}

fn default_bands(pin_type: PinType, t: &InsightThresholds) -> Vec<CountBand> {
    match pin_type {
        PinType::DocumentSubmission => {
            let mut bands = vec![
                CountBand::new(
                    t.document_warning_at,
                    None,
                    Severity::Warning,
                    "서류 접수 경쟁 과열",
                    "서류 접수 기간에 {count}개 경쟁사가 동시에 채용을 진행합니다. 접수 기간을 연장하거나 employer branding을 강화하는 것을 고려하세요.",
                ),
                CountBand::new(
                    0,
                    Some(0),
                    Severity::Success,
                    "서류 접수 최적 타이밍",
                    "서류 접수 기간에 겹치는 경쟁사 공고가 없습니다. 지원자를 모으기에 최적의 타이밍입니다.",
                ),
            ];
            if t.document_warning_at > 1 {
                bands.push(CountBand::new(
                    1,
                    Some(t.document_warning_at - 1),
                    Severity::Info,
                    "서류 접수 경쟁 보통",
                    "서류 접수 기간에 {count}개 경쟁사와 일정이 겹칩니다. 경쟁 수준은 보통입니다.",
                ));
            }
            bands
        }
        PinType::AptitudeTest => vec![
            CountBand::new(
                t.aptitude_warning_at,
                None,
                Severity::Warning,
                "인적성 일정 충돌 위험",
                "{count}개 경쟁사가 같은 기간에 인적성/코딩테스트를 진행합니다. 지원자 일정이 겹쳐 응시율이 떨어질 수 있습니다.",
            ),
            CountBand::new(
                0,
                Some(0),
                Severity::Success,
                "인적성 일정 단독 진행",
                "인적성/코딩테스트 기간에 겹치는 경쟁사가 없습니다.",
            ),
        ],
        PinType::Interview1 => vec![CountBand::new(
            t.interview1_warning_at,
            None,
            Severity::Warning,
            "1차 면접 중복 합격자 주의",
            "{count}개 경쟁사와 1차 면접 기간이 겹칩니다. 여러 곳에 합격한 지원자가 많을 수 있으니 빠르게 결정하세요.",
        )],
        PinType::Interview2 => vec![
            CountBand::new(
                0,
                Some(0),
                Severity::Success,
                "2차 면접 일정 양호",
                "2차 면접 기간에 겹치는 경쟁사가 없습니다.",
            ),
            CountBand::new(
                t.interview2_info_at,
                None,
                Severity::Info,
                "경쟁력 있는 오퍼 준비",
                "{count}개 경쟁사와 2차 면접 기간이 겹칩니다. 경쟁력 있는 처우 조건을 미리 준비하세요.",
            ),
        ],
        PinType::Interview3 => t
            .interview3_warning_at
            .map(|at| {
                vec![CountBand::new(
                    at,
                    None,
                    Severity::Warning,
                    "최종 면접 경쟁 주의",
                    "{count}개 경쟁사와 최종 면접 기간이 겹칩니다. 오퍼 수락 기한을 명확히 안내하세요.",
                )]
            })
            .unwrap_or_default(),
    }
}
