// CLI argument parsing helpers: filters, months and pin types

use crate::fetch::ScheduleQuery;
use crate::models::{CompanySchedule, DataType, HiringType, PinType};
use crate::utils::date::YearMonth;

/// Raw filter flags as given on the command line
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FilterArgs {
    /// Hiring track: 신입 (new) or 경력 (experienced)
    #[arg(long = "type")]
    pub hiring_type: Option<String>,
    /// Data bucket: actual or predicted
    #[arg(long = "data-type")]
    pub data_type: Option<String>,
    /// Job role substring (e.g. backend)
    #[arg(long = "role")]
    pub job_role: Option<String>,
    /// Company name (legal-entity markers are ignored)
    #[arg(long)]
    pub company: Option<String>,
}

/// Build a schedule query from filter flags
pub fn parse_filter_args(args: &FilterArgs) -> Result<ScheduleQuery, String> {
    let hiring_type = match args.hiring_type.as_deref() {
        Some(raw) => Some(HiringType::from_str(raw).ok_or_else(|| {
            format!("Invalid hiring type '{}'. Use 신입 (new) or 경력 (experienced).", raw)
        })?),
        None => None,
    };
    let data_type = match args.data_type.as_deref() {
        Some(raw) => Some(DataType::from_str(raw).ok_or_else(|| {
            format!("Invalid data type '{}'. Use actual or predicted.", raw)
        })?),
        None => None,
    };

    Ok(ScheduleQuery {
        hiring_type,
        data_type,
        job_role: args.job_role.clone().filter(|r| !r.trim().is_empty()),
        company: args.company.clone().filter(|c| !c.trim().is_empty()),
    })
}

/// Parse a `--month` value
pub fn parse_month_arg(value: &str) -> Result<YearMonth, String> {
    value.parse::<YearMonth>().map_err(|e| e.to_string())
}

/// Parse a pin type argument, with a suggestion on typos
pub fn parse_pin_type_arg(value: &str) -> Result<PinType, String> {
    value.parse::<PinType>().map_err(|e| e.to_string())
}

/// Month to display when none is given: the month of the earliest stage, or the
/// current month when there are no schedules
pub fn default_month(schedules: &[CompanySchedule]) -> YearMonth {
    schedules
        .iter()
        .flat_map(|c| c.stages.iter().map(|s| s.start_date))
        .min()
        .map(YearMonth::of)
        .unwrap_or_else(YearMonth::current)
}
