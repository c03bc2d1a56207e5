// Output formatting utilities

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::io::IsTerminal;

use crate::models::{CompanySchedule, Insight, Severity, UserPin};
use crate::overlap::{LegendStop, MonthOverlap};
use crate::state::DashboardView;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_RESET: &str = "\x1b[0m";

const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";
const ANSI_FG_CYAN: &str = "\x1b[36m";
const ANSI_FG_BLACK: &str = "\x1b[30m";

/// 256-color background ramp from faint to saturated red
const HEAT_RAMP: &[u8] = &[224, 217, 210, 203, 196, 160, 124];

/// Width of one calendar cell, excluding the separator
const CELL_WIDTH: usize = 6;

/// Below this width the calendar falls back to a day list
const MIN_GRID_WIDTH: usize = 7 * (CELL_WIDTH + 1);

const WEEKDAY_HEADERS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Check if stdout is a TTY (for color output)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate for reliable detection, with fallback to
/// COLUMNS environment variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    80
}

fn bold_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// Background escape for an opacity value; `None` for zero
fn heat_background(intensity: f64) -> Option<String> {
    if intensity <= 0.0 {
        return None;
    }
    let last = HEAT_RAMP.len() - 1;
    let index = ((intensity * HEAT_RAMP.len() as f64).floor() as usize).min(last);
    Some(format!("\x1b[48;5;{}m", HEAT_RAMP[index]))
}

/// Foreground escape for a `#RRGGBB` company color
fn hex_foreground(hex: &str) -> Option<String> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(hex, 16).ok()?;
    let (r, g, b) = ((rgb >> 16) & 0xff, (rgb >> 8) & 0xff, rgb & 0xff);
    Some(format!("\x1b[38;2;{};{};{}m", r, g, b))
}

fn intensity_for(legend: &[LegendStop], count: usize) -> f64 {
    legend
        .get(count)
        .or_else(|| legend.last())
        .map(|stop| stop.intensity)
        .unwrap_or(0.0)
}

/// Terminal columns taken by `c`: two for Hangul and other East Asian wide
/// characters, one otherwise
fn char_width(c: char) -> usize {
    match c as u32 {
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6 => 2,
        _ => 1,
    }
}

fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

fn pad_right(text: &str, width: usize) -> String {
    let len = display_width(text);
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Format the month heat map. Cells show the day number and, when non-zero,
/// the number of companies with an active stage.
pub fn format_calendar(view: &DashboardView, is_tty: bool, terminal_width: usize) -> String {
    let overlap = &view.overlap;
    let mut output = String::new();

    let title = format!("{}  (peak overlap: {})", overlap.month, overlap.max_count);
    output.push_str(&bold_if_tty(&title, is_tty));
    output.push('\n');

    if terminal_width < MIN_GRID_WIDTH {
        output.push_str(&format_day_list(overlap, &view.legend, is_tty));
        return output;
    }

    let headers: Vec<String> = WEEKDAY_HEADERS.iter().map(|h| pad_right(h, CELL_WIDTH)).collect();
    output.push_str(headers.join(" ").trim_end());
    output.push('\n');

    let leading = overlap.month.first_day().weekday().num_days_from_monday() as usize;
    let mut cells: Vec<String> = vec![" ".repeat(CELL_WIDTH); leading];

    for day in &overlap.days {
        let marker = if day.count > 0 {
            format!("[{}]", day.count)
        } else {
            String::new()
        };
        let text = pad_right(&format!("{:>2}{}", day.date.day(), marker), CELL_WIDTH);
        let cell = match heat_background(intensity_for(&view.legend, day.count)) {
            Some(bg) if is_tty => format!("{}{}{}{}", bg, ANSI_FG_BLACK, text, ANSI_RESET),
            _ => text,
        };
        cells.push(cell);
    }

    for week in cells.chunks(7) {
        output.push_str(week.join(" ").trim_end());
        output.push('\n');
    }

    output
}

fn format_day_list(overlap: &MonthOverlap, legend: &[LegendStop], is_tty: bool) -> String {
    let mut output = String::new();
    let busy: Vec<_> = overlap.days.iter().filter(|d| d.count > 0).collect();
    if busy.is_empty() {
        output.push_str("No active stages this month.\n");
        return output;
    }
    for day in busy {
        let bar = "#".repeat(day.count);
        let bar = match heat_background(intensity_for(legend, day.count)) {
            Some(bg) if is_tty => format!("{}{}{}", bg, bar, ANSI_RESET),
            _ => bar,
        };
        output.push_str(&format!("{} {} {}\n", day.date, bar, day.count));
    }
    output
}

/// Format the legend: one stop per count from 0 to the peak
pub fn format_legend(legend: &[LegendStop], is_tty: bool) -> String {
    let stops: Vec<String> = legend
        .iter()
        .map(|stop| {
            let label = format!("{}={:.2}", stop.count, stop.intensity);
            match heat_background(stop.intensity) {
                Some(bg) if is_tty => format!("{}{}  {} {}", bg, ANSI_FG_BLACK, ANSI_RESET, label),
                _ => label,
            }
        })
        .collect();
    format!("Legend: {}\n", stops.join("  "))
}

/// Format the list of companies active on one day
pub fn format_day_detail(overlap: &MonthOverlap, date: NaiveDate, is_tty: bool) -> String {
    let active = overlap.active_on(date);
    let count = overlap.count_on(date);
    let mut output = String::new();

    let noun = if count == 1 { "company" } else { "companies" };
    output.push_str(&bold_if_tty(&format!("{}: {} {}", date, count, noun), is_tty));
    output.push('\n');

    for stage in active {
        let bullet = match hex_foreground(&stage.color) {
            Some(fg) if is_tty => format!("{}●{}", fg, ANSI_RESET),
            _ => "*".to_string(),
        };
        output.push_str(&format!("  {} {}  {}\n", bullet, stage.company_name, stage.stage_label));
    }

    output
}

fn severity_prefix(severity: Severity, is_tty: bool) -> String {
    let tag = format!("[{}]", severity.as_str().to_uppercase());
    if !is_tty {
        return tag;
    }
    let color = match severity {
        Severity::Warning => ANSI_FG_YELLOW,
        Severity::Success => ANSI_FG_GREEN,
        Severity::Info => ANSI_FG_CYAN,
    };
    format!("{}{}{}", color, tag, ANSI_RESET)
}

/// Format advisory insights. Company ids are resolved to names via `schedules`.
pub fn format_insights(insights: &[Insight], schedules: &[CompanySchedule], is_tty: bool) -> String {
    if insights.is_empty() {
        return "No insights. Pin your own stage dates to compare against competitors.\n".to_string();
    }

    let names: HashMap<&str, &str> = schedules
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut output = String::new();
    for (i, insight) in insights.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!(
            "{} {}\n",
            severity_prefix(insight.severity, is_tty),
            bold_if_tty(&insight.title, is_tty)
        ));
        output.push_str(&format!("    {}\n", insight.message));
        if !insight.affected_company_ids.is_empty() {
            let companies: Vec<&str> = insight
                .affected_company_ids
                .iter()
                .map(|id| names.get(id.as_str()).copied().unwrap_or(id.as_str()))
                .collect();
            let line = format!("    Companies: {}", companies.join(", "));
            if is_tty {
                output.push_str(&format!("{}{}{}\n", ANSI_DIM, line, ANSI_RESET));
            } else {
                output.push_str(&line);
                output.push('\n');
            }
        }
    }
    output
}

/// Format pins as a table
pub fn format_pins_table(pins: &[UserPin], is_tty: bool) -> String {
    if pins.is_empty() {
        return "No pins.\n".to_string();
    }

    let rows: Vec<[String; 5]> = pins
        .iter()
        .map(|pin| {
            let window = pin.window();
            [
                pin.id.chars().take(8).collect(),
                pin.pin_type.as_str().to_string(),
                pin.pin_type.label().to_string(),
                window.start.to_string(),
                window.end.to_string(),
            ]
        })
        .collect();

    let headers = ["ID", "Type", "Stage", "Start", "End"];
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let mut output = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad_right(h, *w))
        .collect();
    output.push_str(&bold_if_tty(header_line.join(" ").trim_end(), is_tty));
    output.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&rule.join(" "));
    output.push('\n');

    for row in &rows {
        let line: Vec<String> = row.iter().zip(&widths).map(|(c, w)| pad_right(c, *w)).collect();
        output.push_str(line.join(" ").trim_end());
        output.push('\n');
    }
    output
}

/// Format normalized schedules, one block per company
pub fn format_schedules(schedules: &[CompanySchedule], is_tty: bool) -> String {
    if schedules.is_empty() {
        return "No schedules.\n".to_string();
    }

    let mut output = String::new();
    for company in schedules {
        let bucket = company.data_type.map(|d| d.as_str()).unwrap_or("all");
        let mut heading = format!(
            "{} ({}, {}, {})",
            company.name,
            company.hiring_type.as_str(),
            bucket,
            company.color
        );
        if let Some(role) = &company.job_role {
            heading.push_str(&format!(" - {}", role));
        }
        output.push_str(&bold_if_tty(&heading, is_tty));
        output.push('\n');
        output.push_str(&format!("  id: {}\n", company.id));

        for stage in &company.stages {
            let kind = stage.kind.map(|k| k.as_str()).unwrap_or("-");
            let range = if stage.start_date == stage.end_date {
                stage.start_date.to_string()
            } else {
                format!("{} .. {}", stage.start_date, stage.end_date)
            };
            output.push_str(&format!("  {} [{}] {}\n", pad_right(&stage.label, 12), kind, range));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{HiringType, InsightCategory, PinType, Stage};
    use crate::state::build_view;
    use crate::utils::date::YearMonth;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn company(id: &str, name: &str, start: u32, end: u32) -> CompanySchedule {
        CompanySchedule {
            id: id.to_string(),
            source_id: id.to_string(),
            name: name.to_string(),
            color: "#1428A0".to_string(),
            hiring_type: HiringType::NewGrad,
            data_type: None,
            job_role: None,
            stages: vec![Stage {
                id: format!("{}-s", id),
                label: "서류접수".to_string(),
                kind: Some(PinType::DocumentSubmission),
                start_date: d(start),
                end_date: d(end),
            }],
        }
    }

    fn view() -> DashboardView {
        let schedules = vec![company("a", "삼성전자", 2, 4), company("b", "네이버", 3, 3)];
        build_view(&schedules, &[], YearMonth::new(2026, 3).unwrap(), &Config::default())
    }

    #[test]
    fn test_heat_background() {
        assert_eq!(heat_background(0.0), None);
        assert_eq!(heat_background(0.1).as_deref(), Some("\x1b[48;5;224m"));
        assert_eq!(heat_background(0.15).as_deref(), Some("\x1b[48;5;217m"));
        assert_eq!(heat_background(0.9).as_deref(), Some("\x1b[48;5;124m"));
        assert_eq!(heat_background(1.0).as_deref(), Some("\x1b[48;5;124m"));
    }

    #[test]
    fn test_hex_foreground() {
        assert_eq!(hex_foreground("#1428A0").as_deref(), Some("\x1b[38;2;20;40;160m"));
        assert_eq!(hex_foreground("1428A0"), None);
        assert_eq!(hex_foreground("#12"), None);
        // Six bytes but not six hex digits
        assert_eq!(hex_foreground("#가나"), None);
        assert_eq!(hex_foreground("#12345g"), None);
    }

    #[test]
    fn test_format_calendar_grid() {
        let output = format_calendar(&view(), false, 80);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "2026-03  (peak overlap: 2)");
        assert!(lines[1].starts_with("Mon"));
        // March 2026 starts on a Sunday
        assert!(lines[2].ends_with(" 1"));
        assert!(lines[3].contains(" 2[1]"));
        assert!(lines[3].contains(" 3[2]"));
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_format_calendar_narrow_falls_back_to_list() {
        let output = format_calendar(&view(), false, 30);
        assert!(output.contains("2026-03-03 ## 2"));
        assert!(!output.contains("Mon"));
    }

    #[test]
    fn test_format_legend() {
        let output = format_legend(&view().legend, false);
        assert_eq!(output, "Legend: 0=0.00  1=0.15  2=0.23\n");
    }

    #[test]
    fn test_format_day_detail() {
        let output = format_day_detail(&view().overlap, d(3), false);
        assert!(output.starts_with("2026-03-03: 2 companies"));
        assert!(output.contains("* 삼성전자  서류접수"));
        assert!(output.contains("* 네이버  서류접수"));
    }

    #[test]
    fn test_format_day_detail_ignores_malformed_color() {
        let mut odd = company("a", "당근", 2, 4);
        odd.color = "#가나".to_string();
        let view = build_view(&[odd], &[], YearMonth::new(2026, 3).unwrap(), &Config::default());

        let output = format_day_detail(&view.overlap, d(3), true);
        assert!(output.contains("당근  서류접수"));
    }

    #[test]
    fn test_pad_right_counts_wide_characters_twice() {
        assert_eq!(display_width("삼성"), 4);
        assert_eq!(display_width("abc"), 3);
        assert_eq!(pad_right("삼성", 6), "삼성  ");
        assert_eq!(pad_right("abc", 6), "abc   ");
        assert_eq!(pad_right("네이버", 4), "네이버");
    }

    #[test]
    fn test_format_insights_resolves_names() {
        let schedules = vec![company("a", "삼성전자", 2, 4)];
        let insights = vec![Insight {
            severity: Severity::Warning,
            category: InsightCategory::Stage(PinType::DocumentSubmission),
            title: "title".to_string(),
            message: "message".to_string(),
            affected_company_ids: vec!["a".to_string(), "zzz".to_string()],
        }];
        let output = format_insights(&insights, &schedules, false);
        assert!(output.starts_with("[WARNING] title"));
        assert!(output.contains("Companies: 삼성전자, zzz"));

        assert!(format_insights(&[], &schedules, false).starts_with("No insights"));
    }

    #[test]
    fn test_format_pins_table() {
        let pin = UserPin {
            id: "0123456789abcdef".to_string(),
            pin_type: PinType::AptitudeTest,
            date: d(10),
            end_date: None,
        };
        let output = format_pins_table(&[pin], false);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].starts_with("01234567 aptitude"));
        assert!(lines[2].ends_with("2026-03-10 2026-03-10"));
        assert_eq!(format_pins_table(&[], false), "No pins.\n");
    }

    #[test]
    fn test_format_schedules() {
        let output = format_schedules(&[company("a", "삼성전자", 2, 2)], false);
        assert!(output.starts_with("삼성전자 (신입, all, #1428A0)"));
        assert!(output.contains("[document] 2026-03-02"));
    }
}
