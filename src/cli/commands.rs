use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

use crate::config::Config;
use crate::db::DbConnection;
use crate::fetch::{apply_query, ScheduleQuery};
use crate::models::RawScheduleRecord;
use crate::normalize::{normalize_records, parse_records};
use crate::repo::{PinRepo, PinRepoError};
use crate::state::{DashboardAction, DashboardState};
use crate::utils::date::YearMonth;
use crate::cli::error::{user_error, validate_date, validate_pin_window, warn_user};
use crate::cli::output::{
    format_calendar, format_day_detail, format_insights, format_legend, format_pins_table,
    format_schedules, get_terminal_width, is_tty,
};
use crate::cli::parser::{default_month, parse_filter_args, parse_month_arg, parse_pin_type_arg, FilterArgs};

#[derive(Parser)]
#[command(name = "rivalcal")]
#[command(about = "Recruitment schedule overlap calendar - see how crowded each day is and how your own stages compare")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize raw schedule records and print the result
    Normalize {
        /// JSON file holding an array of raw schedule records
        file: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show the monthly overlap heat map
    Calendar {
        /// JSON file holding an array of raw schedule records
        file: PathBuf,
        /// Month to display (YYYY-MM); defaults to the month of the earliest stage
        #[arg(long)]
        month: Option<String>,
        /// Also list the companies active on this day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Compare pinned stages against competitor schedules
    Insights {
        /// JSON file holding an array of raw schedule records
        file: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Manage your own pinned stage dates
    Pins {
        #[command(subcommand)]
        subcommand: PinCommands,
    },
}

#[derive(Subcommand)]
pub enum PinCommands {
    /// Pin a stage date (e.g. pins add document 2026-03-02 2026-03-06)
    Add {
        /// Stage type: document, aptitude, interview1, interview2, interview3
        pin_type: String,
        /// Start date (YYYY-MM-DD)
        date: String,
        /// End date (YYYY-MM-DD); defaults to the start date
        end: Option<String>,
    },
    /// List pins
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Remove a pin by id or unique id prefix
    Remove {
        id: String,
    },
    /// Remove all pins
    Clear,
}

pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    // Let clap print help and version
    let is_help_request = args
        .iter()
        .any(|a| a == "--help" || a == "-h" || a == "help" || a == "--version" || a == "-V");
    if is_help_request {
        if let Err(e) = Cli::try_parse() {
            e.print()?;
            if e.use_stderr() {
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print()?;
            std::process::exit(1);
        }
    };

    handle_command(cli)
}

fn handle_command(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    log::debug!("Loaded configuration from {}", Config::config_path().display());

    match cli.command {
        Commands::Normalize { file, filter, json } => handle_normalize(&file, &filter, json),
        Commands::Calendar { file, month, day, filter, json } => {
            handle_calendar(&config, &file, month.as_deref(), day.as_deref(), &filter, json)
        }
        Commands::Insights { file, filter, json } => handle_insights(&config, &file, &filter, json),
        Commands::Pins { subcommand } => handle_pins(&config, subcommand),
    }
}

/// Read the schedule file and select the records matching the filter flags
fn load_records(file: &Path, filter: &FilterArgs) -> Result<(ScheduleQuery, Vec<RawScheduleRecord>)> {
    let query = parse_filter_args(filter).unwrap_or_else(|e| user_error(&e));

    if !file.exists() {
        user_error(&format!("Schedule file not found: {}", file.display()));
    }
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read schedule file: {}", file.display()))?;
    let records = parse_records(&content)
        .unwrap_or_else(|e| user_error(&format!("{}: {:#}", file.display(), e)));

    let selected = apply_query(&records, &query);
    log::debug!(
        "Selected {} of {} records from {} for {}",
        selected.len(),
        records.len(),
        file.display(),
        query.key()
    );
    Ok((query, selected))
}

/// Build the dashboard state for a file, the filter flags and an optional month
fn load_dashboard(
    config: &Config,
    file: &Path,
    filter: &FilterArgs,
    month: Option<YearMonth>,
) -> Result<DashboardState> {
    let (query, records) = load_records(file, filter)?;

    let conn = DbConnection::connect(config).context("Failed to connect to database")?;
    let pins = PinRepo::load(&conn).context("Failed to load pins")?;

    let mut state = DashboardState::new(month.unwrap_or_else(YearMonth::current)).with_pins(pins);
    if let Some(ticket) = state.apply(DashboardAction::SetFilter(query)) {
        state.apply(DashboardAction::FetchCompleted { ticket, records });
    }
    if month.is_none() {
        let anchor = default_month(&state.schedules);
        state.apply(DashboardAction::SetMonth(anchor));
    }

    for issue in &state.issues {
        warn_user(&issue.to_string());
    }
    if state.showing_placeholder {
        warn_user("No schedules matched; showing sample data.");
    }

    Ok(state)
}

fn handle_normalize(file: &Path, filter: &FilterArgs, json: bool) -> Result<()> {
    let (_, records) = load_records(file, filter)?;
    let outcome = normalize_records(&records);

    for issue in &outcome.issues {
        warn_user(&issue.to_string());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.schedules)?);
    } else {
        print!("{}", format_schedules(&outcome.schedules, is_tty()));
    }
    Ok(())
}

fn handle_calendar(
    config: &Config,
    file: &Path,
    month: Option<&str>,
    day: Option<&str>,
    filter: &FilterArgs,
    json: bool,
) -> Result<()> {
    let month = month.map(|m| parse_month_arg(m).unwrap_or_else(|e| user_error(&e)));
    let day = day.map(|d| validate_date(d, "day").unwrap_or_else(|e| user_error(&e)));

    // A selected day implies its month unless one was given explicitly
    let month = month.or_else(|| day.map(YearMonth::of));
    if let (Some(month), Some(day)) = (month, day) {
        if YearMonth::of(day) != month {
            user_error(&format!("Day {} is outside the displayed month {}.", day, month));
        }
    }

    let state = load_dashboard(config, file, filter, month)?;
    let view = state.view(config);

    if json {
        let mut value = serde_json::to_value(&view)?;
        if let Some(day) = day {
            value["selectedDay"] = serde_json::json!({
                "date": day.to_string(),
                "count": view.overlap.count_on(day),
                "active": view.overlap.active_on(day),
            });
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let tty = is_tty();
    print!("{}", format_calendar(&view, tty, get_terminal_width()));
    print!("{}", format_legend(&view.legend, tty));
    if let Some(day) = day {
        println!();
        print!("{}", format_day_detail(&view.overlap, day, tty));
    }
    Ok(())
}

fn handle_insights(config: &Config, file: &Path, filter: &FilterArgs, json: bool) -> Result<()> {
    let state = load_dashboard(config, file, filter, None)?;
    let view = state.view(config);

    if json {
        println!("{}", serde_json::to_string_pretty(&view.insights)?);
    } else {
        print!("{}", format_insights(&view.insights, &state.schedules, is_tty()));
    }
    Ok(())
}

fn handle_pins(config: &Config, cmd: PinCommands) -> Result<()> {
    let conn = DbConnection::connect(config).context("Failed to connect to database")?;

    match cmd {
        PinCommands::Add { pin_type, date, end } => {
            let pin_type = parse_pin_type_arg(&pin_type).unwrap_or_else(|e| user_error(&e));
            let date = validate_date(&date, "date").unwrap_or_else(|e| user_error(&e));
            let end = end.map(|e| validate_date(&e, "end date").unwrap_or_else(|e| user_error(&e)));
            if let Err(e) = validate_pin_window(date, end) {
                user_error(&e);
            }

            let pin = PinRepo::add(&conn, pin_type, date, end).context("Failed to add pin")?;
            let window = pin.window();
            println!(
                "Pinned {} ({}) {}..{} (id: {})",
                pin.pin_type.label(),
                pin.pin_type,
                window.start,
                window.end,
                pin.id
            );
            Ok(())
        }
        PinCommands::List { json } => {
            let pins = PinRepo::load(&conn).context("Failed to load pins")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pins)?);
            } else {
                print!("{}", format_pins_table(&pins, is_tty()));
            }
            Ok(())
        }
        PinCommands::Remove { id } => {
            match PinRepo::remove(&conn, &id) {
                Ok(Some(pin)) => {
                    println!("Removed pin {} ({} {})", pin.id, pin.pin_type, pin.date);
                    Ok(())
                }
                Ok(None) => user_error(&format!("Pin '{}' not found", id)),
                Err(e) => match e.downcast_ref::<PinRepoError>() {
                    Some(err @ PinRepoError::AmbiguousPrefix { .. }) => user_error(&err.to_string()),
                    None => Err(e.context("Failed to remove pin")),
                },
            }
        }
        PinCommands::Clear => {
            let count = PinRepo::clear(&conn).context("Failed to clear pins")?;
            println!("Removed {} pin(s)", count);
            Ok(())
        }
    }
}
