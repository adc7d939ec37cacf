//! fieldlog - session reports for trainers visiting schools
//!
//! This is the command-line entry point. It wires together:
//! - Configuration loading
//! - Store initialization
//! - The session book for the selected school
//! - Aggregation and export

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use fieldlog_api::{Grade, MediaFile, Scope, SessionDraft, SessionRecord};
use fieldlog_config::{Config, StorageBackend, load_config};
use fieldlog_core::SessionBook;
use fieldlog_core::analytics::{SessionSummary, record_attendance, summarize};
use fieldlog_export::{
    CSV_MIME_TYPE, export_file_name, generate_dashboard_markup, generate_remote_script_for, to_csv,
};
use fieldlog_store::{MemoryStore, SqliteStore, Store};
use fieldlog_util::{
    DATABASE_FILENAME, SessionId, default_config_path, format_timestamp, is_mock_time_active,
    parse_date,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// fieldlog - Record, summarize and export school training sessions
#[derive(Parser, Debug)]
#[command(name = "fieldlog")]
#[command(about = "Record, summarize and export school training sessions", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/fieldlog/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set FIELDLOG_DATA_DIR env var)
    #[arg(short, long, env = "FIELDLOG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// School identity to work with (default: first configured school)
    #[arg(short, long)]
    school: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new session (date, time and grade are required)
    Add(SessionFields),

    /// Edit an existing session; omitted fields keep their values
    Update {
        id: SessionId,

        #[command(flatten)]
        fields: SessionFields,
    },

    /// List sessions, newest first
    List,

    /// Print one session as JSON, including its edit history
    Show { id: SessionId },

    /// Summary statistics
    Stats {
        /// Print the full summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the sessions to a CSV file
    ExportCsv {
        /// Directory to write to (default: export.output_dir from config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Print the spreadsheet script with the current sessions embedded
    Script,

    /// Print the dashboard page markup
    Dashboard,

    /// List configured schools
    Schools,
}

#[derive(ClapArgs, Debug, Default)]
struct SessionFields {
    /// Session date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    date: Option<NaiveDate>,

    /// Time of day, e.g. 09:30
    #[arg(long)]
    time: Option<String>,

    /// Duration in minutes
    #[arg(long)]
    duration: Option<u32>,

    /// Grade: K or 1-12
    #[arg(long)]
    grade: Option<Grade>,

    /// Number of boys attending
    #[arg(long)]
    boys: Option<String>,

    /// Number of girls attending
    #[arg(long)]
    girls: Option<String>,

    #[arg(long)]
    topics: Option<String>,

    /// Whether the class teacher attended
    #[arg(long)]
    teacher: Option<String>,

    #[arg(long)]
    summary: Option<String>,

    /// Attached media as NAME:SIZE:MIME (repeatable)
    #[arg(long = "media", value_parser = parse_media)]
    media: Vec<MediaFile>,
}

impl SessionFields {
    fn into_draft(self) -> SessionDraft {
        SessionDraft {
            date: self.date,
            time: self.time,
            duration_minutes: self.duration,
            grade: self.grade,
            boys_attendance: self.boys,
            girls_attendance: self.girls,
            topics_taught: self.topics,
            teacher_attended: self.teacher,
            summary: self.summary,
            media_files: if self.media.is_empty() {
                None
            } else {
                Some(self.media)
            },
        }
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("expected YYYY-MM-DD, got '{}'", s))
}

/// Parse `NAME:SIZE:MIME`. The name may itself contain colons.
fn parse_media(s: &str) -> Result<MediaFile, String> {
    let mut parts = s.rsplitn(3, ':');
    let (Some(mime_type), Some(size), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected NAME:SIZE:MIME, got '{}'", s));
    };

    if name.is_empty() || mime_type.is_empty() {
        return Err(format!("expected NAME:SIZE:MIME, got '{}'", s));
    }
    let size = size
        .parse::<u64>()
        .map_err(|e| format!("invalid size '{}': {}", size, e))?;

    Ok(MediaFile {
        name: name.to_string(),
        size,
        mime_type: mime_type.to_string(),
    })
}

fn open_store(config: &Config, data_dir_override: Option<&Path>) -> Result<Arc<dyn Store>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; sessions will not be kept after exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Sqlite => {
            let data_dir = data_dir_override.unwrap_or(config.storage.data_dir.as_path());

            std::fs::create_dir_all(data_dir)
                .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

            let db_path = data_dir.join(DATABASE_FILENAME);
            let store = SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?;

            info!(db_path = %db_path.display(), "Store initialized");
            Ok(Arc::new(store))
        }
    }
}

fn select_scope(config: &Config, school: Option<&str>) -> Result<Scope> {
    config.scope_for(school).ok_or_else(|| match school {
        Some(identity) => anyhow!("Unknown school '{}'", identity),
        None => anyhow!("No schools configured"),
    })
}

fn print_schools(config: &Config) {
    for (index, profile) in config.schools.iter().enumerate() {
        let default_marker = if index == 0 { " (default)" } else { "" };
        println!(
            "{}\t{}{}",
            profile.school.identity, profile.school.name, default_marker
        );

        let mut details = Vec::new();
        if let Some(location) = &profile.location {
            details.push(location.clone());
        }
        if let Some(grades) = &profile.grades {
            details.push(format!("grades {}", grades));
        }
        if let Some(students) = profile.total_students {
            details.push(format!("{} students", students));
        }
        if !details.is_empty() {
            println!("\t{}", details.join(", "));
        }
    }
}

fn print_session_line(record: &SessionRecord) {
    let mut line = format!(
        "{}  {} {}  {}  {} attended",
        record.id,
        record.date,
        record.time,
        record.grade.display_name(),
        record_attendance(record),
    );
    if let Some(topics) = record.topics_taught.as_deref().filter(|t| !t.is_empty()) {
        line.push_str(&format!("  {}", topics));
    }
    match record.edit_count() {
        0 => {}
        1 => line.push_str("  (edited 1 time)"),
        n => line.push_str(&format!("  (edited {} times)", n)),
    }
    println!("{}", line);
}

fn print_summary(summary: &SessionSummary) {
    println!("Total sessions:     {}", summary.total_sessions);
    println!("This week:          {}", summary.this_week_sessions);
    println!("Total attendance:   {}", summary.total_attendance);
    println!("Average attendance: {}", summary.average_attendance);
    println!("Grades covered:     {}", summary.grades_covered);
    println!(
        "Boys / girls:       {} / {}",
        summary.gender.boys, summary.gender.girls
    );

    if !summary.grade_distribution.is_empty() {
        println!();
        println!("By grade:");
        for (grade, total) in &summary.grade_distribution {
            println!("  {:<12} {}", grade.display_name(), total);
        }
    }

    if !summary.attendance_by_date.is_empty() {
        println!();
        println!("Attendance trend:");
        for point in &summary.attendance_by_date {
            println!(
                "  {:<8} {} (boys {}, girls {})",
                point.label, point.total, point.boys, point.girls
            );
        }
    }
}

fn export_csv(book: &SessionBook, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let today = fieldlog_util::now().date_naive();
    let path = output_dir.join(export_file_name(&book.scope().school.name, today));
    let csv = to_csv(book.list_all());

    std::fs::write(&path, csv).with_context(|| format!("Failed to write {:?}", path))?;

    info!(
        path = %path.display(),
        mime_type = CSV_MIME_TYPE,
        session_count = book.len(),
        "CSV exported"
    );
    Ok(path)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    info!(
        config_path = %args.config.display(),
        school_count = config.schools.len(),
        "Configuration loaded"
    );

    if let Command::Schools = args.command {
        print_schools(&config);
        return Ok(());
    }

    // The dashboard page carries no session data
    if let Command::Dashboard = args.command {
        print!("{}", generate_dashboard_markup());
        return Ok(());
    }

    let scope = select_scope(&config, args.school.as_deref())?;
    let store = open_store(&config, args.data_dir.as_deref())?;
    if !store.is_healthy() {
        warn!("Store reports unhealthy; changes may not be saved");
    }

    let mut book = SessionBook::open(store, scope);
    debug!(scope = %book.scope_key(), "Using scope");

    match args.command {
        Command::Add(fields) => {
            let record = book.add(fields.into_draft(), fieldlog_util::now_utc())?;
            println!("{}", record.id);
        }
        Command::Update { id, fields } => {
            let record = book.update(id, fields.into_draft(), fieldlog_util::now_utc())?;
            println!(
                "{} updated at {}",
                record.id,
                format_timestamp(&record.last_modified())
            );
        }
        Command::List => {
            if book.is_empty() {
                println!("No sessions recorded for {}", book.scope().school.name);
            }
            for record in book.list_all() {
                print_session_line(record);
            }
        }
        Command::Show { id } => {
            let record = book
                .get(id)
                .ok_or_else(|| anyhow!("Session not found: {}", id))?;
            let json =
                serde_json::to_string_pretty(record).context("Failed to serialize session")?;
            println!("{}", json);
        }
        Command::Stats { json } => {
            let summary = summarize(book.list_all(), fieldlog_util::now());
            if json {
                let json = serde_json::to_string_pretty(&summary)
                    .context("Failed to serialize summary")?;
                println!("{}", json);
            } else {
                print_summary(&summary);
            }
        }
        Command::ExportCsv { output_dir } => {
            let output_dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());
            let path = export_csv(&book, &output_dir)?;
            println!("{}", path.display());
        }
        Command::Script => {
            print!("{}", generate_remote_script_for(book.list_all()));
        }
        Command::Dashboard | Command::Schools => {}
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "fieldlog starting");

    if is_mock_time_active() {
        warn!(now = %fieldlog_util::now(), "Mock time is active");
    }

    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_argument_parsing() {
        let media = parse_media("photo.jpg:2048:image/jpeg").unwrap();
        assert_eq!(media.name, "photo.jpg");
        assert_eq!(media.size, 2048);
        assert_eq!(media.mime_type, "image/jpeg");

        let media = parse_media("12:30 class.mp4:10:video/mp4").unwrap();
        assert_eq!(media.name, "12:30 class.mp4");

        assert!(parse_media("photo.jpg").is_err());
        assert!(parse_media("photo.jpg:big:image/jpeg").is_err());
        assert!(parse_media(":10:image/png").is_err());
    }

    #[test]
    fn update_without_media_keeps_existing() {
        let fields = SessionFields {
            grade: Some("4".parse().unwrap()),
            ..Default::default()
        };
        let draft = fields.into_draft();
        assert!(draft.media_files.is_none());
        assert!(draft.date.is_none());
        assert_eq!(draft.grade, Grade::numbered(4));
    }

    #[test]
    fn cli_parses_add() {
        let args = Args::try_parse_from([
            "fieldlog", "--school", "sunrise", "add", "--date", "2024-03-05", "--time", "09:30",
            "--grade", "K", "--boys", "12", "--media", "a.png:1:image/png",
        ])
        .unwrap();

        assert_eq!(args.school.as_deref(), Some("sunrise"));
        match args.command {
            Command::Add(fields) => {
                let draft = fields.into_draft();
                assert_eq!(draft.grade, Some(Grade::KINDERGARTEN));
                assert_eq!(draft.boys_attendance.as_deref(), Some("12"));
                assert_eq!(draft.media_files.map(|m| m.len()), Some(1));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_bad_values() {
        assert!(Args::try_parse_from(["fieldlog", "add", "--grade", "13"]).is_err());
        assert!(Args::try_parse_from(["fieldlog", "add", "--date", "05/03/2024"]).is_err());
        assert!(Args::try_parse_from(["fieldlog", "add", "--date", "2024-02-30"]).is_err());
    }

    #[test]
    fn cli_parses_update_and_stats() {
        let args = Args::try_parse_from(["fieldlog", "update", "1700000000000", "--grade", "4"])
            .unwrap();
        assert!(matches!(args.command, Command::Update { id, .. } if id.as_i64() == 1700000000000));

        let args = Args::try_parse_from(["fieldlog", "stats", "--json"]).unwrap();
        assert!(matches!(args.command, Command::Stats { json: true }));
    }
}
