use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use timetable_client::{ApiClient, TimetableQuery, catalog_or_default};
use timetable_core::{
    ClassRef, ExportFilter, Palette, PeriodCatalog, SchoolDay, WorkloadStat, export_events,
    school_week, stream_weekly_view, subject_distribution, summarize, teacher_grid,
};
use timetable_ingest::{ConstraintsEditor, parse_periods_json};
use tracing_subscriber::EnvFilter;

mod calendar;
mod config;
mod csv_export;
mod render;
mod source;
mod state;

use config::Config;
use source::Source;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TIMETABLE_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "timetable",
    version = VERSION,
    about = "School timetable views and workload analytics"
)]
struct Cli {
    /// Saved `GET /timetable/` response to read instead of the API
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Saved period configuration response
    #[arg(long, global = true)]
    periods: Option<PathBuf>,

    /// Academic year filter (overrides [api] academic_year)
    #[arg(long, global = true)]
    year: Option<String>,

    /// Term filter (overrides [api] term)
    #[arg(long, global = true)]
    term: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the period catalog
    Periods,

    /// One stream's day or week
    Stream {
        #[arg(long)]
        grade: String,
        #[arg(long)]
        stream: String,
        /// Day name; the whole week when omitted
        #[arg(long, value_parser = parse_day)]
        day: Option<SchoolDay>,
    },

    /// All classes side by side
    School {
        #[arg(long, value_parser = parse_day)]
        day: Option<SchoolDay>,
    },

    /// A teacher's weekly grid and any double bookings
    Teacher {
        #[arg(long)]
        id: String,
        /// Use the server's teacher endpoint instead of deriving locally
        #[arg(long)]
        remote: bool,
    },

    /// Workload report for every teacher
    Workload {
        /// Use the server's workload stats, re-evaluated against local thresholds
        #[arg(long)]
        remote: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Lessons per subject across one stream's week
    Subjects {
        #[arg(long)]
        grade: String,
        #[arg(long)]
        stream: String,
    },

    /// Subject colors
    Legend,

    /// Weekly-recurring calendar events as ICS
    ExportIcs {
        /// Restrict to one class (needs --stream)
        #[arg(long, requires = "stream", conflicts_with = "teacher")]
        grade: Option<String>,
        #[arg(long, requires = "grade")]
        stream: Option<String>,
        /// Restrict to one teacher
        #[arg(long)]
        teacher: Option<String>,
        #[arg(long)]
        term_start: Option<NaiveDate>,
        #[arg(long)]
        term_end: Option<NaiveDate>,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// School week, or one stream's week, as CSV
    ExportCsv {
        #[arg(long, requires = "stream")]
        grade: Option<String>,
        #[arg(long, requires = "grade")]
        stream: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Ask the server to generate a grade level's timetable
    Generate {
        #[arg(long)]
        grade: String,
    },

    /// Validate a teacher-constraints JSON file
    CheckConstraints {
        /// Constraint section name, used in messages
        #[arg(long, default_value = "constraints")]
        section: String,
        file: PathBuf,
    },

    /// Manage ~/.timetable/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn parse_day(s: &str) -> std::result::Result<SchoolDay, String> {
    SchoolDay::parse(s).ok_or_else(|| format!("unknown school day: {s}"))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    // `config init` must work even when the existing file doesn't parse.
    let cfg = match &cli.command {
        Command::Config {
            command: ConfigCommand::Init,
        } => Config::default(),
        _ => config::load_config()?,
    };
    let client = ApiClient::new(cfg.api.base_url.clone());

    let query = TimetableQuery {
        academic_year: cli.year.clone().or_else(|| cfg.api.academic_year.clone()),
        term: cli.term.clone().or_else(|| cfg.api.term.clone()),
        ..Default::default()
    };

    let source = Source {
        snapshot: cli.snapshot.clone(),
        periods: cli.periods.clone(),
        query: query.clone(),
    };

    match cli.command {
        Command::Periods => {
            let catalog = load_catalog(&source, &client).await?;
            print!("{}", render::periods(&catalog));
        }

        Command::Stream { grade, stream, day } => {
            let mut session = source.open(&cfg, &client).await?;
            match day {
                Some(day) => {
                    let rows = session.stream_view(&grade, &stream, day);
                    print!("{}", render::stream_day(&format!("{stream} ({grade}) {day}"), &rows));
                }
                None => {
                    let snap = session.snapshot();
                    let week = stream_weekly_view(&snap.schedule, &snap.catalog, &grade, &stream);
                    print!("{}", render::stream_week(&format!("{stream} ({grade})"), &week));
                }
            }
        }

        Command::School { day } => {
            let mut session = source.open(&cfg, &client).await?;
            let days = match day {
                Some(d) => vec![d],
                None => SchoolDay::ALL.to_vec(),
            };
            for d in days {
                let rows = session.school_view(d);
                print!("{}", render::school_day(d, &rows));
            }
        }

        Command::Teacher { id, remote } => {
            let (view, catalog) = if remote {
                if source.is_offline() {
                    bail!("--remote cannot be combined with --snapshot");
                }
                let report = client
                    .teacher_timetable(&id, &query, &cfg.school.grade_levels, &cfg.workload)
                    .await?;
                if let Some(name) = &report.teacher_name {
                    println!("{name}");
                }
                (report.view, load_catalog(&source, &client).await?)
            } else {
                let mut session = source.open(&cfg, &client).await?;
                let view = session.teacher_view(&id);
                ((*view).clone(), (*session.snapshot().catalog).clone())
            };

            if view.is_empty() {
                tracing::info!("no lessons found for teacher {id}");
            }
            print!("{}", render::teacher_grid(&id, &teacher_grid(&view, &catalog)));
            print!("{}", render::conflicts(view.conflicts()));
        }

        Command::Workload { remote, json } => {
            let stats: Vec<WorkloadStat> = if remote {
                if source.is_offline() {
                    bail!("--remote cannot be combined with --snapshot");
                }
                client
                    .workload(&cfg.workload)
                    .await?
                    .into_iter()
                    .map(|w| w.stat)
                    .collect()
            } else {
                let mut session = source.open(&cfg, &client).await?;
                (*session.workload_stats()).clone()
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&stats).context("serialize workload")?);
            } else {
                print!("{}", render::workload(&stats, &summarize(&stats), &cfg.workload));
            }
        }

        Command::Subjects { grade, stream } => {
            let session = source.open(&cfg, &client).await?;
            let dist = subject_distribution(&session.snapshot().schedule, &grade, &stream);
            print!("{}", render::subjects(&format!("{stream} ({grade})"), &dist));
        }

        Command::Legend => {
            print!("{}", render::legend(&Palette::standard().legend()));
        }

        Command::ExportIcs {
            grade,
            stream,
            teacher,
            term_start,
            term_end,
            out,
        } => {
            let opts = cfg.export_options(term_start, term_end)?;
            let filter = match (grade, stream, teacher) {
                (Some(g), Some(s), _) => ExportFilter::Class(ClassRef::new(g, s)),
                (_, _, Some(t)) => ExportFilter::Teacher(t),
                _ => ExportFilter::All,
            };
            let session = source.open(&cfg, &client).await?;
            let snap = session.snapshot();
            let events = export_events(&snap.schedule, &snap.catalog, &opts, &filter);
            tracing::info!("exporting {} recurring events", events.len());
            state::write_output(out.as_deref(), &calendar::events_to_ics(&events, Utc::now()))?;
        }

        Command::ExportCsv { grade, stream, out } => {
            let session = source.open(&cfg, &client).await?;
            let snap = session.snapshot();
            let text = match (grade, stream) {
                (Some(g), Some(s)) => {
                    let week = stream_weekly_view(&snap.schedule, &snap.catalog, &g, &s);
                    csv_export::to_string(|buf| csv_export::write_stream_week(&week, buf))?
                }
                _ => {
                    let week = school_week(&snap.schedule, &snap.catalog);
                    csv_export::to_string(|buf| csv_export::write_school_week(&week, buf))?
                }
            };
            state::write_output(out.as_deref(), &text)?;
        }

        Command::Generate { grade } => {
            if source.is_offline() {
                bail!("generate needs the API; drop --snapshot");
            }
            let generated = client
                .generate(&grade, &query, &cfg.school.grade_levels)
                .await?;
            let catalog = load_catalog(&source, &client).await?;
            for stream in generated.streams(&grade) {
                let week = stream_weekly_view(&generated, &catalog, &grade, stream);
                print!("{}", render::stream_week(&format!("{stream} ({grade})"), &week));
            }
        }

        Command::CheckConstraints { section, file } => {
            let text = state::read_text(&file)?;
            let mut editor = ConstraintsEditor::new(section, serde_json::Map::new());
            if let Err(notice) = editor.apply_text(&text) {
                bail!("{notice}");
            }
            println!("{}", editor.text());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config(&cfg)?,
        },
    }

    Ok(())
}

/// The period catalog from `--periods`, or the API with the default as fallback.
async fn load_catalog(source: &Source, client: &ApiClient) -> Result<PeriodCatalog> {
    if let Some(p) = &source.periods {
        return parse_periods_json(&state::read_text(p)?)
            .with_context(|| format!("parse periods from {}", p.display()));
    }
    if source.is_offline() {
        return Ok(timetable_core::default_catalog());
    }
    Ok(catalog_or_default(client.try_period_catalog().await))
}
