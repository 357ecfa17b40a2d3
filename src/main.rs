//! CLI entry point for the bike-share statistics explorer.
//!
//! `explore` (the default) runs the interactive session: pick a city and a
//! time filter, read the reports, page through raw trips, restart. `report`
//! runs the same pipeline once from command-line arguments.

use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use bikeshare_stats::config::Config;
use bikeshare_stats::filter::FilterSpec;
use bikeshare_stats::loader::MalformedPolicy;
use bikeshare_stats::output::{CsvSummarySink, JsonSink, ReportSink, TextSink, print_pretty, render_page};
use bikeshare_stats::paging::Pager;
use bikeshare_stats::pipeline::Pipeline;
use bikeshare_stats::prompt::Prompter;
use bikeshare_stats::record::RecordSet;
use bikeshare_stats::source::{CsvRecordSource, RecordSource};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bike-share trip data", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Drop unparseable rows instead of aborting the load
    #[arg(long, global = true)]
    skip_malformed: bool,

    /// Trips shown per page when browsing raw data
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    page_size: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Explore,
    /// Compute the reports once and exit
    Report {
        /// Chicago, New York City or Washington
        #[arg(long)]
        city: String,

        /// none, month, day or both
        #[arg(long, default_value = "none")]
        mode: String,

        /// all, or january through june
        #[arg(long, default_value = "all")]
        month: String,

        /// all, or monday through sunday
        #[arg(long, default_value = "all")]
        day: String,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append a summary row to
        #[arg(short, long)]
        append: Option<String>,
    },
}

impl Commands {
    /// Default stderr level. The interactive session keeps stderr to warnings
    /// so log lines do not land between prompts.
    fn stderr_level(command: Option<&Commands>) -> &'static str {
        match command {
            Some(Commands::Report { .. }) => "info",
            Some(Commands::Explore) | None => "warn",
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_level = Commands::stderr_level(cli.command.as_ref());
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(stderr_level.parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let mut config = Config::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if cli.skip_malformed {
        config.malformed_policy = MalformedPolicy::Skip;
    }
    if let Some(size) = cli.page_size {
        config.page_size = usize::from(size);
    }
    info!(data_dir = %config.data_dir.display(), policy = ?config.malformed_policy, "Configuration loaded");

    let pipeline = Pipeline::new(
        CsvRecordSource::new(&config.data_dir),
        config.malformed_policy,
    );

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => explore(&pipeline, config.page_size)?,
        Commands::Report {
            city,
            mode,
            month,
            day,
            json,
            append,
        } => {
            let spec = FilterSpec::resolve(&city, &mode, &month, &day)?;
            let out = pipeline.run(&spec)?;
            print_pretty(&out.report);

            if json {
                JsonSink(io::stdout()).emit(&out.report)?;
            } else {
                TextSink(io::stdout()).emit(&out.report)?;
            }
            if let Some(path) = append {
                CsvSummarySink { path }.emit(&out.report)?;
            }
        }
    }

    Ok(())
}

/// Prompts for filters and prints reports until the user declines to restart.
#[tracing::instrument(level = "debug", skip(pipeline))]
fn explore<S: RecordSource>(pipeline: &Pipeline<S>, page_size: usize) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    loop {
        let Some(spec) = prompter.choose_filters()? else {
            info!("Input closed, ending session");
            break;
        };

        match pipeline.run(&spec) {
            Ok(out) => {
                TextSink(io::stdout()).emit(&out.report)?;
                browse(&mut prompter, &out.filtered, page_size)?;
            }
            Err(e) => {
                error!(error = %e, "Report failed");
                prompter.say(&format!("\nCould not build the report: {e}\n"))?;
            }
        }

        if !prompter.restart()? {
            break;
        }
    }

    Ok(())
}

/// Offers the filtered trips one page at a time.
fn browse<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    set: &RecordSet,
    page_size: usize,
) -> Result<()> {
    if prompter.confirm("Do you want to view individual data? y/n")? != Some(true) {
        prompter.say("Come back whenever you need!\n")?;
        return Ok(());
    }

    let pages = Pager::new(set, page_size);
    let page_count = pages.page_count();
    let mut pages = pages.enumerate();
    loop {
        match pages.next() {
            Some((i, page)) => {
                prompter.say(&format!("Page {} of {page_count}\n", i + 1))?;
                prompter.say(&render_page(page)?)?;
            }
            None => {
                prompter.say("No more trips to show.\n")?;
                break;
            }
        }
        if prompter.confirm("Do you want to view more individual data? y/n")? != Some(true) {
            break;
        }
    }

    Ok(())
}
