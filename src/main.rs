/// Version injected at compile time via OCINFO_VERSION env var (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("OCINFO_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::tty::IsTty;
use ocinfo::config::Config;
use ocinfo::inventory::{Category, Inventory, NameFilter, ReportOptions, Selection};
use ocinfo::oci::{self, auth::OciProfile, client::OciClient, http::format_oci_error};
use ocinfo::report::render::{render_report, OutputFormat, RenderOptions};
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Read-only inventory report for an OCI tenancy
#[derive(Parser, Debug)]
#[command(name = "ocinfo", version = VERSION, about, long_about = None)]
struct Args {
    /// Report compute instances
    #[arg(short, long)]
    instances: bool,

    /// Report load balancers and their backends
    #[arg(short = 'l', long)]
    load_balancers: bool,

    /// Report network security group ingress rules
    #[arg(short = 's', long)]
    security_groups: bool,

    /// Report boot and block volumes
    #[arg(short, long)]
    volumes: bool,

    /// Report object storage buckets
    #[arg(short, long)]
    buckets: bool,

    /// Only resources whose name contains this (case-insensitive)
    #[arg(short, long)]
    name: Option<String>,

    /// Only compartments whose name contains this (case-insensitive)
    #[arg(short, long)]
    compartment: Option<String>,

    /// Profile in the OCI config file
    #[arg(long)]
    profile: Option<String>,

    /// OCI config file
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Region overriding the profile's
    #[arg(long)]
    region: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colours in table output
    #[arg(long)]
    no_color: bool,

    /// Compartments fetched in parallel per category
    #[arg(long)]
    concurrency: Option<usize>,

    /// Store the effective profile, config file, region, concurrency and
    /// output format as defaults
    #[arg(long)]
    save_defaults: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

impl Args {
    fn selection(&self) -> Selection {
        let flags = [
            (self.instances, Category::Instances),
            (self.load_balancers, Category::LoadBalancers),
            (self.security_groups, Category::SecurityGroups),
            (self.volumes, Category::Volumes),
            (self.buckets, Category::Buckets),
        ];
        Selection::from_categories(
            flags
                .into_iter()
                .filter_map(|(set, category)| set.then_some(category)),
        )
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("[WARN] Logging disabled, cannot open {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("ocinfo {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ocinfo").join("ocinfo.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ocinfo").join("ocinfo.log");
    }
    PathBuf::from("ocinfo.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let config = Config::load();
    let profile_name = config.effective_profile(args.profile.as_deref());
    let config_file = config.effective_config_file(args.config_file.as_deref());
    let region = config.effective_region(args.region.as_deref());
    let concurrency = config.effective_concurrency(args.concurrency);
    let format = config.effective_output(args.output);

    if args.save_defaults {
        let saved = Config {
            profile: Some(profile_name.clone()),
            config_file: Some(config_file.display().to_string()),
            region: region.clone(),
            concurrency: Some(concurrency),
            output: Some(format),
        };
        let path = saved.save()?;
        eprintln!("Saved defaults to {}", path.display());
    }

    let mut profile = OciProfile::load(&config_file, &profile_name)
        .with_context(|| format!("Failed to load OCI profile {}", profile_name))?;
    if let Some(region) = region {
        profile.region = region;
    }

    tracing::info!(
        "Using profile: {}, region: {}, concurrency: {}",
        profile_name,
        profile.region,
        concurrency
    );

    let client = OciClient::new(&profile).context("Failed to initialize OCI client")?;
    let inventory = Inventory::new(oci::fetchers(&client), &client.tenancy_id, concurrency);

    let options = ReportOptions {
        selection: args.selection(),
        name_filter: NameFilter::new(args.name.as_deref()),
        scope_filter: NameFilter::new(args.compartment.as_deref()),
    };

    let report = match inventory.collect(&options).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("{}: {:#}", err, err.provider_error());
            return Err(anyhow::anyhow!(
                "{}: {}",
                err,
                format_oci_error(err.provider_error())
            ));
        }
    };

    for warning in &report.warnings {
        eprintln!("[WARN] {}", warning);
    }

    let stdout = io::stdout();
    let color = !args.no_color && stdout.is_tty();
    let render_options = RenderOptions { format, color };
    render_report(&report, &mut stdout.lock(), &render_options)?;

    Ok(())
}
