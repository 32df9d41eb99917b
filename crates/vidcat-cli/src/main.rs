//! vidcat: command-line catalog checker.
//!
//! Loads a catalog file (schema plus videos) into an in-memory store,
//! running every video through the same save pipeline the edit form uses.

mod catalog;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidcat_core::defaults::RECENT_LIMIT;
use vidcat_core::{
    int_to_duration, ListVideosRequest, SaveOutcome, Schema, SchemaRepository, VideoRepository,
};
use vidcat_db::Database;

use catalog::CatalogFile;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "vidcat")]
#[command(author, version, about = "Schema-driven video catalog checker")]
#[command(propagate_version = true)]
struct Cli {
    /// Catalog file (YAML or JSON); defaults to $VIDCAT_CATALOG
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every video in the catalog and report rejected ones
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show browsable property types and their vocabulary
    Browse,

    /// Show the newest videos
    Recent {
        /// Number of videos
        #[arg(short = 'n', long, default_value_t = RECENT_LIMIT)]
        count: usize,
    },

    /// List videos holding a property type or a descriptor value
    List {
        /// Property type name
        #[arg(short = 't', long = "type")]
        property_type: Option<String>,

        /// Descriptor value as TYPE=VALUE
        #[arg(short, long)]
        descriptor: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cfg = match CliConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&cfg);

    let cli = Cli::parse();
    match run(cli, cfg).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cfg: &CliConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vidcat=info,vidcat_db=info,vidcat_core=warn".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so reports on stdout stay parseable
    if cfg.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        if let Some(ansi) = cfg.log_ansi {
            layer = layer.with_ansi(ansi);
        }
        registry.with(layer).init();
    }
}

/// Outcome of loading one catalog video.
#[derive(Debug, serde::Serialize)]
struct CheckResult {
    title: String,
    saved: bool,
    errors: Vec<String>,
}

/// Load the catalog into a fresh store, returning the per-video results.
async fn load(path: &std::path::Path) -> anyhow::Result<(Database, Vec<CheckResult>)> {
    let catalog = CatalogFile::load(path)?;
    let schema = catalog
        .build_schema()
        .with_context(|| format!("building schema from {}", path.display()))?;
    let db = Database::new(schema.clone());

    let mut results = Vec::with_capacity(catalog.videos.len());
    for entry in &catalog.videos {
        let (video, form_errors) = entry
            .to_video(&schema)
            .with_context(|| format!("loading video {:?}", entry.title))?;

        let outcome = if form_errors.is_empty() {
            db.videos.insert(video).await?
        } else {
            let mut video = video;
            video.validate(&schema);
            video.errors.merge(form_errors);
            SaveOutcome::Rejected(video.errors)
        };

        let errors = outcome
            .errors()
            .map(|e| e.full_messages())
            .unwrap_or_default();
        results.push(CheckResult {
            title: entry.title.clone(),
            saved: outcome.is_saved(),
            errors,
        });
    }

    info!(
        catalog = %path.display(),
        videos = results.len(),
        rejected = results.iter().filter(|r| !r.saved).count(),
        "catalog loaded"
    );
    Ok((db, results))
}

async fn run(cli: Cli, cfg: CliConfig) -> anyhow::Result<bool> {
    let path = cli
        .catalog
        .or(cfg.catalog.clone())
        .context("no catalog given; pass --catalog or set VIDCAT_CATALOG")?;
    let (db, results) = load(&path).await?;

    match cli.command {
        Commands::Check { json } => cmd_check(&results, json),
        Commands::Browse => {
            let schema = db.schema.load().await?;
            cmd_browse(&schema)?;
            Ok(true)
        }
        Commands::Recent { count } => {
            for video in db.videos.recent(count).await? {
                println!(
                    "{}  {}  {}",
                    video.created_at.format("%Y-%m-%d %H:%M"),
                    video.duration.map(int_to_duration).unwrap_or_else(|| "--:--:--".to_string()),
                    video.title
                );
            }
            Ok(true)
        }
        Commands::List {
            property_type,
            descriptor,
            page,
        } => {
            let schema = db.schema.load().await?;
            let mut req = ListVideosRequest {
                limit: Some(cfg.page_size),
                offset: Some((page.max(1) - 1) * cfg.page_size),
                ..Default::default()
            };
            if let Some(name) = property_type {
                let pt = schema
                    .type_by_name(&name)
                    .with_context(|| format!("no property type named {:?}", name))?;
                req.property_type_id = Some(pt.id);
            }
            if let Some(pair) = descriptor {
                let (type_name, value) = pair
                    .split_once('=')
                    .with_context(|| format!("descriptor must be TYPE=VALUE, got {:?}", pair))?;
                let pt = schema
                    .type_by_name(type_name)
                    .with_context(|| format!("no property type named {:?}", type_name))?;
                let dv = schema
                    .vocabulary()
                    .resolve(pt.id, value)
                    .with_context(|| format!("{} has no value {:?}", type_name, value))?;
                req.descriptor_value_id = Some(dv.id);
            }

            let response = db.videos.list(req).await?;
            for video in &response.videos {
                println!("{}  {}", video.title, video.sentence);
            }
            println!("({} of {})", response.videos.len(), response.total);
            Ok(true)
        }
    }
}

fn cmd_check(results: &[CheckResult], json: bool) -> anyhow::Result<bool> {
    let all_saved = results.iter().all(|r| r.saved);
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(all_saved);
    }
    for result in results {
        if result.saved {
            println!("ok        {}", result.title);
        } else {
            warn!(title = %result.title, errors = result.errors.len(), "video rejected");
            println!("REJECTED  {}", result.title);
            for message in &result.errors {
                println!("          - {}", message);
            }
        }
    }
    Ok(all_saved)
}

fn cmd_browse(schema: &Schema) -> anyhow::Result<()> {
    let mut failure = None;
    schema.for_each_browsable(|pt| {
        if failure.is_some() {
            return;
        }
        let class = match schema.class_of(pt) {
            Ok(class) => class,
            Err(e) => {
                failure = Some(e);
                return;
            }
        };
        println!("{} ({}, {})", pt.name, class.name, class.range);
        if class.is_descriptor() {
            for dv in schema.vocabulary().values_for(pt.id) {
                println!("    {}", dv.value);
            }
        }
    });
    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
