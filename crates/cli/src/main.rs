use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::render;
use jobmatch_core::config;
use jobmatch_core::config::AppConfig;
use jobmatch_core::export;
use jobmatch_core::models::{JobType, SearchQuery};
use jobmatch_core::pipeline;
use std::path::PathBuf;
use tracing::info;

const DEFAULT_TITLE: &str = "Entry-level Software Developer";
const DEFAULT_LOCATION: &str = "United States";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { resume, json } => run_parse(resume, json),
        Commands::Search { search, json } => run_search(cfg, search.query(), json).await,
        Commands::Match {
            resume,
            search,
            top,
            csv,
            json_out,
            json,
        } => run_match(cfg, resume, search.query(), top, csv, json_out, json).await,
    }
}

#[derive(Parser)]
#[command(name = "jobmatch")]
#[command(about = "Match a résumé against job listings", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Job title to search for
    #[arg(short = 'q', long, default_value = DEFAULT_TITLE)]
    title: String,
    /// Location to search in
    #[arg(short, long, default_value = DEFAULT_LOCATION)]
    location: String,
    /// Job type: full_time|part_time|internship|any
    #[arg(long, default_value = "any")]
    job_type: JobType,
    /// Only keep listings posted within this many days
    #[arg(long)]
    days: Option<u32>,
}

impl SearchArgs {
    fn query(&self) -> SearchQuery {
        SearchQuery::new(&self.title, &self.location, self.job_type).with_max_age_days(self.days)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a structured profile from a résumé (PDF or text)
    Parse {
        resume: PathBuf,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Collect job listings for a search
    Search {
        #[command(flatten)]
        search: SearchArgs,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank job listings against a résumé
    Match {
        resume: PathBuf,
        #[command(flatten)]
        search: SearchArgs,
        /// Number of matches to keep
        #[arg(short = 'm', long, default_value_t = 5)]
        top: usize,
        /// Export the kept matches as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Save the kept matches as JSON
        #[arg(long)]
        json_out: Option<PathBuf>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn run_parse(resume: PathBuf, json: bool) -> Result<()> {
    let profile = pipeline::parse_resume(&resume)
        .with_context(|| format!("could not read résumé {}", resume.display()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print!("{}", render::profile(&profile));
    }
    Ok(())
}

async fn run_search(cfg: AppConfig, query: SearchQuery, json: bool) -> Result<()> {
    let registry = pipeline::build_registry(&cfg);
    let cache = pipeline::open_cache(&cfg).await?;
    let listings = pipeline::search(&cfg, &registry, cache.as_ref(), &query)
        .await
        .context("search failed, you can retry")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
    } else {
        print!("{}", render::listings(&listings));
    }
    Ok(())
}

async fn run_match(
    cfg: AppConfig,
    resume: PathBuf,
    query: SearchQuery,
    top: usize,
    csv: Option<PathBuf>,
    json_out: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let summary = pipeline::run(&cfg, &resume, &query, top)
        .await
        .context("match run failed")?;

    if let Some(path) = &csv {
        let file = std::fs::File::create(path)
            .with_context(|| format!("create {}", path.display()))?;
        export::write_csv(&summary.matches, file)?;
        info!(path = %path.display(), rows = summary.matches.len(), "Exported CSV.");
    }
    if let Some(path) = &json_out {
        let file = std::fs::File::create(path)
            .with_context(|| format!("create {}", path.display()))?;
        export::write_json(&summary.matches, file)?;
        info!(path = %path.display(), rows = summary.matches.len(), "Saved JSON.");
    }

    if json {
        let out = serde_json::json!({
            "status": "ok",
            "profile": summary.profile,
            "collected": summary.collected,
            "matches": summary.matches,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "collected {} listings, showing top {}",
            summary.collected,
            summary.matches.len()
        );
        print!("{}", render::matches(&summary.matches));
    }
    Ok(())
}
