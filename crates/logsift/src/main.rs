mod output;
mod query_server;
mod telemetry;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use logsift_core::config::Config;
use logsift_core::filter::LogFilter;
use logsift_core::query::{LevelQuery, RangeQuery, TemplateQuery};
use logsift_engine::query::render_envelope;
use logsift_engine::{LogEngine, LogLoader};

use crate::output::{print_envelope_human, print_status_human};
use crate::telemetry::{LogFormat, init_cli_tracing, init_server_tracing};

#[derive(Parser, Debug)]
#[command(name = "logsift")]
#[command(about = "Query a directory of structured JSON logs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Directory containing the log files")]
    log_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Only read files whose name matches this glob")]
    file_pattern: Option<String>,

    #[arg(long, global = true, help = "Print one line per record instead of JSON")]
    human: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Serve the filter-logs HTTP API")]
    Serve {
        #[arg(long)]
        http_addr: Option<String>,
    },
    #[command(about = "Records with exactly this level (all records if omitted)")]
    Level { level: Option<String> },
    #[command(about = "Records with start <= timestamp <= end")]
    Range { start: String, end: String },
    #[command(about = "Records whose message template contains MESSAGE")]
    Template { message: String },
    #[command(about = "Summarise the log directory")]
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load().context("load config")?;
    if let Some(v) = cli.log_dir {
        cfg.log_dir = v;
    }
    if let Some(v) = cli.file_pattern {
        cfg.file_pattern = Some(v);
    }

    match cli.command {
        Commands::Serve { http_addr } => {
            init_server_tracing(LogFormat::from_env());
            if let Some(v) = http_addr {
                cfg.http_addr = v;
            }
            run_server(cfg).await
        }
        Commands::Level { level } => {
            init_cli_tracing();
            run_query(&cfg, LevelQuery { level }.into(), cli.human)
        }
        Commands::Range { start, end } => {
            init_cli_tracing();
            let q = RangeQuery::parse(Some(&start), Some(&end))?;
            run_query(&cfg, q.into(), cli.human)
        }
        Commands::Template { message } => {
            init_cli_tracing();
            run_query(&cfg, TemplateQuery { message }.into(), cli.human)
        }
        Commands::Status => {
            init_cli_tracing();
            let status = build_engine(&cfg)?.status()?;
            if cli.human {
                print_status_human(&status);
            } else {
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
            Ok(())
        }
    }
}

fn build_engine(cfg: &Config) -> anyhow::Result<LogEngine> {
    Ok(LogEngine::new(
        LogLoader::new(cfg.log_dir.clone()).with_file_pattern(cfg.file_pattern()?),
    ))
}

fn run_query(cfg: &Config, filter: LogFilter, human: bool) -> anyhow::Result<()> {
    let envelope = build_engine(cfg)?
        .query(&filter)
        .with_context(|| format!("query {}", cfg.log_dir.display()))?;
    if human {
        print_envelope_human(&envelope);
    } else {
        println!("{}", render_envelope(&envelope)?);
    }
    Ok(())
}

async fn run_server(cfg: Config) -> anyhow::Result<()> {
    let engine = build_engine(&cfg)?;
    let addr = cfg
        .http_addr
        .parse()
        .with_context(|| format!("invalid http addr {}", cfg.http_addr))?;

    eprintln!("logsift serve");
    eprintln!("  log dir: {}", cfg.log_dir.display());
    if let Some(pattern) = &cfg.file_pattern {
        eprintln!("  file pattern: {pattern}");
    }
    eprintln!("  query http: {}", cfg.http_addr);

    let server = tokio::spawn(query_server::run_query_http_server(engine, addr));

    tokio::select! {
        res = server => {
            res??;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl-c, shutting down");
        }
    }
    Ok(())
}
