mod cli;
mod config;
mod http;
mod jobs;
mod loader;
mod query_cache;
mod state;
mod wiring;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Mode};
use crate::config::ConfigError;
use crate::http::HttpError;
use crate::jobs::JobError;
use crate::state::AppState;
use crate::wiring::WiringError;
use threadview_core::error::CoreError;
use threadview_core::pipeline::{PipelineConfig, PipelineOptions};
use threadview_core::types::depth::MaxDepth;
use threadview_core::types::permalink::Permalink;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid cli: {0}")]
    InvalidCli(String),
    #[error("invalid input: {0}")]
    Core(#[from] CoreError),
    #[error("wiring error: {0}")]
    Wiring(#[from] WiringError),
    #[error("http error: {0}")]
    Http(#[from] HttpError),
    #[error("job error: {0}")]
    Jobs(#[from] JobError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    config::load_dotenv()?;
    let config = config::AppConfig::from_env()?;
    let state = wiring::build_state(config)?;

    match cli.mode {
        Mode::Print => print_comments(&state, &cli).await,
        Mode::Api => serve(state).await,
    }
}

async fn print_comments(state: &AppState, cli: &Cli) -> Result<(), AppError> {
    let Some(raw) = cli.permalink.as_deref() else {
        return Err(AppError::InvalidCli(
            "print mode requires --permalink".to_string(),
        ));
    };
    if cli.pages == 0 {
        return Err(AppError::InvalidCli("--pages must be at least 1".to_string()));
    }
    let max_depth = match cli.max_depth {
        Some(depth) => MaxDepth::try_from(depth)?,
        None => state.config.max_comment_depth,
    };
    let options = PipelineOptions::new(
        Permalink::try_from(raw)?,
        PipelineConfig::default()
            .nested(cli.nested)
            .infinite(cli.infinite)
            .with_max_depth(max_depth),
    );

    let mut view = state.loader.load(&options).await;
    for _ in 1..cli.pages {
        if !view.has_next_page {
            break;
        }
        view = state.loader.load_more(&options).await;
    }
    info!(
        permalink = %options.permalink,
        comments = view.display_comments.len(),
        has_next_page = view.has_next_page,
        "comments loaded"
    );
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

async fn serve(state: AppState) -> Result<(), AppError> {
    let addr = state.config.http_addr;
    let http_state = state.clone();
    let api = tokio::spawn(async move {
        info!(%addr, "http server starting");
        http::serve(addr, http_state).await
    });

    let worker = if state.config.cache_sweep_interval.is_zero() {
        info!("cache sweep disabled");
        None
    } else {
        let worker_state = state.clone();
        Some(tokio::spawn(async move {
            info!("cache sweeper starting");
            jobs::start(worker_state).await
        }))
    };

    let shutdown = shutdown_signal();
    match worker {
        Some(worker) => {
            tokio::select! {
                _ = shutdown => {
                    info!("shutdown signal received");
                }
                res = api => {
                    res??;
                }
                res = worker => {
                    res??;
                }
            }
        }
        None => {
            tokio::select! {
                _ = shutdown => {
                    info!("shutdown signal received");
                }
                res = api => {
                    res??;
                }
            }
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install ctrl-c handler");
    }
}
