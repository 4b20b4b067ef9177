//! ToS Sentinel CLI
//!
//! Sends a URL and user intent to the analysis backend, streams progress
//! while the backend crawls and analyzes, then renders the risk report with
//! every confirmed quote anchored into the scraped text.

use anyhow::{anyhow, Result};
use clap::Parser;
use sentinel_client::{BackendClient, DEFAULT_BACKEND_URL};
use sentinel_protocol::AnalyzeRequest;
use std::path::PathBuf;

mod html;
mod progress;
mod render;

use progress::StderrStatus;

#[derive(Parser, Debug)]
#[command(
    name = "tos-sentinel",
    version,
    about = "AI-powered risk auditor for terms-of-service documents"
)]
struct Args {
    /// Target URL of the terms-of-service page
    #[arg(required_unless_present = "list_models")]
    url: Option<String>,

    /// What you intend to do under these terms (guides the analysis)
    #[arg(long)]
    intent: Option<String>,

    /// Model to use; defaults to the backend's first advertised model
    #[arg(long)]
    model: Option<String>,

    /// Disable deep multi-page RAG on the backend
    #[arg(long)]
    no_rag: bool,

    /// Backend base URL (overrides SENTINEL_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Write an HTML report to this path
    #[arg(long, value_name = "PATH")]
    html: Option<PathBuf>,

    /// Dump the full result payload as JSON after the report
    #[arg(long)]
    debug: bool,

    /// List available models and exit
    #[arg(long)]
    list_models: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let base_url = args
        .backend_url
        .clone()
        .or_else(|| std::env::var("SENTINEL_BACKEND_URL").ok())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
    let client = BackendClient::new(&base_url)?;
    log::info!("backend: {}", client.base_url());

    if args.list_models {
        for model in client.fetch_models().await {
            println!("{model}");
        }
        return Ok(());
    }

    let url = args.url.ok_or_else(|| anyhow!("a target URL is required"))?;
    let model_name = match args.model {
        Some(model) => model,
        // fetch_models guarantees at least one entry.
        None => client.fetch_models().await.swap_remove(0),
    };

    let request = AnalyzeRequest {
        url,
        intent: args.intent.filter(|text| !text.trim().is_empty()),
        model_name,
        enable_rag: !args.no_rag,
    };

    let mut status = StderrStatus::new();
    let payload = match client.analyze(&request, &mut status).await {
        Ok(payload) => {
            status.clear();
            payload
        }
        Err(err) => {
            // The progress slot is replaced by a single error message.
            status.clear();
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let outcome = sentinel_anchor::anchor(&payload.scraped_content, &payload.result.risks);
    print!("{}", render::render_report(&payload, &outcome));

    if args.debug {
        println!("\nDebug payload\n-------------");
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    if let Some(path) = args.html {
        std::fs::write(&path, html::render_html(&payload, &outcome))?;
        eprintln!("HTML report written to {}", path.display());
    }

    Ok(())
}
