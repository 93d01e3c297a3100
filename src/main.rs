//! `remora` CLI - Fingerprint and fetch URLs through the render API

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use remora::{
    Config, Fingerprinter, PageResponse, RenderClient, Request, META_RENDER, META_RENDER_AUTOMAP,
};

#[derive(Parser)]
#[command(name = "remora")]
#[command(about = "Remote rendering API client layer for web crawlers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the identity token a request would get
    Fingerprint {
        /// URL to fingerprint
        url: String,

        /// Raw render-API parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,

        /// Derive parameters from the request's ordinary fields
        #[arg(short, long)]
        automap: bool,

        /// Treat requests without intent as minimal render-API calls
        #[arg(short, long)]
        transparent: bool,
    },

    /// Fetch a URL through the render API and display the result
    Fetch {
        /// URL to fetch
        url: String,

        /// Raw render-API parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,

        /// Request browser-rendered HTML instead of the raw body
        #[arg(short, long)]
        browser: bool,

        /// Show response headers
        #[arg(short = 'H', long)]
        headers: bool,

        /// Show full body (not just length)
        #[arg(long)]
        body: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fingerprint {
            url,
            params,
            automap,
            transparent,
        } => {
            cmd_fingerprint(&url, params.as_deref(), automap, transparent)?;
        }
        Commands::Fetch {
            url,
            params,
            browser,
            headers,
            body,
        } => {
            cmd_fetch(&url, params.as_deref(), browser, headers, body).await?;
        }
    }

    Ok(())
}

/// Parse a `--params` argument into a JSON object value.
fn parse_params(params: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(params).context("--params is not valid JSON")?;
    if !value.is_object() {
        return Err(anyhow!("--params must be a JSON object"));
    }
    Ok(value)
}

fn build_request(url: &str, params: Option<&str>, automap: bool, browser: bool) -> Result<Request> {
    let mut request = Request::new(url);
    if let Some(params) = params {
        request = request.with_meta(META_RENDER, parse_params(params)?);
    } else if browser {
        request = request.with_meta(META_RENDER, serde_json::json!({"browserHtml": true}));
    } else if automap {
        request = request.with_meta(META_RENDER_AUTOMAP, true);
    }
    Ok(request)
}

fn cmd_fingerprint(url: &str, params: Option<&str>, automap: bool, transparent: bool) -> Result<()> {
    let config = Config {
        transparent_mode: transparent,
        ..Config::from_env()
    };
    let request = build_request(url, params, automap, false)?;
    let fingerprinter = Fingerprinter::new(&config);
    let token = fingerprinter.fingerprint(&request)?;
    println!("{token}");
    Ok(())
}

async fn cmd_fetch(
    url: &str,
    params: Option<&str>,
    browser: bool,
    show_headers: bool,
    show_body: bool,
) -> Result<()> {
    let config = Config::from_env();
    let client = RenderClient::new(&config)?;

    // Without explicit parameters or browser mode, automap the request.
    let automap = params.is_none() && !browser;
    let request = build_request(url, params, automap, browser)?;

    println!("🌐 Fetching via render API: {url}");
    let response = client
        .fetch(&request)
        .await?
        .ok_or_else(|| anyhow!("request declares no render API intent"))?;
    print_response(&response, show_headers, show_body);
    Ok(())
}

fn print_response(response: &PageResponse, show_headers: bool, show_body: bool) {
    println!("📊 Response:");
    println!("   Status: {}", response.status());
    println!(
        "   Body: {} bytes ({})",
        response.body().len(),
        if response.is_text() { "text" } else { "binary" }
    );

    if show_headers {
        println!("   Headers:");
        for (name, value) in response.headers() {
            println!("     {name}: {value}");
        }
    }

    if show_body {
        match response.text() {
            Some(text) => println!("{text}"),
            None => println!("   (binary body, {} bytes)", response.body().len()),
        }
    }
}
