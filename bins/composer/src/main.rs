//! Rostra command-line host.
//!
//! Loads a JSON snapshot of the source collections and runs one engine
//! operation against it:
//!
//! ```text
//! rostra compose <dataset.json> <request.json>
//! rostra next-id <dataset.json> <candidate.json>
//! ```
//!
//! Requests that omit `paper` or `margin` fall back to the configured defaults.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use rostra_core::composer::generate_detached;
use rostra_core::identifier::{IdentifierGenerator, IdentifierScope};
use rostra_core::options::ReportRequest;
use rostra_core::paper::{Margin, PaperSize};
use rostra_core::records::{SourceCollections, Student};
use rostra_shared::{AppError, AppResult, EngineConfig};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: rostra compose <dataset.json> <request.json>
       rostra next-id <dataset.json> <candidate.json>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "rostra=debug".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = EngineConfig::load().context("Failed to load configuration")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [command, dataset, request] if command == "compose" => {
            compose(&config, Path::new(dataset), Path::new(request)).await
        }
        [command, dataset, candidate] if command == "next-id" => {
            next_id(&config, Path::new(dataset), Path::new(candidate))
        }
        _ => bail!(USAGE),
    }
}

async fn compose(config: &EngineConfig, dataset: &Path, request: &Path) -> anyhow::Result<()> {
    let sources: SourceCollections = read_json(dataset)?;
    let request = read_request(config, request)?;

    info!(
        report_type = %request.report_type,
        students = sources.students.len(),
        "Composing report"
    );

    let document = engine(
        generate_detached(Arc::new(sources), config.institution.name.clone(), request).await,
    )?;

    for warning in &document.warnings {
        warn!(?warning, "Composition warning");
    }
    info!(
        pages = document.estimated_page_count,
        paper = document.paper.as_str(),
        "Composition finished"
    );

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn next_id(config: &EngineConfig, dataset: &Path, candidate: &Path) -> anyhow::Result<()> {
    let sources: SourceCollections = read_json(dataset)?;
    let candidate: Student = read_json(candidate)?;
    let scope = engine(IdentifierScope::from_settings(&config.numbering))?;

    let identifier = engine(IdentifierGenerator::generate(
        &sources.students,
        &candidate,
        &scope,
    ))?;
    println!("{identifier}");
    Ok(())
}

/// Reads a request, filling `paper` and `margin` from configuration when absent.
fn read_request(config: &EngineConfig, path: &Path) -> anyhow::Result<ReportRequest> {
    let paper = engine(PaperSize::parse(&config.paper.size))?;
    let margin = engine(Margin::parse(&config.paper.margin))?;

    let mut raw: serde_json::Value = read_json(path)?;
    let Some(fields) = raw.as_object_mut() else {
        bail!("{}: request must be a JSON object", path.display());
    };
    fields.entry("paper").or_insert_with(|| paper.as_str().into());
    fields.entry("margin").or_insert_with(|| margin.as_str().into());

    serde_json::from_value(raw)
        .with_context(|| format!("{}: invalid report request", path.display()))
}

/// Lifts an engine error into the host-facing umbrella and logs its code.
fn engine<T, E: Into<AppError>>(result: Result<T, E>) -> AppResult<T> {
    result.map_err(|e| {
        let err: AppError = e.into();
        error!(
            code = err.error_code(),
            blocking = err.is_blocking(),
            error = %err,
            "Engine rejected the request"
        );
        err
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{}: invalid JSON", path.display()))
}
