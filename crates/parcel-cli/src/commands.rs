use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use parcel_gateway::{ContentSource, GatewayResolver, RetryBudget, ShapeCheck};
use parcel_graph::{metadata_check, object_check};
use parcel_ingest::{EventOutcome, Pipeline};
use parcel_store::{EntityType, InMemoryRecordStore, JsonDirRecordStore, RecordStore};
use parcel_types::{ContentId, SubmissionEvent};
use serde_json::json;

use crate::cli::*;
use crate::config::IndexerConfig;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = IndexerConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Cid(args) => cmd_cid(args, cli.format),
        Command::Gateways => cmd_gateways(&config, cli.format),
        Command::Resolve(args) => cmd_resolve(args, &config).await,
        Command::Ingest(args) => cmd_ingest(args, &config, cli.format).await,
        Command::Show(args) => cmd_show(args, &config),
    }
}

fn cmd_cid(args: CidArgs, format: OutputFormat) -> anyhow::Result<()> {
    let cid = ContentId::from_hash_hex(&args.hash).context("deriving CID")?;
    match format {
        OutputFormat::Text => println!("{cid}"),
        OutputFormat::Json => println!("{}", json!({ "hash": args.hash, "cid": cid })),
    }
    Ok(())
}

fn cmd_gateways(config: &IndexerConfig, format: OutputFormat) -> anyhow::Result<()> {
    let endpoints = config.gateway.endpoints();
    match format {
        OutputFormat::Text => {
            for (i, endpoint) in endpoints.iter().enumerate() {
                println!("{:>2}. {}", i + 1, endpoint.to_string().cyan());
            }
            println!(
                "Inter-pass delay {} ms, metadata cap {} pass(es), content cap {} pass(es)",
                config.gateway.inter_pass_delay_ms,
                config.gateway.metadata_max_passes,
                config.gateway.content_max_passes
            );
        }
        OutputFormat::Json => {
            let list: Vec<String> = endpoints.iter().map(ToString::to_string).collect();
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
    }
    Ok(())
}

async fn cmd_resolve(args: ResolveArgs, config: &IndexerConfig) -> anyhow::Result<()> {
    let cid = ContentId::parse(&args.cid)?;
    let cache = Arc::new(config.gateway.fetch_cache());
    let resolver = GatewayResolver::from_config(&config.gateway, cache)?;
    let check: ShapeCheck = if args.metadata { metadata_check } else { object_check };
    let payload = resolver
        .resolve(&cid, check, RetryBudget::Metadata)
        .await
        .with_context(|| format!("resolving {cid}"))?;
    println!("{}", serde_json::to_string_pretty(payload.as_ref())?);
    Ok(())
}

async fn cmd_ingest(
    args: IngestArgs,
    config: &IndexerConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.events)
        .with_context(|| format!("reading {}", args.events.display()))?;
    let events = parse_events(&text)?;
    let store = open_store(args.store_dir.as_deref().or(config.store.dir.as_deref()))?;
    let pipeline = Pipeline::from_config(
        config.gate.clone(),
        &config.gateway,
        Arc::new(config.gateway.fetch_cache()),
    )?;

    let mut summary = Summary::default();
    for (i, event) in events.iter().enumerate() {
        let result = pipeline.process(event, store.as_ref()).await;
        summary.record(&result);
        match format {
            OutputFormat::Text => print_outcome_text(i, event, &result),
            OutputFormat::Json => {
                let line = match &result {
                    Ok(outcome) => json!({ "event": i, "result": outcome }),
                    Err(e) => json!({ "event": i, "error": e.to_string() }),
                };
                println!("{line}");
            }
        }
    }

    if format == OutputFormat::Text {
        println!(
            "\n{} event(s): {} materialized, {} dropped, {} rejected, {} failed",
            events.len(),
            summary.materialized.to_string().green(),
            summary.dropped,
            summary.rejected.to_string().yellow(),
            summary.failed.to_string().red()
        );
    }
    if summary.failed > 0 {
        bail!("{} event(s) failed", summary.failed);
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, config: &IndexerConfig) -> anyhow::Result<()> {
    let entity: EntityType = args.entity.parse().map_err(anyhow::Error::msg)?;
    let Some(dir) = args.store_dir.as_deref().or(config.store.dir.as_deref()) else {
        bail!("no record store: pass --store-dir or set [store] dir");
    };
    let store = JsonDirRecordStore::open(dir)?;
    match store.get(entity, &args.id)? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record.body)?),
        None => bail!("{entity} {} not found", args.id),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a JSON array of events, or one event per non-blank line.
pub fn parse_events(text: &str) -> anyhow::Result<Vec<SubmissionEvent>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("parsing event array");
    }
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("parsing event on line {}", n + 1))
        })
        .collect()
}

fn open_store(dir: Option<&Path>) -> anyhow::Result<Box<dyn RecordStore>> {
    Ok(match dir {
        Some(dir) => Box::new(
            JsonDirRecordStore::open(dir)
                .with_context(|| format!("opening record store {}", dir.display()))?,
        ),
        None => Box::new(InMemoryRecordStore::new()),
    })
}

fn print_outcome_text(
    index: usize,
    event: &SubmissionEvent,
    result: &parcel_ingest::IngestResult<EventOutcome>,
) {
    let prefix = format!("[{index}] {}", event.property_hash).dimmed();
    match result {
        Ok(outcome @ EventOutcome::Materialized(report)) => {
            let mark = if report.is_complete() { "✓".green() } else { "~".yellow() };
            println!("{prefix} {mark} {outcome}");
        }
        Ok(outcome @ EventOutcome::Dropped { .. }) => println!("{prefix} - {outcome}"),
        Ok(outcome @ EventOutcome::Rejected { .. }) => {
            println!("{prefix} {} {outcome}", "✗".yellow())
        }
        Err(e) => println!("{prefix} {} {}", "✗".red().bold(), e.to_string().red()),
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    materialized: usize,
    dropped: usize,
    rejected: usize,
    failed: usize,
}

impl Summary {
    fn record(&mut self, result: &parcel_ingest::IngestResult<EventOutcome>) {
        match result {
            Ok(EventOutcome::Materialized(_)) => self.materialized += 1,
            Ok(EventOutcome::Dropped { .. }) => self.dropped += 1,
            Ok(EventOutcome::Rejected { .. }) => self.rejected += 1,
            Err(_) => self.failed += 1,
        }
    }
}
