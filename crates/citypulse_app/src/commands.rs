use std::path::Path;

use anyhow::{Context, Result};
use citypulse_engine::{
    export_points, EnrichmentLoop, Enrichment, EntityExtraction, GeoNamesClient, Geocoding,
    HarvestLoop, HarvestSettings, JsonClient, ProcessRecognizer, PushshiftSource, Store,
    Summaries, WikipediaClient,
};
use citypulse_logging::{pulse_info, pulse_warn};
use tokio_util::sync::CancellationToken;

use crate::cli::{Cli, Command};
use crate::config::{Environment, GEONAMES_USERNAME};
use crate::progress::BarProgress;

pub async fn run(cli: Cli, env: &Environment, cancel: CancellationToken) -> Result<()> {
    let store = Store::open(&cli.db)
        .with_context(|| format!("opening store {}", cli.db.display()))?;

    match cli.command {
        Command::Comments { size } => harvest_comments(&store, env, size, cancel).await,
        Command::Ner {
            model,
            model_description,
        } => extract_entities(&store, env, model, model_description, cancel).await,
        Command::Geocode => geocode(&store, env, cancel).await,
        Command::Cities => rebuild_cities(&store),
        Command::Summaries => summaries(&store, env, cancel).await,
        Command::Points { out } => points(&store, &out),
    }
}

async fn harvest_comments(
    store: &Store,
    env: &Environment,
    size: usize,
    cancel: CancellationToken,
) -> Result<()> {
    let client = JsonClient::new(&env.http_settings())?;
    let source = PushshiftSource::new(client, env.pushshift_url()?, env.subreddit());
    let settings = HarvestSettings {
        page_size: size,
        ..HarvestSettings::default()
    };
    let progress = BarProgress::new();

    let report = HarvestLoop::new(&source, store, settings)
        .with_progress(&progress)
        .with_cancellation(cancel)
        .run()
        .await
        .context("harvesting comments")?;

    pulse_info!(
        "{} new comments in {} requests ({} expected), {} pages already stored",
        report.stats.inserted,
        report.iterations,
        report.expected_calls.unwrap_or(0),
        report.stats.all_known_batches
    );
    Ok(())
}

async fn extract_entities(
    store: &Store,
    env: &Environment,
    model: String,
    description: Option<String>,
    cancel: CancellationToken,
) -> Result<()> {
    let command = env.ner_command(&model)?;
    let recognizer = ProcessRecognizer::spawn(&command)
        .with_context(|| format!("starting recognizer {:?}", command.join(" ")))?;
    let mut task = EntityExtraction::new(recognizer, model);
    if let Some(description) = description {
        task = task.with_description(description);
    }
    enrich(store, &mut task, cancel).await
}

async fn geocode(store: &Store, env: &Environment, cancel: CancellationToken) -> Result<()> {
    let username = env.require(GEONAMES_USERNAME)?;
    let client = JsonClient::new(&env.http_settings())?;
    let geocoder = GeoNamesClient::new(client, env.geonames_url()?, username);
    enrich(store, &mut Geocoding::new(geocoder), cancel).await
}

async fn summaries(store: &Store, env: &Environment, cancel: CancellationToken) -> Result<()> {
    let client = JsonClient::new(&env.identified_http_settings()?)?;
    let lookup = WikipediaClient::new(client, env.wikipedia_url()?);
    enrich(store, &mut Summaries::new(lookup), cancel).await
}

async fn enrich<T: Enrichment>(
    store: &Store,
    task: &mut T,
    cancel: CancellationToken,
) -> Result<()> {
    let progress = BarProgress::new();
    let report = EnrichmentLoop::new(store)
        .with_progress(&progress)
        .with_cancellation(cancel)
        .run(task)
        .await
        .with_context(|| format!("running {}", task.label()))?;

    if report.interrupted {
        pulse_warn!(
            "{} interrupted; {} of {} items left for the next run",
            report.task,
            report.stats.frontier - report.stats.processed,
            report.stats.frontier
        );
    }
    Ok(())
}

fn rebuild_cities(store: &Store) -> Result<()> {
    let changed = store.rebuild_cities().context("rebuilding cities")?;
    pulse_info!("{changed} cities updated");
    Ok(())
}

fn points(store: &Store, out: &Path) -> Result<()> {
    let summary = export_points(store, out).context("exporting points")?;
    pulse_info!(
        "Wrote {} points to {}",
        summary.points,
        summary.output_path.display()
    );
    Ok(())
}
