mod config;
mod metrics;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{AppConfig, NameSource, OperationMode};
use extract::{Extractor, NameAuthority};
use index::{GazetteerIndex, GazetteerStemmer};
use ingest::FileReader;
use metrics::{PipelineMetrics, TimedOperation};
use query::{GeoResolver, MigrantMatcher, MigrantSearch, join_master};

#[derive(Parser)]
#[command(name = "origo")]
#[command(about = "Find migrants in Latin funerary inscriptions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the result tables
    Run(RunArgs),
    /// Decode scraped fragment lists into inscription records
    Decode(DecodeArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Inscriptions (.json array or .jsonl)
    #[arg(long)]
    inscriptions: PathBuf,

    /// Gazetteer places (.json array or .jsonl)
    #[arg(long)]
    gazetteer: PathBuf,

    /// Name authority (.txt, one per line, or .json)
    #[arg(long)]
    names: PathBuf,

    /// Output directory
    #[arg(long)]
    out: PathBuf,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep only measured origins beyond the strict threshold
    #[arg(long)]
    strict: bool,

    /// Override the distance threshold in km
    #[arg(long, value_name = "KM")]
    threshold_km: Option<f64>,

    /// Treat the name authority as annotated prosopographical entries
    #[arg(long)]
    annotated_names: bool,
}

#[derive(Args)]
struct DecodeArgs {
    /// JSON array of fragment lists
    #[arg(long)]
    fields: PathBuf,

    /// Output file
    #[arg(long)]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = build_config(&args).await?;
            init_logging(&config.log_level, cli.json_logs);
            run(&args, config).await
        }
        Commands::Decode(args) => {
            init_logging("info", cli.json_logs);
            decode(&args).await
        }
    }
}

fn init_logging(default_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// File values first, then command-line overrides.
async fn build_config(args: &RunArgs) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path).await?,
        None => AppConfig::default(),
    };

    if args.strict {
        let strict = AppConfig::strict();
        config.mode = OperationMode::Strict;
        config.resolver.require_distance = true;
        config.resolver.threshold_km = config.resolver.threshold_km.max(strict.resolver.threshold_km);
    }
    if let Some(km) = args.threshold_km {
        config.resolver.threshold_km = km;
    }
    if args.annotated_names {
        config.names = NameSource::Annotated;
    }
    Ok(config)
}

async fn run(args: &RunArgs, config: AppConfig) -> Result<()> {
    let metrics = PipelineMetrics::new();
    info!(mode = ?config.mode, threshold_km = config.resolver.threshold_km, "Starting pipeline");

    // Step 1: Load collaborator data; a missing lookup table aborts the run
    let timer = TimedOperation::start();
    let records = ingest::load_inscriptions(&args.inscriptions).await?;
    let gazetteer = ingest::load_gazetteer(&args.gazetteer).await?;
    let headwords = ingest::load_name_headwords(&args.names).await?;
    metrics.record_ingest(timer.elapsed(), records.len());

    let authority = match config.names {
        NameSource::Headwords => NameAuthority::from_headwords(&headwords),
        NameSource::Annotated => NameAuthority::from_annotated(&headwords),
    };
    info!(names = authority.len(), "Built name authority");

    // Step 2: Clean and classify
    let timer = TimedOperation::start();
    let extractor = Extractor::new(config.lexicon.clone(), authority)?;
    let enriched = extractor.enrich_all(records);
    metrics.record_extract(timer.elapsed(), &enriched);

    // Step 3: Stem the gazetteer
    let timer = TimedOperation::start();
    let stemmer = GazetteerStemmer::new(config.stemmer.clone());
    let index = GazetteerIndex::build(gazetteer, &stemmer);
    if index.is_empty() {
        warn!(eras = %config.stemmer.eras, "No gazetteer entry yielded stems; nothing can match");
    }
    metrics.record_index(timer.elapsed(), index.stats());

    // Step 4: Match and resolve
    let timer = TimedOperation::start();
    let search = MigrantSearch::new(
        MigrantMatcher::new(config.matcher.clone()),
        GeoResolver::new(config.resolver.clone()),
    );
    let result = search.search(&enriched, &index)?;
    metrics.record_search(timer.elapsed(), &result.trace);

    // Step 5: Write tables
    tokio::fs::create_dir_all(&args.out)
        .await
        .with_context(|| format!("Failed to create {}", args.out.display()))?;
    let master = join_master(&enriched, &result.migrants);
    write_json(&args.out.join("inscriptions.json"), &enriched).await?;
    write_json(&args.out.join("migrants_raw.json"), &result.raw).await?;
    write_json(&args.out.join("migrants.json"), &result.migrants).await?;
    write_json(&args.out.join("master.json"), &master).await?;

    let snapshot = metrics.snapshot();
    info!(
        records = snapshot.records_read,
        funerary = snapshot.funerary_records,
        raw = snapshot.raw_candidates,
        migrants = snapshot.migrants,
        search_ms = snapshot.search_time_ms,
        "Pipeline finished"
    );
    write_json(&args.out.join("metrics.json"), &snapshot).await?;
    Ok(())
}

async fn decode(args: &DecodeArgs) -> Result<()> {
    let fragments: Vec<Vec<String>> = FileReader::read_records(&args.fields, "fragments").await?;
    let records = ingest::decode_all(&fragments);
    info!(
        inscriptions = fragments.len(),
        decoded = records.len(),
        "Decoded inscriptions"
    );
    write_json(&args.out, &records).await
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).context("Failed to serialize output")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(dir: &Path) -> RunArgs {
        RunArgs {
            inscriptions: dir.join("inscriptions.json"),
            gazetteer: dir.join("gazetteer.json"),
            names: dir.join("names.txt"),
            out: dir.join("out"),
            config: None,
            strict: false,
            threshold_km: None,
            annotated_names: false,
        }
    }

    #[tokio::test]
    async fn test_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = run_args(dir.path());
        args.strict = true;
        args.annotated_names = true;
        let config = build_config(&args).await.unwrap();
        assert_eq!(config.mode, OperationMode::Strict);
        assert!(config.resolver.require_distance);
        assert_eq!(config.names, NameSource::Annotated);

        args.threshold_km = Some(50.0);
        let config = build_config(&args).await.unwrap();
        assert_eq!(config.resolver.threshold_km, 50.0);
    }

    #[tokio::test]
    async fn test_run_writes_tables() {
        let dir = tempfile::tempdir().unwrap();
        let args = run_args(dir.path());
        tokio::fs::write(
            &args.inscriptions,
            r#"[{"edcs-id": "EDCS-1", "text": "D M Aureliae Emeritensi coniugi",
                 "keywords": "tituli sepulcrales", "find_lat": 41.117, "find_long": 1.255},
                {"edcs-id": "EDCS-2", "text": "Iovi Optimo Maximo"}]"#,
        )
        .await
        .unwrap();
        tokio::fs::write(
            &args.gazetteer,
            r#"[{"pid": "/places/256179", "title": "Emerita Augusta", "nameTransliterated": "Emerita",
                 "reprLat": 38.916, "reprLong": -6.344, "timePeriods": "R"}]"#,
        )
        .await
        .unwrap();
        tokio::fs::write(&args.names, "Aurelia\nMarcus\n").await.unwrap();

        run(&args, AppConfig::default()).await.unwrap();

        let migrants: serde_json::Value = serde_json::from_str(
            &tokio::fs::read_to_string(args.out.join("migrants.json")).await.unwrap(),
        )
        .unwrap();
        assert_eq!(migrants.as_array().unwrap().len(), 1);
        assert_eq!(migrants[0]["inscription_id"], "EDCS-1");

        let master: serde_json::Value = serde_json::from_str(
            &tokio::fs::read_to_string(args.out.join("master.json")).await.unwrap(),
        )
        .unwrap();
        assert_eq!(master.as_array().unwrap().len(), 2);
        assert_eq!(master[0]["gender"], "f");
        assert_eq!(master[0]["origo"], "Emerita Augusta");
        assert_eq!(master[1]["migrant"], false);

        assert!(args.out.join("metrics.json").exists());
        assert!(args.out.join("migrants_raw.json").exists());
    }

    #[tokio::test]
    async fn test_missing_gazetteer_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let args = run_args(dir.path());
        tokio::fs::write(&args.inscriptions, "[]").await.unwrap();
        tokio::fs::write(&args.names, "Aurelia\n").await.unwrap();
        let err = run(&args, AppConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("gazetteer"), "got {}", err);
    }

    #[tokio::test]
    async fn test_decode_command() {
        let dir = tempfile::tempdir().unwrap();
        let fields = dir.path().join("fields.json");
        let out = dir.path().join("decoded.json");
        tokio::fs::write(
            &fields,
            r#"[["EDCS-ID:", "EDCS-00001", "Provinz:", "Baetica"], ["Provinz:", "Roma"]]"#,
        )
        .await
        .unwrap();

        decode(&DecodeArgs {
            fields,
            out: out.clone(),
        })
        .await
        .unwrap();

        let decoded: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(&out).await.unwrap()).unwrap();
        assert_eq!(decoded.as_array().unwrap().len(), 1);
        assert_eq!(decoded[0]["edcs_id"], "EDCS-00001");
        assert_eq!(decoded[0]["province"], "Baetica");
    }
}
