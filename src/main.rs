// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use contact_enrich::utils::logging::{
    format_error, format_field, format_info, format_step, format_success, format_warning,
};
use contact_enrich::{
    AddressValidator, ChatCompletionClient, Config, ContactExtractor, ContactRecord, Enricher,
    HeuristicExtractor, InputRow, JsonExporter, ModelAssistedExtractor, PipelineStats,
    ProgressTracker, RegionPatterns, SearchProvider, SerperClient, Validator, load_rows,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "contact_enrich")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Enrich company lists with contact details from web search", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "CONTACT_ENRICH_CONFIG",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich every row of a JSON input file
    Enrich {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        #[arg(long, value_name = "NUM")]
        limit: Option<usize>,

        #[arg(short, long)]
        pretty: bool,

        /// Use only the heuristic extractor
        #[arg(long)]
        no_model: bool,

        /// Check extracted addresses against the reference columns
        #[arg(long)]
        validate: bool,
    },

    /// Look up a single company and print its record
    Lookup {
        company: String,

        /// Reference address; enables validation
        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        postal_code: Option<String>,

        #[arg(long)]
        no_model: bool,
    },
}

/// Shared clients and extractors, built once per invocation.
struct Engine {
    search: Arc<dyn SearchProvider>,
    extractor: Arc<dyn ContactExtractor>,
    region: Arc<RegionPatterns>,
}

impl Engine {
    fn build(config: &Config) -> Result<Self> {
        let region = Arc::new(
            RegionPatterns::compile(config.extraction.region.clone())
                .context("Failed to compile region patterns")?,
        );

        let search: Arc<dyn SearchProvider> = Arc::new(
            SerperClient::new(&config.search, region.profile().country.clone())
                .context("Failed to create search client")?,
        );

        let heuristic = HeuristicExtractor::new(region.clone(), config.extraction.description_mode);
        let extractor: Arc<dyn ContactExtractor> = if config.model.enabled {
            let model = ChatCompletionClient::new(&config.model)
                .context("Failed to create chat completion client")?;
            info!("Model-assisted extraction enabled ({})", model.model());
            Arc::new(ModelAssistedExtractor::from_config(
                Arc::new(model),
                heuristic,
                &config.model,
            ))
        } else {
            info!("Model disabled, using heuristic extraction");
            Arc::new(heuristic)
        };

        Ok(Self {
            search,
            extractor,
            region,
        })
    }

    fn enricher(&self, row_delay: Duration, validate: bool) -> Enricher {
        let enricher = Enricher::new(self.search.clone(), self.extractor.clone(), row_delay);
        if validate {
            enricher.with_validator(AddressValidator::new(
                self.search.clone(),
                self.extractor.clone(),
                self.region.clone(),
            ))
        } else {
            enricher
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    contact_enrich::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Contact enrichment engine");
    info!("Loading configuration from: {}", cli.config.display());

    let mut config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    match cli.command {
        Commands::Enrich {
            input,
            output,
            limit,
            pretty,
            no_model,
            validate,
        } => {
            config.model.enabled &= !no_model;
            config.pipeline.validate_addresses |= validate;
            cmd_enrich(&config, input, output, limit, pretty, cli.color).await?;
        }
        Commands::Lookup {
            company,
            address,
            postal_code,
            no_model,
        } => {
            config.model.enabled &= !no_model;
            cmd_lookup(&config, &company, address, postal_code).await?;
        }
    }

    Ok(())
}

async fn cmd_enrich(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    limit: Option<usize>,
    pretty: bool,
    color: bool,
) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    println!("{}", format_step(1, 3, "Loading input rows"));
    let mut rows = load_rows(&input, &config.pipeline)
        .with_context(|| format!("Failed to load rows from {}", input.display()))?;
    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    if rows.is_empty() {
        println!("{}", format_warning("No rows to process"));
        return Ok(());
    }

    let engine = Engine::build(config)?;
    let enricher = engine.enricher(
        Duration::from_millis(config.pipeline.row_delay_ms),
        config.pipeline.validate_addresses,
    );

    println!(
        "{}",
        format_step(2, 3, &format!("Enriching {} companies", rows.len()))
    );
    let progress = ProgressTracker::with_color(rows.len(), color);
    let records = enricher.run(&rows, &progress).await;
    progress.finish();
    let stats = progress.get_stats();

    println!("{}", format_step(3, 3, "Writing results"));
    let exporter = JsonExporter::new(&output).context("Failed to create output directory")?;
    let manifest = exporter
        .export(&records, &stats, pretty)
        .context("Failed to export records")?;

    print_summary(&stats, config.pipeline.validate_addresses);
    println!(
        "{}",
        format_success(&format!(
            "Exported {} records to {}",
            manifest.total_records,
            exporter.output_dir().display()
        ))
    );

    Ok(())
}

async fn cmd_lookup(
    config: &Config,
    company: &str,
    address: Option<String>,
    postal_code: Option<String>,
) -> Result<()> {
    config.validate().context("Invalid configuration")?;
    Validator::validate_company_name(company).context("Invalid company name")?;

    let engine = Engine::build(config)?;
    let enricher = engine.enricher(Duration::ZERO, address.is_some());

    let row = InputRow {
        company_name: Some(company.to_string()),
        reference_address: address,
        reference_postal_code: postal_code,
    };

    let record = enricher.enrich_row(&row).await.into_record();
    print_record(&record);
    println!(
        "{}",
        serde_json::to_string_pretty(&record).context("Failed to serialize record")?
    );

    Ok(())
}

/// Every output column except the company name, in display order.
fn record_fields(record: &ContactRecord) -> Vec<(&'static str, String)> {
    vec![
        ("Website", record.website_link.clone()),
        ("Phone", record.phone_number.clone()),
        ("Extra phone", record.extra_phone.clone()),
        ("Email", record.email_address.clone()),
        ("Address", record.address.clone()),
        ("Social", record.social_media_links.clone()),
        ("Description", record.description.clone()),
        ("Validation", record.validation_status.to_string()),
    ]
}

fn print_record(record: &ContactRecord) {
    println!("\n{}", format_info(&record.company_name));
    for (label, value) in record_fields(record) {
        println!("{}", format_field(label, &value));
    }
    println!();
}

fn print_summary(stats: &PipelineStats, validated: bool) {
    println!("\n{}", "=".repeat(60));
    println!(
        "{}",
        format_info(&format!(
            "Rows: {} processed, {} skipped in {}s ({:.1}/min)",
            stats.rows_processed,
            stats.rows_skipped,
            stats.duration_secs,
            stats.rows_per_minute()
        ))
    );
    println!(
        "{}",
        format_info(&format!(
            "Websites: {} ({:.1}%) | Phones: {} ({:.1}%)",
            stats.websites_found,
            stats.website_rate(),
            stats.phones_found,
            stats.phone_rate()
        ))
    );

    if stats.model_assisted > 0 {
        println!(
            "{}",
            format_info(&format!("Model-assisted rows: {}", stats.model_assisted))
        );
    }

    if stats.empty_searches > 0 {
        println!(
            "{}",
            format_warning(&format!("Empty searches: {}", stats.empty_searches))
        );
    }

    if validated {
        println!(
            "{}",
            format_info(&format!("Revalidated addresses: {}", stats.revalidated))
        );
        if stats.fallbacks > 0 {
            println!(
                "{}",
                format_error(&format!(
                    "Addresses replaced by reference data: {}",
                    stats.fallbacks
                ))
            );
        }
    }
    println!("{}", "=".repeat(60));
}
