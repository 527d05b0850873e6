use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use config::ServiceConfig;
use pestmix_catalog::Dataset;
use pestmix_engine::Recommender;
use pestmix_protocol::{
    serialize_json, CropsResponse, MechanismsResponse, PestsResponse, ProductsResponse,
    RecommendRequest, RecommendResponse,
};
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod http_api;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "pestmix")]
#[command(about = "Pesticide mixture recommendations from registration exports", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file (overrides PESTMIX_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args, Debug, Default)]
struct DataArgs {
    /// Product registration export (CSV)
    #[arg(long, global = true)]
    products: Option<PathBuf>,

    /// Mechanism metadata export (CSV)
    #[arg(long, global = true)]
    mechanisms: Option<PathBuf>,

    /// Mechanism compatibility table (CSV)
    #[arg(long, global = true)]
    compatibility: Option<PathBuf>,

    /// Fail on missing columns or values instead of skipping rows
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the recommendation API over HTTP
    ServeHttp(ServeArgs),

    /// List crops present in the product export
    Crops,

    /// List pests and diseases registered for a crop
    Pests(PestsArgs),

    /// List atomic mechanism codes used by products
    Mechanisms,

    /// List trade names
    Products,

    /// Recommend single products or compatible pairs
    Recommend(RecommendArgs),

    /// Load the dataset and print its counts
    Check,
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind (host:port)
    #[arg(long)]
    bind: Option<String>,
}

#[derive(Args)]
struct PestsArgs {
    /// Crop name, matched exactly
    #[arg(long)]
    crop: String,
}

#[derive(Args)]
struct RecommendArgs {
    /// Full request as JSON (use '-' to read stdin)
    #[arg(long, conflicts_with_all = ["crop", "pest", "used", "owned"])]
    json: Option<String>,

    /// Crop name, matched exactly
    #[arg(long)]
    crop: Option<String>,

    /// Pest or disease to cover (repeatable)
    #[arg(long = "pest")]
    pest: Vec<String>,

    /// Mechanism code already used this season (repeatable)
    #[arg(long = "used")]
    used: Vec<String>,

    /// Trade name already owned (repeatable)
    #[arg(long = "owned")]
    owned: Vec<String>,
}

impl RecommendArgs {
    fn into_request(self) -> Result<RecommendRequest> {
        if let Some(payload) = self.json {
            let payload = if payload == "-" {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read request from stdin")?;
                buf
            } else {
                payload
            };
            return serde_json::from_str(&payload).context("Invalid recommend request JSON");
        }

        let Some(crop) = self.crop else {
            anyhow::bail!("recommend requires either --json or --crop");
        };
        Ok(RecommendRequest {
            crop,
            pests_or_diseases: self.pest,
            used_mechanisms: self.used,
            owned_products: self.owned,
        })
    }
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // One-shot commands print JSON; keep stdout clean for it
    if !matches!(cli.command, Commands::ServeHttp(_)) {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut service = ServiceConfig::resolve(cli.config.as_deref())?;
    apply_overrides(&mut service, &cli.data);

    match cli.command {
        Commands::ServeHttp(args) => serve_http(args, service).await?,
        Commands::Crops => {
            let dataset = load_dataset(&service)?;
            let response = CropsResponse {
                crops: dataset.products.crops(),
            };
            print_stdout(&serialize_json(&response)?)?;
        }
        Commands::Pests(args) => {
            let dataset = load_dataset(&service)?;
            let response = PestsResponse {
                pests: dataset.products.pests_for(&args.crop),
            };
            print_stdout(&serialize_json(&response)?)?;
        }
        Commands::Mechanisms => {
            let dataset = load_dataset(&service)?;
            let response = MechanismsResponse {
                mechanisms: dataset.products.mechanisms(),
            };
            print_stdout(&serialize_json(&response)?)?;
        }
        Commands::Products => {
            let dataset = load_dataset(&service)?;
            let response = ProductsResponse {
                products: dataset.products.trade_names(),
            };
            print_stdout(&serialize_json(&response)?)?;
        }
        Commands::Recommend(args) => {
            let request = args.into_request()?;
            let dataset = load_dataset(&service)?;
            let entries = Recommender::new(&dataset).recommend(&request.to_query());
            let response = RecommendResponse::from(entries.as_slice());
            print_stdout(&serialize_json(&response)?)?;
        }
        Commands::Check => {
            let dataset = load_dataset(&service)?;
            print_stdout(&serialize_json(&http_api::health_report(&dataset))?)?;
        }
    }

    Ok(())
}

fn apply_overrides(service: &mut ServiceConfig, data: &DataArgs) {
    if let Some(path) = &data.products {
        service.data.products = path.clone();
    }
    if let Some(path) = &data.mechanisms {
        service.data.mechanisms = path.clone();
    }
    if let Some(path) = &data.compatibility {
        service.data.compatibility = path.clone();
    }
    if data.strict {
        service.loader.strict = true;
    }
}

fn load_dataset(service: &ServiceConfig) -> Result<Dataset> {
    let dataset = Dataset::load(&service.data, &service.loader).with_context(|| {
        format!(
            "Failed to load dataset (products: {}, mechanisms: {}, compatibility: {})",
            service.data.products.display(),
            service.data.mechanisms.display(),
            service.data.compatibility.display()
        )
    })?;
    log::info!(
        "Loaded {} product records, {} mechanisms, {} forbidden pairs",
        dataset.products.len(),
        dataset.mechanisms.len(),
        dataset.mechanisms.forbidden().len()
    );
    Ok(dataset)
}

async fn serve_http(args: ServeArgs, service: ServiceConfig) -> Result<()> {
    let bind = args.bind.unwrap_or_else(|| service.server.bind.clone());
    let dataset = Arc::new(load_dataset(&service)?);
    let app = http_api::router(dataset, service.server.allow_any_origin);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    let local_addr = listener.local_addr()?;
    let base_url = format!("http://{local_addr}");

    print_stdout(&format!("Serving recommendations: {base_url}/recommend"))?;
    print_stdout(&format!("Health endpoint: {base_url}/health"))?;
    print_stdout(&format!("Try: curl '{base_url}/pests?crop=<crop>'"))?;
    print_stdout(&format!(
        "Try: curl -X POST {base_url}/recommend -H 'Content-Type: application/json' -d '{{\"crop\":\"<crop>\",\"pests_or_diseases\":[\"<pest>\"]}}'"
    ))?;

    axum::serve(listener, app).await?;
    Ok(())
}
