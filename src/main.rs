use {
    clap::Parser,
    linea_lookup::{
        address::normalize_addresses,
        batch::BatchRunner,
        config::Config,
        fetch::{self, rpc::EthRpcClient, AttestationClient, BalanceClient, PointsClient},
        report::{self, ReportFormat},
        stats::PohFilter,
        ui,
    },
    std::{io::Read, path::PathBuf, sync::Arc},
};

/// Look up LXP, LXP-L and POH for a list of Linea addresses
///
/// Without an input source an interactive terminal UI opens.
#[derive(Parser, Debug)]
#[command(name = "linea-lookup", version, about, long_about = None)]
struct Cli {
    /// Read addresses from a file (one per line) and print a report
    #[arg(short, long, conflicts_with = "stdin")]
    file: Option<PathBuf>,

    /// Read addresses from stdin and print a report
    #[arg(long)]
    stdin: bool,

    /// Report output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
    format: ReportFormat,

    /// Only report rows with this POH state
    #[arg(long, value_enum, default_value_t = PohFilter::All)]
    filter: PohFilter,
}

/// Logger writing to stderr, filtered by `RUST_LOG` when set
///
/// Stderr shares the terminal with the UI, so without `RUST_LOG` the
/// interactive mode logs nothing and report mode logs errors only.
fn logger_builder(rust_log: Option<&str>, interactive: bool) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    match rust_log {
        Some(filters) => {
            builder.parse_filters(filters);
        }
        None if interactive => {
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {
            builder.filter_level(log::LevelFilter::Error);
        }
    }
    builder.target(env_logger::Target::Stderr);
    builder
}

fn build_runner(config: &Config) -> Result<BatchRunner, Box<dyn std::error::Error>> {
    let http = fetch::http_client(config.request_timeout)?;
    let rpc = Arc::new(EthRpcClient::new(http.clone(), config.rpc_url.clone()));

    Ok(BatchRunner::new(
        Arc::new(PointsClient::new(http.clone(), config.points_url.clone())),
        Arc::new(AttestationClient::new(http, config.attestation_url.clone())),
        Arc::new(BalanceClient::new(rpc, config.token_address)),
        config.group_mode,
    )
    .with_concurrency(config.request_concurrency))
}

async fn run_report(cli: &Cli, runner: BatchRunner) -> Result<(), Box<dyn std::error::Error>> {
    let raw = match &cli.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let addresses = normalize_addresses(&raw);
    if addresses.is_empty() {
        return Err("no addresses in input".into());
    }

    let rows = runner.run(&addresses).await?;
    print!("{}", report::render(&rows, cli.filter, cli.format)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let interactive = cli.file.is_none() && !cli.stdin;
    logger_builder(config.rust_log.as_deref(), interactive).init();

    log::info!("🚀 Starting Linea Lookup...");
    log::info!("📊 Configuration:");
    log::info!("   Points API: {}", config.points_url);
    log::info!("   POH API: {}", config.attestation_url);
    log::info!("   RPC: {}", config.rpc_url);
    log::info!("   Token: {}", config.token_address);
    log::info!("   Groups: {:?}", config.group_mode);
    log::info!("   Max in-flight lookups: {}", config.request_concurrency);

    let runner = build_runner(&config)?;

    if interactive {
        ui::run_ui(runner).await
    } else {
        run_report(&cli, runner).await
    }
}
