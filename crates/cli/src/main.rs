//! CLI for scanning an Ethereum node for deployed contracts.

mod prompt;

use clap::{Args, Parser, Subcommand, ValueEnum};
use contract_scanner_export::{export_to_csv, ContractRecord};
use contract_scanner_ingestion::{read_addresses, BlockRange, ChainReader, ContractScanner, RpcClient};
use contract_scanner_telemetry::{init_logging, Metrics};
use prompt::ScanRequest;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "contract-scanner")]
#[command(about = "Find deployed contracts in a block range or an address list and export them to CSV")]
struct Cli {
    #[command(flatten)]
    options: ScanOptions,

    /// Scan mode; prompts interactively when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ScanOptions {
    /// Ethereum execution RPC URL
    #[arg(
        long,
        global = true,
        env = "CONTRACT_SCANNER_RPC_URL",
        default_value = "https://ethereum-rpc.publicnode.com"
    )]
    rpc_url: String,

    /// HTTP proxy for RPC traffic
    #[arg(long, global = true, env = "CONTRACT_SCANNER_PROXY")]
    proxy: Option<String>,

    /// Pause between blocks or addresses, in milliseconds
    #[arg(long, global = true, default_value = "100")]
    request_delay_ms: u64,

    /// Output CSV path (default depends on the scan mode)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Append blocks and addresses that failed to this file
    #[arg(long, global = true)]
    failure_log: Option<PathBuf>,

    /// Write Prometheus metrics to this file after the run
    #[arg(long, global = true)]
    metrics_output: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format; plain in interactive mode, JSON otherwise
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Json,
    Plain,
}

/// JSON logs would interleave with the interactive prompts, so plain text
/// is the default there.
fn use_json_logs(format: Option<LogFormat>, interactive: bool) -> bool {
    match format {
        Some(LogFormat::Json) => true,
        Some(LogFormat::Plain) => false,
        None => !interactive,
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a block range for contract-creation transactions
    Blocks {
        /// Inclusive range such as 1000-2000, or 1000- to scan up to the latest block
        range: BlockRange,
    },
    /// Look up contracts listed in a text file, one address per line
    Addresses {
        /// Address list path
        #[arg(long, default_value = prompt::DEFAULT_ADDRESS_FILE)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let options = cli.options;

    let interactive = cli.command.is_none();
    init_logging(
        options.log_level.as_deref(),
        use_json_logs(options.log_format, interactive),
    )?;

    let metrics = Metrics::new()?;
    let rpc_client = RpcClient::new(&options.rpc_url, options.proxy.as_deref(), metrics.clone())?;
    let latest_block = connect(&rpc_client, &options.rpc_url).await?;

    let request = match cli.command {
        Some(Commands::Blocks { range }) => ScanRequest::Blocks(range),
        Some(Commands::Addresses { file }) => ScanRequest::Addresses(file),
        None => prompt::choose_scan(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let scanner = ContractScanner::new(rpc_client, metrics.clone())
        .with_request_delay(Duration::from_millis(options.request_delay_ms))
        .with_failure_log(options.failure_log.clone());

    let (records, default_output) = run_scan(&scanner, request, latest_block).await;

    if records.is_empty() {
        warn!("No contracts found, nothing to save");
    } else {
        let output = match options.output {
            Some(path) => path,
            None if interactive => {
                prompt::choose_output(&mut io::stdin().lock(), &mut io::stdout(), default_output)?
            }
            None => default_output,
        };
        export_to_csv(&records, &output)?;
    }

    if let Some(path) = options.metrics_output {
        std::fs::write(&path, metrics.gather()?)?;
        info!("Wrote metrics to {:?}", path);
    }

    info!(
        "Done: {} contracts found, {} exported, {} units skipped",
        metrics.contracts_found(),
        records.len(),
        metrics.units_skipped()
    );
    Ok(())
}

/// Check the node is reachable and return the chain head.
///
/// Failure here is fatal; nothing has been scanned yet.
async fn connect<C: ChainReader>(client: &C, rpc_url: &str) -> anyhow::Result<u64> {
    match client.latest_block_number().await {
        Ok(latest) => {
            info!("Connected to chain, current block height: {}", latest);
            Ok(latest)
        }
        Err(e) => {
            error!("Cannot connect to RPC node at {}: {}", rpc_url, e);
            Err(anyhow::anyhow!("Cannot connect to RPC node at {}: {}", rpc_url, e))
        }
    }
}

async fn run_scan<C: ChainReader>(
    scanner: &ContractScanner<C>,
    request: ScanRequest,
    latest_block: u64,
) -> (Vec<ContractRecord>, PathBuf) {
    match &request {
        ScanRequest::Blocks(range) => {
            let (start, end) = range.resolve(latest_block);
            let resolved = ScanRequest::Blocks(BlockRange::new(start, Some(end)));
            let records = scanner.scan_block_range(start, end).await;
            (records, resolved.default_output())
        }
        ScanRequest::Addresses(file) => {
            let addresses = read_addresses(file);
            if addresses.is_empty() {
                warn!("No valid addresses found in {:?}", file);
                return (Vec::new(), request.default_output());
            }
            (scanner.scan_addresses(&addresses).await, request.default_output())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn options_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "contract-scanner",
            "blocks",
            "1-2",
            "--output",
            "x.csv",
            "--request-delay-ms",
            "5",
            "--log-format",
            "plain",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Some(Commands::Blocks { range }) if range == BlockRange::new(1, Some(2))
        ));
        assert_eq!(cli.options.output, Some(PathBuf::from("x.csv")));
        assert_eq!(cli.options.request_delay_ms, 5);
        assert_eq!(cli.options.log_format, Some(LogFormat::Plain));
    }

    #[test]
    fn options_are_accepted_before_subcommand() {
        let cli = Cli::try_parse_from([
            "contract-scanner",
            "--failure-log",
            "failed.txt",
            "addresses",
            "--file",
            "vaults.txt",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Some(Commands::Addresses { ref file }) if file == &PathBuf::from("vaults.txt")
        ));
        assert_eq!(cli.options.failure_log, Some(PathBuf::from("failed.txt")));
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["contract-scanner"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.options.request_delay_ms, 100);
    }

    #[test]
    fn rejects_inverted_block_range() {
        assert!(Cli::try_parse_from(["contract-scanner", "blocks", "9-3"]).is_err());
    }

    #[test]
    fn interactive_mode_defaults_to_plain_logs() {
        assert!(!use_json_logs(None, true));
        assert!(use_json_logs(None, false));
        assert!(use_json_logs(Some(LogFormat::Json), true));
        assert!(!use_json_logs(Some(LogFormat::Plain), false));
    }

    fn client(server: &MockServer) -> RpcClient {
        RpcClient::new(&server.uri(), None, Metrics::new().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn connect_returns_chain_head() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"jsonrpc":"2.0","id":1,"result":"0x1b4"}"#),
            )
            .mount(&server)
            .await;

        assert_eq!(connect(&client(&server), &server.uri()).await.unwrap(), 436);
    }

    #[tokio::test]
    async fn connect_fails_when_node_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = connect(&client(&server), &server.uri()).await.unwrap_err();
        assert!(err.to_string().contains("Cannot connect to RPC node"));
        assert!(err.to_string().contains("500"));
    }
}
