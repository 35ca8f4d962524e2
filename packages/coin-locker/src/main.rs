//! Coin Locker CLI
//!
//! - `coin-locker objects`        -> list owned objects with explorer links
//! - `coin-locker lock`           -> split and lock SUI for a duration
//! - `coin-locker unlock`         -> release locked coins
//! - `coin-locker build-lock`     -> print the unsigned lock transaction
//! - `coin-locker build-unlock`   -> print the unsigned unlock transaction
//! - `coin-locker session`        -> interactive front-end

use std::io::Write as _;
use std::process::ExitCode;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use coin_locker::{
    build_lock_transaction, build_unlock_transaction, App, Config, ConfigOverrides, Flow,
    LockRequest, ObjectSource, OwnedObjects, SessionCommand, StatusMessage, UnlockRequest,
};
use suichain_rs::transaction::TransactionKind;
use suichain_rs::{Network, ProgrammableTransaction, SuiAddress, SuiKeypair, SuiRpcClient};

#[derive(Parser)]
#[command(name = "coin-locker")]
#[command(about = "Lock and unlock SUI through the token_lock package", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Network (devnet, testnet, mainnet, localnet)
    #[arg(long, global = true, value_parser = parse_network)]
    network: Option<Network>,

    /// Fullnode JSON-RPC URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// token_lock package id
    #[arg(long, global = true, value_parser = parse_address)]
    package_id: Option<SuiAddress>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List objects owned by an address
    Objects {
        /// Owner (defaults to the configured account)
        #[arg(long, value_parser = parse_address)]
        address: Option<SuiAddress>,
    },

    /// Split SUI from gas and lock it
    Lock {
        /// Amount in MIST
        #[arg(long)]
        amount: String,

        /// Lock duration in seconds
        #[arg(long)]
        duration: String,
    },

    /// Unlock coins locked by the configured account
    Unlock,

    /// Print the lock transaction without signing it
    BuildLock {
        #[arg(long)]
        amount: String,

        #[arg(long)]
        duration: String,
    },

    /// Print the unlock transaction without signing it
    BuildUnlock {
        /// Owner (defaults to the configured account)
        #[arg(long, value_parser = parse_address)]
        address: Option<SuiAddress>,
    },

    /// Interactive front-end
    Session,
}

fn parse_network(s: &str) -> Result<Network, String> {
    s.parse().map_err(|e: eyre::Report| e.to_string())
}

fn parse_address(s: &str) -> Result<SuiAddress, String> {
    SuiAddress::from_hex(s).map_err(|e| e.to_string())
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<ExitCode> {
    let config = Config::load()?.with_overrides(ConfigOverrides {
        network: cli.network,
        rpc_url: cli.rpc_url,
        package_id: cli.package_id,
    });
    info!(
        network = %config.network,
        rpc_url = %config.rpc_url(),
        package_id = ?config.package_id(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Objects { address } => {
            let owner = match address {
                Some(address) => address,
                None => configured_address(&config)?,
            };
            let client = SuiRpcClient::new(&config.rpc_url())?;
            let objects = OwnedObjects::fetch(&client as &dyn ObjectSource, owner).await;
            for line in objects.render(&config.explorer_url()) {
                println!("{}", line);
            }
            Ok(if matches!(objects, OwnedObjects::Failed(_)) {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }

        Commands::Lock { amount, duration } => {
            let mut app = App::new(config)?;
            app.connect_configured().await?;
            app.locker().set_amount(amount);
            app.locker().set_duration(duration);
            let status = app.lock().await;
            Ok(report(&status))
        }

        Commands::Unlock => {
            let mut app = App::new(config)?;
            app.connect_configured().await?;
            let status = app.unlock().await;
            Ok(report(&status))
        }

        Commands::BuildLock { amount, duration } => {
            let package = require_package(&config)?;
            let request = LockRequest::parse(&amount, &duration)?;
            print_transaction(build_lock_transaction(package, &request)?)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::BuildUnlock { address } => {
            let package = require_package(&config)?;
            let owner = match address {
                Some(address) => address,
                None => configured_address(&config)?,
            };
            print_transaction(build_unlock_transaction(package, &UnlockRequest { owner })?)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Session => {
            run_session(App::new(config)?).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_session(mut app: App) -> Result<()> {
    if let Err(e) = app.connect_configured().await {
        eprintln!("Could not connect wallet: {:#}", e);
    }
    println!("{}", app.render());
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match app.handle(command).await {
            Ok(Flow::Output(text)) => println!("{}", text),
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("{:#}", e),
        }
    }

    Ok(())
}

fn report(status: &StatusMessage) -> ExitCode {
    println!("{}", status);
    if let Some(digest) = status.digest() {
        println!("Transaction digest: {}", digest);
    }
    if status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn require_package(config: &Config) -> Result<SuiAddress> {
    config.package_id().ok_or_else(|| {
        eyre!(
            "No token_lock package id for {}: set TOKEN_LOCK_PACKAGE_ID or pass --package-id",
            config.network
        )
    })
}

fn configured_address(config: &Config) -> Result<SuiAddress> {
    let key = config
        .private_key
        .as_ref()
        .ok_or_else(|| eyre!("No address: pass --address or set SUI_PRIVATE_KEY"))?;
    Ok(SuiKeypair::from_encoded(key.expose())?.address())
}

/// JSON view of the commands plus base64 `TransactionKind` bytes for a
/// wallet that resolves gas itself
fn print_transaction(pt: ProgrammableTransaction) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&transaction_json(pt)?)?);
    Ok(())
}

fn transaction_json(pt: ProgrammableTransaction) -> Result<serde_json::Value> {
    let kind = TransactionKind::ProgrammableTransaction(pt.clone());
    Ok(json!({
        "transaction": pt,
        "transactionKindBytes": BASE64.encode(kind.to_bcs_bytes()?),
    }))
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,coin_locker=debug"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use suichain_rs::Digest;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "coin-locker",
            "lock",
            "--amount",
            "100",
            "--duration",
            "3600",
            "--network",
            "devnet",
            "--package-id",
            "0xcafe",
        ])
        .unwrap();

        assert_eq!(cli.network, Some(Network::Devnet));
        assert_eq!(cli.package_id, Some(SuiAddress::from_hex("0xcafe").unwrap()));
        assert!(matches!(cli.command, Commands::Lock { .. }));
    }

    #[test]
    fn test_bad_network_rejected() {
        assert!(Cli::try_parse_from(["coin-locker", "--network", "moon", "unlock"]).is_err());
    }

    fn kind_from_output(output: &serde_json::Value) -> TransactionKind {
        let encoded = output["transactionKindBytes"].as_str().unwrap();
        let bytes = BASE64.decode(encoded).unwrap();
        // ProgrammableTransaction is variant 0
        assert_eq!(bytes[0], 0);
        bcs::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_lock_output_carries_transaction_kind() {
        let package = SuiAddress::from_hex("0xcafe").unwrap();
        let request = LockRequest::parse("1000", "3600").unwrap();
        let pt = build_lock_transaction(package, &request).unwrap();

        let output = transaction_json(pt.clone()).unwrap();
        assert_eq!(
            kind_from_output(&output),
            TransactionKind::ProgrammableTransaction(pt.clone())
        );
        assert_eq!(output["transaction"], serde_json::to_value(&pt).unwrap());
    }

    #[test]
    fn test_unlock_output_carries_transaction_kind() {
        let package = SuiAddress::from_hex("0xcafe").unwrap();
        let owner = SuiAddress::from_hex("0xb0b").unwrap();
        let pt = build_unlock_transaction(package, &UnlockRequest { owner }).unwrap();

        let output = transaction_json(pt.clone()).unwrap();
        assert_eq!(
            kind_from_output(&output),
            TransactionKind::ProgrammableTransaction(pt)
        );
    }

    #[test]
    fn test_report_exit_codes() {
        let failure = format!("{:?}", ExitCode::FAILURE);
        let success = format!("{:?}", ExitCode::SUCCESS);

        assert_eq!(format!("{:?}", report(&StatusMessage::ConnectPrompt)), failure);
        assert_eq!(format!("{:?}", report(&StatusMessage::Busy)), failure);
        assert_eq!(
            format!(
                "{:?}",
                report(&StatusMessage::LockFailed {
                    reason: "InsufficientGas".to_string()
                })
            ),
            failure
        );
        assert_eq!(
            format!(
                "{:?}",
                report(&StatusMessage::Unlocked {
                    digest: Digest::new([7; 32])
                })
            ),
            success
        );
    }
}
