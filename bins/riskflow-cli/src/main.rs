//! riskflow-cli — Score wallet cohorts on Compound V2/V3 activity.
//!
//! Loads a wallet list, collects lending events (live from Etherscan or
//! simulated), runs the scoring pipeline, and writes a scores CSV plus a
//! terminal summary.

mod report;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};

use riskflow_core::config::NormalizationMode;
use riskflow_core::traits::EventSource;
use riskflow_core::{ScoringConfig, WalletAddress};
use riskflow_collector::{load_wallet_file, sample_wallets, EtherscanCollector, EtherscanConfig, SimulatedSource};
use riskflow_engine::RiskEngine;

/// Wallet risk scoring for Compound V2/V3 lending activity.
#[derive(Parser)]
#[command(name = "riskflow-cli")]
#[command(version, about = "Score wallet risk from on-chain lending behavior.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a cohort of wallets and write a CSV report.
    Score(ScoreArgs),
    /// Score one wallet and print the full indicator breakdown.
    Explain(ExplainArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// Deterministic synthetic histories (no network access).
    Simulated,
    /// Live Compound market logs via the Etherscan API.
    Etherscan,
}

#[derive(Args)]
struct SourceArgs {
    /// Where event histories come from.
    #[arg(long, value_enum, default_value = "simulated")]
    source: SourceKind,

    /// Etherscan API key (falls back to ETHERSCAN_API_KEY).
    #[arg(long)]
    api_key: Option<String>,

    /// Seed for the simulated source.
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Reference timestamp (Unix seconds) for inactivity; defaults to the
    /// current time.
    #[arg(long)]
    now: Option<i64>,
}

#[derive(Args)]
struct NormalizationArgs {
    /// Normalize against a fixed [400, 600] reference range instead of the
    /// batch, making scores comparable across runs.
    #[arg(long)]
    fixed_reference: bool,
}

#[derive(Args)]
struct ScoreArgs {
    /// CSV file with wallet addresses in the first column. Uses the
    /// built-in demo cohort when omitted.
    #[arg(short, long)]
    wallets: Option<PathBuf>,

    /// Output CSV path.
    #[arg(short, long, default_value = "wallet_scores.csv")]
    output: PathBuf,

    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    normalization: NormalizationArgs,
}

#[derive(Args)]
struct ExplainArgs {
    /// Wallet address to explain.
    wallet: String,

    #[command(flatten)]
    source: SourceArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score(args) => score(args).await,
        Commands::Explain(args) => explain(args).await,
    }
}

fn build_source(args: &SourceArgs, now: i64) -> Result<Box<dyn EventSource>> {
    match args.source {
        SourceKind::Simulated => Ok(Box::new(SimulatedSource::new(args.seed, now))),
        SourceKind::Etherscan => {
            let api_key = match &args.api_key {
                Some(key) => key.clone(),
                None => std::env::var("ETHERSCAN_API_KEY")
                    .context("--source etherscan needs --api-key or ETHERSCAN_API_KEY")?,
            };
            Ok(Box::new(EtherscanCollector::new(EtherscanConfig::new(api_key))))
        }
    }
}

fn build_engine(normalization: &NormalizationArgs) -> Result<RiskEngine> {
    let mode = if normalization.fixed_reference {
        NormalizationMode::FixedReference {
            min: riskflow_core::constants::RAW_SCORE_MIN,
            max: riskflow_core::constants::RAW_SCORE_MAX,
        }
    } else {
        NormalizationMode::BatchRelative
    };
    let config = ScoringConfig {
        normalization: mode,
        ..ScoringConfig::default()
    };
    RiskEngine::new(config).context("invalid scoring configuration")
}

async fn score(args: ScoreArgs) -> Result<()> {
    let wallets = match &args.wallets {
        Some(path) => load_wallet_file(path)
            .with_context(|| format!("failed to load wallet list {}", path.display()))?,
        None => sample_wallets(),
    };
    if wallets.is_empty() {
        bail!("wallet list is empty");
    }

    let now = args.source.now.unwrap_or_else(|| Utc::now().timestamp());
    let source = build_source(&args.source, now)?;
    let engine = build_engine(&args.normalization)?;

    tracing::info!(wallets = wallets.len(), "collecting event histories");
    let histories = source
        .events_for_wallets(&wallets)
        .await
        .context("event collection failed")?;

    let outcome = engine.score_batch(&histories, now);

    report::write_scores_csv(&args.output, &outcome)?;
    println!("{}", report::Summary::from_outcome(&outcome, now));
    for (wallet, error) in &outcome.failures {
        println!("  failed: {wallet} — {error}");
    }
    println!("Scores written to {}", args.output.display());
    Ok(())
}

async fn explain(args: ExplainArgs) -> Result<()> {
    let wallet: WalletAddress = args
        .wallet
        .parse()
        .with_context(|| format!("invalid wallet address: {}", args.wallet))?;

    let now = args.source.now.unwrap_or_else(|| Utc::now().timestamp());
    let source = build_source(&args.source, now)?;
    // Single-wallet runs need batch-independent scores.
    let engine = build_engine(&NormalizationArgs {
        fixed_reference: true,
    })?;

    let events = source
        .events_for_wallet(&wallet)
        .await
        .context("event collection failed")?;
    let wallet_report = engine
        .score_wallet(&wallet, &events, now)
        .with_context(|| format!("could not score {wallet}"))?;

    print!("{}", report::explain(&wallet, &wallet_report));
    Ok(())
}
