//! Lifecycle E2E runner
//!
//! Command-line entry point that runs the lifecycle scenarios against a Nomad
//! cluster and exits non-zero when any of them fails.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lifecycle_suite::config::DEFAULT_NOMAD_ADDR;
use lifecycle_suite::{Config, Scenario, Suite, SuiteContext, connect};

#[derive(Parser)]
#[command(name = "lifecycle-e2e")]
#[command(about = "Task lifecycle end-to-end checks for Nomad", long_about = None)]
struct Cli {
    /// Nomad agent address
    #[arg(long, env = "NOMAD_ADDR", default_value = DEFAULT_NOMAD_ADDR)]
    address: String,

    /// ACL token
    #[arg(long, env = "NOMAD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Namespace to register jobs in
    #[arg(long, env = "NOMAD_NAMESPACE")]
    namespace: Option<String>,

    /// Region to register jobs in
    #[arg(long, env = "NOMAD_REGION")]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scenarios against the cluster
    Run(RunArgs),
    /// List the available scenarios and the marker files they expect
    List,
}

#[derive(Args)]
struct RunArgs {
    /// Scenario to run; repeat to select several (default: all)
    #[arg(long = "scenario", value_enum)]
    scenarios: Vec<Scenario>,

    /// Run the selected scenarios concurrently
    #[arg(long)]
    parallel: bool,

    /// Leave submitted jobs registered after the run
    #[arg(long)]
    keep_jobs: bool,

    /// Seconds to wait for any cluster condition
    #[arg(long, env = "LIFECYCLE_WAIT_TIMEOUT", default_value_t = 120)]
    wait_timeout: u64,

    /// Milliseconds between two polls
    #[arg(long, env = "LIFECYCLE_POLL_INTERVAL_MS", default_value_t = 500)]
    poll_interval: u64,

    /// Client nodes that must be ready before running
    #[arg(long, env = "LIFECYCLE_MIN_READY_NODES", default_value_t = 1)]
    min_nodes: usize,

    /// Directory with batch.nomad and service.nomad overriding the built-in job files
    #[arg(long, env = "LIFECYCLE_INPUTS_DIR")]
    inputs: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifecycle_suite=info,lifecycle_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            list_scenarios();
            Ok(())
        }
        Commands::Run(ref args) => run(&cli, args).await,
    }
}

fn list_scenarios() {
    for scenario in Scenario::ALL {
        println!("{}", scenario.name().bold());
        println!("  job file: {}", scenario.fixture().file_name());
        println!("  expects:  {}", scenario.expected_files());
    }
}

async fn run(cli: &Cli, args: &RunArgs) -> Result<()> {
    let config = build_config(cli, args);
    config.validate().context("Invalid configuration")?;
    info!(
        "Running against {} (wait timeout {:?}, poll interval {:?})",
        config.nomad_addr, config.wait_timeout, config.poll_interval
    );

    let scenarios = if args.scenarios.is_empty() {
        Scenario::ALL.to_vec()
    } else {
        args.scenarios.clone()
    };

    let client = connect(&config);
    let suite = Suite::new(SuiteContext::new(Arc::new(client), config), scenarios);

    let report = suite.run().await.context("Suite setup failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        report.print_summary();
    }

    if !report.is_success() {
        anyhow::bail!("{} scenario(s) failed", report.failed());
    }

    Ok(())
}

fn build_config(cli: &Cli, args: &RunArgs) -> Config {
    let mut config = Config::new(cli.address.clone());
    config.token = cli.token.clone();
    config.namespace = cli.namespace.clone();
    config.region = cli.region.clone();
    config.wait_timeout = Duration::from_secs(args.wait_timeout);
    config.poll_interval = Duration::from_millis(args.poll_interval);
    config.min_ready_nodes = args.min_nodes;
    config.inputs_dir = args.inputs.clone();
    config.parallel = args.parallel;
    config.keep_jobs = args.keep_jobs;
    config
}
