use std::future::Future;
use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Command, CommandFactory, Parser};
use clap_complete::{generate, Generator, Shell};
use console::style;
use tracing_subscriber::EnvFilter;

mod cluster;
mod config;
mod env;
mod error;

use crate::cluster::KubeCluster;
use crate::config::Config;
use crate::env::yank_env;
use crate::error::Error;

/// Print the resolved values of environment variables declared on a pod or deployment.
#[derive(Debug, Parser)]
#[command(name = "kyank", author, version, about, long_about = None)] // Read from `Cargo.toml`
pub struct Cli {
    // If provided, outputs the completion file for given shell
    #[arg(long = "generate", value_enum)]
    generator: Option<Shell>,
    /// Kubernetes namespace
    #[arg(short, long, env = "KYANK_K8S_NAMESPACE")]
    namespace: Option<String>,
    /// Kubeconfig context to use instead of the current one
    #[arg(short, long, env = "KYANK_K8S_CONTEXT")]
    context: Option<String>,
    /// Pod to read from
    #[arg(short, long = "pod-id")]
    pod_id: Option<String>,
    /// Deployment whose pod template is read
    #[arg(short, long)]
    deployment: Option<String>,
    /// Environment variables to look up; repeat or separate with commas
    #[arg(short, long = "env", value_delimiter = ',')]
    env: Vec<String>,
    /// Text prepended to each line, e.g. 'export '
    #[arg(long, env = "KYANK_PREFIX")]
    prefix: Option<String>,
    /// Text appended to each line
    #[arg(long, env = "KYANK_SUFFIX")]
    suffix: Option<String>,
    /// Text between key and value, e.g. ': ' for 'KEY: VALUE'
    #[arg(long, env = "KYANK_SEPARATOR", default_value = "=")]
    separator: String,
    /// Seconds allowed for the whole run, cluster calls included
    #[arg(long, env = "KYANK_TIMEOUT", default_value_t = 30)]
    timeout: u64,
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut std::io::stdout());
}

fn init_tracing() {
    // stdout carries the variable lines, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Some(generator) = cli.generator {
        let mut cmd = Cli::command();
        eprintln!("Generating completion file for {generator:?}...");
        print_completions(generator, &mut cmd);
        return;
    }

    if let Err(err) = run(cli).await {
        eprintln!("{} {err:#}", style("kyank:").red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::try_from(cli)?;
    tracing::debug!(?config, "starting");

    let lines = with_deadline(config.timeout, yank(&config))
        .await
        .with_context(|| {
            format!(
                "failed to read env from {} in namespace {}",
                config.target, config.cluster.namespace
            )
        })?;

    let mut stdout = std::io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{line}")?;
    }

    Ok(())
}

/// Runs `work` under a single deadline; running out of time is an access failure.
async fn with_deadline<F, T>(deadline: Duration, work: F) -> error::Result<T>
where
    F: Future<Output = error::Result<T>>,
{
    tokio::time::timeout(deadline, work)
        .await
        .map_err(|elapsed| {
            Error::access(format!("cluster within {}s", deadline.as_secs()), elapsed)
        })?
}

async fn yank(config: &Config) -> error::Result<Vec<String>> {
    let cluster = KubeCluster::connect(&config.cluster).await?;
    yank_env(&cluster, &config.target, &config.wanted, &config.format).await
}
