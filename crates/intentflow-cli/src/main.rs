mod display;
mod input;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use intentflow_classify::KeywordClassifier;
use intentflow_core::{OutputTopology, RouterConfig};
use intentflow_router::Router;

#[derive(Parser)]
#[command(name = "intentflow", version, about = "Keyword intent classification and routing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the output channels a configuration produces.
    Topology {
        /// Router configuration (JSON).
        #[arg(short, long, env = "INTENTFLOW_CONFIG")]
        config: PathBuf,
    },
    /// Classify a single piece of text.
    Classify {
        #[arg(short, long, env = "INTENTFLOW_CONFIG")]
        config: PathBuf,
        text: String,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Route a batch of records and print the channels as JSON.
    Route {
        #[arg(short, long, env = "INTENTFLOW_CONFIG")]
        config: PathBuf,
        /// Records as a JSON array or JSON lines.
        #[arg(short, long)]
        input: PathBuf,
        /// Annotate failing records instead of aborting the batch.
        #[arg(long)]
        continue_on_fail: bool,
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("intentflow v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Command::Topology { config } => {
            let config = load_config(&config)?;
            let topology = OutputTopology::build(&config.intents, config.fallback)?;
            display::print_topology(&topology);
        }
        Command::Classify { config, text, json } => {
            let config = load_config(&config)?;
            let classifier =
                KeywordClassifier::new(config.case_sensitive, config.confidence_threshold);
            let result = classifier.score(&text, &config.intents);
            if json {
                println!("{}", display::classification_json(&result)?);
            } else {
                display::print_classification(&result);
            }
        }
        Command::Route {
            config,
            input,
            continue_on_fail,
            pretty,
        } => {
            let mut config = load_config(&config)?;
            config.continue_on_fail |= continue_on_fail;
            run_route(config, input, pretty).await?;
        }
    }
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<RouterConfig> {
    RouterConfig::load(path).with_context(|| format!("loading config {}", path.display()))
}

async fn run_route(config: RouterConfig, input: PathBuf, pretty: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let records = input::read_records(&input, &config.input_field)?;
    let router = Router::new(config).context("building router")?;
    eprintln!(
        "  Routing {} records into {} channels",
        records.len(),
        router.topology().len()
    );

    // Ctrl-C stops iteration between records; whatever was routed is kept.
    let cancel = Arc::new(AtomicBool::new(false));
    let signal_flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after current record");
            signal_flag.store(true, Ordering::Relaxed);
        }
    });

    let (router, batch) = tokio::task::spawn_blocking(move || {
        let batch = router.route_batch_until(records, &cancel);
        (router, batch)
    })
    .await
    .context("routing task panicked")?;
    let batch = batch?;

    let out = display::channels_json(router.topology(), &batch)?;
    let rendered = if pretty {
        serde_json::to_string_pretty(&out)?
    } else {
        serde_json::to_string(&out)?
    };
    println!("{rendered}");

    display::print_summary(router.topology(), &batch);
    eprintln!("  Done in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
