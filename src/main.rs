use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskfan::utils::shutdown_signal;
use taskfan::{Dispatcher, DispatcherConfig, WorkloadSpec};

/// Dispatch a random batch of latency and compute tasks over a bounded worker pool.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct App {
    #[clap(flatten)]
    pub dispatcher: DispatcherConfig,

    #[clap(flatten)]
    pub workload: WorkloadSpec,

    /// JSON dispatcher config; replaces the dispatcher flags when given
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<ExitCode> {
    let args = App::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                eprintln!("No environment variables found that can initialize tracing_subscriber::EnvFilter. Using defaults.");
                "taskfan=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(path) => DispatcherConfig::from_json_file(path)?,
        None => args.dispatcher.clone(),
    };
    tracing::info!(?config, "starting dispatcher");

    let dispatcher = Dispatcher::new(config)?;
    let mut rng = dispatcher.config().rng();
    let descriptors = args.workload.generate(&mut rng)?;
    let mut results = dispatcher.submit_batch_with_rng(descriptors, &mut rng)?;

    let started = Instant::now();
    let (mut ok, mut failed) = (0usize, 0usize);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = results.next_result() => {
                let Some(result) = result else { break };
                match result.outcome {
                    Ok(value) => {
                        ok += 1;
                        println!("task {:>4}  ok      {}", result.id, value);
                    }
                    Err(failure) => {
                        failed += 1;
                        println!("task {:>4}  failed  {}", result.id, failure);
                    }
                }
            }
            _ = &mut shutdown => {
                tracing::warn!(pending = results.remaining(), "interrupted, discarding queued tasks");
                drop(results);
                // Leaving through the runtime would block on the tasks still in flight.
                std::process::exit(130);
            }
        }
    }

    tracing::info!(ok, failed, elapsed = ?started.elapsed(), "batch finished");
    Ok(ExitCode::SUCCESS)
}
