use anyhow::{Context, Result};
use std::io::Read;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use triage::signals::RawSignals;
use triage::{AgentConfig, AgentRunner};

/// Usage: `triage [signals.json]` (reads the batch from stdin when no path is given).
#[tokio::main]
async fn main() -> Result<()> {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    // 2. Load Batch
    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read signal batch {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read signal batch from stdin")?;
            buf
        }
    };
    let signals: RawSignals =
        serde_json::from_str(&raw).context("signal batch is not valid JSON")?;

    // 3. Run One Cycle
    let config = AgentConfig::from_env();
    tracing::info!(
        "Triage agent starting (delegate {}, memory {:?})",
        if config.delegate.enabled { "enabled" } else { "disabled" },
        config.memory_path
    );
    let mut agent = AgentRunner::from_config(&config);

    match agent.run_once(signals).await {
        Ok(incident_id) => {
            println!("{incident_id}");
            Ok(())
        }
        Err(e) => {
            let cycle = e.cycle();
            tracing::error!(
                "Cycle for observation {} not durably recorded (risk {:?})",
                cycle.observation.observation_id,
                cycle.decision.risk_level
            );
            Err(e.into())
        }
    }
}
