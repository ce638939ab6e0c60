//! Minimal CLI harness for exercising the roster engine end to end: reads
//! a JSON `RosterRequest` from a file, runs one solve, writes the JSON
//! `RosterResponse` to stdout. Not a network service and not part of the
//! core's contract (spec §1), just a way to drive the library by hand.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scheduling_service::{solve_to_response, RosterRequest};
use shared::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scheduling_service=info,roster_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let input_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: roster-cli <request.json>")?;

    let settings = Settings::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "failed to load settings, falling back to defaults");
        shared::Settings {
            solver: shared::SolverSettings::default(),
        }
    });

    let raw = std::fs::read_to_string(&input_path)
        .with_context(|| format!("reading {}", input_path.display()))?;
    let request: RosterRequest =
        serde_json::from_str(&raw).context("parsing roster request JSON")?;

    tracing::info!(path = %input_path.display(), "loaded roster request");

    // The solve itself is a synchronous, CPU-bound call; running it on a
    // blocking thread keeps a long search from stalling the async runtime,
    // the same separation the teacher's `job_processor.rs` draws between
    // request handling and scheduling work.
    let settings_clone = settings.solver.clone();
    let response = tokio::task::spawn_blocking(move || solve_to_response(&request, &settings_clone))
        .await
        .context("solve task panicked")??;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.success {
        tracing::warn!(status = %response.status, "solve did not produce a roster");
        std::process::exit(1);
    }

    Ok(())
}
