use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use vault_emptier::cli::{VaultArgs, run_config};
use vault_emptier::config::build_glacier_client;
use vault_emptier::glacier::GlacierStore;
use vault_emptier::{Orchestrator, TracingObserver, logging};

#[derive(Parser, Debug)]
#[command(name = "empty_vault")]
struct Args {
    #[command(flatten)]
    vault: VaultArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let cfg = run_config(&args.vault)?;
    info!(
        region = %cfg.region,
        profile = %cfg.profile,
        vault = %cfg.vault,
        "emptying vault"
    );
    let client = build_glacier_client(&cfg).await?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; abandoning the current request");
            on_ctrl_c.cancel();
        }
    });

    let vault = cfg.vault.clone();
    let mut orchestrator = Orchestrator::new(GlacierStore::new(client), cfg);
    let summary = orchestrator
        .run(&TracingObserver, &cancel)
        .await
        .with_context(|| format!("emptying vault {vault}"))?;

    println!(
        "[empty_vault] total={} deleted={} failed={}",
        summary.total, summary.succeeded, summary.failed
    );
    for f in &summary.failures {
        println!("[empty_vault] failed archive_id={} error={}", f.archive_id, f.error);
    }
    Ok(())
}
