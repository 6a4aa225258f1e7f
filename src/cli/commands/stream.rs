//! Quote streaming command implementation.

use anyhow::{Context, Result};
use capital_broker::{QuoteRouter, QuoteStreamClient};
use capital_config::{AppConfig, StreamSettings};
use capital_monitor::ConsoleSink;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::StreamArgs;

pub async fn run(args: StreamArgs, config: &AppConfig) -> Result<()> {
    config.validate()?;

    let (_client, session) = super::connect(config).await?;

    let router = console_router(&config.stream);
    let stream_config = config.stream.stream_config(&config.api.stream_url);
    let mut stream = QuoteStreamClient::new(stream_config, router);

    let cancel = CancellationToken::new();
    spawn_stop_signals(
        cancel.clone(),
        args.duration.or(config.stream.duration_secs),
    );

    let summary = stream
        .run(&session, cancel.clone())
        .await
        .context("Quote stream failed")?;
    cancel.cancel();

    println!(
        "Stream ended ({:?}): {} frames, {} quotes displayed",
        summary.end, summary.frames, summary.quotes_displayed
    );
    Ok(())
}

/// Router with a console sink for every displayed epic.
fn console_router(settings: &StreamSettings) -> QuoteRouter {
    let mut router = QuoteRouter::new();
    for epic in settings.display_epics() {
        router.register(epic.clone(), ConsoleSink::stdout());
    }
    router
}

/// Cancel on Ctrl-C, or once `duration` seconds have passed.
fn spawn_stop_signals(cancel: CancellationToken, duration: Option<u64>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        let deadline = async {
            match duration {
                Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            () = cancel.cancelled() => {}
            () = ctrl_c => {
                info!("Ctrl-C received, stopping stream");
                cancel.cancel();
            }
            () = deadline => {
                info!(?duration, "Stream duration elapsed");
                cancel.cancel();
            }
        }
    });
}
