use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::analyze::{self, Verdict};
use crate::config::ScoutConfig;
use crate::db;

/// Counters for one batch of candidate URLs.
#[derive(Debug, Default)]
pub struct RunStats {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
}

struct UrlResult {
    url: String,
    outcome: Result<Verdict>,
}

/// Run the per-URL pipeline over a batch with a fixed-size worker pool,
/// appending each accepted lead to the sink as it arrives. A worker failure
/// only costs that URL; accepted URLs join the in-memory dedup set so the
/// same host is not reprocessed later in the run.
pub async fn analyze_streaming(
    conn: &Connection,
    client: &reqwest::Client,
    cfg: Arc<ScoutConfig>,
    urls: Vec<String>,
    existing: &mut HashSet<String>,
) -> Result<RunStats> {
    let semaphore = Arc::new(Semaphore::new(cfg.workers.max(1)));
    let total = urls.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Channel: workers send verdicts, main loop owns the sink.
    let (tx, mut rx) = tokio::sync::mpsc::channel::<UrlResult>(cfg.workers.max(1) * 2);

    for url in urls {
        let client = client.clone();
        let cfg = Arc::clone(&cfg);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let _permit = sem.acquire().await.unwrap();
            let outcome = analyze::analyze_url(&client, &cfg, &url).await;
            let _ = tx.send(UrlResult { url, outcome }).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut stats = RunStats {
        total,
        ..Default::default()
    };

    while let Some(result) = rx.recv().await {
        match result.outcome {
            Ok(Verdict::Accepted { score, lead }) => {
                info!("Accepted {} (score {:.1}/2)", lead.url, score);
                match db::insert_lead(conn, &lead, score) {
                    Ok(true) => {
                        existing.insert(lead.url.clone());
                        stats.accepted += 1;
                    }
                    Ok(false) => {
                        // Already in the sink; count as known, not new.
                        existing.insert(lead.url.clone());
                    }
                    Err(e) => {
                        // Sink failure never aborts the batch.
                        error!("Could not save lead {}: {}", lead.url, e);
                    }
                }
            }
            Ok(Verdict::RejectedNotCommerce) => {
                info!("Rejected {} (no commerce signals)", result.url);
                stats.rejected += 1;
            }
            Ok(Verdict::RejectedNegativeContent { keyword }) => {
                info!("Rejected {} (blacklisted content: {})", result.url, keyword);
                stats.rejected += 1;
            }
            Ok(Verdict::RejectedLowConfidence { score }) => {
                info!("Rejected {} (score {:.1} below threshold)", result.url, score);
                stats.rejected += 1;
            }
            Err(e) => {
                warn!("No lead for {}: {:#}", result.url, e);
                stats.failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Batch done: {} candidates, {} accepted, {} rejected, {} failed",
        stats.total, stats.accepted, stats.rejected, stats.failed
    );

    Ok(stats)
}
