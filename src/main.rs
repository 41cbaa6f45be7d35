mod analyze;
mod config;
mod db;
mod fetch;
mod phrases;
mod pipeline;
mod search;

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use analyze::Verdict;
use config::ScoutConfig;

#[derive(Parser)]
#[command(name = "leadscout", about = "Regional e-commerce storefront discovery")]
struct Cli {
    /// JSON config overriding keyword lists and scoring policy
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the local lead store
    Init,
    /// Search fresh phrases and analyze discovered candidates
    Discover {
        /// Only this phrase category
        #[arg(short, long)]
        category: Option<String>,
        /// Max phrases per category (default: all fresh)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Results requested per query
        #[arg(long, default_value = "10")]
        num: u32,
        /// Hand-curated phrases JSON file ({category: [phrase, ..]})
        #[arg(long)]
        phrases: Option<PathBuf>,
    },
    /// Analyze one URL and print the verdict (nothing is saved)
    Analyze { url: String },
    /// Recent leads table
    Leads {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Lead store statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let cfg = Arc::new(ScoutConfig::load(cli.config.as_deref())?);

    let result = match cli.command {
        Commands::Init => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            println!("Lead store ready.");
            Ok(())
        }
        Commands::Discover {
            category,
            limit,
            num,
            phrases,
        } => discover(cfg, category, limit, num, phrases).await,
        Commands::Analyze { url } => analyze_one(&cfg, &url).await,
        Commands::Leads { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_leads(&conn, limit)?;
            if rows.is_empty() {
                println!("No leads yet. Run 'discover' first.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<34} | {:<26} | {:<14} | {:>5} | {:<19}",
                "#", "URL", "Email", "Phone", "Score", "Discovered"
            );
            println!("{}", "-".repeat(116));
            for (i, r) in rows.iter().enumerate() {
                // Email may hold several addresses; show the first
                let email = r.email.lines().next().unwrap_or("");
                println!(
                    "{:>3} | {:<34} | {:<26} | {:<14} | {:>5.1} | {:<19}",
                    i + 1,
                    truncate(&r.url, 34),
                    truncate(email, 26),
                    r.phone,
                    r.score,
                    r.discovered_at
                );
            }

            // Social handles in a separate section to avoid clutter
            let with_ig: Vec<_> = rows.iter().filter(|r| !r.instagram.is_empty()).collect();
            if !with_ig.is_empty() {
                println!("\n--- Instagram ---");
                for r in &with_ig {
                    println!("  {}: {}", truncate(&r.url, 34), r.instagram);
                }
            }

            println!("\n{} leads", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Leads:        {}", s.leads);
            println!("With email:   {}", s.with_email);
            println!("With phone:   {}", s.with_phone);
            println!("With social:  {}", s.with_social);
            println!("Phrases used: {}", s.phrases_used);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

#[derive(Default)]
struct DiscoverCounts {
    queries: usize,
    candidates: usize,
    accepted: usize,
    rejected: usize,
    failed: usize,
}

impl DiscoverCounts {
    fn print(&self) {
        println!(
            "Ran {} queries: {} candidates, {} leads saved, {} rejected, {} unreachable.",
            self.queries, self.candidates, self.accepted, self.rejected, self.failed,
        );
    }
}

async fn discover(
    cfg: Arc<ScoutConfig>,
    category: Option<String>,
    limit: Option<usize>,
    num: u32,
    phrases_file: Option<PathBuf>,
) -> Result<()> {
    // The only fatal condition: missing discovery credentials, checked
    // before any pipeline work begins.
    let api_key = std::env::var("SERPER_API_KEY")
        .map_err(|_| anyhow::anyhow!("SERPER_API_KEY environment variable must be set"))?;

    let conn = db::connect()?;
    db::init_schema(&conn)?;

    let mut existing = db::existing_urls(&conn)?;
    info!("Loaded {} existing lead URLs", existing.len());

    let manual = match &phrases_file {
        Some(p) => phrases::load_manual(p)?,
        None => BTreeMap::new(),
    };
    let used = db::used_phrases(&conn)?;
    let mut fresh = phrases::fresh(manual, &used);
    if let Some(cat) = &category {
        fresh.retain(|k, _| k == cat);
    }
    if fresh.is_empty() {
        println!("No fresh phrases to search. Add manual phrases or clear the log.");
        return Ok(());
    }

    let client = fetch::client(&cfg)?;
    let mut totals = DiscoverCounts::default();

    for (cat, mut phrase_list) in fresh {
        if let Some(n) = limit {
            phrase_list.truncate(n);
        }
        println!("--- {}: searching {} fresh phrases ---", cat, phrase_list.len());

        let mut candidates: HashSet<String> = HashSet::new();
        for phrase in &phrase_list {
            info!("Searching: {}", phrase);
            match search::search(&client, &api_key, phrase, num).await {
                Ok(hits) => {
                    for hit in hits {
                        if let Some(url) = analyze::normalize::normalize(&hit.link, &cfg) {
                            if !existing.contains(&url) {
                                candidates.insert(url);
                            }
                        }
                    }
                    totals.queries += 1;
                    db::mark_phrase_used(&conn, phrase)?;
                }
                // A failed query is zero results, never a dead run
                Err(e) => error!("Search failed for '{}': {:#}", phrase, e),
            }
        }

        if candidates.is_empty() {
            info!("No new candidates in {}", cat);
            continue;
        }

        println!("Analyzing {} candidates...", candidates.len());
        let stats = pipeline::analyze_streaming(
            &conn,
            &client,
            Arc::clone(&cfg),
            candidates.into_iter().collect(),
            &mut existing,
        )
        .await?;

        totals.candidates += stats.total;
        totals.accepted += stats.accepted;
        totals.rejected += stats.rejected;
        totals.failed += stats.failed;
    }

    totals.print();
    Ok(())
}

async fn analyze_one(cfg: &ScoutConfig, url: &str) -> Result<()> {
    let normalized = match analyze::normalize::normalize(url, cfg) {
        Some(u) => u,
        None => {
            println!("Rejected by the normalizer (malformed, blacklisted, or non-storefront path).");
            return Ok(());
        }
    };

    let client = fetch::client(cfg)?;
    match analyze::analyze_url(&client, cfg, &normalized).await {
        Ok(Verdict::Accepted { score, lead }) => {
            println!("ACCEPTED (score {:.1}/2): {}", score, lead.url);
            println!("  email:   {}", lead.email.as_deref().unwrap_or("-"));
            println!("  phone:   {}", lead.phone.as_deref().unwrap_or("-"));
            println!("  founder: {}", lead.founder.as_deref().unwrap_or("-"));
            for (platform, link) in &lead.social_links {
                println!("  {}: {}", platform, link);
            }
        }
        Ok(Verdict::RejectedNotCommerce) => {
            println!("REJECTED: no strong e-commerce signals.");
        }
        Ok(Verdict::RejectedNegativeContent { keyword }) => {
            println!("REJECTED: blacklisted content keyword '{}'.", keyword);
        }
        Ok(Verdict::RejectedLowConfidence { score }) => {
            println!("REJECTED: score {:.1}/2 below threshold.", score);
        }
        Err(e) => {
            println!("Could not access the site: {:#}", e);
        }
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
