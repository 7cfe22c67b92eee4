//! WordWarden CLI
//!
//! Classifies chat messages from the command line (or stdin, one message per
//! line) with a tenant's profanity filter.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use wordwarden_core::{MatchRule, Verdict};
use wordwarden_filter::{Classifier, ProfanityFilter, TenantFilters};

mod config;

use config::{split_list, Overrides};

#[derive(Parser, Debug)]
#[command(name = "wordwarden")]
#[command(about = "Classify chat messages against prohibited terms", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "wordwarden.yaml")]
    config: String,

    /// Tenant whose filter classifies the messages
    #[arg(short, long, default_value = "default")]
    tenant: String,

    /// Extra prohibited terms, comma-separated
    #[arg(long)]
    terms: Option<String>,

    /// Replacement whitelist, comma-separated
    #[arg(long)]
    whitelist: Option<String>,

    /// Print one JSON object per message
    #[arg(long)]
    json: bool,

    /// Print Prometheus metrics after classifying
    #[arg(long)]
    metrics: bool,

    /// Explain how a single word is treated instead of classifying
    #[arg(long, value_name = "WORD")]
    explain: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Messages to classify; read from stdin when omitted
    messages: Vec<String>,
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    message: &'a str,
    blocked: bool,
    matched_terms: &'a [String],
}

#[derive(Serialize)]
struct ExplainOutput<'a> {
    word: &'a str,
    in_safe: bool,
    in_prohibited: bool,
    safe_size: usize,
    prohibited_size: usize,
    matched_term: Option<&'a str>,
    rule: Option<MatchRule>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let metrics_handle = if cli.metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    let overrides = Overrides {
        tenant: cli.tenant.clone(),
        terms: cli.terms.as_deref().map(split_list).unwrap_or_default(),
        whitelist: cli.whitelist.as_deref().map(split_list),
    };
    let config = config::load(&cli.config, &overrides)?;
    info!("Configured tenants: {}", config.tenants.len());

    let registry = TenantFilters::from_config(&config)?;
    let filter = registry.get_or_create(&cli.tenant)?;

    if let Some(word) = &cli.explain {
        explain(&filter, word, cli.json)?;
    } else if cli.messages.is_empty() {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            report(&line, &filter.classify(&line).await, cli.json)?;
        }
    } else {
        let verdicts = filter.classify_all(&cli.messages).await;
        for (message, verdict) in cli.messages.iter().zip(&verdicts) {
            report(message, verdict, cli.json)?;
        }
    }

    let stats = filter.stats();
    info!(
        "Classified {} messages ({} blocked, {} cache hits, avg {}us)",
        stats.calls,
        stats.blocked,
        stats.cache_hits,
        stats.avg_latency_us()
    );

    if let Some(handle) = metrics_handle {
        print!("{}", handle.render());
    }

    Ok(())
}

fn report(message: &str, verdict: &Verdict, json: bool) -> Result<()> {
    if json {
        let output = MessageOutput {
            message,
            blocked: verdict.blocked,
            matched_terms: &verdict.matched_terms,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if verdict.blocked {
        println!("BLOCKED [{}] {}", verdict.matched_terms.join(", "), message);
    } else {
        println!("ok {}", message);
    }
    Ok(())
}

fn explain(filter: &ProfanityFilter, word: &str, json: bool) -> Result<()> {
    let report = filter.explain(word);
    if json {
        let output = ExplainOutput {
            word: &report.word,
            in_safe: report.in_safe,
            in_prohibited: report.in_prohibited,
            safe_size: report.safe_size,
            prohibited_size: report.prohibited_size,
            matched_term: report.decision.as_ref().map(|m| m.term.as_str()),
            rule: report.decision.as_ref().map(|m| m.rule),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("word:            {}", report.word);
    println!("safe:            {} (of {})", report.in_safe, report.safe_size);
    println!(
        "prohibited:      {} (of {})",
        report.in_prohibited, report.prohibited_size
    );
    match &report.decision {
        Some(found) => println!("decision:        blocked as {} ({})", found.term, found.rule),
        None => println!("decision:        allowed"),
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("wordwarden=debug,wordwarden_filter=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("wordwarden=info,wordwarden_filter=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "wordwarden_messages_total",
        "Messages classified, by tenant and outcome"
    );
    metrics::describe_counter!(
        "wordwarden_cache_hits_total",
        "Verdicts served from the cache, by tenant"
    );
    metrics::describe_counter!(
        "wordwarden_terms_matched_total",
        "Candidates blocked, by tenant and rule"
    );
    metrics::describe_histogram!(
        "wordwarden_classify_latency_us",
        metrics::Unit::Microseconds,
        "Classification latency in microseconds for computed verdicts"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
