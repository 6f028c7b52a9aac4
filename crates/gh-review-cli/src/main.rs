//! gh-review: fetch a PR diff, fan it out to review analyzers, publish the
//! merged findings back as a GitHub review.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use gh_review_analyzer::{Analyzer, Category, GeminiAnalyzer, MockAnalyzer, ReviewRole};
use gh_review_client::{OctocrabClient, PrCoordinate};
use gh_review_config::{AppConfig, RetryPolicy};
use gh_review_engine::{ReviewRun, ReviewWorkflow, RunStatus};

#[derive(Debug, Parser)]
#[command(name = "gh-review", version, about = "AI-assisted pull request review")]
struct Args {
    /// Repository in "owner/repo" form
    repo: String,

    /// Pull request number
    pr_number: u64,

    /// Use canned mock analyzers instead of the model API
    #[arg(long)]
    mock: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            AppConfig::from_toml(&content)?
        }
        None => AppConfig::load(),
    };

    let target = PrCoordinate::parse(&args.repo, args.pr_number)?;

    let github = Arc::new(OctocrabClient::from_token(AppConfig::github_token()?)?);
    let analyzers = build_analyzers(&config, args.mock)?;

    let workflow = ReviewWorkflow::new(github, analyzers, config);
    let run = workflow.run(target).await;

    print_run(&run);
    Ok(exit_code(&run))
}

fn build_analyzers(config: &AppConfig, mock: bool) -> anyhow::Result<Vec<Arc<dyn Analyzer>>> {
    if mock {
        log::info!("Mock mode: no model API calls will be made");
        return Ok(ReviewRole::ALL
            .iter()
            .map(|&role| Arc::new(MockAnalyzer::new(role)) as Arc<dyn Analyzer>)
            .collect());
    }

    let api_key = AppConfig::gemini_api_key()?;
    let retry = RetryPolicy::from_config(&config.retry);

    Ok(ReviewRole::ALL
        .iter()
        .map(|&role| {
            Arc::new(GeminiAnalyzer::new(
                role,
                api_key.clone(),
                &config.analyzer,
                retry,
            )) as Arc<dyn Analyzer>
        })
        .collect())
}

fn print_run(run: &ReviewRun) {
    println!("\n{}", run.summary);

    for finding in &run.merged {
        let icon = match finding.category {
            Category::Bug => "🐛",
            Category::Security => "🔒",
            Category::Performance => "⚡",
            Category::Style | Category::Quality => "📐",
            Category::Other => "❓",
        };
        let line = finding
            .line
            .map(|l| l.to_string())
            .unwrap_or_else(|| "?".to_string());
        let path = finding.path.as_deref().unwrap_or("?");

        println!(
            "{} [{}] {}:{} {}",
            icon, finding.severity, path, line, finding.description
        );
        if !finding.fix.is_empty() {
            println!("   💡 Fix: {}", finding.fix);
        }
    }

    if !run.unit_failures.is_empty() {
        println!(
            "\n⚠ {} analyzer call(s) failed; results are partial.",
            run.unit_failures.len()
        );
    }

    match run.status() {
        Some(RunStatus::Published { review_id }) if run.used_fallback => {
            println!("\nPosted as plain comment {} (inline placement failed).", review_id);
        }
        Some(RunStatus::Published { review_id }) => {
            println!("\nPosted review {}.", review_id);
        }
        Some(RunStatus::DoneNoFindings) => {
            println!("\nNothing to post.");
        }
        Some(RunStatus::FailedAtFetch { reason }) => {
            println!("\nFetch failed: {}", reason);
        }
        Some(RunStatus::FailedAtPublish) => {
            println!("\nPublishing failed; findings are shown above.");
        }
        None => {}
    }

    println!("Outcome: {}", run.outcome_label());
}

/// Exit codes let scripts branch on the run outcome: success (published or
/// clean), partial analysis, publish failure, fetch failure.
fn exit_code(run: &ReviewRun) -> ExitCode {
    match run.outcome_label() {
        "published" | "done-no-findings" => ExitCode::SUCCESS,
        "partial-analysis" => ExitCode::from(3),
        "failed-at-publish" => ExitCode::from(4),
        "failed-at-fetch" => ExitCode::from(5),
        _ => ExitCode::from(1),
    }
}
