//! Video Comment Sentiment Analyzer
//!
//! Command-line host for the analysis pipeline.

use clap::{Parser, Subcommand};
use comment_sentiment::{
    config::Config,
    filter::{CommentFilter, SpamClassifier},
    pipeline::{AnalysisReport, Analyzer},
    sentiment::SentimentAggregator,
    source::YouTubeClient,
    storage::{AnalysisStore, SqliteStore},
    types::{Emphasis, FetchBudget, SentimentClass},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "comment-sentiment")]
#[command(about = "Sentiment analysis of YouTube video comments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (defaults are searched when omitted)
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, filter and score the comments of a video
    Analyze {
        /// Video URL
        url: String,
        /// Do not store the analysis
        #[arg(long)]
        no_save: bool,
        /// Maximum non-spam comments to collect
        #[arg(long)]
        max_fetch: Option<usize>,
        /// Maximum comments to keep after ranking by likes
        #[arg(long)]
        max_return: Option<usize>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List previously analyzed videos
    History,
    /// Score a single piece of text
    Score {
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    match cli.command {
        Commands::Analyze {
            url,
            no_save,
            max_fetch,
            max_return,
            json,
        } => {
            let defaults = config.fetch.budget();
            let budget = FetchBudget::new(
                max_fetch.unwrap_or(defaults.max_fetch),
                max_return.unwrap_or(defaults.max_return),
            );
            analyze(config, &url, budget, !no_save, json).await
        }
        Commands::History => show_history(config).await,
        Commands::Score { text } => {
            score_text(&text);
            Ok(())
        }
    }
}

async fn analyze(
    config: Config,
    url: &str,
    budget: FetchBudget,
    persist: bool,
    json: bool,
) -> anyhow::Result<()> {
    let client = Arc::new(YouTubeClient::new(&config.youtube)?);
    let analyzer = Analyzer::new(client.clone(), client)
        .with_budget(budget)
        .with_page_delay(config.youtube.page_delay());

    let report = match analyzer.analyze(url).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if persist {
        let store = SqliteStore::connect(&config.database.path).await?;
        let elapsed = analyzer.persist(&store, &report).await?;
        println!(
            "\nRecords inserted to {}, it took {:.2} seconds",
            config.database.path,
            elapsed.as_secs_f64()
        );
    }

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("Analyzing: {} ({})", report.title, report.video_id);

    if report.is_empty() {
        println!("No comments left after filtering.");
        return;
    }

    let counts = &report.result.counts;
    println!("\n=== Sentiment ===");
    for class in SentimentClass::ALL {
        println!(
            "  {:<9} {:>5}  ({:.1}%)",
            class,
            counts.get(class),
            counts.share(class) * 100.0
        );
    }

    println!("\n=== Top Comments ===");
    for class in SentimentClass::ALL {
        match report.result.top.get(class) {
            Some(top) => println!("  {}: {} (score: {:.4})", class, one_line(&top.comment.text), top.score),
            None => println!("  {}: none", class),
        }
    }

    println!("\n=== Comments ===");
    println!("  {:>7}  {:>8}   {:<9}  Comment", "Likes", "Score", "Label");
    for scored in &report.comments {
        let mark = match Emphasis::from_score(scored.score) {
            Emphasis::StrongPositive => '+',
            Emphasis::StrongNegative => '-',
            Emphasis::Muted => ' ',
        };
        println!(
            "  {:>7}  {:>8.4}{} {:<9}  {}",
            scored.comment.engagement,
            scored.score,
            mark,
            scored.class(),
            one_line(&scored.comment.text)
        );
    }
}

async fn show_history(config: Config) -> anyhow::Result<()> {
    let store = SqliteStore::connect(&config.database.path).await?;
    let videos = store.list_videos().await?;

    if videos.is_empty() {
        println!("No analysis history found.");
        return Ok(());
    }

    println!("\n=== Analyzed Videos ===\n");
    for video in videos {
        println!(
            "  {} ({})  {}  {}",
            video.title,
            video.video_id,
            video.analyzed_at.format("%Y-%m-%d %H:%M"),
            video.link
        );
    }

    Ok(())
}

fn score_text(text: &str) {
    let aggregator = SentimentAggregator::new();
    let score = aggregator.score(text);
    println!("Score: {:.4}", score);
    println!("Label: {}", SentimentClass::from_score(score));
    println!("Spam:  {}", SpamClassifier::new().is_spam(text));
}

fn one_line(text: &str) -> String {
    text.replace('\n', " ")
}
