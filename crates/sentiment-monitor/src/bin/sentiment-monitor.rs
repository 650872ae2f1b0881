//! Market Sentiment Monitor CLI
//!
//! An interactive terminal dashboard for price history, news sentiment and
//! questions to a chat backend.
//!
//! # Usage
//!
//! ```bash
//! # Set up environment variables (or a .env file)
//! export OPENAI_API_KEY="sk-..."
//! export CHAT_API_URL="http://localhost:3000/api/v1/prediction/<flow-id>"
//!
//! # Run the dashboard
//! cargo run --bin sentiment-monitor -p sentiment-monitor
//!
//! # Or run commands once and exit
//! cargo run --bin sentiment-monitor -- -c "/select NVDA, AMD" -c /news
//! ```

use clap::Parser;
use sentiment_llm::providers::{OPENAI_API_BASE, OpenAIConfig, OpenAIProvider};
use sentiment_monitor::{Dashboard, DashboardReply, MonitorConfig};
use sentiment_utils::{Config, env_or, init_tracing, load_env};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sentiment-monitor")]
#[command(about = "Market sentiment dashboard for a handful of tickers", long_about = None)]
struct Args {
    /// Initial stock selection, comma separated (max 5)
    #[arg(short, long, env = "SENTIMENT_TICKERS")]
    tickers: Option<String>,

    /// Model used for sentiment classification
    #[arg(short, long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_API_BASE")]
    api_base: Option<String>,

    /// Chat backend endpoint
    #[arg(long, env = "CHAT_API_URL")]
    chat_url: Option<String>,

    /// Classification calls in flight at once
    #[arg(long, env = "SENTIMENT_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Run these commands and exit instead of starting the prompt
    #[arg(short, long)]
    command: Vec<String>,
}

fn print_banner() {
    println!(
        r"
╔══════════════════════════════════════════════════════════════╗
║                  Market Sentiment Monitor                    ║
║                                                              ║
║  Commands:                                                   ║
║    /prices [T1, T2]   - Stock price history                  ║
║    /select T1, T2     - Set selected stocks (max 5)          ║
║    /news              - News sentiment analysis              ║
║    /overall           - News, social and report sentiment    ║
║    /history           - Chat transcript                      ║
║    /help              - Help                                 ║
║    /exit              - Exit                                 ║
║                                                              ║
║  Or ask a question, e.g. what is the ticker of a firm?       ║
╚══════════════════════════════════════════════════════════════╝
"
    );
}

fn get_provider_config(args: &Args) -> OpenAIConfig {
    let api_base = args
        .api_base
        .clone()
        .unwrap_or_else(|| env_or("OPENAI_API_BASE", OPENAI_API_BASE));

    let config = match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => OpenAIConfig::new(key).with_api_base(api_base),
        _ => OpenAIConfig::local(api_base),
    };
    config.with_timeout(Duration::from_secs(180))
}

fn build_config(args: &Args) -> anyhow::Result<MonitorConfig> {
    let mut builder = MonitorConfig::builder();
    if let Some(model) = &args.model {
        builder = builder.model(model);
    }
    if let Some(url) = &args.chat_url {
        builder = builder.chat_api_url(url);
    }
    if let Some(concurrency) = args.concurrency {
        builder = builder.classify_concurrency(concurrency);
    }
    if let Some(tickers) = &args.tickers {
        builder = builder.default_selection(tickers);
    }
    Ok(builder.with_env()?.build()?)
}

fn print_reply(reply: &DashboardReply) {
    if let DashboardReply::Output(text) = reply {
        println!("{text}\n");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let found_dotenv = load_env();
    let app_config = Config::from_env()?;
    init_tracing("warn,sentiment_monitor=info", app_config.log_format);

    let args = Args::parse();
    info!(dotenv = found_dotenv, environment = %app_config.environment, "Starting sentiment-monitor");

    let config = build_config(&args)?;
    let openai_config = get_provider_config(&args);

    let provider = Arc::new(OpenAIProvider::with_config(openai_config.clone())?);
    let mut dashboard = Dashboard::with_provider(provider, config.clone())?;

    if !args.command.is_empty() {
        for reply in dashboard.run_script(&args.command).await {
            match reply {
                Ok(reply) => print_reply(&reply),
                Err(e) => eprintln!("Error: {e}\n"),
            }
        }
        return Ok(());
    }

    print_banner();
    println!("Configuration:");
    println!("  API Base: {}", openai_config.api_base);
    println!("  Model: {}", config.model);
    println!(
        "  Chat endpoint: {}",
        config.chat_api_url.as_deref().unwrap_or("(not set)")
    );
    println!("  Selected stocks: {}", dashboard.session().selection());
    println!("Ready!\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", dashboard.prompt());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match dashboard.process_input(input).await {
            Ok(DashboardReply::Exit) => {
                println!("Goodbye!");
                break;
            }
            Ok(reply) => print_reply(&reply),
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    Ok(())
}
