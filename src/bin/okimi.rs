//! `okimi`: query Kimi K2 Thinking via OpenRouter
//!
//! Same wrapper as `kimi`, but through the OpenRouter gateway; adds web
//! mode (tool calling against a local SearXNG instance) and account balance
//! reporting after each query.

use anyhow::Context;
use clap::Parser;
use kimi_k2::config::presets;
use kimi_k2::repl;
use kimi_k2::tools::SearxngTool;
use kimi_k2::{
    ChatClient, ChatSession, CreditsBalance, ModelConfig, OpenRouterClient, QueryMode, Tool,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const BANNER: &str = "\
=====================================================
  KIMI K2 THINKING (OpenRouter)
  Moonshot AI - Open Agentic Intelligence
=====================================================";

#[derive(Debug, Parser)]
#[command(name = "okimi")]
#[command(about = "Query Kimi K2 Thinking via OpenRouter", long_about = None)]
struct Cli {
    /// Question for the model; interactive mode when omitted
    prompt: Vec<String>,

    /// Heavy mode: 8 parallel trajectories plus tools
    #[arg(long, conflicts_with_all = ["simple", "web"])]
    heavy: bool,

    /// Simple mode: quick answer without extended reasoning
    #[arg(long, conflicts_with = "web")]
    simple: bool,

    /// Web mode: reasoning plus the web-search tool (single trajectory)
    #[arg(long)]
    web: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    println!("{BANNER}");

    let client = Arc::new(OpenRouterClient::from_env().context(
        "could not configure the OpenRouter client; add OPENROUTER_API_KEY to ~/.env",
    )?);
    println!("Client configured: {}", client.endpoint());

    let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(SearxngTool::new()?)];
    let model = ModelConfig::new(presets::KIMI_K2_THINKING);
    let session = ChatSession::new(client.clone(), model).with_tools(tools);

    if cli.prompt.is_empty() {
        return Ok(repl::run(&session, true).await?);
    }

    let prompt = cli.prompt.join(" ");
    let mode = if cli.heavy {
        println!("Heavy mode: 8 parallel trajectories + tools");
        QueryMode::Heavy
    } else if cli.web {
        println!("Web mode: reasoning + tools");
        QueryMode::Web
    } else if cli.simple {
        println!("Simple mode: quick answer");
        QueryMode::Simple
    } else {
        QueryMode::Normal
    };

    println!("Model: {}\n", session.model().model);

    let outcome = session.ask(&prompt, mode).await?;
    repl::print_outcome(&outcome);

    // Balance reporting is best-effort; a failed probe never fails the query
    match client.credits().await {
        Ok(balance) => print_balance(&balance),
        Err(e) => eprintln!("Could not fetch balance: {e}"),
    }

    Ok(())
}

fn print_balance(balance: &CreditsBalance) {
    let remaining = balance.remaining();
    let marker = if remaining > 10.0 {
        "ok"
    } else if remaining > 5.0 {
        "low"
    } else {
        "LOW"
    };

    match balance {
        CreditsBalance::Prepaid {
            total_credits,
            total_usage,
        } => {
            println!(
                "  Balance: ${remaining:.2} USD [{marker}] (total: ${total_credits:.2} | spent: ${total_usage:.4})"
            );
        }
        CreditsBalance::Limited { limit, usage } => {
            println!(
                "  Balance: ${remaining:.2} USD [{marker}] (limit: ${limit:.2} | used: ${usage:.2})"
            );
        }
    }
}
