//! `kimi`: query Kimi K2 Thinking via Chutes.ai

use anyhow::Context;
use clap::Parser;
use kimi_k2::config::presets;
use kimi_k2::repl;
use kimi_k2::{ChatClient, ChatSession, ChutesClient, ModelConfig, QueryMode};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const BANNER: &str = "\
=====================================================
  KIMI K2 THINKING
  Moonshot AI - Open Agentic Intelligence
=====================================================";

#[derive(Debug, Parser)]
#[command(name = "kimi")]
#[command(about = "Query Kimi K2 Thinking via Chutes.ai", long_about = None)]
struct Cli {
    /// Question for the model; interactive mode when omitted
    prompt: Vec<String>,

    /// Heavy mode: 8 parallel reasoning trajectories, hybridized server-side
    #[arg(long, conflicts_with = "simple")]
    heavy: bool,

    /// Simple mode: quick answer without extended reasoning
    #[arg(long)]
    simple: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    println!("{BANNER}");

    let client = ChutesClient::from_env().context(
        "could not configure the Chutes client; add CHUTES_API_KEY to ~/.env",
    )?;
    println!("Client configured: {}", client.endpoint());

    let model = ModelConfig::new(presets::KIMI_K2_THINKING_CHUTES);
    let session = ChatSession::new(Arc::new(client), model);

    if cli.prompt.is_empty() {
        return Ok(repl::run(&session, false).await?);
    }

    let prompt = cli.prompt.join(" ");
    let mode = if cli.heavy {
        println!("Heavy mode: 8 parallel trajectories");
        QueryMode::Heavy
    } else if cli.simple {
        println!("Simple mode: quick answer");
        QueryMode::Simple
    } else {
        QueryMode::Normal
    };

    println!("Model: {}\n", session.model().model);

    let outcome = session.ask(&prompt, mode).await?;
    repl::print_outcome(&outcome);

    Ok(())
}
