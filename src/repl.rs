//! Interactive REPL shared by the `kimi` and `okimi` binaries

use crate::error::Result;
use crate::session::{ChatSession, QueryMode, QueryOutcome};
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Print the answer, token usage, and cost of a finished query
pub fn print_outcome(outcome: &QueryOutcome) {
    println!("=== ANSWER ===\n");
    if outcome.content.is_empty() {
        println!("(no text content)");
    } else {
        println!("{}", outcome.content);
    }

    println!("\n=== TOKEN USAGE ===");
    println!("  Input:  {} tokens", outcome.usage.prompt_tokens);
    println!("  Output: {} tokens", outcome.usage.completion_tokens);
    println!("  Total:  {} tokens", outcome.usage.total_tokens);
    println!("  Estimated cost: ${:.6} USD", outcome.cost);
    if outcome.tool_rounds > 0 {
        println!("  Tool rounds: {}", outcome.tool_rounds);
    }
}

/// Run the interactive conversation loop.
///
/// `exit`/`quit` leaves; a `heavy:` prefix switches the query to heavy
/// mode, and (when `allow_web` is set) a `web:` prefix to web mode.
pub async fn run(session: &ChatSession, allow_web: bool) -> Result<()> {
    println!("\nInteractive mode. Type 'exit' or 'quit' to leave.");
    println!("Prefix a question with 'heavy:' for heavy mode.");
    if allow_web {
        println!("Prefix a question with 'web:' for web mode.");
    }
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("you > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let prompt = line.trim();

        if prompt.is_empty() {
            continue;
        }
        if matches!(prompt.to_lowercase().as_str(), "exit" | "quit") {
            println!("Bye!");
            break;
        }

        let (mode, prompt) = parse_prefixed(prompt, allow_web);

        match session.ask(prompt, mode).await {
            Ok(outcome) => {
                print_outcome(&outcome);
                println!();
            }
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    Ok(())
}

fn parse_prefixed(prompt: &str, allow_web: bool) -> (QueryMode, &str) {
    if let Some(rest) = strip_prefix_ignore_case(prompt, "heavy:") {
        return (QueryMode::Heavy, rest.trim_start());
    }
    if allow_web {
        if let Some(rest) = strip_prefix_ignore_case(prompt, "web:") {
            return (QueryMode::Web, rest.trim_start());
        }
    }
    (QueryMode::Normal, prompt)
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}
