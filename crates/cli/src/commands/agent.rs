//! `syra agent`: one message, or a REPL until `exit` or EOF.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, bail};
use syra_agent::ConversationOrchestrator;
use syra_config::AppConfig;
use syra_core::event::{DomainEvent, EventBus};
use syra_core::turn::{TurnInput, TurnOutput};
use syra_providers::ProviderEngine;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

pub async fn run(message: Option<String>, json: bool, verbose: bool) -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;

    if !config.has_api_key() && syra_providers::router::requires_api_key(&config) {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GEMINI_API_KEY     (default provider)");
        eprintln!("    OPENROUTER_API_KEY");
        eprintln!("    OPENAI_API_KEY");
        eprintln!("    SYRA_API_KEY       (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        bail!("No API key found. See above for setup instructions.");
    }

    let registry = Arc::new(
        syra_tools::default_registry(&config.tools).context("Failed to build tool registry")?,
    );
    let engine = ProviderEngine::from_config(&config, registry.definitions())
        .context("Failed to set up the reasoning engine")?;
    let events = Arc::new(EventBus::default());
    spawn_event_log(&events);
    let orchestrator =
        ConversationOrchestrator::from_config(Arc::new(engine), registry, &config)
            .with_event_bus(events);

    if let Some(msg) = message {
        // Single message mode
        let turn = orchestrator.invoke(TurnInput::new(msg)).await;
        print_turn(&turn, json, verbose)?;
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  {} - Interactive Mode", config.assistant_name);
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", syra_providers::router::resolve_model(&config));
    println!("  Tools:     {}", orchestrator.registry().names().join(", "));
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit" | "/exit" | "/quit") {
            break;
        }

        let turn = orchestrator.invoke(TurnInput::new(line)).await;
        println!();
        print_turn(&turn, json, verbose)?;
        println!();
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

/// Mirror pipeline events into the debug log.
fn spawn_event_log(events: &EventBus) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(n)) => debug!(lagged = n, "Event log subscriber lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn log_event(event: &DomainEvent) {
    match event {
        DomainEvent::RouteAnalyzed { turn_id, requires_tool, tool_name, .. } => {
            debug!(%turn_id, requires_tool, tool = ?tool_name, "event: {}", event.kind())
        }
        DomainEvent::ToolExecuted { tool_name, success, duration_ms, .. } => {
            debug!(tool = %tool_name, success, duration_ms, "event: {}", event.kind())
        }
        DomainEvent::TurnCompleted { turn_id, tool_count, degraded, .. } => {
            debug!(%turn_id, tool_count, degraded, "event: {}", event.kind())
        }
        DomainEvent::ErrorOccurred { context, error_message, .. } => {
            debug!(%context, error = %error_message, "event: {}", event.kind())
        }
    }
}

fn print_turn(turn: &TurnOutput, json: bool, verbose: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(turn)?);
        return Ok(());
    }

    for line in turn.output.lines() {
        println!("  Assistant > {line}");
    }
    if verbose {
        for (tool, text) in &turn.tool_results {
            println!("    [{tool}] {text}");
        }
    }
    Ok(())
}
