//! Interactive terminal client for a RAG chat backend.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a backend on localhost
//! ragchat
//!
//! # Point at another backend and retrieve from uploaded files
//! ragchat --base-url http://chat.internal:8000/ --rag
//!
//! # Show replies at once and log requests to stderr
//! ragchat --reveal-ms 0 --log
//! ```
//!
//! # Commands
//!
//! Anything not starting with `/` is sent to the current session.  See
//! `/help` for the slash commands.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ragchat::chat::{
    ChatCommand, ChatController, ClientArgs, ClientConfig, DeleteOutcome, PlainTextRenderer,
    Renderer, SessionRef, SubmitOutcome, View, help_text, parse_command,
};
use ragchat::{ChatBackend, RagChat, register_biometrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ClientArgs::from_command_line_relaxed("ragchat [OPTIONS]");
    let config = ClientConfig::from(args);
    if config.log {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "ragchat=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    register_biometrics(biometrics::Collector::new());

    let client = RagChat::with_options(config.base_url.clone(), Some(config.timeout))?;
    let base_url = client.base_url().to_string();
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut controller = ChatController::new(client, config);
    let mut rl = DefaultEditor::new()?;

    // Set while a reply is being revealed
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("RAG Chat ({base_url})");
    println!("Type /help for commands, /quit to exit\n");
    match controller.refresh_sessions().await {
        Ok(()) => renderer.render_sessions(&controller.view()),
        Err(err) => renderer.print_error(err.message()),
    }

    loop {
        interrupted.store(false, Ordering::Relaxed);

        let prompt = match controller.state().current_session() {
            Some(_) => format!("{}> ", controller.state().title()),
            None => "> ".to_string(),
        };
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line);

        let Some(cmd) = parse_command(line) else {
            controller.set_draft(line);
            match controller.submit(&mut renderer).await {
                SubmitOutcome::Revealing => {
                    if let Err(err) = controller.run_reveal(&mut renderer, &interrupted).await {
                        renderer.print_error(err.message());
                    }
                    print_exchange(&controller);
                }
                SubmitOutcome::Failed(err) => renderer.print_error(err.message()),
                SubmitOutcome::Rejected => {}
            }
            continue;
        };

        match cmd {
            ChatCommand::Quit => {
                println!("Goodbye!");
                break;
            }
            ChatCommand::Help => {
                for line in help_text().lines() {
                    println!("    {}", line);
                }
            }
            ChatCommand::New => match controller.create_session().await {
                Ok(_) => renderer.render_transcript(&controller.view()),
                Err(err) => renderer.print_error(err.message()),
            },
            ChatCommand::Sessions => match controller.refresh_sessions().await {
                Ok(()) => renderer.render_sessions(&controller.view()),
                Err(err) => renderer.print_error(err.message()),
            },
            ChatCommand::Select(target) => {
                let Some(session_id) = resolve(&controller.view(), &target) else {
                    renderer.print_error("No such session; /sessions lists them.");
                    continue;
                };
                match controller.select_session(&session_id).await {
                    Ok(()) => renderer.render_transcript(&controller.view()),
                    Err(err) => renderer.print_error(err.message()),
                }
            }
            ChatCommand::Delete(target) => {
                let Some(session_id) = resolve(&controller.view(), &target) else {
                    renderer.print_error("No such session; /sessions lists them.");
                    continue;
                };
                let mut ask = |question: &str| {
                    matches!(
                        rl.readline(&format!("{question} [y/N] ")),
                        Ok(answer) if matches!(answer.trim(), "y" | "Y" | "yes")
                    )
                };
                match controller.delete_session(&session_id, &mut ask).await {
                    Ok(DeleteOutcome::Deleted) => {
                        renderer.print_info("Session deleted.");
                        renderer.render_sessions(&controller.view());
                    }
                    Ok(DeleteOutcome::Cancelled) => {}
                    Err(err) => renderer.print_error(err.message()),
                }
            }
            ChatCommand::History => match controller.load_history().await {
                Ok(()) if controller.state().current_session().is_none() => {
                    renderer.print_info("No session selected.");
                }
                Ok(()) => renderer.render_transcript(&controller.view()),
                Err(err) => renderer.print_error(err.message()),
            },
            ChatCommand::Upload(path) => {
                // status lines are printed by the controller
                let _ = controller.upload_file(Path::new(&path), &mut renderer).await;
            }
            ChatCommand::Files => {
                if controller.uploads().is_empty() {
                    renderer.print_info("No files uploaded.");
                }
                for file in controller.uploads() {
                    let indexed = if file.is_indexed() { "indexed" } else { "stored" };
                    println!("    {} ({}, {})", file.filename, file.file_id, indexed);
                }
            }
            ChatCommand::Rag(on) => {
                controller.set_use_rag(on);
                renderer.print_info(if on { "RAG enabled." } else { "RAG disabled." });
            }
            ChatCommand::Invalid(message) => renderer.print_error(&message),
        }
    }

    Ok(())
}

fn resolve(view: &View, target: &SessionRef) -> Option<String> {
    match target {
        SessionRef::Index(idx) => view
            .sessions
            .get(idx - 1)
            .map(|entry| entry.session_id.clone()),
        SessionRef::Id(id) => Some(id.clone()),
    }
}

fn print_exchange<B: ChatBackend>(controller: &ChatController<B>) {
    let Some(exchange) = controller.state().last_exchange() else {
        return;
    };
    if controller.state().use_rag() && !exchange.citations.is_empty() {
        let cited: Vec<_> = exchange
            .citations
            .iter()
            .map(|c| format!("{}#{}", c.file_id, c.chunk_id))
            .collect();
        println!("    sources: {}", cited.join(", "));
    }
    if let (Some(prompt), Some(completion)) =
        (exchange.token_usage.prompt, exchange.token_usage.completion)
    {
        println!("    tokens: {prompt} in / {completion} out");
    }
}
