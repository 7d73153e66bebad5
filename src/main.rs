use anyhow::Result;
use cropiq::conversation::Role;
use cropiq::language::Language;
use cropiq::panel::{AssistantPanel, PanelConfig};
use cropiq::speech::{NullRecognition, NullSynthesis};
use std::io::{self, BufRead, Write};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cropiq=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let endpoint = std::env::var("CROPIQ_ENDPOINT")
        .unwrap_or_else(|_| PanelConfig::default().endpoint);
    let config = PanelConfig::default()
        .with_endpoint(endpoint)
        .without_auto_speak();

    // Terminal hosts have no speech engines; the panel runs text-only
    let mut panel =
        AssistantPanel::new(config, Box::new(NullRecognition), Box::new(NullSynthesis))?;

    info!("CropIQ assistant ready");
    println!("Commands: /lang <name>, /reset, /quit");
    let mut printed = print_new_messages(&panel, 0);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line == "/quit" {
            break;
        }
        if line == "/reset" {
            panel.reset_conversation();
            printed = print_new_messages(&panel, 0);
            continue;
        }
        if let Some(name) = line.strip_prefix("/lang ") {
            match name.parse::<Language>() {
                Ok(lang) => {
                    panel.set_language(lang);
                    println!("[language: {}]", lang);
                }
                Err(e) => println!("[{}]", e.user_message()),
            }
            continue;
        }

        if let Some(pending) = panel.submit(line) {
            let seq = pending.seq();
            let outcome = pending.await;
            panel.apply_reply(seq, outcome);
            printed = print_new_messages(&panel, printed);
        }
    }

    panel.close();
    Ok(())
}

/// Print messages appended since the last call; returns the new history length
fn print_new_messages(panel: &AssistantPanel, already_printed: usize) -> usize {
    let messages = panel.store().snapshot();
    for message in &messages[already_printed.min(messages.len())..] {
        let who = match message.origin {
            Role::User => "you",
            Role::Assistant => "cropiq",
        };
        if message.emphasis {
            println!("{}: *{}*", who, message.text);
        } else {
            println!("{}: {}", who, message.text);
        }
    }
    messages.len()
}
