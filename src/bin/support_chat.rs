//! Terminal client for the support-chat relay.
//!
//! `SUPPORT_CHAT_URL` points at the relay endpoint and `SUPPORT_CHAT_TOKEN`
//! is sent as a bearer token when set. Commands: `/new`, `/list`, `/quit`.

use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use support_relay::service::client::{ChatSession, SupportChatClient, TurnOutcome};
use support_relay::service::store::InMemoryConversationStore;

const DEFAULT_URL: &str = "http://127.0.0.1:8080/functions/v1/support-chat";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = log4rs::init_file("config/log4rs.yml", Default::default()) {
        eprintln!("logging disabled: {}", e);
    }

    let url = std::env::var("SUPPORT_CHAT_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let mut client = SupportChatClient::new(url)?;
    if let Ok(token) = std::env::var("SUPPORT_CHAT_TOKEN") {
        client = client.with_access_token(token);
    }

    let store = Arc::new(InMemoryConversationStore::new());
    let mut session = ChatSession::new(client, store);

    // Ctrl-C aborts the answer being streamed, or exits when idle
    let canceller = session.canceller();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if !canceller.cancel() {
                println!();
                std::process::exit(130);
            }
        }
    });

    println!("Aesthetic ProTools support. Type /quit to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" => break,
            "/new" => {
                let conversation = session.new_conversation().await?;
                println!("Started {}", conversation.id);
            }
            "/list" => {
                for conversation in session.list_conversations().await? {
                    println!("{}  {}", conversation.id, conversation.title);
                }
            }
            _ => {
                let outcome = session
                    .send_observed(&line, |fragment| {
                        print!("{}", fragment);
                        let _ = std::io::stdout().flush();
                    })
                    .await?;
                match outcome {
                    TurnOutcome::Ignored => {}
                    TurnOutcome::Completed(_) => println!(),
                    TurnOutcome::Failed(failure) => println!("\n[error: {}]", failure),
                }
            }
        }
    }
    Ok(())
}
