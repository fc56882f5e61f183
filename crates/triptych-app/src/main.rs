use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::info;

use triptych_client::BoardClient;
use triptych_store::Store;
use triptych_sync::view::column_view;
use triptych_sync::{Board, BoardEvent, Poller};
use triptych_types::Column;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triptych=debug".into()),
        )
        .init();

    // Config
    let endpoint =
        std::env::var("TRIPTYCH_ENDPOINT").unwrap_or_else(|_| "http://a0830433.xsph.ru/".into());
    let db_path = std::env::var("TRIPTYCH_DB_PATH").unwrap_or_else(|_| "triptych.db".into());
    let poll_secs: u64 = std::env::var("TRIPTYCH_POLL_SECS")
        .unwrap_or_else(|_| "5".into())
        .parse()?;

    let store = Store::open(&PathBuf::from(&db_path))?;
    let board = Board::new(store);
    let client = BoardClient::new(endpoint.clone());

    // Subscribe before the first fetch can complete.
    let mut events = board.subscribe();

    let poller = Poller::spawn(board.clone(), client, Duration::from_secs(poll_secs));
    info!("Triptych polling {} every {}s", endpoint, poll_secs);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            event = events.recv() => match event {
                Ok(BoardEvent::FetchStarted) => {}
                Ok(BoardEvent::FetchFailed { error }) => {
                    eprintln!("fetch failed: {}", error);
                }
                Ok(_) => render(&board),
                Err(broadcast::error::RecvError::Lagged(_)) => render(&board),
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}

/// Print the three column projections.
fn render(board: &Board) {
    let state = board.snapshot();

    for (title, column) in [
        ("left", Column::Left),
        ("center", Column::Center),
        ("right", Column::Right),
    ] {
        let view = column_view(&state, column);
        println!("── {} ({}) ──", title, view.len());
        for msg in view {
            let star = if msg.is_favorite { "*" } else { " " };
            println!("{} [{}] {} {}: {}", star, msg.id, msg.time, msg.author, msg.text);
            for att in &msg.attachments {
                println!("      {} {}", att.kind, att.url);
            }
        }
    }
    println!();
}
