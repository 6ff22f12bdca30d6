//! # Watch Game Example
//!
//! Demonstrates the lobby lifecycle against a running game service:
//!
//! 1. Resolve a lobby path (or create a fresh game)
//! 2. Poll the game in the background
//! 3. Print the composed lobby view whenever a new snapshot lands
//! 4. Shut down gracefully on Ctrl+C
//!
//! ## Running
//!
//! ```sh
//! # Create a game as "Alice" and watch it:
//! cargo run --example watch_game -- new Alice
//!
//! # Watch an existing game as a viewer, or as a seated player:
//! cargo run --example watch_game -- /lobby/<game>
//! cargo run --example watch_game -- /lobby/<game>/<private-player>
//!
//! # Point at another service:
//! SEQUENCE_API_URL=https://sequence.example.com/api cargo run --example watch_game -- new
//! ```

use sequence_client::lobby::LobbyView;
use sequence_client::{ClientConfig, GameClient, HttpApi, LobbySession, PollEvent, Route};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Logging ─────────────────────────────────────────────────────
    // Set `RUST_LOG=debug` for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // ── Configuration ───────────────────────────────────────────────
    let config = ClientConfig::from_env();
    tracing::info!("Using game service at {}", config.base_url());
    let client = GameClient::new(HttpApi::new(&config)?, config);

    // ── Route ───────────────────────────────────────────────────────
    let args: Vec<String> = std::env::args().skip(1).collect();
    let route = match args.first().map(String::as_str) {
        Some("new") => {
            let session = client.create_game(args.get(1).map(String::as_str)).await?;
            let route = session.route();
            tracing::info!("Created game {}", session.game_uuid);
            if let Some(invite) = route.invite_path() {
                tracing::info!("Invite link: {invite}");
            }
            tracing::info!("Your seat: {}", route.path());
            route
        }
        Some(path) => Route::parse(path).ok_or_else(|| format!("not a lobby path: {path}"))?,
        None => return Err("usage: watch_game (new [name] | /lobby/<game>[/<player>])".into()),
    };
    let Some(lobby) = LobbySession::open(client, &route) else {
        return Err("the home route has no game to watch".into());
    };

    // ── Event loop ──────────────────────────────────────────────────
    let (mut poller, mut events) = lobby.watch();
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    tracing::info!("Event channel closed, exiting");
                    break;
                };
                match event {
                    PollEvent::Updated { version } => {
                        tracing::debug!(version, "snapshot updated");
                        print_view(&lobby.view());
                    }
                    PollEvent::Failed { message } => tracing::warn!("{message}"),
                    PollEvent::Stale { stamp } => tracing::debug!(stamp, "stale poll dropped"),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, shutting down…");
                break;
            }
        }
    }

    // ── Cleanup ─────────────────────────────────────────────────────
    poller.shutdown().await;
    tracing::info!("Stopped watching. Goodbye!");
    Ok(())
}

fn print_view(view: &LobbyView) {
    println!("── {} ── {} ──", view.game_code, view.status.label);
    println!("host: {}  turn: {}", view.host_name, view.current_turn_name);
    if let Some(label) = view.turn_label {
        println!("{label}");
    }
    for row in 0..view.rows {
        let line: Vec<String> = (0..view.cols)
            .map(|col| match view.cell(row, col).and_then(|cell| cell.space.as_ref()) {
                Some(space) => match space.colour {
                    Some(colour) => format!("[{}]", colour.as_str().chars().next().unwrap_or('?')),
                    None => " . ".to_string(),
                },
                None => "   ".to_string(),
            })
            .collect();
        println!("{}", line.join(""));
    }
    let hand: Vec<String> = view
        .hand
        .iter()
        .map(|card| match card.label {
            Some(label) => format!("{}({label})", card.face),
            None if card.dead => format!("{}(dead)", card.face),
            None => card.face.clone(),
        })
        .collect();
    if !hand.is_empty() {
        println!("hand: {}", hand.join(" "));
    }
    for item in view.history.iter().take(5) {
        if let Some(action) = &item.action {
            println!("#{} ({}, {})", item.number, action.row, action.column);
        }
    }
    if let Some(winner) = &view.winner_name {
        println!("winner: {winner}");
    }
    for alert in &view.alerts {
        println!("! {}", alert.message);
    }
}
