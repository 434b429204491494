use anyhow::Result;
use chess_rules::{Color, Square};
use clap::{Parser, Subcommand};
use codechess::core::{BindingStore, ClientError};
use codechess::networking::{GameClient, Poller, DEFAULT_SERVER_URL};
use codechess::ui::{moves_text, render_game, status_text};
use shared::{GameCode, GameSession, PlayerBinding};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "codechess", about = "Two-player chess over short game codes")]
struct Cli {
    /// Session server base URL
    #[arg(long, env = "CODECHESS_SERVER", default_value = DEFAULT_SERVER_URL, global = true)]
    server: String,

    /// Milliseconds between polls (at least 1000)
    #[arg(long, default_value_t = 1000, global = true)]
    poll_ms: u64,

    /// Bindings file (defaults to the user config directory)
    #[arg(long, global = true)]
    bindings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a new game and print its code
    Create {
        #[arg(default_value = "white")]
        color: Color,
    },
    /// Join a waiting game
    Join { code: GameCode },
    /// Print the board, status and history
    Show { code: GameCode },
    /// List legal targets for the piece on a square
    Moves { code: GameCode, from: Square },
    /// Submit a move, e.g. `play ABCDEF e2 e4`
    Play {
        code: GameCode,
        from: Square,
        to: Square,
    },
    /// Resign the game
    Resign { code: GameCode },
    /// Follow the game until it ends
    Watch { code: GameCode },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let client = GameClient::new(cli.server.clone());
    let bindings = match cli.bindings.clone() {
        Some(path) => BindingStore::new(path),
        None => BindingStore::at_default_location(),
    };

    match cli.command {
        Command::Create { color } => {
            let binding = client.create(color).await?;
            bindings.save(&binding)?;
            println!("Game code: {}", binding.code);
            println!("You play {}. Share the code with your opponent.", binding.color);
        }
        Command::Join { code } => {
            let (binding, session) = client.join(&code).await?;
            bindings.save(&binding)?;
            print!("{}", render_game(&session, &binding));
        }
        Command::Show { code } => {
            let session = client.get(&code).await?;
            match bindings.get(&code)? {
                Some(binding) => print!("{}", render_game(&session, &binding)),
                None => print!("{}", render_spectator(&code, &session)),
            }
        }
        Command::Moves { code, from } => {
            let targets = client.possible_moves(&code, from).await?;
            println!("{}", moves_text(from, &targets));
        }
        Command::Play { code, from, to } => {
            let binding = require_binding(&bindings, &code)?;
            let response = client.submit_move(&binding, from, to).await?;
            print!("{}", render_game(&response.game_data, &binding));
            if response.in_check {
                println!("Check!");
            }
        }
        Command::Resign { code } => {
            let binding = require_binding(&bindings, &code)?;
            let session = client.resign(&binding).await?;
            println!("{}", status_text(&session, binding.color));
        }
        Command::Watch { code } => {
            let binding = require_binding(&bindings, &code)?;
            watch(client, binding, Duration::from_millis(cli.poll_ms)).await?;
        }
    }

    Ok(())
}

fn require_binding(bindings: &BindingStore, code: &GameCode) -> Result<PlayerBinding> {
    match bindings.get(code)? {
        Some(binding) => Ok(binding),
        None => Err(ClientError::NoBinding(code.clone()).into()),
    }
}

fn render_spectator(code: &GameCode, session: &GameSession) -> String {
    format!(
        "Game {} ({})\n\n{}\n{} to move\n",
        code,
        session.status,
        session.board().render(Color::White),
        session.current_turn
    )
}

/// Re-render on every change until the game reaches a terminal state
async fn watch(client: GameClient, binding: PlayerBinding, interval: Duration) -> Result<()> {
    let mut poller = Poller::new(client, binding.code.clone(), interval);
    loop {
        match poller.poll().await {
            Ok(Some(session)) => {
                print!("{}", render_game(&session, &binding));
                println!();
                if session.is_terminal() {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(ClientError::NotFound(code)) => {
                return Err(ClientError::NotFound(code).into());
            }
            Err(e) => warn!("[POLL] Poll failed, retrying: {}", e),
        }
    }
}
