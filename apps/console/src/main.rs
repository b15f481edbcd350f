use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use client_core::{GestureSession, SessionEvent, SessionOptions};
use shared::domain::ModeId;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{broadcast, Mutex},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod render;

use command::ConsoleCommand;
use config::{load_settings_from, DEFAULT_CONFIG_PATH};
use render::{instruction_panel, ConsoleView};

#[derive(Parser, Debug)]
#[command(name = "gesture-console", about = "Terminal front end for the gesture control service")]
struct Args {
    /// Gesture service address (http, https, ws or wss).
    #[arg(long)]
    endpoint: Option<String>,
    /// Mode to request before connecting.
    #[arg(long)]
    mode: Option<ModeId>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Send the current mode to the service as soon as it connects.
    #[arg(long)]
    resync_mode: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings_from(&args.config);
    if let Some(endpoint) = args.endpoint {
        settings.endpoint = endpoint;
    }
    if let Some(mode) = args.mode {
        settings.initial_mode = mode;
    }
    if args.resync_mode {
        settings.resync_mode_on_connect = true;
    }
    info!(endpoint = %settings.endpoint, mode = %settings.initial_mode, "starting gesture console");

    let session = Arc::new(GestureSession::new(SessionOptions {
        resync_mode_on_connect: settings.resync_mode_on_connect,
    }));
    let view = Arc::new(Mutex::new(ConsoleView::default()));
    let renderer = tokio::spawn(render_events(
        Arc::clone(&session),
        Arc::clone(&view),
        session.subscribe_events(),
    ));

    let initial = session.snapshot().await;
    println!("{}", view.lock().await.overview(&initial, Utc::now()));
    if settings.initial_mode == ModeId::default() {
        println!("{}", instruction_panel(settings.initial_mode));
    } else {
        session.request_mode_change(settings.initial_mode).await;
    }
    println!("{}", command::HELP);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let connector = tokio::spawn({
        let session = Arc::clone(&session);
        let endpoint = settings.endpoint.clone();
        async move { session.connect(&endpoint).await }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => match command::parse(&line) {
                    Ok(Some(ConsoleCommand::Quit)) => break,
                    Ok(Some(command)) => run_command(&session, &view, command).await,
                    Ok(None) => {}
                    Err(err) => println!("{err}"),
                },
                Ok(None) => break,
                Err(err) => {
                    warn!(%err, "failed to read stdin");
                    break;
                }
            },
        }
    }

    session.teardown().await;
    connector.abort();
    renderer.abort();
    Ok(())
}

async fn run_command(session: &GestureSession, view: &Mutex<ConsoleView>, command: ConsoleCommand) {
    match command {
        ConsoleCommand::Mode(mode) => {
            session.request_mode_change(mode).await;
        }
        ConsoleCommand::Record => {
            session.toggle_recording().await;
        }
        ConsoleCommand::Status => {
            let state = session.snapshot().await;
            println!("{}", view.lock().await.overview(&state, Utc::now()));
        }
        ConsoleCommand::Dismiss => match view.lock().await.dismiss_latest() {
            Some(notification) => println!("dismissed: {}", notification.title),
            None => println!("no notifications"),
        },
        ConsoleCommand::Help => println!("{}", command::HELP),
        ConsoleCommand::Quit => {}
    }
}

async fn render_events(
    session: Arc<GestureSession>,
    view: Arc<Mutex<ConsoleView>>,
    mut events: broadcast::Receiver<SessionEvent>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                let state = session.snapshot().await;
                let output = view.lock().await.on_event(&event, &state, Utc::now());
                if let Some(output) = output {
                    println!("{output}");
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "console fell behind session events");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
