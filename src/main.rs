mod catalog;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod notify;
mod player;
mod view;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use catalog::{CatalogClient, SubsonicClient};
use config::{Config, LoadOutcome, PlayerConfig};
use controller::{AppController, AppEvent};
use notify::{DesktopNotifier, NoopNotifier, NotificationSink};
use player::{MpvPlayer, PlayerAdapter};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    // Held until exit so buffered log lines are flushed.
    let _log_guard = match logging::init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== subsonic-tui starting ===");

    let config = match Config::load_or_init()? {
        LoadOutcome::Loaded(config) => config,
        LoadOutcome::TemplateWritten(path) => {
            println!("Wrote a config template to {}", path.display());
            println!("Fill in your server URL, username and password, then start again.");
            return Ok(());
        }
    };

    let catalog = SubsonicClient::new(&config.server).context("Invalid server settings")?;
    catalog.ping().await.context("Could not connect to the server")?;
    let catalog: Arc<dyn CatalogClient> = Arc::new(catalog);

    let notifier: Arc<dyn NotificationSink> = if config.notifications.enabled {
        Arc::new(DesktopNotifier::new())
    } else {
        Arc::new(NoopNotifier)
    };

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let mut controller = AppController::new(catalog, notifier, events_tx.clone(), config.player.clone());

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    spawn_player(config.player, events_tx.clone());
    spawn_input_reader(events_tx);
    controller.start();

    let res = run_app(&mut terminal, &mut controller, events_rx).await;

    controller.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("subsonic-tui shutting down");
    Ok(())
}

/// mpv starts in the background; the session works without it until it is ready.
fn spawn_player(settings: PlayerConfig, events: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let result = MpvPlayer::spawn(&settings)
            .await
            .map(|player| Arc::new(player) as Arc<dyn PlayerAdapter>);
        let _ = events.send(AppEvent::PlayerReady(result));
    });
}

fn spawn_input_reader(events: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(event) = reader.next().await {
            match event {
                Ok(Event::Key(key)) => {
                    if events.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Terminal input failed");
                    break;
                }
            }
        }
    });
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut AppController,
    mut events: UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    let mut window_title = String::new();

    loop {
        let title = controller.model().window_title();
        if title != window_title {
            execute!(terminal.backend_mut(), SetTitle(&title))?;
            window_title = title;
        }

        terminal.draw(|f| AppView::render(f, controller.model()))?;

        let Some(event) = events.recv().await else {
            break;
        };
        controller.handle_event(event);

        // Apply everything already queued before drawing again
        while let Ok(event) = events.try_recv() {
            controller.handle_event(event);
        }

        if controller.should_quit() {
            break;
        }
    }

    Ok(())
}
