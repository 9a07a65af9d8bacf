mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod host;
mod logging;
mod nav;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::app::App;
use crate::config::{AppConfig, BrowserConfig, GeneralConfig, LogConfig};
use crate::event::{Event, EventHandler};
use crate::fs::access::LocalFs;
use crate::host::buffers::BufferHost;
use crate::host::launcher::SystemLauncher;
use crate::nav::{EnterTarget, Session};
use crate::tui::{install_panic_hook, Screen};

/// Environment variable naming the log file.
const LOG_FILE_ENV: &str = "TFM_LOG_FILE";

/// A three-pane, keyboard-driven file browser.
#[derive(Parser, Debug)]
#[command(name = "tfm", version, about)]
struct Cli {
    /// Directory to start in (defaults to the configured start path, then ".")
    path: Option<PathBuf>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sort order: alpha, last_modified, size (append _reverse to flip)
    #[arg(long)]
    sort: Option<String>,

    /// Show hidden entries
    #[arg(long)]
    show_hidden: bool,

    /// Filter matching: substring, prefix, fuzzy
    #[arg(long)]
    filter_mode: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Config overrides derived from flags.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: self.show_hidden.then_some(true),
                ..GeneralConfig::default()
            },
            browser: BrowserConfig {
                sort: self.sort.clone(),
                filter_mode: self.filter_mode.clone(),
                ..BrowserConfig::default()
            },
            log: LogConfig {
                file: self
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .or_else(|| std::env::var(LOG_FILE_ENV).ok()),
                ..LogConfig::default()
            },
            ..AppConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let log_file = config.log_file().map(PathBuf::from);
    logging::init(log_file.as_deref(), config.log_level())?;

    let start = cli
        .path
        .clone()
        .or_else(|| config.start_path().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let path = start.canonicalize().map_err(|_| {
        error::AppError::InvalidPath(format!("{} does not exist", start.display()))
    })?;
    info!(path = %path.display(), "starting");

    let session = Session::new(
        BufferHost::new(),
        Box::new(LocalFs),
        Box::new(SystemLauncher::new(config.opener())),
        config.options(),
    );
    let mut app = App::new(session, theme::resolve_theme(config.theme_scheme()));
    app.enter(EnterTarget::Path(path));

    install_panic_hook();

    let mut screen = Screen::enter()?;
    let mut events = EventHandler::new(Duration::from_millis(100));

    loop {
        screen.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    screen.leave()?;
    info!("exiting");
    Ok(())
}
