//! multipick - pick records from a JSON source in the terminal.
//!
//! The chosen records are printed to stdout as a JSON array on exit.

use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use multipick::app::App;
use multipick::config::{Config, FilterModeSetting};
use multipick::error::AppError;
use multipick::events::EventHandler;
use multipick::logging;
use multipick::source::Source;
use multipick::tasks::{SourceMessage, TaskSpawner};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Pick records from a JSON list with type-ahead search.
#[derive(Debug, Parser)]
#[command(name = "multipick", version, about)]
struct Cli {
    /// HTTP(S) endpoint returning a JSON array or an object with `results`
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,

    /// Local JSON file to read records from
    #[arg(long)]
    file: Option<PathBuf>,

    /// Record field to search in
    #[arg(long)]
    field: Option<String>,

    /// Record field shown under each suggestion
    #[arg(long)]
    detail_field: Option<String>,

    /// Placeholder of the search input
    #[arg(long)]
    placeholder: Option<String>,

    /// Debounce window in milliseconds; 0 filters on every keystroke
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Override config values with the flags that were given.
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.source.url = url.clone();
            config.source.file = None;
        }
        if let Some(file) = &self.file {
            config.source.file = Some(file.clone());
        }
        if let Some(field) = &self.field {
            config.source.field = field.clone();
        }
        if let Some(detail_field) = &self.detail_field {
            config.source.detail_field = Some(detail_field.clone());
        }
        if let Some(placeholder) = &self.placeholder {
            config.widget.placeholder = placeholder.clone();
        }
        match self.debounce_ms {
            Some(0) => config.widget.filter_mode = FilterModeSetting::Sync,
            Some(ms) => {
                config.widget.filter_mode = FilterModeSetting::Debounced;
                config.widget.debounce_ms = ms;
            }
            None => {}
        }
    }

    fn load_config(&self) -> Result<Config, AppError> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: failed to initialize logging: {}", e);
            None
        }
    };

    let config = cli
        .load_config()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let source = match &config.source.file {
        Some(path) => Source::File(path.clone()),
        None => Source::Url(config.source.url.clone()),
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let spawner = TaskSpawner::new(tx, runtime.handle().clone());

    let mut app = App::new(config.clone(), source.clone());
    spawner.spawn_load(source, config.request_timeout());

    let events = EventHandler::with_tick_rate(config.tick_rate_ms);
    let mut terminal = setup_terminal()
        .map_err(|e| anyhow::anyhow!(AppError::terminal(e.to_string()).user_message()))?;
    let result = run(&mut terminal, &mut app, &mut rx, &events);
    restore_terminal(&mut terminal)
        .map_err(|e| anyhow::anyhow!(AppError::terminal(e.to_string()).user_message()))?;
    info!("multipick shutting down");
    result?;

    if let Some(err) = app.take_fatal() {
        eprintln!("Error: {}", err.user_message());
        std::process::exit(1);
    }

    println!("{}", app.selection_json()?);
    Ok(())
}

/// Draw, read one event, apply background results; until the app quits.
fn run(
    terminal: &mut Tui,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<SourceMessage>,
    events: &EventHandler,
) -> anyhow::Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| app.view(frame))?;

        let event = events.next()?;
        app.update(event);

        while let Ok(message) = rx.try_recv() {
            app.handle_message(message);
        }
    }
    info!(selected = app.picker().selected().len(), "Event loop finished");
    Ok(())
}

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Leave the alternate screen before a panic message is printed
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Err(e) = reset_terminal() {
            warn!(error = %e, "Failed to reset terminal after panic");
        }
        default_hook(info);
    }));

    Terminal::new(CrosstermBackend::new(stdout))
}

fn reset_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
}

fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    reset_terminal()?;
    terminal.show_cursor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("multipick").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = Config::default();
        parse(&[]).apply(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        parse(&[
            "--file",
            "people.json",
            "--field",
            "title",
            "--detail-field",
            "status",
            "--placeholder",
            "Find...",
            "--debounce-ms",
            "250",
        ])
        .apply(&mut config);

        assert_eq!(config.source.file, Some(PathBuf::from("people.json")));
        assert_eq!(config.source.field, "title");
        assert_eq!(config.source.detail_field.as_deref(), Some("status"));
        assert_eq!(config.widget.placeholder, "Find...");
        assert_eq!(config.widget.filter_mode, FilterModeSetting::Debounced);
        assert_eq!(config.widget.debounce_ms, 250);
    }

    #[test]
    fn test_zero_debounce_means_sync() {
        let mut config = Config::default();
        parse(&["--debounce-ms", "0"]).apply(&mut config);
        assert_eq!(config.widget.filter_mode, FilterModeSetting::Sync);
    }

    #[test]
    fn test_url_replaces_file() {
        let mut config = Config::default();
        config.source.file = Some(PathBuf::from("old.json"));
        parse(&["--url", "http://localhost:8080/items"]).apply(&mut config);
        assert_eq!(config.source.url, "http://localhost:8080/items");
        assert_eq!(config.source.file, None);
    }

    #[test]
    fn test_url_and_file_conflict() {
        let result = Cli::try_parse_from([
            "multipick",
            "--url",
            "http://x",
            "--file",
            "a.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[source]\nfield = \"species\"\n").unwrap();

        let cli = parse(&["--config", path.to_str().unwrap(), "--field", "name"]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.source.field, "name");
    }

    #[test]
    fn test_load_config_rejects_invalid_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let cli = parse(&["--config", path.to_str().unwrap(), "--url", "ftp://x"]);
        assert!(matches!(cli.load_config(), Err(AppError::Config(_))));
    }
}
