mod app;
mod clipboard;
mod ui;

use anyhow::{Context, Result, bail};
use brainloom_config::Config;
use brainloom_content::{
    ContentEnvelope, Document, FsTopicStore, TopicStore, find_hazards, parse, render_with,
    serialize,
};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stdout, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use app::App;
use clipboard::SystemClipboard;

const TICK: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "brainloom", version, about = "View and convert brainloom topic content")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the topics of a content directory in the terminal
    View {
        /// Content directory; defaults to content_path from the config file
        content_dir: Option<PathBuf>,
    },
    /// Parse stored markup and print the document as JSON
    Parse {
        /// Markup file, or a JSON content envelope
        file: PathBuf,
    },
    /// Read a document as JSON and print its storage markup
    Serialize {
        /// Document JSON, as printed by `parse`
        file: PathBuf,
    },
    /// Print the display outline of stored markup
    Render {
        /// Markup file, or a JSON content envelope
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Command::View { .. } => "warn",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Command::View { content_dir } => view(content_dir),
        Command::Parse { file } => {
            let document = parse(&read_markup(&file)?);
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
        Command::Serialize { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let document: Document = serde_json::from_str(&json)
                .with_context(|| format!("{} is not a document", file.display()))?;
            let hazards = find_hazards(&document);
            if !hazards.is_empty() {
                for hazard in &hazards {
                    log::error!("{hazard}");
                }
                bail!(
                    "{} value(s) would corrupt the markup; fix them and retry",
                    hazards.len()
                );
            }
            println!("{}", serialize(&document));
            Ok(())
        }
        Command::Render { file } => {
            let options = load_config()?
                .map(|c| c.display.render_options())
                .unwrap_or_default();
            let tree = render_with(&read_markup(&file)?, &options);
            print!("{}", tree.outline());
            Ok(())
        }
    }
}

/// Raw markup from `path`, unwrapping a JSON content envelope when given one.
fn read_markup(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if path.extension().is_some_and(|ext| ext == "json") {
        let envelope: ContentEnvelope = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a content envelope", path.display()))?;
        let topic = path.display().to_string();
        return Ok(envelope.into_markup(&topic)?);
    }
    Ok(raw)
}

fn load_config() -> Result<Option<Config>> {
    Config::load().with_context(|| {
        format!(
            "Failed to load config file at {}",
            Config::config_path().display()
        )
    })
}

fn view(content_dir: Option<PathBuf>) -> Result<()> {
    // Determine content path from CLI args or config file
    let config = load_config()?;
    let (content_path, options) = match (content_dir, config) {
        (Some(dir), config) => (
            dir,
            config
                .map(|c| c.display.render_options())
                .unwrap_or_default(),
        ),
        (None, Some(config)) => {
            let options = config.display.render_options();
            (config.content_path, options)
        }
        (None, None) => bail!(
            "No content directory given and no config file found.\n\
             Usage: brainloom view <content-dir>\n\
             Or create a config file at {}",
            Config::config_path().display()
        ),
    };

    let store = FsTopicStore::open(&content_path)
        .with_context(|| format!("Content path '{}' is invalid", content_path.display()))?;
    let mut app = App::new(store, options)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<S: TopicStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    let mut clipboard = SystemClipboard;
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        // Poll so copy feedback reverts without a key press
        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_topic(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_topic(),
                KeyCode::Tab => app.focus_next_widget(),
                KeyCode::Right => app.step_focused(true),
                KeyCode::Left => app.step_focused(false),
                KeyCode::Char('c') => app.copy_focused(&mut clipboard, Instant::now()),
                KeyCode::PageDown => app.scroll_down(),
                KeyCode::PageUp => app.scroll_up(),
                _ => {}
            }
        }
    }
}
