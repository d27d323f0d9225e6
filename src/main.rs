pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zone_reader::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    create_session,
    engine::{Engine, Phase, StepOutcome},
    runtime::{CrosstermEventSource, EventLoop, ReaderEvent, ReaderEventSource},
    source::{self, SourceKind},
    surface::CellSurface,
    timing::word_delay,
    RenderInstruction,
};

use crate::ui::reader_layout;

const IDLE_WAIT_MS: u64 = 100;

/// rapid serial visual presentation reader for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Reads text one word at a time at a controllable pace, keeping each word's optimal recognition point fixed so the eye never has to move."
)]
pub struct Cli {
    /// article text file to read
    file: Option<PathBuf>,

    /// selected text to read; used as the fallback when the article is empty
    #[clap(short = 't', long)]
    text: Option<String>,

    /// reading rate in words per minute
    #[clap(short = 'w', long)]
    wpm: Option<u32>,

    /// fixation point as a fraction of the display width (0.0 - 1.0)
    #[clap(long)]
    fixation: Option<f64>,

    /// write logs to this file instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// store the effective rate and fixation point as the new defaults
    #[clap(long)]
    save: bool,
}

impl Cli {
    /// Overlay command line values on the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(wpm) = self.wpm {
            config.wpm = wpm;
        }
        if let Some(fixation) = self.fixation {
            config.fixation_ratio = fixation;
        }
        config.sanitized()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
    Quit,
}

pub struct App {
    pub engine: Engine<CellSurface>,
    pub source: SourceKind,
    /// Last word handed out by the engine, kept for redraws.
    pub frame: Option<RenderInstruction>,
    pub fixation_ratio: f64,
    wpm_step: u32,
    linger_until: Option<Instant>,
}

impl App {
    pub fn new(text: &str, source: SourceKind, config: &Config, area: Rect) -> Self {
        let word_area = reader_layout(area).word;
        let surface = CellSurface::new(word_area.x, word_area.width);

        Self {
            engine: create_session(text, surface, config),
            source,
            frame: None,
            fixation_ratio: config.fixation_ratio,
            wpm_step: config.wpm_step,
            linger_until: None,
        }
    }

    /// Advance the engine if a step is due. Returns true when the screen changed.
    pub fn on_tick(&mut self) -> bool {
        match self.engine.tick() {
            StepOutcome::Rendered {
                instruction,
                next_delay,
                ..
            } => {
                if next_delay.is_none() {
                    // keep the last word up for its own display time
                    let delay = word_delay(instruction.characters.len(), self.engine.rate());
                    self.linger_until = Some(Instant::now() + delay);
                }
                self.frame = Some(instruction);
                true
            }
            StepOutcome::Completed => true,
            StepOutcome::NotDue | StepOutcome::Stale => match self.linger_until {
                Some(until) if Instant::now() >= until => {
                    self.linger_until = None;
                    true
                }
                _ => false,
            },
        }
    }

    pub fn lingering(&self) -> bool {
        self.linger_until
            .is_some_and(|until| Instant::now() < until)
    }

    /// How long the event loop may sleep before the next scheduled change.
    pub fn next_wake(&self) -> Option<Duration> {
        self.engine.time_until_next_step().or_else(|| {
            self.linger_until
                .map(|until| until.saturating_duration_since(Instant::now()))
        })
    }

    pub fn toggle_playback(&mut self) {
        if self.engine.get_state().is_playing {
            self.engine.pause();
        } else {
            self.engine.play();
        }
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.frame = None;
        self.linger_until = None;
    }

    pub fn adjust_rate(&mut self, faster: bool) {
        let current = self.engine.rate();
        let target = if faster {
            current.saturating_add(self.wpm_step)
        } else {
            current.saturating_sub(self.wpm_step)
        };
        if let Err(e) = self.engine.set_rate(f64::from(target)) {
            warn!(error = %e, "rate change rejected");
        }
    }

    /// Fit the word surface to a new terminal size and re-align the word on screen.
    pub fn resize(&mut self, area: Rect) {
        let word_area = reader_layout(area).word;
        self.engine
            .surface_mut()
            .set_area(word_area.x, word_area.width);
        if self.frame.is_some() {
            self.frame = self.engine.realign();
        }
    }

    /// Stop playback before the reader goes away.
    pub fn close(&mut self) {
        self.engine.pause();
        info!(
            position = self.engine.get_state().position,
            "closing reader"
        );
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            // ctrl+c to quit
            self.close();
            return KeyOutcome::Quit;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.close();
                KeyOutcome::Quit
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.toggle_playback();
                KeyOutcome::Handled
            }
            KeyCode::Char('r') => {
                self.reset();
                KeyOutcome::Handled
            }
            KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('=') => {
                self.adjust_rate(true);
                KeyOutcome::Handled
            }
            KeyCode::Down | KeyCode::Char('-') => {
                self.adjust_rate(false);
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

fn init_logging(log_file: Option<PathBuf>) {
    let Some(path) = log_file.or_else(AppDirs::log_path) else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("zone_reader=info,zone=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.clone());

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save {
        if let Err(e) = store.save(&config) {
            warn!(path = %store.path().display(), error = %e, "could not save config");
        }
    }

    let article = match &cli.file {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                let mut cmd = Cli::command();
                cmd.error(ErrorKind::Io, format!("cannot read {}: {e}", path.display()))
                    .exit();
            }
        },
        None => None,
    };
    let Some(source) = source::resolve(article, cli.text.clone()) else {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::MissingRequiredArgument,
            "provide a FILE to read or --text",
        )
        .exit();
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(
        &source.text,
        source.kind,
        &config,
        Rect::new(0, 0, size.width, size.height),
    );
    let mut events = EventLoop::new(
        CrosstermEventSource,
        Duration::from_millis(IDLE_WAIT_MS),
    );
    let result = start_tui(&mut terminal, &mut app, &mut events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: ReaderEventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut EventLoop<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        let mut redraw = match events.wait(app.next_wake())? {
            ReaderEvent::Wake => false,
            ReaderEvent::Resize { width, height } => {
                app.resize(Rect::new(0, 0, width, height));
                true
            }
            ReaderEvent::Key(key) => match app.handle_key(key) {
                KeyOutcome::Quit => break,
                KeyOutcome::Handled => true,
                KeyOutcome::Ignored => false,
            },
        };

        // steps run on every pass so a burst of key events cannot starve playback
        redraw |= app.on_tick();

        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    if app.engine.phase() == Phase::Complete {
        info!("session finished");
    }
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
