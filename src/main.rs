use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};
use tempotype::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    error::AppError,
    logging::init_logging,
    lyrics,
    playback::RodioFactory,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    setup::{Difficulty, SetupForm},
    ui,
};
use tracing::{error, info};

/// typing tui that plays your music while you type and pauses it when you stop
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the lyrics of a song while it plays. The music keeps going as long as you keep typing and pauses once you stop for longer than the idle delay."
)]
pub struct Cli {
    /// audio file to play while typing
    #[clap(short = 'a', long)]
    audio: Option<PathBuf>,

    /// text file with the lyrics to type
    #[clap(short = 'l', long)]
    lyrics: Option<PathBuf>,

    /// how quickly the music pauses when you stop typing
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// idle delay in milliseconds, overrides the difficulty presets
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    idle_delay_ms: Option<u64>,

    /// config file to use instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective config to the config file and exit
    #[clap(long)]
    write_config: bool,

    /// skip the setup screen when audio and lyrics are both given
    #[clap(short = 's', long)]
    start: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match self.config.as_ref() {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Stored config with command line overrides applied
    fn effective_config(&self, stored: Config) -> Config {
        Config {
            idle_delay_ms: self.idle_delay_ms.or(stored.idle_delay_ms),
            default_difficulty: self.difficulty.unwrap_or(stored.default_difficulty),
            ..stored
        }
    }

    fn setup_form(&self, config: &Config) -> io::Result<SetupForm> {
        let mut form = SetupForm::new(config.default_difficulty);
        if let Some(audio) = self.audio.as_ref() {
            form.audio_path = audio.display().to_string();
        }
        if let Some(path) = self.lyrics.as_ref() {
            form.lyrics = lyrics::load(path)?;
        }
        Ok(form)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let logging = AppDirs::log_path()
        .ok_or(AppError::NoLogDir)
        .and_then(|path| init_logging(&path));
    if let Err(e) = logging {
        eprintln!("warning: {e}");
    }

    let store = cli.config_store();
    let config = cli.effective_config(store.load());

    if cli.write_config {
        store.save(&config)?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let setup = match cli.setup_form(&config) {
        Ok(form) => form,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::Io, format!("could not read lyrics: {e}"))
                .exit();
        }
    };

    let factory = RodioFactory {
        volume: config.volume,
        repeat: config.repeat_track,
    };
    let mut app = App::new(config, setup, Box::new(factory));
    if cli.start {
        app.start_session();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("tui started");
    let res = start_tui(&mut terminal, &mut app);
    // release the audio device before the terminal goes back to normal
    app.reset();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(e) = res.as_ref() {
        error!(error = %e, "tui exited with an error");
    }
    res
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        match app.handle_event(runner.step(), Instant::now()) {
            Flow::Quit => break,
            Flow::Redraw => {
                terminal.draw(|f| ui::draw(app, f))?;
            }
            Flow::Idle => {}
        }
    }

    Ok(())
}
