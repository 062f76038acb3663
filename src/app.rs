use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::{
    config::Config,
    metrics::SessionResult,
    playback::PlayerFactory,
    runtime::AppEvent,
    session::{KeyOutcome, Keystroke, TypingSession},
    setup::{SetupAction, SetupForm},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Typing,
    Results,
}

/// What the event loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Idle,
    Redraw,
    Quit,
}

/// A completed session as shown on the results screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub result: SessionResult,
    pub chars: usize,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub state: AppState,
    pub setup: SetupForm,
    pub session: Option<TypingSession>,
    pub summary: Option<Summary>,
    factory: Box<dyn PlayerFactory>,
}

impl App {
    pub fn new(config: Config, setup: SetupForm, factory: Box<dyn PlayerFactory>) -> Self {
        Self {
            config,
            state: AppState::Setup,
            setup,
            session: None,
            summary: None,
            factory,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent, now: Instant) -> Flow {
        match event {
            AppEvent::Tick => self.on_tick(now),
            AppEvent::Resize => Flow::Redraw,
            AppEvent::Closed => {
                warn!("terminal input closed, quitting");
                self.end_session();
                Flow::Quit
            }
            AppEvent::Paste(text) => {
                // pasting into the typing screen would skip the typing
                if self.state == AppState::Setup {
                    self.setup.paste(&text);
                    Flow::Redraw
                } else {
                    Flow::Idle
                }
            }
            AppEvent::Key(key) => self.on_key(key, now),
        }
    }

    fn on_tick(&mut self, now: Instant) -> Flow {
        let changed = self.session.as_mut().is_some_and(|s| s.on_tick(now));
        if changed {
            Flow::Redraw
        } else {
            Flow::Idle
        }
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.end_session();
            return Flow::Quit;
        }

        match self.state {
            AppState::Setup => match self.setup.handle_key(key) {
                SetupAction::Start => {
                    self.start_session();
                    Flow::Redraw
                }
                SetupAction::Quit => Flow::Quit,
                SetupAction::None => Flow::Redraw,
            },
            AppState::Typing => {
                if key.code == KeyCode::Esc {
                    self.end_session();
                    self.state = AppState::Setup;
                    return Flow::Redraw;
                }

                let Some(session) = self.session.as_mut() else {
                    self.state = AppState::Setup;
                    return Flow::Redraw;
                };

                match session.handle_key(Keystroke::from(key), now) {
                    KeyOutcome::Ignored => Flow::Idle,
                    KeyOutcome::Completed(result) => {
                        self.finish(result);
                        Flow::Redraw
                    }
                    KeyOutcome::Judged(_) | KeyOutcome::Erased => Flow::Redraw,
                }
            }
            AppState::Results => match key.code {
                KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('n') => {
                    self.reset();
                    Flow::Redraw
                }
                KeyCode::Esc | KeyCode::Char('q') => Flow::Quit,
                _ => Flow::Idle,
            },
        }
    }

    /// Validate the form and open the track; stays on setup with a message
    /// if either fails.
    pub fn start_session(&mut self) {
        let session_config = match self.setup.validate(&self.config) {
            Ok(cfg) => cfg,
            Err(e) => {
                info!(reason = %e, "setup incomplete");
                self.setup.message = Some(e.to_string());
                return;
            }
        };

        let player = match self.factory.open(&session_config.audio) {
            Ok(player) => player,
            Err(e) => {
                warn!(error = %e, "could not open audio");
                self.setup.message = Some(format!(
                    "could not play {}: {e}",
                    session_config.audio.title()
                ));
                return;
            }
        };

        info!(
            track = %session_config.audio.title(),
            chars = session_config.target.len(),
            idle_delay_ms = session_config.idle_delay.as_millis() as u64,
            "starting session"
        );

        self.setup.message = None;
        self.summary = None;
        self.session = Some(TypingSession::with_player(session_config, player));
        self.state = AppState::Typing;
    }

    fn finish(&mut self, result: SessionResult) {
        if let Some(session) = self.session.take() {
            self.summary = Some(Summary {
                result,
                chars: session.len(),
                elapsed: session.elapsed(),
            });
        }
        self.state = AppState::Results;
    }

    /// Discard everything from the last session and go back to setup
    pub fn reset(&mut self) {
        self.end_session();
        self.summary = None;
        self.state = AppState::Setup;
    }

    fn end_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.abandon();
        }
    }
}
