use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::{App, AppState};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Setup screen - track, lyrics and difficulty form
pub struct SetupScreen;

impl Screen for SetupScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        super::setup::render(&app.setup, &app.config, area, buf);
    }
}

/// Typing screen - the lyrics being typed plus live stats
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Some(session) = app.session.as_ref() {
            super::typing::render(session, area, buf);
        }
    }
}

/// Results screen - final wpm and accuracy
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Some(summary) = app.summary.as_ref() {
            super::results::render(summary, area, buf);
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Setup => Box::new(SetupScreen),
        AppState::Typing => Box::new(TypingScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}
