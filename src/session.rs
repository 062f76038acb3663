use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::{
    lyrics,
    metrics::{accuracy_percent, words_per_minute, SessionResult},
    playback::{AudioSource, PlaybackController, Player},
};

/// Everything a typing session needs; fixed for the session's lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub audio: AudioSource,
    pub target: Vec<char>,
    pub idle_delay: Duration,
    /// Whether backspace counts as activity for the music
    pub backspace_resets_idle_timer: bool,
}

impl SessionConfig {
    pub fn new(audio: AudioSource, lyrics_text: &str, idle_delay: Duration) -> Self {
        Self {
            audio,
            target: lyrics::tokenize(lyrics_text),
            idle_delay,
            backspace_resets_idle_timer: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    Pending,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No keystroke yet
    Idle,
    Active,
    Completed,
}

/// A key as the session sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Backspace,
    Other,
}

/// Ctrl or Alt on their own make a shortcut. Both together is how Windows
/// reports AltGr, which types characters like `@` or `{` on many layouts.
pub fn is_shortcut(modifiers: KeyModifiers) -> bool {
    let alt_gr = KeyModifiers::CONTROL | KeyModifiers::ALT;
    modifiers.intersects(alt_gr) && !modifiers.contains(alt_gr)
}

impl From<KeyEvent> for Keystroke {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char(_) if is_shortcut(key.modifiers) => Keystroke::Other,
            KeyCode::Char(c) => Keystroke::Char(c),
            KeyCode::Backspace => Keystroke::Backspace,
            _ => Keystroke::Other,
        }
    }
}

/// What a keystroke did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Judged(CellStatus),
    Erased,
    /// The last character was judged. Produced exactly once per session.
    Completed(SessionResult),
}

/// One pass over the lyrics: cursor, per-character judgement, counters,
/// live metrics, and the music that follows the typing.
#[derive(Debug)]
pub struct TypingSession {
    config: SessionConfig,
    cells: Vec<CellStatus>,
    cursor: usize,
    correct: usize,
    errors: usize,
    started_at: Option<Instant>,
    last_key_at: Option<Instant>,
    phase: Phase,
    wpm: u32,
    accuracy: u32,
    playback: PlaybackController,
}

impl TypingSession {
    /// A session without music
    pub fn new(config: SessionConfig) -> Self {
        let playback = PlaybackController::new(config.idle_delay);
        Self::with_playback(config, playback)
    }

    /// A session whose music is driven by `player`
    pub fn with_player(config: SessionConfig, player: Box<dyn Player>) -> Self {
        let mut playback = PlaybackController::new(config.idle_delay);
        playback.start(player);
        Self::with_playback(config, playback)
    }

    pub fn with_playback(config: SessionConfig, playback: PlaybackController) -> Self {
        Self {
            cells: vec![CellStatus::Pending; config.target.len()],
            config,
            cursor: 0,
            correct: 0,
            errors: 0,
            started_at: None,
            last_key_at: None,
            phase: Phase::Idle,
            wpm: 0,
            accuracy: 100,
            playback,
        }
    }

    pub fn handle_key(&mut self, key: Keystroke, now: Instant) -> KeyOutcome {
        if self.is_complete() {
            return KeyOutcome::Ignored;
        }

        match key {
            Keystroke::Char(c) => self.write(c, now),
            Keystroke::Backspace => self.backspace(now),
            Keystroke::Other => KeyOutcome::Ignored,
        }
    }

    fn write(&mut self, c: char, now: Instant) -> KeyOutcome {
        if self.phase == Phase::Idle {
            self.started_at = Some(now);
            self.phase = Phase::Active;
            debug!(chars = self.len(), "session started");
        }

        self.playback.pulse(now);
        self.last_key_at = Some(now);

        let status = if self.config.target[self.cursor] == c {
            self.correct += 1;
            CellStatus::Correct
        } else {
            self.errors += 1;
            CellStatus::Incorrect
        };
        self.cells[self.cursor] = status;
        self.cursor += 1;

        self.recalculate(now);

        if self.cursor == self.len() {
            self.playback.stop();
            self.phase = Phase::Completed;
            let result = self.result();
            info!(wpm = result.wpm, accuracy = result.accuracy, "session completed");
            return KeyOutcome::Completed(result);
        }

        KeyOutcome::Judged(status)
    }

    fn backspace(&mut self, now: Instant) -> KeyOutcome {
        if self.cursor == 0 {
            return KeyOutcome::Ignored;
        }

        if self.config.backspace_resets_idle_timer {
            self.playback.pulse(now);
        }
        self.last_key_at = Some(now);

        // Counters keep the original judgement; only the cell is reset.
        self.cursor -= 1;
        self.cells[self.cursor] = CellStatus::Pending;

        self.recalculate(now);
        KeyOutcome::Erased
    }

    fn recalculate(&mut self, now: Instant) {
        let Some(started_at) = self.started_at else {
            return;
        };
        if self.cursor == 0 {
            return;
        }

        let elapsed = now.saturating_duration_since(started_at);
        self.wpm = words_per_minute(self.correct, elapsed);
        self.accuracy = accuracy_percent(self.correct, self.errors);
    }

    /// Advance the music's idle timer. Returns true if playback state changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        self.playback.on_tick(now)
    }

    /// Stop the music and cancel the idle timer without completing.
    pub fn abandon(&mut self) {
        self.playback.stop();
        debug!(cursor = self.cursor, "session abandoned");
    }

    pub fn result(&self) -> SessionResult {
        SessionResult {
            wpm: self.wpm,
            accuracy: self.accuracy,
        }
    }

    pub fn len(&self) -> usize {
        self.config.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.target.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.len()
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time from the first to the most recent keystroke
    pub fn elapsed(&self) -> Duration {
        match (self.started_at, self.last_key_at) {
            (Some(start), Some(last)) => last.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn target(&self) -> &[char] {
        &self.config.target
    }

    pub fn cells(&self) -> &[CellStatus] {
        &self.cells
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }
}
