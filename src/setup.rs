use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::{
    config::Config,
    lyrics,
    playback::AudioSource,
    session::{is_shortcut, SessionConfig},
};

/// How long the music keeps playing after the last keystroke
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Relaxing,
    Semi,
    Pro,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Relaxing, Difficulty::Semi, Difficulty::Pro];

    pub fn next(self) -> Self {
        match self {
            Difficulty::Relaxing => Difficulty::Semi,
            Difficulty::Semi => Difficulty::Pro,
            Difficulty::Pro => Difficulty::Relaxing,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Relaxing => Difficulty::Pro,
            Difficulty::Semi => Difficulty::Relaxing,
            Difficulty::Pro => Difficulty::Semi,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("choose an audio file to play")]
    MissingAudio,
    #[error("audio file not found: {}", .0.display())]
    AudioNotFound(PathBuf),
    #[error("paste or type some lyrics first")]
    EmptyLyrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Audio,
    Lyrics,
    Difficulty,
}

impl SetupField {
    fn next(self) -> Self {
        match self {
            SetupField::Audio => SetupField::Lyrics,
            SetupField::Lyrics => SetupField::Difficulty,
            SetupField::Difficulty => SetupField::Audio,
        }
    }

    fn prev(self) -> Self {
        match self {
            SetupField::Audio => SetupField::Difficulty,
            SetupField::Lyrics => SetupField::Audio,
            SetupField::Difficulty => SetupField::Lyrics,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupAction {
    None,
    Start,
    Quit,
}

/// The inputs gathered before a session: track, lyrics and difficulty
#[derive(Debug, Clone, PartialEq)]
pub struct SetupForm {
    pub audio_path: String,
    pub lyrics: String,
    pub difficulty: Difficulty,
    pub focus: SetupField,
    /// Validation feedback shown under the form
    pub message: Option<String>,
}

impl SetupForm {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            audio_path: String::new(),
            lyrics: String::new(),
            difficulty,
            focus: SetupField::Audio,
            message: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SetupAction {
        if is_shortcut(key.modifiers) {
            return match key.code {
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    SetupAction::Start
                }
                _ => SetupAction::None,
            };
        }

        match key.code {
            KeyCode::Esc => return SetupAction::Quit,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            _ => return self.edit_focused(key.code),
        }
        SetupAction::None
    }

    fn edit_focused(&mut self, code: KeyCode) -> SetupAction {
        match (self.focus, code) {
            (SetupField::Audio, KeyCode::Enter) => self.focus = SetupField::Lyrics,
            (SetupField::Audio, KeyCode::Char(c)) => self.audio_path.push(c),
            (SetupField::Audio, KeyCode::Backspace) => {
                self.audio_path.pop();
            }
            (SetupField::Lyrics, KeyCode::Enter) => self.lyrics.push('\n'),
            (SetupField::Lyrics, KeyCode::Char(c)) => self.lyrics.push(c),
            (SetupField::Lyrics, KeyCode::Backspace) => {
                self.lyrics.pop();
            }
            (SetupField::Difficulty, KeyCode::Enter) => return SetupAction::Start,
            (SetupField::Difficulty, KeyCode::Left | KeyCode::Up) => {
                self.difficulty = self.difficulty.prev()
            }
            (SetupField::Difficulty, KeyCode::Right | KeyCode::Down) => {
                self.difficulty = self.difficulty.next()
            }
            (SetupField::Difficulty, KeyCode::Char(c @ '1'..='3')) => {
                let idx = c as usize - '1' as usize;
                self.difficulty = Difficulty::ALL[idx];
            }
            _ => {}
        }
        SetupAction::None
    }

    /// Bracketed paste into the focused text field
    pub fn paste(&mut self, text: &str) {
        match self.focus {
            SetupField::Audio => {
                if let Some(line) = text.lines().find(|l| !l.trim().is_empty()) {
                    self.audio_path.push_str(line.trim());
                }
            }
            SetupField::Lyrics => self.lyrics.push_str(&text.replace("\r\n", "\n")),
            SetupField::Difficulty => {}
        }
    }

    /// The audio path as typed, minus surrounding whitespace and the quotes
    /// terminals add when a file is dropped in.
    pub fn audio_source(&self) -> Option<AudioSource> {
        let path = self
            .audio_path
            .trim()
            .trim_matches(|c| c == '\'' || c == '"');
        if path.is_empty() {
            None
        } else {
            Some(AudioSource::new(path))
        }
    }

    pub fn validate(&self, config: &Config) -> Result<SessionConfig, SetupError> {
        let audio = self.audio_source().ok_or(SetupError::MissingAudio)?;
        if !audio.path().is_file() {
            return Err(SetupError::AudioNotFound(audio.path().to_path_buf()));
        }

        let target = lyrics::tokenize(&self.lyrics);
        if target.is_empty() {
            return Err(SetupError::EmptyLyrics);
        }

        Ok(SessionConfig {
            audio,
            target,
            idle_delay: config.idle_delay(self.difficulty),
            backspace_resets_idle_timer: config.backspace_resets_idle_timer,
        })
    }
}
