//! Music that plays while the user types.
//!
//! [`PlaybackController`] couples keystroke activity to playback: every
//! [`PlaybackController::pulse`] starts the track if needed and pushes the
//! single idle deadline forward; once the deadline passes without another
//! pulse the track is paused. The controller does not know about lyrics or
//! scoring, it only sees "activity happened at `now`".

use rodio::{decoder::DecoderError, Decoder, OutputStream, OutputStreamHandle, Sink};
use std::{
    cell::{Ref, RefCell},
    fmt,
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    rc::Rc,
    time::{Duration, Instant},
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output available: {0}")]
    Output(#[from] rodio::StreamError),
    #[error("could not create audio sink: {0}")]
    Sink(#[from] rodio::PlayError),
    #[error("could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecoderError,
    },
    #[error("track has ended")]
    Ended,
}

/// Opaque handle to a playable local audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSource {
    path: PathBuf,
}

impl AudioSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without directories, for display
    pub fn title(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Something that can play and pause a single track
pub trait Player: fmt::Debug {
    /// Resume from the current position.
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    /// True once the track has played to its end.
    fn is_finished(&self) -> bool;
}

/// Opens an [`AudioSource`] into a ready-to-play, paused [`Player`]
pub trait PlayerFactory: fmt::Debug {
    fn open(&self, source: &AudioSource) -> Result<Box<dyn Player>, PlaybackError>;
}

fn decode(source: &AudioSource) -> Result<Decoder<BufReader<File>>, PlaybackError> {
    let file = File::open(source.path()).map_err(|e| PlaybackError::Open {
        path: source.path().to_path_buf(),
        source: e,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode {
        path: source.path().to_path_buf(),
        source: e,
    })
}

/// Production player backed by the default rodio output device
pub struct RodioPlayer {
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
    source: AudioSource,
    repeat: bool,
}

impl RodioPlayer {
    pub fn open(source: &AudioSource, volume: f32, repeat: bool) -> Result<Self, PlaybackError> {
        let (stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;

        // Queue the track paused; the first keystroke starts it
        sink.pause();
        sink.set_volume(volume);
        sink.append(decode(source)?);

        info!(track = %source.title(), "opened audio track");

        Ok(Self {
            _stream: stream,
            _handle: handle,
            sink,
            source: source.clone(),
            repeat,
        })
    }
}

impl fmt::Debug for RodioPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RodioPlayer")
            .field("source", &self.source)
            .field("repeat", &self.repeat)
            .field("paused", &self.sink.is_paused())
            .finish_non_exhaustive()
    }
}

impl Player for RodioPlayer {
    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.sink.empty() {
            if !self.repeat {
                return Err(PlaybackError::Ended);
            }
            debug!(track = %self.source.title(), "track ended, queueing it again");
            self.sink.append(decode(&self.source)?);
        }

        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RodioFactory {
    pub volume: f32,
    pub repeat: bool,
}

impl PlayerFactory for RodioFactory {
    fn open(&self, source: &AudioSource) -> Result<Box<dyn Player>, PlaybackError> {
        Ok(Box::new(RodioPlayer::open(source, self.volume, self.repeat)?))
    }
}

/// Idle-triggered playback: plays while pulses keep arriving, pauses once
/// `idle_delay` passes without one.
#[derive(Debug)]
pub struct PlaybackController {
    player: Option<Box<dyn Player>>,
    idle_delay: Duration,
    idle_deadline: Option<Instant>,
    is_playing: bool,
}

impl PlaybackController {
    pub fn new(idle_delay: Duration) -> Self {
        Self {
            player: None,
            idle_delay,
            idle_deadline: None,
            is_playing: false,
        }
    }

    /// Take ownership of an opened player. Any previous player is stopped.
    pub fn start(&mut self, player: Box<dyn Player>) {
        self.stop();
        self.player = Some(player);
    }

    /// Register activity: start playback if it is not running and push the
    /// idle deadline to `now + idle_delay`.
    pub fn pulse(&mut self, now: Instant) {
        if !self.is_playing {
            if let Some(player) = self.player.as_mut() {
                match player.play() {
                    Ok(()) => {
                        debug!("playback resumed");
                        self.is_playing = true;
                    }
                    Err(e) => warn!(error = %e, "audio playback failed to start"),
                }
            }
        }

        self.idle_deadline = Some(now + self.idle_delay);
    }

    /// Fire the idle deadline if it has passed. Returns true when the
    /// playing state changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if let Some(deadline) = self.idle_deadline {
            if now >= deadline {
                self.idle_deadline = None;
                if let Some(player) = self.player.as_mut() {
                    player.pause();
                }
                let was_playing = std::mem::replace(&mut self.is_playing, false);
                if was_playing {
                    debug!("idle delay elapsed, playback paused");
                }
                return was_playing;
            }
        }

        if self.is_playing && self.player.as_ref().is_some_and(|p| p.is_finished()) {
            debug!("track finished");
            self.is_playing = false;
            return true;
        }

        false
    }

    /// Cancel the idle deadline, pause, and release the player.
    pub fn stop(&mut self) {
        self.idle_deadline = None;
        if let Some(mut player) = self.player.take() {
            player.pause();
        }
        self.is_playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn idle_delay(&self) -> Duration {
        self.idle_delay
    }

    pub fn idle_deadline(&self) -> Option<Instant> {
        self.idle_deadline
    }

    pub fn has_player(&self) -> bool {
        self.player.is_some()
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// What a [`TestPlayer`] has been asked to do
#[derive(Debug, Default)]
pub struct PlayerProbe {
    pub plays: usize,
    pub pauses: usize,
    pub playing: bool,
    pub fail_play: bool,
    pub finished: bool,
    pub opened: Vec<PathBuf>,
}

/// In-memory player for headless tests; clones share one probe
#[derive(Debug, Clone, Default)]
pub struct TestPlayer {
    probe: Rc<RefCell<PlayerProbe>>,
}

impl TestPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self) -> Ref<'_, PlayerProbe> {
        self.probe.borrow()
    }

    pub fn set_fail_play(&self, fail: bool) {
        self.probe.borrow_mut().fail_play = fail;
    }

    pub fn set_finished(&self, finished: bool) {
        let mut probe = self.probe.borrow_mut();
        probe.finished = finished;
        if finished {
            probe.playing = false;
        }
    }
}

impl Player for TestPlayer {
    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut probe = self.probe.borrow_mut();
        if probe.fail_play {
            return Err(PlaybackError::Ended);
        }
        probe.plays += 1;
        probe.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        let mut probe = self.probe.borrow_mut();
        probe.pauses += 1;
        probe.playing = false;
    }

    fn is_finished(&self) -> bool {
        self.probe.borrow().finished
    }
}

/// Factory handing out clones of one [`TestPlayer`]
#[derive(Debug, Clone, Default)]
pub struct TestPlayerFactory {
    pub player: TestPlayer,
    pub fail_open: bool,
}

impl TestPlayerFactory {
    pub fn new(player: TestPlayer) -> Self {
        Self {
            player,
            fail_open: false,
        }
    }
}

impl PlayerFactory for TestPlayerFactory {
    fn open(&self, source: &AudioSource) -> Result<Box<dyn Player>, PlaybackError> {
        if self.fail_open {
            return Err(PlaybackError::Open {
                path: source.path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::Unsupported, "test factory refused"),
            });
        }
        self.player
            .probe
            .borrow_mut()
            .opened
            .push(source.path().to_path_buf());
        Ok(Box::new(self.player.clone()))
    }
}
