use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempotype::{
    app::{App, AppState, Flow},
    config::Config,
    playback::{TestPlayer, TestPlayerFactory},
    runtime::{AppEvent, FixedTicker, Runner, TestEventSource},
    setup::{Difficulty, SetupForm},
};

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// App on the setup screen with an audio file on disk and no lyrics yet
fn build_app(config: Config, player: &TestPlayer) -> (App, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("track.ogg");
    std::fs::write(&audio, b"OggS").unwrap();

    let mut setup = SetupForm::new(Difficulty::Relaxing);
    setup.audio_path = audio.display().to_string();

    let app = App::new(config, setup, Box::new(TestPlayerFactory::new(player.clone())));
    (app, dir)
}

// Headless run through setup, typing and results using the Runner and a
// channel-backed event source, without a TTY.
#[test]
fn headless_session_from_setup_to_results() {
    let player = TestPlayer::new();
    let (mut app, _dir) = build_app(Config::default(), &player);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    // lyrics arrive as a paste into the lyrics field, then start
    tx.send(key(KeyCode::Tab)).unwrap();
    tx.send(AppEvent::Paste("  hi\n there ".into())).unwrap();
    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)))
        .unwrap();
    for c in "hi thxre".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }

    for _ in 0..200u32 {
        if app.handle_event(runner.step(), Instant::now()) == Flow::Quit {
            break;
        }
        if app.state == AppState::Results {
            break;
        }
    }

    assert_eq!(app.state, AppState::Results, "session should have completed");
    let summary = app.summary.expect("results are available");
    assert_eq!(summary.chars, 8);
    // one wrong character out of eight
    assert_eq!(summary.result.accuracy, 88);
    assert_eq!(player.probe().opened.len(), 1);
    assert!(!player.probe().playing, "music stops when the session ends");

    // back to setup keeps the form, drops the session
    tx.send(key(KeyCode::Enter)).unwrap();
    app.handle_event(runner.step(), Instant::now());
    assert_eq!(app.state, AppState::Setup);
    assert!(app.summary.is_none());
    assert!(app.setup.lyrics.contains("there"));
}

#[test]
fn headless_music_pauses_when_typing_stops() {
    let player = TestPlayer::new();
    let config = Config {
        idle_delay_ms: Some(30),
        ..Config::default()
    };
    let (mut app, _dir) = build_app(config, &player);
    app.setup.lyrics = "hello world".into();
    app.start_session();
    assert_eq!(app.state, AppState::Typing);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key(KeyCode::Char('h'))).unwrap();
    app.handle_event(runner.step(), Instant::now());
    assert!(app.session.as_ref().unwrap().is_playing());
    assert_eq!(player.probe().plays, 1);

    let begin = Instant::now();
    let give_up = Duration::from_secs(2);
    while app.session.as_ref().unwrap().is_playing() && begin.elapsed() < give_up {
        app.handle_event(runner.step(), Instant::now());
    }

    assert!(!app.session.as_ref().unwrap().is_playing());
    assert!(begin.elapsed() >= Duration::from_millis(25));
    assert_eq!(player.probe().pauses, 1);

    // the next keystroke resumes the track
    tx.send(key(KeyCode::Char('e'))).unwrap();
    app.handle_event(runner.step(), Instant::now());
    assert!(app.session.as_ref().unwrap().is_playing());
    assert_eq!(player.probe().plays, 2);
}

#[test]
fn headless_missing_lyrics_stays_on_setup() {
    let player = TestPlayer::new();
    let (mut app, _dir) = build_app(Config::default(), &player);

    app.setup.focus = tempotype::setup::SetupField::Difficulty;
    let flow = app.handle_event(key(KeyCode::Enter), Instant::now());

    assert_eq!(flow, Flow::Redraw);
    assert_eq!(app.state, AppState::Setup);
    assert!(app.setup.message.is_some());
    assert!(player.probe().opened.is_empty());
}

#[test]
fn headless_quits_when_input_closes() {
    let player = TestPlayer::new();
    let (mut app, _dir) = build_app(Config::default(), &player);
    app.setup.lyrics = "hello".into();
    app.start_session();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    tx.send(key(KeyCode::Char('h'))).unwrap();
    drop(tx);

    let mut steps = 0;
    while app.handle_event(runner.step(), Instant::now()) != Flow::Quit {
        steps += 1;
        assert!(steps < 10, "closed input should end the loop");
    }

    assert!(app.session.is_none());
    assert!(!player.probe().playing);
}
