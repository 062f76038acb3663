pub mod results;
pub mod screen;
pub mod setup;
pub mod typing;

use ratatui::{
    style::{Color, Modifier, Style},
    Frame,
};

use crate::app::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Draw whichever screen the app is on
pub fn draw(app: &App, f: &mut Frame) {
    let area = f.area();
    screen::current_screen(&app.state).render(app, area, f.buffer_mut());
}

fn bold_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold_style() -> Style {
    bold_style().add_modifier(Modifier::DIM)
}

fn italic_style() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn accent_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
pub(crate) mod test_util {
    use ratatui::{buffer::Buffer, layout::Rect};

    use crate::{
        app::App,
        config::Config,
        playback::TestPlayerFactory,
        setup::{Difficulty, SetupForm},
    };

    pub fn rendered(buf: &Buffer) -> String {
        let area = buf.area();
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_app(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        super::screen::current_screen(&app.state).render(app, area, &mut buf);
        rendered(&buf)
    }

    /// App on the setup screen with a real (empty) audio file on disk
    pub fn setup_app(lyrics: &str) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("song.wav");
        std::fs::write(&audio, b"RIFF").unwrap();

        let mut setup = SetupForm::new(Difficulty::Semi);
        setup.audio_path = audio.display().to_string();
        setup.lyrics = lyrics.to_string();

        let app = App::new(
            Config::default(),
            setup,
            Box::new(TestPlayerFactory::default()),
        );
        (app, dir)
    }
}
