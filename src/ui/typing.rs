use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use super::{
    accent_style, bold_style, dim_bold_style, italic_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN,
};
use crate::session::{CellStatus, TypingSession};

const MUSIC_BARS: &str = "▂ ▄ ▆ █ ▆ ▄ ▂ ▄ ▆ █";

/// Style every target character by its judgement; the cursor cell is underlined.
fn prompt_spans(session: &TypingSession) -> Vec<Span<'static>> {
    let green_bold_style = bold_style().fg(Color::Green);
    let red_bold_style = bold_style().fg(Color::Red);
    let underlined_dim_bold_style = dim_bold_style().add_modifier(Modifier::UNDERLINED);

    session
        .target()
        .iter()
        .zip(session.cells())
        .enumerate()
        .map(|(idx, (&expected, status))| {
            if idx == session.cursor() {
                return Span::styled(expected.to_string(), underlined_dim_bold_style);
            }
            match status {
                CellStatus::Correct => Span::styled(expected.to_string(), green_bold_style),
                CellStatus::Incorrect => Span::styled(
                    match expected {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    red_bold_style,
                ),
                CellStatus::Pending => Span::styled(expected.to_string(), dim_bold_style()),
            }
        })
        .collect()
}

/// Break the styled prompt into lines of at most `width` columns, moving
/// whole words where possible. Returns the lines and the line holding `cursor`.
fn wrap_prompt(
    spans: Vec<Span<'static>>,
    target: &[char],
    width: usize,
    cursor: usize,
) -> (Vec<Line<'static>>, usize) {
    let width = width.max(1);
    let mut lines: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    let mut line_width = 0;
    let mut cursor_line = None;
    let mut spans = spans.into_iter();
    let mut idx = 0;

    for word in target.split_inclusive(|&c| c == ' ') {
        let word_width: usize = word
            .iter()
            .filter(|&&c| c != ' ')
            .map(|c| c.width().unwrap_or(0))
            .sum();
        if line_width > 0 && line_width + word_width > width {
            lines.push(Vec::new());
            line_width = 0;
        }

        for &c in word {
            let w = c.width().unwrap_or(0);
            // words longer than a line get split
            if line_width > 0 && line_width + w > width {
                lines.push(Vec::new());
                line_width = 0;
            }
            if idx == cursor {
                cursor_line = Some(lines.len() - 1);
            }
            if let Some(span) = spans.next() {
                if let Some(line) = lines.last_mut() {
                    line.push(span);
                }
            }
            line_width += w;
            idx += 1;
        }
    }

    let cursor_line = cursor_line.unwrap_or(lines.len() - 1);
    (lines.into_iter().map(Line::from).collect(), cursor_line)
}

pub fn render(session: &TypingSession, area: Rect, buf: &mut Buffer) {
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let (lines, cursor_line) = wrap_prompt(
        prompt_spans(session),
        session.target(),
        max_chars_per_line as usize,
        session.cursor(),
    );
    let prompt_occupied_lines = lines.len().min(u16::MAX as usize) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN.min(area.height / 4))
        .constraints([
            Constraint::Length(1), // stats
            Constraint::Min(0),
            Constraint::Length(prompt_occupied_lines),
            Constraint::Min(0),
            Constraint::Length(1), // music
            Constraint::Length(1), // legend
        ])
        .split(area);

    let stats = Paragraph::new(Line::from(vec![
        Span::styled(format!("WPM: {}", session.wpm()), accent_style()),
        Span::raw("   "),
        Span::styled(format!("ACC: {}%", session.accuracy()), accent_style()),
    ]));
    stats.render(chunks[0], buf);

    // keep the cursor line in the middle once the lyrics outgrow the screen
    let visible_rows = chunks[2].height;
    let scroll = (cursor_line.min(u16::MAX as usize) as u16)
        .saturating_sub(visible_rows / 2)
        .min(prompt_occupied_lines.saturating_sub(visible_rows));

    let widget = Paragraph::new(lines)
        .alignment(if prompt_occupied_lines == 1 {
            // when the prompt is small enough to fit on one line
            // centering the text gives a nice zen feeling
            Alignment::Center
        } else {
            Alignment::Left
        })
        .scroll((scroll, 0));
    widget.render(chunks[2], buf);

    let music = if session.is_playing() {
        Paragraph::new(Span::styled(
            MUSIC_BARS,
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ))
    } else {
        Paragraph::new(Span::styled(
            "type to play music...",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ))
    };
    music.alignment(Alignment::Center).render(chunks[4], buf);

    Paragraph::new(Span::styled("(esc) back to setup", italic_style())).render(chunks[5], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::AppState,
        playback::AudioSource,
        runtime::AppEvent,
        session::{Keystroke, SessionConfig},
        ui::test_util::{render_app, rendered, setup_app},
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::{Duration, Instant};

    fn session(text: &str) -> TypingSession {
        TypingSession::new(SessionConfig::new(
            AudioSource::new("song.mp3"),
            text,
            Duration::from_millis(300),
        ))
    }

    #[test]
    fn test_spans_follow_cell_status() {
        let mut s = session("ab cd");
        let t0 = Instant::now();
        s.handle_key(Keystroke::Char('a'), t0);
        s.handle_key(Keystroke::Char('x'), t0);
        s.handle_key(Keystroke::Char('x'), t0);

        let spans = prompt_spans(&s);

        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0].style.fg, Some(Color::Green));
        assert_eq!(spans[1].style.fg, Some(Color::Red));
        // a missed space is made visible
        assert_eq!(spans[2].content, "·");
        assert!(spans[3].style.add_modifier.contains(Modifier::UNDERLINED));
        assert!(spans[4].style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_renders_prompt_and_stats() {
        let s = session("hello world");
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);

        render(&s, area, &mut buf);

        let text = rendered(&buf);
        assert!(text.contains("hello world"));
        assert!(text.contains("WPM: 0"));
        assert!(text.contains("ACC: 100%"));
        assert!(text.contains("type to play music..."));
    }

    #[test]
    fn test_music_indicator_while_playing() {
        let (mut app, _dir) = setup_app("hello world");
        app.start_session();
        assert_eq!(app.state, AppState::Typing);
        app.handle_event(
            AppEvent::Key(KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE)),
            Instant::now(),
        );

        let text = render_app(&app, 80, 24);

        assert!(text.contains(MUSIC_BARS));
        assert!(!text.contains("type to play music..."));
    }

    #[test]
    fn test_wrap_prompt_keeps_words_whole() {
        let s = session("one two three");
        let (lines, cursor_line) = wrap_prompt(prompt_spans(&s), s.target(), 8, 8);

        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["one two ", "three"]);
        assert_eq!(cursor_line, 1);
    }

    #[test]
    fn test_wrap_prompt_splits_long_words() {
        let s = session("abcdefghij");
        let (lines, cursor_line) = wrap_prompt(prompt_spans(&s), s.target(), 4, 9);

        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["abcd", "efgh", "ij"]);
        assert_eq!(cursor_line, 2);
    }

    #[test]
    fn test_cursor_stays_visible_in_long_lyrics() {
        let lyrics = vec!["lyric"; 400].join(" ");
        let mut s = session(&lyrics);
        let target = s.target().to_vec();
        let t0 = Instant::now();
        for &c in &target[..1500] {
            s.handle_key(Keystroke::Char(c), t0);
        }
        assert_eq!(s.cursor(), 1500);

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        render(&s, area, &mut buf);

        let underlined: Vec<_> = buf
            .content
            .iter()
            .filter(|cell| cell.modifier.contains(Modifier::UNDERLINED))
            .collect();
        assert_eq!(underlined.len(), 1);
        assert_eq!(underlined[0].symbol(), target[1500].to_string());
        // the text still to type is on screen too
        assert!(buf
            .content
            .iter()
            .any(|cell| cell.modifier.contains(Modifier::DIM) && cell.symbol() == "l"));
    }

    #[test]
    fn test_short_lyrics_are_centered() {
        let s = session("hello world");
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);

        render(&s, area, &mut buf);

        let text = rendered(&buf);
        let row = text.lines().find(|l| l.contains("hello world")).unwrap();
        assert!(row.find("hello world").unwrap() > HORIZONTAL_MARGIN as usize);
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let s = session("a much longer set of lyrics than the screen can hold");
        let area = Rect::new(0, 0, 8, 3);
        let mut buf = Buffer::empty(area);

        render(&s, area, &mut buf);

        assert_eq!(*buf.area(), area);
    }
}
