use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::{accent_style, bold_style, italic_style, HORIZONTAL_MARGIN};
use crate::{
    config::Config,
    lyrics,
    setup::{Difficulty, SetupField, SetupForm},
};

const CARET: &str = "█";

fn field_block(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
}

/// Wrapped line count, so the end of long lyrics stays in view while typing
fn wrapped_lines(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    text.split('\n')
        .map(|line| line.width().div_ceil(width).max(1))
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}

fn difficulty_line(selected: Difficulty, config: &Config) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        let label = match config.idle_delay_ms {
            Some(_) => format!(" {} {} ", i + 1, difficulty),
            None => format!(
                " {} {} ({}ms) ",
                i + 1,
                difficulty,
                config.presets.idle_delay(difficulty).as_millis()
            ),
        };
        let style = if difficulty == selected {
            bold_style().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("  "));
    }
    // an explicit delay wins over every preset
    if let Some(ms) = config.idle_delay_ms {
        spans.push(Span::styled(
            format!("idle delay fixed at {}ms", ms.max(1)),
            italic_style(),
        ));
    }
    Line::from(spans)
}

pub fn render(form: &SetupForm, config: &Config, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(3), // audio
            Constraint::Min(3),    // lyrics
            Constraint::Length(3), // difficulty
            Constraint::Length(1), // message
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled("tempotype", accent_style()))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let audio_focused = form.focus == SetupField::Audio;
    let mut audio_text = form.audio_path.clone();
    if audio_focused {
        audio_text.push_str(CARET);
    }
    Paragraph::new(audio_text)
        .block(field_block("audio file".to_string(), audio_focused))
        .render(chunks[1], buf);

    let lyrics_focused = form.focus == SetupField::Lyrics;
    let mut lyrics_text = form.lyrics.clone();
    if lyrics_focused {
        lyrics_text.push_str(CARET);
    }
    let inner = chunks[2].height.saturating_sub(2);
    let scroll =
        wrapped_lines(&lyrics_text, chunks[2].width.saturating_sub(2)).saturating_sub(inner);
    Paragraph::new(lyrics_text)
        .block(field_block(
            format!("lyrics ({} words)", lyrics::word_count(&form.lyrics)),
            lyrics_focused,
        ))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .render(chunks[2], buf);

    Paragraph::new(difficulty_line(form.difficulty, config))
        .block(field_block(
            "difficulty".to_string(),
            form.focus == SetupField::Difficulty,
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    if let Some(message) = form.message.as_deref() {
        Paragraph::new(Span::styled(
            message.to_owned(),
            bold_style().fg(Color::Red),
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    }

    Paragraph::new(Span::styled(
        "(tab) next field / (enter) on difficulty or (ctrl+s) start / (esc)ape",
        italic_style(),
    ))
    .wrap(Wrap { trim: true })
    .render(chunks[5], buf);
}
