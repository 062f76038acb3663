use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Paragraph, Widget},
};

use super::{accent_style, bold_style, italic_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::app::Summary;

pub fn render(summary: &Summary, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // score
            Constraint::Length(1), // details
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc",
            summary.result.wpm, summary.result.accuracy
        ),
        accent_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} characters in {:.1}s",
            summary.chars,
            summary.elapsed.as_secs_f64()
        ),
        bold_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled("(enter) new session / (esc)ape", italic_style()))
        .render(chunks[4], buf);
}
