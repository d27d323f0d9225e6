use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};
use zone_reader::{alignment::GeometryProbe, engine::Phase};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Screen regions of the reader overlay.
pub struct ReaderLayout {
    pub header: Rect,
    pub word: Rect,
    pub controls: Rect,
    pub progress: Rect,
}

pub fn reader_layout(area: Rect) -> ReaderLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(3),    // word display
            Constraint::Length(1), // controls
            Constraint::Length(1), // progress
        ])
        .split(area);

    ReaderLayout {
        header: chunks[0],
        word: chunks[1],
        controls: chunks[2],
        progress: chunks[3],
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = reader_layout(area);
        let engine = &self.engine;
        let state = engine.get_state();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let accent = Color::Rgb(239, 68, 68);
        let muted_style = Style::default().fg(Color::Rgb(148, 163, 184));

        let header = Paragraph::new(Line::from(vec![
            Span::styled("📖 Read in the Zone ", bold_style),
            Span::styled(
                format!(" {} ", self.source),
                Style::default().fg(Color::Rgb(252, 165, 165)).bg(Color::Rgb(90, 30, 30)),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
        header.render(layout.header, buf);

        let middle_row = layout.word.y + layout.word.height / 2;
        let message_area = |rows: u16| Rect {
            x: layout.word.x,
            y: middle_row.saturating_sub(rows / 2),
            width: layout.word.width,
            height: rows.min(layout.word.height),
        };

        match (state.phase, &self.frame) {
            (Phase::Complete, _) if !self.lingering() => {
                Paragraph::new(Span::styled(
                    "✓ Complete!",
                    Style::default().fg(Color::Rgb(96, 165, 250)).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center)
                .render(message_area(1), buf);
            }
            (Phase::Idle, _) | (_, None) => {
                Paragraph::new(vec![
                    Line::from(Span::styled("Press ▶ to start", muted_style)),
                    Line::from(Span::styled(
                        format!("{} words ready", state.length),
                        muted_style.add_modifier(Modifier::ITALIC),
                    )),
                ])
                .alignment(Alignment::Center)
                .render(message_area(2), buf);
            }
            (_, Some(_)) if layout.word.height == 0 || layout.word.width == 0 => {}
            (_, Some(frame)) => {
                let word_box = engine
                    .surface()
                    .measure_word_box()
                    .translated(frame.horizontal_offset);
                let mut x = word_box.left.round() as i32;
                let widths = engine.surface().glyph_widths();
                let right_edge = i32::from(layout.word.x) + i32::from(layout.word.width);

                for (glyph, width) in frame.characters.iter().zip(widths) {
                    let style = if glyph.is_orp {
                        bold_style.fg(accent)
                    } else {
                        bold_style.fg(Color::White)
                    };
                    if x >= i32::from(layout.word.x) && x + (*width as i32) <= right_edge {
                        buf.set_string(x as u16, middle_row, glyph.ch.to_string(), style);
                    }
                    x += *width as i32;
                }

                // fixation marker under the ORP column
                let fixation_x =
                    (layout.word.x as f64 + layout.word.width as f64 * self.fixation_ratio).floor() as i32;
                if middle_row + 1 < layout.word.y + layout.word.height && fixation_x < right_edge {
                    buf.set_string(
                        fixation_x as u16,
                        middle_row + 1,
                        "▔",
                        Style::default().fg(accent).add_modifier(Modifier::DIM),
                    );
                }
            }
        }

        let toggle = if state.is_playing { "⏸" } else { "▶" };
        let controls = Paragraph::new(Line::from(vec![
            Span::styled(format!("[space] {toggle}  "), bold_style),
            Span::styled("[r] ↻  ", bold_style),
            Span::styled("[↑/↓] ", bold_style),
            Span::styled(format!("{}", state.rate), bold_style.fg(accent)),
            Span::styled(" WPM  ", bold_style),
            Span::styled("[esc] close", muted_style),
        ]))
        .alignment(Alignment::Center);
        controls.render(layout.controls, buf);

        let progress = engine.progress();
        Gauge::default()
            .gauge_style(Style::default().fg(accent).bg(Color::Rgb(40, 40, 60)))
            .ratio(progress.fraction().clamp(0.0, 1.0))
            .label(format!("{}%", progress.percent()))
            .render(layout.progress, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zone_reader::{config::Config, source::SourceKind};

    fn rendered(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn row(app: &App, area: Rect, y: u16) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        (area.x..area.x + area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn idle_screen_shows_ready_message() {
        let app = App::new("one two three", SourceKind::Selection, &Config::default(), Rect::new(0, 0, 80, 24));
        let content = rendered(&app, 80, 24);
        assert!(content.contains("Press ▶ to start"));
        assert!(content.contains("3 words ready"));
        assert!(content.contains("Selection"));
        assert!(content.contains("300"));
        assert!(content.contains("0%"));
    }

    #[test]
    fn playing_screen_shows_current_word_at_fixation() {
        let area = Rect::new(0, 0, 80, 24);
        let mut app = App::new("recognition done", SourceKind::Article, &Config::default(), area);
        app.engine.play();
        app.on_tick();

        let layout = reader_layout(area);
        let middle = layout.word.y + layout.word.height / 2;
        let line = row(&app, area, middle);
        assert!(line.contains("recognition"));

        // ORP 'o' sits in the fixation column: 5 + 70 * 0.35 = 29.5
        let fixation = (layout.word.x as f64 + layout.word.width as f64 * 0.35).floor() as usize;
        let cells: Vec<char> = line.chars().collect();
        assert_eq!(cells[fixation], 'o');
        assert!(rendered(&app, 80, 24).contains("50%"));
    }

    #[test]
    fn empty_text_renders_complete() {
        let app = App::new("   ", SourceKind::Selection, &Config::default(), Rect::new(0, 0, 80, 24));
        let content = rendered(&app, 80, 24);
        assert!(content.contains("✓ Complete!"));
        assert!(content.contains("100%"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut app = App::new("a few words", SourceKind::Selection, &Config::default(), Rect::new(0, 0, 12, 6));
        app.engine.play();
        app.on_tick();
        let _ = rendered(&app, 12, 6);
    }
}
