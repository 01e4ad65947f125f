//! Log screen — the bounded debug log, level-colored, newest first.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use hashwatch_core::{DashboardSnapshot, LogLevel};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct LogScreen {
    focused: bool,
    snapshot: DashboardSnapshot,
    scroll: usize,
}

impl LogScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            snapshot: DashboardSnapshot::default(),
            scroll: 0,
        }
    }

    fn level_style(level: LogLevel) -> Style {
        match level {
            LogLevel::Info => Style::default().fg(theme::COOL_TEAL),
            LogLevel::Warning => Style::default().fg(theme::WARNING_YELLOW),
            LogLevel::Error => Style::default().fg(theme::ERROR_RED),
            LogLevel::Success => Style::default().fg(theme::SUCCESS_GREEN),
        }
    }
}

impl Component for LogScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('c') => {
                self.scroll = 0;
                return Ok(Some(Action::ClearLog));
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = (self.scroll + 1).min(self.snapshot.log.len().saturating_sub(1));
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::Char('g') => self.scroll = 0,
            _ => return Ok(None),
        }
        Ok(Some(Action::Render))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.snapshot = snapshot.clone();
            self.scroll = self.scroll.min(self.snapshot.log.len().saturating_sub(1));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

        let title = format!(" Debug Log ({} entries) ", self.snapshot.log.len());
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(rows[0]);
        frame.render_widget(block, rows[0]);

        let lines: Vec<Line> = self
            .snapshot
            .log
            .iter()
            .skip(self.scroll)
            .take(usize::from(inner.height))
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        entry.timestamp.format(" %H:%M:%S ").to_string(),
                        theme::key_hint(),
                    ),
                    Span::styled(
                        format!("{:<8}", entry.level.label()),
                        Self::level_style(entry.level),
                    ),
                    Span::styled(entry.message.clone(), theme::table_row()),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);

        let hints = Line::from(vec![
            Span::styled(" j/k ", theme::key_hint_key()),
            Span::styled("scroll  ", theme::key_hint()),
            Span::styled("c ", theme::key_hint_key()),
            Span::styled("clear", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), rows[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "log"
    }
}
