//! Settings screen — edit the proxy connection from within the TUI.
//!
//! Up/Down move between fields, typed characters go to the focused text
//! field, Space toggles/cycles the toggle fields, Enter applies the whole
//! form and triggers an immediate poll.

use color_eyre::eyre::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use secrecy::{ExposeSecret, SecretString};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use hashwatch_core::{ProxyConfig, RefreshInterval};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsField {
    Url,
    Token,
    AutoRefresh,
    Interval,
}

impl SettingsField {
    const ALL: [SettingsField; 4] = [Self::Url, Self::Token, Self::AutoRefresh, Self::Interval];

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct SettingsScreen {
    focused: bool,
    active_field: SettingsField,
    url_input: Input,
    token_input: Input,
    auto_refresh: bool,
    interval: RefreshInterval,
    timeout: std::time::Duration,
    show_token: bool,
}

impl SettingsScreen {
    pub fn new(config: &ProxyConfig) -> Self {
        let token = config
            .access_token
            .as_ref()
            .map_or_else(String::new, |t| t.expose_secret().to_owned());
        Self {
            focused: false,
            active_field: SettingsField::Url,
            url_input: Input::new(config.api_url.clone()),
            token_input: Input::new(token),
            auto_refresh: config.auto_refresh,
            interval: config.refresh_interval,
            timeout: config.timeout,
            show_token: false,
        }
    }

    fn build_config(&self) -> ProxyConfig {
        let token = self.token_input.value().trim();
        ProxyConfig {
            api_url: self.url_input.value().trim().to_owned(),
            access_token: (!token.is_empty()).then(|| SecretString::from(token.to_owned())),
            auto_refresh: self.auto_refresh,
            refresh_interval: self.interval,
            timeout: self.timeout,
        }
    }

    fn render_text_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        field: SettingsField,
        label: &str,
        value: &str,
    ) {
        let active = self.active_field == field;
        let cursor = if active { "█" } else { "" };
        let line = Line::from(vec![
            Span::styled(format!("  {label:<14}"), theme::field_label()),
            Span::styled(format!("{value}{cursor}"), if active {
                theme::field_value()
            } else {
                theme::table_row()
            }),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_toggle_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        field: SettingsField,
        label: &str,
        value: String,
    ) {
        let active = self.active_field == field;
        let line = Line::from(vec![
            Span::styled(format!("  {label:<14}"), theme::field_label()),
            Span::styled(format!("‹ {value} ›"), if active {
                theme::tab_active()
            } else {
                theme::table_row()
            }),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl Component for SettingsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up => {
                self.active_field = self.active_field.prev();
                return Ok(Some(Action::Render));
            }
            KeyCode::Down => {
                self.active_field = self.active_field.next();
                return Ok(Some(Action::Render));
            }
            KeyCode::Enter => return Ok(Some(Action::ApplyConfig(self.build_config()))),
            _ => {}
        }

        match self.active_field {
            SettingsField::Url => {
                self.url_input.handle_event(&CrosstermEvent::Key(key));
                Ok(Some(Action::Render))
            }
            SettingsField::Token => {
                if key.code == KeyCode::Char('*') {
                    // Reveal toggle kept off the input so tokens with
                    // asterisks still need paste, not blind typing.
                    self.show_token = !self.show_token;
                } else {
                    self.token_input.handle_event(&CrosstermEvent::Key(key));
                }
                Ok(Some(Action::Render))
            }
            SettingsField::AutoRefresh => match key.code {
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    self.auto_refresh = !self.auto_refresh;
                    Ok(Some(Action::Render))
                }
                _ => Ok(None),
            },
            SettingsField::Interval => match key.code {
                KeyCode::Char(' ') | KeyCode::Right => {
                    self.interval = self.interval.next();
                    Ok(Some(Action::Render))
                }
                _ => Ok(None),
            },
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Connection Settings ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(1), // spacer
            Constraint::Length(1), // url
            Constraint::Length(1), // token
            Constraint::Length(1), // auto refresh
            Constraint::Length(1), // interval
            Constraint::Length(1), // spacer
            Constraint::Length(1), // hints
            Constraint::Min(0),
        ])
        .split(inner);

        self.render_text_field(frame, rows[1], SettingsField::Url, "API URL", self.url_input.value());

        let token_display = if self.show_token {
            self.token_input.value().to_owned()
        } else {
            "•".repeat(self.token_input.value().chars().count())
        };
        self.render_text_field(
            frame,
            rows[2],
            SettingsField::Token,
            "Access token",
            &token_display,
        );

        self.render_toggle_field(
            frame,
            rows[3],
            SettingsField::AutoRefresh,
            "Auto refresh",
            if self.auto_refresh { "on" } else { "off" }.into(),
        );
        self.render_toggle_field(
            frame,
            rows[4],
            SettingsField::Interval,
            "Interval",
            self.interval.label().into(),
        );

        let hints = Line::from(vec![
            Span::styled("  ↑/↓ ", theme::key_hint_key()),
            Span::styled("field  ", theme::key_hint()),
            Span::styled("Space ", theme::key_hint_key()),
            Span::styled("toggle/cycle  ", theme::key_hint()),
            Span::styled("* ", theme::key_hint_key()),
            Span::styled("reveal token  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("connect", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), rows[6]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "settings"
    }
}
