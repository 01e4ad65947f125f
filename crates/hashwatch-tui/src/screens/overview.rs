//! Overview screen — proxy identity, share results, and hashrate windows.

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use hashwatch_core::{DashboardSnapshot, now_ms};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt;

pub struct OverviewScreen {
    focused: bool,
    snapshot: DashboardSnapshot,
}

impl OverviewScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            snapshot: DashboardSnapshot::default(),
        }
    }

    fn label_value<'a>(label: &'a str, value: String) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {label:<16}"), theme::field_label()),
            Span::styled(value, theme::field_value()),
        ])
    }

    fn render_proxy_panel(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Proxy ")
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

        let Some(summary) = self.snapshot.summary.as_deref() else {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  waiting for data...",
                    theme::key_hint(),
                ))),
                inner,
            );
            return;
        };

        let lines = vec![
            Line::from(""),
            Self::label_value("ID", summary.id.clone()),
            Self::label_value("Worker ID", summary.worker_id.clone()),
            Self::label_value("Version", summary.version.clone()),
            Self::label_value("Uptime", fmt::timespan(summary.uptime)),
            Self::label_value(
                "Miners",
                format!("{} now / {} max", summary.miners.now, summary.miners.max),
            ),
            Self::label_value("Upstreams", summary.upstreams.to_string()),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_results_panel(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Results ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(summary) = self.snapshot.summary.as_deref() else {
            return;
        };
        let results = &summary.results;

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Accepted        ", theme::field_label()),
                Span::styled(
                    fmt::count(results.accepted),
                    Style::default().fg(theme::SUCCESS_GREEN),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Rejected        ", theme::field_label()),
                Span::styled(
                    fmt::count(results.rejected),
                    Style::default().fg(theme::WARNING_YELLOW),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Invalid         ", theme::field_label()),
                Span::styled(
                    fmt::count(results.invalid),
                    Style::default().fg(theme::ERROR_RED),
                ),
            ]),
            Self::label_value("Avg share time", format!("{:.1} ms", results.avg_time)),
            Self::label_value("Latency", format!("{:.1} ms", results.latency)),
            Self::label_value("Total hashes", fmt::count(results.hashes_total)),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_hashrate_panel(&self, frame: &mut Frame, area: Rect) {
        const WINDOWS: [&str; 5] = ["1 min", "10 min", "1 hour", "12 hours", "24 hours"];

        let block = Block::default()
            .title(" Hashrate ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(summary) = self.snapshot.summary.as_deref() else {
            return;
        };

        let mut lines = vec![Line::from("")];
        for (label, sample) in WINDOWS.iter().zip(summary.hashrate.total.iter()) {
            lines.push(Self::label_value(label, fmt::hashrate(*sample)));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(error) = &self.snapshot.error {
            Line::from(vec![
                Span::styled(" ✗ ", Style::default().fg(theme::ERROR_RED)),
                Span::styled(error.clone(), Style::default().fg(theme::ERROR_RED)),
            ])
        } else if let Some(ts) = self.snapshot.last_success {
            Line::from(vec![
                Span::styled(" ✓ ", Style::default().fg(theme::SUCCESS_GREEN)),
                Span::styled(
                    format!("updated {}", fmt::last_seen(ts, now_ms())),
                    theme::key_hint(),
                ),
            ])
        } else {
            Line::from(Span::styled(" no data yet", theme::key_hint()))
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl Component for OverviewScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.snapshot = snapshot.clone();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(9),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

        let top = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        self.render_proxy_panel(frame, top[0]);
        self.render_results_panel(frame, top[1]);
        self.render_hashrate_panel(frame, rows[1]);
        self.render_status_line(frame, rows[2]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "overview"
    }
}
