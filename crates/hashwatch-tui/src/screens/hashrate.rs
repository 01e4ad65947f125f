//! Hashrate screen — chart of the rolling history buffer plus window stats.

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph};

use hashwatch_core::DashboardSnapshot;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt;

pub struct HashrateScreen {
    focused: bool,
    snapshot: DashboardSnapshot,
}

impl HashrateScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            snapshot: DashboardSnapshot::default(),
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn render_chart(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Hashrate (1m window, sampled every 30s) ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let points: Vec<(f64, f64)> = self
            .snapshot
            .history
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.hashrate))
            .collect();

        if points.len() < 2 {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  collecting samples...",
                    theme::key_hint(),
                ))),
                inner,
            );
            return;
        }

        let y_max = points
            .iter()
            .map(|&(_, y)| y)
            .fold(0.0_f64, f64::max)
            .max(1.0);
        let x_max = (points.len() - 1) as f64;

        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::AMBER))
            .data(&points);

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels(vec![
                        Span::styled("oldest", theme::key_hint()),
                        Span::styled("newest", theme::key_hint()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max * 1.1])
                    .labels(vec![
                        Span::styled("0", theme::key_hint()),
                        Span::styled(fmt::hashrate(y_max * 0.55), theme::key_hint()),
                        Span::styled(fmt::hashrate(y_max * 1.1), theme::key_hint()),
                    ]),
            );

        frame.render_widget(chart, area);
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Windows ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
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
        let windows = &summary.hashrate;

        let pair = |label: &'static str, value: f64| {
            Line::from(vec![
                Span::styled(format!("  {label:<10}"), theme::field_label()),
                Span::styled(fmt::hashrate(value), theme::field_value()),
            ])
        };

        let lines = vec![
            Line::from(""),
            pair("1m", windows.total[0]),
            pair("10m", windows.total[1]),
            pair("1h", windows.total[2]),
            pair("12h", windows.total[3]),
            pair("24h", windows.total[4]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Average   ", theme::field_label()),
                Span::styled(
                    fmt::hashrate(windows.average()),
                    Style::default().fg(theme::SUCCESS_GREEN),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Peak      ", theme::field_label()),
                Span::styled(
                    fmt::hashrate(windows.peak()),
                    Style::default().fg(theme::EMBER_ORANGE),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for HashrateScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.snapshot = snapshot.clone();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let cols =
            Layout::horizontal([Constraint::Min(40), Constraint::Length(30)]).split(area);
        self.render_chart(frame, cols[0]);
        self.render_stats(frame, cols[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "hashrate"
    }
}
