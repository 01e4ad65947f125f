//! Workers screen — sortable, filterable table of all tracked workers.
//!
//! ←/→ act as header clicks on the adjacent column, `v` re-clicks the
//! current column (toggles direction), `i` hides inactive workers.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use hashwatch_api::WorkerRecord;
use hashwatch_core::{
    DashboardSnapshot, FilterSpec, SortSpec, WorkerColumn, WorkerView, now_ms, worker_view,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt;

pub struct WorkersScreen {
    focused: bool,
    snapshot: DashboardSnapshot,
    sort: SortSpec,
    filter: FilterSpec,
    table_state: TableState,
}

impl WorkersScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            snapshot: DashboardSnapshot::default(),
            sort: SortSpec::default(),
            filter: FilterSpec::default(),
            table_state: TableState::default(),
        }
    }

    fn view(&self) -> WorkerView {
        let workers: &[WorkerRecord] = self
            .snapshot
            .workers
            .as_deref()
            .map_or(&[], Vec::as_slice);
        worker_view(workers, self.sort, self.filter, now_ms())
    }

    fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(len.saturating_sub(1));
        self.table_state.select(Some(next));
    }

    fn header_cells(&self) -> Vec<Cell<'static>> {
        WorkerColumn::ALL
            .iter()
            .map(|&column| {
                if column == self.sort.column {
                    Cell::from(format!("{} {}", column.label(), self.sort.direction.arrow()))
                        .style(theme::table_header().fg(theme::EMBER_ORANGE))
                } else {
                    Cell::from(column.label()).style(theme::table_header())
                }
            })
            .collect()
    }

    fn row_cells(worker: &WorkerRecord, now: i64) -> Vec<Cell<'static>> {
        let last_seen_style = if worker.is_active(now) {
            Style::default().fg(theme::SUCCESS_GREEN)
        } else {
            Style::default().fg(theme::ERROR_RED)
        };
        vec![
            Cell::from(worker.name.clone()),
            Cell::from(worker.ip.clone()),
            Cell::from(worker.connections.to_string()),
            Cell::from(fmt::count(worker.accepted)),
            Cell::from(fmt::count(worker.rejected)),
            Cell::from(fmt::count(worker.invalid)),
            Cell::from(fmt::count(worker.hashes_total)),
            Cell::from(fmt::last_seen(worker.last_seen_ms, now)).style(last_seen_style),
            Cell::from(fmt::hashrate(worker.hashrate_1m)),
            Cell::from(fmt::hashrate(worker.hashrate_10m)),
            Cell::from(fmt::hashrate(worker.hashrate_1h)),
            Cell::from(fmt::hashrate(worker.hashrate_12h)),
            Cell::from(fmt::hashrate(worker.hashrate_24h)),
        ]
    }
}

impl Component for WorkersScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let len = self.view().rows.len();
        match key.code {
            KeyCode::Left => self.sort.click(self.sort.column.prev()),
            KeyCode::Right => self.sort.click(self.sort.column.next()),
            KeyCode::Char('v') => self.sort.click(self.sort.column),
            KeyCode::Char('i') => {
                self.filter.hide_inactive = !self.filter.hide_inactive;
                self.table_state.select(Some(0));
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1, len),
            KeyCode::Char('g') => self.table_state.select(Some(0)),
            KeyCode::Char('G') => {
                if len > 0 {
                    self.table_state.select(Some(len - 1));
                }
            }
            _ => return Ok(None),
        }
        Ok(Some(Action::Render))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.snapshot = snapshot.clone();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows_area = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

        let view = self.view();
        let now = now_ms();

        // Counts always reflect the full worker list, not the filter.
        let title = format!(
            " Workers ({} active, {} inactive) ",
            view.active, view.inactive
        );
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

        let header = Row::new(self.header_cells()).height(1);
        let rows: Vec<Row> = view
            .rows
            .iter()
            .map(|w| Row::new(Self::row_cells(w, now)).style(theme::table_row()))
            .collect();

        let widths = [
            Constraint::Min(12),    // Name
            Constraint::Length(15), // IP
            Constraint::Length(6),  // Conns
            Constraint::Length(10), // Accepted
            Constraint::Length(9),  // Rejected
            Constraint::Length(8),  // Invalid
            Constraint::Length(14), // Total Hashes
            Constraint::Length(13), // Last Seen
            Constraint::Length(12), // 1m
            Constraint::Length(12), // 10m
            Constraint::Length(12), // 1h
            Constraint::Length(12), // 12h
            Constraint::Length(12), // 24h
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, rows_area[0], &mut state);

        let filter_hint = if self.filter.hide_inactive {
            "showing active only"
        } else {
            "showing all"
        };
        let hints = Line::from(vec![
            Span::styled(" ←/→ ", theme::key_hint_key()),
            Span::styled("sort column  ", theme::key_hint()),
            Span::styled("v ", theme::key_hint_key()),
            Span::styled("direction  ", theme::key_hint()),
            Span::styled("i ", theme::key_hint_key()),
            Span::styled(format!("hide inactive ({filter_hint})"), theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), rows_area[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "workers"
    }
}
