// ── Worker table model ──
//
// Pure view computation: given the raw worker list plus sort/filter
// settings, produce the ordered rows and the activity tallies. No state
// lives here; the workers screen owns the SortSpec/FilterSpec values.

use hashwatch_api::WorkerRecord;

/// The thirteen sortable columns, in wire-slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerColumn {
    Name,
    Ip,
    Connections,
    Accepted,
    Rejected,
    Invalid,
    HashesTotal,
    LastSeen,
    #[default]
    Hashrate1m,
    Hashrate10m,
    Hashrate1h,
    Hashrate12h,
    Hashrate24h,
}

impl WorkerColumn {
    /// All columns in header order.
    pub const ALL: [WorkerColumn; 13] = [
        Self::Name,
        Self::Ip,
        Self::Connections,
        Self::Accepted,
        Self::Rejected,
        Self::Invalid,
        Self::HashesTotal,
        Self::LastSeen,
        Self::Hashrate1m,
        Self::Hashrate10m,
        Self::Hashrate1h,
        Self::Hashrate12h,
        Self::Hashrate24h,
    ];

    /// Column header label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Ip => "IP Address",
            Self::Connections => "Conns",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Invalid => "Invalid",
            Self::HashesTotal => "Total Hashes",
            Self::LastSeen => "Last Seen",
            Self::Hashrate1m => "1m",
            Self::Hashrate10m => "10m",
            Self::Hashrate1h => "1h",
            Self::Hashrate12h => "12h",
            Self::Hashrate24h => "24h",
        }
    }

    /// Text columns sort by string comparison and default to ascending.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Name | Self::Ip)
    }

    /// Next column in header order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous column in header order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Header arrow for the active sort column.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: WorkerColumn,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: WorkerColumn::Hashrate1m,
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    /// Header-click semantics: clicking the active column toggles the
    /// direction; clicking a new column selects it with its default
    /// direction (ascending for text, descending for numeric).
    pub fn click(&mut self, column: WorkerColumn) {
        if self.column == column {
            self.direction = self.direction.toggled();
        } else {
            self.column = column;
            self.direction = if column.is_text() {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
        }
    }
}

/// View filter for the workers table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub hide_inactive: bool,
}

/// Ordered, filtered table rows plus activity tallies.
///
/// `active`/`inactive` always reflect the complete unfiltered snapshot.
#[derive(Debug, Clone, Default)]
pub struct WorkerView {
    pub rows: Vec<WorkerRecord>,
    pub active: usize,
    pub inactive: usize,
}

/// Compute the table view for one render pass.
pub fn worker_view(
    workers: &[WorkerRecord],
    sort: SortSpec,
    filter: FilterSpec,
    now_ms: i64,
) -> WorkerView {
    let active = workers.iter().filter(|w| w.is_active(now_ms)).count();
    let inactive = workers.len() - active;

    let mut rows: Vec<WorkerRecord> = workers
        .iter()
        .filter(|w| !filter.hide_inactive || w.is_active(now_ms))
        .cloned()
        .collect();

    // Stable sort: equal keys keep their snapshot order.
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, sort.column);
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    WorkerView {
        rows,
        active,
        inactive,
    }
}

fn compare(a: &WorkerRecord, b: &WorkerRecord, column: WorkerColumn) -> std::cmp::Ordering {
    match column {
        WorkerColumn::Name => a.name.cmp(&b.name),
        WorkerColumn::Ip => a.ip.cmp(&b.ip),
        WorkerColumn::Connections => a.connections.cmp(&b.connections),
        WorkerColumn::Accepted => a.accepted.cmp(&b.accepted),
        WorkerColumn::Rejected => a.rejected.cmp(&b.rejected),
        WorkerColumn::Invalid => a.invalid.cmp(&b.invalid),
        WorkerColumn::HashesTotal => a.hashes_total.cmp(&b.hashes_total),
        WorkerColumn::LastSeen => a.last_seen_ms.cmp(&b.last_seen_ms),
        WorkerColumn::Hashrate1m => a.hashrate_1m.total_cmp(&b.hashrate_1m),
        WorkerColumn::Hashrate10m => a.hashrate_10m.total_cmp(&b.hashrate_10m),
        WorkerColumn::Hashrate1h => a.hashrate_1h.total_cmp(&b.hashrate_1h),
        WorkerColumn::Hashrate12h => a.hashrate_12h.total_cmp(&b.hashrate_12h),
        WorkerColumn::Hashrate24h => a.hashrate_24h.total_cmp(&b.hashrate_24h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(name: &str, ip: &str, h1m: f64, last_seen_ms: i64) -> WorkerRecord {
        WorkerRecord {
            name: name.into(),
            ip: ip.into(),
            connections: 1,
            accepted: 10,
            rejected: 0,
            invalid: 0,
            hashes_total: 1000,
            last_seen_ms,
            hashrate_1m: h1m,
            hashrate_10m: h1m,
            hashrate_1h: h1m,
            hashrate_12h: h1m,
            hashrate_24h: h1m,
        }
    }

    const NOW: i64 = 1_700_000_000_000;

    fn fleet() -> Vec<WorkerRecord> {
        vec![
            worker("alpha", "10.0.0.3", 900.0, NOW - 1_000),
            worker("bravo", "10.0.0.1", 1500.0, NOW - 700_000),
            worker("charlie", "10.0.0.2", 300.0, NOW - 10_000),
        ]
    }

    #[test]
    fn default_sort_is_hashrate_descending() {
        let view = worker_view(&fleet(), SortSpec::default(), FilterSpec::default(), NOW);
        let names: Vec<&str> = view.rows.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["bravo", "alpha", "charlie"]);
    }

    #[test]
    fn ascending_is_exact_reverse_of_descending() {
        for column in WorkerColumn::ALL {
            let asc = worker_view(
                &fleet(),
                SortSpec {
                    column,
                    direction: SortDirection::Ascending,
                },
                FilterSpec::default(),
                NOW,
            );
            let mut desc = worker_view(
                &fleet(),
                SortSpec {
                    column,
                    direction: SortDirection::Descending,
                },
                FilterSpec::default(),
                NOW,
            );
            desc.rows.reverse();
            // No duplicate keys in the fixture, so reversal is exact.
            assert_eq!(asc.rows, desc.rows, "column {column:?}");
        }
    }

    #[test]
    fn equal_keys_keep_snapshot_order() {
        let mut workers = fleet();
        for w in &mut workers {
            w.connections = 7;
        }
        let view = worker_view(
            &workers,
            SortSpec {
                column: WorkerColumn::Connections,
                direction: SortDirection::Ascending,
            },
            FilterSpec::default(),
            NOW,
        );
        let names: Vec<&str> = view.rows.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "bravo", "charlie"]);
    }

    #[test]
    fn hide_inactive_filters_rows_but_not_counts() {
        let view = worker_view(
            &fleet(),
            SortSpec::default(),
            FilterSpec {
                hide_inactive: true,
            },
            NOW,
        );
        // bravo was last seen 700s ago — past the 10 minute window.
        let names: Vec<&str> = view.rows.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "charlie"]);
        assert_eq!(view.active, 2);
        assert_eq!(view.inactive, 1);
        assert_eq!(view.active + view.inactive, 3);
    }

    #[test]
    fn counts_independent_of_filter() {
        let unfiltered = worker_view(&fleet(), SortSpec::default(), FilterSpec::default(), NOW);
        let filtered = worker_view(
            &fleet(),
            SortSpec::default(),
            FilterSpec {
                hide_inactive: true,
            },
            NOW,
        );
        assert_eq!(unfiltered.active, filtered.active);
        assert_eq!(unfiltered.inactive, filtered.inactive);
    }

    #[test]
    fn click_toggles_and_resets_direction() {
        let mut sort = SortSpec::default();
        assert_eq!(sort.direction, SortDirection::Descending);

        // Same column: toggle.
        sort.click(WorkerColumn::Hashrate1m);
        assert_eq!(sort.direction, SortDirection::Ascending);
        sort.click(WorkerColumn::Hashrate1m);
        assert_eq!(sort.direction, SortDirection::Descending);

        // New text column: ascending default.
        sort.click(WorkerColumn::Name);
        assert_eq!(sort.column, WorkerColumn::Name);
        assert_eq!(sort.direction, SortDirection::Ascending);

        // New numeric column: descending default.
        sort.click(WorkerColumn::Accepted);
        assert_eq!(sort.column, WorkerColumn::Accepted);
        assert_eq!(sort.direction, SortDirection::Descending);
    }

    #[test]
    fn text_columns_sort_lexicographically() {
        let view = worker_view(
            &fleet(),
            SortSpec {
                column: WorkerColumn::Ip,
                direction: SortDirection::Ascending,
            },
            FilterSpec::default(),
            NOW,
        );
        let ips: Vec<&str> = view.rows.iter().map(|w| w.ip.as_str()).collect();
        assert_eq!(ips, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    }
}
