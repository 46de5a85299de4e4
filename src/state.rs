use {
    crate::{
        address::normalize_addresses,
        batch::Row,
        error::BatchError,
        stats::{PohFilter, Stats},
    },
    std::cmp::Ordering,
};

/// Message sent from a background query task to the UI loop
#[derive(Debug)]
pub enum StateMessage {
    QueryFinished(Result<Vec<Row>, BatchError>),
}

/// Which pane receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Table,
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Balance,
    Points,
    Rank,
    Poh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// One-line message shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Info(String),
    Error(String),
}

/// Everything the UI renders from
///
/// Rows are stored in input order; filtering and sorting happen on read so
/// clearing the sort always restores the original order.
pub struct AppState {
    input: String,
    rows: Vec<Row>,
    filter: PohFilter,
    sort: Option<SortOrder>,
    loading: bool,
    focus: Focus,
    notification: Option<Notification>,
    last_query_at: Option<i64>,
    scroll: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            rows: Vec::new(),
            filter: PohFilter::All,
            sort: None,
            loading: false,
            focus: Focus::Input,
            notification: None,
            last_query_at: None,
            scroll: 0,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Append pasted text, normalizing line endings
    pub fn push_str(&mut self, text: &str) {
        self.input.push_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn filter(&self) -> PohFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: PohFilter) {
        self.filter = filter;
        self.scroll = 0;
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.filter.next());
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    /// Ascending → descending → unsorted for repeated presses on one column
    pub fn cycle_sort(&mut self, column: SortColumn) {
        self.sort = match self.sort {
            Some(SortOrder {
                column: current,
                direction: SortDirection::Ascending,
            }) if current == column => Some(SortOrder {
                column,
                direction: SortDirection::Descending,
            }),
            Some(SortOrder {
                column: current,
                direction: SortDirection::Descending,
            }) if current == column => None,
            _ => Some(SortOrder {
                column,
                direction: SortDirection::Ascending,
            }),
        };
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Table,
            Focus::Table => Focus::Input,
        };
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn last_query_at(&self) -> Option<i64> {
        self.last_query_at
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_down(&mut self) {
        let visible = self.visible_rows().len();
        if self.scroll + 1 < visible {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    /// Start a query cycle, returning the addresses to look up
    ///
    /// Returns `None` while another query is still in flight or when the
    /// input holds no address.
    pub fn begin_query(&mut self) -> Option<Vec<String>> {
        if self.loading {
            self.notification = Some(Notification::Info(
                "A query is already running".to_string(),
            ));
            return None;
        }

        let addresses = normalize_addresses(&self.input);
        if addresses.is_empty() {
            self.notification = Some(Notification::Error(
                "Enter at least one address, one per line".to_string(),
            ));
            return None;
        }

        self.loading = true;
        self.notification = Some(Notification::Info(format!(
            "Querying {} addresses...",
            addresses.len()
        )));
        Some(addresses)
    }

    /// Apply a message from a background task
    pub fn apply(&mut self, message: StateMessage) {
        match message {
            StateMessage::QueryFinished(Ok(rows)) => {
                let degraded = rows.iter().filter(|row| !row.status().is_normal()).count();
                self.notification = Some(if degraded == 0 {
                    Notification::Info(format!("Fetched {} addresses", rows.len()))
                } else {
                    Notification::Error(format!(
                        "Fetched {} addresses, {} with failed lookups",
                        rows.len(),
                        degraded
                    ))
                });
                self.rows = rows;
                self.scroll = 0;
                self.focus = Focus::Table;
                self.last_query_at = Some(chrono::Utc::now().timestamp());
            }
            StateMessage::QueryFinished(Err(e)) => {
                log::warn!("Query failed: {}", e);
                self.notification = Some(Notification::Error(format!(
                    "Failed to fetch data, please check the addresses ({})",
                    e
                )));
            }
        }
        self.loading = false;
    }

    /// Rows after filtering and sorting, as shown in the table
    pub fn visible_rows(&self) -> Vec<&Row> {
        let mut rows = self.filter.apply(&self.rows);
        if let Some(order) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = compare_rows(order.column, a, b);
                match order.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }

    /// Statistics over the filtered rows
    pub fn stats(&self) -> Stats {
        Stats::by_attestation(self.filter.apply(&self.rows))
    }
}

fn compare_rows(column: SortColumn, a: &Row, b: &Row) -> Ordering {
    match column {
        SortColumn::Balance => a.balance.raw.cmp(&b.balance.raw),
        SortColumn::Points => a.points.points.cmp(&b.points.points),
        SortColumn::Rank => a.points.rank.cmp(&b.points.rank),
        SortColumn::Poh => a.verified.cmp(&b.verified),
    }
}
