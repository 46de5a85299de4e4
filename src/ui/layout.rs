use {
    super::renderer::{
        format_decimal, format_poh, format_rank, format_thousands, poh_style, shorten_address,
        status_style,
    },
    crate::{
        state::{AppState, Focus, Notification, SortColumn, SortDirection},
        stats::{PohFilter, Totals},
    },
    ratatui::{
        layout::{Constraint, Direction, Layout as RatLayout, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
        Frame,
    },
};

const INPUT_HEIGHT: u16 = 7;

/// Render the main UI layout
pub fn render_layout(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = RatLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Length(INPUT_HEIGHT), // Address input
            Constraint::Length(3),            // POH filter
            Constraint::Length(5),            // Stats cards
            Constraint::Min(0),               // Results table
            Constraint::Length(3),            // Footer/Status
        ])
        .split(area);

    render_header(f, chunks[0], state);
    render_input(f, chunks[1], state);
    render_filter_bar(f, chunks[2], state);
    render_stats(f, chunks[3], state);
    render_results_table(f, chunks[4], state);
    render_footer(f, chunks[5], state);
}

fn render_header(f: &mut Frame, area: Rect, state: &AppState) {
    let hints = match state.focus() {
        Focus::Input => "Type or paste addresses | F5/Ctrl+R query | Tab table | Ctrl+L clear | Esc quit",
        Focus::Table => "b/p/r/h sort | f or 1/2/3 filter | ↑/↓ scroll | F5 query | Tab edit | q quit",
    };

    let text = vec![
        Line::from(vec![
            Span::styled(
                "Linea Lookup",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - LXP / LXP-L / POH"),
        ]),
        Line::from(Span::raw(hints)),
    ];

    let header = Block::default().borders(Borders::ALL);
    f.render_widget(Paragraph::new(text).block(header), area);
}

fn render_input(f: &mut Frame, area: Rect, state: &AppState) {
    let border_style = if state.focus() == Focus::Input {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let mut lines: Vec<Line> = state.input().split('\n').map(Line::raw).collect();
    if state.focus() == Focus::Input {
        if let Some(last) = lines.pop() {
            let mut spans = last.spans;
            spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
            lines.push(Line::from(spans));
        }
    }

    // Keep the cursor line visible
    let inner_height = INPUT_HEIGHT.saturating_sub(2) as usize;
    let offset = lines.len().saturating_sub(inner_height) as u16;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title("Linea addresses, one per line");
    f.render_widget(Paragraph::new(lines).block(block).scroll((offset, 0)), area);
}

fn render_filter_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = Vec::new();
    for (key, filter) in [
        ("1", PohFilter::All),
        ("2", PohFilter::Verified),
        ("3", PohFilter::Unverified),
    ] {
        let style = if state.filter() == filter {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" [{}] {} ", key, filter.label()), style));
        spans.push(Span::raw("  "));
    }

    let block = Block::default().borders(Borders::ALL).title("POH filter");
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_stats(f: &mut Frame, area: Rect, state: &AppState) {
    let cards = RatLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let stats = state.stats();
    render_stats_card(f, cards[0], "Totals", Color::Cyan, "Addresses", &stats.total);
    render_stats_card(f, cards[1], "POH verified", Color::Green, "Count", &stats.matching);
    render_stats_card(f, cards[2], "POH unverified", Color::Red, "Count", &stats.rest);
}

fn render_stats_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    color: Color,
    count_label: &str,
    totals: &Totals,
) {
    let value = Style::default().add_modifier(Modifier::BOLD);
    let text = vec![
        Line::from(vec![
            Span::raw(format!("{}: ", count_label)),
            Span::styled(format_thousands(totals.count as u64), value),
        ]),
        Line::from(vec![
            Span::raw("LXP: "),
            Span::styled(format_decimal(&totals.balance()), value),
        ]),
        Line::from(vec![
            Span::raw("LXP-L: "),
            Span::styled(format_thousands(totals.points), value),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn sort_marker(state: &AppState, column: SortColumn) -> &'static str {
    match state.sort() {
        Some(order) if order.column == column => match order.direction {
            SortDirection::Ascending => " ▲",
            SortDirection::Descending => " ▼",
        },
        _ => "",
    }
}

fn render_results_table(f: &mut Frame, area: Rect, state: &AppState) {
    let header = Row::new(vec![
        "#".to_string(),
        "Address".to_string(),
        format!("LXP{}", sort_marker(state, SortColumn::Balance)),
        format!("LXP-L{}", sort_marker(state, SortColumn::Points)),
        format!("Rank{}", sort_marker(state, SortColumn::Rank)),
        format!("POH{}", sort_marker(state, SortColumn::Poh)),
        "Status".to_string(),
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    // Full addresses need 42 columns; squeeze them on narrow terminals
    let address_width: u16 = if area.width < 120 { 15 } else { 44 };

    let rows: Vec<Row> = state
        .visible_rows()
        .into_iter()
        .enumerate()
        .map(|(position, row)| {
            let status = row.status();
            Row::new(vec![
                Cell::from((position + 1).to_string()),
                Cell::from(shorten_address(&row.address, address_width as usize - 2)),
                Cell::from(row.balance.amount.clone()),
                Cell::from(row.points.points.to_string()),
                Cell::from(format_rank(row.points.rank)),
                Cell::from(Span::styled(format_poh(row.verified), poh_style(row.verified))),
                Cell::from(Span::styled(status.to_string(), status_style(&status))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),  // #
        Constraint::Length(address_width),
        Constraint::Length(26), // LXP
        Constraint::Length(10), // LXP-L
        Constraint::Length(9),  // Rank
        Constraint::Length(6),  // POH
        Constraint::Min(10),    // Status
    ];

    let title = if state.is_loading() {
        "Results (loading...)"
    } else {
        "Results"
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut table_state = TableState::default();
    if state.focus() == Focus::Table && !state.rows().is_empty() {
        table_state = table_state.with_selected(Some(state.scroll()));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}

fn render_footer(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = Vec::new();

    if state.is_loading() {
        spans.push(Span::styled("⏳ Loading", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" | "));
    }

    match state.notification() {
        Some(Notification::Info(message)) => {
            spans.push(Span::styled(message.clone(), Style::default().fg(Color::Green)));
        }
        Some(Notification::Error(message)) => {
            spans.push(Span::styled(message.clone(), Style::default().fg(Color::Red)));
        }
        None => spans.push(Span::raw("Ready")),
    }

    if let Some(timestamp) = state.last_query_at() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("Last query: ", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format_timestamp(timestamp)));
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        "Data is queried locally and never uploaded",
        Style::default().fg(Color::DarkGray),
    ));

    let footer = Block::default().borders(Borders::ALL).title("Status");
    f.render_widget(Paragraph::new(Line::from(spans)).block(footer), area);
}

fn format_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Local, Utc};

    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(dt) => dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "N/A".to_string(),
    }
}
