//! Plain report output for non-interactive runs
//!
//! Same projection as the TUI (filter first, then table and stats), written
//! as aligned text or JSON so it can be piped.

use {
    crate::{
        batch::Row,
        stats::{PohFilter, Stats, Totals},
        ui::renderer::{format_decimal, format_poh, format_rank, format_thousands},
    },
    serde::Serialize,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    index: usize,
    address: &'a str,
    balance: &'a str,
    points: u64,
    rank: u64,
    poh: bool,
    status: String,
}

#[derive(Debug, Serialize)]
struct JsonTotals {
    count: usize,
    balance: String,
    points: u64,
}

impl From<&Totals> for JsonTotals {
    fn from(totals: &Totals) -> Self {
        Self {
            count: totals.count,
            balance: totals.balance(),
            points: totals.points,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    rows: Vec<JsonRow<'a>>,
    total: JsonTotals,
    verified: JsonTotals,
    unverified: JsonTotals,
}

/// Render filtered rows and their stats in the requested format
pub fn render(
    rows: &[Row],
    filter: PohFilter,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    let visible = filter.apply(rows);
    let stats = Stats::by_attestation(visible.iter().copied());

    match format {
        ReportFormat::Table => Ok(render_table(&visible, &stats)),
        ReportFormat::Json => render_json(&visible, &stats),
    }
}

fn render_json(rows: &[&Row], stats: &Stats) -> Result<String, serde_json::Error> {
    let report = JsonReport {
        rows: rows
            .iter()
            .map(|row| JsonRow {
                index: row.index,
                address: &row.address,
                balance: &row.balance.amount,
                points: row.points.points,
                rank: row.points.rank,
                poh: row.verified,
                status: row.status().to_string(),
            })
            .collect(),
        total: (&stats.total).into(),
        verified: (&stats.matching).into(),
        unverified: (&stats.rest).into(),
    };
    serde_json::to_string_pretty(&report)
}

fn render_table(rows: &[&Row], stats: &Stats) -> String {
    let header = ["#", "Address", "LXP", "LXP-L", "Rank", "POH", "Status"].map(String::from);
    let body: Vec<[String; 7]> = rows
        .iter()
        .enumerate()
        .map(|(position, row)| {
            [
                (position + 1).to_string(),
                row.address.clone(),
                row.balance.amount.clone(),
                row.points.points.to_string(),
                format_rank(row.points.rank),
                format_poh(row.verified).to_string(),
                row.status().to_string(),
            ]
        })
        .collect();

    let mut widths = header.clone().map(|cell| cell.chars().count());
    for line in &body {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for line in std::iter::once(&header).chain(body.iter()) {
        let cells: Vec<String> = line
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&stats_line("Totals", &stats.total));
    out.push_str(&stats_line("POH verified", &stats.matching));
    out.push_str(&stats_line("POH unverified", &stats.rest));
    out
}

fn stats_line(label: &str, totals: &Totals) -> String {
    format!(
        "{}: {} addresses | LXP {} | LXP-L {}\n",
        label,
        format_thousands(totals.count as u64),
        format_decimal(&totals.balance()),
        format_thousands(totals.points)
    )
}
