//! Row filtering and summary statistics
//!
//! Balances are summed exactly in base units and only rounded when shown,
//! so a partition total plus its complement always equals the overall total.

use {
    crate::{batch::Row, fetch::balance::TOKEN_DECIMALS},
    alloy_primitives::U256,
};

/// Row selection by POH flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PohFilter {
    #[default]
    All,
    Verified,
    Unverified,
}

impl PohFilter {
    pub fn matches(self, row: &Row) -> bool {
        match self {
            PohFilter::All => true,
            PohFilter::Verified => row.verified,
            PohFilter::Unverified => !row.verified,
        }
    }

    pub fn apply<'a>(self, rows: &'a [Row]) -> Vec<&'a Row> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }

    /// All → Verified → Unverified → All
    pub fn next(self) -> Self {
        match self {
            PohFilter::All => PohFilter::Verified,
            PohFilter::Verified => PohFilter::Unverified,
            PohFilter::Unverified => PohFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PohFilter::All => "Show all",
            PohFilter::Verified => "POH verified only",
            PohFilter::Unverified => "POH unverified only",
        }
    }
}

/// Count and sums over one set of rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    pub count: usize,
    /// Summed balance in base units
    pub balance_raw: U256,
    pub points: u64,
}

impl Totals {
    fn add(&mut self, row: &Row) {
        self.count += 1;
        self.balance_raw = self.balance_raw.saturating_add(row.balance.raw);
        self.points = self.points.saturating_add(row.points.points);
    }

    /// Balance rounded half-up to 2 decimals, e.g. `"1234.57"`
    pub fn balance(&self) -> String {
        round_to_cents(self.balance_raw, TOKEN_DECIMALS)
    }
}

/// Summary over a row set and one partition of it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: Totals,
    /// Rows matching the partition predicate
    pub matching: Totals,
    /// Rows not matching it
    pub rest: Totals,
}

impl Stats {
    pub fn partitioned<'a, I, P>(rows: I, predicate: P) -> Self
    where
        I: IntoIterator<Item = &'a Row>,
        P: Fn(&Row) -> bool,
    {
        let mut stats = Stats::default();
        for row in rows {
            stats.total.add(row);
            if predicate(row) {
                stats.matching.add(row);
            } else {
                stats.rest.add(row);
            }
        }
        stats
    }

    /// Partition by POH flag: `matching` are verified, `rest` unverified
    pub fn by_attestation<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Row>,
    {
        Self::partitioned(rows, |row| row.verified)
    }
}

fn round_to_cents(raw: U256, decimals: u8) -> String {
    if decimals < 2 {
        let cents = raw * U256::from(10u64).pow(U256::from(2 - decimals));
        return format_cents(cents);
    }
    let unit = U256::from(10u64).pow(U256::from(decimals - 2));
    let half = unit / U256::from(2u64);
    format_cents(raw.saturating_add(half) / unit)
}

fn format_cents(cents: U256) -> String {
    let hundred = U256::from(100u64);
    format!("{}.{:0>2}", cents / hundred, (cents % hundred).to_string())
}
