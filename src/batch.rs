//! Batch orchestration: fan each lookup out over the address list, then merge
//!
//! Every metric forms one group. Inside a group all per-address calls run as
//! separate tasks and the group completes only when each of them has
//! settled. A failed call already arrives as a zeroed [`Fetched`] value, so
//! it degrades its own row and nothing else. Rows are merged by index, which
//! keeps them in input order no matter which call finished first.

use {
    crate::{
        error::BatchError,
        fetch::{
            AttestationSource, Balance, BalanceSource, Fetched, Metric, Outcome, Points,
            PointsSource,
        },
    },
    std::{fmt, future::Future, sync::Arc, time::Instant},
    tokio::sync::Semaphore,
};

/// Lookups allowed in flight at once across all three groups
pub const DEFAULT_REQUEST_CONCURRENCY: usize = 16;

/// How the three lookup groups are scheduled relative to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    /// Points, attestation and balance groups run at the same time
    Concurrent,
    /// Points group, then attestation group, then balance group
    Sequential,
}

/// One merged table row
#[derive(Debug, Clone)]
pub struct Row {
    /// Position in the normalized input
    pub index: usize,
    pub address: String,
    pub points: Points,
    /// POH flag
    pub verified: bool,
    pub balance: Balance,
    pub points_outcome: Outcome,
    pub attestation_outcome: Outcome,
    pub balance_outcome: Outcome,
}

impl Row {
    pub fn status(&self) -> RowStatus {
        let failed: Vec<Metric> = [
            (Metric::Points, &self.points_outcome),
            (Metric::Attestation, &self.attestation_outcome),
            (Metric::Balance, &self.balance_outcome),
        ]
        .into_iter()
        .filter(|(_, outcome)| !outcome.is_success())
        .map(|(metric, _)| metric)
        .collect();

        if failed.is_empty() {
            RowStatus::Normal
        } else {
            RowStatus::Degraded(failed)
        }
    }
}

/// Combined fetch status of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    Normal,
    /// Metrics that failed, in points, attestation, balance order
    Degraded(Vec<Metric>),
}

impl RowStatus {
    pub fn is_normal(&self) -> bool {
        matches!(self, RowStatus::Normal)
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Normal => f.write_str("normal"),
            RowStatus::Degraded(metrics) => {
                let messages: Vec<&str> = metrics.iter().map(|m| m.failure_message()).collect();
                f.write_str(&messages.join(", "))
            }
        }
    }
}

/// Zip the three groups' results into rows, by index
pub fn merge_rows(
    addresses: &[String],
    points: Vec<Fetched<Points>>,
    attestations: Vec<Fetched<bool>>,
    balances: Vec<Fetched<Balance>>,
) -> Result<Vec<Row>, BatchError> {
    let expected = addresses.len();
    for (group, got) in [
        ("points", points.len()),
        ("attestation", attestations.len()),
        ("balance", balances.len()),
    ] {
        if got != expected {
            return Err(BatchError::Misaligned {
                group,
                expected,
                got,
            });
        }
    }

    let rows = addresses
        .iter()
        .zip(points)
        .zip(attestations)
        .zip(balances)
        .enumerate()
        .map(|(index, (((address, points), attestation), balance))| Row {
            index,
            address: address.clone(),
            points: points.value,
            verified: attestation.value,
            balance: balance.value,
            points_outcome: points.outcome,
            attestation_outcome: attestation.outcome,
            balance_outcome: balance.outcome,
        })
        .collect();

    Ok(rows)
}

/// Spawn one task per address and wait for every one of them, in input order
///
/// Each task holds a permit from `limit` while its lookup runs.
async fn fan_out<T, F, Fut>(
    group: &'static str,
    addresses: &[String],
    limit: &Arc<Semaphore>,
    lookup: F,
) -> Result<Vec<Fetched<T>>, BatchError>
where
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Fetched<T>> + Send + 'static,
{
    let started = Instant::now();
    let handles: Vec<_> = addresses
        .iter()
        .cloned()
        .map(|address| {
            let limit = limit.clone();
            let task = lookup(address);
            tokio::spawn(async move {
                // The semaphore is never closed
                let _permit = limit.acquire_owned().await.ok();
                task.await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }

    log::debug!(
        "{} group: {} lookups settled in {:?}",
        group,
        results.len(),
        started.elapsed()
    );
    Ok(results)
}

/// Runs one query cycle over a normalized address list
#[derive(Clone)]
pub struct BatchRunner {
    points: Arc<dyn PointsSource>,
    attestation: Arc<dyn AttestationSource>,
    balance: Arc<dyn BalanceSource>,
    mode: GroupMode,
    limit: Arc<Semaphore>,
}

impl BatchRunner {
    pub fn new(
        points: Arc<dyn PointsSource>,
        attestation: Arc<dyn AttestationSource>,
        balance: Arc<dyn BalanceSource>,
        mode: GroupMode,
    ) -> Self {
        Self {
            points,
            attestation,
            balance,
            mode,
            limit: Arc::new(Semaphore::new(DEFAULT_REQUEST_CONCURRENCY)),
        }
    }

    /// Cap the number of lookups in flight at once; 0 is treated as 1
    pub fn with_concurrency(mut self, max_in_flight: usize) -> Self {
        self.limit = Arc::new(Semaphore::new(max_in_flight.max(1)));
        self
    }

    async fn points_group(&self, addresses: &[String]) -> Result<Vec<Fetched<Points>>, BatchError> {
        fan_out("points", addresses, &self.limit, |address| {
            let source = self.points.clone();
            async move { source.fetch_points(&address).await }
        })
        .await
    }

    async fn attestation_group(
        &self,
        addresses: &[String],
    ) -> Result<Vec<Fetched<bool>>, BatchError> {
        fan_out("attestation", addresses, &self.limit, |address| {
            let source = self.attestation.clone();
            async move { source.fetch_attestation(&address).await }
        })
        .await
    }

    async fn balance_group(
        &self,
        addresses: &[String],
    ) -> Result<Vec<Fetched<Balance>>, BatchError> {
        fan_out("balance", addresses, &self.limit, |address| {
            let source = self.balance.clone();
            async move { source.fetch_balance(&address).await }
        })
        .await
    }

    /// Look up every address and return merged rows in input order
    pub async fn run(&self, addresses: &[String]) -> Result<Vec<Row>, BatchError> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }

        log::info!(
            "🔎 Querying {} addresses ({:?} groups)",
            addresses.len(),
            self.mode
        );
        let started = Instant::now();

        let (points, attestations, balances) = match self.mode {
            GroupMode::Concurrent => {
                let (points, attestations, balances) = tokio::join!(
                    self.points_group(addresses),
                    self.attestation_group(addresses),
                    self.balance_group(addresses),
                );
                (points?, attestations?, balances?)
            }
            GroupMode::Sequential => {
                let points = self.points_group(addresses).await?;
                let attestations = self.attestation_group(addresses).await?;
                let balances = self.balance_group(addresses).await?;
                (points, attestations, balances)
            }
        };

        let rows = merge_rows(addresses, points, attestations, balances)?;

        let degraded = rows.iter().filter(|row| !row.status().is_normal()).count();
        log::info!(
            "✅ Query finished in {:?}: {} rows, {} with failed lookups",
            started.elapsed(),
            rows.len(),
            degraded
        );
        Ok(rows)
    }
}
