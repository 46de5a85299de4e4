//! Integration tests for the non-interactive path: address file → batch → report
//!
//! Lookups are served by in-memory sources with staggered latency so the
//! tests exercise real task fan-out without touching the network.

#[cfg(test)]
mod batch_report_tests {
    use alloy_primitives::U256;
    use async_trait::async_trait;
    use linea_lookup::{
        address::normalize_addresses,
        batch::{BatchRunner, GroupMode},
        fetch::{
            AttestationSource, Balance, BalanceSource, Fetched, Points, PointsSource,
        },
        report::{self, ReportFormat},
        stats::PohFilter,
    };
    use std::{io::Write, sync::Arc, time::Duration};

    /// Derives every metric from the address digit; later addresses answer faster
    struct Stub;

    fn digit(address: &str) -> u64 {
        address
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .map(u64::from)
            .unwrap_or(0)
    }

    async fn latency(address: &str) {
        tokio::time::sleep(Duration::from_millis(50u64.saturating_sub(digit(address) * 10))).await;
    }

    #[async_trait]
    impl PointsSource for Stub {
        async fn fetch_points(&self, address: &str) -> Fetched<Points> {
            latency(address).await;
            if digit(address) == 0 {
                // Unknown to the points API: empty result, still a success
                return Fetched::success(Points::default());
            }
            Fetched::success(Points {
                rank: 10 - digit(address),
                points: digit(address) * 100,
            })
        }
    }

    #[async_trait]
    impl AttestationSource for Stub {
        async fn fetch_attestation(&self, address: &str) -> Fetched<bool> {
            latency(address).await;
            if digit(address) == 3 {
                return Fetched::failed(false, "503 Service Unavailable");
            }
            Fetched::success(digit(address) % 2 == 1)
        }
    }

    #[async_trait]
    impl BalanceSource for Stub {
        async fn fetch_balance(&self, address: &str) -> Fetched<Balance> {
            latency(address).await;
            let wei = U256::from(digit(address)) * U256::from(10u64).pow(U256::from(18u64));
            Fetched::success(Balance::from_raw(wei).unwrap())
        }
    }

    fn runner(mode: GroupMode) -> BatchRunner {
        let stub = Arc::new(Stub);
        BatchRunner::new(stub.clone(), stub.clone(), stub, mode)
    }

    #[tokio::test]
    async fn test_address_file_to_table_report() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0xaddr1").unwrap();
        writeln!(file, "  0xaddr2  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "0xaddr1").unwrap();
        writeln!(file, "0xaddr3").unwrap();
        writeln!(file, "0xaddr0").unwrap();

        let raw = std::fs::read_to_string(file.path()).unwrap();
        let addresses = normalize_addresses(&raw);
        assert_eq!(addresses, vec!["0xaddr1", "0xaddr2", "0xaddr3", "0xaddr0"]);

        let rows = runner(GroupMode::Concurrent).run(&addresses).await.unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(order, vec!["0xaddr1", "0xaddr2", "0xaddr3", "0xaddr0"]);

        // Empty points answer is not a failure
        assert!(rows[3].status().is_normal());
        assert_eq!(rows[3].points, Points::default());

        let out = report::render(&rows, PohFilter::All, ReportFormat::Table).unwrap();
        assert!(out.contains("Failed to get POH data"));
        assert!(out.contains("Totals: 4 addresses | LXP 6.00 | LXP-L 600"));
        assert!(out.contains("POH verified: 1 addresses | LXP 1.00 | LXP-L 100"));
        assert!(out.contains("POH unverified: 3 addresses | LXP 5.00 | LXP-L 500"));
    }

    #[tokio::test]
    async fn test_sequential_groups_match_concurrent() {
        let addresses: Vec<String> = (0..6).map(|i| format!("0xaddr{}", i)).collect();

        let concurrent = runner(GroupMode::Concurrent).run(&addresses).await.unwrap();
        let sequential = runner(GroupMode::Sequential).run(&addresses).await.unwrap();

        let a = report::render(&concurrent, PohFilter::All, ReportFormat::Json).unwrap();
        let b = report::render(&sequential, PohFilter::All, ReportFormat::Json).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_verified_and_unverified_cover_all_rows() {
        let addresses: Vec<String> = (0..8).map(|i| format!("0xaddr{}", i)).collect();
        let rows = runner(GroupMode::Concurrent).run(&addresses).await.unwrap();

        let verified = PohFilter::Verified.apply(&rows).len();
        let unverified = PohFilter::Unverified.apply(&rows).len();
        assert_eq!(verified + unverified, rows.len());
    }
}
