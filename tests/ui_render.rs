//! Rendering tests for the terminal UI
//!
//! Draws the full layout into an in-memory backend and checks what an
//! operator would see after a query.

#[cfg(test)]
mod ui_render_tests {
    use alloy_primitives::U256;
    use linea_lookup::{
        batch::Row,
        fetch::{Balance, Outcome, Points},
        state::{AppState, StateMessage},
        stats::PohFilter,
        ui::layout::render_layout,
    };
    use ratatui::{backend::TestBackend, Terminal};

    fn row(index: usize, address: &str, verified: bool, balance_outcome: Outcome) -> Row {
        Row {
            index,
            address: address.to_string(),
            points: Points {
                rank: if verified { 4 } else { 0 },
                points: 1200,
            },
            verified,
            balance: Balance::from_raw(U256::from(3_000_000_000_000_000_000u128)).unwrap(),
            points_outcome: Outcome::Success,
            attestation_outcome: Outcome::Success,
            balance_outcome,
        }
    }

    fn screen(state: &AppState) -> String {
        let backend = TestBackend::new(160, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_layout(f, area, state);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new();
        state.push_str("0x1111\n0x2222\n");
        state.begin_query().unwrap();
        state.apply(StateMessage::QueryFinished(Ok(vec![
            row(0, "0x1111", true, Outcome::Success),
            row(
                1,
                "0x2222",
                false,
                Outcome::Failed {
                    detail: "timeout".to_string(),
                },
            ),
        ])));
        state
    }

    #[test]
    fn test_rows_and_status_render() {
        let text = screen(&loaded_state());

        assert!(text.contains("0x1111"));
        assert!(text.contains("0x2222"));
        assert!(text.contains("3.000000000000000000"));
        assert!(text.contains("normal"));
        assert!(text.contains("Failed to get LXP data"));
    }

    #[test]
    fn test_stats_cards_follow_filter() {
        let mut state = loaded_state();
        let text = screen(&state);
        assert!(text.contains("Addresses: 2"));
        assert_eq!(text.matches("0x2222").count(), 2);
        assert!(text.contains("LXP: 6.00"));
        assert!(text.contains("LXP-L: 2,400"));

        state.set_filter(PohFilter::Verified);
        let text = screen(&state);
        assert!(text.contains("Addresses: 1"));
        // Still in the input box, gone from the table
        assert_eq!(text.matches("0x2222").count(), 1);
    }

    #[test]
    fn test_empty_state_renders() {
        let text = screen(&AppState::new());
        assert!(text.contains("Linea Lookup"));
        assert!(text.contains("Ready"));
        assert!(text.contains("Addresses: 0"));
    }
}
