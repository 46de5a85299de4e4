// Renderer module - formatting utilities shared by the TUI and the plain report

use {
    crate::batch::RowStatus,
    ratatui::style::{Color, Style},
};

/// Group the integer digits of a number with commas, e.g. `1234567` → `1,234,567`
pub fn format_thousands(value: u64) -> String {
    group_integer_digits(&value.to_string())
}

/// Same grouping for a decimal string, leaving the fraction untouched
pub fn format_decimal(amount: &str) -> String {
    match amount.split_once('.') {
        Some((whole, fraction)) => format!("{}.{}", group_integer_digits(whole), fraction),
        None => group_integer_digits(amount),
    }
}

fn group_integer_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Unranked addresses show a dash
pub fn format_rank(rank: u64) -> String {
    if rank == 0 {
        "-".to_string()
    } else {
        rank.to_string()
    }
}

pub fn format_poh(verified: bool) -> &'static str {
    if verified {
        "yes"
    } else {
        "no"
    }
}

pub fn poh_style(verified: bool) -> Style {
    Style::default().fg(if verified { Color::Green } else { Color::Red })
}

pub fn status_style(status: &RowStatus) -> Style {
    Style::default().fg(if status.is_normal() {
        Color::Green
    } else {
        Color::Red
    })
}

/// Shorten a long address for narrow terminals: `0x1234…abcd`
pub fn shorten_address(address: &str, max: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= max || max < 5 {
        return address.to_string();
    }
    let keep = (max - 1) / 2;
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - (max - 1 - keep)..].iter().collect();
    format!("{}…{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_decimal_grouping() {
        assert_eq!(format_decimal("1234.56"), "1,234.56");
        assert_eq!(format_decimal("0.000000000000000001"), "0.000000000000000001");
        assert_eq!(format_decimal("0"), "0");
    }

    #[test]
    fn test_rank() {
        assert_eq!(format_rank(0), "-");
        assert_eq!(format_rank(17), "17");
    }

    #[test]
    fn test_shorten_address() {
        let address = "0xd83af4fbD77f3AB65C3B1Dc4B38D7e67AEcf599A";
        assert_eq!(shorten_address(address, 42), address);
        let short = shorten_address(address, 13);
        assert_eq!(short, "0xd83a…cf599A");
        assert_eq!(short.chars().count(), 13);
    }
}
