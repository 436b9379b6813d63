//! Display formatting for phone numbers
//!
//! Workers report phone numbers in whatever shape the page used. For terminal
//! output they are normalised to `+1 XXX-XXX-XXXX` where possible; the stored
//! and streamed values are never rewritten.

/// Placeholder for a missing number
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a North American number as `+1 XXX-XXX-XXXX`.
///
/// Text with fewer than ten digits is returned unchanged. Longer runs keep the
/// last ten digits.
pub fn format_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return NOT_AVAILABLE.to_string();
    }

    let digits: Vec<char> = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    let national: String = match digits.len() {
        n if n < 10 => return trimmed.to_string(),
        10 => digits.iter().collect(),
        11 if digits[0] == '1' => digits[1..].iter().collect(),
        n => digits[n - 10..].iter().collect(),
    };

    format!(
        "+1 {}-{}-{}",
        &national[..3],
        &national[3..6],
        &national[6..]
    )
}
