//! Identifier helpers.
//!
//! Identifiers are 64-bit time-ordered values sent as decimal strings. The
//! upper 42 bits hold milliseconds since [`EPOCH_MILLIS`].

use chrono::{DateTime, TimeZone, Utc};

/// 2015-01-01T00:00:00Z in Unix milliseconds.
pub const EPOCH_MILLIS: i64 = 1_420_070_400_000;

const MIN_LEN: usize = 16;
const MAX_LEN: usize = 19;

/// Returns `true` for a string of 16 to 19 ASCII digits.
pub fn is_snowflake(value: &str) -> bool {
    (MIN_LEN..=MAX_LEN).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

/// Decodes the instant an identifier was issued.
pub fn snowflake_timestamp(id: &str) -> Option<DateTime<Utc>> {
    if !is_snowflake(id) {
        return None;
    }
    let raw: u64 = id.parse().ok()?;
    let millis = i64::try_from(raw >> 22).ok()? + EPOCH_MILLIS;
    Utc.timestamp_millis_opt(millis).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_digit_strings_of_valid_length() {
        assert!(is_snowflake("1234567890123456"));
        assert!(is_snowflake("111111111111111111"));
        assert!(is_snowflake("1234567890123456789"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!is_snowflake(""));
        assert!(!is_snowflake("123456789012345"));
        assert!(!is_snowflake("12345678901234567890"));
        assert!(!is_snowflake("11111111111111111a"));
        assert!(!is_snowflake("2023-01-01T00:00:00.000Z"));
        assert!(!is_snowflake(" 111111111111111111"));
    }

    #[test]
    fn decodes_issue_time() {
        // 175928847299117063 >> 22 = 41944705796 ms after the epoch.
        let timestamp = snowflake_timestamp("175928847299117063").unwrap();
        assert_eq!(timestamp.timestamp_millis(), 41_944_705_796 + EPOCH_MILLIS);
        assert!(snowflake_timestamp("not-an-id").is_none());
    }
}
