//! A single row of the history log.

use std::fmt;

use rust_decimal::Decimal;

/// Both text columns of the history table hold at most this many characters.
pub const MAX_FIELD_CHARS: usize = 50;

/// One completed computation, e.g. `3 + 4 = 7.00`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRecord {
    pub equation: String,
    pub result: String,
}

impl HistoryRecord {
    /// Build a record the way it is stored: both fields capped at
    /// [`MAX_FIELD_CHARS`], the result in its decimal string form.
    pub fn new(equation: &str, result: Decimal) -> Self {
        Self {
            equation: truncate_field(equation),
            result: truncate_field(&result.to_string()),
        }
    }
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.equation, self.result)
    }
}

/// Cut `text` to [`MAX_FIELD_CHARS`] characters.
pub fn truncate_field(text: &str) -> String {
    text.chars().take(MAX_FIELD_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_record_display() {
        let record = HistoryRecord::new("3 + 4", dec!(7.00));
        assert_eq!(record.result, "7.00");
        assert_eq!(record.to_string(), "3 + 4 = 7.00");
    }

    #[test]
    fn test_fields_are_capped() {
        let long = "9".repeat(80);
        let record = HistoryRecord::new(&long, dec!(1));
        assert_eq!(record.equation.chars().count(), MAX_FIELD_CHARS);
        assert_eq!(truncate_field("short"), "short");
    }
}
