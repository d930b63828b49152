//! Accounting-style currency strings.

use serde::{Deserialize, Serialize};

const FALLBACK_SYMBOL: &str = "$";

/// Currency formatting settings, configured once at startup and shared by every render.
///
/// Amounts are printed with two decimals, an optional thousands separator and the configured
/// symbol. Negative amounts print as the parenthesised absolute value: `($37.50)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Group the integer digits in threes with `,`.
    pub grouping: bool,
    /// Symbol placed in front of the digits.
    pub symbol: String,
    /// Substitute `$` when `symbol` is blank instead of printing bare digits.
    pub fallback_on_unavailable: bool,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            grouping: true,
            symbol: FALLBACK_SYMBOL.to_owned(),
            fallback_on_unavailable: true,
        }
    }
}

impl CurrencyFormat {
    /// Creates the US dollar format (`$1,234.56`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grouping flag and returns the updated format.
    pub fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }

    /// Sets the symbol and returns the updated format.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Returns the symbol that is actually printed.
    pub fn effective_symbol(&self) -> &str {
        if self.symbol.trim().is_empty() && self.fallback_on_unavailable {
            FALLBACK_SYMBOL
        } else {
            &self.symbol
        }
    }

    /// Formats `amount`, wrapping negative values in parentheses.
    ///
    /// Negative zero counts as zero.
    pub fn format(&self, amount: f64) -> String {
        let unsigned = self.format_unsigned(amount.abs());
        if amount < 0.0 {
            format!("({})", unsigned)
        } else {
            unsigned
        }
    }

    fn format_unsigned(&self, amount: f64) -> String {
        let fixed = format!("{:.2}", amount);
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let whole = if self.grouping {
            group_thousands(whole)
        } else {
            whole.to_owned()
        };
        format!("{}{}.{}", self.effective_symbol(), whole, cents)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_amounts_are_plain() {
        let format = CurrencyFormat::new();
        assert_eq!(format.format(0.0), "$0.00");
        assert_eq!(format.format(74.5), "$74.50");
        assert_eq!(format.format(600.0), "$600.00");
    }

    #[test]
    fn negative_amounts_are_parenthesised() {
        let format = CurrencyFormat::new();
        assert_eq!(format.format(-37.5), "($37.50)");
        assert_eq!(format.format(-1234567.891), "($1,234,567.89)");
    }

    #[test]
    fn thousands_are_grouped() {
        let format = CurrencyFormat::new();
        assert_eq!(format.format(999.99), "$999.99");
        assert_eq!(format.format(1000.0), "$1,000.00");
        assert_eq!(format.format(22801.41), "$22,801.41");
        assert_eq!(format.format(128826.4), "$128,826.40");
    }

    #[test]
    fn grouping_can_be_disabled() {
        let format = CurrencyFormat::new().with_grouping(false);
        assert_eq!(format.format(28826.4), "$28826.40");
    }

    #[test]
    fn blank_symbol_falls_back_to_dollar() {
        let format = CurrencyFormat::new().with_symbol("  ");
        assert_eq!(format.format(5.0), "$5.00");

        let bare = CurrencyFormat {
            fallback_on_unavailable: false,
            ..CurrencyFormat::new().with_symbol("")
        };
        assert_eq!(bare.format(5.0), "5.00");
    }

    #[test]
    fn negative_zero_is_not_parenthesised() {
        let format = CurrencyFormat::new();
        assert_eq!(format.format(-0.0), "$0.00");
        assert_eq!(format.format("-0".parse::<f64>().unwrap_or_default()), "$0.00");
        assert_eq!(format.with_grouping(false).format(-0.0), "$0.00");
    }
}
