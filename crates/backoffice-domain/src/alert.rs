//! Threshold comparison for alert rules.

use rust_decimal::Decimal;

use crate::wire_enum;

wire_enum! {
    /// Comparison applied as `value <op> threshold`.
    pub enum AlertOperator as "alert operator" {
        Gt => "gt",
        Gte => "gte",
        Lt => "lt",
        Lte => "lte",
        Eq => "eq",
    }
}

wire_enum! {
    pub enum Severity as "severity" {
        Info => "info",
        Warning => "warning",
        Critical => "critical",
    }
}

/// `decimal(10, 2)` holds at most eight integer digits.
pub const VALUE_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Round to two decimal places; `None` if the result does not fit `decimal(10, 2)`.
pub fn storable(value: Decimal) -> Option<Decimal> {
    let rounded = value.round_dp(2);
    (rounded.abs() < VALUE_LIMIT).then_some(rounded)
}

impl AlertOperator {
    /// `true` when `value` breaches `threshold` under this operator.
    pub fn breached(self, value: Decimal, threshold: Decimal) -> bool {
        match self {
            Self::Gt => value > threshold,
            Self::Gte => value >= threshold,
            Self::Lt => value < threshold,
            Self::Lte => value <= threshold,
            Self::Eq => value == threshold,
        }
    }
}
