//! Fixed-point money utilities.
//!
//! Money never touches floating point. Income increments in the content are
//! dyadic fractions (0.5, 1, 2) and are therefore exact in binary fixed-point.
//! Cost multipliers are integer percentages so that `10 * 1.3` is exactly 13.

use fixed::types::I64F64;

/// Fixed-point money type for all economy math.
///
/// Uses 64 bits for the integer part and 64 bits for the fractional part.
pub type Money = I64F64;

/// Wall-clock time in milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Build a money value from a whole number of dollars.
#[must_use]
pub fn dollars(amount: i64) -> Money {
    Money::from_num(amount)
}

/// Build a money value from a number of cents.
#[must_use]
pub fn cents(amount: i64) -> Money {
    Money::from_num(amount) / 100_i128
}

/// Scale a value by an integer percentage (`130` = x1.3), saturating on overflow.
#[must_use]
pub fn scale_percent(value: Money, percent: u32) -> Money {
    value
        .checked_mul_int(i128::from(percent))
        .map_or(Money::MAX, |scaled| scaled / 100_i128)
}

/// Unscaled price of the `index`-th unit (0-indexed) of an upgrade.
///
/// `base_cost * (percent / 100) ^ index`, computed by repeated exact scaling.
#[must_use]
pub fn unit_price(base_cost: u64, multiplier_percent: u32, index: u32) -> Money {
    let mut price = Money::saturating_from_num(base_cost);
    for _ in 0..index {
        if price == Money::MAX || price == Money::ZERO {
            break;
        }
        price = scale_percent(price, multiplier_percent);
    }
    price
}

/// Total cost of `amount` units when `owned` are already held.
///
/// Each unit's price is floored before summing:
/// `sum_{k=0}^{amount-1} floor(base * mult^(owned + k))`.
/// Stops early once the total saturates or a non-growing price floors to zero.
#[must_use]
pub fn total_price(base_cost: u64, multiplier_percent: u32, owned: u32, amount: u32) -> Money {
    let mut price = unit_price(base_cost, multiplier_percent, owned);
    let mut total = Money::ZERO;
    for _ in 0..amount {
        let unit = price.floor();
        if unit == Money::ZERO && multiplier_percent <= 100 {
            break;
        }
        total = total.saturating_add(unit);
        if total == Money::MAX {
            break;
        }
        price = scale_percent(price, multiplier_percent);
    }
    total
}

/// Format money for display with two decimals.
#[must_use]
pub fn format_money(value: Money) -> String {
    format!("{:.2}", value.to_num::<f64>())
}

/// Serde support for money.
///
/// Serializes money as its exact decimal string so values survive RON and
/// bincode round-trips without loss and stay readable in data files.
pub mod money_serde {
    use super::Money;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize money as a decimal string.
    pub fn serialize<S>(value: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    /// Deserialize money from a decimal string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse::<Money>()
            .map_err(|e| D::Error::custom(format!("invalid money '{text}': {e}")))
    }
}
