//! Running balances
//!
//! Balances are values, not cells: `apply_change` returns the next balance and
//! leaves the previous one untouched, so a balance walk can keep its history.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SecurityId;
use crate::money::round_money;

/// Cash held in an account at a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashBalance {
    pub balance_date: Date,
    pub value: Decimal,
}

impl CashBalance {
    pub fn new(balance_date: Date, value: Decimal) -> Self {
        Self {
            balance_date,
            value: round_money(value),
        }
    }

    pub fn apply_change(&self, date: Date, delta: Decimal) -> CashBalance {
        CashBalance {
            balance_date: date,
            value: round_money(self.value + delta),
        }
    }
}

/// Shares of one security held in an account at a date
///
/// Used both as a running position and as the change carried by a security
/// transaction, where `shares` is the signed change and `share_price` the
/// trade price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareBalance {
    pub balance_date: Date,
    pub security_id: SecurityId,
    pub shares: Decimal,
    pub share_price: Decimal,
}

impl ShareBalance {
    pub fn new(balance_date: Date, security_id: SecurityId, shares: Decimal, share_price: Decimal) -> Self {
        Self {
            balance_date,
            security_id,
            shares: round_money(shares),
            share_price,
        }
    }

    pub fn value(&self) -> Decimal {
        round_money(self.shares * self.share_price)
    }

    /// Add the change's shares and take its price as the latest known price.
    pub fn apply_change(&self, change: &ShareBalance) -> ShareBalance {
        ShareBalance {
            balance_date: change.balance_date,
            security_id: self.security_id.clone(),
            shares: round_money(self.shares + change.shares),
            share_price: change.share_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Balance {
    Cash(CashBalance),
    Shares(ShareBalance),
}

impl Balance {
    pub fn balance_date(&self) -> Date {
        match self {
            Balance::Cash(b) => b.balance_date,
            Balance::Shares(b) => b.balance_date,
        }
    }

    pub fn value(&self) -> Decimal {
        match self {
            Balance::Cash(b) => b.value,
            Balance::Shares(b) => b.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cash_balance_rounds_half_up() {
        let opening = CashBalance::new(date(2020, 1, 1), dec!(100));
        let next = opening.apply_change(date(2020, 1, 15), dec!(0.005));
        assert_eq!(next.value, dec!(100.01));
        assert_eq!(next.balance_date, date(2020, 1, 15));
        // the previous balance is unchanged
        assert_eq!(opening.value, dec!(100));
    }

    #[test]
    fn test_share_balance_takes_latest_price() {
        let held = ShareBalance::new(date(2020, 1, 1), "ACME".into(), dec!(10), dec!(50));
        let vest = ShareBalance::new(date(2020, 6, 1), "ACME".into(), dec!(2.5), dec!(61.333));
        let next = held.apply_change(&vest);

        assert_eq!(next.shares, dec!(12.5));
        assert_eq!(next.share_price, dec!(61.333));
        assert_eq!(next.value(), dec!(766.66), "12.5 * 61.333 = 766.6625");
        assert_eq!(Balance::Shares(next).value(), dec!(766.66));
    }
}
