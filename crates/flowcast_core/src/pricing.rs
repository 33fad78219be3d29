//! Share pricing collaborator
//!
//! Equity estimators value vesting shares through [`SharePricing`]. The core
//! never fetches market data itself; [`PriceHistory`] answers from prices the
//! scenario already carries and extrapolates past the last known quote.

use std::collections::BTreeMap;

use jiff::civil::Date;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use rustc_hash::FxHashMap;

use crate::date_math::fast_days_between;
use crate::error::PricingError;
use crate::model::{Assumptions, Security, SecurityId};
use crate::money::round_money;

const DAYS_PER_YEAR: Decimal = dec!(365.25);

pub trait SharePricing {
    fn share_price_at(
        &self,
        security: &SecurityId,
        date: Date,
        assumptions: &Assumptions,
    ) -> Result<Decimal, PricingError>;
}

/// Known prices per security
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    prices: FxHashMap<SecurityId, BTreeMap<Date, Decimal>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_securities<'a>(securities: impl IntoIterator<Item = &'a Security>) -> Self {
        let prices = securities
            .into_iter()
            .map(|s| (s.id.clone(), s.prices.clone()))
            .collect();
        Self { prices }
    }

    pub fn insert(&mut self, security: SecurityId, date: Date, price: Decimal) {
        self.prices.entry(security).or_default().insert(date, price);
    }

    #[must_use]
    pub fn with_price(mut self, security: impl Into<SecurityId>, date: Date, price: Decimal) -> Self {
        self.insert(security.into(), date, price);
        self
    }
}

impl SharePricing for PriceHistory {
    /// The quoted price on `date`; past the last quote, the last price grown
    /// linearly at the long-term return; otherwise the most recent earlier quote.
    fn share_price_at(
        &self,
        security: &SecurityId,
        date: Date,
        assumptions: &Assumptions,
    ) -> Result<Decimal, PricingError> {
        let missing = || PricingError::NoPriceHistory {
            security: security.clone(),
            date,
        };
        let history = self.prices.get(security).ok_or_else(missing)?;

        if let Some(price) = history.get(&date) {
            return Ok(*price);
        }

        let (last_date, last_price) = history.last_key_value().ok_or_else(missing)?;
        if date > *last_date {
            let years = Decimal::from(fast_days_between(*last_date, date)) / DAYS_PER_YEAR;
            let growth = Decimal::ONE + years * assumptions.long_term_investment_return;
            return Ok(round_money(*last_price * growth));
        }

        history
            .range(..date)
            .next_back()
            .map(|(_, price)| *price)
            .ok_or_else(missing)
    }
}
