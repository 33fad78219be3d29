//! Equity compensation: restricted stock units and stock options
//!
//! Vested shares are valued at the close of the vesting period through the
//! pricing collaborator and paid into the job's default account as income.

use rust_decimal::Decimal;

use super::{INCOME, RSUS, STOCK_OPTIONS, period_instance};
use crate::calendar::Calendar;
use crate::error::EstimateError;
use crate::model::{AccountId, CashFlowInstance, Frequency, ItemType, SecurityId, SourceId};
use crate::money::round_money;
use crate::periods::Period;
use crate::pricing::SharePricing;

fn price_at_vest(
    source_id: &SourceId,
    security: &SecurityId,
    period: &Period,
    calendar: &Calendar,
    pricing: &dyn SharePricing,
) -> Result<Decimal, EstimateError> {
    pricing
        .share_price_at(security, period.accrual_end, calendar.assumptions())
        .map_err(|error| EstimateError::Pricing {
            estimator: source_id.clone(),
            error,
        })
}

#[derive(Debug, Clone)]
pub struct Rsu {
    pub frequency: Frequency,
    pub sink: AccountId,
    pub security: SecurityId,
    pub total_shares: Decimal,
}

impl Rsu {
    pub(crate) fn estimate(
        &self,
        id: &SourceId,
        calendar: &Calendar,
        pricing: &dyn SharePricing,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        self.frequency
            .cash_flow_instances::<_, EstimateError>(calendar, id, |calendar, source_id, period, _, _| {
                let shares = round_money(self.total_shares * period.portion);
                if shares.is_zero() {
                    return Ok(None);
                }
                let price = price_at_vest(source_id, &self.security, period, calendar, pricing)?;
                let amount = round_money(shares * price);
                Ok(Some(
                    period_instance(source_id, &self.sink, ItemType::Income, period, amount)
                        .with_category(INCOME, RSUS)
                        .with_description(format!("{shares} shares of {} at {price}", self.security)),
                ))
            })
    }
}

/// Options vest like RSUs but are worth only the spread over the strike price
#[derive(Debug, Clone)]
pub struct StockOption {
    pub frequency: Frequency,
    pub sink: AccountId,
    pub security: SecurityId,
    pub total_shares: Decimal,
    pub strike_price: Decimal,
}

impl StockOption {
    pub(crate) fn estimate(
        &self,
        id: &SourceId,
        calendar: &Calendar,
        pricing: &dyn SharePricing,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        self.frequency
            .cash_flow_instances::<_, EstimateError>(calendar, id, |calendar, source_id, period, _, _| {
                let shares = round_money(self.total_shares * period.portion);
                let price = price_at_vest(source_id, &self.security, period, calendar, pricing)?;
                let spread = (price - self.strike_price).max(Decimal::ZERO);
                let amount = round_money(spread * shares);
                if amount.is_zero() {
                    return Ok(None);
                }
                Ok(Some(
                    period_instance(source_id, &self.sink, ItemType::Income, period, amount)
                        .with_category(INCOME, STOCK_OPTIONS)
                        .with_description(format!(
                            "{shares} options on {} at {price} (strike {})",
                            self.security, self.strike_price
                        )),
                ))
            })
    }
}
