use rust_decimal::Decimal;

use super::{BONUS, INCOME, period_instance};
use crate::calendar::Calendar;
use crate::error::EstimateError;
use crate::model::{AccountId, CashFlowInstance, Frequency, ItemType, SourceId};
use crate::money::round_money;

/// A fixed annual bonus apportioned over its schedule
#[derive(Debug, Clone)]
pub struct FixedBonus {
    pub frequency: Frequency,
    pub sink: AccountId,
    pub annual_amount: Decimal,
}

impl FixedBonus {
    pub(crate) fn estimate(
        &self,
        id: &SourceId,
        calendar: &Calendar,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        self.frequency
            .cash_flow_instances(calendar, id, |_, source_id, period, _, _| {
                let amount = round_money(self.annual_amount * period.portion);
                if amount.is_zero() {
                    return Ok(None);
                }
                Ok(Some(
                    period_instance(source_id, &self.sink, ItemType::Income, period, amount)
                        .with_category(INCOME, BONUS),
                ))
            })
    }
}

/// A bonus paid as a percentage of a salary source's annual total
///
/// The salary must be estimated in an earlier pass so its total for the
/// year is complete when the bonus reads it.
#[derive(Debug, Clone)]
pub struct PercentBonus {
    pub frequency: Frequency,
    pub sink: AccountId,
    pub salary: SourceId,
    pub bonus_pct: Decimal,
}

impl PercentBonus {
    pub(crate) fn estimate(
        &self,
        id: &SourceId,
        calendar: &Calendar,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        self.frequency
            .cash_flow_instances(calendar, id, |calendar, source_id, period, _, _| {
                let year = period.accrual_end.year();
                let salary = calendar.annual_cash_flow(&self.salary, year);
                let amount = round_money(salary * self.bonus_pct * period.portion);
                if amount.is_zero() {
                    return Ok(None);
                }
                Ok(Some(
                    period_instance(source_id, &self.sink, ItemType::Income, period, amount)
                        .with_category(INCOME, BONUS)
                        .with_description(format!("{} of {year} {}", self.bonus_pct, self.salary)),
                ))
            })
    }
}
