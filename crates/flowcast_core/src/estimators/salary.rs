use rust_decimal::Decimal;

use super::{INCOME, PAYCHECK, period_instance};
use crate::calendar::Calendar;
use crate::error::EstimateError;
use crate::model::{AccountId, CashFlowInstance, Frequency, ItemType, SourceId};
use crate::money::round_money;

/// Base pay apportioned over the pay schedule
#[derive(Debug, Clone)]
pub struct Salary {
    pub frequency: Frequency,
    pub sink: AccountId,
    pub employer: String,
    pub base_annual_salary: Decimal,
}

impl Salary {
    pub(crate) fn estimate(
        &self,
        id: &SourceId,
        calendar: &Calendar,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        self.frequency
            .cash_flow_instances(calendar, id, |_, source_id, period, _, _| {
                let amount = round_money(self.base_annual_salary * period.portion);
                let instance = period_instance(source_id, &self.sink, ItemType::Income, period, amount)
                    .with_category(INCOME, PAYCHECK)
                    .with_description(format!("Paycheck from {}", self.employer));
                Ok(Some(instance))
            })
    }
}
