use rust_decimal::Decimal;

use super::{BILLS_AND_UTILITIES, period_instance};
use crate::calendar::Calendar;
use crate::error::EstimateError;
use crate::model::{AccountId, CashFlowInstance, Frequency, ItemType, SourceId};
use crate::money::round_money;

/// A recurring expense such as rent, apportioned from an annual amount
#[derive(Debug, Clone)]
pub struct Expense {
    pub frequency: Frequency,
    pub sink: AccountId,
    pub annual_amount: Decimal,
    pub category: String,
}

impl Expense {
    pub(crate) fn estimate(
        &self,
        id: &SourceId,
        calendar: &Calendar,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        self.frequency
            .cash_flow_instances(calendar, id, |_, source_id, period, _, _| {
                let amount = round_money(self.annual_amount * period.portion);
                Ok(Some(
                    period_instance(source_id, &self.sink, ItemType::Expense, period, -amount)
                        .with_category(BILLS_AND_UTILITIES, self.category.as_str()),
                ))
            })
    }
}
