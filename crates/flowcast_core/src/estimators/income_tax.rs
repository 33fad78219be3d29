use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use super::{INCOME_TAX, TAXES, is_income_of, period_instance};
use crate::calendar::Calendar;
use crate::date_math::{add_days, year_start};
use crate::error::EstimateError;
use crate::model::{AccountId, CashFlowInstance, Frequency, ItemType, SourceId, TaxTable};
use crate::money::round_money;

/// Income tax on the payor's income, owed period by period
///
/// Each period owes the tax on year-to-date income through its accrual end
/// less the tax on year-to-date income before it starts, so withholding over
/// a year sums to the tax on the whole year.
#[derive(Debug, Clone)]
pub struct IncomeTax {
    pub frequency: Frequency,
    pub sink: AccountId,
    pub payee: String,
    pub table: TaxTable,
    /// Income sources owned by the payor
    pub payor_income: FxHashSet<SourceId>,
}

impl IncomeTax {
    pub(crate) fn estimate(
        &self,
        id: &SourceId,
        calendar: &Calendar,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        self.frequency.cash_flow_instances::<_, EstimateError>(
            calendar,
            id,
            |calendar, source_id, period, _, _| {
                let year = period.accrual_end.year();
                let first_day = year_start(year);
                let is_income = |instance: &CashFlowInstance| is_income_of(instance, &self.payor_income);

                let through_end =
                    calendar.sum_matching_cash_flow_for_period(first_day, period.accrual_end, is_income);
                let before_start = if period.accrual_start > first_day {
                    calendar.sum_matching_cash_flow_for_period(
                        first_day,
                        add_days(period.accrual_start, -1),
                        is_income,
                    )
                } else {
                    Decimal::ZERO
                };

                let tax_on = |income: Decimal| {
                    self.table
                        .compute_tax(year, income.max(Decimal::ZERO))
                        .map_err(|error| EstimateError::Tax {
                            estimator: source_id.clone(),
                            error,
                        })
                };
                let owed = round_money(tax_on(through_end)? - tax_on(before_start)?);
                if owed.is_zero() {
                    return Ok(None);
                }

                Ok(Some(
                    period_instance(source_id, &self.sink, ItemType::Expense, period, -owed)
                        .with_category(TAXES, INCOME_TAX)
                        .with_description(format!("{year} income tax to {}", self.payee)),
                ))
            },
        )
    }
}
