//! Alimony: a base stream plus a Smith-Ostler stream, capped per year
//!
//! The Smith-Ostler stream pays `smith_ostler_rate` of the payor's income
//! above `base_income` over each accrual period. Both streams are merged in
//! payment order and folded through a per-year allowance when a cap is set.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use super::{ALIMONY, BILLS_AND_UTILITIES, is_income_of, period_instance, retain_estimates};
use crate::calendar::Calendar;
use crate::date_math::{year_end, year_start};
use crate::error::EstimateError;
use crate::model::{AccountId, AlimonyCapPolicy, CashFlowInstance, Frequency, ItemType, SourceId};
use crate::money::round_money;

#[derive(Debug, Clone)]
pub struct Alimony {
    pub payee: String,
    pub sink: AccountId,
    pub base_frequency: Frequency,
    pub smith_ostler_frequency: Frequency,
    pub base_income: Decimal,
    pub base_alimony: Decimal,
    pub smith_ostler_rate: Decimal,
    pub max_alimony: Option<Decimal>,
    pub cap_policy: AlimonyCapPolicy,
    /// Income sources owned by the payor
    pub payor_income: FxHashSet<SourceId>,
}

/// Remaining allowance per payment year
#[derive(Debug, Default)]
struct CapAccumulator {
    remaining: BTreeMap<i16, Decimal>,
    paid: Vec<CashFlowInstance>,
}

impl Alimony {
    pub(crate) fn estimate(
        &self,
        id: &SourceId,
        calendar: &Calendar,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        let mut payments = self.base_payments(id, calendar)?;
        payments.extend(self.smith_ostler_payments(id, calendar)?);
        payments.sort_by(CashFlowInstance::chronological_cmp);

        // Payments already covered by history must not spend the allowance
        retain_estimates(&mut payments, calendar);

        Ok(match self.max_alimony {
            Some(max_alimony) => self.apply_cap(id, calendar, max_alimony, payments),
            None => payments,
        })
    }

    fn base_payments(
        &self,
        id: &SourceId,
        calendar: &Calendar,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        self.base_frequency
            .cash_flow_instances(calendar, id, |_, source_id, period, _, _| {
                let amount = round_money(self.base_alimony * period.portion);
                if amount.is_zero() {
                    return Ok(None);
                }
                Ok(Some(
                    period_instance(source_id, &self.sink, ItemType::Expense, period, -amount)
                        .with_category(BILLS_AND_UTILITIES, ALIMONY)
                        .with_description(format!("Base alimony for {}", self.payee)),
                ))
            })
    }

    fn smith_ostler_payments(
        &self,
        id: &SourceId,
        calendar: &Calendar,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        self.smith_ostler_frequency
            .cash_flow_instances(calendar, id, |calendar, source_id, period, _, _| {
                let income = calendar.sum_matching_cash_flow_for_period(
                    period.accrual_start,
                    period.accrual_end,
                    |instance| is_income_of(instance, &self.payor_income),
                );
                let threshold = self.base_income * period.portion;
                let excess = (income - threshold).max(Decimal::ZERO);
                let alimony = round_money(excess * self.smith_ostler_rate);
                if alimony.is_zero() {
                    return Ok(None);
                }
                Ok(Some(
                    period_instance(source_id, &self.sink, ItemType::Expense, period, -alimony)
                        .with_category(BILLS_AND_UTILITIES, ALIMONY)
                        .with_description(format!("Estimated Smith Ostler for {}", self.payee)),
                ))
            })
    }

    /// Alimony this order already paid in `year`, as a positive amount.
    /// Credits and other orders' payments do not count against the cap.
    fn recorded_in_year(id: &SourceId, calendar: &Calendar, year: i16) -> Decimal {
        -calendar.sum_matching_cash_flow_for_period(year_start(year), year_end(year), |instance| {
            instance.source_id() == id
                && instance.item_type() == ItemType::Expense
                && instance.category() == ALIMONY
                && instance.amount() < Decimal::ZERO
        })
    }

    fn apply_cap(
        &self,
        id: &SourceId,
        calendar: &Calendar,
        max_alimony: Decimal,
        payments: Vec<CashFlowInstance>,
    ) -> Vec<CashFlowInstance> {
        let capped = payments
            .into_iter()
            .fold(CapAccumulator::default(), |mut acc, payment| {
                let year = payment.cash_flow_year();
                let allowance = acc.remaining.entry(year).or_insert_with(|| {
                    (max_alimony - Self::recorded_in_year(id, calendar, year)).max(Decimal::ZERO)
                });

                let requested = -payment.amount();
                let paid = match self.cap_policy {
                    AlimonyCapPolicy::Clamp => requested.min(*allowance),
                    AlimonyCapPolicy::FillRemaining if requested < *allowance => *allowance,
                    AlimonyCapPolicy::FillRemaining => requested,
                };

                if paid > Decimal::ZERO {
                    *allowance -= paid;
                    acc.paid.push(payment.with_amount(-paid));
                } else {
                    tracing::debug!(
                        date = %payment.cash_flow_date(),
                        requested = %requested,
                        "alimony payment dropped by annual cap"
                    );
                }
                acc
            });
        capped.paid
    }
}
