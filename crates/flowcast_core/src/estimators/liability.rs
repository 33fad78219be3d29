use rust_decimal::Decimal;

use super::{LOAN_PAYMENT, LOANS, period_instance};
use crate::calendar::Calendar;
use crate::error::EstimateError;
use crate::model::{AccountId, CashFlowInstance, Frequency, InstanceDetail, ItemType, SourceId};
use crate::money::round_money;

/// An amortizing loan paid from `sink`
///
/// Each payment covers the period's interest and impounds first; the rest
/// reduces principal. The running balance is threaded through the previous
/// instance's liability detail.
#[derive(Debug, Clone)]
pub struct Liability {
    pub frequency: Frequency,
    pub sink: AccountId,
    pub lender: String,
    pub starting_balance: Decimal,
    /// Interest rate per period, 10 places
    pub period_rate: Decimal,
    pub payment: Decimal,
    pub impounds: Decimal,
    pub term: Option<u32>,
}

impl Liability {
    pub(crate) fn estimate(
        &self,
        id: &SourceId,
        calendar: &Calendar,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        self.frequency
            .cash_flow_instances(calendar, id, |_, source_id, period, position, prev| {
                let balance = prev
                    .and_then(CashFlowInstance::liability_balance)
                    .unwrap_or(self.starting_balance);
                if balance <= Decimal::ZERO {
                    return Ok(None);
                }

                let scheduled = self
                    .term
                    .map_or(position.count, |term| (term as usize).min(position.count));
                if position.index >= scheduled {
                    return Ok(None);
                }
                let is_final = position.index + 1 == scheduled;

                let interest = round_money(balance * self.period_rate);
                let mut principal = round_money(self.payment - self.impounds - interest);
                // Final payment clears whatever rounding left behind
                if principal >= balance || is_final {
                    principal = balance;
                }
                let remaining = balance - principal;
                let total = principal + interest + self.impounds;

                if is_final && total != self.payment {
                    tracing::trace!(
                        source = %source_id,
                        scheduled = %self.payment,
                        actual = %total,
                        "final loan payment adjusted"
                    );
                }

                Ok(Some(
                    period_instance(source_id, &self.sink, ItemType::Expense, period, -total)
                        .with_category(LOANS, LOAN_PAYMENT)
                        .with_description(format!("Payment to {}", self.lender))
                        .with_detail(InstanceDetail::Liability {
                            principal,
                            interest,
                            impounds: self.impounds,
                            balance: remaining,
                        }),
                ))
            })
    }
}
