//! Cash-flow estimators
//!
//! A linked [`Estimator`] pairs a source id and its pass with one
//! [`EstimatorKind`]. Each kind supplies the amount function it hands to
//! [`Frequency::cash_flow_instances`](crate::model::Frequency::cash_flow_instances);
//! dispatch is a plain `match`.

mod alimony;
mod bonus;
mod equity;
mod expense;
mod income_tax;
mod liability;
mod salary;

pub use alimony::Alimony;
pub use bonus::{FixedBonus, PercentBonus};
pub use equity::{Rsu, StockOption};
pub use expense::Expense;
pub use income_tax::IncomeTax;
pub use liability::Liability;
pub use salary::Salary;

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use crate::calendar::Calendar;
use crate::error::EstimateError;
use crate::model::{AccountId, CashFlowInstance, EntityId, Frequency, ItemType, Pass, SourceId};
use crate::periods::Period;
use crate::pricing::SharePricing;

// ============================================================================
// Categories
// ============================================================================

pub const INCOME: &str = "Income";
pub const BILLS_AND_UTILITIES: &str = "Bills & Utilities";
pub const LOANS: &str = "Loans";
pub const TAXES: &str = "Taxes";

pub const PAYCHECK: &str = "Paycheck";
pub const BONUS: &str = "Bonus";
pub const RSUS: &str = "RSUs";
pub const STOCK_OPTIONS: &str = "Stock Options";
pub const ALIMONY: &str = "Alimony";
pub const LOAN_PAYMENT: &str = "Loan Payment";
pub const INCOME_TAX: &str = "Income Tax";

#[derive(Debug, Clone)]
pub enum EstimatorKind {
    Salary(Salary),
    BonusPeriodicFixed(FixedBonus),
    BonusAnnualPct(PercentBonus),
    Rsu(Rsu),
    StockOption(StockOption),
    Expense(Expense),
    Alimony(Alimony),
    Liability(Liability),
    IncomeTax(IncomeTax),
}

/// A source with all of its references resolved
#[derive(Debug, Clone)]
pub struct Estimator {
    pub id: SourceId,
    pub pass: Pass,
    /// Entity the source's cash flows belong to
    pub owner: EntityId,
    pub kind: EstimatorKind,
}

impl Estimator {
    pub fn item_type(&self) -> ItemType {
        match self.kind {
            EstimatorKind::Salary(_)
            | EstimatorKind::BonusPeriodicFixed(_)
            | EstimatorKind::BonusAnnualPct(_)
            | EstimatorKind::Rsu(_)
            | EstimatorKind::StockOption(_) => ItemType::Income,
            EstimatorKind::Expense(_)
            | EstimatorKind::Alimony(_)
            | EstimatorKind::Liability(_)
            | EstimatorKind::IncomeTax(_) => ItemType::Expense,
        }
    }

    /// Frequencies whose windows this estimator generates over.
    pub fn frequencies(&self) -> Vec<&Frequency> {
        match &self.kind {
            EstimatorKind::Salary(e) => vec![&e.frequency],
            EstimatorKind::BonusPeriodicFixed(e) => vec![&e.frequency],
            EstimatorKind::BonusAnnualPct(e) => vec![&e.frequency],
            EstimatorKind::Rsu(e) => vec![&e.frequency],
            EstimatorKind::StockOption(e) => vec![&e.frequency],
            EstimatorKind::Expense(e) => vec![&e.frequency],
            EstimatorKind::Alimony(e) => vec![&e.base_frequency, &e.smith_ostler_frequency],
            EstimatorKind::Liability(e) => vec![&e.frequency],
            EstimatorKind::IncomeTax(e) => vec![&e.frequency],
        }
    }

    /// Sources whose calendar totals this estimator reads.
    pub fn dependencies(&self) -> Vec<&SourceId> {
        match &self.kind {
            EstimatorKind::BonusAnnualPct(e) => vec![&e.salary],
            EstimatorKind::Alimony(e) => sorted(&e.payor_income),
            EstimatorKind::IncomeTax(e) => sorted(&e.payor_income),
            _ => Vec::new(),
        }
    }

    /// Generate this source's instances against the calendar as it stands.
    ///
    /// Instances paid on or before the calendar's estimate cut-off are dropped.
    pub fn estimate(
        &self,
        calendar: &Calendar,
        pricing: &dyn SharePricing,
    ) -> Result<Vec<CashFlowInstance>, EstimateError> {
        let id = &self.id;
        let mut instances = match &self.kind {
            EstimatorKind::Salary(e) => e.estimate(id, calendar)?,
            EstimatorKind::BonusPeriodicFixed(e) => e.estimate(id, calendar)?,
            EstimatorKind::BonusAnnualPct(e) => e.estimate(id, calendar)?,
            EstimatorKind::Rsu(e) => e.estimate(id, calendar, pricing)?,
            EstimatorKind::StockOption(e) => e.estimate(id, calendar, pricing)?,
            EstimatorKind::Expense(e) => e.estimate(id, calendar)?,
            EstimatorKind::Alimony(e) => e.estimate(id, calendar)?,
            EstimatorKind::Liability(e) => e.estimate(id, calendar)?,
            EstimatorKind::IncomeTax(e) => e.estimate(id, calendar)?,
        };
        retain_estimates(&mut instances, calendar);

        tracing::debug!(
            source = %self.id,
            pass = %self.pass,
            count = instances.len(),
            "estimated cash flows"
        );
        Ok(instances)
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

fn sorted(ids: &FxHashSet<SourceId>) -> Vec<&SourceId> {
    let mut ids: Vec<&SourceId> = ids.iter().collect();
    ids.sort();
    ids
}

/// An estimated instance covering `period`.
fn period_instance(
    source_id: &SourceId,
    sink: &AccountId,
    item_type: ItemType,
    period: &Period,
    amount: Decimal,
) -> CashFlowInstance {
    CashFlowInstance::new(
        source_id.clone(),
        sink.clone(),
        item_type,
        (period.accrual_start, period.accrual_end),
        period.cash_flow_date,
        amount,
    )
    .estimated()
}

fn retain_estimates(instances: &mut Vec<CashFlowInstance>, calendar: &Calendar) {
    if let Some(cutoff) = calendar.estimate_after() {
        instances.retain(|i| i.cash_flow_date() > cutoff);
    }
}

fn is_income_of(instance: &CashFlowInstance, sources: &FxHashSet<SourceId>) -> bool {
    instance.item_type() == ItemType::Income && sources.contains(instance.source_id())
}
