//! Cash-flow instances - the dated, amounted output of estimators
//!
//! An instance is produced once (by an estimator or a historical feed) and is
//! never edited afterwards, except for the two balance fields that the
//! calendar fills in during its balance walk.

use std::cmp::Ordering;

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountId, ShareBalance, SourceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Income,
    Expense,
    Transfer,
}

/// Optional payload for instances with more structure than a cash amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstanceDetail {
    /// A loan payment split. `principal + interest + impounds == -amount`.
    Liability {
        principal: Decimal,
        interest: Decimal,
        impounds: Decimal,
        /// Outstanding principal after this payment
        balance: Decimal,
    },
    /// A change in a share position of the sink account
    Security { change: ShareBalance },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    source_id: SourceId,
    sink_id: AccountId,
    item_type: ItemType,
    #[serde(default)]
    parent_category: String,
    #[serde(default)]
    category: String,
    accrual_start: Date,
    accrual_end: Date,
    cash_flow_date: Date,
    amount: Decimal,
    #[serde(default)]
    cash_balance: Decimal,
    #[serde(default)]
    asset_balance: Decimal,
    #[serde(default)]
    estimated: bool,
    #[serde(default)]
    description: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<InstanceDetail>,
}

impl CashFlowInstance {
    /// Create an instance over `[accrual_start, accrual_end]` paid on `cash_flow_date`.
    ///
    /// `amount` is the signed change to the sink's cash: positive for money in.
    pub fn new(
        source_id: SourceId,
        sink_id: AccountId,
        item_type: ItemType,
        (accrual_start, accrual_end): (Date, Date),
        cash_flow_date: Date,
        amount: Decimal,
    ) -> Self {
        Self {
            id: None,
            source_id,
            sink_id,
            item_type,
            parent_category: String::new(),
            category: String::new(),
            accrual_start,
            accrual_end,
            cash_flow_date,
            amount,
            cash_balance: Decimal::ZERO,
            asset_balance: Decimal::ZERO,
            estimated: false,
            description: String::new(),
            notes: String::new(),
            labels: Vec::new(),
            detail: None,
        }
    }

    // =========================================================================
    // Construction helpers
    // =========================================================================

    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_category(mut self, parent: impl Into<String>, category: impl Into<String>) -> Self {
        self.parent_category = parent.into();
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: InstanceDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Mark the instance as a projection rather than a recorded fact.
    #[must_use]
    pub fn estimated(mut self) -> Self {
        self.estimated = true;
        self
    }

    /// Same instance with a different amount. Used by alimony capping.
    #[must_use]
    pub(crate) fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub(crate) fn set_balances(&mut self, cash_balance: Decimal, asset_balance: Decimal) {
        self.cash_balance = cash_balance;
        self.asset_balance = asset_balance;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    pub fn sink_id(&self) -> &AccountId {
        &self.sink_id
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn parent_category(&self) -> &str {
        &self.parent_category
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn accrual_start(&self) -> Date {
        self.accrual_start
    }

    pub fn accrual_end(&self) -> Date {
        self.accrual_end
    }

    pub fn cash_flow_date(&self) -> Date {
        self.cash_flow_date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Cash in the sink account after this instance was applied.
    pub fn cash_balance(&self) -> Decimal {
        self.cash_balance
    }

    /// Value of the sink account's share positions after this instance was applied.
    pub fn asset_balance(&self) -> Decimal {
        self.asset_balance
    }

    pub fn is_estimated(&self) -> bool {
        self.estimated
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn detail(&self) -> Option<&InstanceDetail> {
        self.detail.as_ref()
    }

    /// Remaining loan principal, for liability payments.
    pub fn liability_balance(&self) -> Option<Decimal> {
        match &self.detail {
            Some(InstanceDetail::Liability { balance, .. }) => Some(*balance),
            _ => None,
        }
    }

    pub fn share_change(&self) -> Option<&ShareBalance> {
        match &self.detail {
            Some(InstanceDetail::Security { change }) => Some(change),
            _ => None,
        }
    }

    /// True when the cash-flow date falls in `[start, end]`.
    pub fn is_paid_in_date_range(&self, start: Date, end: Date) -> bool {
        self.cash_flow_date >= start && self.cash_flow_date <= end
    }

    pub fn cash_flow_year(&self) -> i16 {
        self.cash_flow_date.year()
    }

    /// Chronological ordering used by the calendar's instance index.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.cash_flow_date
            .cmp(&other.cash_flow_date)
            .then(self.accrual_start.cmp(&other.accrual_start))
            .then_with(|| self.category.cmp(&other.category))
            .then_with(|| self.description.cmp(&other.description))
    }
}
