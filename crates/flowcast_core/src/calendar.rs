//! Multi-pass cash-flow calendar
//!
//! The calendar owns every instance of a projection run. Estimators read it
//! through the query surface; it is only mutated between estimators, when a
//! whole batch is appended, and by the final balance walk.
//!
//! Passes run in [`Pass::ALL`] order. Every estimator of a pass is evaluated
//! against the calendar as it stood when the pass began, and the pass's
//! batches become visible only after all of them have been produced.

use std::collections::{BTreeMap, BTreeSet};

use jiff::civil::Date;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::date_math::year_end;
use crate::error::{ProjectionError, Result};
use crate::estimators::Estimator;
use crate::model::{
    AccountId, Assumptions, Balance, CashBalance, CashFlowInstance, Frequency, Pass, SecurityId,
    ShareBalance, SourceId,
};
use crate::money::round_money;
use crate::pricing::SharePricing;

/// Value of an account after the last change on a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub date: Date,
    pub cash: Decimal,
    pub securities: Decimal,
    pub total: Decimal,
}

/// Year-end positions for presentation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearPosition {
    pub assets: BTreeMap<AccountId, Decimal>,
    pub liabilities: BTreeMap<SourceId, Decimal>,
}

/// Cash and share positions of one account during the balance walk
#[derive(Debug, Clone)]
struct AccountPosition {
    cash: CashBalance,
    shares: BTreeMap<SecurityId, ShareBalance>,
}

impl AccountPosition {
    fn empty(date: Date) -> Self {
        Self {
            cash: CashBalance::new(date, Decimal::ZERO),
            shares: BTreeMap::new(),
        }
    }

    fn apply_shares(&mut self, change: &ShareBalance) {
        let next = match self.shares.get(&change.security_id) {
            Some(held) => held.apply_change(change),
            None => change.clone(),
        };
        self.shares.insert(change.security_id.clone(), next);
    }

    fn securities_value(&self) -> Decimal {
        round_money(self.shares.values().map(ShareBalance::value).sum())
    }

    fn snapshot(&self, date: Date) -> AccountSnapshot {
        let securities = self.securities_value();
        AccountSnapshot {
            date,
            cash: self.cash.value,
            securities,
            total: round_money(self.cash.value + securities),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Calendar {
    assumptions: Assumptions,
    estimate_after: Option<Date>,
    /// Next pass to run; `None` once the final pass is done
    next_pass: Option<Pass>,

    /// Every instance, in chronological order
    instances: Vec<CashFlowInstance>,
    annual_totals: BTreeMap<i16, FxHashMap<SourceId, Decimal>>,
    years: BTreeSet<i16>,

    openings: BTreeMap<AccountId, AccountPosition>,
    liabilities: BTreeMap<SourceId, CashBalance>,
    snapshots: FxHashMap<AccountId, BTreeMap<Date, AccountSnapshot>>,
}

impl Calendar {
    pub fn new(assumptions: Assumptions) -> Self {
        Self {
            assumptions,
            estimate_after: None,
            next_pass: Some(Pass::BaseCashFlows),
            instances: Vec::new(),
            annual_totals: BTreeMap::new(),
            years: BTreeSet::new(),
            openings: BTreeMap::new(),
            liabilities: BTreeMap::new(),
            snapshots: FxHashMap::default(),
        }
    }

    /// Only estimate instances paid after `date`; earlier ones come from history.
    #[must_use]
    pub fn with_estimate_after(mut self, date: Option<Date>) -> Self {
        self.estimate_after = date;
        self
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn estimate_after(&self) -> Option<Date> {
        self.estimate_after
    }

    pub fn next_pass(&self) -> Option<Pass> {
        self.next_pass
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Include every year of the frequency's accrual window in `years()`.
    pub fn register_frequency(&mut self, frequency: &Frequency) {
        self.years.extend(frequency.years());
    }

    /// Opening cash and share positions of an account.
    pub fn register_account(&mut self, account: AccountId, cash: CashBalance, holdings: Vec<ShareBalance>) {
        let mut position = AccountPosition {
            cash,
            shares: BTreeMap::new(),
        };
        for holding in holdings {
            position.apply_shares(&holding);
        }
        self.openings.insert(account, position);
    }

    /// Opening principal of a loan.
    pub fn register_liability(&mut self, source: SourceId, opening: CashBalance) {
        self.liabilities.insert(source, opening);
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append one batch of instances. Later queries see all of it or none.
    pub fn add_cash_flow_instances(&mut self, batch: Vec<CashFlowInstance>) {
        if batch.is_empty() {
            return;
        }
        for instance in &batch {
            let year = instance.cash_flow_year();
            self.years.insert(year);
            *self
                .annual_totals
                .entry(year)
                .or_default()
                .entry(instance.source_id().clone())
                .or_insert(Decimal::ZERO) += instance.amount();
        }
        self.instances.extend(batch);
        self.instances.sort_by(CashFlowInstance::chronological_cmp);
        self.snapshots.clear();
    }

    /// Run every estimator assigned to `pass`, then publish their batches.
    ///
    /// Returns the number of instances added.
    pub fn run_pass(
        &mut self,
        pass: Pass,
        estimators: &[Estimator],
        pricing: &dyn SharePricing,
    ) -> Result<usize> {
        if self.next_pass != Some(pass) {
            return Err(ProjectionError::PassOutOfOrder {
                expected: self.next_pass,
                got: pass,
            });
        }

        let batches = estimators
            .iter()
            .filter(|e| e.pass == pass)
            .map(|e| e.estimate(self, pricing))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let added = batches.iter().map(Vec::len).sum();
        for batch in batches {
            self.add_cash_flow_instances(batch);
        }
        self.next_pass = pass.next();

        tracing::debug!(%pass, added, "pass complete");
        Ok(added)
    }

    /// Walk every instance in order, filling in running balances per sink.
    ///
    /// Records one snapshot per account per date on which it changed.
    pub fn compute_balances(&mut self) {
        let mut positions = self.openings.clone();
        let mut snapshots: FxHashMap<AccountId, BTreeMap<Date, AccountSnapshot>> = FxHashMap::default();

        for instance in &mut self.instances {
            let date = instance.cash_flow_date();
            let position = positions
                .entry(instance.sink_id().clone())
                .or_insert_with(|| AccountPosition::empty(date));

            position.cash = position.cash.apply_change(date, instance.amount());
            if let Some(change) = instance.share_change().cloned() {
                position.apply_shares(&change);
            }

            let snapshot = position.snapshot(date);
            instance.set_balances(snapshot.cash, snapshot.securities);
            snapshots
                .entry(instance.sink_id().clone())
                .or_default()
                .insert(date, snapshot);
        }

        tracing::trace!(accounts = snapshots.len(), "balances computed");
        self.snapshots = snapshots;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Every instance in chronological order.
    pub fn cash_flows(&self) -> &[CashFlowInstance] {
        &self.instances
    }

    /// Total paid by `source` in `year`; zero when unknown.
    pub fn annual_cash_flow(&self, source: &SourceId, year: i16) -> Decimal {
        self.annual_totals
            .get(&year)
            .and_then(|totals| totals.get(source))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Net total of every source in `year`.
    pub fn annual_cash_flow_total(&self, year: i16) -> Decimal {
        self.annual_totals
            .get(&year)
            .map(|totals| totals.values().copied().sum())
            .unwrap_or(Decimal::ZERO)
    }

    pub fn cash_flows_by_source(&self, source: &SourceId, year: Option<i16>) -> Vec<&CashFlowInstance> {
        self.instances
            .iter()
            .filter(|i| i.source_id() == source && year.is_none_or(|y| i.cash_flow_year() == y))
            .collect()
    }

    pub fn cash_flows_by_sink(&self, sink: &AccountId, year: Option<i16>) -> Vec<&CashFlowInstance> {
        self.instances
            .iter()
            .filter(|i| i.sink_id() == sink && year.is_none_or(|y| i.cash_flow_year() == y))
            .collect()
    }

    /// Sorted years spanned by registered frequencies and instances.
    pub fn years(&self) -> Vec<i16> {
        self.years.iter().copied().collect()
    }

    /// Sum of amounts matching `predicate` paid in `[start, end]`.
    pub fn sum_matching_cash_flow_for_period(
        &self,
        start: Date,
        end: Date,
        predicate: impl Fn(&CashFlowInstance) -> bool,
    ) -> Decimal {
        let first = self.instances.partition_point(|i| i.cash_flow_date() < start);
        self.instances[first..]
            .iter()
            .take_while(|i| i.cash_flow_date() <= end)
            .filter(|i| predicate(i))
            .map(CashFlowInstance::amount)
            .sum()
    }

    /// Outstanding principal of a loan after its last payment in `year`.
    pub fn liability_balance(&self, source: &SourceId, year: i16) -> Decimal {
        let last_day = year_end(year);
        let paid = self
            .instances
            .iter()
            .rev()
            .filter(|i| i.source_id() == source && i.cash_flow_date() <= last_day)
            .find_map(CashFlowInstance::liability_balance);

        match (paid, self.liabilities.get(source)) {
            (Some(balance), _) => balance,
            (None, Some(opening)) if opening.balance_date <= last_day => opening.value,
            _ => Decimal::ZERO,
        }
    }

    /// Opening principal followed by the balance after each payment.
    pub fn liability_balances(&self, source: &SourceId) -> Vec<Balance> {
        let opening = self.liabilities.get(source).cloned().map(Balance::Cash);
        let payments = self
            .instances
            .iter()
            .filter(|i| i.source_id() == source)
            .filter_map(|i| {
                i.liability_balance()
                    .map(|value| Balance::Cash(CashBalance::new(i.cash_flow_date(), value)))
            });
        opening.into_iter().chain(payments).collect()
    }

    /// Account value at the end of `date`, from the latest snapshot on or before it.
    pub fn account_value_at(&self, account: &AccountId, date: Date) -> Decimal {
        let snapshot = self
            .snapshots
            .get(account)
            .and_then(|dates| dates.range(..=date).next_back())
            .map(|(_, snapshot)| snapshot.total);

        match (snapshot, self.openings.get(account)) {
            (Some(total), _) => total,
            (None, Some(opening)) if opening.cash.balance_date <= date => {
                opening.snapshot(date).total
            }
            _ => Decimal::ZERO,
        }
    }

    /// Account value at the end of `year`.
    pub fn asset_value(&self, account: &AccountId, year: i16) -> Decimal {
        self.account_value_at(account, year_end(year))
    }

    pub fn account_snapshots(&self, account: &AccountId) -> Vec<&AccountSnapshot> {
        self.snapshots
            .get(account)
            .map(|dates| dates.values().collect())
            .unwrap_or_default()
    }

    /// Year-end value of every registered account and loan.
    pub fn assets_and_liabilities(&self) -> BTreeMap<i16, YearPosition> {
        self.years
            .iter()
            .map(|&year| {
                let assets = self
                    .openings
                    .keys()
                    .map(|account| (account.clone(), self.asset_value(account, year)))
                    .collect();
                let liabilities = self
                    .liabilities
                    .keys()
                    .map(|source| (source.clone(), self.liability_balance(source, year)))
                    .collect();
                (
                    year,
                    YearPosition {
                        assets,
                        liabilities,
                    },
                )
            })
            .collect()
    }
}
