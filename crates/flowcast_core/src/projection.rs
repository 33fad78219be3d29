//! Projection driver
//!
//! Builds a fresh [`Calendar`] for a linked scenario, seeds it with opening
//! positions and history, runs every pass in order and finishes with the
//! balance walk.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::calendar::Calendar;
use crate::error::Result;
use crate::estimators::EstimatorKind;
use crate::model::{CashBalance, CashFlowInstance, Pass, ShareBalance};
use crate::pricing::SharePricing;
use crate::scenario::Scenario;

/// Project one scenario.
///
/// `history` holds instances that already happened; they are ingested before
/// the first pass so estimators can read them.
pub fn project(
    scenario: &Scenario,
    pricing: &dyn SharePricing,
    history: Vec<CashFlowInstance>,
) -> Result<Calendar> {
    tracing::info!(
        scenario = %scenario.name,
        sources = scenario.estimators.len(),
        history = history.len(),
        "projection started"
    );

    let mut calendar =
        Calendar::new(scenario.assumptions.clone()).with_estimate_after(scenario.estimate_after);

    for frequency in &scenario.frequencies {
        calendar.register_frequency(frequency);
    }

    for account in &scenario.accounts {
        let holdings = account
            .holdings
            .iter()
            .map(|holding| -> Result<ShareBalance> {
                let price =
                    pricing.share_price_at(&holding.security, account.opening_date, &scenario.assumptions)?;
                Ok(ShareBalance::new(
                    account.opening_date,
                    holding.security.clone(),
                    holding.shares,
                    price,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        calendar.register_account(
            account.id.clone(),
            CashBalance::new(account.opening_date, account.opening_cash),
            holdings,
        );
    }

    for estimator in &scenario.estimators {
        if let EstimatorKind::Liability(loan) = &estimator.kind {
            calendar.register_liability(
                estimator.id.clone(),
                CashBalance::new(loan.frequency.accrue_start, loan.starting_balance),
            );
        }
    }

    calendar.add_cash_flow_instances(history);

    for pass in Pass::ALL {
        let added = calendar.run_pass(pass, &scenario.estimators, pricing)?;
        tracing::debug!(scenario = %scenario.name, %pass, added, "pass finished");
    }

    calendar.compute_balances();

    tracing::info!(
        scenario = %scenario.name,
        instances = calendar.cash_flows().len(),
        "projection finished"
    );
    Ok(calendar)
}

/// Project each scenario against its own price history.
pub fn project_scenarios(scenarios: &[Scenario]) -> Vec<Result<Calendar>> {
    #[cfg(feature = "parallel")]
    let calendars = scenarios
        .par_iter()
        .map(|scenario| project(scenario, &scenario.prices, Vec::new()))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let calendars = scenarios
        .iter()
        .map(|scenario| project(scenario, &scenario.prices, Vec::new()))
        .collect();

    calendars
}
