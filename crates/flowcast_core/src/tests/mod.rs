//! Scenario-level tests for the flowcast projection engine
//!
//! Tests are organized by topic:
//! - `periods` - Period generation and tiling for every schedule
//! - `salary_bonus` - Salary and bonus estimators
//! - `equity` - RSU and stock option vesting
//! - `liability` - Loan amortization
//! - `alimony` - Base and Smith-Ostler alimony with the annual cap
//! - `income_tax` - Year-to-date progressive tax
//! - `calendar` - Pass ordering, queries, history and balances
//! - `linking` - Registry and reference resolution errors
//! - `serialization` - Config and instance round trips

mod equity;
mod linking;
mod salary_bonus;
mod serialization;

use jiff::civil::{Date, date};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calendar::Calendar;
use crate::config::{FrequencyBuilder, ScenarioBuilder, ScenarioConfig};
use crate::error::Result;
use crate::model::{CashFlowInstance, Pass, SourceId};
use crate::projection::project;
use crate::scenario::Scenario;

/// Alice works for Acme and banks at "checking"; Bob is her former spouse.
pub(crate) fn household() -> ScenarioBuilder {
    ScenarioBuilder::new("Household")
        .person("alice", "Alice")
        .person("bob", "Bob")
        .company("acme", "Acme Corp")
        .company("bank", "First Bank")
        .government("irs", "IRS")
        .account("checking", "Checking", "alice", date(2025, 1, 1), dec!(1000))
        .account("bob-savings", "Savings", "bob", date(2025, 1, 1), Decimal::ZERO)
        .job("alice-acme", "acme", "alice", "checking")
}

/// Month-end pay for all of 2025.
pub(crate) fn monthly_2025(id: &str) -> FrequencyBuilder {
    FrequencyBuilder::monthly(id, date(2025, 1, 1), date(2025, 12, 31)).first_payment(date(2025, 1, 31))
}

/// Alice's 120k salary, paid monthly in the first pass.
pub(crate) fn with_salary(builder: ScenarioBuilder) -> ScenarioBuilder {
    builder
        .frequency(monthly_2025("pay"))
        .salary("alice-salary", "alice-acme", "pay", dec!(120000), Pass::BaseCashFlows)
}

pub(crate) fn run(config: &ScenarioConfig) -> Result<Calendar> {
    run_with_history(config, Vec::new())
}

pub(crate) fn run_with_history(config: &ScenarioConfig, history: Vec<CashFlowInstance>) -> Result<Calendar> {
    let scenario = Scenario::link(config)?;
    project(&scenario, &scenario.prices, history)
}

pub(crate) fn amounts(calendar: &Calendar, source: &str) -> Vec<Decimal> {
    calendar
        .cash_flows_by_source(&SourceId::from(source), None)
        .iter()
        .map(|i| i.amount())
        .collect()
}

pub(crate) fn dates(calendar: &Calendar, source: &str) -> Vec<Date> {
    calendar
        .cash_flows_by_source(&SourceId::from(source), None)
        .iter()
        .map(|i| i.cash_flow_date())
        .collect()
}
