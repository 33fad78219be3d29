//! Personal cash-flow projection library
//!
//! This crate projects a household's future cash flows from a scenario of
//! jobs, accounts, loans and obligations. It supports:
//! - Payment schedules (annual through biweekly, and vesting schedules) that
//!   split an annual amount into accrual periods
//! - Salary, bonuses, RSUs and stock options
//! - Expenses, loan amortization and Smith-Ostler alimony with an annual cap
//! - Progressive income tax computed from year-to-date income
//! - A multi-pass calendar where later passes read totals of earlier ones
//! - Running cash and share balances per account
//!
//! # Builder DSL
//!
//! ```ignore
//! use flowcast_core::config::{FrequencyBuilder, ScenarioBuilder};
//! use flowcast_core::model::Pass;
//! use flowcast_core::{Scenario, project};
//! use jiff::civil::date;
//! use rust_decimal_macros::dec;
//!
//! let config = ScenarioBuilder::new("Household")
//!     .person("alice", "Alice")
//!     .company("acme", "Acme Corp")
//!     .account("checking", "Checking", "alice", date(2025, 1, 1), dec!(5000))
//!     .job("alice-acme", "acme", "alice", "checking")
//!     .frequency(FrequencyBuilder::monthly("pay", date(2025, 1, 1), date(2025, 12, 31)))
//!     .salary("alice-salary", "alice-acme", "pay", dec!(120000), Pass::BaseCashFlows)
//!     .build();
//!
//! let scenario = Scenario::link(&config)?;
//! let calendar = project(&scenario, &scenario.prices, Vec::new())?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod calendar;
pub mod date_math;
pub mod error;
pub mod estimators;
pub mod money;
pub mod periods;
pub mod pricing;
pub mod projection;
pub mod registry;
pub mod scenario;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use calendar::{AccountSnapshot, Calendar, YearPosition};
pub use config::{FrequencyBuilder, ScenarioBuilder, ScenarioConfig};
pub use error::{EstimateError, LinkError, PricingError, ProjectionError, TaxError};
pub use periods::{Period, PeriodPosition};
pub use pricing::{PriceHistory, SharePricing};
pub use projection::{project, project_scenarios};
pub use scenario::Scenario;
