//! Scenario configuration
//!
//! `ScenarioConfig` is the authored form of a scenario: every cross-reference
//! is a raw string id. [`Scenario::link`](crate::scenario::Scenario::link)
//! turns it into estimators.
//!
//! # Builder DSL
//!
//! ```ignore
//! use flowcast_core::config::{FrequencyBuilder, ScenarioBuilder};
//! use flowcast_core::model::Pass;
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
//! ```

mod builder;

pub use builder::{FrequencyBuilder, ScenarioBuilder};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::model::{Account, Assumptions, Entity, Frequency, Job, Security, SourceDefinition, TaxTable};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub assumptions: Assumptions,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub securities: Vec<Security>,
    #[serde(default)]
    pub frequencies: Vec<Frequency>,
    #[serde(default)]
    pub tax_tables: Vec<TaxTable>,
    #[serde(default)]
    pub sources: Vec<SourceDefinition>,
    /// Instances paid on or before this date come from history, not estimates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate_after: Option<Date>,
}
