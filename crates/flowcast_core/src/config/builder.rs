//! Scenario Builder
//!
//! A fluent API for assembling a [`ScenarioConfig`] in code. Ids stay plain
//! strings; nothing is resolved until [`Scenario::link`](crate::scenario::Scenario::link).
//!
//! # Example
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
//!     .frequency(
//!         FrequencyBuilder::monthly("pay", date(2025, 1, 1), date(2025, 12, 31))
//!             .first_payment(date(2025, 1, 31)),
//!     )
//!     .salary("alice-salary", "alice-acme", "pay", dec!(120000), Pass::BaseCashFlows)
//!     .build();
//! ```

use jiff::civil::Date;
use rust_decimal::Decimal;

use super::ScenarioConfig;
use crate::model::{
    Account, AccountId, ApportionmentPolicy, Assumptions, Entity, EntityId, EntityKind, Frequency,
    FrequencyId, Holding, Job, JobId, Pass, Schedule, Security, SecurityId, SourceDefinition,
    SourceId, TaxTable, Vesting,
};

// ============================================================================
// FrequencyBuilder
// ============================================================================

/// Builder for one payment schedule over an accrual window
#[derive(Debug, Clone)]
pub struct FrequencyBuilder {
    id: FrequencyId,
    accrue_start: Date,
    accrue_end: Date,
    first_payment_date: Option<Date>,
    apportionment: ApportionmentPolicy,
    schedule: Schedule,
}

impl FrequencyBuilder {
    #[must_use]
    pub fn new(id: impl Into<FrequencyId>, accrue_start: Date, accrue_end: Date, schedule: Schedule) -> Self {
        Self {
            id: id.into(),
            accrue_start,
            accrue_end,
            first_payment_date: None,
            apportionment: ApportionmentPolicy::default(),
            schedule,
        }
    }

    #[must_use]
    pub fn annual(id: impl Into<FrequencyId>, accrue_start: Date, accrue_end: Date) -> Self {
        Self::new(id, accrue_start, accrue_end, Schedule::Annual)
    }

    #[must_use]
    pub fn semi_annual(
        id: impl Into<FrequencyId>,
        accrue_start: Date,
        accrue_end: Date,
        first_accrual_end: Date,
    ) -> Self {
        Self::new(id, accrue_start, accrue_end, Schedule::SemiAnnual { first_accrual_end })
    }

    #[must_use]
    pub fn biweekly(
        id: impl Into<FrequencyId>,
        accrue_start: Date,
        accrue_end: Date,
        first_period_start: Date,
    ) -> Self {
        Self::new(id, accrue_start, accrue_end, Schedule::Biweekly { first_period_start })
    }

    #[must_use]
    pub fn monthly(id: impl Into<FrequencyId>, accrue_start: Date, accrue_end: Date) -> Self {
        Self::new(id, accrue_start, accrue_end, Schedule::Monthly)
    }

    #[must_use]
    pub fn semi_monthly(
        id: impl Into<FrequencyId>,
        accrue_start: Date,
        accrue_end: Date,
        first_payment_day: i8,
        second_payment_day: i8,
    ) -> Self {
        Self::new(
            id,
            accrue_start,
            accrue_end,
            Schedule::SemiMonthly {
                first_payment_day,
                second_payment_day,
            },
        )
    }

    #[must_use]
    pub fn quarterly(id: impl Into<FrequencyId>, accrue_start: Date, accrue_end: Date) -> Self {
        Self::new(id, accrue_start, accrue_end, Schedule::Quarterly)
    }

    /// Vesting steps as `(months, percent)` pairs
    #[must_use]
    pub fn vesting(
        id: impl Into<FrequencyId>,
        accrue_start: Date,
        accrue_end: Date,
        steps: impl IntoIterator<Item = (u32, Decimal)>,
    ) -> Self {
        let vestings = steps
            .into_iter()
            .map(|(months, percent)| Vesting { months, percent })
            .collect();
        Self::new(id, accrue_start, accrue_end, Schedule::VestingSchedule { vestings })
    }

    /// Defaults to the accrual start
    #[must_use]
    pub fn first_payment(mut self, date: Date) -> Self {
        self.first_payment_date = Some(date);
        self
    }

    #[must_use]
    pub fn apportionment(mut self, policy: ApportionmentPolicy) -> Self {
        self.apportionment = policy;
        self
    }

    pub fn build(self) -> Frequency {
        Frequency {
            id: self.id,
            accrue_start: self.accrue_start,
            accrue_end: self.accrue_end,
            first_payment_date: self.first_payment_date.unwrap_or(self.accrue_start),
            apportionment: self.apportionment,
            schedule: self.schedule,
        }
    }
}

// ============================================================================
// ScenarioBuilder
// ============================================================================

/// Builder for a whole scenario config
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuilder {
    config: ScenarioConfig,

    // Resolved against accounts and securities during build
    pending_holdings: Vec<(AccountId, Holding)>,
    pending_prices: Vec<(SecurityId, Date, Decimal)>,
}

impl ScenarioBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: ScenarioConfig {
                name: name.into(),
                ..ScenarioConfig::default()
            },
            ..Self::default()
        }
    }

    // =========================================================================
    // Basic Configuration
    // =========================================================================

    #[must_use]
    pub fn assumptions(mut self, assumptions: Assumptions) -> Self {
        self.config.assumptions = assumptions;
        self
    }

    /// Only estimate cash flows paid after `date`
    #[must_use]
    pub fn estimate_after(mut self, date: Date) -> Self {
        self.config.estimate_after = Some(date);
        self
    }

    // =========================================================================
    // Entities, Jobs and Accounts
    // =========================================================================

    #[must_use]
    pub fn entity(mut self, entity: Entity) -> Self {
        self.config.entities.push(entity);
        self
    }

    #[must_use]
    pub fn person(self, id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        self.entity_of_kind(id, name, EntityKind::Person)
    }

    #[must_use]
    pub fn company(self, id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        self.entity_of_kind(id, name, EntityKind::Company)
    }

    #[must_use]
    pub fn government(self, id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        self.entity_of_kind(id, name, EntityKind::Government)
    }

    fn entity_of_kind(self, id: impl Into<EntityId>, name: impl Into<String>, kind: EntityKind) -> Self {
        self.entity(Entity {
            id: id.into(),
            name: name.into(),
            kind,
        })
    }

    #[must_use]
    pub fn job(
        mut self,
        id: impl Into<JobId>,
        employer: impl Into<EntityId>,
        employee: impl Into<EntityId>,
        default_sink: impl Into<AccountId>,
    ) -> Self {
        self.config.jobs.push(Job {
            id: id.into(),
            employer: employer.into(),
            employee: employee.into(),
            default_sink: default_sink.into(),
        });
        self
    }

    #[must_use]
    pub fn account(
        mut self,
        id: impl Into<AccountId>,
        name: impl Into<String>,
        owner: impl Into<EntityId>,
        opening_date: Date,
        opening_cash: Decimal,
    ) -> Self {
        self.config.accounts.push(Account {
            id: id.into(),
            name: name.into(),
            owner: owner.into(),
            opening_date,
            opening_cash,
            holdings: Vec::new(),
        });
        self
    }

    /// Add shares of a security to an account's opening holdings
    #[must_use]
    pub fn holding(
        mut self,
        account: impl Into<AccountId>,
        security: impl Into<SecurityId>,
        shares: Decimal,
    ) -> Self {
        self.pending_holdings.push((
            account.into(),
            Holding {
                security: security.into(),
                shares,
            },
        ));
        self
    }

    // =========================================================================
    // Securities and Tax Tables
    // =========================================================================

    #[must_use]
    pub fn security(mut self, id: impl Into<SecurityId>, name: impl Into<String>) -> Self {
        self.config.securities.push(Security {
            id: id.into(),
            name: name.into(),
            prices: Default::default(),
        });
        self
    }

    /// Record a known price for a security
    #[must_use]
    pub fn price(mut self, security: impl Into<SecurityId>, date: Date, price: Decimal) -> Self {
        self.pending_prices.push((security.into(), date, price));
        self
    }

    #[must_use]
    pub fn tax_table(mut self, table: TaxTable) -> Self {
        self.config.tax_tables.push(table);
        self
    }

    // =========================================================================
    // Frequencies and Sources
    // =========================================================================

    #[must_use]
    pub fn frequency(mut self, builder: FrequencyBuilder) -> Self {
        self.config.frequencies.push(builder.build());
        self
    }

    #[must_use]
    pub fn source(mut self, source: SourceDefinition) -> Self {
        self.config.sources.push(source);
        self
    }

    #[must_use]
    pub fn salary(
        self,
        id: impl Into<SourceId>,
        job: impl Into<JobId>,
        frequency: impl Into<FrequencyId>,
        base_annual_salary: Decimal,
        pass: Pass,
    ) -> Self {
        self.source(SourceDefinition::Salary {
            id: id.into(),
            pass,
            job: job.into(),
            frequency: frequency.into(),
            base_annual_salary,
        })
    }

    #[must_use]
    pub fn bonus_fixed(
        self,
        id: impl Into<SourceId>,
        job: impl Into<JobId>,
        frequency: impl Into<FrequencyId>,
        annual_amount: Decimal,
        pass: Pass,
    ) -> Self {
        self.source(SourceDefinition::BonusPeriodicFixed {
            id: id.into(),
            pass,
            job: job.into(),
            frequency: frequency.into(),
            annual_amount,
        })
    }

    #[must_use]
    pub fn bonus_pct(
        self,
        id: impl Into<SourceId>,
        job: impl Into<JobId>,
        frequency: impl Into<FrequencyId>,
        salary: impl Into<SourceId>,
        bonus_pct: Decimal,
        pass: Pass,
    ) -> Self {
        self.source(SourceDefinition::BonusAnnualPct {
            id: id.into(),
            pass,
            job: job.into(),
            frequency: frequency.into(),
            salary: salary.into(),
            bonus_pct,
        })
    }

    #[must_use]
    pub fn rsu(
        self,
        id: impl Into<SourceId>,
        job: impl Into<JobId>,
        frequency: impl Into<FrequencyId>,
        security: impl Into<SecurityId>,
        total_shares: Decimal,
        pass: Pass,
    ) -> Self {
        self.source(SourceDefinition::Rsu {
            id: id.into(),
            pass,
            job: job.into(),
            frequency: frequency.into(),
            security: security.into(),
            total_shares,
        })
    }

    #[must_use]
    pub fn expense(
        self,
        id: impl Into<SourceId>,
        payor: impl Into<EntityId>,
        frequency: impl Into<FrequencyId>,
        annual_amount: Decimal,
        default_sink: impl Into<AccountId>,
        pass: Pass,
    ) -> Self {
        self.source(SourceDefinition::Expense {
            id: id.into(),
            pass,
            payor: payor.into(),
            frequency: frequency.into(),
            annual_amount,
            category: "Rent".to_string(),
            default_sink: default_sink.into(),
        })
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Finish the config, attaching pending holdings and prices.
    ///
    /// Holdings and prices naming an unknown account or security are dropped
    /// with a warning.
    pub fn build(mut self) -> ScenarioConfig {
        for (account_id, holding) in self.pending_holdings {
            match self.config.accounts.iter_mut().find(|a| a.id == account_id) {
                Some(account) => account.holdings.push(holding),
                None => tracing::warn!(account = %account_id, "holding for unknown account dropped"),
            }
        }
        for (security_id, date, price) in self.pending_prices {
            match self.config.securities.iter_mut().find(|s| s.id == security_id) {
                Some(security) => {
                    security.prices.insert(date, price);
                }
                None => tracing::warn!(security = %security_id, "price for unknown security dropped"),
            }
        }
        self.config
    }
}
