//! Linking a scenario
//!
//! [`Scenario::link`] is the second construction phase: it loads every
//! authored object into an id registry, resolves the string references of each
//! source, and rejects sources that read totals produced in their own or a
//! later pass.

use std::collections::BTreeMap;

use jiff::civil::Date;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use crate::config::ScenarioConfig;
use crate::error::{IdKind, LinkError};
use crate::estimators::{
    Alimony, Estimator, EstimatorKind, Expense, FixedBonus, IncomeTax, Liability, PercentBonus,
    Rsu, Salary, StockOption,
};
use crate::model::{
    Account, AccountId, Assumptions, Entity, EntityId, Frequency, FrequencyId, Job, JobId, Pass,
    Security, SecurityId, SourceDefinition, SourceId, TaxTable, TaxTableId,
};
use crate::money::round_portion;
use crate::pricing::PriceHistory;
use crate::registry::Registry;

/// A linked scenario, ready to project
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub assumptions: Assumptions,
    pub estimate_after: Option<Date>,
    pub frequencies: Vec<Frequency>,
    pub accounts: Vec<Account>,
    pub estimators: Vec<Estimator>,
    /// Ids whose income instances count as each entity's income
    pub income_sources: BTreeMap<EntityId, FxHashSet<SourceId>>,
    pub prices: PriceHistory,
}

/// Registries built from a config, borrowed while sources are resolved
struct Registries<'a> {
    frequencies: Registry<FrequencyId, &'a Frequency>,
    entities: Registry<EntityId, &'a Entity>,
    jobs: Registry<JobId, &'a Job>,
    accounts: Registry<AccountId, &'a Account>,
    securities: Registry<SecurityId, &'a Security>,
    tax_tables: Registry<TaxTableId, &'a TaxTable>,
}

impl<'a> Registries<'a> {
    fn build(config: &'a ScenarioConfig) -> Result<Self, LinkError> {
        let frequencies = Registry::from_entries(
            IdKind::Frequency,
            config.frequencies.iter().map(|f| (f.id.clone(), f)),
        )?;
        for frequency in frequencies.values() {
            frequency
                .validate()
                .map_err(|reason| LinkError::InvalidFrequency {
                    id: frequency.id.to_string(),
                    reason,
                })?;
        }

        let registries = Self {
            frequencies,
            entities: Registry::from_entries(
                IdKind::Entity,
                config.entities.iter().map(|e| (e.id.clone(), e)),
            )?,
            jobs: Registry::from_entries(IdKind::Job, config.jobs.iter().map(|j| (j.id.clone(), j)))?,
            accounts: Registry::from_entries(
                IdKind::Account,
                config.accounts.iter().map(|a| (a.id.clone(), a)),
            )?,
            securities: Registry::from_entries(
                IdKind::Security,
                config.securities.iter().map(|s| (s.id.clone(), s)),
            )?,
            tax_tables: Registry::from_entries(
                IdKind::TaxTable,
                config.tax_tables.iter().map(|t| (t.id.clone(), t)),
            )?,
        };
        registries.check_references()?;
        Ok(registries)
    }

    /// References between non-source objects.
    fn check_references(&self) -> Result<(), LinkError> {
        for job in self.jobs.values() {
            self.entities.get(&job.employer)?;
            self.entities.get(&job.employee)?;
            self.accounts.get(&job.default_sink)?;
        }
        for account in self.accounts.values() {
            self.entities.get(&account.owner)?;
            for holding in &account.holdings {
                self.securities.get(&holding.security)?;
            }
        }
        Ok(())
    }

    fn frequency(&self, id: &FrequencyId) -> Result<Frequency, LinkError> {
        self.frequencies.get(id).map(|f| (*f).clone())
    }

    fn entity_name(&self, id: &EntityId) -> Result<String, LinkError> {
        self.entities.get(id).map(|e| e.name.clone())
    }

    fn account(&self, id: &AccountId) -> Result<AccountId, LinkError> {
        self.accounts.get(id).map(|a| a.id.clone())
    }

    /// Entity whose cash flows a source produces.
    fn owner(&self, source: &SourceDefinition) -> Result<EntityId, LinkError> {
        match source {
            SourceDefinition::Salary { job, .. }
            | SourceDefinition::BonusPeriodicFixed { job, .. }
            | SourceDefinition::BonusAnnualPct { job, .. }
            | SourceDefinition::Rsu { job, .. }
            | SourceDefinition::StockOption { job, .. } => {
                self.jobs.get(job).map(|j| j.employee.clone())
            }
            SourceDefinition::Expense { payor, .. }
            | SourceDefinition::Alimony { payor, .. }
            | SourceDefinition::IncomeTax { payor, .. } => {
                self.entities.get(payor).map(|e| e.id.clone())
            }
            SourceDefinition::Liability { borrower, .. } => {
                self.entities.get(borrower).map(|e| e.id.clone())
            }
        }
    }
}

fn is_income(source: &SourceDefinition) -> bool {
    matches!(
        source,
        SourceDefinition::Salary { .. }
            | SourceDefinition::BonusPeriodicFixed { .. }
            | SourceDefinition::BonusAnnualPct { .. }
            | SourceDefinition::Rsu { .. }
            | SourceDefinition::StockOption { .. }
    )
}

impl Scenario {
    pub fn link(config: &ScenarioConfig) -> Result<Scenario, LinkError> {
        let registries = Registries::build(config)?;

        let mut sources = Registry::new(IdKind::Source);
        let mut owners = Vec::with_capacity(config.sources.len());
        let mut income_sources: BTreeMap<EntityId, FxHashSet<SourceId>> = BTreeMap::new();
        for source in &config.sources {
            sources.insert(source.id().clone(), source)?;
            let owner = registries.owner(source)?;
            if is_income(source) {
                income_sources
                    .entry(owner.clone())
                    .or_default()
                    .insert(source.id().clone());
            }
            owners.push(owner);
        }
        // Historical paychecks are recorded under the job id
        for job in registries.jobs.values() {
            income_sources
                .entry(job.employee.clone())
                .or_default()
                .insert(SourceId::new(job.id.as_str()));
        }

        let estimators = config
            .sources
            .iter()
            .zip(owners)
            .map(|(source, owner)| {
                let payor_income = income_sources.get(&owner).cloned().unwrap_or_default();
                link_source(&registries, source, owner, payor_income)
            })
            .collect::<Result<Vec<_>, _>>()?;

        for estimator in &estimators {
            check_pass_order(estimator, &sources)?;
        }

        tracing::debug!(
            scenario = %config.name,
            sources = estimators.len(),
            frequencies = registries.frequencies.len(),
            "scenario linked"
        );

        Ok(Scenario {
            name: config.name.clone(),
            assumptions: config.assumptions.clone(),
            estimate_after: config.estimate_after,
            frequencies: config.frequencies.clone(),
            accounts: config.accounts.clone(),
            estimators,
            income_sources,
            prices: PriceHistory::from_securities(&config.securities),
        })
    }

    pub fn estimator(&self, id: &SourceId) -> Option<&Estimator> {
        self.estimators.iter().find(|e| &e.id == id)
    }
}

/// Every dependency that is itself a source must run in a strictly earlier pass.
///
/// Job ids in an income set stand for historical paychecks and are not checked.
fn check_pass_order(
    estimator: &Estimator,
    sources: &Registry<SourceId, &SourceDefinition>,
) -> Result<(), LinkError> {
    if let EstimatorKind::BonusAnnualPct(bonus) = &estimator.kind {
        sources.get(&bonus.salary)?;
    }
    for dependency in estimator.dependencies() {
        let Some(definition) = sources.lookup(dependency) else {
            continue;
        };
        let dependency_pass: Pass = definition.pass();
        if dependency_pass >= estimator.pass {
            return Err(LinkError::PassOrder {
                source_id: estimator.id.clone(),
                dependency: dependency.clone(),
                source_pass: estimator.pass,
                dependency_pass,
            });
        }
    }
    Ok(())
}

fn link_source(
    registries: &Registries<'_>,
    source: &SourceDefinition,
    owner: EntityId,
    payor_income: FxHashSet<SourceId>,
) -> Result<Estimator, LinkError> {
    let job_sink = |job: &JobId| registries.jobs.get(job).map(|j| j.default_sink.clone());
    let security = |id: &SecurityId| registries.securities.get(id).map(|s| s.id.clone());

    let kind = match source {
        SourceDefinition::Salary {
            job,
            frequency,
            base_annual_salary,
            ..
        } => {
            let employer = registries.jobs.get(job)?.employer.clone();
            EstimatorKind::Salary(Salary {
                frequency: registries.frequency(frequency)?,
                sink: job_sink(job)?,
                employer: registries.entity_name(&employer)?,
                base_annual_salary: *base_annual_salary,
            })
        }
        SourceDefinition::BonusPeriodicFixed {
            job,
            frequency,
            annual_amount,
            ..
        } => EstimatorKind::BonusPeriodicFixed(FixedBonus {
            frequency: registries.frequency(frequency)?,
            sink: job_sink(job)?,
            annual_amount: *annual_amount,
        }),
        SourceDefinition::BonusAnnualPct {
            job,
            frequency,
            salary,
            bonus_pct,
            ..
        } => EstimatorKind::BonusAnnualPct(PercentBonus {
            frequency: registries.frequency(frequency)?,
            sink: job_sink(job)?,
            salary: salary.clone(),
            bonus_pct: *bonus_pct,
        }),
        SourceDefinition::Rsu {
            job,
            frequency,
            security: security_id,
            total_shares,
            ..
        } => EstimatorKind::Rsu(Rsu {
            frequency: registries.frequency(frequency)?,
            sink: job_sink(job)?,
            security: security(security_id)?,
            total_shares: *total_shares,
        }),
        SourceDefinition::StockOption {
            job,
            frequency,
            security: security_id,
            total_shares,
            strike_price,
            ..
        } => EstimatorKind::StockOption(StockOption {
            frequency: registries.frequency(frequency)?,
            sink: job_sink(job)?,
            security: security(security_id)?,
            total_shares: *total_shares,
            strike_price: *strike_price,
        }),
        SourceDefinition::Expense {
            frequency,
            annual_amount,
            category,
            default_sink,
            ..
        } => EstimatorKind::Expense(Expense {
            frequency: registries.frequency(frequency)?,
            sink: registries.account(default_sink)?,
            annual_amount: *annual_amount,
            category: category.clone(),
        }),
        SourceDefinition::Alimony {
            payee,
            base_frequency,
            smith_ostler_frequency,
            base_income,
            base_alimony,
            smith_ostler_rate,
            max_alimony,
            cap_policy,
            default_sink,
            ..
        } => EstimatorKind::Alimony(Alimony {
            payee: registries.entity_name(payee)?,
            sink: registries.account(default_sink)?,
            base_frequency: registries.frequency(base_frequency)?,
            smith_ostler_frequency: registries.frequency(smith_ostler_frequency)?,
            base_income: *base_income,
            base_alimony: *base_alimony,
            smith_ostler_rate: *smith_ostler_rate,
            max_alimony: *max_alimony,
            cap_policy: *cap_policy,
            payor_income,
        }),
        SourceDefinition::Liability {
            id,
            lender,
            frequency,
            starting_balance,
            annual_rate,
            payment,
            impounds,
            term,
            default_sink,
            ..
        } => {
            let frequency = registries.frequency(frequency)?;
            let periods_per_year =
                frequency
                    .schedule
                    .periods_per_year()
                    .ok_or_else(|| LinkError::UnsupportedFrequency {
                        source_id: id.clone(),
                        frequency: frequency.id.to_string(),
                        reason: "loan payments need a fixed number of periods per year",
                    })?;
            EstimatorKind::Liability(Liability {
                sink: registries.account(default_sink)?,
                lender: registries.entity_name(lender)?,
                starting_balance: *starting_balance,
                period_rate: round_portion(*annual_rate / Decimal::from(periods_per_year)),
                payment: *payment,
                impounds: *impounds,
                term: *term,
                frequency,
            })
        }
        SourceDefinition::IncomeTax {
            payee,
            frequency,
            tax_table,
            default_sink,
            ..
        } => EstimatorKind::IncomeTax(IncomeTax {
            frequency: registries.frequency(frequency)?,
            sink: registries.account(default_sink)?,
            payee: registries.entity_name(payee)?,
            table: (*registries.tax_tables.get(tax_table)?).clone(),
            payor_income,
        }),
    };

    Ok(Estimator {
        id: source.id().clone(),
        pass: source.pass(),
        owner,
        kind,
    })
}
