//! Source definitions as authored
//!
//! These hold raw string ids only. `Scenario::link` resolves them into
//! estimators.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AccountId, EntityId, FrequencyId, JobId, Pass, SecurityId, SourceId, TaxTableId};

/// How the annual alimony cap is applied to the merged payment stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlimonyCapPolicy {
    /// Payments are clamped to what is left of the year's allowance
    #[default]
    Clamp,
    /// A payment smaller than the remaining allowance is raised to the whole
    /// remaining allowance. Kept for reproducing legacy projections.
    FillRemaining,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceDefinition {
    Salary {
        id: SourceId,
        pass: Pass,
        job: JobId,
        frequency: FrequencyId,
        base_annual_salary: Decimal,
    },
    BonusPeriodicFixed {
        id: SourceId,
        pass: Pass,
        job: JobId,
        frequency: FrequencyId,
        annual_amount: Decimal,
    },
    BonusAnnualPct {
        id: SourceId,
        pass: Pass,
        job: JobId,
        frequency: FrequencyId,
        /// Salary source whose annual total the percentage applies to
        salary: SourceId,
        bonus_pct: Decimal,
    },
    Rsu {
        id: SourceId,
        pass: Pass,
        job: JobId,
        frequency: FrequencyId,
        security: SecurityId,
        total_shares: Decimal,
    },
    StockOption {
        id: SourceId,
        pass: Pass,
        job: JobId,
        frequency: FrequencyId,
        security: SecurityId,
        total_shares: Decimal,
        strike_price: Decimal,
    },
    Expense {
        id: SourceId,
        pass: Pass,
        payor: EntityId,
        frequency: FrequencyId,
        annual_amount: Decimal,
        #[serde(default = "default_expense_category")]
        category: String,
        default_sink: AccountId,
    },
    Alimony {
        id: SourceId,
        pass: Pass,
        payor: EntityId,
        payee: EntityId,
        base_frequency: FrequencyId,
        smith_ostler_frequency: FrequencyId,
        /// Annual payor income exempt from the Smith-Ostler percentage
        base_income: Decimal,
        /// Annual base alimony
        base_alimony: Decimal,
        smith_ostler_rate: Decimal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_alimony: Option<Decimal>,
        #[serde(default)]
        cap_policy: AlimonyCapPolicy,
        default_sink: AccountId,
    },
    Liability {
        id: SourceId,
        pass: Pass,
        lender: EntityId,
        borrower: EntityId,
        frequency: FrequencyId,
        starting_balance: Decimal,
        /// Annual interest rate as a fraction (0.045 for 4.5%)
        annual_rate: Decimal,
        /// Scheduled payment per period, impounds included
        payment: Decimal,
        #[serde(default)]
        impounds: Decimal,
        /// Number of scheduled payments, when shorter than the frequency
        #[serde(default, skip_serializing_if = "Option::is_none")]
        term: Option<u32>,
        default_sink: AccountId,
    },
    IncomeTax {
        id: SourceId,
        pass: Pass,
        payor: EntityId,
        payee: EntityId,
        frequency: FrequencyId,
        tax_table: TaxTableId,
        default_sink: AccountId,
    },
}

fn default_expense_category() -> String {
    "Rent".to_string()
}

impl SourceDefinition {
    pub fn id(&self) -> &SourceId {
        match self {
            SourceDefinition::Salary { id, .. }
            | SourceDefinition::BonusPeriodicFixed { id, .. }
            | SourceDefinition::BonusAnnualPct { id, .. }
            | SourceDefinition::Rsu { id, .. }
            | SourceDefinition::StockOption { id, .. }
            | SourceDefinition::Expense { id, .. }
            | SourceDefinition::Alimony { id, .. }
            | SourceDefinition::Liability { id, .. }
            | SourceDefinition::IncomeTax { id, .. } => id,
        }
    }

    pub fn pass(&self) -> Pass {
        match self {
            SourceDefinition::Salary { pass, .. }
            | SourceDefinition::BonusPeriodicFixed { pass, .. }
            | SourceDefinition::BonusAnnualPct { pass, .. }
            | SourceDefinition::Rsu { pass, .. }
            | SourceDefinition::StockOption { pass, .. }
            | SourceDefinition::Expense { pass, .. }
            | SourceDefinition::Alimony { pass, .. }
            | SourceDefinition::Liability { pass, .. }
            | SourceDefinition::IncomeTax { pass, .. } => *pass,
        }
    }
}
