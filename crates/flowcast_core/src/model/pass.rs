use serde::{Deserialize, Serialize};

/// Ordered stages of calendar computation
///
/// Estimators in a later pass may read the completed totals of every earlier
/// pass. Passes never repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    BaseCashFlows,
    DerivedIncome,
    DerivedExpenses,
    Taxes,
}

impl Pass {
    pub const ALL: [Pass; 4] = [
        Pass::BaseCashFlows,
        Pass::DerivedIncome,
        Pass::DerivedExpenses,
        Pass::Taxes,
    ];

    pub fn next(self) -> Option<Pass> {
        match self {
            Pass::BaseCashFlows => Some(Pass::DerivedIncome),
            Pass::DerivedIncome => Some(Pass::DerivedExpenses),
            Pass::DerivedExpenses => Some(Pass::Taxes),
            Pass::Taxes => None,
        }
    }
}

impl std::fmt::Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pass::BaseCashFlows => "BASE_CASH_FLOWS",
            Pass::DerivedIncome => "DERIVED_INCOME",
            Pass::DerivedExpenses => "DERIVED_EXPENSES",
            Pass::Taxes => "TAXES",
        };
        f.write_str(name)
    }
}
