//! Progressive tax tables

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxTableId;
use crate::error::TaxError;

/// A tax bracket: income above `lower_bound` is taxed at `marginal_rate`
/// until the next bracket starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    pub marginal_rate: Decimal,
}

impl TaxBracket {
    pub fn new(lower_bound: Decimal, marginal_rate: Decimal) -> Self {
        Self {
            lower_bound,
            marginal_rate,
        }
    }
}

/// Brackets for one tax year, ascending by lower bound, first bound at zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct TaxYearTable {
    brackets: Vec<TaxBracket>,
}

impl TaxYearTable {
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, TaxError> {
        match brackets.first() {
            None => {
                return Err(TaxError::InvalidBrackets {
                    reason: "a tax year needs at least one bracket",
                });
            }
            Some(first) if !first.lower_bound.is_zero() => {
                return Err(TaxError::InvalidBrackets {
                    reason: "the first bracket must start at zero",
                });
            }
            Some(_) => {}
        }
        if brackets
            .windows(2)
            .any(|pair| pair[1].lower_bound <= pair[0].lower_bound)
        {
            return Err(TaxError::InvalidBrackets {
                reason: "bracket lower bounds must be strictly increasing",
            });
        }
        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Progressive tax on `income`, unrounded.
    pub fn compute_tax(&self, income: Decimal) -> Decimal {
        let mut tax = Decimal::ZERO;

        for (i, bracket) in self.brackets.iter().enumerate() {
            if income <= bracket.lower_bound {
                break;
            }
            let upper = self
                .brackets
                .get(i + 1)
                .map_or(income, |next| income.min(next.lower_bound));
            let taxable = (upper - bracket.lower_bound).max(Decimal::ZERO);
            tax += taxable * bracket.marginal_rate;
        }

        tax
    }
}

impl TryFrom<Vec<TaxBracket>> for TaxYearTable {
    type Error = TaxError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        TaxYearTable::new(brackets)
    }
}

impl From<TaxYearTable> for Vec<TaxBracket> {
    fn from(table: TaxYearTable) -> Self {
        table.brackets
    }
}

/// Tax years keyed by calendar year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    pub id: TaxTableId,
    pub years: BTreeMap<i16, TaxYearTable>,
}

impl TaxTable {
    pub fn new(id: TaxTableId) -> Self {
        Self {
            id,
            years: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_year(mut self, year: i16, table: TaxYearTable) -> Self {
        self.years.insert(year, table);
        self
    }

    /// Tax owed on `income` in `year`. There is no fallback for unconfigured years.
    pub fn compute_tax(&self, year: i16, income: Decimal) -> Result<Decimal, TaxError> {
        let table = self.years.get(&year).ok_or_else(|| TaxError::TaxYearNotFound {
            table: self.id.clone(),
            year,
        })?;
        Ok(table.compute_tax(income))
    }
}
