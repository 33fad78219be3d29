use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FrequencyId;

/// How an annual amount is split across the periods of an annual-style schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApportionmentPolicy {
    /// Every period receives the whole amount
    #[default]
    WholeTerm,
    /// Partial years are prorated by accrued days
    Annual,
    /// Partial years are prorated by months touched
    EqualMonthly,
}

/// One step of a vesting schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vesting {
    /// Length of this step in months
    pub months: u32,
    /// Fraction of the total that vests at the end of this step
    pub percent: Decimal,
}

/// Schedule-specific shape of a Frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    Annual,
    SemiAnnual {
        first_accrual_end: Date,
    },
    Biweekly {
        first_period_start: Date,
    },
    Monthly,
    SemiMonthly {
        first_payment_day: i8,
        second_payment_day: i8,
    },
    Quarterly,
    VestingSchedule {
        vestings: Vec<Vesting>,
    },
}

impl Schedule {
    /// Nominal number of periods per year, used to derive periodic interest rates.
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            Schedule::Annual => Some(1),
            Schedule::SemiAnnual { .. } => Some(2),
            Schedule::Quarterly => Some(4),
            Schedule::Monthly => Some(12),
            Schedule::SemiMonthly { .. } => Some(24),
            Schedule::Biweekly { .. } => Some(26),
            Schedule::VestingSchedule { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Schedule::Annual => "annual",
            Schedule::SemiAnnual { .. } => "semi_annual",
            Schedule::Biweekly { .. } => "biweekly",
            Schedule::Monthly => "monthly",
            Schedule::SemiMonthly { .. } => "semi_monthly",
            Schedule::Quarterly => "quarterly",
            Schedule::VestingSchedule { .. } => "vesting_schedule",
        }
    }
}

/// A payment schedule over an accrual window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    pub id: FrequencyId,
    pub accrue_start: Date,
    pub accrue_end: Date,
    pub first_payment_date: Date,
    #[serde(default)]
    pub apportionment: ApportionmentPolicy,
    pub schedule: Schedule,
}

impl Frequency {
    /// Checks the invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.accrue_start > self.accrue_end {
            return Err(format!(
                "accrue_start {} is after accrue_end {}",
                self.accrue_start, self.accrue_end
            ));
        }
        match &self.schedule {
            Schedule::SemiMonthly {
                first_payment_day,
                second_payment_day,
            } => {
                for day in [first_payment_day, second_payment_day] {
                    if !(1..=31).contains(day) {
                        return Err(format!("payment day {day} is not a day of the month"));
                    }
                }
            }
            Schedule::SemiAnnual { first_accrual_end } if *first_accrual_end < self.accrue_start => {
                return Err(format!(
                    "first_accrual_end {first_accrual_end} is before accrue_start {}",
                    self.accrue_start
                ));
            }
            Schedule::VestingSchedule { vestings } => {
                if vestings.is_empty() {
                    return Err("vesting schedule has no steps".to_string());
                }
                if vestings.iter().any(|v| v.months == 0) {
                    return Err("vesting step of zero months".to_string());
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Calendar years touched by the accrual window.
    pub fn years(&self) -> std::ops::RangeInclusive<i16> {
        self.accrue_start.year()..=self.accrue_end.year()
    }
}
