//! Period generation
//!
//! A [`Frequency`] slices its accrual window into chronological, non-overlapping
//! periods that together cover `[accrue_start, accrue_end]` exactly. Each
//! period carries the date it is paid and its portion of an annual amount.
//!
//! Precision of the portion depends on the schedule:
//! - Biweekly: days / 14 at 10 places, then / 26 at 10 places
//! - Monthly: 1/12 for whole months; partial months by days over the length of
//!   the accrual-start year, at 10 places
//! - SemiMonthly: days / half-month length at 4 places, then / 24
//! - Quarterly: days / quarter length at 2 places, then / 4
//! - SemiAnnual: days / nominal half-year at 4 places, then / 2
//! - Annual: by apportionment policy

use std::cmp::{max, min};

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::date_math::{
    add_days, add_months, days_in_month, days_in_year, fast_days_between, first_of_month,
    inclusive_days, last_of_month, months_between, with_day_clamped, year_end, year_start,
};
use crate::model::{ApportionmentPolicy, CashFlowInstance, Frequency, Schedule, SourceId, Vesting};
use crate::money::{PORTION_SCALE, ratio, round_portion};

/// An accrual sub-range of a frequency and the date it is paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub accrual_start: Date,
    pub accrual_end: Date,
    pub cash_flow_date: Date,
    /// Fraction of an annual amount that accrues in this period
    pub portion: Decimal,
}

/// Where a period sits in its frequency's sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodPosition {
    pub index: usize,
    pub count: usize,
}

impl PeriodPosition {
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }
}

impl Frequency {
    /// Ordered periods covering the accrual window.
    pub fn periods(&self) -> Vec<Period> {
        match &self.schedule {
            Schedule::Annual => annual_periods(self),
            Schedule::SemiAnnual { first_accrual_end } => {
                semi_annual_periods(self, *first_accrual_end)
            }
            Schedule::Biweekly { first_period_start } => {
                biweekly_periods(self, *first_period_start)
            }
            Schedule::Monthly => monthly_periods(self),
            Schedule::SemiMonthly {
                first_payment_day,
                second_payment_day,
            } => semi_monthly_periods(self, *first_payment_day, *second_payment_day),
            Schedule::Quarterly => quarterly_periods(self),
            Schedule::VestingSchedule { vestings } => vesting_periods(self, vestings),
        }
    }

    /// Run `amount_fn` over every period in order and collect the instances it produces.
    ///
    /// The most recently produced instance is passed back in so an amount
    /// function can carry a running balance forward. Returning `Ok(None)`
    /// skips the period.
    pub fn cash_flow_instances<F, E>(
        &self,
        calendar: &Calendar,
        source_id: &SourceId,
        amount_fn: F,
    ) -> Result<Vec<CashFlowInstance>, E>
    where
        F: Fn(
            &Calendar,
            &SourceId,
            &Period,
            PeriodPosition,
            Option<&CashFlowInstance>,
        ) -> Result<Option<CashFlowInstance>, E>,
    {
        let periods = self.periods();
        let count = periods.len();
        let mut instances: Vec<CashFlowInstance> = Vec::with_capacity(count);

        for (index, period) in periods.iter().enumerate() {
            let position = PeriodPosition { index, count };
            if let Some(instance) = amount_fn(calendar, source_id, period, position, instances.last())? {
                instances.push(instance);
            }
        }

        Ok(instances)
    }
}

// ============================================================================
// Schedules
// ============================================================================

/// `month`/`day` of `template` in `year`, with the day clamped (Feb 29).
fn on_day_in_year(year: i16, template: Date) -> Date {
    let day = template.day().min(days_in_month(year, template.month()));
    jiff::civil::date(year, template.month(), day)
}

fn annual_periods(f: &Frequency) -> Vec<Period> {
    let payment_offset = f.first_payment_date.year() - f.accrue_start.year();

    f.years()
        .map(|year| {
            let accrual_start = max(year_start(year), f.accrue_start);
            let accrual_end = min(year_end(year), f.accrue_end);
            let portion = match f.apportionment {
                ApportionmentPolicy::WholeTerm => Decimal::ONE,
                ApportionmentPolicy::Annual => ratio(
                    inclusive_days(accrual_start, accrual_end),
                    days_in_year(year),
                    2,
                ),
                ApportionmentPolicy::EqualMonthly => ratio(
                    months_between(accrual_start, accrual_end) + 1,
                    12,
                    PORTION_SCALE,
                ),
            };
            Period {
                accrual_start,
                accrual_end,
                cash_flow_date: on_day_in_year(year + payment_offset, f.first_payment_date),
                portion,
            }
        })
        .collect()
}

fn semi_annual_periods(f: &Frequency, first_accrual_end: Date) -> Vec<Period> {
    let mut periods = Vec::new();
    let mut start = f.accrue_start;
    let mut nominal_end = first_accrual_end;
    let mut step = 0;

    while start <= f.accrue_end {
        let accrual_end = min(nominal_end, f.accrue_end);
        let nominal_start = add_months(add_days(nominal_end, 1), -6);
        let half_year = ratio(
            inclusive_days(start, accrual_end),
            inclusive_days(nominal_start, nominal_end),
            4,
        );
        periods.push(Period {
            accrual_start: start,
            accrual_end,
            cash_flow_date: add_months(f.first_payment_date, 6 * step),
            portion: round_portion(half_year / Decimal::TWO),
        });

        start = add_days(nominal_end, 1);
        nominal_end = add_days(add_months(start, 6), -1);
        step += 1;
    }

    periods
}

fn biweekly_portion(start: Date, end: Date) -> Decimal {
    round_portion(ratio(inclusive_days(start, end), 14, PORTION_SCALE) / Decimal::from(26))
}

/// 14-day periods anchored at `first_period_start`.
///
/// A period that would start on `accrue_end` itself is folded into the
/// previous period, so the last period may run 15 days.
fn biweekly_periods(f: &Frequency, first_period_start: Date) -> Vec<Period> {
    let payment_offset = fast_days_between(first_period_start, f.first_payment_date);

    // Align the anchor to the period containing accrue_start
    let mut start = first_period_start;
    while start > f.accrue_start {
        start = add_days(start, -14);
    }
    while add_days(start, 13) < f.accrue_start {
        start = add_days(start, 14);
    }

    let mut periods: Vec<Period> = Vec::new();
    while start <= f.accrue_end {
        if start == f.accrue_end {
            if let Some(last) = periods.last_mut() {
                last.accrual_end = f.accrue_end;
                last.portion = biweekly_portion(last.accrual_start, last.accrual_end);
                break;
            }
        }
        let accrual_start = max(start, f.accrue_start);
        let accrual_end = min(add_days(start, 13), f.accrue_end);
        periods.push(Period {
            accrual_start,
            accrual_end,
            cash_flow_date: add_days(start, payment_offset),
            portion: biweekly_portion(accrual_start, accrual_end),
        });
        start = add_days(start, 14);
    }

    periods
}

fn monthly_periods(f: &Frequency) -> Vec<Period> {
    let payment_offset = months_between(f.accrue_start, f.first_payment_date);
    let payment_day = f.first_payment_date.day();
    let year_length = days_in_year(f.accrue_start.year());
    let whole_month = ratio(1, 12, PORTION_SCALE);

    let mut periods = Vec::new();
    let mut month = first_of_month(f.accrue_start);
    while month <= f.accrue_end {
        let month_end = last_of_month(month);
        let accrual_start = max(month, f.accrue_start);
        let accrual_end = min(month_end, f.accrue_end);
        let is_whole = accrual_start == month && accrual_end == month_end;
        let portion = if is_whole || f.apportionment == ApportionmentPolicy::EqualMonthly {
            whole_month
        } else {
            ratio(
                inclusive_days(accrual_start, accrual_end),
                year_length,
                PORTION_SCALE,
            )
        };
        periods.push(Period {
            accrual_start,
            accrual_end,
            cash_flow_date: with_day_clamped(add_months(month, payment_offset), payment_day),
            portion,
        });
        month = add_months(month, 1);
    }

    periods
}

fn semi_monthly_periods(f: &Frequency, first_day: i8, second_day: i8) -> Vec<Period> {
    const MIDDLE_OF_MONTH: i8 = 15;

    // Paid on `day` of the half's month, or the following month if that falls
    // before the half ends.
    let half = |start: Date, end: Date, half_end: Date, day: i8, half_length: i32| {
        let mut cash_flow_date = with_day_clamped(half_end, day);
        if cash_flow_date < half_end {
            cash_flow_date = with_day_clamped(add_months(first_of_month(half_end), 1), day);
        }
        let fraction = ratio(inclusive_days(start, end), half_length, 4);
        Period {
            accrual_start: start,
            accrual_end: end,
            cash_flow_date,
            portion: round_portion(fraction / Decimal::from(24)),
        }
    };

    let mut periods = Vec::new();
    let mut month = first_of_month(f.accrue_start);
    while month <= f.accrue_end {
        let middle = with_day_clamped(month, MIDDLE_OF_MONTH);
        let month_end = last_of_month(month);

        let start = max(month, f.accrue_start);
        let end = min(middle, f.accrue_end);
        if start <= end {
            periods.push(half(start, end, middle, first_day, MIDDLE_OF_MONTH as i32));
        }

        let start = max(add_days(middle, 1), f.accrue_start);
        let end = min(month_end, f.accrue_end);
        if start <= end {
            let second_length = month_end.day() as i32 - MIDDLE_OF_MONTH as i32;
            periods.push(half(start, end, month_end, second_day, second_length));
        }

        month = add_months(month, 1);
    }

    periods
}

fn quarterly_periods(f: &Frequency) -> Vec<Period> {
    let payment_offset = months_between(f.accrue_start, f.first_payment_date);
    let payment_day = f.first_payment_date.day();

    let mut periods = Vec::new();
    let mut quarter = first_of_month(f.accrue_start);
    while quarter <= f.accrue_end {
        let quarter_end = add_days(add_months(quarter, 3), -1);
        let accrual_start = max(quarter, f.accrue_start);
        let accrual_end = min(quarter_end, f.accrue_end);
        let fraction = ratio(
            inclusive_days(accrual_start, accrual_end),
            inclusive_days(quarter, quarter_end),
            2,
        );
        periods.push(Period {
            accrual_start,
            accrual_end,
            cash_flow_date: with_day_clamped(add_months(quarter, payment_offset), payment_day),
            portion: round_portion(fraction / Decimal::from(4)),
        });
        quarter = add_months(quarter, 3);
    }

    periods
}

/// One period per vesting step; the final step ends at `accrue_end`.
fn vesting_periods(f: &Frequency, vestings: &[Vesting]) -> Vec<Period> {
    let mut periods = Vec::with_capacity(vestings.len());
    let mut start = f.accrue_start;
    let mut elapsed_months: i32 = 0;

    for (i, vesting) in vestings.iter().enumerate() {
        if start > f.accrue_end {
            break;
        }
        elapsed_months += vesting.months as i32;
        let nominal_end = add_days(add_months(f.accrue_start, elapsed_months), -1);
        let accrual_end = if i + 1 == vestings.len() {
            f.accrue_end
        } else {
            min(nominal_end, f.accrue_end)
        };
        periods.push(Period {
            accrual_start: start,
            accrual_end,
            cash_flow_date: add_days(accrual_end, 1),
            portion: vesting.percent,
        });
        start = add_days(accrual_end, 1);
    }

    periods
}
