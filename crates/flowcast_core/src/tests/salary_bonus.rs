//! Tests for salary and bonus estimators

use jiff::civil::date;
use rust_decimal_macros::dec;

use super::{amounts, dates, household, monthly_2025, run, with_salary};
use crate::config::FrequencyBuilder;
use crate::estimators::{BONUS, INCOME, PAYCHECK};
use crate::model::{AccountId, ItemType, Pass, SourceId};

#[test]
fn test_monthly_salary() {
    let config = with_salary(household()).build();
    let calendar = run(&config).unwrap();

    let paid = amounts(&calendar, "alice-salary");
    assert_eq!(paid.len(), 12);
    assert!(paid.iter().all(|a| *a == dec!(10000.00)), "{paid:?}");
    assert_eq!(calendar.annual_cash_flow(&"alice-salary".into(), 2025), dec!(120000.00));

    let first = calendar.cash_flows_by_source(&"alice-salary".into(), None)[0];
    assert_eq!(first.item_type(), ItemType::Income);
    assert_eq!(first.parent_category(), INCOME);
    assert_eq!(first.category(), PAYCHECK);
    assert_eq!(first.sink_id(), &AccountId::from("checking"), "paid into the job's account");
    assert!(first.is_estimated());
    assert_eq!(first.description(), "Paycheck from Acme Corp");
}

#[test]
fn test_salary_prorates_partial_first_month() {
    let config = household()
        .frequency(
            FrequencyBuilder::monthly("pay", date(2025, 1, 16), date(2025, 12, 31)).first_payment(date(2025, 1, 31)),
        )
        .salary("alice-salary", "alice-acme", "pay", dec!(120000), Pass::BaseCashFlows)
        .build();
    let calendar = run(&config).unwrap();

    let paid = amounts(&calendar, "alice-salary");
    assert_eq!(paid.len(), 12);
    assert_eq!(paid[0], dec!(5260.27), "16 days of a 365-day year");
    assert_eq!(paid[1], dec!(10000.00));
}

#[test]
fn test_percent_bonus_reads_prior_pass_salary() {
    let config = with_salary(household())
        .frequency(
            FrequencyBuilder::annual("bonus-year", date(2025, 1, 1), date(2025, 12, 31)).first_payment(date(2026, 3, 15)),
        )
        .bonus_pct("alice-bonus", "alice-acme", "bonus-year", "alice-salary", dec!(0.10), Pass::DerivedIncome)
        .build();
    let calendar = run(&config).unwrap();

    assert_eq!(dates(&calendar, "alice-bonus"), vec![date(2026, 3, 15)]);
    assert_eq!(amounts(&calendar, "alice-bonus"), vec![dec!(12000.00)]);
    assert_eq!(calendar.annual_cash_flow(&SourceId::from("alice-bonus"), 2026), dec!(12000.00));
    assert_eq!(calendar.annual_cash_flow(&SourceId::from("alice-bonus"), 2025), dec!(0));
    assert!(calendar.years().contains(&2026), "payment year joins the calendar");
}

#[test]
fn test_percent_bonus_without_salary_in_window_is_skipped() {
    let config = with_salary(household())
        .frequency(
            FrequencyBuilder::annual("bonus-year", date(2027, 1, 1), date(2027, 12, 31)).first_payment(date(2028, 3, 15)),
        )
        .bonus_pct("alice-bonus", "alice-acme", "bonus-year", "alice-salary", dec!(0.10), Pass::DerivedIncome)
        .build();
    let calendar = run(&config).unwrap();

    assert!(amounts(&calendar, "alice-bonus").is_empty());
}

#[test]
fn test_fixed_bonus_quarterly() {
    let config = household()
        .frequency(
            FrequencyBuilder::quarterly("quarters", date(2025, 1, 1), date(2025, 12, 31)).first_payment(date(2025, 4, 10)),
        )
        .bonus_fixed("alice-retention", "alice-acme", "quarters", dec!(4000), Pass::BaseCashFlows)
        .build();
    let calendar = run(&config).unwrap();

    assert_eq!(amounts(&calendar, "alice-retention"), vec![dec!(1000.00); 4]);
    let first = calendar.cash_flows_by_source(&"alice-retention".into(), None)[0];
    assert_eq!(first.category(), BONUS);
}

#[test]
fn test_expense_is_negative() {
    let config = household()
        .frequency(monthly_2025("rent-month"))
        .expense("rent", "alice", "rent-month", dec!(24000), "checking", Pass::BaseCashFlows)
        .build();
    let calendar = run(&config).unwrap();

    assert_eq!(amounts(&calendar, "rent"), vec![dec!(-2000.00); 12]);
    assert_eq!(calendar.annual_cash_flow(&"rent".into(), 2025), dec!(-24000.00));
    assert_eq!(calendar.cash_flows_by_source(&"rent".into(), None)[0].category(), "Rent");
}
