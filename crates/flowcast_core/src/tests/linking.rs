//! Tests for scenario linking

use jiff::civil::date;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{household, monthly_2025, with_salary};
use crate::config::FrequencyBuilder;
use crate::error::{IdKind, LinkError};
use crate::estimators::EstimatorKind;
use crate::model::{EntityId, ItemType, Pass, SourceDefinition, SourceId};
use crate::scenario::Scenario;

#[test]
fn test_duplicate_ids_rejected() {
    let config = household()
        .account("checking", "Second checking", "alice", date(2025, 1, 1), Decimal::ZERO)
        .build();
    assert_eq!(
        Scenario::link(&config).unwrap_err(),
        LinkError::DuplicateId {
            kind: IdKind::Account,
            id: "checking".to_string()
        }
    );

    let config = with_salary(household())
        .salary("alice-salary", "alice-acme", "pay", dec!(1), Pass::BaseCashFlows)
        .build();
    assert!(matches!(
        Scenario::link(&config),
        Err(LinkError::DuplicateId { kind: IdKind::Source, .. })
    ));
}

#[test]
fn test_missing_references_rejected() {
    let config = household()
        .salary("alice-salary", "alice-acme", "nope", dec!(100), Pass::BaseCashFlows)
        .build();
    assert_eq!(
        Scenario::link(&config).unwrap_err(),
        LinkError::NotFound {
            kind: IdKind::Frequency,
            id: "nope".to_string()
        }
    );

    let config = household().job("bob-acme", "acme", "bob", "bob-checking").build();
    assert!(matches!(
        Scenario::link(&config),
        Err(LinkError::NotFound { kind: IdKind::Account, .. })
    ));

    let config = with_salary(household())
        .bonus_pct("bonus", "alice-acme", "pay", "no-such-salary", dec!(0.1), Pass::DerivedIncome)
        .build();
    assert!(matches!(
        Scenario::link(&config),
        Err(LinkError::NotFound { kind: IdKind::Source, .. })
    ));
}

#[test]
fn test_inverted_frequency_rejected() {
    let config = household()
        .frequency(FrequencyBuilder::monthly("backwards", date(2025, 12, 31), date(2025, 1, 1)))
        .build();
    assert!(matches!(
        Scenario::link(&config),
        Err(LinkError::InvalidFrequency { id, .. }) if id == "backwards"
    ));
}

#[test]
fn test_same_pass_dependency_rejected() {
    let config = with_salary(household())
        .frequency(FrequencyBuilder::annual("year", date(2025, 1, 1), date(2025, 12, 31)))
        .bonus_pct("bonus", "alice-acme", "year", "alice-salary", dec!(0.1), Pass::BaseCashFlows)
        .build();

    assert_eq!(
        Scenario::link(&config).unwrap_err(),
        LinkError::PassOrder {
            source_id: "bonus".into(),
            dependency: "alice-salary".into(),
            source_pass: Pass::BaseCashFlows,
            dependency_pass: Pass::BaseCashFlows,
        }
    );
}

#[test]
fn test_later_pass_dependency_rejected() {
    let config = household()
        .frequency(monthly_2025("pay"))
        .salary("alice-salary", "alice-acme", "pay", dec!(100), Pass::DerivedExpenses)
        .frequency(FrequencyBuilder::annual("year", date(2025, 1, 1), date(2025, 12, 31)))
        .bonus_pct("bonus", "alice-acme", "year", "alice-salary", dec!(0.1), Pass::DerivedIncome)
        .build();
    assert!(matches!(
        Scenario::link(&config),
        Err(LinkError::PassOrder { dependency_pass: Pass::DerivedExpenses, .. })
    ));
}

#[test]
fn test_linked_scenario_resolves_sources() {
    let config = with_salary(household())
        .frequency(monthly_2025("loan-month"))
        .source(SourceDefinition::Liability {
            id: "mortgage".into(),
            pass: Pass::BaseCashFlows,
            lender: "bank".into(),
            borrower: "alice".into(),
            frequency: "loan-month".into(),
            starting_balance: dec!(300000),
            annual_rate: dec!(0.045),
            payment: dec!(1520.06),
            impounds: Decimal::ZERO,
            term: None,
            default_sink: "checking".into(),
        })
        .build();
    let scenario = Scenario::link(&config).unwrap();

    let salary = scenario.estimator(&"alice-salary".into()).unwrap();
    assert_eq!(salary.owner, EntityId::from("alice"));
    assert_eq!(salary.item_type(), ItemType::Income);
    assert!(salary.dependencies().is_empty());

    let mortgage = scenario.estimator(&"mortgage".into()).unwrap();
    match &mortgage.kind {
        EstimatorKind::Liability(loan) => {
            assert_eq!(loan.period_rate, dec!(0.00375));
            assert_eq!(loan.lender, "First Bank");
        }
        other => panic!("expected a liability, got {other:?}"),
    }

    let income = &scenario.income_sources[&EntityId::from("alice")];
    assert!(income.contains(&SourceId::from("alice-salary")));
    assert!(income.contains(&SourceId::from("alice-acme")), "job id matches historical paychecks");
    assert!(!income.contains(&SourceId::from("mortgage")));
}
