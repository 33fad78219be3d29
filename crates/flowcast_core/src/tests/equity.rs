//! Tests for RSU and stock option vesting

use jiff::civil::date;
use rust_decimal_macros::dec;

use super::{amounts, dates, household, run};
use crate::config::{FrequencyBuilder, ScenarioBuilder};
use crate::error::{EstimateError, PricingError, ProjectionError};
use crate::estimators::RSUS;
use crate::model::{Pass, SecurityId, SourceDefinition};

/// Two annual vesting steps of half the grant each, valued at 50 then 60.
fn with_grant(builder: ScenarioBuilder) -> ScenarioBuilder {
    builder
        .security("ACME", "Acme Corp common")
        .price("ACME", date(2025, 12, 31), dec!(50))
        .price("ACME", date(2026, 12, 31), dec!(60))
        .frequency(FrequencyBuilder::vesting(
            "grant-2025",
            date(2025, 1, 1),
            date(2026, 12, 31),
            [(12, dec!(0.5)), (12, dec!(0.5))],
        ))
}

#[test]
fn test_rsu_vests_at_period_end_price() {
    let config = with_grant(household())
        .rsu("alice-rsu", "alice-acme", "grant-2025", "ACME", dec!(1000), Pass::BaseCashFlows)
        .build();
    let calendar = run(&config).unwrap();

    assert_eq!(dates(&calendar, "alice-rsu"), vec![date(2026, 1, 1), date(2027, 1, 1)]);
    assert_eq!(amounts(&calendar, "alice-rsu"), vec![dec!(25000.00), dec!(30000.00)]);
    let first = calendar.cash_flows_by_source(&"alice-rsu".into(), None)[0];
    assert_eq!(first.category(), RSUS);
    assert!(first.description().contains("shares of ACME"), "{}", first.description());
}

#[test]
fn test_stock_option_skips_underwater_vest() {
    let config = with_grant(household())
        .source(SourceDefinition::StockOption {
            id: "alice-options".into(),
            pass: Pass::BaseCashFlows,
            job: "alice-acme".into(),
            frequency: "grant-2025".into(),
            security: "ACME".into(),
            total_shares: dec!(1000),
            strike_price: dec!(55),
        })
        .build();
    let calendar = run(&config).unwrap();

    assert_eq!(
        amounts(&calendar, "alice-options"),
        vec![dec!(2500.00)],
        "first vest at 50 is below the 55 strike"
    );
}

#[test]
fn test_rsu_without_prices_fails() {
    let config = household()
        .security("PRIVATE", "Private Co")
        .frequency(FrequencyBuilder::vesting(
            "grant",
            date(2025, 1, 1),
            date(2025, 12, 31),
            [(12, dec!(1))],
        ))
        .rsu("alice-rsu", "alice-acme", "grant", "PRIVATE", dec!(100), Pass::BaseCashFlows)
        .build();

    let err = run(&config).unwrap_err();
    assert_eq!(
        err,
        ProjectionError::Estimate(EstimateError::Pricing {
            estimator: "alice-rsu".into(),
            error: PricingError::NoPriceHistory {
                security: SecurityId::from("PRIVATE"),
                date: date(2025, 12, 31),
            },
        })
    );
}
