//! Serde tests for authored configs and projected instances

use jiff::civil::date;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{household, with_salary};
use crate::config::{FrequencyBuilder, ScenarioConfig};
use crate::model::{
    AlimonyCapPolicy, ApportionmentPolicy, Assumptions, CashFlowInstance, Frequency, InstanceDetail, ItemType,
    Pass, SourceDefinition, TaxBracket, TaxTable, TaxYearTable,
};

fn round_trip<T>(value: &T) -> T
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    let json = serde_json::to_string(value).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_every_schedule_serializes() {
    let (start, end) = (date(2025, 1, 1), date(2026, 12, 31));
    let frequencies: Vec<Frequency> = vec![
        FrequencyBuilder::annual("a", start, end).apportionment(ApportionmentPolicy::Annual).build(),
        FrequencyBuilder::semi_annual("b", start, end, date(2025, 6, 30)).build(),
        FrequencyBuilder::biweekly("c", start, end, date(2025, 1, 3)).build(),
        FrequencyBuilder::monthly("d", start, end).first_payment(date(2025, 1, 31)).build(),
        FrequencyBuilder::semi_monthly("e", start, end, 15, 31).build(),
        FrequencyBuilder::quarterly("f", start, end).build(),
        FrequencyBuilder::vesting("g", start, end, [(12, dec!(0.25)), (36, dec!(0.75))]).build(),
    ];

    for frequency in &frequencies {
        assert_eq!(&round_trip(frequency), frequency, "{}", frequency.schedule.name());
    }

    let json = serde_json::to_value(&frequencies[2]).unwrap();
    assert_eq!(json["schedule"]["type"], "biweekly");
    assert_eq!(json["schedule"]["first_period_start"], "2025-01-03");
}

#[test]
fn test_scenario_config_round_trip() {
    let table = TaxTable::new("federal".into()).with_year(
        2025,
        TaxYearTable::new(vec![
            TaxBracket::new(Decimal::ZERO, dec!(0.1)),
            TaxBracket::new(dec!(10000), dec!(0.2)),
        ])
        .unwrap(),
    );
    let config = with_salary(household())
        .estimate_after(date(2025, 3, 31))
        .security("acme-stock", "Acme Common")
        .price("acme-stock", date(2025, 1, 1), dec!(100))
        .holding("checking", "acme-stock", dec!(10))
        .tax_table(table)
        .source(SourceDefinition::Alimony {
            id: "alimony".into(),
            pass: Pass::DerivedExpenses,
            payor: "alice".into(),
            payee: "bob".into(),
            base_frequency: "pay".into(),
            smith_ostler_frequency: "pay".into(),
            base_income: dec!(60000),
            base_alimony: dec!(12000),
            smith_ostler_rate: dec!(0.4),
            max_alimony: Some(dec!(30000)),
            cap_policy: AlimonyCapPolicy::FillRemaining,
            default_sink: "checking".into(),
        })
        .build();

    assert_eq!(round_trip(&config), config);
    assert_eq!(config.accounts[0].holdings.len(), 1, "holding attached to its account");
    assert_eq!(config.securities[0].prices[&date(2025, 1, 1)], dec!(100));
}

#[test]
fn test_authored_json_uses_defaults() {
    let json = r#"{
        "name": "Minimal",
        "entities": [{ "id": "alice", "name": "Alice" }],
        "sources": [
            {
                "type": "expense",
                "id": "rent",
                "pass": "base_cash_flows",
                "payor": "alice",
                "frequency": "monthly",
                "annual_amount": "24000",
                "default_sink": "checking"
            },
            {
                "type": "alimony",
                "id": "alimony",
                "pass": "derived_expenses",
                "payor": "alice",
                "payee": "bob",
                "base_frequency": "monthly",
                "smith_ostler_frequency": "monthly",
                "base_income": "60000",
                "base_alimony": "12000",
                "smith_ostler_rate": "0.4",
                "default_sink": "checking"
            }
        ]
    }"#;
    let config: ScenarioConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.assumptions, Assumptions::default());
    assert!(config.estimate_after.is_none());
    match &config.sources[0] {
        SourceDefinition::Expense { category, .. } => assert_eq!(category, "Rent"),
        other => panic!("expected an expense, got {other:?}"),
    }
    match &config.sources[1] {
        SourceDefinition::Alimony {
            max_alimony,
            cap_policy,
            ..
        } => {
            assert_eq!(*max_alimony, None);
            assert_eq!(*cap_policy, AlimonyCapPolicy::Clamp);
        }
        other => panic!("expected alimony, got {other:?}"),
    }

    let written = serde_json::to_value(&config.sources[1]).unwrap();
    assert!(written.get("max_alimony").is_none(), "absent cap is not written");
}

#[test]
fn test_invalid_brackets_fail_to_parse() {
    let json = r#"[{ "lower_bound": "1000", "marginal_rate": "0.1" }]"#;
    assert!(serde_json::from_str::<TaxYearTable>(json).is_err(), "first bracket must start at zero");
}

#[test]
fn test_instance_with_liability_detail() {
    let instance = CashFlowInstance::new(
        "car-loan".into(),
        "checking".into(),
        ItemType::Expense,
        (date(2025, 1, 1), date(2025, 1, 31)),
        date(2025, 2, 1),
        dec!(-300),
    )
    .with_id(7)
    .with_category("Loans", "Loan Payment")
    .with_labels(vec!["car".to_string()])
    .with_detail(InstanceDetail::Liability {
        principal: dec!(290),
        interest: dec!(10),
        impounds: Decimal::ZERO,
        balance: dec!(710),
    })
    .estimated();

    let parsed = round_trip(&instance);
    assert_eq!(parsed, instance);
    assert_eq!(parsed.liability_balance(), Some(dec!(710)));
    assert_eq!(parsed.id(), Some(7));

    let json = serde_json::to_value(&instance).unwrap();
    assert_eq!(json["detail"]["type"], "liability");
    assert_eq!(json["item_type"], "expense");
}

#[test]
fn test_bank_history_parses_without_categories() {
    let json = r#"[{
        "source_id": "alice-acme",
        "sink_id": "checking",
        "item_type": "income",
        "accrual_start": "2025-01-01",
        "accrual_end": "2025-01-31",
        "cash_flow_date": "2025-01-31",
        "amount": "9000"
    }]"#;
    let history: Vec<CashFlowInstance> = serde_json::from_str(json).unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount(), dec!(9000));
    assert_eq!(history[0].category(), "");
    assert!(!history[0].is_estimated());
    assert!(history[0].detail().is_none());
}
